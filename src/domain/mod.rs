//! Domain value objects and types.
//!
//! This module contains the canonical phone number value object and the
//! country dialing rules used to produce it. Value objects validate at
//! construction time so invalid numbers cannot reach the dispatcher.

pub mod country;
pub mod errors;
pub mod phone;

pub use country::{CountryRule, CountryTable, DEFAULT_COUNTRY};
pub use errors::ValidationError;
pub use phone::{is_canonical, CanonicalNumber};
