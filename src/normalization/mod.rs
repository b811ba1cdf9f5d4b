//! Phone number normalization.
//!
//! Converts locally formatted numbers into canonical dialing format using a
//! country's ordered local prefix patterns.

mod normalizer;

pub use normalizer::{
    normalize, normalize_for, normalize_lines, normalize_tr, NormalizedBatch, Rejection,
};
