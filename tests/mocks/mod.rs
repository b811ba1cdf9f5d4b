pub mod mock_collaborators;
pub mod mock_strategy;
pub mod recording_pacer;

#[allow(unused_imports)]
pub use mock_collaborators::{MockChatSession, MockLauncher};
#[allow(unused_imports)]
pub use mock_strategy::MockStrategy;
#[allow(unused_imports)]
pub use recording_pacer::RecordingPacer;
