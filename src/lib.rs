// Export modules for use in tests
pub mod annotations;
pub mod debounce;
pub mod errors;
pub mod geometry;
pub mod issues;
pub mod markers;
pub mod selection;
pub mod session;
pub mod types;

pub mod test_utils;

// Re-export the coordination surface
pub use session::{NavigationRequest, ReviewSession};
