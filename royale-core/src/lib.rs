pub mod lifecycle;
pub mod prize;

// Re-export main components
pub use lifecycle::*;
pub use prize::*;
