pub mod candidate;
pub mod cv;
pub mod placement;
pub mod settings;
pub mod vacancy;
