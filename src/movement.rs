pub mod behaviors;
pub mod debug;
pub mod steering;
