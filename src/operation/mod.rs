pub mod model;
pub mod size;
pub mod validate;
pub mod raw;
