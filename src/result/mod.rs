pub mod aggregate;
pub mod merger;
pub mod write_result;
