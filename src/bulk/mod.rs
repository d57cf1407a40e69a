pub mod operation;
pub mod find;
