pub mod batch;
pub mod limits;
pub mod splitter;
pub mod ordered;
pub mod unordered;
