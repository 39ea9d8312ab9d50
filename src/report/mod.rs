pub mod plots;
pub mod summary;
