pub mod outputs;
pub mod summary;
