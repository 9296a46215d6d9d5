pub mod codec;
pub mod repository;
pub mod types;
