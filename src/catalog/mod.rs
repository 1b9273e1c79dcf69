pub mod cache;
pub mod filter;
pub mod types;
