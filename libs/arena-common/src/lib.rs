pub mod endpoints;
pub mod types;
pub mod verdict;
