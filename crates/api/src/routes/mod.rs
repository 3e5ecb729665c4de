pub mod config;
pub mod recognize;
pub mod words;
