pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod observability;
pub mod rules;
pub mod store;
pub mod taxation;
