pub mod adapters;
pub mod configuration;
pub mod coordinator;
pub mod domain;
pub mod presenter;
pub mod routes;
pub mod startup;
mod utils;
