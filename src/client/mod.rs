pub mod backend;
pub mod client;
pub mod client_model;
pub mod error;
