pub mod controller;
pub mod error;
pub mod workflow_model;
