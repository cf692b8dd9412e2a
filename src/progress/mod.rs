pub mod progress_model;
pub mod simulator;
