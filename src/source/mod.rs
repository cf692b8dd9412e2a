pub mod error;
pub mod selector;
pub mod source_model;
