//! Client-side workflow for produce quality analysis.
//!
//! A user picks an image (file or URL), the [`workflow::controller::WorkflowController`]
//! submits it to the remote analysis service while a simulated progress signal
//! keeps the user informed, and the outcome lands in a terminal `Completed` state.

pub mod cli;
pub mod client;
pub mod progress;
pub mod report;
pub mod source;
pub mod trace;
pub mod workflow;
