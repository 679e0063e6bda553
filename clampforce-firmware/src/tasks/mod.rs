//! Embassy async tasks
//!
//! The whole control loop runs in one task; the executor only interleaves
//! it with the UART interrupt handlers.

pub mod control;

pub use control::{control_task, ClampController};
