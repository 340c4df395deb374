//! Exam engine module
//!
//! Contains the session state machine, question generation and the
//! clock the timer is measured against.

pub mod clock;
pub mod controller;
pub mod generator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{ExamAction, ExamController};
pub use generator::generate_questions;
