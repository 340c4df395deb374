//! TUI application module
//!
//! Contains the terminal user interface components, screen management,
//! and keyboard input mapping.

pub mod app;
pub mod screens;
pub mod state;
pub mod tui;

pub use app::{App, AppCore};
pub use screens::{DashboardScreen, ExamScreen, ResultAction, ResultsScreen, ReviewScreen};
pub use state::{key_to_action, KeyAction};
pub use tui::{Tui, TuiEvent};
