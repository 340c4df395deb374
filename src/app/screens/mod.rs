//! TUI screen components
//!
//! One component per controller screen.

pub mod dashboard;
pub mod exam;
pub mod results;
pub mod review;

pub use dashboard::{DashboardCommand, DashboardField, DashboardScreen};
pub use exam::{ExamPrompt, ExamScreen};
pub use results::{ResultAction, ResultsScreen};
pub use review::{ReviewCommand, ReviewScreen};

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A rect of `height` rows and `percent_x` width, centered in `r`
pub(crate) fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
