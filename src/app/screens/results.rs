//! Results screen implementation
//!
//! Displays the final score, tallies and per-area breakdown of a finished
//! exam, with actions to review answers, export, or start a new exam.

use crate::app::state::KeyAction;
use crate::config::export::ExportedFiles;
use crate::models::{module_display_name, score_percent, ExamResults};
use crate::util::format_elapsed;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

/// Available actions on the results screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    Review,
    Export,
    NewExam,
}

impl ResultAction {
    pub fn all() -> [Self; 3] {
        [Self::Review, Self::Export, Self::NewExam]
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            Self::Review => "Review Answers",
            Self::Export => "Export Results",
            Self::NewExam => "New Exam",
        }
    }
}

/// Results screen component
#[derive(Debug)]
pub struct ResultsScreen {
    selected_action: ResultAction,
    /// Outcome of the last export: success flag and message
    export_message: Option<(bool, String)>,
    /// Shown above the summary, e.g. when the timer ran out
    notice: Option<String>,
}

impl ResultsScreen {
    pub fn new() -> Self {
        Self {
            selected_action: ResultAction::Review,
            export_message: None,
            notice: None,
        }
    }

    /// Clear per-exam state when a new result is shown
    pub fn reset(&mut self) {
        self.selected_action = ResultAction::Review;
        self.export_message = None;
        self.notice = None;
    }

    pub fn selected_action(&self) -> ResultAction {
        self.selected_action
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn complete_export(&mut self, outcome: Result<&ExportedFiles, String>) {
        self.export_message = Some(match outcome {
            Ok(files) => (
                true,
                format!("Exported to {} and {}", files.json.display(), files.csv.display()),
            ),
            Err(message) => (false, message),
        });
    }

    pub fn export_message(&self) -> Option<&str> {
        self.export_message.as_ref().map(|(_, message)| message.as_str())
    }

    pub fn select_next_action(&mut self) {
        let actions = ResultAction::all();
        let index = actions
            .iter()
            .position(|a| *a == self.selected_action)
            .unwrap_or(0);
        self.selected_action = actions[(index + 1) % actions.len()];
    }

    pub fn select_previous_action(&mut self) {
        let actions = ResultAction::all();
        let index = actions
            .iter()
            .position(|a| *a == self.selected_action)
            .unwrap_or(0);
        self.selected_action = actions[(index + actions.len() - 1) % actions.len()];
    }

    /// Returns the action to perform, if the key triggers one
    pub fn handle_action(&mut self, action: KeyAction) -> Option<ResultAction> {
        match action {
            KeyAction::Left | KeyAction::Previous => self.select_previous_action(),
            KeyAction::Right | KeyAction::Next => self.select_next_action(),
            KeyAction::Select => return Some(self.selected_action),
            KeyAction::Review => return Some(ResultAction::Review),
            KeyAction::Export => return Some(ResultAction::Export),
            KeyAction::Restart => return Some(ResultAction::NewExam),
            _ => {}
        }
        None
    }

    pub fn render(&mut self, f: &mut Frame, results: Option<&ExamResults>) {
        let size = f.size();
        let Some(results) = results else {
            self.render_no_results(f, size);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Min(10),    // Summary + areas
                Constraint::Length(4),  // Actions/Status
                Constraint::Length(3),  // Help
            ])
            .split(size);

        self.render_title(f, chunks[0], results);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        self.render_summary_table(f, body[0], results);
        self.render_area_table(f, body[1], results);
        self.render_actions(f, chunks[2]);
        self.render_help(f, chunks[3]);
    }

    fn render_no_results(&self, f: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(""),
            Line::from("No exam results available"),
            Line::from(""),
            Line::from(Span::styled("Press n to start a new exam", Style::default().fg(Color::Yellow))),
        ];

        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default()
                .title("Results")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)));

        f.render_widget(paragraph, area);
    }

    fn render_title(&self, f: &mut Frame, area: Rect, results: &ExamResults) {
        let (text, color) = match &self.notice {
            Some(notice) => (format!("Exam Results - {}", notice), Color::Yellow),
            None => ("Exam Results".to_string(), Color::Cyan),
        };
        let title = Paragraph::new(format!("{} ({})", text, results.exam_type))
            .style(Style::default()
                .fg(color)
                .add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)));

        f.render_widget(title, area);
    }

    fn render_summary_table(&self, f: &mut Frame, area: Rect, results: &ExamResults) {
        let score_str = format!("{}%", results.score_percent);
        let correct_str = results.correct.to_string();
        let wrong_str = results.wrong.to_string();
        let skipped_str = results.skipped.to_string();
        let total_str = results.total_questions.to_string();
        let duration_str = format_elapsed(results.duration);
        let finished_str = results
            .finished_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        let modules_str = results
            .modules
            .iter()
            .map(|m| module_display_name(m))
            .collect::<Vec<_>>()
            .join(", ");

        let score_color = match results.score_percent {
            80.. => Color::Green,
            60..=79 => Color::Yellow,
            _ => Color::Red,
        };

        let rows = vec![
            Row::new(vec!["Score", score_str.as_str()])
                .style(Style::default().fg(score_color).add_modifier(Modifier::BOLD)),
            Row::new(vec!["", ""]),
            Row::new(vec!["  Correct:", correct_str.as_str()]).style(Style::default().fg(Color::Green)),
            Row::new(vec!["  Wrong:", wrong_str.as_str()]).style(Style::default().fg(Color::Red)),
            Row::new(vec!["  Unanswered:", skipped_str.as_str()]),
            Row::new(vec!["  Total:", total_str.as_str()]),
            Row::new(vec!["", ""]),
            Row::new(vec!["  Duration:", duration_str.as_str()]),
            Row::new(vec!["  Finished:", finished_str.as_str()]),
            Row::new(vec!["  Modules:", modules_str.as_str()]),
        ];

        let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(10)])
            .block(Block::default()
                .title("Summary")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)))
            .column_spacing(2);

        f.render_widget(table, area);
    }

    fn render_area_table(&self, f: &mut Frame, area: Rect, results: &ExamResults) {
        let header = Row::new(vec!["Area", "Correct", "Answered", "%"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = results
            .per_area
            .iter()
            .map(|(name, tally)| {
                Row::new(vec![
                    name.clone(),
                    tally.correct.to_string(),
                    tally.total.to_string(),
                    format!("{}%", score_percent(tally.correct, tally.total)),
                ])
            })
            .collect();

        let title = if rows.is_empty() {
            "By Area (nothing answered)"
        } else {
            "By Area"
        };

        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(9),
                Constraint::Length(5),
            ],
        )
        .header(header)
        .block(Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)))
        .column_spacing(1);

        f.render_widget(table, area);
    }

    fn render_actions(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        let actions_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(60),
                Constraint::Min(0),
            ])
            .split(rows[0])[1];

        let action_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(actions_area);

        for (action, chunk) in ResultAction::all().iter().zip(action_chunks.iter()) {
            let selected = *action == self.selected_action;
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let border = if selected { Color::Cyan } else { Color::White };

            let button = Paragraph::new(action.display_text())
                .style(style)
                .alignment(Alignment::Center)
                .block(Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)));
            f.render_widget(button, *chunk);
        }

        if let Some((ok, message)) = &self.export_message {
            let color = if *ok { Color::Green } else { Color::Red };
            let widget = Paragraph::new(message.as_str())
                .style(Style::default().fg(color))
                .alignment(Alignment::Center);
            f.render_widget(widget, rows[1]);
        }
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let help_text = vec![Line::from(vec![
            Span::styled("←→", key),
            Span::raw(" Navigate  "),
            Span::styled("Enter", key),
            Span::raw(" Select  "),
            Span::styled("r", key),
            Span::raw(" Review  "),
            Span::styled("x", key),
            Span::raw(" Export  "),
            Span::styled("n", key),
            Span::raw(" New  "),
            Span::styled("q", key),
            Span::raw(" Quit"),
        ])];

        let help = Paragraph::new(help_text)
            .alignment(Alignment::Center)
            .block(Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)));

        f.render_widget(help, area);
    }
}

impl Default for ResultsScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExamConfig;
    use crate::models::{ExamSession, Question};
    use chrono::{Duration as ChronoDuration, Utc};
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn create_test_results() -> ExamResults {
        let start = Utc::now();
        let questions = vec![
            Question::new("Física", "q1", vec!["A".to_string(), "B".to_string()], 0),
            Question::new("Física", "q2", vec!["A".to_string(), "B".to_string()], 1),
            Question::new("Química", "q3", vec!["A".to_string(), "B".to_string()], 0),
        ];
        let mut session = ExamSession::new(ExamConfig::disciplinares(), questions, start);
        session.record_answer(0, 0);
        session.record_answer(1, 0);
        ExamResults::from_session(&session, start + ChronoDuration::seconds(95))
    }

    #[test]
    fn test_results_screen_creation() {
        let screen = ResultsScreen::new();
        assert_eq!(screen.selected_action(), ResultAction::Review);
        assert!(screen.export_message().is_none());
        assert!(screen.notice().is_none());
    }

    #[test]
    fn test_action_navigation() {
        let mut screen = ResultsScreen::new();

        screen.select_next_action();
        assert_eq!(screen.selected_action(), ResultAction::Export);
        screen.select_next_action();
        screen.select_next_action();
        assert_eq!(screen.selected_action(), ResultAction::Review); // Wraps around

        screen.select_previous_action();
        assert_eq!(screen.selected_action(), ResultAction::NewExam);
    }

    #[test]
    fn test_shortcut_keys() {
        let mut screen = ResultsScreen::new();
        assert_eq!(screen.handle_action(KeyAction::Review), Some(ResultAction::Review));
        assert_eq!(screen.handle_action(KeyAction::Export), Some(ResultAction::Export));
        assert_eq!(screen.handle_action(KeyAction::Restart), Some(ResultAction::NewExam));

        assert_eq!(screen.handle_action(KeyAction::Right), None);
        assert_eq!(screen.handle_action(KeyAction::Select), Some(ResultAction::Export));
    }

    #[test]
    fn test_export_messages_and_reset() {
        let mut screen = ResultsScreen::new();
        let files = ExportedFiles {
            json: PathBuf::from("out/a.json"),
            csv: PathBuf::from("out/a.csv"),
        };

        screen.complete_export(Ok(&files));
        assert_eq!(
            screen.export_message(),
            Some("Exported to out/a.json and out/a.csv")
        );

        screen.complete_export(Err("Failed to export results".to_string()));
        assert_eq!(screen.export_message(), Some("Failed to export results"));

        screen.set_notice("Time is up");
        screen.select_next_action();
        screen.reset();
        assert!(screen.export_message().is_none());
        assert!(screen.notice().is_none());
        assert_eq!(screen.selected_action(), ResultAction::Review);
    }

    #[test]
    fn test_render_summary() {
        let results = create_test_results();
        assert_eq!(results.score_percent, 33);

        let mut screen = ResultsScreen::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| screen.render(f, Some(&results))).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("33%"));
        assert!(content.contains("Física"));
        assert!(content.contains("Review Answers"));
    }
}
