//! Exam screen implementation
//!
//! Shows the countdown, the current question with its options, live
//! tallies and a grid of answered/unanswered indicators.

use crate::app::screens::centered_rect;
use crate::app::state::KeyAction;
use crate::exam::{ExamAction, ExamController};
use crate::models::{ExamSession, LiveStats};
use crate::util::{format_hms, progress_ratio};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

/// Indicators per row in the question grid
const GRID_COLUMNS: usize = 10;

/// Confirmation prompts shown over the exam
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamPrompt {
    Finish,
    Restart,
}

impl ExamPrompt {
    fn message(&self) -> &'static str {
        match self {
            Self::Finish => "Finish the exam now? (y/n)",
            Self::Restart => "Discard this exam and start over? (y/n)",
        }
    }

    fn action(&self) -> ExamAction {
        match self {
            Self::Finish => ExamAction::Finish,
            Self::Restart => ExamAction::Restart,
        }
    }
}

/// Exam screen component
#[derive(Debug, Default)]
pub struct ExamScreen {
    prompt: Option<ExamPrompt>,
}

impl ExamScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.prompt = None;
    }

    pub fn prompt(&self) -> Option<ExamPrompt> {
        self.prompt
    }

    /// Translate a key action into a controller action
    pub fn handle_action(&mut self, action: KeyAction) -> Option<ExamAction> {
        if let Some(prompt) = self.prompt {
            return match action {
                KeyAction::Confirm | KeyAction::Select => {
                    self.prompt = None;
                    Some(prompt.action())
                }
                KeyAction::Back | KeyAction::Restart => {
                    // 'n' doubles as "no" while a prompt is open
                    self.prompt = None;
                    None
                }
                _ => None,
            };
        }

        match action {
            KeyAction::Option(option) => Some(ExamAction::SelectCurrent(option)),
            KeyAction::Left => Some(ExamAction::Navigate(-1)),
            KeyAction::Right => Some(ExamAction::Navigate(1)),
            KeyAction::Up => Some(ExamAction::Navigate(-(GRID_COLUMNS as isize))),
            KeyAction::Down => Some(ExamAction::Navigate(GRID_COLUMNS as isize)),
            KeyAction::Select | KeyAction::Next => Some(ExamAction::NextOrFinish),
            KeyAction::Previous => Some(ExamAction::Navigate(-1)),
            KeyAction::Finish => {
                self.prompt = Some(ExamPrompt::Finish);
                None
            }
            KeyAction::Restart | KeyAction::Back => {
                self.prompt = Some(ExamPrompt::Restart);
                None
            }
            _ => None,
        }
    }

    pub fn render(&mut self, f: &mut Frame, controller: &ExamController) {
        let Some(session) = controller.session() else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Timer
                Constraint::Min(10),   // Question + sidebar
                Constraint::Length(3), // Help
            ])
            .split(f.size());

        self.render_header(f, chunks[0], session);
        self.render_timer(f, chunks[1], controller);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[2]);

        self.render_question(f, body[0], session);

        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(4)])
            .split(body[1]);

        self.render_stats(f, sidebar[0], controller.live_stats().unwrap_or_default());
        self.render_indicators(f, sidebar[1], session);
        self.render_help(f, chunks[3]);

        if let Some(prompt) = self.prompt {
            let area = centered_rect(50, 5, f.size());
            let popup = Paragraph::new(prompt.message())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .title("Confirm")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                );
            f.render_widget(Clear, area);
            f.render_widget(popup, area);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect, session: &ExamSession) {
        let title = format!(
            "EXANI-II {} - Question {} of {}",
            session.config().exam_type,
            session.current_index() + 1,
            session.len()
        );
        let header = Paragraph::new(title)
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        f.render_widget(header, area);
    }

    fn render_timer(&self, f: &mut Frame, area: Rect, controller: &ExamController) {
        let remaining = controller.remaining_seconds();
        let limit = controller
            .session()
            .map(|s| s.config().time_limit_seconds())
            .unwrap_or(0);
        let color = if controller.is_time_warning() {
            Color::Red
        } else {
            Color::Green
        };

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title("Time Remaining")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .gauge_style(Style::default().fg(color))
            .ratio(progress_ratio(remaining as usize, limit as usize))
            .label(format_hms(remaining));
        f.render_widget(gauge, area);
    }

    fn render_question(&self, f: &mut Frame, area: Rect, session: &ExamSession) {
        let Some(question) = session.current_question() else {
            return;
        };
        let chosen = session.answer(session.current_index());

        let mut lines = vec![
            Line::from(Span::styled(
                question.area.clone(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                question.text.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (i, option) in question.options.iter().enumerate() {
            let style = if chosen == Some(i) {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(format!("[{}] {}", i + 1, option), style)));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Question")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(paragraph, area);
    }

    fn render_stats(&self, f: &mut Frame, area: Rect, stats: LiveStats) {
        let lines = vec![
            Line::from(vec![
                Span::raw("Correct:  "),
                Span::styled(stats.correct.to_string(), Style::default().fg(Color::Green)),
            ]),
            Line::from(vec![
                Span::raw("Wrong:    "),
                Span::styled(stats.wrong.to_string(), Style::default().fg(Color::Red)),
            ]),
            Line::from(vec![
                Span::raw("Pending:  "),
                Span::styled(stats.skipped.to_string(), Style::default().fg(Color::Gray)),
            ]),
            Line::from(vec![
                Span::raw("Score:    "),
                Span::styled(
                    format!("{}%", stats.score_percent),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        let widget = Paragraph::new(lines).block(
            Block::default()
                .title("Live Stats")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(widget, area);
    }

    fn render_indicators(&self, f: &mut Frame, area: Rect, session: &ExamSession) {
        let lines: Vec<Line> = (0..session.len())
            .collect::<Vec<_>>()
            .chunks(GRID_COLUMNS)
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|&i| {
                        let mut style = if session.answer(i).is_some() {
                            Style::default().fg(Color::Green)
                        } else {
                            Style::default().fg(Color::DarkGray)
                        };
                        if i == session.current_index() {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        Span::styled(format!("{:>3}", i + 1), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let title = format!("Answered {}/{}", session.answered_count(), session.len());
        let widget = Paragraph::new(lines).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(widget, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help = Paragraph::new("1-3: Answer | ←→: Prev/Next | ↑↓: ±10 | Enter: Next | f: Finish | n: Restart")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(help, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExamConfig;
    use crate::models::QuestionBank;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_answer_and_navigation_mapping() {
        let mut screen = ExamScreen::new();
        assert_eq!(
            screen.handle_action(KeyAction::Option(2)),
            Some(ExamAction::SelectCurrent(2))
        );
        assert_eq!(
            screen.handle_action(KeyAction::Left),
            Some(ExamAction::Navigate(-1))
        );
        assert_eq!(
            screen.handle_action(KeyAction::Down),
            Some(ExamAction::Navigate(10))
        );
        assert_eq!(
            screen.handle_action(KeyAction::Select),
            Some(ExamAction::NextOrFinish)
        );
    }

    #[test]
    fn test_finish_requires_confirmation() {
        let mut screen = ExamScreen::new();
        assert_eq!(screen.handle_action(KeyAction::Finish), None);
        assert_eq!(screen.prompt(), Some(ExamPrompt::Finish));

        // answers are blocked while the prompt is open
        assert_eq!(screen.handle_action(KeyAction::Option(0)), None);

        assert_eq!(
            screen.handle_action(KeyAction::Confirm),
            Some(ExamAction::Finish)
        );
        assert_eq!(screen.prompt(), None);
    }

    #[test]
    fn test_restart_prompt_can_be_cancelled() {
        let mut screen = ExamScreen::new();
        screen.handle_action(KeyAction::Restart);
        assert_eq!(screen.prompt(), Some(ExamPrompt::Restart));

        assert_eq!(screen.handle_action(KeyAction::Back), None);
        assert_eq!(screen.prompt(), None);

        screen.handle_action(KeyAction::Back);
        assert_eq!(
            screen.handle_action(KeyAction::Confirm),
            Some(ExamAction::Restart)
        );
    }

    #[test]
    fn test_render_running_exam() {
        let bank = QuestionBank::builtin().unwrap();
        let mut controller = ExamController::new(bank, ExamConfig::default()).with_seed(1);
        controller
            .start_exam(ExamConfig::default().with_modules(["biologia"]).with_question_count(12))
            .unwrap();

        let mut screen = ExamScreen::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| screen.render(f, &controller)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Question 1 of 12"));
        assert!(content.contains("Answered 0/12"));
    }
}
