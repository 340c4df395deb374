//! Review screen implementation
//!
//! Lists the questions of a finished exam, filtered by outcome and area,
//! and shows the selected question with the user's answer and the correct one.

use crate::app::state::KeyAction;
use crate::models::{ExamSession, Outcome, OutcomeFilter};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// What the review asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    BackToResults,
    NewExam,
}

/// Review screen component
#[derive(Debug)]
pub struct ReviewScreen {
    filter: OutcomeFilter,
    area: Option<String>,
    selected_index: usize,
    list_state: ListState,
}

impl ReviewScreen {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            filter: OutcomeFilter::All,
            area: None,
            selected_index: 0,
            list_state,
        }
    }

    /// Show every question again, first one selected
    pub fn reset(&mut self) {
        self.filter = OutcomeFilter::All;
        self.area = None;
        self.select(0);
    }

    pub fn filter(&self) -> OutcomeFilter {
        self.filter
    }

    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Session indices visible under the current filters
    pub fn visible(&self, session: &ExamSession) -> Vec<usize> {
        session.filter_indices(self.filter, self.area.as_deref())
    }

    /// Session index of the highlighted question
    pub fn selected_question(&self, session: &ExamSession) -> Option<usize> {
        self.visible(session).get(self.selected_index).copied()
    }

    pub fn handle_action(&mut self, action: KeyAction, session: &ExamSession) -> Option<ReviewCommand> {
        match action {
            KeyAction::Up => self.select_previous(self.visible(session).len()),
            KeyAction::Down => self.select_next(self.visible(session).len()),
            KeyAction::Next | KeyAction::Right => {
                self.filter = self.filter.next();
                self.select(0);
            }
            KeyAction::Area => {
                self.cycle_area(session);
                self.select(0);
            }
            KeyAction::Back | KeyAction::Left => return Some(ReviewCommand::BackToResults),
            KeyAction::Restart => return Some(ReviewCommand::NewExam),
            _ => {}
        }
        None
    }

    fn select(&mut self, index: usize) {
        self.selected_index = index;
        self.list_state.select(Some(index));
    }

    fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let index = if self.selected_index > 0 {
            self.selected_index - 1
        } else {
            len - 1
        };
        self.select(index);
    }

    fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let index = if self.selected_index + 1 < len {
            self.selected_index + 1
        } else {
            0
        };
        self.select(index);
    }

    /// None -> first area -> ... -> last area -> None
    fn cycle_area(&mut self, session: &ExamSession) {
        let areas = session.areas();
        self.area = match &self.area {
            None => areas.first().map(|a| a.to_string()),
            Some(current) => areas
                .iter()
                .position(|a| a == current)
                .and_then(|i| areas.get(i + 1))
                .map(|a| a.to_string()),
        };
    }

    pub fn render(&mut self, f: &mut Frame, session: Option<&ExamSession>) {
        let Some(session) = session else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(f.size());

        self.render_title(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        let visible = self.visible(session);
        self.render_list(f, body[0], session, &visible);
        self.render_detail(f, body[1], session, visible.get(self.selected_index).copied());
        self.render_help(f, chunks[2]);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let title = format!(
            "Answer Review - {} / {}",
            self.filter.display_text(),
            self.area.as_deref().unwrap_or("All areas")
        );
        let title = Paragraph::new(title)
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect, session: &ExamSession, visible: &[usize]) {
        let items: Vec<ListItem> = if visible.is_empty() {
            vec![ListItem::new("No questions match")]
        } else {
            visible
                .iter()
                .map(|&i| {
                    let (mark, color) = outcome_mark(session.outcome(i));
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{} ", mark), Style::default().fg(color)),
                        Span::raw(format!("{:>3}. {}", i + 1, session.questions()[i].area)),
                    ]))
                })
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("{} questions", visible.len()))
                    .borders(Borders::ALL),
            )
            .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_detail(&self, f: &mut Frame, area: Rect, session: &ExamSession, index: Option<usize>) {
        let block = Block::default()
            .title("Detail")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let Some(index) = index else {
            f.render_widget(Paragraph::new("").block(block), area);
            return;
        };
        let question = &session.questions()[index];
        let chosen = session.answer(index);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("#{} · {}", index + 1, question.area),
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
            let (prefix, style) = if i == question.correct_index {
                ("✓", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else if chosen == Some(i) {
                ("✗", Style::default().fg(Color::Red))
            } else {
                (" ", Style::default())
            };
            lines.push(Line::from(Span::styled(format!("{} {}", prefix, option), style)));
        }

        lines.push(Line::from(""));
        let (mark, color) = outcome_mark(session.outcome(index));
        let verdict = match session.outcome(index) {
            Outcome::Correct => "Correct",
            Outcome::Wrong => "Wrong",
            Outcome::Skipped => "Not answered",
        };
        lines.push(Line::from(Span::styled(
            format!("{} {}", mark, verdict),
            Style::default().fg(color),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let text = Paragraph::new("↑↓: Navigate  Tab: Outcome filter  a: Area  Esc: Results  n: New exam")
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(text, area);
    }
}

impl Default for ReviewScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn outcome_mark(outcome: Outcome) -> (&'static str, Color) {
    match outcome {
        Outcome::Correct => ("✓", Color::Green),
        Outcome::Wrong => ("✗", Color::Red),
        Outcome::Skipped => ("·", Color::DarkGray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExamConfig;
    use crate::models::Question;
    use chrono::Utc;
    use ratatui::{backend::TestBackend, Terminal};

    fn session() -> ExamSession {
        let options = || vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let questions = vec![
            Question::new("Biología", "b1", options(), 0),
            Question::new("Física", "f1", options(), 1),
            Question::new("Biología", "b2", options(), 2),
            Question::new("Química", "q1", options(), 0),
        ];
        let mut session = ExamSession::new(ExamConfig::disciplinares(), questions, Utc::now());
        session.record_answer(0, 0); // correct
        session.record_answer(1, 0); // wrong
        session.record_answer(2, 2); // correct
        session
    }

    #[test]
    fn test_navigation_wraps() {
        let session = session();
        let mut screen = ReviewScreen::new();
        assert_eq!(screen.selected_question(&session), Some(0));

        screen.handle_action(KeyAction::Up, &session);
        assert_eq!(screen.selected_question(&session), Some(3));

        screen.handle_action(KeyAction::Down, &session);
        assert_eq!(screen.selected_question(&session), Some(0));
    }

    #[test]
    fn test_outcome_filter_cycles() {
        let session = session();
        let mut screen = ReviewScreen::new();

        screen.handle_action(KeyAction::Next, &session);
        assert_eq!(screen.filter(), OutcomeFilter::Correct);
        assert_eq!(screen.visible(&session), vec![0, 2]);

        screen.handle_action(KeyAction::Next, &session);
        assert_eq!(screen.visible(&session), vec![1]);

        screen.handle_action(KeyAction::Next, &session);
        assert_eq!(screen.filter(), OutcomeFilter::Skipped);
        assert_eq!(screen.visible(&session), vec![3]);

        screen.handle_action(KeyAction::Next, &session);
        assert_eq!(screen.filter(), OutcomeFilter::All);
    }

    #[test]
    fn test_area_filter_cycles_through_session_areas() {
        let session = session();
        let mut screen = ReviewScreen::new();

        screen.handle_action(KeyAction::Down, &session);
        screen.handle_action(KeyAction::Area, &session);
        assert_eq!(screen.area(), Some("Biología"));
        assert_eq!(screen.selected_index(), 0);
        assert_eq!(screen.visible(&session), vec![0, 2]);

        screen.handle_action(KeyAction::Area, &session);
        assert_eq!(screen.area(), Some("Física"));
        screen.handle_action(KeyAction::Area, &session);
        assert_eq!(screen.area(), Some("Química"));
        screen.handle_action(KeyAction::Area, &session);
        assert_eq!(screen.area(), None);
    }

    #[test]
    fn test_empty_filter_result() {
        let session = session();
        let mut screen = ReviewScreen::new();
        screen.handle_action(KeyAction::Area, &session); // Biología
        screen.handle_action(KeyAction::Next, &session);
        screen.handle_action(KeyAction::Next, &session); // Wrong

        assert!(screen.visible(&session).is_empty());
        assert_eq!(screen.selected_question(&session), None);
        screen.handle_action(KeyAction::Down, &session);
        assert_eq!(screen.selected_index(), 0);
    }

    #[test]
    fn test_commands() {
        let session = session();
        let mut screen = ReviewScreen::new();
        assert_eq!(
            screen.handle_action(KeyAction::Back, &session),
            Some(ReviewCommand::BackToResults)
        );
        assert_eq!(
            screen.handle_action(KeyAction::Restart, &session),
            Some(ReviewCommand::NewExam)
        );
    }

    #[test]
    fn test_render_detail() {
        let session = session();
        let mut screen = ReviewScreen::new();
        screen.handle_action(KeyAction::Down, &session);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| screen.render(f, Some(&session))).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Answer Review"));
        assert!(content.contains("f1"));
        assert!(content.contains("Wrong"));
    }
}
