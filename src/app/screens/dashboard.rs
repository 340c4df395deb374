//! Dashboard screen implementation
//!
//! Lets the user pick an exam preset, toggle modules, and adjust the
//! time limit and question count before starting.

use crate::app::state::KeyAction;
use crate::config::{ExamConfig, ExamType};
use crate::models::{QuestionBank, MODULE_CATALOG};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Focusable fields, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardField {
    ExamType,
    Modules,
    TimeLimit,
    QuestionCount,
    Start,
}

impl DashboardField {
    pub fn all() -> [Self; 5] {
        [
            Self::ExamType,
            Self::Modules,
            Self::TimeLimit,
            Self::QuestionCount,
            Self::Start,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ExamType => "Exam Type",
            Self::Modules => "Modules",
            Self::TimeLimit => "Time Limit",
            Self::QuestionCount => "Questions",
            Self::Start => "Start Exam",
        }
    }
}

/// What the dashboard asks the app to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    Start(ExamConfig),
    Quit,
}

/// Dashboard screen component
#[derive(Debug)]
pub struct DashboardScreen {
    draft: ExamConfig,
    field: DashboardField,
    module_cursor: usize,
    module_state: ListState,
    error: Option<String>,
}

impl DashboardScreen {
    pub fn new(config: &ExamConfig) -> Self {
        Self {
            draft: config.clone(),
            field: DashboardField::ExamType,
            module_cursor: 0,
            module_state: ListState::default(),
            error: None,
        }
    }

    /// Reload the draft from the last used configuration
    pub fn load(&mut self, config: &ExamConfig) {
        self.draft = config.clone();
        self.error = None;
    }

    pub fn draft(&self) -> &ExamConfig {
        &self.draft
    }

    pub fn field(&self) -> DashboardField {
        self.field
    }

    pub fn module_cursor(&self) -> usize {
        self.module_cursor
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_action(&mut self, action: KeyAction) -> Option<DashboardCommand> {
        match action {
            KeyAction::Next => self.select_next_field(),
            KeyAction::Previous => self.select_previous_field(),
            KeyAction::Up => {
                if self.field == DashboardField::Modules && self.module_cursor > 0 {
                    self.module_cursor -= 1;
                } else {
                    self.select_previous_field();
                }
            }
            KeyAction::Down => {
                if self.field == DashboardField::Modules
                    && self.module_cursor + 1 < MODULE_CATALOG.len()
                {
                    self.module_cursor += 1;
                } else {
                    self.select_next_field();
                }
            }
            KeyAction::Left => self.adjust(false),
            KeyAction::Right => self.adjust(true),
            KeyAction::Select => {
                if self.field == DashboardField::Modules {
                    self.toggle_current_module();
                } else {
                    self.error = None;
                    return Some(DashboardCommand::Start(self.draft.clone()));
                }
            }
            KeyAction::Back => return Some(DashboardCommand::Quit),
            _ => {}
        }
        None
    }

    fn select_next_field(&mut self) {
        let fields = DashboardField::all();
        let index = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        if index + 1 < fields.len() {
            self.field = fields[index + 1];
        }
    }

    fn select_previous_field(&mut self) {
        let fields = DashboardField::all();
        let index = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        if index > 0 {
            self.field = fields[index - 1];
        }
    }

    fn adjust(&mut self, up: bool) {
        match self.field {
            DashboardField::ExamType => self.cycle_exam_type(up),
            DashboardField::TimeLimit => self.draft.step_time_limit(up),
            DashboardField::QuestionCount => self.draft.step_question_count(up),
            DashboardField::Modules | DashboardField::Start => {}
        }
    }

    /// Switching the exam type applies that preset wholesale
    fn cycle_exam_type(&mut self, forward: bool) {
        let types = ExamType::all();
        let index = types
            .iter()
            .position(|t| *t == self.draft.exam_type)
            .unwrap_or(0);
        let next = if forward {
            (index + 1) % types.len()
        } else {
            (index + types.len() - 1) % types.len()
        };
        self.draft = ExamConfig::preset(types[next]);
    }

    fn toggle_current_module(&mut self) {
        if let Some((module, _)) = MODULE_CATALOG.get(self.module_cursor) {
            self.draft.toggle_module(module);
            self.error = None;
        }
    }

    pub fn render(&mut self, f: &mut Frame, bank: &QuestionBank) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(12),   // Fields
                Constraint::Length(3), // Status
                Constraint::Length(3), // Help
            ])
            .split(f.size());

        self.render_title(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        self.render_fields(f, body[0]);
        self.render_modules(f, body[1], bank);
        self.render_status(f, chunks[2]);
        self.render_help(f, chunks[3]);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new("EXANI-II Simulator")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_fields(&self, f: &mut Frame, area: Rect) {
        let fields: Vec<DashboardField> = DashboardField::all()
            .into_iter()
            .filter(|field| *field != DashboardField::Modules)
            .collect();
        let constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
        let field_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (i, field) in fields.iter().enumerate() {
            let style = if *field == self.field {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            let text = match field {
                DashboardField::Start => format!("▶ {}", field.title()),
                _ => format!("{}: {}", field.title(), self.field_value(*field)),
            };
            let block = Block::default().borders(Borders::ALL).border_style(style);
            f.render_widget(Paragraph::new(text).style(style).block(block), field_chunks[i]);
        }
    }

    fn field_value(&self, field: DashboardField) -> String {
        match field {
            DashboardField::ExamType => format!("◀ {} ▶", self.draft.exam_type),
            DashboardField::Modules => format!("{} selected", self.draft.modules.len()),
            DashboardField::TimeLimit => format!("◀ {} min ▶", self.draft.time_limit_minutes),
            DashboardField::QuestionCount => format!("◀ {} ▶", self.draft.question_count),
            DashboardField::Start => String::new(),
        }
    }

    fn render_modules(&mut self, f: &mut Frame, area: Rect, bank: &QuestionBank) {
        let items: Vec<ListItem> = MODULE_CATALOG
            .iter()
            .map(|(id, name)| {
                let selected = self.draft.modules.contains(*id);
                let mark = if selected { "[x]" } else { "[ ]" };
                let available = bank.pool(id).len();
                let style = if available == 0 {
                    Style::default().fg(Color::DarkGray)
                } else if selected {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} {}", mark, name), style),
                    Span::styled(
                        format!("  ({} available)", available),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let focused = self.field == DashboardField::Modules;
        let border = if focused { Color::Cyan } else { Color::White };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(
                        "Modules ({})",
                        self.field_value(DashboardField::Modules)
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        self.module_state
            .select(if focused { Some(self.module_cursor) } else { None });
        f.render_stateful_widget(list, area, &mut self.module_state);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let (text, color) = match &self.error {
            Some(message) => (message.clone(), Color::Red),
            None if self.field == DashboardField::ExamType => (
                self.draft.exam_type.description().to_string(),
                Color::Gray,
            ),
            None => (
                format!(
                    "{} · {} questions · {} min",
                    self.draft.exam_type, self.draft.question_count, self.draft.time_limit_minutes
                ),
                Color::Green,
            ),
        };
        let status = Paragraph::new(text)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(status, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = match self.field {
            DashboardField::Modules => "↑↓: Move | Enter/Space: Toggle | Tab: Next field | q: Quit",
            DashboardField::Start => "Enter: Start | ↑↓/Tab: Fields | q: Quit",
            _ => "←→: Change | ↑↓/Tab: Fields | Enter: Start | q: Quit",
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(help, area);
    }
}
