//! Main application controller
//!
//! Runs the draw/input loop, forwards key actions to the active screen and
//! applies the resulting commands to the exam controller.

use crate::{
    app::{
        screens::{
            DashboardCommand, DashboardScreen, ExamScreen, ResultAction, ResultsScreen,
            ReviewCommand, ReviewScreen,
        },
        state::{key_to_action, KeyAction},
        tui::{is_size_adequate, Tui, TuiEvent, MIN_HEIGHT, MIN_WIDTH},
    },
    config::{export::ReportExporter, ExamConfig},
    error,
    exam::ExamController,
    models::Screen,
    ExaniError, Result,
};
use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracing::{error, info, warn};

/// Per-screen UI state plus the exam controller
pub struct AppCore {
    controller: ExamController,
    exporter: ReportExporter,
    dashboard: DashboardScreen,
    exam_screen: ExamScreen,
    results_screen: ResultsScreen,
    review_screen: ReviewScreen,
    should_quit: bool,
    fatal: Option<ExaniError>,
}

impl AppCore {
    pub fn new(controller: ExamController, exporter: ReportExporter) -> Self {
        let dashboard = DashboardScreen::new(controller.config());
        Self {
            controller,
            exporter,
            dashboard,
            exam_screen: ExamScreen::new(),
            results_screen: ResultsScreen::new(),
            review_screen: ReviewScreen::new(),
            should_quit: false,
            fatal: None,
        }
    }

    pub fn controller(&self) -> &ExamController {
        &self.controller
    }

    pub fn dashboard(&self) -> &DashboardScreen {
        &self.dashboard
    }

    pub fn results_screen(&self) -> &ResultsScreen {
        &self.results_screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Error that ended the session, if any
    pub fn take_fatal(&mut self) -> Option<ExaniError> {
        self.fatal.take()
    }

    /// Configuration to persist on exit
    pub fn last_config(&self) -> &ExamConfig {
        self.controller.config()
    }

    /// Advance the timer; shows a notice when it ends the exam
    pub fn on_tick(&mut self) {
        let before = self.controller.screen();
        if self.controller.tick() {
            self.sync_screens(before);
            self.results_screen.set_notice("Time is up");
        }
    }

    pub fn handle_action(&mut self, action: KeyAction) {
        if action == KeyAction::Quit {
            self.should_quit = true;
            return;
        }

        let before = self.controller.screen();
        match before {
            Screen::Dashboard => self.handle_dashboard(action),
            Screen::Exam => self.handle_exam(action),
            Screen::Results => self.handle_results(action),
            Screen::Review => self.handle_review(action),
        }
        self.sync_screens(before);
    }

    fn handle_dashboard(&mut self, action: KeyAction) {
        match self.dashboard.handle_action(action) {
            Some(DashboardCommand::Start(config)) => {
                if let Err(e) = self.controller.start_exam(config) {
                    if let Some(message) = self.fail("exam could not start", e) {
                        self.dashboard.set_error(message);
                    }
                }
            }
            Some(DashboardCommand::Quit) => self.should_quit = true,
            None => {}
        }
    }

    fn handle_exam(&mut self, action: KeyAction) {
        if let Some(exam_action) = self.exam_screen.handle_action(action) {
            if let Err(e) = self.controller.dispatch(exam_action) {
                self.fail("exam action failed", e);
            }
        }
    }

    fn handle_results(&mut self, action: KeyAction) {
        match self.results_screen.handle_action(action) {
            Some(ResultAction::Review) => self.controller.review_answers(),
            Some(ResultAction::Export) => self.export(),
            Some(ResultAction::NewExam) => self.controller.restart_exam(),
            None => {}
        }
    }

    fn handle_review(&mut self, action: KeyAction) {
        let Some(session) = self.controller.session() else {
            return;
        };
        match self.review_screen.handle_action(action, session) {
            Some(ReviewCommand::BackToResults) => self.controller.back_to_results(),
            Some(ReviewCommand::NewExam) => self.controller.restart_exam(),
            None => {}
        }
    }

    fn export(&mut self) {
        let outcome = self
            .controller
            .report()
            .and_then(|report| self.exporter.export(&report));
        match outcome {
            Ok(files) => self.results_screen.complete_export(Ok(&files)),
            Err(e) => {
                if let Some(message) = self.fail("export failed", e) {
                    self.results_screen.complete_export(Err(message));
                }
            }
        }
    }

    /// Recoverable errors come back as a status message; anything else
    /// ends the session and is returned from `App::run`.
    fn fail(&mut self, context: &str, e: ExaniError) -> Option<String> {
        if error::is_recoverable(&e) {
            warn!(error = %e, "{}", context);
            return Some(error::user_friendly_message(&e));
        }

        error!(error = %e, "{}", context);
        self.fatal = Some(e);
        self.should_quit = true;
        None
    }

    /// Reset screen-local state when the controller changes screen
    fn sync_screens(&mut self, before: Screen) {
        let now = self.controller.screen();
        if now == before {
            return;
        }
        match now {
            Screen::Dashboard => self.dashboard.load(self.controller.config()),
            Screen::Exam => self.exam_screen.reset(),
            Screen::Results if before == Screen::Exam => self.results_screen.reset(),
            Screen::Results => {}
            Screen::Review => self.review_screen.reset(),
        }
    }

    fn render(&mut self, f: &mut ratatui::Frame) {
        let size = f.size();
        if !is_size_adequate(size) {
            let warning = Paragraph::new(format!(
                "Terminal too small: {}x{} (need {}x{})",
                size.width, size.height, MIN_WIDTH, MIN_HEIGHT
            ))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(warning, size);
            return;
        }

        match self.controller.screen() {
            Screen::Dashboard => self.dashboard.render(f, self.controller.bank()),
            Screen::Exam => self.exam_screen.render(f, &self.controller),
            Screen::Results => self.results_screen.render(f, self.controller.results()),
            Screen::Review => self.review_screen.render(f, self.controller.session()),
        }
    }
}

/// TUI application: the terminal plus the application core
pub struct App {
    tui: Tui,
    core: AppCore,
}

impl App {
    pub fn new(controller: ExamController, exporter: ReportExporter) -> Result<Self> {
        Ok(Self {
            tui: Tui::new()?,
            core: AppCore::new(controller, exporter),
        })
    }

    /// Run until the user quits; the terminal is restored on every exit path
    pub fn run(&mut self) -> Result<()> {
        self.tui
            .init()
            .map_err(|e| ExaniError::TuiError(format!("Failed to initialize terminal: {}", e)))?;
        info!("tui started");
        let outcome = self.event_loop();
        self.tui
            .restore()
            .map_err(|e| ExaniError::TuiError(format!("Failed to restore terminal: {}", e)))?;
        info!("tui stopped");
        outcome
    }

    pub fn core(&self) -> &AppCore {
        &self.core
    }

    fn event_loop(&mut self) -> Result<()> {
        while !self.core.should_quit() {
            let core = &mut self.core;
            self.tui.draw(|f| core.render(f))?;

            match self.tui.next_event()? {
                Some(TuiEvent::Key(key)) => self.core.handle_action(key_to_action(key)),
                Some(TuiEvent::Tick) => self.core.on_tick(),
                Some(TuiEvent::Resize) | None => {}
            }
        }

        if let Some(e) = self.core.take_fatal() {
            return Err(e);
        }
        Ok(())
    }
}
