//! Terminal management
//!
//! Owns the crossterm backend, alternate screen and raw mode, and turns
//! terminal input into key or tick events. The tick drives the exam timer.

use crossterm::{
    event::{self, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

/// Default interval between timer ticks
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// Minimum terminal size the screens are laid out for
pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 24;

/// Input produced by one poll of the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Tracks when the next tick is due
#[derive(Debug, Clone)]
pub struct TickTimer {
    last_tick: Instant,
    tick_rate: Duration,
}

impl TickTimer {
    pub fn new(tick_rate: Duration) -> Self {
        Self {
            last_tick: Instant::now(),
            tick_rate,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Time left until the next tick is due
    pub fn timeout(&self) -> Duration {
        self.tick_rate
            .checked_sub(self.last_tick.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Consume a due tick, if any
    pub fn take_tick(&mut self) -> bool {
        if self.last_tick.elapsed() >= self.tick_rate {
            self.last_tick = Instant::now();
            true
        } else {
            false
        }
    }
}

/// Terminal wrapper that manages the crossterm backend
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    timer: TickTimer,
}

impl Tui {
    pub fn new() -> io::Result<Self> {
        Self::with_tick_rate(TICK_RATE)
    }

    pub fn with_tick_rate(tick_rate: Duration) -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            timer: TickTimer::new(tick_rate),
        })
    }

    /// Enter raw mode and the alternate screen
    pub fn init(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Restore terminal to original state
    pub fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    /// Wait for input until the next tick is due
    pub fn next_event(&mut self) -> io::Result<Option<TuiEvent>> {
        if event::poll(self.timer.timeout())? {
            match event::read()? {
                Event::Key(key) => return Ok(Some(TuiEvent::Key(key))),
                Event::Resize(_, _) => return Ok(Some(TuiEvent::Resize)),
                _ => {}
            }
        }

        if self.timer.take_tick() {
            return Ok(Some(TuiEvent::Tick));
        }

        Ok(None)
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Whether an area is large enough to lay out the screens
pub fn is_size_adequate(area: Rect) -> bool {
    area.width >= MIN_WIDTH && area.height >= MIN_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_adequacy() {
        assert!(is_size_adequate(Rect::new(0, 0, MIN_WIDTH, MIN_HEIGHT)));
        assert!(!is_size_adequate(Rect::new(0, 0, MIN_WIDTH - 1, MIN_HEIGHT)));
        assert!(!is_size_adequate(Rect::new(0, 0, MIN_WIDTH, MIN_HEIGHT - 1)));
    }

    #[test]
    fn test_default_tick_rate() {
        assert_eq!(TickTimer::new(TICK_RATE).tick_rate(), Duration::from_millis(250));
    }

    #[test]
    fn test_timeout_never_exceeds_tick_rate() {
        let timer = TickTimer::new(Duration::from_secs(60));
        assert!(timer.timeout() <= Duration::from_secs(60));
    }

    #[test]
    fn test_zero_rate_ticks_immediately() {
        let mut timer = TickTimer::new(Duration::ZERO);
        assert_eq!(timer.timeout(), Duration::ZERO);
        assert!(timer.take_tick());
    }

    #[test]
    fn test_tick_not_due_yet() {
        let mut timer = TickTimer::new(Duration::from_secs(3600));
        assert!(!timer.take_tick());
    }
}
