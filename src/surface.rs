//! Display surface abstraction over the terminal.
//!
//! The render driver talks to a `DisplaySurface`; the crossterm-backed
//! implementation owns raw mode and the alternate screen, and a capturing
//! implementation stands in for tests. Theming happens here: the map frame
//! carries semantic cell kinds and the surface picks glyphs and colors per
//! resolved theme.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};

use crate::map::{CellKind, Frame};
use crate::settings::ResolvedTheme;

/// Input and environment events the render loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Viewport changed to the given (columns, rows).
    Resized(u16, u16),
    /// A printable key.
    Char(char),
    Backspace,
    Enter,
    Escape,
    /// Ctrl+C or other terminate request.
    Quit,
}

/// Where frames and text end up.
pub trait DisplaySurface {
    /// Current viewport in (columns, rows). A zero dimension means the
    /// viewport is not usable yet.
    fn dimensions(&self) -> Result<(u16, u16)>;

    /// Draw a composed map frame, themed.
    fn draw_frame(&mut self, frame: &Frame, theme: ResolvedTheme) -> Result<()>;

    /// Draw a line of text at a cell position, themed.
    fn draw_text(&mut self, x: u16, y: u16, text: &str, theme: ResolvedTheme) -> Result<()>;

    /// Flush everything drawn since the last present.
    fn present(&mut self) -> Result<()>;

    /// Wait up to `timeout` for the next event.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<SurfaceEvent>>;
}

/// Glyph for one cell kind.
fn cell_glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Ocean | CellKind::NightOcean => ' ',
        CellKind::Land | CellKind::NightLand => '▒',
        CellKind::Terminator => '·',
    }
}

/// Foreground/background pair for one cell kind under a theme.
fn cell_colors(kind: CellKind, theme: ResolvedTheme) -> (Color, Color) {
    match theme {
        ResolvedTheme::Light => match kind {
            CellKind::Ocean => (Color::Reset, Color::Reset),
            CellKind::Land => (Color::DarkGreen, Color::Reset),
            CellKind::NightOcean => (Color::Reset, Color::DarkGrey),
            CellKind::NightLand => (Color::Green, Color::DarkGrey),
            CellKind::Terminator => (Color::DarkYellow, Color::Reset),
        },
        ResolvedTheme::Dark => match kind {
            CellKind::Ocean => (Color::Reset, Color::Reset),
            CellKind::Land => (Color::Green, Color::Reset),
            CellKind::NightOcean => (Color::Reset, Color::Black),
            CellKind::NightLand => (Color::DarkGreen, Color::Black),
            CellKind::Terminator => (Color::Yellow, Color::Reset),
        },
    }
}

fn text_color(theme: ResolvedTheme) -> Color {
    match theme {
        ResolvedTheme::Light => Color::Black,
        ResolvedTheme::Dark => Color::White,
    }
}

/// Crossterm-backed surface. Construction enters raw mode and the alternate
/// screen; drop restores the terminal even on error paths.
pub struct TerminalSurface {
    stdout: Stdout,
    silenced_logging: bool,
}

impl TerminalSurface {
    pub fn new() -> Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)
            .context("failed to enter alternate screen")?;

        // Log lines on stdout would tear the map while we own the screen;
        // file-routed logging is unaffected and stays on
        let silenced_logging = !crate::logger::is_file_logging();
        if silenced_logging {
            crate::logger::Log::set_enabled(false);
        }

        Ok(Self {
            stdout,
            silenced_logging,
        })
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        // Restore best-effort; the process is exiting anyway
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        if self.silenced_logging {
            crate::logger::Log::set_enabled(true);
        }
    }
}

impl DisplaySurface for TerminalSurface {
    fn dimensions(&self) -> Result<(u16, u16)> {
        terminal::size().context("failed to query terminal size")
    }

    fn draw_frame(&mut self, frame: &Frame, theme: ResolvedTheme) -> Result<()> {
        queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        for y in 0..frame.height {
            queue!(self.stdout, cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let kind = frame.get(x, y);
                let (fg, bg) = cell_colors(kind, theme);
                queue!(
                    self.stdout,
                    SetForegroundColor(fg),
                    SetBackgroundColor(bg),
                    Print(cell_glyph(kind))
                )?;
            }
        }
        queue!(
            self.stdout,
            SetForegroundColor(Color::Reset),
            SetBackgroundColor(Color::Reset)
        )?;
        Ok(())
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, theme: ResolvedTheme) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            SetForegroundColor(text_color(theme)),
            Print(text),
            SetForegroundColor(Color::Reset)
        )?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.stdout.flush().context("failed to flush frame")
    }

    fn poll_event(&mut self, timeout: Duration) -> Result<Option<SurfaceEvent>> {
        if !event::poll(timeout).context("failed to poll terminal events")? {
            return Ok(None);
        }
        let event = event::read().context("failed to read terminal event")?;
        Ok(translate_event(event))
    }
}

fn translate_event(event: Event) -> Option<SurfaceEvent> {
    match event {
        Event::Resize(width, height) => Some(SurfaceEvent::Resized(width, height)),
        Event::Key(KeyEvent {
            code, modifiers, ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(SurfaceEvent::Quit)
            }
            KeyCode::Char(c) => Some(SurfaceEvent::Char(c)),
            KeyCode::Backspace => Some(SurfaceEvent::Backspace),
            KeyCode::Enter => Some(SurfaceEvent::Enter),
            KeyCode::Esc => Some(SurfaceEvent::Escape),
            _ => None,
        },
        _ => None,
    }
}

/// In-memory surface for tests: scripted events in, captured output out.
#[cfg(any(test, feature = "testing-support"))]
pub mod capture {
    use std::collections::VecDeque;

    use super::*;

    pub struct CapturingSurface {
        pub width: u16,
        pub height: u16,
        pub events: VecDeque<SurfaceEvent>,
        pub frames: Vec<Frame>,
        pub texts: Vec<(u16, u16, String)>,
        pub presents: usize,
    }

    impl CapturingSurface {
        pub fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                events: VecDeque::new(),
                frames: Vec::new(),
                texts: Vec::new(),
                presents: 0,
            }
        }

        pub fn push_event(&mut self, event: SurfaceEvent) {
            self.events.push_back(event);
        }

        pub fn last_frame(&self) -> Option<&Frame> {
            self.frames.last()
        }
    }

    impl DisplaySurface for CapturingSurface {
        fn dimensions(&self) -> Result<(u16, u16)> {
            Ok((self.width, self.height))
        }

        fn draw_frame(&mut self, frame: &Frame, _theme: ResolvedTheme) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn draw_text(&mut self, x: u16, y: u16, text: &str, _theme: ResolvedTheme) -> Result<()> {
            self.texts.push((x, y, text.to_string()));
            Ok(())
        }

        fn present(&mut self) -> Result<()> {
            self.presents += 1;
            Ok(())
        }

        fn poll_event(&mut self, _timeout: Duration) -> Result<Option<SurfaceEvent>> {
            Ok(self.events.pop_front())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_translates_to_quit() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(translate_event(event), Some(SurfaceEvent::Quit));
    }

    #[test]
    fn plain_keys_pass_through() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(translate_event(event), Some(SurfaceEvent::Char('q')));

        let resize = Event::Resize(100, 30);
        assert_eq!(translate_event(resize), Some(SurfaceEvent::Resized(100, 30)));
    }

    #[test]
    fn every_cell_kind_has_a_glyph_and_colors() {
        for kind in [
            CellKind::Ocean,
            CellKind::Land,
            CellKind::NightOcean,
            CellKind::NightLand,
            CellKind::Terminator,
        ] {
            let _ = cell_glyph(kind);
            let _ = cell_colors(kind, ResolvedTheme::Light);
            let _ = cell_colors(kind, ResolvedTheme::Dark);
        }
    }
}
