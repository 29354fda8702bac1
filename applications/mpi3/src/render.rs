//! Display output
//!
//! The controller hands a finished screen to a `Renderer`; drawing and
//! pushing pixels to the panel live behind that trait.

use chrono::Timelike;
use mpi3_navigation::RedrawScope;
use std::io::{self, Write};
use tracing::warn;

/// Marker drawn before each non-cursor row
const ROW_MARKER: &str = "  ";
/// Marker drawn before the cursor row
const CURSOR_MARKER: &str = "> ";

/// Draws screens on the physical display
pub trait Renderer: Send {
    /// Draw `rows` under `title` with the cursor on `rows[cursor]`
    ///
    /// `Partial` allows a fast refresh of the changed rows only.
    fn render(&mut self, title: &str, rows: &[String], cursor: usize, scope: RedrawScope);

    /// Replace the screen with the error image and `message`
    fn render_error(&mut self, message: &str);
}

/// Title line: playback glyph, UI-mode marker, clock and volume
pub fn title_line(glyph: char, marker: Option<char>, time: &impl Timelike, volume: u8) -> String {
    format!(
        "{glyph}{}   {:02}:{:02}   {volume}",
        marker.unwrap_or(' '),
        time.hour(),
        time.minute()
    )
}

/// Renders screens as text, for bench use without a panel
pub struct ConsoleRenderer<W: Write + Send> {
    out: W,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_screen(
        &mut self,
        title: &str,
        rows: &[String],
        cursor: usize,
        scope: RedrawScope,
    ) -> io::Result<()> {
        if scope == RedrawScope::Complete {
            writeln!(self.out, "{}", "=".repeat(title.chars().count().max(20)))?;
        }
        writeln!(self.out, "{title}")?;
        for (index, row) in rows.iter().enumerate() {
            let marker = if index == cursor {
                CURSOR_MARKER
            } else {
                ROW_MARKER
            };
            writeln!(self.out, "{marker}{row}")?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, title: &str, rows: &[String], cursor: usize, scope: RedrawScope) {
        if let Err(e) = self.write_screen(title, rows, cursor, scope) {
            warn!(error = %e, "Console render failed");
        }
    }

    fn render_error(&mut self, message: &str) {
        let result = writeln!(self.out, "[X] {message}").and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "Console render failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn title_layout() {
        let time = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        assert_eq!(title_line('X', Some('V'), &time, 20), "XV   09:05   20");
        assert_eq!(title_line(' ', None, &time, 100), "     09:05   100");
    }

    #[test]
    fn console_marks_cursor_row() {
        let mut renderer = ConsoleRenderer::new(Vec::new());
        let rows = vec!["Songs".to_string(), "Artists".to_string()];
        renderer.render("title", &rows, 1, RedrawScope::Partial);

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "title\n  Songs\n> Artists\n");
    }

    #[test]
    fn complete_render_starts_with_rule() {
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer.render("t", &[], 0, RedrawScope::Complete);
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.starts_with("===================="));
    }

    #[test]
    fn error_screen() {
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer.render_error("no library");
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "[X] no library\n");
    }
}
