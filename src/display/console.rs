use std::io::{self, Write};

use ansi_term::{Colour, Style};
use tracing::warn;

use super::{headless::HeadlessDisplay, DisplaySurface, Tone, Widget, WidgetId, WidgetLine};

/// Terminal dashboard. Keeps one status line updated in place and prints every new report
/// confirmation above it.
pub struct ConsoleDisplay {
    widgets: HeadlessDisplay,
    /// Log lines already printed, counted the same way as [Widget::appended].
    printed: u64,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self {
            widgets: HeadlessDisplay::full(),
            printed: 0,
        }
    }

    fn text(&self, id: WidgetId) -> &str {
        self.widgets.text(id).unwrap_or_default()
    }

    fn status_line(&self) -> String {
        let tracking = self.widgets.widget(WidgetId::StatusDot).is_some_and(|w| w.active);
        let status = if tracking {
            Colour::Green.bold().paint("● tracking")
        } else {
            Colour::Red.bold().paint("○ paused  ")
        };
        let bar = self
            .widgets
            .widget(WidgetId::ProductivityBar)
            .map(render_bar)
            .unwrap_or_default();

        format!(
            "{status} {} | M: {} K: {} | idle {}s | {} {} | {} | {}",
            self.text(WidgetId::SessionTime),
            self.text(WidgetId::MouseCount),
            self.text(WidgetId::KeystrokeCount),
            self.text(WidgetId::IdleTime),
            self.text(WidgetId::ProductivityScore),
            bar,
            Style::new().dimmed().paint(self.text(WidgetId::ActiveWindow)),
            Style::new().dimmed().paint(self.text(WidgetId::DeviceId)),
        )
    }

    /// Lines appended since the last print, oldest first. Lines that already scrolled out of the
    /// list are skipped.
    fn new_confirmations(&self) -> Vec<&WidgetLine> {
        let Some(log) = self.widgets.widget(WidgetId::LogList) else {
            return Vec::new();
        };
        let unseen = log.appended.saturating_sub(self.printed);
        let unseen = usize::try_from(unseen).map_or(log.lines.len(), |n| n.min(log.lines.len()));
        log.lines[..unseen].iter().rev().collect()
    }

    fn write(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for line in self.new_confirmations() {
            writeln!(stdout, "\r\x1b[2K{}", tone_style(line.tone).paint(&line.text))?;
        }
        write!(stdout, "\r\x1b[2K{}", self.status_line())?;
        stdout.flush()?;

        if let Some(log) = self.widgets.widget(WidgetId::LogList) {
            self.printed = log.appended;
        }
        Ok(())
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for ConsoleDisplay {
    fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.widget_mut(id)
    }

    fn commit(&mut self) {
        if let Err(e) = self.write() {
            warn!("Failed to render dashboard {e:?}");
        }
    }
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Neutral => Style::new(),
        Tone::Success => Colour::Green.normal(),
        Tone::Warning => Colour::Yellow.normal(),
        Tone::Danger => Colour::Red.normal(),
    }
}

const BAR_CELLS: u64 = 10;

fn render_bar(widget: &Widget) -> String {
    let Some(fill) = widget.fill else {
        return String::new();
    };
    let filled = (fill.min(100) * BAR_CELLS / 100) as usize;
    let empty = BAR_CELLS as usize - filled;
    tone_style(widget.tone)
        .paint(format!("[{}{}]", "#".repeat(filled), "-".repeat(empty)))
        .to_string()
}
