//! Read-only display surface of the tracker. Widgets are optional: a surface may host any subset
//! of [WidgetId] and every update is skipped for a widget that isn't there.

pub mod console;
pub mod headless;

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::{
    report::log::{Badge, ReportLog},
    tracker::accountant::{IntervalCounters, TrackingState},
    utils::{
        productivity::{ProductivityScore, ProductivityTier},
        time::{format_elapsed, format_local_time},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WidgetId {
    MouseCount,
    KeystrokeCount,
    IdleTime,
    ActiveWindow,
    ProductivityScore,
    ProductivityBar,
    StatusDot,
    StatusText,
    TrackingCard,
    ToggleButton,
    SessionTime,
    StartTime,
    LogList,
    DeviceId,
}

impl WidgetId {
    pub const ALL: [WidgetId; 14] = [
        WidgetId::MouseCount,
        WidgetId::KeystrokeCount,
        WidgetId::IdleTime,
        WidgetId::ActiveWindow,
        WidgetId::ProductivityScore,
        WidgetId::ProductivityBar,
        WidgetId::StatusDot,
        WidgetId::StatusText,
        WidgetId::TrackingCard,
        WidgetId::ToggleButton,
        WidgetId::SessionTime,
        WidgetId::StartTime,
        WidgetId::LogList,
        WidgetId::DeviceId,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetLine {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Widget {
    pub text: String,
    pub tone: Tone,
    /// Fill of a proportional bar in percent.
    pub fill: Option<u64>,
    pub active: bool,
    /// Most-recent-first lines of a list widget.
    pub lines: Vec<WidgetLine>,
    /// Number of lines ever added to the list, including those that scrolled out of `lines`.
    pub appended: u64,
}

pub trait DisplaySurface {
    /// Returns the widget if this surface hosts it.
    fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget>;

    /// Called once after a batch of updates.
    fn commit(&mut self) {}
}

impl<D: DisplaySurface + ?Sized> DisplaySurface for Box<D> {
    fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        (**self).widget_mut(id)
    }

    fn commit(&mut self) {
        (**self).commit()
    }
}

fn update(display: &mut impl DisplaySurface, id: WidgetId, apply: impl FnOnce(&mut Widget)) {
    if let Some(widget) = display.widget_mut(id) {
        apply(widget);
    }
}

fn set_text(display: &mut impl DisplaySurface, id: WidgetId, text: String) {
    update(display, id, |w| w.text = text);
}

impl From<ProductivityTier> for Tone {
    fn from(value: ProductivityTier) -> Self {
        match value {
            ProductivityTier::Good => Tone::Success,
            ProductivityTier::Warning => Tone::Warning,
            ProductivityTier::Poor => Tone::Danger,
        }
    }
}

impl From<Badge> for Tone {
    fn from(value: Badge) -> Self {
        match value {
            Badge::Success => Tone::Success,
            Badge::Warning => Tone::Warning,
        }
    }
}

/// Live counters, cumulative idle seconds and the current window title.
pub fn render_telemetry(
    display: &mut impl DisplaySurface,
    counters: IntervalCounters,
    idle_seconds: u64,
    window_title: &str,
) {
    set_text(display, WidgetId::MouseCount, counters.mouse.to_string());
    set_text(display, WidgetId::KeystrokeCount, counters.keystrokes.to_string());
    set_text(display, WidgetId::IdleTime, idle_seconds.to_string());
    set_text(display, WidgetId::ActiveWindow, window_title.to_string());
}

pub fn render_productivity(display: &mut impl DisplaySurface, score: ProductivityScore) {
    set_text(display, WidgetId::ProductivityScore, score.to_string());
    update(display, WidgetId::ProductivityBar, |w| {
        w.fill = Some(score.bar_width());
        w.tone = score.tier().into();
    });
}

pub fn render_tracking_state(display: &mut impl DisplaySurface, state: TrackingState) {
    let enabled = state.is_enabled();
    update(display, WidgetId::TrackingCard, |w| w.active = enabled);
    update(display, WidgetId::StatusDot, |w| w.active = enabled);
    set_text(
        display,
        WidgetId::StatusText,
        if enabled {
            "Active Monitoring".into()
        } else {
            "Monitoring Paused".into()
        },
    );
    update(display, WidgetId::ToggleButton, |w| {
        // The button offers the opposite action.
        w.text = if enabled { "pause".into() } else { "play".into() };
        w.tone = if enabled { Tone::Success } else { Tone::Danger };
        w.active = enabled;
    });
}

pub fn render_session_start(display: &mut impl DisplaySurface, started: DateTime<Local>) {
    set_text(display, WidgetId::StartTime, format_local_time(started));
}

pub fn render_session_time(display: &mut impl DisplaySurface, elapsed: Duration) {
    set_text(display, WidgetId::SessionTime, format_elapsed(elapsed));
}

pub fn render_device_id(display: &mut impl DisplaySurface, fingerprint: &str) {
    set_text(display, WidgetId::DeviceId, fingerprint.to_string());
}

pub fn render_report_log(display: &mut impl DisplaySurface, log: &ReportLog) {
    update(display, WidgetId::LogList, |w| {
        w.lines = log
            .entries()
            .map(|entry| WidgetLine {
                text: entry.render(),
                tone: entry.badge().into(),
            })
            .collect();
        w.appended = log.pushed();
    });
}
