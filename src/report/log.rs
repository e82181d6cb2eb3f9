use std::{collections::VecDeque, sync::Arc};

use chrono::{DateTime, Local};

use crate::utils::time::format_local_time;

use super::ActivityReport;

pub const REPORT_LOG_CAPACITY: usize = 10;

/// Idle seconds below which a confirmation is shown as a clean interval.
const CLEAN_IDLE_SECONDS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Success,
    Warning,
}

/// One acknowledged report as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLogEntry {
    pub acknowledged_at: DateTime<Local>,
    pub mouse_activity: u64,
    pub keyboard_activity: u64,
    pub idle_time: u64,
    pub window_title: Arc<str>,
}

impl ReportLogEntry {
    pub fn new(report: &ActivityReport, acknowledged_at: DateTime<Local>) -> Self {
        Self {
            acknowledged_at,
            mouse_activity: report.mouse_activity,
            keyboard_activity: report.keyboard_activity,
            idle_time: report.idle_time,
            window_title: report.active_window_title.clone(),
        }
    }

    pub fn badge(&self) -> Badge {
        if self.idle_time < CLEAN_IDLE_SECONDS {
            Badge::Success
        } else {
            Badge::Warning
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "M: {} | K: {} | I: {}s",
            self.mouse_activity, self.keyboard_activity, self.idle_time
        )
    }

    pub fn render(&self) -> String {
        format!(
            "{} {} | Window: {}",
            format_local_time(self.acknowledged_at),
            self.summary(),
            self.window_title
        )
    }
}

/// Most-recent-first scrollback of confirmations. Older entries fall off once it is full.
#[derive(Debug, Default)]
pub struct ReportLog {
    entries: VecDeque<ReportLogEntry>,
    pushed: u64,
}

impl ReportLog {
    pub fn push(&mut self, entry: ReportLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(REPORT_LOG_CAPACITY);
        self.pushed += 1;
    }

    /// Entries pushed over the whole session, including those no longer kept.
    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ReportLogEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use crate::report::ActivityReport;

    use super::{Badge, ReportLog, ReportLogEntry, REPORT_LOG_CAPACITY};

    fn report(mouse: u64, idle: u64) -> ActivityReport {
        ActivityReport {
            employee_id: "1".into(),
            mouse_activity: mouse,
            keyboard_activity: 2,
            idle_time: idle,
            active_window_title: "Inbox".into(),
        }
    }

    fn entry(mouse: u64, idle: u64) -> ReportLogEntry {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        ReportLogEntry::new(&report(mouse, idle), at)
    }

    #[test]
    fn newest_entry_comes_first() {
        let mut log = ReportLog::default();
        log.push(entry(1, 0));
        log.push(entry(2, 0));
        let mice = log.entries().map(|e| e.mouse_activity).collect::<Vec<_>>();
        assert_eq!(mice, vec![2, 1]);
        assert_eq!(log.pushed(), 2);
    }

    #[test]
    fn log_is_capped() {
        let mut log = ReportLog::default();
        for i in 0..25 {
            log.push(entry(i, 0));
            assert!(log.len() <= REPORT_LOG_CAPACITY);
        }
        assert_eq!(log.len(), REPORT_LOG_CAPACITY);
        assert_eq!(log.pushed(), 25);
        let mice = log.entries().map(|e| e.mouse_activity).collect::<Vec<_>>();
        assert_eq!(mice, (15..25).rev().collect::<Vec<_>>());
    }

    #[test]
    fn badge_depends_on_idle_time() {
        assert_eq!(entry(0, 0).badge(), Badge::Success);
        assert_eq!(entry(0, 9).badge(), Badge::Success);
        assert_eq!(entry(0, 15).badge(), Badge::Warning);
    }

    #[test]
    fn entry_renders_counts_and_title() {
        assert_eq!(entry(3, 15).render(), "09:30:00 M: 3 | K: 2 | I: 15s | Window: Inbox");
    }
}
