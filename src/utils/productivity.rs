use std::fmt::Display;

use anyhow::{bail, Result};

/// Productivity of a session in percent, derived from its active and idle totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProductivityScore(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductivityTier {
    Good,
    Warning,
    Poor,
}

impl ProductivityScore {
    /// `round(100 * active / (active + idle))`, or 0 for an empty session.
    ///
    /// `active` is a raw event count while `idle` is in seconds, so the score is only a heuristic.
    pub fn from_totals(active: u64, idle: u64) -> Self {
        let total = active.saturating_add(idle);
        if total == 0 {
            return Self(0);
        }
        Self(((active as f64 / total as f64) * 100.).round() as u64)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// Width of a progress bar in percent. Never wider than the bar itself.
    pub fn bar_width(self) -> u64 {
        self.0.min(100)
    }

    pub fn tier(self) -> ProductivityTier {
        match self.0 {
            75.. => ProductivityTier::Good,
            50..75 => ProductivityTier::Warning,
            _ => ProductivityTier::Poor,
        }
    }
}

impl Display for ProductivityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl ProductivityTier {
    pub fn label(self) -> &'static str {
        match self {
            ProductivityTier::Good => "good",
            ProductivityTier::Warning => "warning",
            ProductivityTier::Poor => "poor",
        }
    }
}

impl Display for ProductivityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses the totals given on the command line. Both must be non-negative integers.
pub fn parse_total(s: &str) -> Result<u64> {
    let s = s.trim();
    match s.parse::<u64>() {
        Ok(v) => Ok(v),
        Err(_) => bail!("Can't parse {s} into a non-negative total"),
    }
}
