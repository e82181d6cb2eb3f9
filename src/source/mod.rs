//! Producers of [TrackerEvent]s. The environment (a browser bridge, a desktop hook, a script) is
//! external, so every source only translates what it observes into events for the tracker loop.

#[cfg(feature = "desktop")]
pub mod desktop;
pub mod stdin;

use std::{fmt::Display, str::FromStr};

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tracker::input::TrackerEvent;

/// Contract every input producer implements. A source runs until its input ends or `shutdown` is
/// cancelled.
#[async_trait]
pub trait InputSource: Send {
    async fn run(
        self: Box<Self>,
        events: mpsc::Sender<TrackerEvent>,
        shutdown: CancellationToken,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Stdin,
    Desktop,
}

impl InputKind {
    pub fn default_for_build() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "desktop")] {
                InputKind::Desktop
            } else {
                InputKind::Stdin
            }
        }
    }
}

impl FromStr for InputKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdin" => Ok(InputKind::Stdin),
            "desktop" => Ok(InputKind::Desktop),
            other => bail!("Unknown input source {other}, expected stdin or desktop"),
        }
    }
}

impl Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Stdin => f.write_str("stdin"),
            InputKind::Desktop => f.write_str("desktop"),
        }
    }
}

pub fn create_input_source(kind: InputKind) -> Result<Box<dyn InputSource>> {
    match kind {
        InputKind::Stdin => Ok(Box::new(stdin::StdinSource::new(tokio::io::stdin()))),
        InputKind::Desktop => {
            cfg_if::cfg_if! {
                if #[cfg(feature = "desktop")] {
                    Ok(Box::new(desktop::DesktopSource))
                } else {
                    bail!("Desktop input requires building with the `desktop` feature")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InputKind;

    #[test]
    fn parses_input_kind() {
        assert_eq!("stdin".parse::<InputKind>().unwrap(), InputKind::Stdin);
        assert_eq!("Desktop".parse::<InputKind>().unwrap(), InputKind::Desktop);
        assert!("mouse".parse::<InputKind>().is_err());
    }

    #[test]
    fn input_kind_round_trips_through_display() {
        for kind in [InputKind::Stdin, InputKind::Desktop] {
            assert_eq!(kind.to_string().parse::<InputKind>().unwrap(), kind);
        }
    }
}
