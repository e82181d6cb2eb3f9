use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    sync::mpsc,
};
use tokio_stream::wrappers::LinesStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::tracker::input::{InputEvent, Modifiers, TrackerEvent};

use super::InputSource;

/// One line of the newline-delimited JSON protocol.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    PointerMove,
    PointerClick,
    KeyPress {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        meta: bool,
    },
    Title {
        title: String,
    },
    Toggle,
}

impl From<WireEvent> for TrackerEvent {
    fn from(value: WireEvent) -> Self {
        match value {
            WireEvent::PointerMove => TrackerEvent::Input(InputEvent::PointerMove),
            WireEvent::PointerClick => TrackerEvent::Input(InputEvent::PointerClick),
            WireEvent::KeyPress {
                key,
                ctrl,
                alt,
                meta,
            } => TrackerEvent::Input(InputEvent::KeyPress {
                key,
                modifiers: Modifiers { ctrl, alt, meta },
            }),
            WireEvent::Title { title } => TrackerEvent::TitleChanged(title.into()),
            WireEvent::Toggle => TrackerEvent::Toggle,
        }
    }
}

pub fn parse_line(line: &str) -> Result<Option<TrackerEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let event = serde_json::from_str::<WireEvent>(line)
        .with_context(|| format!("Malformed input event {line}"))?;
    Ok(Some(event.into()))
}

/// Reads events as newline-delimited JSON, e.g. forwarded by a browser extension.
pub struct StdinSource<R> {
    reader: R,
}

impl<R: AsyncRead + Unpin + Send> StdinSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send + 'static> InputSource for StdinSource<R> {
    async fn run(
        self: Box<Self>,
        events: mpsc::Sender<TrackerEvent>,
        shutdown: CancellationToken,
    ) -> Result<()> {
        let mut lines = LinesStream::new(BufReader::new(self.reader).lines());
        loop {
            let line = tokio::select! {
                _ = shutdown.cancelled() => return Ok(()),
                line = lines.next() => line,
            };
            let Some(line) = line else {
                info!("Input stream ended");
                return Ok(());
            };
            match parse_line(&line?) {
                Ok(Some(event)) => {
                    debug!("Received {event:?}");
                    if events.send(event).await.is_err() {
                        // Tracker loop is gone, nothing left to feed.
                        return Ok(());
                    }
                }
                Ok(None) => (),
                Err(e) => warn!("{e:?}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::{
        source::InputSource,
        tracker::input::{InputEvent, Modifiers, TrackerEvent},
    };

    use super::{parse_line, StdinSource};

    #[test]
    fn parses_pointer_events() {
        assert_eq!(
            parse_line(r#"{"type":"pointer_move"}"#).unwrap(),
            Some(TrackerEvent::Input(InputEvent::PointerMove))
        );
        assert_eq!(
            parse_line(r#"{"type":"pointer_click"}"#).unwrap(),
            Some(TrackerEvent::Input(InputEvent::PointerClick))
        );
    }

    #[test]
    fn modifiers_default_to_released() {
        assert_eq!(
            parse_line(r#"{"type":"key_press","key":"a"}"#).unwrap(),
            Some(TrackerEvent::Input(InputEvent::KeyPress {
                key: "a".into(),
                modifiers: Modifiers::default(),
            }))
        );
        assert_eq!(
            parse_line(r#"{"type":"key_press","key":"v","meta":true}"#).unwrap(),
            Some(TrackerEvent::Input(InputEvent::KeyPress {
                key: "v".into(),
                modifiers: Modifiers {
                    meta: true,
                    ..Default::default()
                },
            }))
        );
    }

    #[test]
    fn parses_control_events() {
        assert_eq!(
            parse_line(r#"{"type":"title","title":"Report.docx"}"#).unwrap(),
            Some(TrackerEvent::TitleChanged("Report.docx".into()))
        );
        assert_eq!(parse_line(r#"{"type":"toggle"}"#).unwrap(), Some(TrackerEvent::Toggle));
    }

    #[test]
    fn blank_lines_are_ignored_and_garbage_rejected() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert!(parse_line("click").is_err());
        assert!(parse_line(r#"{"type":"scroll"}"#).is_err());
    }

    #[tokio::test]
    async fn forwards_valid_lines_and_skips_bad_ones() -> Result<()> {
        let input = concat!(
            "{\"type\":\"pointer_move\"}\n",
            "not json\n",
            "\n",
            "{\"type\":\"key_press\",\"key\":\"x\"}\n",
            "{\"type\":\"toggle\"}\n",
        );
        let (sender, mut receiver) = mpsc::channel(8);
        let source = Box::new(StdinSource::new(input.as_bytes()));
        source.run(sender, CancellationToken::new()).await?;

        let mut received = Vec::new();
        while let Some(event) = receiver.recv().await {
            received.push(event);
        }
        assert_eq!(received.len(), 3);
        assert_eq!(received[0], TrackerEvent::Input(InputEvent::PointerMove));
        assert_eq!(received[2], TrackerEvent::Toggle);
        Ok(())
    }

    #[tokio::test]
    async fn stops_on_shutdown() -> Result<()> {
        let (sender, _receiver) = mpsc::channel(8);
        let (_writer, reader) = tokio::io::duplex(64);
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        Box::new(StdinSource::new(reader)).run(sender, shutdown).await
    }
}
