//! Terminal input pump.
//!
//! One background task merges crossterm input with the toast/spinner timer
//! and the frame timer, and forwards the result to `App::run`.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// New terminal size as (cols, rows).
    Resize(u16, u16),
    /// Ages toasts and advances the busy spinner.
    Tick,
    /// Time to redraw.
    Render,
}

/// Timer periods for the pump.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub tick: Duration,
    pub frame: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            frame: Duration::from_millis(33),
        }
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    shutdown: CancellationToken,
}

impl EventReader {
    /// Start the pump on the current runtime.
    pub fn spawn(pacing: Pacing) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let stop = shutdown.clone();

        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut tick = timer(pacing.tick);
            let mut frame = timer(pacing.frame);

            loop {
                let event = tokio::select! {
                    () = stop.cancelled() => break,
                    _ = tick.tick() => Some(Event::Tick),
                    _ = frame.tick() => Some(Event::Render),
                    next = input.next() => match next {
                        Some(Ok(raw)) => translate(raw),
                        Some(Err(e)) => {
                            warn!(error = %e, "terminal input error");
                            None
                        }
                        None => break,
                    },
                };
                if let Some(event) = event {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, shutdown }
    }

    /// `None` once the pump has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn timer(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Key presses and resizes pass; releases, repeats, mouse and focus
/// events are dropped.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn only_presses_and_resizes_reach_the_app() {
        let press = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Release);

        assert_eq!(translate(CrosstermEvent::Key(press)), Some(Event::Key(press)));
        assert_eq!(translate(CrosstermEvent::Key(release)), None);
        assert_eq!(translate(CrosstermEvent::Resize(120, 40)), Some(Event::Resize(120, 40)));
        assert_eq!(translate(CrosstermEvent::FocusGained), None);
    }

    #[test]
    fn default_pacing_ticks_slower_than_it_draws() {
        let pacing = Pacing::default();
        assert!(pacing.tick > pacing.frame);
    }
}
