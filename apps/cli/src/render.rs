//! Terminal rendering of the reveal and the loading indicator.

use std::io::{self, Write};

use client_core::{RevealState, SessionEvent};
use shared::domain::RevealGeneration;
use tokio::{
    sync::{
        broadcast::{self, error::RecvError},
        watch,
    },
    task::JoinHandle,
};
use tracing::{debug, warn};

/// Writes each newly revealed chunk once, and ends the line when a reveal
/// stops or is superseded.
#[derive(Debug, Default)]
pub struct RevealPrinter {
    generation: Option<RevealGeneration>,
    printed: usize,
    line_open: bool,
}

impl RevealPrinter {
    pub fn render(&mut self, state: &RevealState, out: &mut impl Write) -> io::Result<()> {
        if self.generation != Some(state.generation) {
            self.close_line(out)?;
            self.generation = Some(state.generation);
            self.printed = 0;
        }

        if state.revealed > self.printed {
            let chunk: String = state
                .full_text
                .chars()
                .skip(self.printed)
                .take(state.revealed - self.printed)
                .collect();
            out.write_all(chunk.as_bytes())?;
            self.printed = state.revealed;
            self.line_open = true;
        }

        if !state.active {
            self.close_line(out)?;
        }
        out.flush()
    }

    pub fn close_line(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.line_open {
            writeln!(out)?;
            self.line_open = false;
        }
        Ok(())
    }
}

fn notice(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Swapped { languages, input } if input.is_empty() => format!(
            "{} -> {} (nothing to translate yet)",
            languages.source.display_name(),
            languages.target.display_name()
        ),
        SessionEvent::Swapped { languages, input } => format!(
            "{} -> {} | input: {input} (press enter to translate)",
            languages.source.display_name(),
            languages.target.display_name()
        ),
        SessionEvent::LanguagesChanged(languages) => format!(
            "{} -> {}",
            languages.source.display_name(),
            languages.target.display_name()
        ),
    }
}

/// Renders until the session drops its reveal channel. The last published
/// reveal state is always rendered before returning.
pub async fn render_loop(
    mut reveal: watch::Receiver<RevealState>,
    mut loading: watch::Receiver<bool>,
    mut events: broadcast::Receiver<SessionEvent>,
    out: &mut impl Write,
    notices: &mut impl Write,
) {
    let mut printer = RevealPrinter::default();
    let mut loading_open = true;
    let mut events_open = true;
    loop {
        tokio::select! {
            biased;
            changed = reveal.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = reveal.borrow_and_update().clone();
                if let Err(err) = printer.render(&state, out) {
                    warn!("failed to write translation: {err}");
                }
            }
            changed = loading.changed(), if loading_open => match changed {
                Ok(()) => {
                    if *loading.borrow_and_update() {
                        let _ = writeln!(notices, "translating...");
                    }
                }
                Err(_) => loading_open = false,
            },
            event = events.recv(), if events_open => match event {
                Ok(event) => {
                    let _ = writeln!(notices, "{}", notice(&event));
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "renderer fell behind on session events");
                }
                Err(RecvError::Closed) => events_open = false,
            },
        }
    }

    let state = reveal.borrow_and_update().clone();
    let finished = match printer.render(&state, out) {
        Ok(()) => printer.close_line(out),
        Err(err) => Err(err),
    };
    if let Err(err) = finished {
        warn!("failed to write translation: {err}");
    }
}

pub fn spawn_renderer(
    reveal: watch::Receiver<RevealState>,
    loading: watch::Receiver<bool>,
    events: broadcast::Receiver<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();
        render_loop(reveal, loading, events, &mut stdout, &mut stderr).await;
    })
}
