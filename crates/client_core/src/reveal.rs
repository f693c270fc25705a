//! Typewriter reveal of a translation, one `char` per tick.
//!
//! A reveal is published through a `watch` channel. Each reveal has its own
//! generation; the ticking task only writes while the published state still
//! carries its generation, so a superseded task can never touch a newer
//! reveal even if it runs once more after being aborted.

use std::{sync::Arc, time::Duration};

use shared::domain::RevealGeneration;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

/// Floor for the tick period; `tokio::time::interval` rejects zero.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    pub generation: RevealGeneration,
    pub full_text: String,
    /// Number of chars of `full_text` currently visible.
    pub revealed: usize,
    pub active: bool,
    char_len: usize,
}

impl RevealState {
    pub fn idle(generation: RevealGeneration) -> Self {
        Self::new(generation, String::new())
    }

    pub fn new(generation: RevealGeneration, full_text: String) -> Self {
        let char_len = full_text.chars().count();
        Self {
            generation,
            full_text,
            revealed: 0,
            active: char_len > 0,
            char_len,
        }
    }

    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn is_complete(&self) -> bool {
        self.revealed == self.char_len
    }

    pub fn visible(&self) -> &str {
        match self.full_text.char_indices().nth(self.revealed) {
            Some((end, _)) => &self.full_text[..end],
            None => &self.full_text,
        }
    }

    /// Reveals one more char. Returns false once the reveal is inactive.
    pub fn advance(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.revealed = (self.revealed + 1).min(self.char_len);
        if self.revealed == self.char_len {
            self.active = false;
        }
        true
    }
}

pub struct TypingRevealer {
    period: Duration,
    state: Arc<watch::Sender<RevealState>>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl TypingRevealer {
    pub fn new(period: Duration) -> Self {
        let (state, _) = watch::channel(RevealState::idle(RevealGeneration(0)));
        Self {
            period: period.max(MIN_TICK_PERIOD),
            state: Arc::new(state),
            generation: 0,
            task: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn subscribe(&self) -> watch::Receiver<RevealState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> RevealState {
        self.state.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    /// Replaces any running reveal with one of `full_text`, starting from
    /// zero visible chars. Must be called inside a tokio runtime.
    pub fn start(&mut self, full_text: impl Into<String>) -> RevealGeneration {
        self.cancel();
        let generation = self.next_generation();
        let initial = RevealState::new(generation, full_text.into());
        let needs_ticks = initial.active;
        self.state.send_replace(initial);

        if needs_ticks {
            self.task = Some(tokio::spawn(tick_reveal(
                self.state.clone(),
                generation,
                self.period,
            )));
        }
        generation
    }

    /// Cancels the running reveal and publishes an empty one.
    pub fn clear(&mut self) {
        self.cancel();
        let generation = self.next_generation();
        self.state.send_replace(RevealState::idle(generation));
    }

    /// Stops ticking, leaving the current prefix visible.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.state.send_if_modified(|current| {
            let was_active = current.active;
            current.active = false;
            was_active
        });
    }

    fn next_generation(&mut self) -> RevealGeneration {
        self.generation += 1;
        RevealGeneration(self.generation)
    }
}

impl Drop for TypingRevealer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn tick_reveal(
    state: Arc<watch::Sender<RevealState>>,
    generation: RevealGeneration,
    period: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let mut finished = false;
        state.send_if_modified(|current| {
            if current.generation != generation {
                finished = true;
                return false;
            }
            let changed = current.advance();
            finished = !current.active;
            changed
        });

        if finished {
            break;
        }
    }
}

#[cfg(test)]
#[path = "tests/reveal_tests.rs"]
mod tests;
