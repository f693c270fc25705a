use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Language, RequestId, TranslationRequest, TranslationResult},
    error::SubmitRejected,
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info};

use crate::{
    config::Settings,
    error::TranslationError,
    language_pair::{swap_input, LanguagePair},
    request_state::RequestStateController,
    reveal::{RevealState, TypingRevealer},
    translation::Translator,
};

const SESSION_EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetInput(String),
    SetSourceLanguage(Language),
    SetTargetLanguage(Language),
    Submit,
    Swap,
}

/// State changes a front end cannot see through the reveal or loading
/// channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Swapped {
        languages: LanguagePair,
        input: String,
    },
    LanguagesChanged(LanguagePair),
}

#[derive(Debug)]
pub struct Completion {
    pub request_id: RequestId,
    pub outcome: Result<TranslationResult, TranslationError>,
}

/// Reports the request outcome when dropped, so the session leaves Pending
/// even if the request task panics or is aborted.
struct SettleGuard {
    request_id: RequestId,
    outcome: Option<Result<TranslationResult, TranslationError>>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl SettleGuard {
    fn complete(mut self, outcome: Result<TranslationResult, TranslationError>) {
        self.outcome = Some(outcome);
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        let outcome = self
            .outcome
            .take()
            .unwrap_or(Err(TranslationError::Interrupted));
        let _ = self.completions.send(Completion {
            request_id: self.request_id,
            outcome,
        });
    }
}

/// Single owner of all translator state: input text, language pair,
/// loading flag, last result and its reveal.
pub struct TranslatorSession {
    translator: Arc<dyn Translator>,
    input: String,
    languages: LanguagePair,
    requests: RequestStateController,
    revealer: TypingRevealer,
    result: Option<String>,
    events: broadcast::Sender<SessionEvent>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl TranslatorSession {
    pub fn new(translator: Arc<dyn Translator>, settings: &Settings) -> Self {
        Self::with_languages(
            translator,
            LanguagePair::new(settings.source_lang, settings.target_lang),
            settings.reveal_interval(),
        )
    }

    pub fn with_languages(
        translator: Arc<dyn Translator>,
        languages: LanguagePair,
        reveal_period: Duration,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Self {
            translator,
            input: String::new(),
            languages,
            requests: RequestStateController::new(),
            revealer: TypingRevealer::new(reveal_period),
            result: None,
            events,
            completions_tx,
            completions_rx,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn languages(&self) -> LanguagePair {
        self.languages
    }

    pub fn is_loading(&self) -> bool {
        self.requests.is_loading()
    }

    /// Last completed translation, in full.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Currently visible part of the output.
    pub fn output(&self) -> String {
        self.revealer.snapshot().visible().to_string()
    }

    pub fn reveal_snapshot(&self) -> RevealState {
        self.revealer.snapshot()
    }

    pub fn subscribe_reveal(&self) -> watch::Receiver<RevealState> {
        self.revealer.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.requests.subscribe_loading()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn set_source_language(&mut self, language: Language) {
        self.languages.set_source(language);
        let _ = self
            .events
            .send(SessionEvent::LanguagesChanged(self.languages));
    }

    pub fn set_target_language(&mut self, language: Language) {
        self.languages.set_target(language);
        let _ = self
            .events
            .send(SessionEvent::LanguagesChanged(self.languages));
    }

    /// Starts translating the current input in the background. The outcome
    /// is applied by `settle_next` or `run`.
    pub fn submit(&mut self) -> Result<RequestId, SubmitRejected> {
        let request_id = match self.requests.try_begin(&self.input) {
            Ok(request_id) => request_id,
            Err(reason) => {
                debug!(code = reason.code().as_str(), "submit ignored: {reason}");
                return Err(reason);
            }
        };

        let request = TranslationRequest {
            source_text: self.input.clone(),
            source_lang: self.languages.source,
            target_lang: self.languages.target,
        };
        info!(
            %request_id,
            source_lang = %request.source_lang,
            target_lang = %request.target_lang,
            chars = request.source_text.chars().count(),
            "translation request submitted"
        );

        let translator = self.translator.clone();
        let guard = SettleGuard {
            request_id,
            outcome: None,
            completions: self.completions_tx.clone(),
        };
        tokio::spawn(async move {
            guard.complete(translator.translate(&request).await);
        });

        Ok(request_id)
    }

    /// Exchanges languages, moves the last translation into the input and
    /// blanks the output. Makes no request.
    pub fn swap(&mut self) {
        self.languages.swap();
        self.input = swap_input(self.result.take());
        self.revealer.clear();
        debug!(
            source_lang = %self.languages.source,
            target_lang = %self.languages.target,
            "languages swapped"
        );
        let _ = self.events.send(SessionEvent::Swapped {
            languages: self.languages,
            input: self.input.clone(),
        });
    }

    pub fn apply_completion(&mut self, completion: Completion) {
        let Completion {
            request_id,
            outcome,
        } = completion;

        if !self.requests.settle(request_id) {
            debug!(%request_id, "settled a request that was not in flight");
        }

        match outcome {
            Ok(result) => {
                debug!(
                    %request_id,
                    chars = result.translated_text.chars().count(),
                    "translation completed"
                );
                self.revealer.start(result.translated_text.clone());
                self.result = Some(result.translated_text);
            }
            Err(err) => {
                debug!(
                    %request_id,
                    code = err.code().as_str(),
                    "translation failed; output left unchanged: {err}"
                );
            }
        }
    }

    /// Waits for the in-flight request, if any, and applies its outcome.
    pub async fn settle_next(&mut self) -> Option<RequestId> {
        if !self.requests.is_loading() {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        let request_id = completion.request_id;
        self.apply_completion(completion);
        Some(request_id)
    }

    /// Resolves once the current reveal has stopped ticking.
    pub async fn wait_for_reveal(&self) {
        let mut reveal = self.revealer.subscribe();
        let _ = reveal.wait_for(|state| !state.active).await;
    }

    /// Settles any in-flight request and lets its reveal run to the end.
    pub async fn finish(&mut self) {
        while self.settle_next().await.is_some() {}
        self.wait_for_reveal().await;
    }

    pub fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SetInput(text) => self.set_input(text),
            SessionCommand::SetSourceLanguage(language) => self.set_source_language(language),
            SessionCommand::SetTargetLanguage(language) => self.set_target_language(language),
            SessionCommand::Submit => {
                let _ = self.submit();
            }
            SessionCommand::Swap => self.swap(),
        }
    }

    /// Processes commands and request completions in arrival order until the
    /// command channel closes.
    pub async fn run(&mut self, commands: &mut mpsc::Receiver<SessionCommand>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(completion) = self.completions_rx.recv() => {
                    self.apply_completion(completion);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
