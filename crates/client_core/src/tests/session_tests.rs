use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use tokio::{sync::Notify, time};

const PERIOD: Duration = Duration::from_millis(18);

enum Reply {
    Text(&'static str),
    Status(reqwest::StatusCode),
    Panic,
}

struct ScriptedTranslator {
    reply: Reply,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<TranslationRequest>>,
}

impl ScriptedTranslator {
    fn replying(text: &'static str) -> Self {
        Self::with_reply(Reply::Text(text))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            gate: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock")
            .push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Reply::Text(text) => Ok(TranslationResult::new(*text)),
            Reply::Status(status) => Err(TranslationError::Status {
                status: *status,
                body: String::new(),
            }),
            Reply::Panic => panic!("translator blew up"),
        }
    }
}

fn session_with(translator: Arc<ScriptedTranslator>) -> TranslatorSession {
    TranslatorSession::with_languages(translator, LanguagePair::default(), PERIOD)
}

async fn translate_and_reveal(session: &mut TranslatorSession, text: &str) {
    session.set_input(text);
    session.submit().expect("submit");
    session.settle_next().await.expect("completion");
    session.wait_for_reveal().await;
}

#[tokio::test(start_paused = true)]
async fn empty_input_is_ignored_without_a_request() {
    let translator = Arc::new(ScriptedTranslator::replying("unused"));
    let mut session = session_with(translator.clone());

    assert_eq!(session.submit(), Err(SubmitRejected::EmptyInput));
    assert!(!session.is_loading());
    assert_eq!(session.settle_next().await, None);

    time::sleep(PERIOD * 5).await;
    assert_eq!(translator.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn successful_submit_goes_idle_pending_idle() {
    let translator = Arc::new(ScriptedTranslator::replying("bonjour"));
    let mut session = session_with(translator.clone());
    session.set_input("hello");

    let request_id = session.submit().expect("submit");
    assert!(session.is_loading());

    assert_eq!(session.settle_next().await, Some(request_id));
    assert!(!session.is_loading());
    assert_eq!(session.result(), Some("bonjour"));
    assert_eq!(translator.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_submit_goes_idle_and_keeps_previous_output() {
    let translator = Arc::new(ScriptedTranslator::replying("bonjour"));
    let mut session = session_with(translator);
    translate_and_reveal(&mut session, "hello").await;

    let failing = Arc::new(ScriptedTranslator::with_reply(Reply::Status(
        reqwest::StatusCode::BAD_GATEWAY,
    )));
    session.translator = failing.clone() as Arc<dyn Translator>;
    session.set_input("again");
    session.submit().expect("submit");
    assert!(session.is_loading());

    session.settle_next().await.expect("completion");
    assert!(!session.is_loading());
    assert_eq!(session.result(), Some("bonjour"));
    assert_eq!(session.output(), "bonjour");
    assert_eq!(failing.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn panicking_translator_still_clears_loading() {
    let translator = Arc::new(ScriptedTranslator::with_reply(Reply::Panic));
    let mut session = session_with(translator);
    session.set_input("hello");

    session.submit().expect("submit");
    session.settle_next().await.expect("completion");
    assert!(!session.is_loading());
    assert_eq!(session.result(), None);
}

#[tokio::test(start_paused = true)]
async fn submit_while_pending_is_dropped() {
    let gate = Arc::new(Notify::new());
    let translator = Arc::new(ScriptedTranslator::replying("bonjour").gated(gate.clone()));
    let mut session = session_with(translator.clone());
    session.set_input("hello");

    let first = session.submit().expect("first submit");
    session.set_input("hello twice");
    assert_eq!(session.submit(), Err(SubmitRejected::RequestPending));

    gate.notify_one();
    assert_eq!(session.settle_next().await, Some(first));
    assert_eq!(session.settle_next().await, None);

    assert_eq!(translator.calls(), 1);
    let seen = translator.seen.lock().expect("seen lock");
    assert_eq!(seen[0].source_text, "hello");
}

#[tokio::test(start_paused = true)]
async fn request_carries_current_language_pair() {
    let translator = Arc::new(ScriptedTranslator::replying("hello"));
    let mut session = session_with(translator.clone());
    session.set_source_language(Language::Hi);
    session.set_target_language(Language::Hi);

    translate_and_reveal(&mut session, "नमस्ते").await;

    let seen = translator.seen.lock().expect("seen lock");
    assert_eq!(seen[0].source_lang, Language::Hi);
    assert_eq!(seen[0].target_lang, Language::Hi);
}

#[tokio::test(start_paused = true)]
async fn swap_after_result_moves_output_into_input() {
    let translator = Arc::new(ScriptedTranslator::replying("नमस्ते"));
    let mut session = session_with(translator.clone());
    translate_and_reveal(&mut session, "hello").await;

    session.swap();
    assert_eq!(
        session.languages(),
        LanguagePair::new(Language::Hi, Language::En)
    );
    assert_eq!(session.input(), "नमस्ते");
    assert_eq!(session.output(), "");
    assert_eq!(session.result(), None);
    assert_eq!(translator.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn swap_without_result_empties_input() {
    let translator = Arc::new(ScriptedTranslator::replying("unused"));
    let mut session = session_with(translator.clone());
    session.set_input("typed but never submitted");

    session.swap();
    assert_eq!(
        session.languages(),
        LanguagePair::new(Language::Hi, Language::En)
    );
    assert_eq!(session.input(), "");
    assert_eq!(session.output(), "");
    assert_eq!(translator.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn swap_mid_reveal_stops_the_reveal() {
    let translator = Arc::new(ScriptedTranslator::replying("bonjour"));
    let mut session = session_with(translator);
    session.set_input("hello");
    session.submit().expect("submit");
    session.settle_next().await.expect("completion");

    time::sleep(PERIOD * 3 + PERIOD / 2).await;
    assert_eq!(session.output(), "bon");

    session.swap();
    assert_eq!(session.input(), "bonjour");
    time::sleep(PERIOD * 10).await;
    assert_eq!(session.output(), "");
    assert!(!session.reveal_snapshot().active);
}

#[tokio::test(start_paused = true)]
async fn new_result_mid_reveal_restarts_from_zero() {
    let translator = Arc::new(ScriptedTranslator::replying("bonjour"));
    let mut session = session_with(translator);
    session.set_input("hello");
    session.submit().expect("submit");
    session.settle_next().await.expect("completion");
    time::sleep(PERIOD * 2 + PERIOD / 2).await;
    assert_eq!(session.output(), "bo");

    let salut: Arc<dyn Translator> = Arc::new(ScriptedTranslator::replying("salut"));
    session.translator = salut;
    session.set_input("hi");
    session.submit().expect("submit");
    session.settle_next().await.expect("completion");
    assert_eq!(session.reveal_snapshot().revealed, 0);
    assert_eq!(session.output(), "");

    session.wait_for_reveal().await;
    assert_eq!(session.output(), "salut");
}

#[tokio::test(start_paused = true)]
async fn hindi_translation_reveals_fully_while_not_loading() {
    let translator = Arc::new(ScriptedTranslator::replying("नमस्ते"));
    let mut session = session_with(translator);
    let loading = session.subscribe_loading();
    session.set_input("hello");

    session.submit().expect("submit");
    assert!(*loading.borrow());
    session.settle_next().await.expect("completion");

    time::sleep(PERIOD / 2).await;
    for expected in 0..=6 {
        let state = session.reveal_snapshot();
        assert_eq!(state.revealed, expected);
        assert!(!*loading.borrow());
        time::sleep(PERIOD).await;
    }
    assert_eq!(session.output(), "नमस्ते");
    assert!(!session.reveal_snapshot().active);
}

#[tokio::test(start_paused = true)]
async fn empty_translation_completes_instantly_without_error_state() {
    let translator = Arc::new(ScriptedTranslator::replying(""));
    let mut session = session_with(translator);
    session.set_input("hello");

    session.submit().expect("submit");
    session.settle_next().await.expect("completion");

    let state = session.reveal_snapshot();
    assert!(!state.active);
    assert_eq!(state.char_len(), 0);
    assert_eq!(session.output(), "");
    assert_eq!(session.result(), Some(""));
    assert!(!session.is_loading());
}

#[tokio::test(start_paused = true)]
async fn run_processes_commands_and_completions_in_order() {
    let translator = Arc::new(ScriptedTranslator::replying("नमस्ते"));
    let mut session = session_with(translator.clone());
    let (tx, mut rx) = mpsc::channel(8);

    tx.send(SessionCommand::Submit).await.expect("send");
    tx.send(SessionCommand::SetInput("hello".into()))
        .await
        .expect("send");
    tx.send(SessionCommand::Submit).await.expect("send");
    drop(tx);

    session.run(&mut rx).await;
    session.finish().await;

    assert_eq!(translator.calls(), 1);
    assert_eq!(session.output(), "नमस्ते");
    assert!(!session.is_loading());

    let (tx, mut rx) = mpsc::channel(8);
    tx.send(SessionCommand::Swap).await.expect("send");
    tx.send(SessionCommand::SetTargetLanguage(Language::Hi))
        .await
        .expect("send");
    drop(tx);
    session.run(&mut rx).await;

    assert_eq!(session.input(), "नमस्ते");
    assert_eq!(
        session.languages(),
        LanguagePair::new(Language::Hi, Language::Hi)
    );
}

#[tokio::test(start_paused = true)]
async fn submit_after_swap_translates_the_previous_result_back() {
    let translator = Arc::new(ScriptedTranslator::replying("नमस्ते"));
    let mut session = session_with(translator.clone());
    translate_and_reveal(&mut session, "hello").await;

    session.swap();
    session.submit().expect("swapped input is submitted");
    session.settle_next().await.expect("completion");

    assert_eq!(translator.calls(), 2);
    let seen = translator.seen.lock().expect("seen lock");
    assert_eq!(seen[1].source_text, "नमस्ते");
    assert_eq!(seen[1].source_lang, Language::Hi);
    assert_eq!(seen[1].target_lang, Language::En);
}

#[tokio::test(start_paused = true)]
async fn swap_and_language_changes_are_announced() {
    let translator = Arc::new(ScriptedTranslator::replying("नमस्ते"));
    let mut session = session_with(translator);
    let mut events = session.subscribe_events();
    translate_and_reveal(&mut session, "hello").await;

    session.swap();
    assert_eq!(
        events.try_recv().expect("swap event"),
        SessionEvent::Swapped {
            languages: LanguagePair::new(Language::Hi, Language::En),
            input: "नमस्ते".to_string(),
        }
    );

    session.set_target_language(Language::Hi);
    assert_eq!(
        events.try_recv().expect("language event"),
        SessionEvent::LanguagesChanged(LanguagePair::new(Language::Hi, Language::Hi))
    );
    assert!(events.try_recv().is_err());
}
