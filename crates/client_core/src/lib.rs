//! Client core of the translator: provider client, request guard, language
//! pair, typing reveal, and the session that owns them.

pub mod config;
pub mod error;
pub mod language_pair;
pub mod request_state;
pub mod reveal;
pub mod session;
pub mod translation;

pub use config::{load_settings_from, Settings};
pub use error::TranslationError;
pub use language_pair::LanguagePair;
pub use request_state::{RequestState, RequestStateController};
pub use reveal::{RevealState, TypingRevealer};
pub use session::{Completion, SessionCommand, SessionEvent, TranslatorSession};
pub use translation::{HttpTranslator, Translator};
