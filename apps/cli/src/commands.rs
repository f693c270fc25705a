//! Stdin lines to session commands.

use client_core::SessionCommand;
use shared::domain::Language;
use tokio::sync::mpsc::{error::TrySendError, Sender};

pub const HELP: &str = "\
type text and press enter to translate
  (empty line)   translate the current input again, e.g. after :swap
  :swap          exchange languages and reuse the last translation as input
  :from <lang>   set the source language (en, hi)
  :to <lang>     set the target language (en, hi)
  :langs         list available languages
  :help          show this help
  :quit          exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Session(Vec<SessionCommand>),
    Help,
    Languages,
    Quit,
    Invalid(String),
}

pub fn parse_line(line: &str) -> InputLine {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if line.is_empty() {
        return InputLine::Session(vec![SessionCommand::Submit]);
    }
    let Some(directive) = line.strip_prefix(':') else {
        return InputLine::Session(vec![
            SessionCommand::SetInput(line.to_string()),
            SessionCommand::Submit,
        ]);
    };

    let mut parts = directive.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("swap"), None) => InputLine::Session(vec![SessionCommand::Swap]),
        (Some("from"), Some(lang)) => match lang.parse::<Language>() {
            Ok(lang) => InputLine::Session(vec![SessionCommand::SetSourceLanguage(lang)]),
            Err(err) => InputLine::Invalid(err.to_string()),
        },
        (Some("to"), Some(lang)) => match lang.parse::<Language>() {
            Ok(lang) => InputLine::Session(vec![SessionCommand::SetTargetLanguage(lang)]),
            Err(err) => InputLine::Invalid(err.to_string()),
        },
        (Some("langs"), None) => InputLine::Languages,
        (Some("help"), None) => InputLine::Help,
        (Some("quit" | "q"), None) => InputLine::Quit,
        _ => InputLine::Invalid(format!("unrecognized command ':{directive}' (try :help)")),
    }
}

pub fn language_list() -> String {
    Language::ALL
        .iter()
        .map(|lang| format!("  {}  {}", lang.code(), lang.display_name()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn dispatch_session_command(
    cmd_tx: &Sender<SessionCommand>,
    cmd: SessionCommand,
) -> Result<(), String> {
    let cmd_name = match &cmd {
        SessionCommand::SetInput(_) => "set_input",
        SessionCommand::SetSourceLanguage(_) => "set_source_language",
        SessionCommand::SetTargetLanguage(_) => "set_target_language",
        SessionCommand::Submit => "submit",
        SessionCommand::Swap => "swap",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued session command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err("command queue is full; please retry".to_string()),
        Err(TrySendError::Closed(_)) => Err("translator session has stopped".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn plain_text_sets_input_and_submits() {
        assert_eq!(
            parse_line("hello world\n"),
            InputLine::Session(vec![
                SessionCommand::SetInput("hello world".into()),
                SessionCommand::Submit,
            ])
        );
    }

    #[test]
    fn empty_line_submits_the_current_input_unchanged() {
        assert_eq!(
            parse_line(""),
            InputLine::Session(vec![SessionCommand::Submit])
        );
        assert_eq!(
            parse_line("\r\n"),
            InputLine::Session(vec![SessionCommand::Submit])
        );
    }

    #[test]
    fn parses_directives() {
        assert_eq!(
            parse_line(":swap"),
            InputLine::Session(vec![SessionCommand::Swap])
        );
        assert_eq!(
            parse_line(":from Hindi"),
            InputLine::Session(vec![SessionCommand::SetSourceLanguage(Language::Hi)])
        );
        assert_eq!(
            parse_line(":to en"),
            InputLine::Session(vec![SessionCommand::SetTargetLanguage(Language::En)])
        );
        assert_eq!(parse_line(":langs"), InputLine::Languages);
        assert_eq!(parse_line(":help"), InputLine::Help);
        assert_eq!(parse_line(":q"), InputLine::Quit);
    }

    #[test]
    fn rejects_unknown_languages_and_directives() {
        assert!(matches!(parse_line(":to fr"), InputLine::Invalid(msg) if msg.contains("'fr'")));
        assert!(matches!(parse_line(":frobnicate"), InputLine::Invalid(_)));
        assert!(matches!(parse_line(":swap now"), InputLine::Invalid(_)));
    }

    #[test]
    fn lists_both_languages() {
        let list = language_list();
        assert!(list.contains("en  English"));
        assert!(list.contains("hi  Hindi"));
    }

    #[test]
    fn dispatch_reports_full_and_closed_queues() {
        let (tx, mut rx) = mpsc::channel(1);
        dispatch_session_command(&tx, SessionCommand::Swap).expect("first fits");
        let err = dispatch_session_command(&tx, SessionCommand::Swap).expect_err("full");
        assert!(err.contains("full"));

        assert_eq!(rx.try_recv().expect("queued"), SessionCommand::Swap);
        drop(rx);
        let err = dispatch_session_command(&tx, SessionCommand::Submit).expect_err("closed");
        assert!(err.contains("stopped"));
    }
}
