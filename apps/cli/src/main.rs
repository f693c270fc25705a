use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::DEFAULT_CONFIG_FILE, load_settings_from, HttpTranslator, SessionCommand, Settings,
    TranslatorSession,
};
use shared::domain::Language;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{dispatch_session_command, language_list, parse_line, InputLine, HELP};

const COMMAND_QUEUE_DEPTH: usize = 64;

/// Translate between English and Hindi with a typewriter reveal.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// TOML settings file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Provider endpoint, overriding settings.
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    from: Option<Language>,
    #[arg(long)]
    to: Option<Language>,
    /// Milliseconds between revealed characters.
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Translate these words once and exit instead of reading stdin.
    text: Vec<String>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(from) = self.from {
            settings.source_lang = from;
        }
        if let Some(to) = self.to {
            settings.target_lang = to;
        }
        if let Some(interval_ms) = self.interval_ms {
            settings.reveal_interval_ms = interval_ms;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(&args.config, |key| std::env::var(key).ok());
    args.apply(&mut settings);
    if settings.api_key.is_empty() {
        warn!("RAPIDAPI_KEY is not set; the provider will reject requests");
    }

    let translator = HttpTranslator::new(&settings).context("failed to build translator")?;
    let mut session = TranslatorSession::new(Arc::new(translator), &settings);
    let renderer = render::spawn_renderer(
        session.subscribe_reveal(),
        session.subscribe_loading(),
        session.subscribe_events(),
    );

    if args.text.is_empty() {
        run_interactive(&mut session).await;
    } else {
        session.set_input(args.text.join(" "));
        let _ = session.submit();
        session.finish().await;
    }

    drop(session);
    renderer.await.context("renderer task failed")?;
    Ok(())
}

async fn run_interactive(session: &mut TranslatorSession) {
    let langs = session.languages();
    eprintln!(
        "{} -> {} (:help for commands)",
        langs.source.display_name(),
        langs.target.display_name()
    );

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<SessionCommand>(COMMAND_QUEUE_DEPTH);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    warn!("failed to read stdin: {err}");
                    break;
                }
            };

            match parse_line(&line) {
                InputLine::Session(cmds) => {
                    for cmd in cmds {
                        if let Err(status) = dispatch_session_command(&cmd_tx, cmd) {
                            eprintln!("{status}");
                            break;
                        }
                    }
                }
                InputLine::Help => eprintln!("{HELP}"),
                InputLine::Languages => eprintln!("{}", language_list()),
                InputLine::Quit => break,
                InputLine::Invalid(status) => eprintln!("{status}"),
            }
        }
    });

    session.run(&mut cmd_rx).await;
    session.finish().await;
    let _ = reader.await;
}
