use crate::cli::ux::{
    ChatMessageType, GenerationSpinner, present_error, render_reply, style_chat_text,
};
use anyhow::{Context, Result};
use lightai_core::model::Reply;
use lightai_core::responder::Responder;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, warn};

/// Prefixes that send a single line to the remote provider.
const REMOTE_PREFIXES: [&str; 2] = ["/openai ", "/o "];
const EXIT_COMMANDS: [&str; 3] = ["/quit", "/q", "/exit"];

/// A line read from the terminal, after trimming.
#[derive(Debug, PartialEq, Eq)]
enum LineInput<'a> {
    Empty,
    Exit,
    Message { text: &'a str, force_remote: bool },
}

fn parse_line(line: &str) -> LineInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineInput::Empty;
    }
    if EXIT_COMMANDS.contains(&line) {
        return LineInput::Exit;
    }

    REMOTE_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(*prefix))
        .map(|text| LineInput::Message {
            text,
            force_remote: true,
        })
        .unwrap_or(LineInput::Message {
            text: line,
            force_remote: false,
        })
}

/// A history failure only costs that entry; the session keeps reading.
fn record_history(result: rustyline::Result<bool>) -> bool {
    match result {
        Ok(added) => added,
        Err(err) => {
            warn!("Failed to record history entry: {err}");
            false
        }
    }
}

/// Produces the reply on its own task so a panic ends only this line.
async fn respond(
    responder: Arc<Responder>,
    text: String,
    force_remote: bool,
) -> Result<Reply, JoinError> {
    tokio::spawn(async move { responder.get_reply(&text, force_remote).await }).await
}

/// Runs the interactive REPL until the user exits.
pub async fn run(responder: Arc<Responder>) -> Result<()> {
    println!(
        "Welcome to LightAI! Prefix a line with /openai or /o to ask the remote model, '/q' to exit."
    );
    if !responder.remote_available() {
        println!("No OPENAI_API_KEY set, every reply is local.");
    }

    let config = rustyline::Config::builder()
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .build();
    let mut rl = DefaultEditor::with_config(config)?;
    let prompt = format!("\n{}", style_chat_text("> ", ChatMessageType::Prompt));

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                record_history(rl.add_history_entry(line.as_str()));

                match parse_line(&line) {
                    LineInput::Empty => continue,
                    LineInput::Exit => {
                        println!("Bye!");
                        return Ok(());
                    }
                    LineInput::Message { text, force_remote } => {
                        debug!(force_remote, "Read line");
                        let spinner = GenerationSpinner::new("Thinking...".to_string());
                        let result = respond(responder.clone(), text.to_string(), force_remote).await;
                        spinner.clear();

                        match result {
                            Ok(reply) => println!("{}", render_reply(&reply)),
                            Err(err) => {
                                present_error(
                                    anyhow::Error::new(err).context("Failed to produce a reply"),
                                );
                            }
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Type /quit to exit.");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nBye!");
                return Ok(());
            }
            Err(err) => {
                return Err(err).context("Failed to read from terminal");
            }
        }
    }
}
