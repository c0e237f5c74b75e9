//! Rule-based responder that never leaves the process.
//!
//! Rules are checked in order against the trimmed, lower-cased message and the
//! first match produces the reply. Later rules must never shadow earlier ones,
//! so new rules go before the echo fallback and nowhere else.
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

pub const PROMPT_REPLY: &str = "Please say something — I'm listening.";
pub const GREETING_REPLY: &str = "Hello — I am LightAI, your local assistant.";
pub const HELP_REPLY: &str = "Ask me for the time or a joke, or say anything and I will echo it. \
    To ask the remote model, prefix a line with /openai (or /o) in the terminal, \
    or send \"use_openai\": true to POST /chat.";
pub const JOKE_REPLY: &str =
    "Why do programmers prefer dark mode? Because light attracts bugs.";
pub const TIME_PREFIX: &str = "Local server time:";

static GREETING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(hi|hello|hey)\b").unwrap());

struct Rule {
    matches: fn(&str) -> bool,
    respond: fn() -> String,
}

static RULES: &[Rule] = &[
    Rule {
        matches: |text| text.is_empty(),
        respond: || PROMPT_REPLY.to_string(),
    },
    Rule {
        matches: |text| GREETING.is_match(text),
        respond: || GREETING_REPLY.to_string(),
    },
    Rule {
        matches: |text| text.contains("time"),
        respond: || format!("{TIME_PREFIX} {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
    },
    Rule {
        matches: |text| text.contains("help"),
        respond: || HELP_REPLY.to_string(),
    },
    Rule {
        matches: |text| text.contains("joke"),
        respond: || JOKE_REPLY.to_string(),
    },
];

/// Produces a reply without any network access. Never fails.
pub fn local_reply(message: &str) -> String {
    let text = message.trim().to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&text))
        .map(|rule| (rule.respond)())
        .unwrap_or_else(|| echo_reply(message))
}

fn echo_reply(message: &str) -> String {
    format!(
        "You said: \"{message}\". I can echo, answer simple questions (time, help, jokes), \
         or route to a remote model."
    )
}
