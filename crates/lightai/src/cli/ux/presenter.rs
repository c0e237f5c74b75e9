use console::{Style, StyledObject};
use lightai_core::model::{Reply, ReplySource};

/// Represents the type of a chat message, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMessageType {
    /// The prompt for user input.
    Prompt,
    /// The tag naming which backend answered.
    Source(ReplySource),
    /// An error message.
    Error,
}

/// Styles a string of text according to the specified `ChatMessageType`.
pub fn style_chat_text(text: &str, style: ChatMessageType) -> StyledObject<&str> {
    let style_obj = match style {
        ChatMessageType::Prompt => Style::new().blue().bold(),
        ChatMessageType::Source(ReplySource::Local) => Style::new().green().dim(),
        ChatMessageType::Source(ReplySource::Remote) => Style::new().magenta().dim(),
        ChatMessageType::Error => Style::new().red().bold(),
    };
    style_obj.apply_to(text)
}

/// Formats a reply as `[source] text` for the terminal.
pub fn render_reply(reply: &Reply) -> String {
    let tag = format!("[{}]", reply.source);
    format!(
        "{} {}",
        style_chat_text(&tag, ChatMessageType::Source(reply.source)),
        reply.reply
    )
}
