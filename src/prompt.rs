use crate::core::config::SummaryMode;

/// Opening line of every summary prompt
pub const PROMPT_PREAMBLE: &str = "The following is a record of group chat messages:";

/// Instruction placed after the message lines
pub const PROMPT_CLOSING: &str = "Please summarize the content above.";

/// Sent instead of a summary when no language model provider is registered
pub const PROVIDER_NOT_CONFIGURED: &str =
    "❌ No language model is configured, so a summary cannot be generated.";

/// Sent when the provider call fails or times out
pub const PROVIDER_FAILED: &str =
    "❌ Sorry, I couldn't generate a summary at this time. Please try again later.";

/// First line of every dispatched summary
pub const SUMMARY_HEADER: &str = "📝 Group chat summary:";

/// Reply to the help command. `{trigger}`, `{count}` and `{time}` are filled in by
/// [`render_help_text`].
pub const HELP_TEMPLATE: &str = "📝 Group chat summary help\n\
1. Automatic: a summary is sent after every {count} messages in this group.\n\
2. Manual: send {trigger} to summarize the messages collected so far.\n\
3. Scheduled: when daily mode is enabled, a summary is sent every day at {time}.\n\
Each summary ends with the current weather for the configured location.";

#[must_use]
pub fn style_suffix(mode: SummaryMode) -> &'static str {
    match mode {
        SummaryMode::Concise => "Summarize in a concise style.",
        SummaryMode::Formal => "Summarize in a rigorous, formal style.",
        SummaryMode::Humorous => "Summarize in a humorous style.",
    }
}

/// Builds the provider prompt: preamble, one line per buffered message in the
/// order received, closing instruction, then the style suffix.
#[must_use]
pub fn build_summary_prompt(messages: &[String], mode: SummaryMode) -> String {
    let mut prompt = String::with_capacity(
        PROMPT_PREAMBLE.len() + messages.iter().map(|m| m.len() + 1).sum::<usize>() + 96,
    );
    prompt.push_str(PROMPT_PREAMBLE);
    prompt.push('\n');
    for message in messages {
        prompt.push_str(message);
        prompt.push('\n');
    }
    prompt.push_str(PROMPT_CLOSING);
    prompt.push_str(style_suffix(mode));
    prompt
}

#[must_use]
pub fn render_help_text(trigger_command: &str, message_count: usize, send_time: &str) -> String {
    HELP_TEMPLATE
        .replace("{trigger}", trigger_command)
        .replace("{count}", &message_count.to_string())
        .replace("{time}", send_time)
}
