//! Slash command parsing for the interactive session
//!
//! Parses commands like /examples, /health, /llm from user input.

use crate::app::EXAMPLE_QUESTIONS;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Not a command, a question for the backend (default)
    Ask { question: String },
    /// List example questions: /examples
    Examples,
    /// Ask an example question by number: /example <n>
    Example { index: usize },
    /// Probe the backend: /health
    Health,
    /// Toggle LLM answer generation: /llm on|off
    Llm { enabled: bool },
    /// Clear the last answer: /clear
    Clear,
    /// Show help: /help
    Help,
    /// Leave the session: /quit
    Quit,
    /// Malformed command; carries the message to show
    Invalid { message: String },
}

impl Command {
    /// Parse user input into a command
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if !input.starts_with('/') {
            return Command::Ask {
                question: input.to_string(),
            };
        }

        let parts: Vec<&str> = input.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "/examples" | "/ex" => Command::Examples,
            "/example" | "/e" => match args.parse::<usize>() {
                Ok(n) if (1..=EXAMPLE_QUESTIONS.len()).contains(&n) => {
                    Command::Example { index: n - 1 }
                }
                _ => Command::Invalid {
                    message: format!("Usage: /example <1-{}>", EXAMPLE_QUESTIONS.len()),
                },
            },
            "/health" => Command::Health,
            "/llm" => match args.to_lowercase().as_str() {
                "on" => Command::Llm { enabled: true },
                "off" => Command::Llm { enabled: false },
                _ => Command::Invalid {
                    message: "Usage: /llm on|off".to_string(),
                },
            },
            "/clear" | "/cl" => Command::Clear,
            "/help" | "/h" | "/?" => Command::Help,
            "/quit" | "/q" | "/exit" => Command::Quit,
            _ => Command::Invalid {
                message: format!("Unknown command: {}. Type /help for available commands.", cmd),
            },
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r#"Available Commands:
/examples        - List example questions
/example <n>     - Ask example question n
/health          - Check whether the backend is reachable
/llm on|off      - Generate answers with the LLM (default: off)
/clear           - Clear the last answer
/help            - Show this help
/quit            - Leave the session

Tip: Just type your immigration law question!"#
    }
}
