//! Plain-text rendering of a search session

use super::theme::DarkTheme;
use crate::app::{Mode, Session, EXAMPLE_QUESTIONS};
use crate::backend::{SearchResponse, Source};

pub const DISCLAIMER: &str = "This tool provides general information only. \
Consult qualified immigration attorneys for legal advice.";

/// Badge text for a source, e.g. `92% match`
pub fn match_badge(source: &Source) -> String {
    format!("{}% match", source.match_percent())
}

/// Render whatever the session currently shows
pub fn render(session: &Session) -> String {
    match session.mode() {
        Mode::Idle => String::new(),
        Mode::Loading => format!("{}\n", DarkTheme::muted().apply_to("Searching...")),
        Mode::Failed => render_error(session.error().unwrap_or("Unknown error")),
        Mode::Populated => session.result().map(render_response).unwrap_or_default(),
    }
}

pub fn render_error(message: &str) -> String {
    format!(
        "{}\n{}\n",
        DarkTheme::error().bold().apply_to("Error"),
        DarkTheme::error().apply_to(message)
    )
}

pub fn render_response(response: &SearchResponse) -> String {
    let mut lines = vec![
        DarkTheme::answer_heading().apply_to("Answer").to_string(),
        response.answer.clone(),
    ];

    if let Some(confidence) = response.confidence {
        lines.push(
            DarkTheme::muted()
                .apply_to(format!("Confidence: {:.0}%", confidence * 100.0))
                .to_string(),
        );
    }

    if !response.sources.is_empty() {
        lines.push(String::new());
        lines.push(DarkTheme::heading().apply_to("Legal Sources").to_string());
        for source in &response.sources {
            lines.push(format!(
                "  {}  [{}]",
                DarkTheme::heading().apply_to(&source.title),
                DarkTheme::badge().apply_to(match_badge(source))
            ));
            if !source.chunk.is_empty() {
                lines.push(format!("    {}", source.chunk));
            }
        }
    }

    finish(lines)
}

/// Numbered list of the built-in example questions
pub fn render_examples() -> String {
    let heading = DarkTheme::heading().apply_to("Example Questions").to_string();
    let numbered = EXAMPLE_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, question)| format!("  {}. {}", i + 1, question));
    finish(std::iter::once(heading).chain(numbered).collect())
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Effect, Message};

    fn h1b_response() -> SearchResponse {
        SearchResponse {
            query: "What are the requirements for H1B visa?".to_string(),
            answer: "The position must be a specialty occupation.".to_string(),
            sources: vec![Source {
                title: "8 CFR 214.2(h)".to_string(),
                chunk: "Specialty occupation means an occupation that requires...".to_string(),
                similarity: 0.92,
            }],
            confidence: None,
        }
    }

    #[test]
    fn test_match_badge() {
        assert_eq!(match_badge(&h1b_response().sources[0]), "92% match");
    }

    #[test]
    fn test_render_follows_session_from_loading_to_populated() {
        let mut session = Session::new();
        assert_eq!(render(&session), "");

        session.update(Message::PromptChanged(
            "What are the requirements for H1B visa?".to_string(),
        ));
        let request_id = match session.update(Message::Submit) {
            Effect::Search { request_id, .. } => request_id,
            Effect::None => panic!("Expected Search effect"),
        };
        assert!(render(&session).contains("Searching..."));

        session.update(Message::SearchCompleted {
            request_id,
            response: h1b_response(),
        });
        let shown = render(&session);
        assert!(shown.contains("The position must be a specialty occupation."));
        assert!(shown.contains("Legal Sources"));
        assert!(shown.contains("8 CFR 214.2(h)"));
        assert_eq!(shown.matches("% match").count(), 1);
        assert!(shown.contains("92% match"));
    }

    #[test]
    fn test_render_response_layout() {
        let shown = render_response(&h1b_response());
        let lines: Vec<&str> = shown.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Answer"));
        assert_eq!(lines[1], "The position must be a specialty occupation.");
        assert_eq!(lines[2], "");
        assert!(lines[3].contains("Legal Sources"));
        assert!(lines[4].contains("8 CFR 214.2(h)") && lines[4].contains("92% match"));
        assert_eq!(
            lines[5],
            "    Specialty occupation means an occupation that requires..."
        );
        assert!(shown.ends_with('\n') && !shown.ends_with("\n\n"));
    }

    #[test]
    fn test_render_omits_sources_section_when_empty() {
        let response = SearchResponse {
            sources: Vec::new(),
            confidence: Some(0.8),
            ..h1b_response()
        };
        let shown = render_response(&response);
        assert!(!shown.contains("Legal Sources"));
        assert!(shown.contains("Confidence: 80%"));
    }

    #[test]
    fn test_render_failed_session() {
        let mut session = Session::new();
        session.update(Message::PromptChanged("q".to_string()));
        let request_id = match session.update(Message::Submit) {
            Effect::Search { request_id, .. } => request_id,
            Effect::None => panic!("Expected Search effect"),
        };
        session.update(Message::SearchFailed {
            request_id,
            error: "API Error: 502 Bad Gateway".to_string(),
        });

        let shown = render(&session);
        assert!(shown.contains("Error"));
        assert!(shown.contains("Failed to search: API Error: 502 Bad Gateway"));
    }

    #[test]
    fn test_render_examples_numbers_from_one() {
        let shown = render_examples();
        assert!(shown.contains("1. What are the requirements for H1B visa?"));
        assert!(shown.contains("5. What are the eligibility criteria for DACA?"));
        assert_eq!(shown.lines().count(), EXAMPLE_QUESTIONS.len() + 1);
    }
}
