//! Search session state
//!
//! The question form as a message-driven state machine: the front end feeds
//! `Message`s into `Session::update` and performs the returned `Effect`.

use uuid::Uuid;

use crate::backend::{SearchRequest, SearchResponse};

/// Questions offered to new users
pub const EXAMPLE_QUESTIONS: [&str; 5] = [
    "What are the requirements for H1B visa?",
    "How long can I stay in the US with a tourist visa?",
    "What is the process for applying for asylum in the United States?",
    "What documents are needed for naturalization?",
    "What are the eligibility criteria for DACA?",
];

// ============================================================================
// State Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Loading,
    Populated,
    Failed,
}

#[derive(Debug, Clone)]
pub enum Message {
    PromptChanged(String),
    ExampleSelected(usize),
    ToggleLlm(bool),
    Submit,
    SearchCompleted {
        request_id: Uuid,
        response: SearchResponse,
    },
    SearchFailed {
        request_id: Uuid,
        error: String,
    },
    Clear,
}

/// Work the caller must carry out after an update
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Search {
        request_id: Uuid,
        request: SearchRequest,
    },
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Default)]
pub struct Session {
    prompt: String,
    mode: Mode,
    result: Option<SearchResponse>,
    error: Option<String>,
    use_llm: bool,
    /// Only the completion carrying this id is applied
    pending: Option<Uuid>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn result(&self) -> Option<&SearchResponse> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn use_llm(&self) -> bool {
        self.use_llm
    }

    pub fn update(&mut self, message: Message) -> Effect {
        match message {
            Message::PromptChanged(prompt) => {
                self.prompt = prompt;
                Effect::None
            }

            Message::ExampleSelected(index) => {
                if let Some(example) = EXAMPLE_QUESTIONS.get(index) {
                    self.prompt = example.to_string();
                }
                Effect::None
            }

            Message::ToggleLlm(enabled) => {
                self.use_llm = enabled;
                Effect::None
            }

            Message::Submit => self.submit(),

            Message::SearchCompleted {
                request_id,
                response,
            } => {
                if self.take_pending(request_id) {
                    self.result = Some(response);
                    self.mode = Mode::Populated;
                }
                Effect::None
            }

            Message::SearchFailed { request_id, error } => {
                if self.take_pending(request_id) {
                    self.error = Some(format!("Failed to search: {}", error));
                    self.mode = Mode::Failed;
                }
                Effect::None
            }

            Message::Clear => {
                *self = Self {
                    use_llm: self.use_llm,
                    ..Self::default()
                };
                Effect::None
            }
        }
    }

    fn submit(&mut self) -> Effect {
        let query = self.prompt.trim();
        if query.is_empty() {
            return Effect::None;
        }

        let request = SearchRequest::new(query).with_llm(self.use_llm);
        let request_id = Uuid::new_v4();

        if let Some(previous) = self.pending.replace(request_id) {
            tracing::debug!("Superseding in-flight search {}", previous);
        }
        self.mode = Mode::Loading;
        self.result = None;
        self.error = None;

        Effect::Search {
            request_id,
            request,
        }
    }

    fn take_pending(&mut self, request_id: Uuid) -> bool {
        if self.pending == Some(request_id) {
            self.pending = None;
            true
        } else {
            tracing::debug!("Dropping stale response for search {}", request_id);
            false
        }
    }
}
