use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{instrument, warn};

use super::{Prompt, TextGenerator};
use crate::errors::ServiceError;

pub const ASK_FALLBACK: &str =
    "Sorry, the assistant is unavailable right now. Please try again in a moment.";
pub const MAX_SUGGESTIONS: usize = 5;
const MAX_INPUT_CHARS: usize = 2000;

const ASK_SYSTEM: &str = "You are the in-app assistant of Bucks, a marketplace and social app \
for local businesses, skilled professionals, shopping and food ordering. Answer concisely in \
plain text.";

const SUGGEST_SYSTEM: &str = "You suggest search terms for the Bucks marketplace. Reply with \
JSON only, shaped exactly as {\"suggestions\": [\"term\", ...]}, with at most five short \
search terms related to the user's query.";

#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    suggestions: Vec<String>,
}

/// Q&A and search-suggestion flows over a `TextGenerator`.
#[derive(Clone)]
pub struct AssistService {
    llm: Arc<dyn TextGenerator>,
    max_tokens: u32,
}

impl AssistService {
    pub fn new(llm: Arc<dyn TextGenerator>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    /// Blank questions are rejected; any LLM failure yields `ASK_FALLBACK`.
    #[instrument(skip(self, question))]
    pub async fn ask(&self, question: Option<&str>) -> Result<String, ServiceError> {
        let question = required_input(question, "question")?;
        let prompt = Prompt { system: ASK_SYSTEM.into(), user: question, max_tokens: self.max_tokens };
        match self.llm.generate(&prompt).await {
            Ok(answer) if !answer.trim().is_empty() => Ok(answer.trim().to_string()),
            Ok(_) => Ok(ASK_FALLBACK.to_string()),
            Err(e) => {
                warn!(event = "ai.ask.fallback", error = %e);
                Ok(ASK_FALLBACK.to_string())
            }
        }
    }

    /// At most five distinct, non-blank terms; `[query]` when the model fails
    /// or its output does not parse.
    #[instrument(skip(self, query))]
    pub async fn suggest_search_terms(&self, query: Option<&str>) -> Result<Vec<String>, ServiceError> {
        let query = required_input(query, "query")?;
        let prompt = Prompt { system: SUGGEST_SYSTEM.into(), user: query.clone(), max_tokens: self.max_tokens };
        let raw = match self.llm.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(event = "ai.suggest.fallback", error = %e);
                return Ok(vec![query]);
            }
        };
        match parse_suggestions(&raw) {
            Some(list) if !list.is_empty() => Ok(list),
            _ => {
                warn!(event = "ai.suggest.fallback", reason = "unparseable output");
                Ok(vec![query])
            }
        }
    }
}

fn required_input(value: Option<&str>, field: &str) -> Result<String, ServiceError> {
    let v = value.map(str::trim).filter(|v| !v.is_empty());
    match v {
        Some(v) if v.chars().count() > MAX_INPUT_CHARS => {
            Err(ServiceError::Validation(format!("{field} must be at most {MAX_INPUT_CHARS} characters")))
        }
        Some(v) => Ok(v.to_string()),
        None => Err(ServiceError::Validation(format!("{field} is required"))),
    }
}

/// Strip a surrounding ```/```json fence if the model added one.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else { return trimmed };
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

pub(crate) fn parse_suggestions(raw: &str) -> Option<Vec<String>> {
    let payload: SuggestionPayload = serde_json::from_str(strip_code_fence(raw)).ok()?;
    let mut seen = HashSet::new();
    let list = payload
        .suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .take(MAX_SUGGESTIONS)
        .collect();
    Some(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted {
        reply: Result<String, String>,
        seen: Mutex<Vec<Prompt>>,
    }

    impl Scripted {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self { reply: Ok(text.into()), seen: Mutex::new(Vec::new()) })
        }
        fn failing() -> Arc<Self> {
            Arc::new(Self { reply: Err("boom".into()), seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, prompt: &Prompt) -> Result<String, ServiceError> {
            self.seen.lock().unwrap().push(prompt.clone());
            self.reply.clone().map_err(ServiceError::Upstream)
        }
    }

    #[tokio::test]
    async fn ask_returns_trimmed_answer() {
        let llm = Scripted::ok("  Try the food tab.\n");
        let svc = AssistService::new(llm.clone(), 128);
        assert_eq!(svc.ask(Some(" where is pizza? ")).await.unwrap(), "Try the food tab.");
        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user, "where is pizza?");
        assert_eq!(seen[0].max_tokens, 128);
    }

    #[tokio::test]
    async fn ask_falls_back_on_failure() {
        let svc = AssistService::new(Scripted::failing(), 128);
        assert_eq!(svc.ask(Some("hello")).await.unwrap(), ASK_FALLBACK);
    }

    #[tokio::test]
    async fn blank_inputs_are_rejected() {
        let svc = AssistService::new(Scripted::ok("x"), 128);
        assert!(matches!(svc.ask(Some("   ")).await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.ask(None).await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.suggest_search_terms(Some("")).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn suggestions_are_deduplicated_and_capped() {
        let llm = Scripted::ok(
            "```json\n{\"suggestions\": [\"Pizza\", \"pizza\", \" \", \"pasta\", \"calzone\", \"salad\", \"tiramisu\", \"gelato\"]}\n```",
        );
        let svc = AssistService::new(llm, 128);
        let out = svc.suggest_search_terms(Some("italian")).await.unwrap();
        assert_eq!(out, vec!["Pizza", "pasta", "calzone", "salad", "tiramisu"]);
    }

    #[tokio::test]
    async fn suggestions_fall_back_to_query() {
        let svc = AssistService::new(Scripted::ok("I think you want pizza"), 128);
        assert_eq!(svc.suggest_search_terms(Some("italian")).await.unwrap(), vec!["italian"]);

        let svc = AssistService::new(Scripted::failing(), 128);
        assert_eq!(svc.suggest_search_terms(Some("italian")).await.unwrap(), vec!["italian"]);

        let svc = AssistService::new(Scripted::ok("{\"suggestions\": []}"), 128);
        assert_eq!(svc.suggest_search_terms(Some("italian")).await.unwrap(), vec!["italian"]);
    }

    #[test]
    fn fence_stripping() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }
}
