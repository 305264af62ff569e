//! Per-call request configuration and the derived network payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::Role;
use crate::error::{Error, Result};
use crate::modes::{is_compatible, AiModel, SearchMode, SourceType};

/// One role/content pair sent as conversation context with a follow-up query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: Role,
    pub content: String,
}

/// Conversation context attached to a follow-up request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpContext {
    pub conversation_id: String,
    pub context: Vec<ContextMessage>,
}

/// Configuration for a single search call.
///
/// Owned exclusively by the call that creates it; validate with
/// [`SearchRequest::validate`] before handing it to a client.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub mode: SearchMode,
    pub model: Option<AiModel>,
    pub sources: Vec<SourceType>,
    pub language: String,
    pub incognito: bool,
    pub files: Option<BTreeMap<String, String>>,
    pub follow_up: Option<FollowUpContext>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode: SearchMode::Auto,
            model: None,
            sources: vec![SourceType::Web],
            language: "en-US".to_string(),
            incognito: false,
            files: None,
            follow_up: None,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn model(mut self, model: AiModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn sources(mut self, sources: Vec<SourceType>) -> Self {
        self.sources = sources;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn incognito(mut self, incognito: bool) -> Self {
        self.incognito = incognito;
        self
    }

    pub fn files(mut self, files: BTreeMap<String, String>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn follow_up(mut self, follow_up: FollowUpContext) -> Self {
        self.follow_up = Some(follow_up);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Check the request against the static rules. Fails before any network
    /// activity when the query is empty or the model is not in the active
    /// mode's allow-list.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::InvalidParameter(
                "query must not be empty".to_string(),
            ));
        }
        if !is_compatible(self.mode, self.model) {
            return Err(Error::InvalidParameter(format!(
                "model {} is not compatible with mode {}",
                self.model.map(|m| m.as_str()).unwrap_or("none"),
                self.mode,
            )));
        }
        Ok(())
    }

    /// Derive the flat network payload.
    ///
    /// Query, mode, language, incognito and sources are always present; an
    /// empty source list is normalized to `["web"]`. Optional fields are
    /// omitted entirely when absent, never serialized as null.
    pub fn payload(&self) -> Value {
        let sources: Vec<&str> = if self.sources.is_empty() {
            vec![SourceType::Web.as_str()]
        } else {
            self.sources.iter().map(|s| s.as_str()).collect()
        };

        let mut payload = serde_json::json!({
            "query": self.query,
            "mode": self.mode.as_str(),
            "language": self.language,
            "incognito": self.incognito,
            "sources": sources,
        });

        let obj = payload.as_object_mut().unwrap();

        if let Some(model) = self.model {
            obj.insert("model".to_string(), serde_json::json!(model.as_str()));
        }
        if let Some(files) = &self.files {
            obj.insert("files".to_string(), serde_json::json!(files));
        }
        if let Some(follow_up) = &self.follow_up {
            obj.insert("follow_up".to_string(), serde_json::json!(follow_up));
        }
        if let Some(max_tokens) = self.max_tokens {
            obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }
        if let Some(temperature) = self.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temperature));
        }

        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_rejected() {
        assert!(matches!(
            SearchRequest::new("").validate(),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            SearchRequest::new("   ").validate(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn incompatible_pairings_are_rejected() {
        let request = SearchRequest::new("hello")
            .mode(SearchMode::Auto)
            .model(AiModel::Sonar);
        assert!(matches!(
            request.validate(),
            Err(Error::InvalidParameter(_))
        ));

        let request = SearchRequest::new("hello")
            .mode(SearchMode::Reasoning)
            .model(AiModel::Gpt4o);
        assert!(matches!(
            request.validate(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn compatible_pairings_pass() {
        SearchRequest::new("hello")
            .mode(SearchMode::Pro)
            .model(AiModel::Claude37Sonnet)
            .validate()
            .unwrap();
        SearchRequest::new("hello")
            .mode(SearchMode::Reasoning)
            .model(AiModel::R1)
            .validate()
            .unwrap();
        SearchRequest::new("hello")
            .mode(SearchMode::DeepResearch)
            .validate()
            .unwrap();
    }

    #[test]
    fn default_payload_matches_contract() {
        let payload = SearchRequest::new("What is quantum computing?").payload();
        assert_eq!(
            payload,
            serde_json::json!({
                "query": "What is quantum computing?",
                "mode": "auto",
                "language": "en-US",
                "incognito": false,
                "sources": ["web"],
            })
        );
    }

    #[test]
    fn empty_source_list_defaults_to_web() {
        let payload = SearchRequest::new("q").sources(vec![]).payload();
        assert_eq!(payload["sources"], serde_json::json!(["web"]));
    }

    #[test]
    fn optional_fields_are_omitted_not_null() {
        let payload = SearchRequest::new("q").payload();
        let obj = payload.as_object().unwrap();
        for key in ["model", "files", "follow_up", "max_tokens", "temperature"] {
            assert!(!obj.contains_key(key), "{key} should be omitted");
        }
    }

    #[test]
    fn optional_fields_are_included_when_present() {
        let mut files = BTreeMap::new();
        files.insert("notes.txt".to_string(), "contents".to_string());

        let payload = SearchRequest::new("q")
            .mode(SearchMode::Pro)
            .model(AiModel::Gpt4o)
            .files(files)
            .max_tokens(512)
            .temperature(0.2)
            .follow_up(FollowUpContext {
                conversation_id: "c-1".to_string(),
                context: vec![ContextMessage {
                    role: Role::User,
                    content: "earlier question".to_string(),
                }],
            })
            .payload();

        assert_eq!(payload["model"], "gpt-4o");
        assert_eq!(payload["files"]["notes.txt"], "contents");
        assert_eq!(payload["follow_up"]["conversation_id"], "c-1");
        assert_eq!(payload["follow_up"]["context"][0]["role"], "user");
        assert_eq!(payload["max_tokens"], 512);
        let temperature = payload["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
    }

    #[test]
    fn ordered_sources_are_preserved() {
        let payload = SearchRequest::new("q")
            .sources(vec![SourceType::Scholar, SourceType::Web, SourceType::Reddit])
            .payload();
        assert_eq!(
            payload["sources"],
            serde_json::json!(["scholar", "web", "reddit"])
        );
    }
}
