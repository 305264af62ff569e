//! Structured search results and their renderings.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// One completed search exchange, parsed from a raw service payload.
///
/// The service's wire shape is undocumented and shifts; every optional field
/// defaults rather than failing, and the untouched payload is kept in `raw`
/// so callers can reach fields this type does not model yet.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub query: String,
    pub answer: String,
    /// Source records as the service sent them; well-formed entries carry at
    /// least a title and a url.
    pub sources: Vec<Value>,
    pub related_questions: Vec<String>,
    pub mode: String,
    pub model: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub conversation_id: Option<String>,
    pub tokens_used: Option<u64>,
    pub raw: Value,
}

impl SearchResult {
    /// Map a raw service payload into a structured result. Missing fields
    /// become empty/absent defaults; `raw` keeps the payload verbatim.
    pub fn from_raw(raw: Value, query: &str) -> Self {
        Self {
            query: query.to_string(),
            answer: raw
                .get("answer")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            sources: raw
                .get("sources")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            related_questions: raw
                .get("related_questions")
                .and_then(Value::as_array)
                .map(|questions| {
                    questions
                        .iter()
                        .filter_map(|q| q.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            mode: raw
                .get("mode")
                .and_then(Value::as_str)
                .unwrap_or("auto")
                .to_string(),
            model: raw.get("model").and_then(Value::as_str).map(str::to_string),
            timestamp: Utc::now(),
            conversation_id: raw
                .get("conversation_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            tokens_used: raw.get("tokens_used").and_then(Value::as_u64),
            raw,
        }
    }

    /// Structured record of every field except the raw payload. Absent
    /// optionals serialize as null so the record shape is stable.
    pub fn to_record(&self) -> Value {
        serde_json::json!({
            "query": self.query,
            "answer": self.answer,
            "sources": self.sources,
            "related_questions": self.related_questions,
            "mode": self.mode,
            "model": self.model,
            "timestamp": self.timestamp.to_rfc3339(),
            "conversation_id": self.conversation_id,
            "tokens_used": self.tokens_used,
        })
    }

    /// Markdown rendering: answer, numbered source links, related questions.
    pub fn to_markdown(&self) -> String {
        let mut md = format!("# Query: {}\n\n", self.query);
        md.push_str(&format!("## Answer\n{}\n\n", self.answer));

        if !self.sources.is_empty() {
            md.push_str("## Sources\n");
            for (idx, source) in self.sources.iter().enumerate() {
                let title = source
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("Source");
                let url = source.get("url").and_then(Value::as_str).unwrap_or("#");
                md.push_str(&format!("{}. [{}]({})\n", idx + 1, title, url));
            }
            md.push('\n');
        }

        if !self.related_questions.is_empty() {
            md.push_str("## Related Questions\n");
            for question in &self.related_questions {
                md.push_str(&format!("- {}\n", question));
            }
        }

        md
    }
}
