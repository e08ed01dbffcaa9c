use std::fmt;

use nanoid::nanoid;
use serde::{Deserialize, Serialize};

/// A validated search query: non-empty after trimming.
/// Whitespace-only input never reaches the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Option<Query> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Query(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub query: String,
}

/// One ranked paper hit. The upstream API emits the summary text under
/// both `snippet` and `abstract`, and the identifier under `paper_id`;
/// both spellings are accepted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResult {
    #[serde(default, alias = "paper_id")]
    pub id: Option<String>,

    pub title: String,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default, alias = "abstract")]
    pub snippet: String,

    /// Fraction in [0, 1], higher is more similar. Never pre-scaled to a
    /// percentage and never inverted; scaling happens at render time.
    #[serde(default)]
    pub similarity: f64,

    #[serde(default)]
    pub url: Option<String>,
}

impl SearchResult {
    /// Identity of this result across re-renders.
    pub fn render_key(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// Results the server ships without an id get a generated one, so
    /// every result has a stable render key from the moment it is parsed.
    pub fn ensure_render_key(&mut self) {
        if self.id.is_none() {
            self.id = Some(nanoid!());
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,

    #[serde(default)]
    pub key_terms: Vec<String>,
}
