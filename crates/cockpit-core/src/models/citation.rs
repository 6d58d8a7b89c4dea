use serde::{Deserialize, Serialize};

/// A web source the research step was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub uri: String,
    pub title: String,
}

impl SourceCitation {
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: title.into(),
        }
    }

    /// `- {title}: {uri}`, the form used in outline prompts.
    pub fn list_line(&self) -> String {
        format!("- {}: {}", self.title, self.uri)
    }
}
