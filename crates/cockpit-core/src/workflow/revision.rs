//! Feedback-driven regeneration of the current draft.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevisionMode {
    #[default]
    Viewing,
    Editing,
}

/// Mode and pending feedback text for the draft under review.
#[derive(Debug, Clone, Default)]
pub struct RevisionLoop {
    mode: RevisionMode,
    feedback: String,
}

impl RevisionLoop {
    pub fn mode(&self) -> RevisionMode {
        self.mode
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn is_editing(&self) -> bool {
        self.mode == RevisionMode::Editing
    }

    /// Flip between viewing and editing. Leaving editing drops the pending
    /// feedback.
    pub fn toggle(&mut self) -> RevisionMode {
        self.mode = match self.mode {
            RevisionMode::Viewing => RevisionMode::Editing,
            RevisionMode::Editing => {
                self.feedback.clear();
                RevisionMode::Viewing
            }
        };
        self.mode
    }

    pub fn set_feedback(&mut self, feedback: &str) {
        self.feedback = feedback.to_string();
    }

    /// The revision succeeded: back to viewing with no pending feedback.
    pub fn finish(&mut self) {
        self.mode = RevisionMode::Viewing;
        self.feedback.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
