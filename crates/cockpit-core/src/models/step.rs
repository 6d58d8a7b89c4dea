//! The linear step sequence of the article wizard.
//!
//! The order lives in [`STEP_SEQUENCE`]; "next" and "terminal" are derived
//! from a step's position in that array rather than matched per variant.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    TopicInput,
    Research,
    Outline,
    #[serde(rename = "CONTENT_PART_1")]
    ContentPart1,
    #[serde(rename = "CONTENT_PART_2")]
    ContentPart2,
    #[serde(rename = "CONTENT_PART_3")]
    ContentPart3,
    Completed,
}

/// Every step in workflow order. The first entry is the initial state,
/// the last one is terminal.
pub const STEP_SEQUENCE: [Step; 7] = [
    Step::TopicInput,
    Step::Research,
    Step::Outline,
    Step::ContentPart1,
    Step::ContentPart2,
    Step::ContentPart3,
    Step::Completed,
];

impl Step {
    pub fn position(self) -> usize {
        STEP_SEQUENCE
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    /// The step after this one, or `None` for the terminal step.
    pub fn next(self) -> Option<Step> {
        STEP_SEQUENCE.get(self.position() + 1).copied()
    }

    pub fn is_initial(self) -> bool {
        self.position() == 0
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Steps that produce a draft the user reviews and accepts.
    pub fn is_review_step(self) -> bool {
        !self.is_initial() && !self.is_terminal()
    }

    /// Part number (1-3) for the content-writing steps.
    pub fn content_part(self) -> Option<u8> {
        match self {
            Self::ContentPart1 => Some(1),
            Self::ContentPart2 => Some(2),
            Self::ContentPart3 => Some(3),
            _ => None,
        }
    }

    /// Key under which the step's accepted artifact is stored.
    pub fn artifact_key(self) -> Option<&'static str> {
        match self {
            Self::Research => Some("research"),
            Self::Outline => Some("outline"),
            Self::ContentPart1 => Some("part1"),
            Self::ContentPart2 => Some("part2"),
            Self::ContentPart3 => Some("part3"),
            Self::TopicInput | Self::Completed => None,
        }
    }

    /// Short label for progress displays.
    pub fn label(self) -> &'static str {
        match self {
            Self::TopicInput => "Thema",
            Self::Research => "Recherche",
            Self::Outline => "Gliederung & SEO",
            Self::ContentPart1 => "Teil 1",
            Self::ContentPart2 => "Teil 2",
            Self::ContentPart3 => "Teil 3",
            Self::Completed => "Fertig",
        }
    }

    /// Heading shown above a step's draft.
    pub fn title(self) -> &'static str {
        match self {
            Self::TopicInput => "Thema wählen",
            Self::Research => "Schritt 1: Web Recherche",
            Self::Outline => "Schritt 2: Gliederung & SEO",
            Self::ContentPart1 => "Schritt 3: Artikel Teil 1 (Einleitung)",
            Self::ContentPart2 => "Schritt 4: Artikel Teil 2 (Hauptteil)",
            Self::ContentPart3 => "Schritt 5: Artikel Teil 3 (Fazit)",
            Self::Completed => "Fertiger Blogartikel",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopicInput => "TOPIC_INPUT",
            Self::Research => "RESEARCH",
            Self::Outline => "OUTLINE",
            Self::ContentPart1 => "CONTENT_PART_1",
            Self::ContentPart2 => "CONTENT_PART_2",
            Self::ContentPart3 => "CONTENT_PART_3",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        STEP_SEQUENCE.iter().copied().find(|step| step.as_str() == s)
    }
}

impl PartialOrd for Step {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Step {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position().cmp(&other.position())
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Done,
    Current,
    Pending,
}

/// One entry of the progress indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepProgress {
    pub step: Step,
    pub label: String,
    pub state: StepState,
}

/// Progress of `current` over the visible steps (everything after topic input).
/// Empty while the topic is still being entered.
pub fn progress(current: Step) -> Vec<StepProgress> {
    if current.is_initial() {
        return Vec::new();
    }
    STEP_SEQUENCE
        .iter()
        .copied()
        .filter(|step| !step.is_initial())
        .map(|step| StepProgress {
            step,
            label: step.label().to_string(),
            state: match step.cmp(&current) {
                Ordering::Less => StepState::Done,
                Ordering::Equal => StepState::Current,
                Ordering::Greater => StepState::Pending,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_follows_sequence() {
        assert_eq!(Step::TopicInput.next(), Some(Step::Research));
        assert_eq!(Step::ContentPart3.next(), Some(Step::Completed));
        assert_eq!(Step::Completed.next(), None);
        assert!(Step::Completed.is_terminal());
        assert!(!Step::Research.is_terminal());
    }

    #[test]
    fn test_ordering_matches_sequence() {
        assert!(Step::TopicInput < Step::Research);
        assert!(Step::Outline < Step::ContentPart1);
        assert!(Step::ContentPart3 < Step::Completed);
        let mut shuffled = vec![Step::Completed, Step::Research, Step::ContentPart2, Step::TopicInput];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Step::TopicInput, Step::Research, Step::ContentPart2, Step::Completed]
        );
    }

    #[test]
    fn test_review_steps() {
        let review: Vec<Step> = STEP_SEQUENCE.iter().copied().filter(|s| s.is_review_step()).collect();
        assert_eq!(
            review,
            vec![
                Step::Research,
                Step::Outline,
                Step::ContentPart1,
                Step::ContentPart2,
                Step::ContentPart3
            ]
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Step::ContentPart2).unwrap(), "\"CONTENT_PART_2\"");
        assert_eq!(serde_json::to_string(&Step::TopicInput).unwrap(), "\"TOPIC_INPUT\"");
        assert_eq!(Step::from_str("OUTLINE"), Some(Step::Outline));
        assert_eq!(Step::from_str("nope"), None);
    }

    #[test]
    fn test_progress() {
        assert!(progress(Step::TopicInput).is_empty());

        let entries = progress(Step::Outline);
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].state, StepState::Done);
        assert_eq!(entries[1].state, StepState::Current);
        assert_eq!(entries[5].state, StepState::Pending);
        assert_eq!(entries[5].label, "Fertig");
    }
}
