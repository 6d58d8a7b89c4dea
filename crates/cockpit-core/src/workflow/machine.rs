//! The article wizard state machine.

use std::collections::BTreeMap;

use serde::Serialize;

use super::dispatch::{Dispatch, GenerationOutput, GenerationRequest, Ticket};
use super::revision::{RevisionLoop, RevisionMode};
use super::WizardError;
use crate::gateway::{GatewayError, Operation};
use crate::models::{progress, SourceCitation, Step, StepProgress};

/// What an outstanding request will be used for once it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Draft(Step),
    Revision,
    Production,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: Ticket,
    purpose: Purpose,
    operation: Operation,
}

/// Result of feeding a gateway outcome back into the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The call failed; the message is also kept as the wizard's error.
    Failed(String),
    /// The ticket was not outstanding (e.g. the wizard was reset meanwhile).
    Stale,
}

#[derive(Debug, Clone)]
pub struct ArticleWizard {
    internal_links: Vec<String>,
    step: Step,
    topic: String,
    artifacts: BTreeMap<Step, String>,
    citations: Vec<SourceCitation>,
    draft: Option<String>,
    revision: RevisionLoop,
    production: Option<String>,
    in_flight: Option<InFlight>,
    next_ticket: Ticket,
    last_error: Option<String>,
}

impl ArticleWizard {
    pub fn new(internal_links: Vec<String>) -> Self {
        Self {
            internal_links,
            step: Step::TopicInput,
            topic: String::new(),
            artifacts: BTreeMap::new(),
            citations: Vec::new(),
            draft: None,
            revision: RevisionLoop::default(),
            production: None,
            in_flight: None,
            next_ticket: 1,
            last_error: None,
        }
    }

    // ── Intents ────────────────────────────────────────────────────────

    /// Begin a run for `topic` and request the research.
    pub fn start(&mut self, topic: &str) -> Result<Dispatch, WizardError> {
        self.ensure_idle()?;
        if self.step != Step::TopicInput {
            return Err(WizardError::InvalidTransition(
                "Der Ablauf wurde bereits gestartet.".to_string(),
            ));
        }
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(WizardError::InputValidation(
                "Bitte geben Sie ein Thema für den Blogartikel ein.".to_string(),
            ));
        }

        self.topic = topic.to_string();
        self.advance_to(Step::Research);
        tracing::info!("[Wizard] Started run for topic '{}'", self.topic);
        self.request_for_current_step()
    }

    /// Accept the current draft and move on. Returns the request for the
    /// next step, or the production request when the article is complete.
    pub fn accept(&mut self) -> Result<Dispatch, WizardError> {
        self.ensure_idle()?;
        if !self.step.is_review_step() {
            return Err(WizardError::InvalidTransition(format!(
                "Im Schritt {} gibt es nichts zu akzeptieren.",
                self.step
            )));
        }
        let draft = self.draft.take().ok_or_else(|| {
            WizardError::InvalidTransition("Es liegt noch kein Entwurf vor.".to_string())
        })?;

        self.artifacts.insert(self.step, draft);
        let next = self.step.next().unwrap_or(Step::Completed);
        tracing::info!("[Wizard] Accepted {}, advancing to {}", self.step, next);
        self.advance_to(next);
        self.request_for_current_step()
    }

    /// Re-issue the request for the current step after a failure.
    pub fn retry(&mut self) -> Result<Dispatch, WizardError> {
        self.ensure_idle()?;
        if self.step.is_initial() {
            return Err(WizardError::InvalidTransition(
                "Der Ablauf wurde noch nicht gestartet.".to_string(),
            ));
        }
        if self.draft.is_some() {
            return Err(WizardError::InvalidTransition(
                "Es liegt bereits ein Entwurf vor.".to_string(),
            ));
        }
        if self.production.is_some() {
            return Err(WizardError::InvalidTransition(
                "Der finale Blogartikel wurde bereits erstellt.".to_string(),
            ));
        }
        self.request_for_current_step()
    }

    /// Discard everything and return to topic input. Valid at any time; an
    /// outstanding request is abandoned and its result will be ignored.
    pub fn reset(&mut self) {
        if let Some(in_flight) = self.in_flight {
            tracing::info!(
                "[Wizard] Reset while {} was in flight (ticket {})",
                in_flight.operation,
                in_flight.ticket
            );
        }
        // Tickets keep counting so late completions never match.
        *self = Self {
            next_ticket: self.next_ticket,
            ..Self::new(std::mem::take(&mut self.internal_links))
        };
    }

    pub fn toggle_editing(&mut self) -> Result<RevisionMode, WizardError> {
        self.ensure_idle()?;
        self.ensure_draft()?;
        Ok(self.revision.toggle())
    }

    /// Record feedback as it is typed.
    pub fn set_feedback(&mut self, feedback: &str) -> Result<(), WizardError> {
        self.ensure_idle()?;
        self.ensure_editing()?;
        self.revision.set_feedback(feedback);
        Ok(())
    }

    /// Ask for the draft to be rewritten according to `feedback`.
    pub fn submit_feedback(&mut self, feedback: &str) -> Result<Dispatch, WizardError> {
        self.ensure_idle()?;
        self.ensure_editing()?;
        self.revision.set_feedback(feedback);
        if feedback.trim().is_empty() {
            return Err(WizardError::InputValidation(
                "Bitte geben Sie Ihr Feedback für die Überarbeitung ein.".to_string(),
            ));
        }
        let content = self.ensure_draft()?.to_string();

        Ok(self.emit(
            Purpose::Revision,
            GenerationRequest::Revise {
                content,
                feedback: feedback.to_string(),
            },
        ))
    }

    /// Feed the outcome of a dispatch back in.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<GenerationOutput, GatewayError>,
    ) -> Completion {
        let in_flight = match self.in_flight {
            Some(in_flight) if in_flight.ticket == ticket => in_flight,
            _ => {
                tracing::warn!("[Wizard] Discarding result for stale ticket {}", ticket);
                return Completion::Stale;
            }
        };
        self.in_flight = None;

        let output = match outcome {
            Ok(output) => output,
            Err(err) => {
                // A failed revision keeps the editor open with its feedback.
                self.last_error = Some(err.message.clone());
                return Completion::Failed(err.message);
            }
        };

        let (text, citations) = output.into_parts();
        match in_flight.purpose {
            Purpose::Draft(step) => {
                if step == Step::Research {
                    self.citations = citations;
                }
                self.draft = Some(text);
            }
            Purpose::Revision => {
                self.draft = Some(text);
                self.revision.finish();
            }
            Purpose::Production => {
                self.production = Some(text);
            }
        }
        tracing::info!("[Wizard] {} completed (ticket {})", in_flight.operation, ticket);
        Completion::Applied
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn artifact(&self, step: Step) -> Option<&str> {
        self.artifacts.get(&step).map(String::as_str)
    }

    pub fn artifacts(&self) -> &BTreeMap<Step, String> {
        &self.artifacts
    }

    pub fn citations(&self) -> &[SourceCitation] {
        &self.citations
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub fn revision_mode(&self) -> RevisionMode {
        self.revision.mode()
    }

    pub fn feedback(&self) -> &str {
        self.revision.feedback()
    }

    pub fn production_artifact(&self) -> Option<&str> {
        self.production.as_deref()
    }

    pub fn internal_links(&self) -> &[String] {
        &self.internal_links
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_operation(&self) -> Option<Operation> {
        self.in_flight.map(|f| f.operation)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The three content parts joined, once the run is complete.
    pub fn final_article(&self) -> Option<String> {
        if self.step != Step::Completed {
            return None;
        }
        let part1 = self.artifact(Step::ContentPart1)?;
        let part2 = self.artifact(Step::ContentPart2)?;
        let part3 = self.artifact(Step::ContentPart3)?;
        Some(format!("{}{}{}", part1, part2, part3))
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            step_title: self.step.title().to_string(),
            progress: progress(self.step),
            topic: self.topic.clone(),
            artifacts: self
                .artifacts
                .iter()
                .filter_map(|(step, text)| step.artifact_key().map(|k| (k.to_string(), text.clone())))
                .collect(),
            citations: self.citations.clone(),
            draft: self.draft.clone(),
            mode: self.revision.mode(),
            feedback: self.revision.feedback().to_string(),
            final_article: self.final_article(),
            production_artifact: self.production.clone(),
            busy: self.is_busy(),
            pending: self.pending_operation(),
            error: self.last_error.clone(),
        }
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn ensure_idle(&self) -> Result<(), WizardError> {
        if self.in_flight.is_some() {
            return Err(WizardError::Busy);
        }
        Ok(())
    }

    fn ensure_draft(&self) -> Result<&str, WizardError> {
        self.draft.as_deref().ok_or_else(|| {
            WizardError::InvalidTransition("Es liegt kein Entwurf zur Überarbeitung vor.".to_string())
        })
    }

    fn ensure_editing(&self) -> Result<(), WizardError> {
        if !self.revision.is_editing() {
            return Err(WizardError::InvalidTransition(
                "Der Bearbeitungsmodus ist nicht aktiv.".to_string(),
            ));
        }
        Ok(())
    }

    fn advance_to(&mut self, step: Step) {
        self.step = step;
        self.draft = None;
        self.revision.reset();
    }

    /// Build the request that belongs to the current step.
    fn request_for_current_step(&mut self) -> Result<Dispatch, WizardError> {
        let topic = self.topic.clone();
        let (purpose, request) = match self.step {
            Step::Research => (Purpose::Draft(Step::Research), GenerationRequest::Research { topic }),
            Step::Outline => (
                Purpose::Draft(Step::Outline),
                GenerationRequest::Outline {
                    topic,
                    research: self.require_artifact(Step::Research)?,
                    citations: self.citations.clone(),
                    internal_links: self.internal_links.clone(),
                },
            ),
            step @ (Step::ContentPart1 | Step::ContentPart2 | Step::ContentPart3) => {
                let previous_content = self
                    .artifacts
                    .range(Step::ContentPart1..step)
                    .map(|(_, text)| text.as_str())
                    .collect::<String>();
                (
                    Purpose::Draft(step),
                    GenerationRequest::ContentPart {
                        topic,
                        outline: self.require_artifact(Step::Outline)?,
                        previous_content,
                        part: step.content_part().unwrap_or(1),
                    },
                )
            }
            Step::Completed => {
                let content = self.final_article().ok_or_else(|| {
                    WizardError::InvalidTransition("Der Artikel ist unvollständig.".to_string())
                })?;
                (Purpose::Production, GenerationRequest::ProductionPackage { content })
            }
            Step::TopicInput => {
                return Err(WizardError::InvalidTransition(
                    "Für die Themeneingabe gibt es keine Anfrage.".to_string(),
                ))
            }
        };
        Ok(self.emit(purpose, request))
    }

    fn require_artifact(&self, step: Step) -> Result<String, WizardError> {
        self.artifact(step).map(str::to_string).ok_or_else(|| {
            WizardError::InvalidTransition(format!("Ergebnis von {} fehlt.", step))
        })
    }

    fn emit(&mut self, purpose: Purpose, request: GenerationRequest) -> Dispatch {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.last_error = None;
        self.in_flight = Some(InFlight {
            ticket,
            purpose,
            operation: request.operation(),
        });
        tracing::info!("[Wizard] Dispatching {} (ticket {})", request.operation(), ticket);
        Dispatch { ticket, request }
    }
}

/// Read-only view of the wizard for renderers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub step: Step,
    pub step_title: String,
    pub progress: Vec<StepProgress>,
    pub topic: String,
    /// Accepted artifacts keyed by `research`, `outline`, `part1`..`part3`.
    pub artifacts: BTreeMap<String, String>,
    pub citations: Vec<SourceCitation>,
    pub draft: Option<String>,
    pub mode: RevisionMode,
    pub feedback: String,
    pub final_article: Option<String>,
    pub production_artifact: Option<String>,
    pub busy: bool,
    pub pending: Option<Operation>,
    pub error: Option<String>,
}
