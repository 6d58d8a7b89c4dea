//! Article wizard: the step-sequencing workflow controller.
//!
//! Transitions are pure: they update state and hand back a [`Dispatch`]
//! describing the generation call to make. Whoever owns the wizard runs the
//! dispatch against a gateway and feeds the outcome into
//! [`ArticleWizard::complete`].
//!
//! ```text
//! intent ──► ArticleWizard ──► Dispatch ──► GenerationGateway
//!               ▲                                  │
//!               └────────── complete(ticket) ◄─────┘
//! ```

pub mod dispatch;
pub mod machine;
pub mod revision;

pub use dispatch::{execute, Dispatch, GenerationOutput, GenerationRequest, Ticket};
pub use machine::{ArticleWizard, Completion, WizardSnapshot};
pub use revision::{RevisionLoop, RevisionMode};

/// Errors returned by wizard intents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// Required input was missing; nothing was sent.
    #[error("{0}")]
    InputValidation(String),

    /// The intent is not valid in the current step or mode.
    #[error("Aktion nicht möglich: {0}")]
    InvalidTransition(String),

    #[error("Es wird bereits eine Anfrage bearbeitet. Bitte warten Sie.")]
    Busy,
}
