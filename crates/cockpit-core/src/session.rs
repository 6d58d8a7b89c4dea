//! A wizard session: one article wizard plus one image studio.
//!
//! Each flow sits behind its own lock. Intents run in three phases: lock and
//! transition, unlock and call the gateway, lock again and apply the
//! outcome. The lock is never held across a gateway call; the flows' busy
//! flags keep them single-flight. The last two phases run on their own
//! task and always finish, even when the requester goes away.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::gateway::{GatewayError, GenerationGateway, Operation};
use crate::image::{self, ImageDispatch, ImageError, ImageSnapshot, ImageStudio};
use crate::workflow::{self, ArticleWizard, Dispatch, WizardError, WizardSnapshot};

pub struct WizardSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    wizard: Mutex<ArticleWizard>,
    images: Mutex<ImageStudio>,
}

/// Summary row for session listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub topic: String,
    pub step: crate::models::Step,
    pub busy: bool,
}

impl WizardSession {
    pub fn new(id: impl Into<String>, internal_links: Vec<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            wizard: Mutex::new(ArticleWizard::new(internal_links)),
            images: Mutex::new(ImageStudio::new()),
        }
    }

    pub async fn info(&self) -> SessionInfo {
        let wizard = self.wizard.lock().await;
        SessionInfo {
            id: self.id.clone(),
            created_at: self.created_at,
            topic: wizard.topic().to_string(),
            step: wizard.step(),
            busy: wizard.is_busy(),
        }
    }

    // ── Article wizard ─────────────────────────────────────────────────

    pub async fn snapshot(&self) -> WizardSnapshot {
        self.wizard.lock().await.snapshot()
    }

    /// Apply an intent that does not talk to the gateway.
    pub async fn update<T>(
        &self,
        intent: impl FnOnce(&mut ArticleWizard) -> Result<T, WizardError>,
    ) -> Result<WizardSnapshot, WizardError> {
        let mut wizard = self.wizard.lock().await;
        intent(&mut wizard)?;
        Ok(wizard.snapshot())
    }

    /// Apply an intent that yields a dispatch, run it, and feed the outcome
    /// back. Gateway failures are recorded in the snapshot, not returned.
    ///
    /// The gateway call and its completion run on a spawned task, so the
    /// outcome lands even if the caller's future is dropped.
    pub async fn drive(
        self: &Arc<Self>,
        gateway: Arc<dyn GenerationGateway>,
        intent: impl FnOnce(&mut ArticleWizard) -> Result<Dispatch, WizardError>,
    ) -> Result<WizardSnapshot, WizardError> {
        let dispatch = {
            let mut wizard = self.wizard.lock().await;
            intent(&mut wizard)?
        };
        let ticket = dispatch.ticket;
        let operation = dispatch.request.operation();

        let session = Arc::clone(self);
        let task = tokio::spawn(async move {
            let (ticket, outcome) = workflow::execute(gateway.as_ref(), dispatch).await;
            let mut wizard = session.wizard.lock().await;
            wizard.complete(ticket, outcome);
            wizard.snapshot()
        });

        match task.await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                tracing::error!("[Session] {} task for ticket {} failed: {}", operation, ticket, err);
                let mut wizard = self.wizard.lock().await;
                wizard.complete(ticket, Err(GatewayError::new(operation, operation.failure_message())));
                Ok(wizard.snapshot())
            }
        }
    }

    // ── Image studio ───────────────────────────────────────────────────

    pub async fn image_snapshot(&self) -> ImageSnapshot {
        self.images.lock().await.snapshot()
    }

    pub async fn update_image<T>(
        &self,
        intent: impl FnOnce(&mut ImageStudio) -> Result<T, ImageError>,
    ) -> Result<ImageSnapshot, ImageError> {
        let mut studio = self.images.lock().await;
        intent(&mut studio)?;
        Ok(studio.snapshot())
    }

    pub async fn drive_image(
        self: &Arc<Self>,
        gateway: Arc<dyn GenerationGateway>,
        intent: impl FnOnce(&mut ImageStudio) -> Result<ImageDispatch, ImageError>,
    ) -> Result<ImageSnapshot, ImageError> {
        let dispatch = {
            let mut studio = self.images.lock().await;
            intent(&mut studio)?
        };
        let ticket = dispatch.ticket;

        let session = Arc::clone(self);
        let task = tokio::spawn(async move {
            let (ticket, outcome) = image::execute(gateway.as_ref(), dispatch).await;
            let mut studio = session.images.lock().await;
            studio.complete(ticket, outcome);
            studio.snapshot()
        });

        match task.await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                tracing::error!("[Session] Image task for ticket {} failed: {}", ticket, err);
                let operation = Operation::GenerateImage;
                let mut studio = self.images.lock().await;
                studio.complete(ticket, Err(GatewayError::new(operation, operation.failure_message())));
                Ok(studio.snapshot())
            }
        }
    }
}
