//! Image studio, the image-generation panel.
//!
//! Independent of the article wizard: it has its own single in-flight
//! request and its failures never touch wizard state. Like the wizard, it
//! hands out an [`ImageDispatch`] and expects the outcome back through
//! [`ImageStudio::complete`].

pub mod filters;

use serde::Serialize;

use crate::gateway::{GatewayError, GenerationGateway};
use crate::models::ReferenceImage;
use crate::workflow::Ticket;

pub use filters::{StyleFilter, STYLE_FILTERS};

const FALLBACK_FILENAME: &str = "generated_image";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("{0}")]
    InputValidation(String),

    #[error("Es wird bereits ein Bild generiert. Bitte warten Sie.")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDispatch {
    pub ticket: Ticket,
    pub prompt: String,
    pub reference: Option<ReferenceImage>,
}

#[derive(Debug, Clone)]
pub struct ImageStudio {
    prompt: String,
    reference: Option<ReferenceImage>,
    image: Option<String>,
    error: Option<String>,
    in_flight: Option<Ticket>,
    next_ticket: Ticket,
}

impl Default for ImageStudio {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            reference: None,
            image: None,
            error: None,
            in_flight: None,
            next_ticket: 1,
        }
    }
}

impl ImageStudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prompt(&mut self, prompt: &str) -> Result<(), ImageError> {
        self.ensure_idle()?;
        self.prompt = prompt.to_string();
        Ok(())
    }

    /// Append the named style filter to the prompt.
    pub fn apply_filter(&mut self, name: &str) -> Result<&str, ImageError> {
        self.ensure_idle()?;
        let filter = filters::find(name)
            .ok_or_else(|| ImageError::InputValidation(format!("Unbekannter Stil-Filter: {}", name)))?;
        self.prompt = filter.apply(&self.prompt);
        Ok(&self.prompt)
    }

    /// Attach a reference image given as a data URL or bare base64.
    pub fn set_reference(&mut self, input: &str, mime_type: Option<&str>) -> Result<(), ImageError> {
        self.ensure_idle()?;
        let reference = ReferenceImage::parse(input, mime_type).map_err(ImageError::InputValidation)?;
        self.reference = Some(reference);
        Ok(())
    }

    pub fn set_reference_image(&mut self, reference: ReferenceImage) -> Result<(), ImageError> {
        self.ensure_idle()?;
        self.reference = Some(reference);
        Ok(())
    }

    pub fn clear_reference(&mut self) -> Result<(), ImageError> {
        self.ensure_idle()?;
        self.reference = None;
        Ok(())
    }

    /// Replace the prompt and reference and request an image in one step.
    /// `reference`: `None` keeps the current one, an empty string clears it.
    /// Nothing is changed unless the request is issued.
    pub fn submit(&mut self, prompt: &str, reference: Option<&str>) -> Result<ImageDispatch, ImageError> {
        self.ensure_idle()?;
        ensure_prompt(prompt)?;
        let reference = match reference {
            None => self.reference.clone(),
            Some(input) if input.trim().is_empty() => None,
            Some(input) => {
                Some(ReferenceImage::parse(input, None).map_err(ImageError::InputValidation)?)
            }
        };

        self.prompt = prompt.to_string();
        self.reference = reference;
        self.generate()
    }

    /// Request an image for the current prompt. The previous image is
    /// cleared.
    pub fn generate(&mut self) -> Result<ImageDispatch, ImageError> {
        self.ensure_idle()?;
        ensure_prompt(&self.prompt)?;

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.image = None;
        self.error = None;

        tracing::info!("[ImageStudio] Dispatching image generation (ticket {})", ticket);
        Ok(ImageDispatch {
            ticket,
            prompt: self.prompt.clone(),
            reference: self.reference.clone(),
        })
    }

    /// Store the outcome of a dispatch. Returns `false` for a stale ticket.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<String, GatewayError>) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::warn!("[ImageStudio] Discarding result for stale ticket {}", ticket);
            return false;
        }
        self.in_flight = None;
        match outcome {
            Ok(image) => self.image = Some(image),
            Err(err) => self.error = Some(err.message),
        }
        true
    }

    fn ensure_idle(&self) -> Result<(), ImageError> {
        if self.in_flight.is_some() {
            return Err(ImageError::Busy);
        }
        Ok(())
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn reference(&self) -> Option<&ReferenceImage> {
        self.reference.as_ref()
    }

    /// Base64 PNG of the last generated image.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn data_url(&self) -> Option<String> {
        self.image
            .as_ref()
            .map(|image| format!("data:image/png;base64,{}", image))
    }

    pub fn download_filename(&self) -> String {
        download_filename(&self.prompt)
    }

    pub fn snapshot(&self) -> ImageSnapshot {
        ImageSnapshot {
            prompt: self.prompt.clone(),
            reference_image: self.reference.as_ref().map(ReferenceImage::to_data_url),
            image: self.image.clone(),
            data_url: self.data_url(),
            filename: self.download_filename(),
            busy: self.is_busy(),
            error: self.error.clone(),
        }
    }
}

/// First 20 characters of the prompt with whitespace as `_`, plus `.png`.
pub fn download_filename(prompt: &str) -> String {
    let stem: String = prompt
        .chars()
        .take(20)
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if stem.is_empty() {
        format!("{}.png", FALLBACK_FILENAME)
    } else {
        format!("{}.png", stem)
    }
}

fn ensure_prompt(prompt: &str) -> Result<(), ImageError> {
    if prompt.trim().is_empty() {
        return Err(ImageError::InputValidation(
            "Bitte geben Sie einen Prompt für das Bild ein.".to_string(),
        ));
    }
    Ok(())
}

/// Run an image dispatch against a gateway.
pub async fn execute(
    gateway: &dyn GenerationGateway,
    dispatch: ImageDispatch,
) -> (Ticket, Result<String, GatewayError>) {
    let outcome = gateway
        .generate_image(&dispatch.prompt, dispatch.reference.as_ref())
        .await;
    (dispatch.ticket, outcome)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSnapshot {
    pub prompt: String,
    pub reference_image: Option<String>,
    pub image: Option<String>,
    pub data_url: Option<String>,
    pub filename: String,
    pub busy: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Operation;

    #[test]
    fn test_generate_requires_prompt() {
        let mut studio = ImageStudio::new();
        studio.set_prompt("  ").unwrap();
        assert!(matches!(studio.generate(), Err(ImageError::InputValidation(_))));
        assert!(!studio.is_busy());
    }

    #[test]
    fn test_single_request_in_flight() {
        let mut studio = ImageStudio::new();
        studio.set_prompt("Hund im Herbstlaub").unwrap();
        let dispatch = studio.generate().unwrap();
        assert_eq!(studio.generate(), Err(ImageError::Busy));

        assert!(studio.complete(dispatch.ticket, Ok("aW1n".to_string())));
        assert_eq!(studio.image(), Some("aW1n"));
        assert_eq!(studio.data_url().as_deref(), Some("data:image/png;base64,aW1n"));
    }

    #[test]
    fn test_failure_clears_previous_image() {
        let mut studio = ImageStudio::new();
        studio.set_prompt("Hund").unwrap();
        let d = studio.generate().unwrap();
        studio.complete(d.ticket, Ok("aW1n".to_string()));

        let d = studio.generate().unwrap();
        assert!(studio.image().is_none());
        let err = GatewayError::new(Operation::GenerateImage, "kaputt");
        studio.complete(d.ticket, Err(err));
        assert_eq!(studio.error(), Some("kaputt"));
        assert!(studio.image().is_none());
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut studio = ImageStudio::new();
        studio.set_prompt("Hund").unwrap();
        let d = studio.generate().unwrap();
        assert!(!studio.complete(d.ticket + 1, Ok("x".to_string())));
        assert!(studio.is_busy());
    }

    #[test]
    fn test_reference_carried_in_dispatch() {
        let mut studio = ImageStudio::new();
        studio.set_prompt("Hund").unwrap();
        studio.set_reference("data:image/png;base64,aGVsbG8=", None).unwrap();
        let d = studio.generate().unwrap();
        assert_eq!(d.reference.unwrap().mime_type, "image/png");

        assert!(studio.set_reference("%%%", None).is_err());
    }

    #[test]
    fn test_apply_filter() {
        let mut studio = ImageStudio::new();
        studio.set_prompt("Katze").unwrap();
        studio.apply_filter("aquarell").unwrap();
        studio.apply_filter("Aquarell").unwrap();
        assert_eq!(
            studio.prompt(),
            "Katze, im Stil eines Aquarellgemäldes, weiche Kanten, leuchtende Farben"
        );
        assert!(studio.apply_filter("gibtsnicht").is_err());
    }

    #[test]
    fn test_edits_rejected_while_busy() {
        let mut studio = ImageStudio::new();
        studio.set_prompt("Hund").unwrap();
        studio.generate().unwrap();

        assert_eq!(studio.set_prompt("Katze"), Err(ImageError::Busy));
        assert_eq!(studio.apply_filter("Cinematic"), Err(ImageError::Busy));
        assert_eq!(studio.clear_reference(), Err(ImageError::Busy));
        assert_eq!(studio.prompt(), "Hund");
        assert_eq!(studio.download_filename(), "Hund.png");
    }

    #[test]
    fn test_submit_while_busy_keeps_running_request() {
        let mut studio = ImageStudio::new();
        studio
            .submit("Hund", Some("data:image/png;base64,aGVsbG8="))
            .unwrap();

        let second = studio.submit("Katze", Some(""));
        assert_eq!(second, Err(ImageError::Busy));
        assert_eq!(studio.prompt(), "Hund");
        assert!(studio.reference().is_some());
    }

    #[test]
    fn test_submit_with_invalid_reference_changes_nothing() {
        let mut studio = ImageStudio::new();
        studio.set_prompt("Hund").unwrap();

        let result = studio.submit("Katze", Some("%%%"));
        assert!(matches!(result, Err(ImageError::InputValidation(_))));
        assert_eq!(studio.prompt(), "Hund");
        assert!(studio.reference().is_none());
        assert!(!studio.is_busy());

        assert!(matches!(studio.submit("  ", None), Err(ImageError::InputValidation(_))));
        assert_eq!(studio.prompt(), "Hund");
    }

    #[test]
    fn test_submit_keeps_or_clears_reference() {
        let mut studio = ImageStudio::new();
        studio.set_reference("aGVsbG8=", Some("image/webp")).unwrap();

        let d = studio.submit("Hund", None).unwrap();
        assert_eq!(d.reference.as_ref().map(|r| r.mime_type.as_str()), Some("image/webp"));
        studio.complete(d.ticket, Ok("aW1n".to_string()));

        let d = studio.submit("Hund", Some("")).unwrap();
        assert!(d.reference.is_none());
        assert!(studio.reference().is_none());
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(download_filename(""), "generated_image.png");
        assert_eq!(download_filename("Ein Hund am Strand"), "Ein_Hund_am_Strand.png");
        assert_eq!(
            download_filename("Ein glücklicher Hund rennt über die Wiese"),
            "Ein_glücklicher_Hund.png"
        );
    }
}
