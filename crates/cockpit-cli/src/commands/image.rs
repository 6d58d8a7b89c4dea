//! `cockpit image` / `cockpit filters` — One-shot image generation.

use std::path::Path;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use console::style;

use cockpit_core::gateway::GenerationGateway;
use cockpit_core::image::{self, ImageStudio, STYLE_FILTERS};
use cockpit_core::models::ReferenceImage;

pub async fn run(
    gateway: Arc<dyn GenerationGateway>,
    prompt: &str,
    filters: &[String],
    reference: Option<&str>,
    output: Option<&str>,
) -> Result<(), String> {
    let mut studio = ImageStudio::new();
    studio.set_prompt(prompt).map_err(|e| e.to_string())?;
    for name in filters {
        studio.apply_filter(name).map_err(|e| e.to_string())?;
    }
    if let Some(path) = reference {
        studio
            .set_reference_image(read_reference(path)?)
            .map_err(|e| e.to_string())?;
    }

    println!("{} {}", style("Prompt:").bold(), studio.prompt());
    let dispatch = studio.generate().map_err(|e| e.to_string())?;
    let (ticket, outcome) = image::execute(gateway.as_ref(), dispatch).await;
    studio.complete(ticket, outcome);

    if let Some(error) = studio.error() {
        return Err(error.to_string());
    }
    let encoded = studio
        .image()
        .ok_or("Die Bildgenerierung lieferte kein Ergebnis.")?;
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| format!("Invalid image data: {}", e))?;

    let filename = output
        .map(str::to_string)
        .unwrap_or_else(|| studio.download_filename());
    std::fs::write(&filename, &bytes)
        .map_err(|e| format!("Failed to write '{}': {}", filename, e))?;

    println!("{} {}", style("✓ Gespeichert:").green(), filename);
    Ok(())
}

pub fn list_filters() -> Result<(), String> {
    for filter in STYLE_FILTERS.iter() {
        println!("{:<18} {}", style(filter.name).cyan(), filter.suffix.trim_start_matches(", "));
    }
    Ok(())
}

fn read_reference(path: &str) -> Result<ReferenceImage, String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("Failed to read reference image '{}': {}", path, e))?;
    Ok(ReferenceImage::from_bytes(&bytes, mime_from_path(path)))
}

fn mime_from_path(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path("hund.PNG"), "image/png");
        assert_eq!(mime_from_path("/tmp/a.webp"), "image/webp");
        assert_eq!(mime_from_path("foto.jpg"), "image/jpeg");
        assert_eq!(mime_from_path("ohne_endung"), "image/jpeg");
    }

    #[test]
    fn test_read_reference_encodes_file() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"RIFF").unwrap();

        let reference = read_reference(file.path().to_str().unwrap()).unwrap();
        assert_eq!(reference.mime_type, "image/png");
        assert_eq!(reference.data, "UklGRg==");
    }

    #[test]
    fn test_read_reference_missing_file() {
        assert!(read_reference("/nonexistent/ref.png").is_err());
    }
}
