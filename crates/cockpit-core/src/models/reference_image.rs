//! Reference image attached to an image-generation request.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceImage {
    pub mime_type: String,
    /// Base64 payload, without any `data:` prefix.
    pub data: String,
}

impl ReferenceImage {
    /// Parse either a `data:<mime>;base64,<payload>` URL or a bare base64
    /// payload. Bare payloads take `fallback_mime`, or `image/jpeg`.
    pub fn parse(input: &str, fallback_mime: Option<&str>) -> Result<Self, String> {
        let input = input.trim();
        let (mime_type, data) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| "Ungültige Data-URL: Nutzdaten fehlen".to_string())?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or_else(|| "Ungültige Data-URL: nur Base64 wird unterstützt".to_string())?;
                if !mime.starts_with("image/") {
                    return Err(format!("Kein Bildformat: {}", mime));
                }
                (mime.to_string(), payload)
            }
            None => (
                fallback_mime.unwrap_or(DEFAULT_MIME_TYPE).to_string(),
                input,
            ),
        };

        if data.is_empty() {
            return Err("Das Referenzbild ist leer".to_string());
        }
        BASE64
            .decode(data)
            .map_err(|e| format!("Referenzbild ist kein gültiges Base64: {}", e))?;

        Ok(Self {
            mime_type,
            data: data.to_string(),
        })
    }

    /// Build a reference image from raw file bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: BASE64.encode(bytes),
        }
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}
