// src/upload.rs
//! Image capture on the client side and data URL handling on the server side.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::Path;
use crate::errors::{AnalyzeError, Result};

/// An accepted image file, ready to be sent for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Accepts a file only if its MIME type is `image/*`.
    ///
    /// The declared type is used when present, otherwise it is guessed from
    /// the file name. Anything else yields `None`.
    pub fn capture(file_name: &str, declared_mime: Option<&str>, bytes: Vec<u8>) -> Option<Self> {
        let mime_type = match declared_mime.filter(|m| !m.is_empty()) {
            Some(mime) => mime.to_ascii_lowercase(),
            None => mime_guess::from_path(file_name).first()?.essence_str().to_string(),
        };

        if !mime_type.starts_with("image/") {
            log::debug!("Ignoring non-image file {} ({})", file_name, mime_type);
            return None;
        }

        Some(Self {
            file_name: file_name.to_string(),
            mime_type,
            bytes,
        })
    }

    /// Checks the file type from the path before reading anything.
    pub async fn from_path(path: &Path) -> Result<Option<Self>> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if Self::capture(&file_name, None, Vec::new()).is_none() {
            return Ok(None);
        }

        let bytes = tokio::fs::read(path).await?;
        Ok(Self::capture(&file_name, None, bytes))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }
}

/// An image as handed to a model provider: MIME type plus base64 payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUrl {
    pub mime_type: String,
    pub data: String,
}

impl DataUrl {
    /// Parses `data:<mime>;base64,<payload>`, or a bare base64 payload whose
    /// type is sniffed from its leading bytes.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AnalyzeError::InvalidImage("image is empty".to_string()));
        }

        let (mime_type, data) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    AnalyzeError::InvalidImage("data URL has no payload".to_string())
                })?;
                // `<mime>[;param=value]*;base64`; only the bare media type goes to providers.
                let mut parts = header.split(';');
                let mime_type = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
                if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
                    return Err(AnalyzeError::InvalidImage(
                        "data URL is not base64 encoded".to_string(),
                    ));
                }
                (Some(mime_type), payload)
            }
            None => (None, input),
        };

        let bytes = BASE64
            .decode(data)
            .map_err(|e| AnalyzeError::InvalidImage(format!("invalid base64 payload: {}", e)))?;
        if bytes.is_empty() {
            return Err(AnalyzeError::InvalidImage("image is empty".to_string()));
        }

        let mime_type = mime_type.unwrap_or_else(|| sniff_image_type(&bytes).to_string());
        if !mime_type.starts_with("image/") {
            return Err(AnalyzeError::InvalidImage(format!("'{}' is not an image type", mime_type)));
        }

        Ok(Self {
            mime_type,
            data: data.to_string(),
        })
    }

    pub fn as_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn sniff_image_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/png",
    }
}
