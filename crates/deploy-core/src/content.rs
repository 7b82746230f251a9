//! File content encoding for uploads.
//!
//! Jars and icons travel as data URLs (`data:<mime>;base64,<payload>`);
//! JNLP descriptors are sent as plain UTF-8 text.

use std::path::Path;

use base64::Engine;

use crate::error::Result;

/// MIME type sent with jar uploads.
pub const JAR_MIME: &str = "application/java-archive";

const FALLBACK_MIME: &str = "application/octet-stream";

/// Guess a MIME type from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jar" => JAR_MIME,
        "png" => "image/png",
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        "ico" => "image/x-icon",
        "jnlp" => "application/x-java-jnlp-file",
        _ => FALLBACK_MIME,
    }
}

/// Encode bytes as a base64 data URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    let engine = base64::engine::general_purpose::STANDARD;
    format!("data:{};base64,{}", mime, engine.encode(bytes))
}

/// Read a file into a data URL, typed by its extension.
pub async fn read_data_url(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(data_url(mime_for(path), &bytes))
}

/// Read a text file (JNLP descriptor) as UTF-8.
pub async fn read_text(path: &Path) -> Result<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}
