use crate::domain::attachment::AttachmentCandidate;
use crate::domain::ports::ConfirmationPrompt;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Asks for confirmation on stderr and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

#[async_trait]
impl ConfirmationPrompt for TerminalPrompt {
    async fn confirm(&self, message: &str) -> Result<bool> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(format!("{message} [y/N] ").as_bytes()).await?;
        stderr.flush().await?;

        let mut answer = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut answer).await?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Best-effort media type from a file extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Reads a file into an attachment candidate.
pub async fn load_candidate(path: &Path, media_type: Option<&str>) -> Result<AttachmentCandidate> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let media_type = media_type.unwrap_or_else(|| media_type_for(path));
    Ok(AttachmentCandidate::new(file_name, media_type, bytes))
}
