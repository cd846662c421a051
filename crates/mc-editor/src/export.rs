//! Export collaborators: clipboard, file download, preview window.
//!
//! The editor renders HTML and hands it to an [`ExportSink`]; how the
//! host copies, saves, or previews it is not the editor's concern.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("could not save {filename}: {reason}")]
    Save { filename: String, reason: String },

    #[error("preview window blocked")]
    PreviewBlocked,
}

/// Host services that receive rendered HTML.
pub trait ExportSink {
    fn copy_html(&mut self, html: &str) -> Result<(), ExportError>;
    fn save_html(&mut self, filename: &str, html: &str) -> Result<(), ExportError>;
    fn preview(&mut self, html: &str) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Clipboard,
    Download,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short user-facing message for the host's toast surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_string(),
        }
    }

    /// The message shown after an export attempt.
    pub fn for_export(target: ExportTarget, result: &Result<(), ExportError>) -> Self {
        match (target, result) {
            (ExportTarget::Clipboard, Ok(())) => Notice::success("Copied HTML to clipboard"),
            (ExportTarget::Clipboard, Err(_)) => Notice::error("Copy failed"),
            (ExportTarget::Download, Ok(())) => Notice::success("Downloaded HTML file"),
            (ExportTarget::Download, Err(_)) => Notice::error("Download failed"),
            (ExportTarget::Preview, Ok(())) => Notice::success("Opened preview in new tab"),
            (ExportTarget::Preview, Err(_)) => Notice::error("Preview blocked"),
        }
    }
}

/// Download file name for a template: `name.html`, `email.html` when the
/// name is blank.
pub fn html_filename(name: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { "email" } else { name };
    if name.ends_with(".html") {
        name.to_string()
    } else {
        format!("{name}.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filename_gets_html_extension_once() {
        assert_eq!(html_filename("Newsletter"), "Newsletter.html");
        assert_eq!(html_filename("promo.html"), "promo.html");
        assert_eq!(html_filename("   "), "email.html");
    }

    #[test]
    fn notices_match_outcome() {
        let failed = Err(ExportError::Clipboard("denied".into()));
        assert_eq!(
            Notice::for_export(ExportTarget::Clipboard, &failed),
            Notice::error("Copy failed")
        );
        assert_eq!(
            Notice::for_export(ExportTarget::Download, &Ok(())).level,
            NoticeLevel::Success
        );
    }
}
