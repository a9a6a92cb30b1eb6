use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::ViewerError;

use super::model::AnnotationDocument;

const SCRIPT_BINDING: &str = "annotationsJSON";

/// Decodes a document given either as bare JSON or as the exporter's
/// `const annotationsJSON = {...}` script.
pub fn parse_document(raw: &str) -> Result<AnnotationDocument, ViewerError> {
    let json = strip_script_wrapper(raw);
    serde_json::from_str(json).map_err(|error| ViewerError::InvalidDocument(error.to_string()))
}

pub fn load_document(path: &Path) -> Result<AnnotationDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read annotation document {}", path.display()))?;
    let document = parse_document(&raw)
        .with_context(|| format!("failed to parse annotation document {}", path.display()))?;

    debug!(
        path = %path.display(),
        code = document.code_annotations.len(),
        text = document.text_annotations.len(),
        "loaded annotation document"
    );
    Ok(document)
}

fn strip_script_wrapper(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = ["const", "let", "var"]
        .iter()
        .find_map(|keyword| trimmed.strip_prefix(keyword))
    else {
        return trimmed;
    };

    let Some(rest) = rest.trim_start().strip_prefix(SCRIPT_BINDING) else {
        return trimmed;
    };
    let Some(rest) = rest.trim_start().strip_prefix('=') else {
        return trimmed;
    };

    rest.trim().trim_end_matches(';').trim_end()
}
