use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

mod checks;
mod model;
mod parse;
mod store;

use checks::validate_document;
use parse::load_document;

pub use model::{Annotation, AnnotationDocument, LayoutDirection, ShakeTowards};
#[cfg(test)]
pub use model::TextAnnotation;
#[cfg(test)]
pub use parse::parse_document;
pub use store::AnnotationStore;
#[cfg(test)]
pub(crate) use store::fixtures;

/// Loads a document and runs the validation chain. Validation failures are
/// fatal only when `strict` is set.
pub fn read_document(path: &Path, strict: bool) -> Result<AnnotationDocument> {
    let document = load_document(path)?;

    if let Err(error) = validate_document(&document) {
        if strict {
            return Err(error).with_context(|| format!("{} failed validation", path.display()));
        }
        warn!(%error, "continuing with an annotation document that failed validation");
    }

    info!(
        code = document.code_annotations.len(),
        text = document.text_annotations.len(),
        "annotation document ready"
    );
    Ok(document)
}
