use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::error::ViewerError;

use super::model::AnnotationDocument;

/// One independent document check.
pub type Validator = fn(&AnnotationDocument) -> Result<(), String>;

/// Checks in the order they run. The first failure stops the chain.
pub const VALIDATORS: &[(&str, Validator)] = &[
    ("id-symbols", check_id_symbols),
    ("duplicates", check_duplicates),
    ("nonexistent", check_nonexistent),
    ("cycles", check_cycles),
];

pub fn validate_document(document: &AnnotationDocument) -> Result<(), ViewerError> {
    for (name, validator) in VALIDATORS {
        if let Err(reason) = validator(document) {
            warn!(validator = name, %reason, "annotation document failed validation");
            return Err(ViewerError::Validation(reason));
        }
    }
    Ok(())
}

fn all_ids(document: &AnnotationDocument) -> impl Iterator<Item = &str> {
    document
        .text_annotations
        .iter()
        .map(|annotation| annotation.id.as_str())
        .chain(
            document
                .code_annotations
                .iter()
                .map(|annotation| annotation.id.as_str()),
        )
}

pub fn check_id_symbols(document: &AnnotationDocument) -> Result<(), String> {
    for id in all_ids(document) {
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
        if !valid {
            return Err(format!(
                "{id} isn't a valid id. Only latin letters and hyphens are allowed"
            ));
        }
    }
    Ok(())
}

pub fn check_duplicates(document: &AnnotationDocument) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in all_ids(document) {
        if !seen.insert(id) {
            return Err(format!("Annotation `{id}` is defined more than once"));
        }
    }
    Ok(())
}

pub fn check_nonexistent(document: &AnnotationDocument) -> Result<(), String> {
    let known = all_ids(document).collect::<HashSet<_>>();
    for annotation in &document.text_annotations {
        for reference in &annotation.references {
            if !known.contains(reference.as_str()) {
                return Err(format!(
                    "Annotation `{reference}` doesn't exist (referenced by `{}`)",
                    annotation.id
                ));
            }
        }
    }
    Ok(())
}

pub fn check_cycles(document: &AnnotationDocument) -> Result<(), String> {
    if document.annotation_count() == 0 {
        return Ok(());
    }

    let referenced = document
        .text_annotations
        .iter()
        .flat_map(|annotation| annotation.references.iter().map(String::as_str))
        .collect::<HashSet<_>>();
    if all_ids(document).all(|id| referenced.contains(id)) {
        return Err("There are no root annotations!".to_owned());
    }

    let references = document
        .text_annotations
        .iter()
        .map(|annotation| (annotation.id.as_str(), annotation.references.as_slice()))
        .collect::<HashMap<_, _>>();

    // Roots first, then a sweep for cycles no root reaches.
    let roots = document
        .text_annotations
        .iter()
        .filter(|annotation| !referenced.contains(annotation.id.as_str()));
    let mut finished = HashSet::new();
    for annotation in roots.chain(&document.text_annotations) {
        let mut path = Vec::new();
        visit(annotation.id.as_str(), &references, &mut path, &mut finished)?;
    }
    Ok(())
}

fn visit<'a>(
    current: &'a str,
    references: &HashMap<&'a str, &'a [String]>,
    path: &mut Vec<&'a str>,
    finished: &mut HashSet<&'a str>,
) -> Result<(), String> {
    if finished.contains(current) {
        return Ok(());
    }
    if path.contains(&current) {
        let mut message = "There is a cycle of referenced text annotations: ".to_owned();
        for id in path.iter() {
            message.push_str(id);
            message.push_str(" > ");
        }
        message.push_str(current);
        return Err(message);
    }

    let Some(children) = references.get(current) else {
        finished.insert(current);
        return Ok(());
    };

    path.push(current);
    for child in children.iter() {
        visit(child.as_str(), references, path, finished)?;
    }
    path.pop();
    finished.insert(current);
    Ok(())
}
