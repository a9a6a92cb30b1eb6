use std::collections::HashMap;

use super::model::{Annotation, AnnotationDocument, CodeAnnotation, TextAnnotation};

/// Read-only index over the two annotation collections.
///
/// When an id is registered twice within one collection the first entry
/// wins. Across collections `get` always prefers the text annotation.
#[derive(Clone, Debug)]
pub struct AnnotationStore {
    document: AnnotationDocument,
    text_by_id: HashMap<String, usize>,
    code_by_id: HashMap<String, usize>,
}

impl AnnotationStore {
    pub fn new(document: AnnotationDocument) -> Self {
        let mut text_by_id = HashMap::with_capacity(document.text_annotations.len());
        for (index, annotation) in document.text_annotations.iter().enumerate() {
            text_by_id.entry(annotation.id.clone()).or_insert(index);
        }

        let mut code_by_id = HashMap::with_capacity(document.code_annotations.len());
        for (index, annotation) in document.code_annotations.iter().enumerate() {
            code_by_id.entry(annotation.id.clone()).or_insert(index);
        }

        Self {
            document,
            text_by_id,
            code_by_id,
        }
    }

    pub fn text(&self, id: &str) -> Option<&TextAnnotation> {
        self.text_by_id
            .get(id)
            .and_then(|&index| self.document.text_annotations.get(index))
    }

    pub fn code(&self, id: &str) -> Option<&CodeAnnotation> {
        self.code_by_id
            .get(id)
            .and_then(|&index| self.document.code_annotations.get(index))
    }

    pub fn get(&self, id: &str) -> Option<Annotation<'_>> {
        self.text(id)
            .map(Annotation::Text)
            .or_else(|| self.code(id).map(Annotation::Code))
    }

    pub fn text_annotations(&self) -> &[TextAnnotation] {
        &self.document.text_annotations
    }

    pub fn code_annotations(&self) -> &[CodeAnnotation] {
        &self.document.code_annotations
    }

    /// Code annotations first, then text annotations, in document order.
    pub fn iter(&self) -> impl Iterator<Item = Annotation<'_>> {
        self.document
            .code_annotations
            .iter()
            .map(Annotation::Code)
            .chain(self.document.text_annotations.iter().map(Annotation::Text))
    }

    pub fn len(&self) -> usize {
        self.document.annotation_count()
    }
}
