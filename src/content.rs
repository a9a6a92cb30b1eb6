//! Turns one annotation into display-ready lines.
//!
//! Text annotations get their `$id` references linkified: for each distinct
//! reference, only the first occurrence in the whole content becomes a link,
//! later occurrences stay literal. Every line keeps its source indentation
//! as a count of non-breaking placeholders.

use std::ops::Range;

use crate::annotations::Annotation;

/// Placeholder emitted once per leading space.
pub const INDENT_PLACEHOLDER: char = '\u{00A0}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentPreset {
    /// Light background, proportional font, wrapped.
    Text,
    /// Dark background, monospace, no wrapping.
    Code,
}

impl ContentPreset {
    pub fn wraps(self) -> bool {
        matches!(self, Self::Text)
    }

    pub fn monospace(self) -> bool {
        matches!(self, Self::Code)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Activating it selects `target`.
    Link { target: String, label: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedLine {
    pub indent: usize,
    pub segments: Vec<Segment>,
}

impl RenderedLine {
    /// The line as it reads on screen, placeholders included.
    #[cfg(test)]
    pub fn to_plain(&self) -> String {
        let mut line = INDENT_PLACEHOLDER.to_string().repeat(self.indent);
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => line.push_str(text),
                Segment::Link { label, .. } => line.push_str(label),
            }
        }
        line
    }

    #[cfg(test)]
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Link { target, .. } => Some(target.as_str()),
            Segment::Text(_) => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedContent {
    pub id: String,
    pub title: String,
    /// `file:line` shown above code content.
    pub caption: Option<String>,
    pub preset: ContentPreset,
    pub lines: Vec<RenderedLine>,
}

pub fn render_content(annotation: Annotation<'_>) -> RenderedContent {
    let content = annotation.content();

    let (links, caption, preset) = match annotation {
        Annotation::Text(text) => (
            find_links(content, &text.references),
            None,
            ContentPreset::Text,
        ),
        Annotation::Code(code) => (
            Vec::new(),
            Some(format!("{}:{}", code.file, code.line)),
            ContentPreset::Code,
        ),
    };

    RenderedContent {
        id: annotation.id().to_owned(),
        title: annotation.title().to_owned(),
        caption,
        preset,
        lines: split_lines(content, &links),
    }
}

struct LinkSpan {
    range: Range<usize>,
    target: String,
}

fn find_links(content: &str, references: &[String]) -> Vec<LinkSpan> {
    let mut links: Vec<LinkSpan> = Vec::new();

    for reference in references {
        if reference.is_empty() || links.iter().any(|link| &link.target == reference) {
            continue;
        }

        let token = format!("${reference}");
        let mut from = 0;
        while let Some(offset) = content[from..].find(&token) {
            let start = from + offset;
            let range = start..start + token.len();
            let overlaps = links
                .iter()
                .any(|link| link.range.start < range.end && range.start < link.range.end);
            if !overlaps {
                links.push(LinkSpan {
                    range,
                    target: reference.clone(),
                });
                break;
            }
            from = start + 1;
        }
    }

    links.sort_by_key(|link| link.range.start);
    links
}

fn split_lines(content: &str, links: &[LinkSpan]) -> Vec<RenderedLine> {
    let mut lines = Vec::new();
    let mut line_start = 0;

    for raw in content.split('\n') {
        let line_end = line_start + raw.len();
        let body = raw.strip_suffix('\r').unwrap_or(raw);
        let indent = body.chars().take_while(|c| *c == ' ').count();
        let text_start = line_start + indent;
        let text_end = line_start + body.len();

        let mut segments = Vec::new();
        let mut cursor = text_start;
        for link in links
            .iter()
            .filter(|link| link.range.start >= text_start && link.range.end <= text_end)
        {
            if link.range.start > cursor {
                segments.push(Segment::Text(content[cursor..link.range.start].to_owned()));
            }
            segments.push(Segment::Link {
                target: link.target.clone(),
                label: content[link.range.clone()].to_owned(),
            });
            cursor = link.range.end;
        }
        if cursor < text_end {
            segments.push(Segment::Text(content[cursor..text_end].to_owned()));
        }

        lines.push(RenderedLine { indent, segments });
        line_start = line_end + 1;
    }

    lines
}
