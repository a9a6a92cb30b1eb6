use std::fmt;

use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TextAnnotation {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub references: Vec<String>,
    /// Ids this annotation is connected to, as computed upstream.
    #[serde(default)]
    pub connected: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CodeAnnotation {
    pub id: String,
    pub title: String,
    pub content: String,
    pub file: String,
    #[serde(deserialize_with = "deserialize_line")]
    pub line: u32,
    #[serde(default)]
    pub connected: Option<Vec<String>>,
}

/// Borrowed view over either annotation kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Annotation<'a> {
    Text(&'a TextAnnotation),
    Code(&'a CodeAnnotation),
}

impl<'a> Annotation<'a> {
    pub fn id(self) -> &'a str {
        match self {
            Self::Text(text) => &text.id,
            Self::Code(code) => &code.id,
        }
    }

    pub fn title(self) -> &'a str {
        match self {
            Self::Text(text) => &text.title,
            Self::Code(code) => &code.title,
        }
    }

    pub fn content(self) -> &'a str {
        match self {
            Self::Text(text) => &text.content,
            Self::Code(code) => &code.content,
        }
    }

    pub fn connected(self) -> Option<&'a [String]> {
        match self {
            Self::Text(text) => text.connected.as_deref(),
            Self::Code(code) => code.connected.as_deref(),
        }
    }
}

/// Hierarchical layout direction (`dir` in the document).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum LayoutDirection {
    #[default]
    #[serde(rename = "UD")]
    #[value(name = "UD")]
    UpDown,
    #[serde(rename = "DU")]
    #[value(name = "DU")]
    DownUp,
    #[serde(rename = "LR")]
    #[value(name = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    #[value(name = "RL")]
    RightLeft,
}

impl LayoutDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::UpDown => "UD",
            Self::DownUp => "DU",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::UpDown | Self::DownUp)
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which end of the hierarchy anchors the layout (`shake` in the document).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShakeTowards {
    #[default]
    Roots,
    Leaves,
}

impl ShakeTowards {
    pub fn label(self) -> &'static str {
        match self {
            Self::Roots => "roots",
            Self::Leaves => "leaves",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AnnotationDocument {
    pub code_annotations: Vec<CodeAnnotation>,
    pub text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    pub dir: LayoutDirection,
    #[serde(default)]
    pub shake: ShakeTowards,
}

impl AnnotationDocument {
    pub fn annotation_count(&self) -> usize {
        self.code_annotations.len() + self.text_annotations.len()
    }
}

fn deserialize_line<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawLine {
        Number(u32),
        Text(String),
    }

    match RawLine::deserialize(deserializer)? {
        RawLine::Number(line) => Ok(line),
        RawLine::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid line number `{text}`"))),
    }
}
