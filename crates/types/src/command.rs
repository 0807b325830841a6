//! Command and field descriptors.
//!
//! A [`Command`] describes one remotely invocable operation: the HTTP method,
//! the route template (which may embed `:name` placeholders) and the ordered
//! list of [`Field`]s the operator fills in. Field kinds form a closed sum
//! type so renderers and collectors match on the kind instead of comparing
//! strings.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// HTTP methods supported by the remote administrative API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a select field.
///
/// Literal options carry the same text as value and label; labelled options
/// show `label` to the operator and submit `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn literal(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    pub fn labelled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The kind of input a field asks for, with kind-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line free text.
    Text,
    /// Fixed-height multi-line free text.
    MultilineText { rows: u16 },
    /// Integer input.
    Number,
    /// Boolean toggle seeded from `default`.
    Checkbox { default: bool },
    /// Enumerated choice.
    Select { options: Vec<SelectOption> },
}

/// Conditional visibility: the owning field is shown only while
/// `controlling_field` holds one of `visible_when`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRule {
    pub controlling_field: String,
    pub visible_when: IndexSet<String>,
}

impl VisibilityRule {
    pub fn new<I, S>(controlling_field: impl Into<String>, visible_when: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            controlling_field: controlling_field.into(),
            visible_when: visible_when.into_iter().map(Into::into).collect(),
        }
    }
}

/// One declared input parameter of a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Unique (per command) field name, also the submitted key.
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityRule>,
}

impl Field {
    fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            placeholder: None,
            description: None,
            visibility: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Text)
    }

    pub fn multiline(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::MultilineText { rows: 3 })
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Number)
    }

    pub fn checkbox(name: impl Into<String>, default: bool) -> Self {
        Self::with_kind(name, FieldKind::Checkbox { default })
    }

    pub fn select(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self::with_kind(name, FieldKind::Select { options })
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn visible_when<I, S>(mut self, controlling_field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visibility = Some(VisibilityRule::new(controlling_field, values));
        self
    }

    /// Map-name fields are rendered from the external map catalog regardless
    /// of their declared kind.
    pub fn is_map_field(&self) -> bool {
        matches!(self.name.as_str(), "map_name" | "map_id")
    }
}

/// A single remotely invocable operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub method: HttpMethod,
    /// Route template, e.g. `/api/v2/players/:id/message`.
    pub path: String,
    pub description: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Command {
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// A named group of commands as shown in the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub commands: Vec<Command>,
}

impl Section {
    pub fn new(title: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            title: title.into(),
            commands,
        }
    }
}

/// Stable address of a command inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandId {
    pub section: usize,
    pub index: usize,
}

impl CommandId {
    pub const fn new(section: usize, index: usize) -> Self {
        Self { section, index }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd-{}-{}", self.section, self.index)
    }
}
