use markstack_types::Typename;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Describes a selection set on one GraphQL type.
///
/// A shape is rendered to a `fragment X on Type { ... }` block for operation
/// documents, and drives normalization when a payload is written into the
/// entity cache: nested [`Selection::Object`] / [`Selection::List`] values
/// that carry an `id` become references to their own cache records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentShape {
    /// Fragment name, e.g. `FolderWithBookmarks`.
    pub name: String,
    /// Type condition, e.g. `Folder`.
    pub typename: Typename,
    pub selections: Vec<Selection>,
}

/// One field inside a [`FragmentShape`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    /// A scalar (or opaque JSON) field.
    Field { name: String },
    /// A single nested object.
    Object { name: String, shape: FragmentShape },
    /// A list of nested objects.
    List { name: String, shape: FragmentShape },
}

impl Selection {
    /// The response key of this selection.
    pub fn name(&self) -> &str {
        match self {
            Selection::Field { name }
            | Selection::Object { name, .. }
            | Selection::List { name, .. } => name,
        }
    }
}

impl FragmentShape {
    /// Creates an empty shape.
    pub fn new(name: impl Into<String>, typename: impl Into<Typename>) -> Self {
        Self {
            name: name.into(),
            typename: typename.into(),
            selections: Vec::new(),
        }
    }

    /// Adds scalar fields.
    #[must_use]
    pub fn fields(mut self, names: &[&str]) -> Self {
        self.selections.extend(names.iter().map(|n| Selection::Field {
            name: (*n).to_string(),
        }));
        self
    }

    /// Adds a nested single-object field.
    #[must_use]
    pub fn object(mut self, name: &str, shape: FragmentShape) -> Self {
        self.selections.push(Selection::Object {
            name: name.to_string(),
            shape,
        });
        self
    }

    /// Adds a nested list-of-objects field.
    #[must_use]
    pub fn list(mut self, name: &str, shape: FragmentShape) -> Self {
        self.selections.push(Selection::List {
            name: name.to_string(),
            shape,
        });
        self
    }

    /// Looks up a selection by response key.
    pub fn selection(&self, name: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.name() == name)
    }

    /// Returns true if the shape selects `id`, which makes its records
    /// normalizable.
    pub fn selects_id(&self) -> bool {
        self.selection("id").is_some()
    }

    /// Renders the shape as a GraphQL fragment definition.
    pub fn to_graphql(&self) -> String {
        let mut out = format!("fragment {} on {} ", self.name, self.typename);
        self.write_selection_set(&mut out, 0);
        out.push('\n');
        out
    }

    /// Renders only the braces-delimited selection set.
    pub fn selection_set(&self) -> String {
        let mut out = String::new();
        self.write_selection_set(&mut out, 0);
        out
    }

    fn write_selection_set(&self, out: &mut String, depth: usize) {
        let pad = "    ".repeat(depth + 1);
        out.push_str("{\n");
        for selection in &self.selections {
            match selection {
                Selection::Field { name } => {
                    let _ = writeln!(out, "{pad}{name}");
                }
                Selection::Object { name, shape } | Selection::List { name, shape } => {
                    let _ = write!(out, "{pad}{name} ");
                    shape.write_selection_set(out, depth + 1);
                    out.push('\n');
                }
            }
        }
        out.push_str(&"    ".repeat(depth));
        out.push('}');
    }
}
