use crate::values::{FieldValues, ValidationErrors};
use regex_lite::Regex;
use std::sync::LazyLock;

// Same acceptance rules as the web client's validator: scheme, host, and an
// optional path, no whitespace anywhere.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?|ftp)://[^\s/$.?#@]+\.[^\s/$?#@]+(:\d+)?(/[^\s]*)?$")
        .expect("url pattern is valid")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Maps a set of field values to per-field error messages.
///
/// Implementations must be deterministic: the same values always yield the
/// same errors. A validator that panics is a programming error.
pub trait SchemaValidator {
    fn validate(&self, values: &FieldValues) -> ValidationErrors;
}

impl<F> SchemaValidator for F
where
    F: Fn(&FieldValues) -> ValidationErrors,
{
    fn validate(&self, values: &FieldValues) -> ValidationErrors {
        self(values)
    }
}

/// One check applied to a string field.
#[derive(Debug, Clone)]
pub enum StringRule {
    Required(String),
    Email(String),
    Url(String),
    Min(usize, String),
    Max(usize, String),
    Matches(Regex, String),
}

impl StringRule {
    /// Returns the error message if `value` fails this rule.
    fn check(&self, value: &str) -> Option<&str> {
        let failed = match self {
            StringRule::Required(_) => value.trim().is_empty(),
            // Format rules skip empty strings; `Required` covers those.
            StringRule::Email(_) => !value.is_empty() && !EMAIL_PATTERN.is_match(value),
            StringRule::Url(_) => !value.is_empty() && !URL_PATTERN.is_match(value),
            StringRule::Matches(re, _) => !value.is_empty() && !re.is_match(value),
            StringRule::Min(n, _) => value.chars().count() < *n,
            StringRule::Max(n, _) => value.chars().count() > *n,
        };
        failed.then(|| self.message())
    }

    fn message(&self) -> &str {
        match self {
            StringRule::Required(m)
            | StringRule::Email(m)
            | StringRule::Url(m)
            | StringRule::Min(_, m)
            | StringRule::Max(_, m)
            | StringRule::Matches(_, m) => m,
        }
    }
}

/// Ordered list of rules for one field. The first failing rule reports.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    rules: Vec<StringRule>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.rules.push(StringRule::Required(message.into()));
        self
    }

    #[must_use]
    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.rules.push(StringRule::Email(message.into()));
        self
    }

    #[must_use]
    pub fn url(mut self, message: impl Into<String>) -> Self {
        self.rules.push(StringRule::Url(message.into()));
        self
    }

    #[must_use]
    pub fn min(mut self, len: usize, message: impl Into<String>) -> Self {
        self.rules.push(StringRule::Min(len, message.into()));
        self
    }

    #[must_use]
    pub fn max(mut self, len: usize, message: impl Into<String>) -> Self {
        self.rules.push(StringRule::Max(len, message.into()));
        self
    }

    #[must_use]
    pub fn matches(mut self, pattern: Regex, message: impl Into<String>) -> Self {
        self.rules.push(StringRule::Matches(pattern, message.into()));
        self
    }

    pub fn rules(&self) -> &[StringRule] {
        &self.rules
    }

    /// Runs the rules against one value.
    pub fn check(&self, value: &str) -> Option<&str> {
        self.rules.iter().find_map(|rule| rule.check(value))
    }
}

/// Validator over a fixed set of string fields.
///
/// Fields without a schema are always valid; fields missing from the
/// values are checked as empty strings.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, StringSchema)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: StringSchema) -> Self {
        self.fields.push((name.into(), schema));
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl SchemaValidator for ObjectSchema {
    fn validate(&self, values: &FieldValues) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (name, schema) in &self.fields {
            if let Some(message) = schema.check(values.get_or_empty(name)) {
                errors.insert(name.clone(), message);
            }
        }
        errors
    }
}
