use crate::error::{FormError, FormResult};
use crate::schema::SchemaValidator;
use crate::values::{FieldValues, ValidationErrors};
use markstack_model::FieldError;
use tracing::debug;

/// Input values of one form plus the errors derived from them.
///
/// Two kinds of error are tracked separately:
/// - validation errors, recomputed from the values on every change;
/// - server errors, reported by the backend after a submit and dropped as
///   soon as the user edits the field they point at.
///
/// Errors are always computed but only meant to be shown once the user has
/// tried to submit ([`FormState::mark_submitted`]).
#[derive(Debug, Clone)]
pub struct FormState<S> {
    defaults: FieldValues,
    values: FieldValues,
    schema: S,
    errors: ValidationErrors,
    server_errors: ValidationErrors,
    form_error: Option<String>,
    show_errors: bool,
}

impl<S: SchemaValidator> FormState<S> {
    /// Creates a form holding `defaults`. The set of fields is fixed here.
    pub fn new(defaults: FieldValues, schema: S) -> Self {
        let errors = schema.validate(&defaults);
        Self {
            values: defaults.clone(),
            defaults,
            schema,
            errors,
            server_errors: ValidationErrors::new(),
            form_error: None,
            show_errors: false,
        }
    }

    /// Overwrites one field and re-derives the validation errors.
    pub fn handle_change(&mut self, field: &str, value: impl Into<String>) -> FormResult<()> {
        if !self.defaults.contains(field) {
            return Err(FormError::UnknownField(field.to_string()));
        }
        self.values.set(field, value);
        self.errors = self.schema.validate(&self.values);
        self.server_errors.remove(field);
        self.form_error = None;
        Ok(())
    }

    /// Overwrites several fields at once.
    pub fn set_values<'a>(
        &mut self,
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> FormResult<()> {
        for (field, value) in values {
            self.handle_change(field, value)?;
        }
        Ok(())
    }

    /// Restores the defaults and forgets everything the backend reported.
    pub fn reset(&mut self) {
        debug!("resetting form");
        self.values = self.defaults.clone();
        self.errors = self.schema.validate(&self.values);
        self.server_errors.clear();
        self.form_error = None;
        self.show_errors = false;
    }

    /// Records a backend-reported error. Errors with a path that names a
    /// field of this form attach to it; anything else is form-wide.
    pub fn set_server_error(&mut self, error: &FieldError) {
        match error.path.as_deref() {
            Some(path) if self.defaults.contains(path) => {
                self.server_errors.insert(path, error.message.clone());
            }
            _ => self.form_error = Some(error.message.clone()),
        }
        self.show_errors = true;
    }

    /// Records a form-wide message (wrong credentials, network trouble).
    pub fn set_form_error(&mut self, message: impl Into<String>) {
        self.form_error = Some(message.into());
    }

    /// Flags that the user attempted a submit, so errors should be shown.
    pub fn mark_submitted(&mut self) {
        self.show_errors = true;
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field)
    }

    /// Validation errors for the current values.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn server_error(&self, field: &str) -> Option<&str> {
        self.server_errors.get(field)
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Message to display next to a field: nothing before the first submit
    /// attempt, then the validation error, then any server error.
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if !self.show_errors {
            return None;
        }
        self.error(field).or_else(|| self.server_error(field))
    }

    /// True iff every field still equals its default.
    pub fn is_empty(&self) -> bool {
        self.values == self.defaults
    }

    /// True iff any field currently fails validation.
    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }
}
