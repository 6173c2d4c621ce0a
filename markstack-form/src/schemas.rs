//! Schemas and defaults for the forms the application ships.

use crate::schema::{ObjectSchema, StringSchema};
use crate::values::FieldValues;

/// Longest folder name the backend accepts.
pub const MAX_FOLDER_NAME: usize = 255;

pub fn login() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "email",
            StringSchema::new()
                .required("Email is required")
                .email("Not a valid email"),
        )
        .field(
            "password",
            StringSchema::new().min(2, "Password must be at least 2 characters"),
        )
}

pub fn login_defaults() -> FieldValues {
    FieldValues::from_pairs([("email", ""), ("password", "")])
}

pub fn create_bookmark() -> ObjectSchema {
    ObjectSchema::new().field("url", StringSchema::new().url("Must be a valid URL"))
}

pub fn create_bookmark_defaults() -> FieldValues {
    FieldValues::from_pairs([("url", "")])
}

pub fn create_folder() -> ObjectSchema {
    ObjectSchema::new().field(
        "name",
        StringSchema::new()
            .required("Name is required")
            .max(MAX_FOLDER_NAME, "Name is too long"),
    )
}

pub fn create_folder_defaults() -> FieldValues {
    FieldValues::from_pairs([("name", "")])
}
