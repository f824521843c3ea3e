//! # Registry Error Types
//!
//! Structured error handling for the widget registry using thiserror.
//!
//! Both variants indicate a programming mistake in the caller, not a runtime
//! condition: they are raised synchronously by [`crate::registry::WidgetRegistry::add`]
//! (or at the string boundary when parsing an input type) and always leave the
//! registry state untouched.

use thiserror::Error;

use crate::constants::InputType;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("input type '{0}' is not valid")]
    InvalidInputType(String),

    #[error("widget '{widget}' already registered for input type '{input_type}' with label '{label}'")]
    DuplicateRegistration {
        widget: String,
        input_type: InputType,
        label: String,
    },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
