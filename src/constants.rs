//! # System Constants
//!
//! Core constants and enums that define the operational boundaries of the
//! widget registry: the closed set of input types, the well-known sandbox
//! channel names, and the modular widget naming convention.
//!
//! Channel names are kept identical to the historical JavaScript application
//! server so that existing dashboard components can interoperate unchanged.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Well-known sandbox channels used by the registry.
pub mod channels {
    /// Channel the registry listens on for requests and emits its own
    /// announcements to.
    pub const REGISTRY: &str = "Registry";

    /// Channel the registry announces its activation on.
    pub const REGISTRY_EXISTS: &str = "RegistryExists";
}

/// Prefix identifying widgets that follow the modular naming convention.
/// `phedex-module-agents` derives the short name `agents`.
pub const MODULE_NAME_PREFIX: &str = "phedex-module-";

/// Categories of domain object that widgets can be registered against.
///
/// This is a closed set: registration against anything outside it is a
/// programming error, rejected at the string boundary by [`InputType::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Node,
    Link,
    Dataset,
    Block,
    File,
    Timespan,
    Group,
    User,
    Request,
    Static,
    None,
}

impl InputType {
    /// Every valid input type, in declaration order.
    pub const ALL: [InputType; 11] = [
        InputType::Node,
        InputType::Link,
        InputType::Dataset,
        InputType::Block,
        InputType::File,
        InputType::Timespan,
        InputType::Group,
        InputType::User,
        InputType::Request,
        InputType::Static,
        InputType::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Node => "node",
            InputType::Link => "link",
            InputType::Dataset => "dataset",
            InputType::Block => "block",
            InputType::File => "file",
            InputType::Timespan => "timespan",
            InputType::Group => "group",
            InputType::User => "user",
            InputType::Request => "request",
            InputType::Static => "static",
            InputType::None => "none",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RegistryError::InvalidInputType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_input_type_round_trip() {
        for input_type in InputType::ALL {
            let parsed: InputType = input_type.as_str().parse().unwrap();
            assert_eq!(parsed, input_type);
        }
    }

    #[test]
    fn test_invalid_input_type() {
        let err = "workflow".parse::<InputType>().unwrap_err();
        assert_eq!(err, RegistryError::InvalidInputType("workflow".to_string()));
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for input_type in InputType::ALL {
            let json = serde_json::to_value(input_type).unwrap();
            assert_eq!(json, serde_json::json!(input_type.as_str()));
        }
    }

    proptest! {
        #[test]
        fn prop_unknown_names_are_rejected(name in "[a-z]{1,12}") {
            prop_assume!(!InputType::ALL.iter().any(|t| t.as_str() == name));
            prop_assert!(name.parse::<InputType>().is_err());
        }
    }
}
