//! # Registry Message Protocol
//!
//! Typed messages exchanged over the sandbox. The historical application
//! server dispatched on an action string embedded in a positional argument
//! array; here each action is a tagged enum variant with a typed payload, with
//! the serialized `action` names kept identical for wire compatibility.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::constants::InputType;
use crate::registry::WidgetRegistration;

/// Any message that can travel over a sandbox channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Request(RegistryRequest),
    Event(RegistryEvent),
}

impl Message {
    /// The serialized action name, for logging.
    pub fn action_name(&self) -> &'static str {
        match self {
            Message::Request(request) => request.action_name(),
            Message::Event(event) => event.action_name(),
        }
    }
}

impl From<RegistryRequest> for Message {
    fn from(request: RegistryRequest) -> Self {
        Message::Request(request)
    }
}

impl From<RegistryEvent> for Message {
    fn from(event: RegistryEvent) -> Self {
        Message::Event(event)
    }
}

/// Requests the registry answers on its own channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RegistryRequest {
    /// Register a widget; no direct reply.
    #[serde(rename_all = "camelCase")]
    Add {
        widget: String,
        input_type: InputType,
        label: String,
        #[serde(default)]
        extra: Map<String, Value>,
    },

    /// Query the widgets registered for one input type; the reply is sent on
    /// the caller-specified channel.
    #[serde(rename_all = "camelCase")]
    GetWidgetsByInputType {
        input_type: InputType,
        reply_to: String,
    },

    /// Query the list of input types with registered widgets; the reply is
    /// sent on the registry's own channel.
    GetInputTypes,

    /// Reverse lookup from a widget short name to its input type. Silently
    /// ignored when the short name is unknown.
    #[serde(rename_all = "camelCase")]
    GetTypeOfModule {
        short_name: String,
        #[serde(default)]
        extra: Value,
    },
}

impl RegistryRequest {
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::GetWidgetsByInputType { .. } => "getWidgetsByInputType",
            Self::GetInputTypes => "getInputTypes",
            Self::GetTypeOfModule { .. } => "getTypeOfModule",
        }
    }
}

/// Events the registry emits, either proactively or as query replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RegistryEvent {
    /// The current list of input types with at least one registered widget.
    /// Emitted when a previously-unseen type gains its first widget, and as
    /// the reply to [`RegistryRequest::GetInputTypes`].
    #[serde(rename_all = "camelCase")]
    RegisteredInputTypes { input_types: Vec<InputType> },

    /// Reply to [`RegistryRequest::GetWidgetsByInputType`]. `widgets` is
    /// `None` when the type has never had a registration.
    ///
    /// The historical server replied reusing the request's action name, so
    /// this serializes as `getWidgetsByInputType` too; the payloads keep the
    /// two apart (a request carries `replyTo`, a reply carries `widgets`).
    #[serde(rename = "getWidgetsByInputType", rename_all = "camelCase")]
    WidgetsByInputType {
        input_type: InputType,
        widgets: Option<Vec<WidgetRegistration>>,
    },

    /// Successful reverse lookup for [`RegistryRequest::GetTypeOfModule`],
    /// carrying the caller's opaque `extra` payload back.
    #[serde(rename_all = "camelCase")]
    NewInputType { input_type: InputType, extra: Value },

    /// Announcement that a registry instance has been activated.
    #[serde(rename_all = "camelCase")]
    RegistryExists { registry_id: Uuid },
}

impl RegistryEvent {
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::RegisteredInputTypes { .. } => "registeredInputTypes",
            Self::WidgetsByInputType { .. } => "getWidgetsByInputType",
            Self::NewInputType { .. } => "newInputType",
            Self::RegistryExists { .. } => "registryExists",
        }
    }
}
