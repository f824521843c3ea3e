//! # Widget Registry
//!
//! Registry mapping input types to the UI widgets able to display them.
//!
//! ## Overview
//!
//! The WidgetRegistry owns an in-memory table keyed by input type, widget
//! identifier, and label, plus a derived short-name index for reverse lookup.
//! It is used for filling menus and instantiating widgets: menu builders ask
//! it which widgets can handle a selected object, and modules ask it which
//! input type a given widget serves.
//!
//! ## Key Features
//!
//! - **Closed input-type set** validated at the string boundary
//! - **Duplicate detection** on the (input type, widget, label) triple
//! - **Short-name derivation** from the modular widget naming convention
//! - **Sandbox integration**: queries and mutations arrive as typed messages
//!
//! ## Usage
//!
//! ```rust
//! use phedex_registry::{InputType, Sandbox, WidgetRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sandbox = Sandbox::new();
//! let registry = WidgetRegistry::new(sandbox);
//!
//! registry
//!     .add("phedex-module-agents", InputType::Node, "Agents", None)
//!     .await?;
//!
//! let widgets = registry.get_widgets_by_input_type(InputType::Node).await;
//! assert_eq!(widgets.unwrap()[0].short_name, "agents");
//!
//! // Wire the registry to the sandbox so other components can reach it
//! registry.activate().await;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RegistryConfig;
use crate::constants::InputType;
use crate::error::{RegistryError, Result};
use crate::events::{ChannelSubscriber, Message, RegistryEvent, RegistryRequest, Sandbox};
use crate::sequence::Sequence;

/// A widget registered for one input type under one label.
///
/// Serializes flat, with `extra` keys alongside the standard fields, matching
/// the record shape menu builders historically consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRegistration {
    /// Full widget identifier.
    pub widget: String,
    /// Lowercase, prefix-stripped form of the identifier.
    pub short_name: String,
    /// Input type the widget was registered against.
    #[serde(rename = "type")]
    pub input_type: InputType,
    /// Human-readable label shown in menus.
    pub label: String,
    /// Process-unique sequence id.
    pub id: u64,
    pub registered_at: DateTime<Utc>,
    /// Caller-supplied attributes, e.g. menu placement hints.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetRegistration {
    /// Merge caller-supplied extra keys into the record.
    ///
    /// String values for `label` and `short_name` override the standard
    /// fields; identity fields (`widget`, `id`) and the typed fields backing
    /// the table keys are never overridden. Everything else lands in the
    /// auxiliary map.
    fn merge_extra(&mut self, extras: Map<String, Value>) {
        for (key, value) in extras {
            match key.as_str() {
                "label" => match value {
                    Value::String(label) => self.label = label,
                    other => self.skip_extra(&key, &other),
                },
                "short_name" => match value {
                    Value::String(short_name) => self.short_name = short_name,
                    other => self.skip_extra(&key, &other),
                },
                "widget" | "id" | "type" | "registered_at" => self.skip_extra(&key, &value),
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
    }

    fn skip_extra(&self, key: &str, value: &Value) {
        warn!(
            widget = %self.widget,
            key,
            value = %value,
            "Ignoring extra key that cannot override a standard registration field"
        );
    }
}

/// Counts of what the registry currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub input_types: usize,
    pub widgets: usize,
    pub short_names: usize,
}

/// Widget table and derived short-name index.
#[derive(Debug, Default)]
struct RegistryState {
    /// input type -> widget identifier -> label -> registration
    widgets: HashMap<InputType, HashMap<String, HashMap<String, WidgetRegistration>>>,
    /// lowercase short name -> input type (last writer wins)
    short_names: HashMap<String, InputType>,
}

/// Registry for widgets keyed by the input types they can display.
///
/// Cheap to clone; clones share the table. Constructed as pure data, then
/// wired to the sandbox by [`WidgetRegistry::activate`].
#[derive(Clone)]
pub struct WidgetRegistry {
    id: Uuid,
    sandbox: Sandbox,
    config: RegistryConfig,
    sequence: Sequence,
    state: Arc<RwLock<RegistryState>>,
    active: Arc<AtomicBool>,
}

impl WidgetRegistry {
    /// Create a registry with default configuration and the process-wide
    /// sequence counter.
    pub fn new(sandbox: Sandbox) -> Self {
        Self::with_config(sandbox, RegistryConfig::default())
    }

    /// Create a registry with explicit configuration.
    pub fn with_config(sandbox: Sandbox, config: RegistryConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            sandbox,
            config,
            sequence: Sequence::process_wide(),
            state: Arc::new(RwLock::new(RegistryState::default())),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the sequence-id source, mainly for tests.
    pub fn with_sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = sequence;
        self
    }

    /// Instance id, announced on activation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether [`WidgetRegistry::activate`] has run.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Register a widget for an input type under a label.
    ///
    /// Fails with [`RegistryError::DuplicateRegistration`] when the exact
    /// (input type, widget, label) triple is already present, leaving the
    /// table untouched. The first registration under a previously-unseen
    /// input type announces the updated type list on the registry channel.
    pub async fn add(
        &self,
        widget: &str,
        input_type: InputType,
        label: &str,
        extra: Option<Map<String, Value>>,
    ) -> Result<WidgetRegistration> {
        let (registration, announced_types) = {
            let mut state = self.state.write().await;

            let duplicate = state
                .widgets
                .get(&input_type)
                .and_then(|by_widget| by_widget.get(widget))
                .is_some_and(|by_label| by_label.contains_key(label));
            if duplicate {
                return Err(RegistryError::DuplicateRegistration {
                    widget: widget.to_string(),
                    input_type,
                    label: label.to_string(),
                });
            }

            let first_for_type = !state.widgets.contains_key(&input_type);

            let mut registration = WidgetRegistration {
                widget: widget.to_string(),
                short_name: derive_short_name(widget, &self.config.module_prefix),
                input_type,
                label: label.to_string(),
                id: self.sequence.next_id(),
                registered_at: Utc::now(),
                extra: Map::new(),
            };
            if let Some(extras) = extra {
                registration.merge_extra(extras);
            }

            // The index key is the post-merge short name, lowercased so that
            // reverse lookups stay case-insensitive
            let index_key = registration.short_name.to_lowercase();
            if let Some(previous) = state.short_names.insert(index_key.clone(), input_type) {
                if previous != input_type {
                    warn!(
                        short_name = %index_key,
                        previous_type = %previous,
                        new_type = %input_type,
                        widget,
                        "Short name re-indexed to a different input type; reverse lookups now resolve to the new type"
                    );
                }
            }

            state
                .widgets
                .entry(input_type)
                .or_default()
                .entry(widget.to_string())
                .or_default()
                .insert(label.to_string(), registration.clone());

            let announced =
                first_for_type.then(|| state.widgets.keys().copied().collect::<Vec<_>>());
            (registration, announced)
        };

        info!(
            widget,
            input_type = %input_type,
            label,
            id = registration.id,
            "Registered widget"
        );

        if let Some(input_types) = announced_types {
            self.sandbox
                .notify(
                    &self.config.event_channel,
                    Message::from(RegistryEvent::RegisteredInputTypes { input_types }),
                )
                .await;
        }

        Ok(registration)
    }

    /// Input types that currently have at least one registered widget.
    pub async fn get_input_types(&self) -> Vec<InputType> {
        let state = self.state.read().await;
        state.widgets.keys().copied().collect()
    }

    /// All registrations under `input_type`, flattened across widgets and
    /// labels, or `None` when the type has never had a registration.
    pub async fn get_widgets_by_input_type(
        &self,
        input_type: InputType,
    ) -> Option<Vec<WidgetRegistration>> {
        let state = self.state.read().await;
        state.widgets.get(&input_type).map(|by_widget| {
            by_widget
                .values()
                .flat_map(|by_label| by_label.values().cloned())
                .collect()
        })
    }

    /// Reverse lookup from a widget short name to its input type. Absence is
    /// benign, not an error.
    pub async fn get_type_of_module(&self, short_name: &str) -> Option<InputType> {
        let state = self.state.read().await;
        state.short_names.get(&short_name.to_lowercase()).copied()
    }

    /// Counts of the input types, widget registrations, and indexed short
    /// names the registry currently holds.
    pub async fn stats(&self) -> RegistryStats {
        let state = self.state.read().await;
        RegistryStats {
            input_types: state.widgets.len(),
            widgets: state
                .widgets
                .values()
                .map(|by_widget| by_widget.values().map(HashMap::len).sum::<usize>())
                .sum(),
            short_names: state.short_names.len(),
        }
    }

    /// Wire the registry to the sandbox.
    ///
    /// Until this is called the registry is pure data reachable only through
    /// direct method calls. Activation announces the instance on the
    /// announce channel, then subscribes it to the registry channel. The
    /// transition is one-way and latched; repeat calls are no-ops.
    pub async fn activate(&self) {
        if self.active.swap(true, Ordering::SeqCst) {
            debug!(registry_id = %self.id, "Registry already active");
            return;
        }

        info!(
            registry_id = %self.id,
            channel = %self.config.event_channel,
            "Activating widget registry"
        );

        self.sandbox
            .notify(
                &self.config.announce_channel,
                Message::from(RegistryEvent::RegistryExists {
                    registry_id: self.id,
                }),
            )
            .await;

        self.sandbox
            .listen(&self.config.event_channel, Arc::new(self.clone()))
            .await;
    }
}

#[async_trait]
impl ChannelSubscriber for WidgetRegistry {
    async fn on_message(&self, channel: &str, message: &Message) -> Result<()> {
        let request = match message {
            Message::Request(request) => request,
            Message::Event(event) => {
                // The registry hears its own announcements on this channel
                debug!(channel, action = event.action_name(), "Ignoring non-request message");
                return Ok(());
            }
        };

        match request {
            RegistryRequest::Add {
                widget,
                input_type,
                label,
                extra,
            } => {
                // Errors propagate to the sandbox dispatch layer; they
                // indicate a programming mistake in the sender
                self.add(widget, *input_type, label, Some(extra.clone()))
                    .await?;
            }

            RegistryRequest::GetWidgetsByInputType {
                input_type,
                reply_to,
            } => {
                let widgets = self.get_widgets_by_input_type(*input_type).await;
                self.sandbox
                    .notify(
                        reply_to,
                        Message::from(RegistryEvent::WidgetsByInputType {
                            input_type: *input_type,
                            widgets,
                        }),
                    )
                    .await;
            }

            RegistryRequest::GetInputTypes => {
                let input_types = self.get_input_types().await;
                self.sandbox
                    .notify(
                        &self.config.event_channel,
                        Message::from(RegistryEvent::RegisteredInputTypes { input_types }),
                    )
                    .await;
            }

            RegistryRequest::GetTypeOfModule { short_name, extra } => {
                match self.get_type_of_module(short_name).await {
                    Some(input_type) => {
                        self.sandbox
                            .notify(
                                &self.config.event_channel,
                                Message::from(RegistryEvent::NewInputType {
                                    input_type,
                                    extra: extra.clone(),
                                }),
                            )
                            .await;
                    }
                    None => {
                        debug!(short_name = %short_name, "No widget registered under short name");
                    }
                }
            }
        }

        Ok(())
    }

    fn subscriber_name(&self) -> &str {
        "widget_registry"
    }
}

/// Derive a widget's short name: strip the modular naming prefix when it
/// matches with a non-empty remainder, otherwise keep the full identifier;
/// lowercase either way.
fn derive_short_name(widget: &str, prefix: &str) -> String {
    widget
        .strip_prefix(prefix)
        .filter(|suffix| !suffix.is_empty())
        .unwrap_or(widget)
        .to_lowercase()
}
