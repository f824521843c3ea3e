#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # PhEDEx Widget Registry
//!
//! Runtime registry mapping input types to the UI widgets able to display or
//! act on them, used by the PhEDEx dashboard application to populate menus
//! and context menus and to instantiate the right widget for a selected
//! object.
//!
//! ## Architecture
//!
//! The registry never holds references to other application components. All
//! coordination happens over the [`Sandbox`] mediator: other components send
//! typed [`events::RegistryRequest`] messages on the `Registry` channel and
//! receive typed [`events::RegistryEvent`] replies, either on that same
//! channel or on a reply channel of their choosing.
//!
//! A registry starts as pure data. Calling [`WidgetRegistry::activate`]
//! announces it on the `RegistryExists` channel and subscribes it to the
//! `Registry` channel; the transition is one-way.
//!
//! ## Module Organization
//!
//! - [`constants`] - The closed input-type set, channel names, naming conventions
//! - [`config`] - Environment-aware registry settings
//! - [`error`] - Structured error handling
//! - [`events`] - Typed message protocol and the sandbox mediator
//! - [`registry`] - The widget registry itself
//! - [`sequence`] - Process-wide registration-id generation
//! - [`logging`] - Structured tracing setup
//!
//! ## Quick Start
//!
//! ```rust
//! use phedex_registry::{InputType, Sandbox, WidgetRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sandbox = Sandbox::new();
//! let registry = WidgetRegistry::new(sandbox.clone());
//!
//! registry
//!     .add("phedex-module-transfers", InputType::Link, "Transfer Rates", None)
//!     .await?;
//!
//! // Wire the registry into the application
//! registry.activate().await;
//!
//! let widgets = registry.get_widgets_by_input_type(InputType::Link).await;
//! assert_eq!(widgets.unwrap().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod registry;
pub mod sequence;

pub use config::RegistryConfig;
pub use constants::{channels, InputType, MODULE_NAME_PREFIX};
pub use error::{RegistryError, Result};
pub use events::{ChannelSubscriber, Message, RegistryEvent, RegistryRequest, Sandbox};
pub use registry::{RegistryStats, WidgetRegistration, WidgetRegistry};
pub use sequence::Sequence;
