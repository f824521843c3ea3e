//! # Registry Infrastructure
//!
//! The widget registry and its record types.
//!
//! ## Overview
//!
//! A [`WidgetRegistry`] maintains the table of widgets keyed by the input
//! types they can display, answers queries about registered types and
//! widgets, and relays those capabilities over the sandbox once activated.
//!
//! ## Usage
//!
//! ```rust
//! use phedex_registry::{InputType, Sandbox, WidgetRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = WidgetRegistry::new(Sandbox::new());
//! registry
//!     .add("phedex-module-nodes", InputType::Node, "Node View", None)
//!     .await?;
//! assert_eq!(registry.get_input_types().await, vec![InputType::Node]);
//! # Ok(())
//! # }
//! ```

pub mod widget_registry;

// Re-export main types for easy access
pub use widget_registry::{RegistryStats, WidgetRegistration, WidgetRegistry};
