pub mod messages;
pub mod sandbox;

// Re-export key types for convenience
pub use messages::{Message, RegistryEvent, RegistryRequest};
pub use sandbox::{ChannelSubscriber, Sandbox};
