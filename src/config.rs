use crate::constants::{channels, MODULE_NAME_PREFIX};

/// Runtime settings for a [`crate::registry::WidgetRegistry`].
///
/// Defaults preserve the channel names and widget naming convention of the
/// historical application server; overrides exist mainly so that test
/// harnesses and embedded deployments can namespace their channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Channel the registry listens on and announces to.
    pub event_channel: String,
    /// Channel the registry announces its activation on.
    pub announce_channel: String,
    /// Prefix stripped from widget identifiers when deriving short names.
    pub module_prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            event_channel: channels::REGISTRY.to_string(),
            announce_channel: channels::REGISTRY_EXISTS.to_string(),
            module_prefix: MODULE_NAME_PREFIX.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Build a configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(channel) = std::env::var("PHEDEX_REGISTRY_CHANNEL") {
            config.event_channel = channel;
        }

        if let Ok(channel) = std::env::var("PHEDEX_REGISTRY_ANNOUNCE_CHANNEL") {
            config.announce_channel = channel;
        }

        if let Ok(prefix) = std::env::var("PHEDEX_MODULE_PREFIX") {
            config.module_prefix = prefix;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_historical_names() {
        let config = RegistryConfig::default();
        assert_eq!(config.event_channel, "Registry");
        assert_eq!(config.announce_channel, "RegistryExists");
        assert_eq!(config.module_prefix, "phedex-module-");
    }

    #[test]
    fn test_env_vars_override_each_setting() {
        std::env::set_var("PHEDEX_REGISTRY_CHANNEL", "TestRegistry");
        std::env::set_var("PHEDEX_REGISTRY_ANNOUNCE_CHANNEL", "TestRegistryExists");
        std::env::set_var("PHEDEX_MODULE_PREFIX", "test-module-");

        let config = RegistryConfig::from_env();
        assert_eq!(config.event_channel, "TestRegistry");
        assert_eq!(config.announce_channel, "TestRegistryExists");
        assert_eq!(config.module_prefix, "test-module-");

        std::env::remove_var("PHEDEX_REGISTRY_CHANNEL");
        std::env::remove_var("PHEDEX_REGISTRY_ANNOUNCE_CHANNEL");
        std::env::remove_var("PHEDEX_MODULE_PREFIX");

        assert_eq!(RegistryConfig::from_env(), RegistryConfig::default());
    }
}
