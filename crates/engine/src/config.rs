//! Store configuration via `lensdb.toml`
//!
//! Controls which attributes are indexed, whether the built-in entity
//! derivations run when a store is built, the in-memory sort capability
//! limit, and explicit view → entity type mappings.

use lensdb_core::{EntityType, Error, Result, ViewRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "lensdb.toml";

/// Store configuration loaded from `lensdb.toml`.
///
/// # Example
///
/// ```toml
/// default_indexes = ["user", "item"]
/// derive_defaults = true
/// sort_buffer_limit = 1000000
///
/// [views]
/// Rating = "rating"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Attributes indexed on every entity type.
    #[serde(default)]
    pub default_indexes: Vec<String>,
    /// Run the built-in derivations (e.g. users and items from ratings) at build.
    #[serde(default = "default_derive")]
    pub derive_defaults: bool,
    /// Largest result an in-memory sort may buffer; unlimited when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_buffer_limit: Option<usize>,
    /// View name → entity type name.
    #[serde(default)]
    pub views: BTreeMap<String, String>,
}

fn default_derive() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_indexes: Vec::new(),
            derive_defaults: default_derive(),
            sort_buffer_limit: None,
            views: BTreeMap::new(),
        }
    }
}

impl StoreConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# lensdb store configuration
#
# Attributes to index on every entity type (default: none)
default_indexes = []

# Synthesize user and item entities from ratings (default: true)
derive_defaults = true

# Largest in-memory sort a query may require (default: unlimited)
# sort_buffer_limit = 1000000

# Explicit view -> entity type mappings.
# Views not listed here use their own default entity type.
[views]
# Rating = "rating"
"#
    }

    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text does not parse or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse store config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, `Error::Config` if it
    /// cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Serialize this config to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize store config: {}", e)))
    }

    /// Check values that parse but make no sense.
    pub fn validate(&self) -> Result<()> {
        if self.sort_buffer_limit == Some(0) {
            return Err(Error::Config("sort_buffer_limit must be positive".to_string()));
        }
        if let Some(name) = self.default_indexes.iter().find(|n| n.is_empty()) {
            return Err(Error::Config(format!("invalid index attribute '{}'", name)));
        }
        for (view, entity_type) in &self.views {
            if view.is_empty() || entity_type.is_empty() {
                return Err(Error::Config(format!(
                    "invalid view mapping '{}' = '{}'",
                    view, entity_type
                )));
            }
        }
        Ok(())
    }

    /// The configured view mappings as a registry.
    pub fn view_registry(&self) -> ViewRegistry {
        let mut registry = ViewRegistry::new();
        for (view, entity_type) in &self.views {
            registry.register(view.clone(), EntityType::new(entity_type));
        }
        registry
    }
}
