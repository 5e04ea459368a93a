//! Plugin-based provider registry
//!
//! The registry allows address providers to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains in the integration layer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eip_core::registry::ProviderRegistry;
//! use eip_core::config::ProviderConfig;
//!
//! // Create a registry
//! let registry = ProviderRegistry::new();
//!
//! // Register providers
//! registry.register_provider("aws", Box::new(aws_factory));
//!
//! // Create provider from config
//! let config = ProviderConfig::Aws { .. };
//! let provider = registry.create_provider(&config).await?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{AddressProvider, AddressProviderFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Provider registry for plugin-based address provider creation
///
/// The registry maintains a map of provider type names to factory objects,
/// allowing dynamic instantiation of providers based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered address provider factories
    providers: RwLock<HashMap<String, std::sync::Arc<dyn AddressProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an address provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "aws")
    /// - `factory`: Factory object for creating provider instances
    pub fn register_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn AddressProviderFactory>,
    ) {
        let name = name.into();
        let mut providers = self.providers.write().unwrap();
        providers.insert(name, std::sync::Arc::from(factory));
    }

    /// Create an address provider from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Provider configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn AddressProvider>)`: Created provider instance
    /// - `Err(Error)`: If the provider type is not registered or creation
    ///   fails
    pub async fn create_provider(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn AddressProvider>> {
        let provider_type = config.type_name();

        let factory = {
            let providers = self.providers.read().unwrap();
            providers
                .get(provider_type)
                .cloned()
                .ok_or_else(|| {
                    Error::config(format!("Unknown provider type: {}", provider_type))
                })?
            // Lock released here, before the async create
        };

        factory.create(config).await
    }

    /// List all registered provider types
    ///
    /// # Returns
    ///
    /// A vector of registered provider type names
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap();
        providers.keys().cloned().collect()
    }

    /// Check if a provider type is registered
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name
    ///
    /// # Returns
    ///
    /// `true` if registered, `false` otherwise
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap();
        providers.contains_key(name)
    }
}
