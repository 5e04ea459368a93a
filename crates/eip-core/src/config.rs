//! Configuration types for the provisioning workflow
//!
//! This module defines all configuration structures used throughout the crate.

use crate::traits::AddressDomain;
use serde::{Deserialize, Serialize};

/// Main provisioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Address provider configuration
    pub provider: ProviderConfig,

    /// Target compute instance the address is associated with
    pub instance_id: String,

    /// Network scope to allocate the address in
    #[serde(default)]
    pub domain: AddressDomain,

    /// Optional workflow settings
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

impl ProvisionConfig {
    /// Create a configuration with defaults for the given instance
    pub fn new(provider: ProviderConfig, instance_id: impl Into<String>) -> Self {
        Self {
            provider,
            instance_id: instance_id.into(),
            domain: AddressDomain::default(),
            workflow: WorkflowConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.instance_id.is_empty() {
            return Err(crate::Error::config("No target instance configured"));
        }

        self.provider.validate()?;
        self.workflow.validate()?;

        Ok(())
    }
}

/// Address provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// AWS EC2 provider
    Aws {
        /// Target region (e.g., "eu-central-1")
        region: String,
        /// Named credentials profile (optional, ambient resolution otherwise)
        profile: Option<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Aws { region, .. } => {
                if region.is_empty() {
                    return Err(crate::Error::config("AWS region cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Aws { .. } => "aws",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Aws {
            region: String::new(),
            profile: None,
        }
    }
}

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Attempt best-effort teardown of a live allocation when a later step
    /// fails
    ///
    /// The source behavior is to leave partially provisioned resources in
    /// the account, so this defaults to `false`. When enabled, a failure
    /// after a successful allocation attempts to release the allocation;
    /// teardown errors are logged, and the original step error is the one
    /// reported.
    #[serde(default)]
    pub release_on_failure: bool,

    /// Capacity of the step event channel
    ///
    /// One run emits a handful of events, so the default is generous.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl WorkflowConfig {
    /// Validate the workflow configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config(
                "Event channel capacity must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            release_on_failure: false,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_event_channel_capacity() -> usize {
    16
}
