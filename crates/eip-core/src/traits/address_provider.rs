// # Address Provider Trait
//
// Defines the interface for the cloud provider's elastic IP API.
//
// ## Implementations
//
// - AWS EC2: `eip-provider-aws` crate
// - Future: GCP static addresses, Azure public IPs, etc.
//
// ## Usage
//
// ```rust,ignore
// use eip_core::traits::{AddressDomain, AddressProvider};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* AddressProvider implementation */;
//
//     let allocation = provider.allocate_address(AddressDomain::Vpc).await?;
//     let association = provider
//         .associate_address("i-0123456789abcdef0", &allocation.allocation_id)
//         .await?;
//
//     provider.disassociate_address(&association.association_id).await?;
//     provider.release_address(&allocation.allocation_id).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Network scope an address is allocated in
///
/// The legacy `standard` scope exists for providers that still distinguish
/// it; every current deployment uses `vpc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressDomain {
    /// Allocate inside a virtual private network
    #[default]
    Vpc,
    /// Legacy provider-wide scope
    Standard,
}

impl std::fmt::Display for AddressDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressDomain::Vpc => write!(f, "vpc"),
            AddressDomain::Standard => write!(f, "standard"),
        }
    }
}

/// A reserved public address, held by the account until released
///
/// The allocation identifier is an opaque provider handle. It is valid only
/// between a successful allocate and a successful release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAllocation {
    /// The reserved public IP address
    pub public_ip: IpAddr,
    /// Opaque handle referencing the allocation in later API calls
    pub allocation_id: String,
}

/// A binding of a reserved address to a compute instance
///
/// Valid only between a successful associate and a successful disassociate.
/// At most one association exists per allocation under this workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// Opaque handle referencing the binding in later API calls
    pub association_id: String,
}

/// Trait for cloud address API implementations
///
/// Implementations are stateless, single-shot API callers. Each method maps
/// to exactly one provider API call; errors propagate to the caller, which
/// owns sequencing and failure policy. Implementations must not retry,
/// back off, cache, or spawn tasks.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait AddressProvider: Send + Sync {
    /// Reserve a new public address in the given network scope
    ///
    /// # Parameters
    ///
    /// - `domain`: The network scope to allocate in
    ///
    /// # Returns
    ///
    /// - `Ok(AddressAllocation)`: The reserved address and its handle
    /// - `Err(Error)`: If the allocation failed
    async fn allocate_address(
        &self,
        domain: AddressDomain,
    ) -> Result<AddressAllocation, crate::Error>;

    /// Bind a reserved address to a compute instance
    ///
    /// The instance id is externally supplied and is not checked for
    /// existence beforehand; an unknown instance surfaces as an API error.
    ///
    /// # Parameters
    ///
    /// - `instance_id`: The target compute instance
    /// - `allocation_id`: Handle of a live allocation
    ///
    /// # Returns
    ///
    /// - `Ok(Association)`: Handle of the created binding
    /// - `Err(Error)`: If the association failed
    async fn associate_address(
        &self,
        instance_id: &str,
        allocation_id: &str,
    ) -> Result<Association, crate::Error>;

    /// Unbind an address from its instance
    ///
    /// # Parameters
    ///
    /// - `association_id`: Handle of a live association
    async fn disassociate_address(&self, association_id: &str) -> Result<(), crate::Error>;

    /// Return a reserved address to the provider's pool
    ///
    /// After a successful release the allocation handle is dead and the
    /// address stops accruing charges.
    ///
    /// # Parameters
    ///
    /// - `allocation_id`: Handle of a live allocation
    async fn release_address(&self, allocation_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "aws")
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing address providers from configuration
///
/// Creation is async because some providers resolve ambient configuration
/// (region chains, credential providers) while building their client.
#[async_trait]
pub trait AddressProviderFactory: Send + Sync {
    /// Create an AddressProvider instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this provider
    ///
    /// # Returns
    ///
    /// A boxed AddressProvider trait object
    async fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn AddressProvider>, crate::Error>;
}
