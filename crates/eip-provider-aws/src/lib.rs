// # AWS EC2 Elastic IP Provider
//
// This crate provides an AWS EC2 implementation of the address provider
// interface for the provisioning workflow.
//
// ## Operation Mapping
//
// - `allocate_address`    → EC2 `AllocateAddress` (with a domain type)
// - `associate_address`   → EC2 `AssociateAddress`
// - `disassociate_address`→ EC2 `DisassociateAddress`
// - `release_address`     → EC2 `ReleaseAddress`
//
// Each trait method issues exactly one SDK call. There is no retry, no
// backoff, and no caching here; failure policy is owned by the workflow.
//
// ## Error Classification
//
// SDK failures are folded into the workflow's two runtime categories. A
// failure whose rendered error shows that the credential chain produced
// nothing maps to `Error::CredentialsUnavailable`; everything else (bad
// instance id, quota exceeded, bad region endpoint, network failure)
// maps to `Error::Api` with the operation name and underlying message.
//
// ## Credentials
//
// Credential resolution is ambient (environment, shared profile, IMDS),
// handled entirely by `aws-config`. An explicit profile name can be set in
// the provider configuration.
//
// ## API Reference
//
// - AllocateAddress: https://docs.aws.amazon.com/AWSEC2/latest/APIReference/API_AllocateAddress.html
// - AssociateAddress: https://docs.aws.amazon.com/AWSEC2/latest/APIReference/API_AssociateAddress.html

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::Client as Ec2Client;
use aws_sdk_ec2::types::DomainType;
use eip_core::config::ProviderConfig;
use eip_core::traits::{
    AddressAllocation, AddressDomain, AddressProvider, AddressProviderFactory, Association,
};
use eip_core::{Error, Result};

/// AWS EC2 address provider
///
/// Holds one configured EC2 client for a single region. The client is
/// cheap to clone internally and safe to share across tasks.
pub struct AwsAddressProvider {
    /// EC2 client for the configured region
    client: Ec2Client,

    /// Region the client targets (for logging)
    region: String,
}

impl AwsAddressProvider {
    /// Create a new provider for the specified region
    ///
    /// Credentials resolve through the default ambient chain.
    ///
    /// # Parameters
    ///
    /// - `region`: Target region (e.g., "eu-central-1")
    pub async fn new(region: &str) -> Self {
        Self::with_profile(region, None).await
    }

    /// Create a new provider for the specified region and profile
    ///
    /// # Parameters
    ///
    /// - `region`: Target region
    /// - `profile`: Named credentials profile, or `None` for the ambient
    ///   chain
    pub async fn with_profile(region: &str, profile: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));

        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        let config = loader.load().await;

        Self {
            client: Ec2Client::new(&config),
            region: region.to_string(),
        }
    }
}

/// Fold a rendered SDK error into the workflow's error taxonomy
///
/// The SDK does not expose a stable credentials-missing variant across
/// operation error types, so classification matches on the rendered error
/// text the same way resource lookups match on "NotFound".
fn classify_sdk_error(operation: &str, rendered: &str) -> Error {
    if rendered.contains("CredentialsNotLoaded") || rendered.contains("failed to load credentials")
    {
        Error::CredentialsUnavailable
    } else {
        Error::api(format!("{} failed: {}", operation, rendered))
    }
}

/// Map the workflow's network scope onto the EC2 domain type
fn domain_type(domain: AddressDomain) -> DomainType {
    match domain {
        AddressDomain::Vpc => DomainType::Vpc,
        AddressDomain::Standard => DomainType::Standard,
    }
}

#[async_trait]
impl AddressProvider for AwsAddressProvider {
    /// Reserve a new Elastic IP
    ///
    /// # API Call
    ///
    /// `AllocateAddress` with the configured domain type. The response
    /// carries the public IP and the allocation id; a response missing
    /// either is an API error.
    async fn allocate_address(&self, domain: AddressDomain) -> Result<AddressAllocation> {
        tracing::info!("Allocating Elastic IP in {} ({} domain)", self.region, domain);

        let output = self
            .client
            .allocate_address()
            .domain(domain_type(domain))
            .send()
            .await
            .map_err(|e| classify_sdk_error("AllocateAddress", &format!("{:?}", e)))?;

        let allocation_id = output
            .allocation_id()
            .ok_or_else(|| Error::api("AllocateAddress response missing allocation id"))?
            .to_string();

        let public_ip = output
            .public_ip()
            .ok_or_else(|| Error::api("AllocateAddress response missing public IP"))?
            .parse()
            .map_err(|e| Error::api(format!("Invalid public IP in AllocateAddress response: {}", e)))?;

        tracing::debug!("Allocated {} ({})", public_ip, allocation_id);

        Ok(AddressAllocation {
            public_ip,
            allocation_id,
        })
    }

    /// Bind an Elastic IP to an instance
    ///
    /// The instance id is passed through unvalidated; EC2 rejects unknown
    /// instances with an API error.
    ///
    /// # API Call
    ///
    /// `AssociateAddress` with the instance id and allocation id.
    async fn associate_address(
        &self,
        instance_id: &str,
        allocation_id: &str,
    ) -> Result<Association> {
        tracing::info!("Associating {} with {}", allocation_id, instance_id);

        let output = self
            .client
            .associate_address()
            .instance_id(instance_id)
            .allocation_id(allocation_id)
            .send()
            .await
            .map_err(|e| classify_sdk_error("AssociateAddress", &format!("{:?}", e)))?;

        let association_id = output
            .association_id()
            .ok_or_else(|| Error::api("AssociateAddress response missing association id"))?
            .to_string();

        tracing::debug!("Associated ({})", association_id);

        Ok(Association { association_id })
    }

    /// Unbind an Elastic IP from its instance
    ///
    /// # API Call
    ///
    /// `DisassociateAddress` with the association id. Success carries no
    /// payload.
    async fn disassociate_address(&self, association_id: &str) -> Result<()> {
        tracing::info!("Disassociating {}", association_id);

        self.client
            .disassociate_address()
            .association_id(association_id)
            .send()
            .await
            .map_err(|e| classify_sdk_error("DisassociateAddress", &format!("{:?}", e)))?;

        Ok(())
    }

    /// Return an Elastic IP to the account pool
    ///
    /// # API Call
    ///
    /// `ReleaseAddress` with the allocation id. Success carries no payload.
    async fn release_address(&self, allocation_id: &str) -> Result<()> {
        tracing::info!("Releasing {}", allocation_id);

        self.client
            .release_address()
            .allocation_id(allocation_id)
            .send()
            .await
            .map_err(|e| classify_sdk_error("ReleaseAddress", &format!("{:?}", e)))?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "aws"
    }
}

/// Factory for creating AWS providers
pub struct AwsFactory;

#[async_trait]
impl AddressProviderFactory for AwsFactory {
    async fn create(&self, config: &ProviderConfig) -> Result<Box<dyn AddressProvider>> {
        match config {
            ProviderConfig::Aws { region, profile } => {
                if region.is_empty() {
                    return Err(Error::config("AWS region is required"));
                }

                Ok(Box::new(
                    AwsAddressProvider::with_profile(region, profile.as_deref()).await,
                ))
            }
            _ => Err(Error::config("Invalid config for AWS provider")),
        }
    }
}

/// Register the AWS provider with a registry
///
/// This function should be called during initialization to make the AWS
/// provider available.
///
/// # Example
///
/// ```rust
/// use eip_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// eip_provider_aws::register(&registry);
/// ```
pub fn register(registry: &eip_core::ProviderRegistry) {
    registry.register_provider("aws", Box::new(AwsFactory));
}
