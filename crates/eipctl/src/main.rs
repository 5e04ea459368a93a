// # eipctl - Elastic IP Provisioning Tool
//
// This is a THIN integration layer. It reads configuration, wires the
// provider into the workflow, prints one status line per step, and maps
// the outcome to an exit code. All provisioning logic lives in eip-core.
//
// The eipctl binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime
// 3. Registering providers
// 4. Running the provisioning workflow once
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Provider
// - `EIP_PROVIDER_TYPE`: Provider type (aws)
// - `EIP_REGION`: Target cloud region
// - `EIP_PROFILE`: Named credentials profile (optional)
//
// ### Workflow
// - `EIP_INSTANCE_ID`: Target compute instance
// - `EIP_ADDRESS_DOMAIN`: Network scope for the allocation (vpc, standard)
// - `EIP_RELEASE_ON_FAILURE`: Best-effort teardown on partial failure
//   (true, false; default false)
//
// ### Logging
// - `EIP_LOG_LEVEL`: Log level (trace, debug, info, warn, error)
//
// ## Example
//
// ```bash
// export EIP_REGION=eu-central-1
// export EIP_INSTANCE_ID=i-0123456789abcdef0
//
// eipctl
// ```
//
// ## Exit Codes
//
// - 0: All four steps succeeded
// - 1: Configuration error
// - 2: Credentials not available
// - 3: Cloud API error

use anyhow::Result;
use eip_core::config::{ProviderConfig, ProvisionConfig, WorkflowConfig};
use eip_core::traits::AddressDomain;
use eip_core::workflow::{Provisioner, StepEvent};
use eip_core::ProviderRegistry;
use std::env;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// Zero means the full sequence succeeded; each failure category gets its
/// own non-zero code so callers can distinguish a missing-credentials
/// environment from a provider-side rejection.
#[derive(Debug, Clone, Copy)]
enum EipExitCode {
    /// All four steps succeeded
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// No usable cloud credentials
    CredentialsError = 2,
    /// Any other cloud API failure
    ApiError = 3,
}

impl From<EipExitCode> for ExitCode {
    fn from(code: EipExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    provider_type: String,
    region: String,
    profile: Option<String>,
    instance_id: String,
    address_domain: String,
    release_on_failure: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            provider_type: env::var("EIP_PROVIDER_TYPE").unwrap_or_else(|_| "aws".to_string()),
            region: env::var("EIP_REGION").unwrap_or_default(),
            profile: env::var("EIP_PROFILE").ok(),
            instance_id: env::var("EIP_INSTANCE_ID").unwrap_or_default(),
            address_domain: env::var("EIP_ADDRESS_DOMAIN").unwrap_or_else(|_| "vpc".to_string()),
            release_on_failure: env::var("EIP_RELEASE_ON_FAILURE")
                .ok()
                .map(|s| s.eq_ignore_ascii_case("true") || s == "1")
                .unwrap_or(false),
            log_level: env::var("EIP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// This performs validation including:
    /// - Required field presence
    /// - Instance id format validation
    /// - Type enumeration validation
    /// - Placeholder value detection (common mistake)
    fn validate(&self) -> Result<()> {
        // Validate region presence
        if self.region.is_empty() {
            anyhow::bail!(
                "EIP_REGION is required. \
                Set it via: export EIP_REGION=eu-central-1"
            );
        }

        // Check for obvious placeholder values (common mistake)
        let region_lower = self.region.to_lowercase();
        if region_lower.contains("your-region") || region_lower.contains("example") {
            anyhow::bail!(
                "EIP_REGION appears to be a placeholder. \
                Use an actual region identifier from your cloud provider."
            );
        }

        // Validate instance id presence and format
        if self.instance_id.is_empty() {
            anyhow::bail!(
                "EIP_INSTANCE_ID is required. \
                Set it via: export EIP_INSTANCE_ID=i-0123456789abcdef0"
            );
        }

        let instance_lower = self.instance_id.to_lowercase();
        if instance_lower.contains("your-instance")
            || instance_lower.contains("replace_me")
            || instance_lower.contains("example")
        {
            anyhow::bail!(
                "EIP_INSTANCE_ID appears to be a placeholder. \
                Use the id of an actual compute instance."
            );
        }

        self.validate_instance_id(&self.instance_id)?;

        // Validate provider type
        match self.provider_type.as_str() {
            "aws" => {} // Currently supported
            _ => anyhow::bail!(
                "EIP_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: aws",
                self.provider_type
            ),
        }

        // Validate address domain
        match self.address_domain.as_str() {
            "vpc" | "standard" => {}
            _ => anyhow::bail!(
                "EIP_ADDRESS_DOMAIN '{}' is not valid. \
                Valid domains: vpc, standard",
                self.address_domain
            ),
        }

        // Validate log level
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "EIP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Validate that a string is shaped like an EC2 instance id
    ///
    /// Instance ids are `i-` followed by 8 or 17 hex characters. The id is
    /// not checked for existence; an unknown instance surfaces later as an
    /// API error, exactly like any other provider rejection.
    fn validate_instance_id(&self, instance_id: &str) -> Result<()> {
        let Some(suffix) = instance_id.strip_prefix("i-") else {
            anyhow::bail!(
                "Instance id must start with 'i-'. Got: '{}'",
                instance_id
            );
        };

        if suffix.len() != 8 && suffix.len() != 17 {
            anyhow::bail!(
                "Instance id suffix must be 8 or 17 characters (got {}). Id: '{}'",
                suffix.len(),
                instance_id
            );
        }

        if !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!(
                "Instance id contains invalid characters. Id: '{}'. \
                Valid: hex digits after the 'i-' prefix.",
                instance_id
            );
        }

        Ok(())
    }

    /// Build the workflow configuration from the environment values
    fn to_provision_config(&self) -> ProvisionConfig {
        let domain = match self.address_domain.as_str() {
            "standard" => AddressDomain::Standard,
            _ => AddressDomain::Vpc,
        };

        ProvisionConfig {
            provider: ProviderConfig::Aws {
                region: self.region.clone(),
                profile: self.profile.clone(),
            },
            instance_id: self.instance_id.clone(),
            domain,
            workflow: WorkflowConfig {
                release_on_failure: self.release_on_failure,
                ..WorkflowConfig::default()
            },
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return EipExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return EipExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return EipExitCode::ConfigError.into();
    }

    info!("Starting eipctl");
    info!(
        "Target: instance {} in {}",
        config.instance_id, config.region
    );

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return EipExitCode::ApiError.into();
        }
    };

    rt.block_on(async {
        match run_provision(config).await {
            Ok(()) => EipExitCode::Success,
            Err(eip_core::Error::CredentialsUnavailable) => EipExitCode::CredentialsError,
            Err(eip_core::Error::Config(e)) => {
                error!("Configuration error: {}", e);
                EipExitCode::ConfigError
            }
            Err(e) => {
                error!("Provisioning failed: {}", e);
                EipExitCode::ApiError
            }
        }
    })
    .into()
}

/// Run the provisioning workflow once
async fn run_provision(config: Config) -> Result<(), eip_core::Error> {
    // Create provider registry
    let registry = ProviderRegistry::new();

    // Register built-in providers
    #[cfg(feature = "aws")]
    {
        info!("Registering AWS provider");
        eip_provider_aws::register(&registry);
    }

    let provision_config = config.to_provision_config();

    let provider = registry.create_provider(&provision_config.provider).await?;
    let (provisioner, mut events) = Provisioner::new(provider, provision_config)?;

    // Print one console line per step event; failure lines go to stderr
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                StepEvent::StepFailed { .. } => eprintln!("{}", event),
                _ => println!("{}", event),
            }
        }
    });

    let result = provisioner.run().await;

    // Dropping the provisioner closes the event channel, ending the printer
    drop(provisioner);
    let _ = printer.await;

    let report = result?;
    info!(
        "Provisioning complete: {} (allocation {}, association {})",
        report.public_ip, report.allocation_id, report.association_id
    );

    Ok(())
}
