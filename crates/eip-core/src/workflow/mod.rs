//! Core provisioning workflow
//!
//! The Provisioner drives the address API through a fixed sequence:
//!
//! ```text
//! allocate ──▶ associate ──▶ disassociate ──▶ release
//! ```
//!
//! Each step depends on an identifier returned by the previous one, so the
//! first failure aborts the remaining steps. There are no branches and no
//! retries; failure policy is limited to the optional best-effort teardown
//! configured via [`WorkflowConfig::release_on_failure`].
//!
//! ## Event Flow
//!
//! 1. A step completes (or fails)
//! 2. The provisioner emits a [`StepEvent`] on its channel
//! 3. The consumer (typically the binary) renders the event's `Display`
//!    form as a console status line
//!
//! [`WorkflowConfig::release_on_failure`]: crate::config::WorkflowConfig

use crate::config::ProvisionConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::traits::{AddressAllocation, AddressDomain, AddressProvider};
use std::net::IpAddr;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// One step of the fixed provisioning sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Reserve a public address
    Allocate,
    /// Bind the address to the target instance
    Associate,
    /// Unbind the address from the instance
    Disassociate,
    /// Return the address to the provider's pool
    Release,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Allocate => write!(f, "allocate"),
            Step::Associate => write!(f, "associate"),
            Step::Disassociate => write!(f, "disassociate"),
            Step::Release => write!(f, "release"),
        }
    }
}

/// Events emitted by the Provisioner
///
/// The `Display` implementation renders the console status line for each
/// event, one line per completed or failed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    /// A public address was reserved
    Allocated {
        public_ip: IpAddr,
        allocation_id: String,
    },

    /// The address was bound to the target instance
    Associated {
        public_ip: IpAddr,
        instance_id: String,
        association_id: String,
    },

    /// The address was unbound from the instance
    Disassociated {
        public_ip: IpAddr,
        instance_id: String,
    },

    /// The address was returned to the provider's pool
    Released { public_ip: IpAddr },

    /// A step failed and aborted the remaining sequence
    StepFailed {
        step: Step,
        kind: ErrorKind,
        message: String,
    },
}

impl std::fmt::Display for StepEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepEvent::Allocated {
                public_ip,
                allocation_id,
            } => write!(
                f,
                "Allocated Elastic IP: {} with Allocation ID: {}",
                public_ip, allocation_id
            ),
            StepEvent::Associated {
                public_ip,
                instance_id,
                ..
            } => write!(
                f,
                "Elastic IP {} associated with Instance ID: {}",
                public_ip, instance_id
            ),
            StepEvent::Disassociated {
                public_ip,
                instance_id,
            } => write!(
                f,
                "Elastic IP {} disassociated from Instance ID: {}",
                public_ip, instance_id
            ),
            StepEvent::Released { public_ip } => {
                write!(f, "Released Elastic IP: {}", public_ip)
            }
            StepEvent::StepFailed { kind, message, .. } => match kind {
                ErrorKind::Credentials => write!(f, "Credentials not available."),
                ErrorKind::Api => write!(f, "Unexpected error: {}", message),
            },
        }
    }
}

/// Summary of one successful run
///
/// All three identifiers are dead by the time the report exists: the
/// association was disassociated and the allocation released. The report is
/// for logging only and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// The public IP that was cycled through the workflow
    pub public_ip: IpAddr,
    /// Identifier of the (now released) allocation
    pub allocation_id: String,
    /// Identifier of the (now removed) association
    pub association_id: String,
}

/// Core provisioning workflow
///
/// The provisioner owns the provider handle and the workflow settings.
/// [`Provisioner::run`] executes one full sequence; running it again starts
/// an independent sequence that allocates a fresh address (no deduplication
/// against earlier runs).
pub struct Provisioner {
    /// Address API implementation
    provider: Box<dyn AddressProvider>,

    /// Target compute instance
    instance_id: String,

    /// Network scope for the allocation
    domain: AddressDomain,

    /// Best-effort teardown on mid-sequence failure
    release_on_failure: bool,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<StepEvent>,
}

impl Provisioner {
    /// Create a new provisioner
    ///
    /// # Parameters
    ///
    /// - `provider`: Address API implementation
    /// - `config`: Provisioning configuration
    ///
    /// # Returns
    ///
    /// A tuple of (provisioner, event_receiver) where event_receiver yields
    /// step events
    pub fn new(
        provider: Box<dyn AddressProvider>,
        config: ProvisionConfig,
    ) -> Result<(Self, mpsc::Receiver<StepEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.workflow.event_channel_capacity);

        let provisioner = Self {
            provider,
            instance_id: config.instance_id,
            domain: config.domain,
            release_on_failure: config.workflow.release_on_failure,
            event_tx: tx,
        };

        Ok((provisioner, rx))
    }

    /// Execute the four-step sequence once
    ///
    /// # Returns
    ///
    /// - `Ok(ProvisionReport)`: All four steps succeeded
    /// - `Err(Error)`: The first step failure, after emitting a
    ///   [`StepEvent::StepFailed`] and (if configured) attempting teardown
    pub async fn run(&self) -> Result<ProvisionReport> {
        info!(
            "Provisioning elastic IP for {} via {}",
            self.instance_id,
            self.provider.provider_name()
        );

        let allocation = match self.provider.allocate_address(self.domain).await {
            Ok(allocation) => allocation,
            Err(e) => {
                self.fail(Step::Allocate, &e);
                return Err(e);
            }
        };
        debug!(
            "Allocated {} ({})",
            allocation.public_ip, allocation.allocation_id
        );
        self.emit_event(StepEvent::Allocated {
            public_ip: allocation.public_ip,
            allocation_id: allocation.allocation_id.clone(),
        });

        let association = match self
            .provider
            .associate_address(&self.instance_id, &allocation.allocation_id)
            .await
        {
            Ok(association) => association,
            Err(e) => {
                self.fail(Step::Associate, &e);
                self.abort_teardown(&allocation).await;
                return Err(e);
            }
        };
        debug!(
            "Associated {} with {} ({})",
            allocation.public_ip, self.instance_id, association.association_id
        );
        self.emit_event(StepEvent::Associated {
            public_ip: allocation.public_ip,
            instance_id: self.instance_id.clone(),
            association_id: association.association_id.clone(),
        });

        if let Err(e) = self
            .provider
            .disassociate_address(&association.association_id)
            .await
        {
            self.fail(Step::Disassociate, &e);
            self.abort_teardown(&allocation).await;
            return Err(e);
        }
        self.emit_event(StepEvent::Disassociated {
            public_ip: allocation.public_ip,
            instance_id: self.instance_id.clone(),
        });

        if let Err(e) = self
            .provider
            .release_address(&allocation.allocation_id)
            .await
        {
            self.fail(Step::Release, &e);
            return Err(e);
        }
        self.emit_event(StepEvent::Released {
            public_ip: allocation.public_ip,
        });

        info!("Provisioning sequence complete for {}", allocation.public_ip);

        Ok(ProvisionReport {
            public_ip: allocation.public_ip,
            allocation_id: allocation.allocation_id,
            association_id: association.association_id,
        })
    }

    /// Report a failed step
    ///
    /// # Parameters
    ///
    /// - `step`: The step that failed
    /// - `err`: The failure being propagated
    fn fail(&self, step: Step, err: &Error) {
        error!("Step {} failed: {}", step, err);
        self.emit_event(StepEvent::StepFailed {
            step,
            kind: err.kind(),
            message: err.to_string(),
        });
    }

    /// Best-effort teardown of a live allocation after a failed step
    ///
    /// Disabled by default, matching the source behavior of leaving the
    /// allocation (and any association) live in the provider account. When
    /// enabled, the release of the allocation is attempted; teardown errors
    /// are logged and swallowed so that the original step error is the one
    /// reported. Teardown never re-attempts the step that just failed, so
    /// an association that survived a disassociate failure is left for
    /// manual cleanup (its id was already printed and logged).
    ///
    /// # Parameters
    ///
    /// - `allocation`: The allocation left live by the failure
    async fn abort_teardown(&self, allocation: &AddressAllocation) {
        if !self.release_on_failure {
            warn!(
                "Leaving allocation {} ({}) unreleased; release it manually",
                allocation.allocation_id, allocation.public_ip
            );
            return;
        }

        match self
            .provider
            .release_address(&allocation.allocation_id)
            .await
        {
            Ok(()) => {
                info!(
                    "Teardown released allocation {} ({})",
                    allocation.allocation_id, allocation.public_ip
                );
                self.emit_event(StepEvent::Released {
                    public_ip: allocation.public_ip,
                });
            }
            Err(e) => {
                warn!(
                    "Teardown failed to release {} ({}): {}",
                    allocation.allocation_id, allocation.public_ip, e
                );
            }
        }
    }

    /// Emit a step event
    ///
    /// # Parameters
    ///
    /// - `event`: The event to emit
    fn emit_event(&self, event: StepEvent) {
        // A run emits at most six events, so a full channel means the
        // consumer stopped draining. The event is dropped with a warning.
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full, dropping step event");
        }
    }
}
