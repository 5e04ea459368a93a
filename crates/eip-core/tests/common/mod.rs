//! Test doubles and common utilities for workflow contract tests
//!
//! This module provides a scripted address provider that records calls and
//! injects failures, plus the shared fixture values used across the
//! contract tests.

use eip_core::config::{ProviderConfig, ProvisionConfig};
use eip_core::error::{Error, Result};
use eip_core::traits::{
    AddressAllocation, AddressDomain, AddressProvider, Association,
};
use eip_core::workflow::StepEvent;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// Fixture public IP returned by every mock allocation
pub const FIXTURE_PUBLIC_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5));

/// Fixture instance id used by the contract tests
pub const FIXTURE_INSTANCE_ID: &str = "i-0123456789abcdef0";

/// Scripted failure for one mock operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Operation succeeds
    None,
    /// Operation fails as if no credentials were available
    Credentials,
    /// Operation fails with a generic API error carrying this message
    Api(&'static str),
}

impl FailureMode {
    fn into_error(self) -> Option<Error> {
        match self {
            FailureMode::None => None,
            FailureMode::Credentials => Some(Error::CredentialsUnavailable),
            FailureMode::Api(message) => Some(Error::api(message)),
        }
    }
}

/// A mock AddressProvider that counts calls and injects scripted failures
///
/// Allocation and association identifiers are numbered per call
/// (`alloc-1`, `alloc-2`, ... / `assoc-1`, ...) so tests can verify that
/// repeated runs produce distinct identifiers.
pub struct MockAddressProvider {
    /// Call counters, one per operation
    allocate_calls: Arc<AtomicUsize>,
    associate_calls: Arc<AtomicUsize>,
    disassociate_calls: Arc<AtomicUsize>,
    release_calls: Arc<AtomicUsize>,

    /// Recorded arguments
    associated_allocations: Arc<std::sync::Mutex<Vec<(String, String)>>>,
    disassociated_associations: Arc<std::sync::Mutex<Vec<String>>>,
    released_allocations: Arc<std::sync::Mutex<Vec<String>>>,

    /// Scripted failures
    fail_allocate: FailureMode,
    fail_associate: FailureMode,
    fail_disassociate: FailureMode,
    fail_release: FailureMode,
}

impl MockAddressProvider {
    pub fn new() -> Self {
        Self {
            allocate_calls: Arc::new(AtomicUsize::new(0)),
            associate_calls: Arc::new(AtomicUsize::new(0)),
            disassociate_calls: Arc::new(AtomicUsize::new(0)),
            release_calls: Arc::new(AtomicUsize::new(0)),
            associated_allocations: Arc::new(std::sync::Mutex::new(Vec::new())),
            disassociated_associations: Arc::new(std::sync::Mutex::new(Vec::new())),
            released_allocations: Arc::new(std::sync::Mutex::new(Vec::new())),
            fail_allocate: FailureMode::None,
            fail_associate: FailureMode::None,
            fail_disassociate: FailureMode::None,
            fail_release: FailureMode::None,
        }
    }

    /// Script the allocate operation to fail
    pub fn with_allocate_failure(mut self, mode: FailureMode) -> Self {
        self.fail_allocate = mode;
        self
    }

    /// Script the associate operation to fail
    pub fn with_associate_failure(mut self, mode: FailureMode) -> Self {
        self.fail_associate = mode;
        self
    }

    /// Script the disassociate operation to fail
    pub fn with_disassociate_failure(mut self, mode: FailureMode) -> Self {
        self.fail_disassociate = mode;
        self
    }

    /// Script the release operation to fail
    pub fn with_release_failure(mut self, mode: FailureMode) -> Self {
        self.fail_release = mode;
        self
    }

    /// Create a new MockAddressProvider that shares counters and recorded
    /// arguments with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            allocate_calls: Arc::clone(&other.allocate_calls),
            associate_calls: Arc::clone(&other.associate_calls),
            disassociate_calls: Arc::clone(&other.disassociate_calls),
            release_calls: Arc::clone(&other.release_calls),
            associated_allocations: Arc::clone(&other.associated_allocations),
            disassociated_associations: Arc::clone(&other.disassociated_associations),
            released_allocations: Arc::clone(&other.released_allocations),
            fail_allocate: other.fail_allocate,
            fail_associate: other.fail_associate,
            fail_disassociate: other.fail_disassociate,
            fail_release: other.fail_release,
        }
    }

    pub fn allocate_call_count(&self) -> usize {
        self.allocate_calls.load(Ordering::SeqCst)
    }

    pub fn associate_call_count(&self) -> usize {
        self.associate_calls.load(Ordering::SeqCst)
    }

    pub fn disassociate_call_count(&self) -> usize {
        self.disassociate_calls.load(Ordering::SeqCst)
    }

    pub fn release_call_count(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    /// (instance_id, allocation_id) pairs passed to associate
    pub fn associated_allocations(&self) -> Vec<(String, String)> {
        self.associated_allocations.lock().unwrap().clone()
    }

    /// Association ids passed to disassociate
    pub fn disassociated_associations(&self) -> Vec<String> {
        self.disassociated_associations.lock().unwrap().clone()
    }

    /// Allocation ids passed to release
    pub fn released_allocations(&self) -> Vec<String> {
        self.released_allocations.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AddressProvider for MockAddressProvider {
    async fn allocate_address(&self, _domain: AddressDomain) -> Result<AddressAllocation> {
        let call = self.allocate_calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(err) = self.fail_allocate.into_error() {
            return Err(err);
        }

        Ok(AddressAllocation {
            public_ip: FIXTURE_PUBLIC_IP,
            allocation_id: format!("alloc-{}", call),
        })
    }

    async fn associate_address(
        &self,
        instance_id: &str,
        allocation_id: &str,
    ) -> Result<Association> {
        let call = self.associate_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.associated_allocations
            .lock()
            .unwrap()
            .push((instance_id.to_string(), allocation_id.to_string()));

        if let Some(err) = self.fail_associate.into_error() {
            return Err(err);
        }

        Ok(Association {
            association_id: format!("assoc-{}", call),
        })
    }

    async fn disassociate_address(&self, association_id: &str) -> Result<()> {
        self.disassociate_calls.fetch_add(1, Ordering::SeqCst);
        self.disassociated_associations
            .lock()
            .unwrap()
            .push(association_id.to_string());

        match self.fail_disassociate.into_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn release_address(&self, allocation_id: &str) -> Result<()> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        self.released_allocations
            .lock()
            .unwrap()
            .push(allocation_id.to_string());

        match self.fail_release.into_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a minimal ProvisionConfig for testing
pub fn minimal_config(instance_id: &str) -> ProvisionConfig {
    ProvisionConfig {
        provider: ProviderConfig::Aws {
            region: "eu-central-1".to_string(),
            profile: None,
        },
        instance_id: instance_id.to_string(),
        domain: AddressDomain::Vpc,
        workflow: Default::default(),
    }
}

/// Collect every buffered step event after the workflow has finished
///
/// The provisioner must be dropped first so the channel closes.
pub async fn drain_events(mut rx: mpsc::Receiver<StepEvent>) -> Vec<StepEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

/// Render events the way the binary prints them, one line per event
pub fn rendered_lines(events: &[StepEvent]) -> Vec<String> {
    events.iter().map(|e| e.to_string()).collect()
}
