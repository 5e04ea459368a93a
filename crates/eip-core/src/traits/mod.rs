//! Core traits for the provisioning workflow
//!
//! This module defines the abstract interface between the workflow and the
//! cloud provider's address API.
//!
//! - [`AddressProvider`]: allocate, associate, disassociate, and release
//!   elastic IP addresses via a provider API

pub mod address_provider;

pub use address_provider::{
    AddressAllocation, AddressDomain, AddressProvider, AddressProviderFactory, Association,
};
