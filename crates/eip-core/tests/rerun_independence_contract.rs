//! Contract test: runs are independent, not idempotent
//!
//! The workflow makes no idempotence claim: running it again for the same
//! instance allocates and associates a fresh address. There is no
//! deduplication against earlier runs and no state carried between them.
//!
//! If this test fails, someone has added caching or cross-run state to the
//! workflow.

mod common;

use common::*;
use eip_core::workflow::Provisioner;

#[tokio::test]
async fn two_runs_allocate_distinct_addresses() {
    let mock = MockAddressProvider::new();
    let handle = MockAddressProvider::sharing_counters_with(&mock);

    let (provisioner, events_rx) =
        Provisioner::new(Box::new(mock), minimal_config(FIXTURE_INSTANCE_ID))
            .expect("provisioner construction succeeds");

    let first = provisioner.run().await.expect("first run succeeds");
    let second = provisioner.run().await.expect("second run succeeds");

    // Each run processed its own allocation, end to end
    assert_eq!(first.allocation_id, "alloc-1");
    assert_eq!(second.allocation_id, "alloc-2");
    assert_ne!(first.allocation_id, second.allocation_id);
    assert_ne!(first.association_id, second.association_id);

    drop(provisioner);
    let events = drain_events(events_rx).await;

    // Two full sequences: four success events each
    assert_eq!(events.len(), 8);

    // Every operation ran once per run
    assert_eq!(handle.allocate_call_count(), 2);
    assert_eq!(handle.associate_call_count(), 2);
    assert_eq!(handle.disassociate_call_count(), 2);
    assert_eq!(handle.release_call_count(), 2);

    // The second run associated and released its own allocation
    assert_eq!(
        handle.associated_allocations()[1],
        (FIXTURE_INSTANCE_ID.to_string(), "alloc-2".to_string())
    );
    assert_eq!(
        handle.released_allocations(),
        vec!["alloc-1".to_string(), "alloc-2".to_string()]
    );
}
