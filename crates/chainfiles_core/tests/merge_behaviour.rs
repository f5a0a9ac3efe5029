use std::sync::Once;

use chainfiles_core::{merge, FeedRecords, RawRecord};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn record(identifier: &str, contract: &str, holder: &str) -> RawRecord {
    RawRecord {
        identifier: identifier.to_string(),
        contract_address: contract.to_string(),
        holder_address: holder.to_string(),
        metadata_blob: r#"{"name":"file.bin","cid":"bafy-default"}"#.to_string(),
    }
}

fn record_with_blob(identifier: &str, contract: &str, holder: &str, blob: &str) -> RawRecord {
    RawRecord {
        metadata_blob: blob.to_string(),
        ..record(identifier, contract, holder)
    }
}

#[test]
fn each_identifier_appears_at_most_once() {
    init_logging();
    let owner = FeedRecords {
        deployed: vec![record("0xA", "0xc1", "0xme")],
        granted: vec![record("0xA", "0xc2", "0xme")],
    };
    let minter = FeedRecords {
        deployed: vec![record("0xa", "0xc3", "0xother")],
        granted: vec![record("0xA", "0xc4", "0xother")],
    };

    let entries = merge(&owner, &minter).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].identifier, "0xa");
}

#[test]
fn precedence_is_stream_order_not_arrival_order() {
    init_logging();
    // The same identifier in (owner, granted) and (minter, deployed): the
    // owner feed's copy wins because its stream sorts earlier, regardless of
    // which feed fetch completed first.
    let owner = FeedRecords {
        deployed: Vec::new(),
        granted: vec![record("0xB", "0xc-owner", "0xme")],
    };
    let minter = FeedRecords {
        deployed: vec![record("0xb", "0xc-minter", "0xother")],
        granted: Vec::new(),
    };

    let entries = merge(&owner, &minter).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].contract_address, "0xc-owner");
    assert_eq!(entries[0].owner, "0xme");
}

#[test]
fn access_granted_is_unioned_across_feeds() {
    init_logging();
    // Entry discovered through the owner deployed stream is still marked
    // access-granted because the identifier also shows up in the minter
    // feed's granted stream.
    let owner = FeedRecords {
        deployed: vec![record("0xA", "0xc1", "0xme"), record("0xB", "0xc1", "0xme")],
        granted: Vec::new(),
    };
    let minter = FeedRecords {
        deployed: Vec::new(),
        granted: vec![record("0xa", "0xc1", "0xother")],
    };

    let entries = merge(&owner, &minter).unwrap();
    assert_eq!(entries.len(), 2);
    let a = entries.iter().find(|e| e.identifier == "0xa").unwrap();
    let b = entries.iter().find(|e| e.identifier == "0xb").unwrap();
    assert!(a.access_granted);
    assert!(!b.access_granted);
}

#[test]
fn gated_out_record_does_not_occupy_a_slot() {
    init_logging();
    // The owner copy is pointer-only, so the minter copy of the same
    // identifier still gets considered and inserted.
    let owner = FeedRecords {
        deployed: vec![record_with_blob(
            "0xC",
            "0xc-owner",
            "0xme",
            r#"{"cid":"bafy","encryptedPointer":"0x01"}"#,
        )],
        granted: Vec::new(),
    };
    let minter = FeedRecords {
        deployed: vec![record("0xc", "0xc-minter", "0xother")],
        granted: Vec::new(),
    };

    let entries = merge(&owner, &minter).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].contract_address, "0xc-minter");
}

#[test]
fn record_without_locator_is_dropped_entirely() {
    init_logging();
    let owner = FeedRecords {
        deployed: vec![record_with_blob("0xD", "0xc1", "0xme", r#"{"name":"pending"}"#)],
        granted: Vec::new(),
    };

    let entries = merge(&owner, &FeedRecords::default()).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn insertion_order_follows_stream_precedence() {
    init_logging();
    let owner = FeedRecords {
        deployed: vec![record("0x2", "0xc", "0xme")],
        granted: vec![record("0x3", "0xc", "0xme")],
    };
    let minter = FeedRecords {
        deployed: vec![record("0x1", "0xc", "0xother")],
        granted: Vec::new(),
    };

    let entries = merge(&owner, &minter).unwrap();
    let ids: Vec<&str> = entries.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(ids, vec!["0x2", "0x3", "0x1"]);
}

#[test]
fn unparseable_blob_fails_the_whole_merge() {
    init_logging();
    let owner = FeedRecords {
        deployed: vec![record_with_blob("0xE", "0xc1", "0xme", "{broken")],
        granted: Vec::new(),
    };

    assert!(merge(&owner, &FeedRecords::default()).is_err());
}

#[test]
fn empty_feeds_merge_to_empty() {
    init_logging();
    let entries = merge(&FeedRecords::default(), &FeedRecords::default()).unwrap();
    assert!(entries.is_empty());
}
