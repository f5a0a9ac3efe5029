use chainfiles_core::{normalize, AccessType, MetadataError};
use pretty_assertions::assert_eq;

#[test]
fn locator_prefers_nested_storage_info_over_top_level() {
    let blob = r#"{"storageInfo":{"cid":"bafy-nested"},"cid":"bafy-top"}"#;
    let metadata = normalize("0xa", blob).unwrap();
    assert_eq!(metadata.storage_locator.as_deref(), Some("bafy-nested"));
}

#[test]
fn locator_accepts_snake_case_nesting() {
    let blob = r#"{"storage_info":{"cid":"bafy-snake"}}"#;
    let metadata = normalize("0xa", blob).unwrap();
    assert_eq!(metadata.storage_locator.as_deref(), Some("bafy-snake"));
}

#[test]
fn locator_falls_back_to_top_level_either_casing() {
    let lower = normalize("0xa", r#"{"cid":"bafy-lower"}"#).unwrap();
    assert_eq!(lower.storage_locator.as_deref(), Some("bafy-lower"));

    let upper = normalize("0xa", r#"{"CID":"bafy-upper"}"#).unwrap();
    assert_eq!(upper.storage_locator.as_deref(), Some("bafy-upper"));
}

#[test]
fn empty_locator_defers_to_next_shape() {
    let blob = r#"{"storageInfo":{"cid":""},"cid":"bafy-top"}"#;
    let metadata = normalize("0xa", blob).unwrap();
    assert_eq!(metadata.storage_locator.as_deref(), Some("bafy-top"));
}

#[test]
fn record_without_locator_is_not_listable() {
    let metadata = normalize("0xa", r#"{"name":"notes.txt"}"#).unwrap();
    assert!(metadata.storage_locator.is_none());
    assert!(!metadata.is_listable());
}

#[test]
fn pointer_marker_blocks_listing_even_with_locator() {
    let blob = r#"{"cid":"bafy-ready","encryptedPointer":"0xdeadbeef"}"#;
    let metadata = normalize("0xa", blob).unwrap();
    assert!(metadata.pointer_only);
    assert!(!metadata.is_listable());
}

#[test]
fn known_fields_are_extracted() {
    let blob = r#"{
        "name": "report.pdf",
        "type": "document",
        "mimeType": "application/pdf",
        "subtype": "pdf",
        "accessType": "private",
        "cid": "bafy-doc"
    }"#;
    let metadata = normalize("0xa", blob).unwrap();
    assert_eq!(metadata.name.as_deref(), Some("report.pdf"));
    assert_eq!(metadata.file_type.as_deref(), Some("document"));
    assert_eq!(metadata.mime_type.as_deref(), Some("application/pdf"));
    assert_eq!(metadata.subtype.as_deref(), Some("pdf"));
    assert_eq!(metadata.access_type, Some(AccessType::Private));
    assert!(metadata.is_listable());
}

#[test]
fn unknown_access_type_is_left_unset() {
    let metadata = normalize("0xa", r#"{"cid":"bafy","accessType":"shared"}"#).unwrap();
    assert_eq!(metadata.access_type, None);
}

#[test]
fn unparseable_blob_is_a_hard_error_with_identifier() {
    let err = normalize("0xbad", "{not json").unwrap_err();
    let MetadataError::Unparseable { identifier, .. } = err;
    assert_eq!(identifier, "0xbad");
}

#[test]
fn passthrough_fields_stringify_scalars_only() {
    let blob = r#"{"cid":"bafy","size":1024,"pinned":true,"tags":["a"],"note":null}"#;
    let metadata = normalize("0xa", blob).unwrap();
    assert_eq!(metadata.raw.field_text("size").as_deref(), Some("1024"));
    assert_eq!(metadata.raw.field_text("pinned").as_deref(), Some("true"));
    assert_eq!(metadata.raw.field_text("tags"), None);
    assert_eq!(metadata.raw.field_text("note"), None);
    assert_eq!(metadata.raw.field_text("missing"), None);
}
