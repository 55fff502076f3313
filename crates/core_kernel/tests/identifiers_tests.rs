//! Tests for strongly-typed identifiers

use core_kernel::EntryId;
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn test_new_ids_are_unique() {
    let ids: HashSet<EntryId> = (0..100).map(|_| EntryId::new()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_prefix() {
    assert_eq!(EntryId::prefix(), "ZKT");
}

#[test]
fn test_parse_without_prefix() {
    let uuid = Uuid::new_v4();
    let id: EntryId = uuid.to_string().parse().unwrap();
    assert_eq!(Uuid::from(id), uuid);
}

#[test]
fn test_parse_garbage_fails() {
    assert!("ZKT-not-a-uuid".parse::<EntryId>().is_err());
}

#[test]
fn test_serializes_as_bare_uuid() {
    let uuid = Uuid::new_v4();
    let id = EntryId::from_uuid(uuid);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", uuid));
}

#[test]
fn test_legacy_ids_ignore_whitespace() {
    assert_eq!(
        EntryId::from_legacy("1700000000000"),
        EntryId::from_legacy(" 1700000000000 ")
    );
}
