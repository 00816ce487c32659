use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = ClientId::new();
    assert!(!id.to_string().is_empty());
    assert_eq!(id.into_inner().get_version_num(), 7);
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = CollectorId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
    assert_eq!(Uuid::from(id), uuid);
    assert_eq!(CollectorId::from(uuid), id);
}

#[test]
fn test_typed_ids_are_time_ordered() {
    let first = PaymentId::new();
    let second = PaymentId::new();
    assert!(first <= second);
}

#[test]
fn test_typed_id_display() {
    let uuid = Uuid::new_v4();
    let id = PaymentId::from_uuid(uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = ClientId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(ClientId::from_str("CLI001").is_err());
}

#[test]
fn test_typed_id_serializes_transparently() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&ClientId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
