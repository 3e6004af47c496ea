use parcel_core::{Parcel, ParcelStatus};

#[test]
fn parcel_new_starts_unpersisted_and_registered() {
    let parcel = Parcel::new(1000, "test", "2024-05-01T10:00:00Z");

    assert_eq!(parcel.number, 0);
    assert!(!parcel.is_persisted());
    assert_eq!(parcel.client, 1000);
    assert_eq!(parcel.status, "registered");
    assert_eq!(parcel.known_status(), Some(ParcelStatus::Registered));
    assert_eq!(parcel.created_at, "2024-05-01T10:00:00Z");
}

#[test]
fn registered_now_stamps_utc_rfc3339() {
    let parcel = Parcel::registered_now(5, "somewhere");

    assert!(parcel.created_at.ends_with('Z'), "got {}", parcel.created_at);
    assert!(chrono::DateTime::parse_from_rfc3339(&parcel.created_at).is_ok());
}

#[test]
fn status_vocabulary_roundtrips_and_orders() {
    for status in [
        ParcelStatus::Registered,
        ParcelStatus::Sent,
        ParcelStatus::Delivered,
    ] {
        assert_eq!(ParcelStatus::parse(status.as_str()), Some(status));
        assert_eq!(status.to_string(), status.as_str());
    }
    assert_eq!(ParcelStatus::parse("Registered"), None);
    assert_eq!(ParcelStatus::Registered.next(), Some(ParcelStatus::Sent));
    assert_eq!(ParcelStatus::Sent.next(), Some(ParcelStatus::Delivered));
    assert_eq!(ParcelStatus::Delivered.next(), None);
}

#[test]
fn parcel_serializes_with_flat_wire_fields() {
    let mut parcel = Parcel::new(1000, "test", "2024-05-01T10:00:00Z");
    parcel.number = 3;

    let json = serde_json::to_value(&parcel).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "number": 3,
            "client": 1000,
            "status": "registered",
            "address": "test",
            "created_at": "2024-05-01T10:00:00Z"
        })
    );
    assert_eq!(serde_json::from_value::<Parcel>(json).unwrap(), parcel);
    assert_eq!(
        serde_json::to_value(ParcelStatus::Delivered).unwrap(),
        "delivered"
    );
}
