use parcel_core::db::open_db_in_memory;
use parcel_core::{
    ParcelService, ParcelStatus, ParcelStore, ServiceError, SqliteParcelStore, StoreError,
};

#[test]
fn register_persists_a_registered_parcel() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let service = ParcelService::new(&store);

    let parcel = service.register(1000, "Pushkin st, 1").unwrap();

    assert!(parcel.is_persisted());
    assert_eq!(parcel.status, "registered");
    assert!(parcel.created_at.ends_with('Z'));
    assert_eq!(store.get(parcel.number).unwrap(), parcel);
}

#[test]
fn advance_status_walks_the_lifecycle_then_stops() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let service = ParcelService::new(&store);
    let number = service.register(1000, "test").unwrap().number;

    assert_eq!(service.advance_status(number).unwrap(), ParcelStatus::Sent);
    assert_eq!(service.advance_status(number).unwrap(), ParcelStatus::Delivered);
    assert!(matches!(
        service.advance_status(number),
        Err(ServiceError::FinalStatus(n)) if n == number
    ));
    assert_eq!(store.get(number).unwrap().status, "delivered");
}

#[test]
fn advance_status_rejects_unknown_status() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let service = ParcelService::new(&store);
    let number = service.register(1000, "test").unwrap().number;
    store.set_status(number, "held at customs").unwrap();

    let err = service.advance_status(number).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::UnknownStatus { ref status, .. } if status == "held at customs"
    ));
}

#[test]
fn address_change_and_removal_require_registered_status() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let service = ParcelService::new(&store);
    let open = service.register(1000, "old").unwrap().number;
    let sent = service.register(1000, "old").unwrap().number;
    service.advance_status(sent).unwrap();

    service.change_address(open, "new").unwrap();
    assert_eq!(store.get(open).unwrap().address, "new");

    assert!(matches!(
        service.change_address(sent, "new"),
        Err(ServiceError::NotRegistered { ref status, .. }) if status == "sent"
    ));
    assert!(matches!(
        service.remove(sent),
        Err(ServiceError::NotRegistered { .. })
    ));
    assert_eq!(store.get(sent).unwrap().address, "old");

    service.remove(open).unwrap();
    assert!(store.get(open).unwrap_err().is_not_found());
}

#[test]
fn missing_parcel_surfaces_store_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let service = ParcelService::new(store);

    for err in [
        service.parcel(99).unwrap_err(),
        service.advance_status(99).unwrap_err(),
        service.remove(99).unwrap_err(),
    ] {
        assert!(
            matches!(err, ServiceError::Store(StoreError::NotFound(99))),
            "unexpected error: {err}"
        );
    }
}

#[test]
fn parcels_of_lists_the_clients_parcels() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let service = ParcelService::new(&store);
    let a = service.register(7, "a").unwrap();
    let b = service.register(7, "b").unwrap();
    service.register(8, "c").unwrap();

    let mut listed = service.parcels_of(7).unwrap();
    listed.sort_by_key(|parcel| parcel.number);
    assert_eq!(listed, vec![a, b]);
    assert!(service.parcels_of(9).unwrap().is_empty());
}
