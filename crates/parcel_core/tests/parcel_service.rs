use parcel_core::db::open_db_in_memory;
use parcel_core::{
    ParcelAction, ParcelService, ParcelStatus, ParcelStore, ServiceError, SqliteParcelStore,
};

#[test]
fn register_creates_registered_parcel_with_current_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());

    let parcel = service.register(1000, "Pushkin st. 1").unwrap();
    assert_ne!(parcel.number, 0);
    assert_eq!(parcel.status, ParcelStatus::Registered);
    assert!(parcel.validate().is_ok());

    assert_eq!(service.get(parcel.number).unwrap(), parcel);
}

#[test]
fn next_status_walks_lifecycle_and_stops_at_delivered() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let number = service.register(1000, "a").unwrap().number;

    assert_eq!(service.next_status(number).unwrap(), ParcelStatus::Sent);
    assert_eq!(service.next_status(number).unwrap(), ParcelStatus::Delivered);

    let err = service.next_status(number).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTransition {
            status: ParcelStatus::Delivered,
            action: ParcelAction::AdvanceStatus,
            ..
        }
    ));
    assert_eq!(service.get(number).unwrap().status, ParcelStatus::Delivered);
}

#[test]
fn change_address_only_while_registered() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let number = service.register(1000, "old").unwrap().number;

    service.change_address(number, "new").unwrap();
    assert_eq!(service.get(number).unwrap().address, "new");

    service.next_status(number).unwrap();
    let err = service.change_address(number, "too late").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTransition {
            status: ParcelStatus::Sent,
            action: ParcelAction::ChangeAddress,
            ..
        }
    ));
    assert_eq!(service.get(number).unwrap().address, "new");
}

#[test]
fn delete_only_while_registered() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let kept = service.register(1000, "kept").unwrap().number;
    let removed = service.register(1000, "removed").unwrap().number;

    service.next_status(kept).unwrap();
    let err = service.delete(kept).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTransition {
            action: ParcelAction::Delete,
            ..
        }
    ));

    service.delete(removed).unwrap();
    let remaining = service.client_parcels(1000).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].number, kept);
}

#[test]
fn operations_on_missing_parcel_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());

    assert!(matches!(service.get(5), Err(ServiceError::NotFound(5))));
    assert!(matches!(service.next_status(5), Err(ServiceError::NotFound(5))));
    assert!(matches!(
        service.change_address(5, "x"),
        Err(ServiceError::NotFound(5))
    ));
    assert!(matches!(service.delete(5), Err(ServiceError::NotFound(5))));
}

#[test]
fn store_bypass_is_still_possible_below_service() {
    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());
    let number = service.register(1000, "a").unwrap().number;

    let store = SqliteParcelStore::try_new(&conn).unwrap();
    store.set_status(number, ParcelStatus::Delivered).unwrap();
    store.set_status(number, ParcelStatus::Registered).unwrap();

    assert_eq!(service.next_status(number).unwrap(), ParcelStatus::Sent);
}

#[test]
fn invalid_transition_message_names_action_and_status() {
    let err = ServiceError::InvalidTransition {
        number: 3,
        status: ParcelStatus::Sent,
        action: ParcelAction::ChangeAddress,
    };
    assert_eq!(err.to_string(), "cannot change address for parcel 3 in status `sent`");
}
