//! Conflict detection integration tests
//!
//! Covers the submission-time conflict scenarios: overlapping windows
//! flag a conflict, back-to-back windows do not, a request's own event is
//! excluded from its preview, and only planned events participate.

mod helpers;

use serial_test::serial;
use EventBoard::database::DatabaseService;
use EventBoard::services::ServiceFactory;

use helpers::test_data::{date, multi_day_request_data, request_data, time};
use helpers::TestDatabase;

fn services(db: &TestDatabase) -> ServiceFactory {
    ServiceFactory::new(DatabaseService::new(db.pool.clone()))
}

#[tokio::test]
#[serial]
async fn test_overlapping_request_is_flagged() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    // Request A approved and materialized as an event
    let a = services
        .request_service
        .create(request_data(1, "2024-06-01", "10:00", "12:00"), true)
        .await
        .unwrap();
    let event_a_id = a.request.event_id.unwrap();

    // Request B overlaps A by an hour
    let b = services
        .request_service
        .create(request_data(2, "2024-06-01", "11:00", "13:00"), false)
        .await
        .unwrap();

    assert!(b.request.has_conflict);
    assert_eq!(b.conflicting_events.len(), 1);
    assert_eq!(b.conflicting_events[0].id, event_a_id);
    assert_eq!(b.conflicting_events[0].time_start, "10:00");
}

#[tokio::test]
#[serial]
async fn test_back_to_back_request_is_not_flagged() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    services
        .request_service
        .create(request_data(1, "2024-06-01", "10:00", "12:00"), true)
        .await
        .unwrap();

    // Request C starts exactly when A ends
    let c = services
        .request_service
        .create(request_data(2, "2024-06-01", "12:00", "13:00"), false)
        .await
        .unwrap();

    assert!(!c.request.has_conflict);
    assert!(c.conflicting_events.is_empty());
}

#[tokio::test]
#[serial]
async fn test_own_event_excluded_from_preview() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    let a = services
        .request_service
        .create(request_data(1, "2024-06-01", "10:00", "12:00"), true)
        .await
        .unwrap();

    // Previewing A's own window with its request id excludes its event
    let conflicts = services
        .request_service
        .get_conflicting_events(
            date("2024-06-01"),
            date("2024-06-01"),
            time("10:00"),
            time("12:00"),
            Some(a.request.id),
        )
        .await
        .unwrap();
    assert!(conflicts.is_empty());

    // Without the exclusion the event shows up
    let conflicts = services
        .request_service
        .get_conflicting_events(
            date("2024-06-01"),
            date("2024-06-01"),
            time("10:00"),
            time("12:00"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(conflicts.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_non_planned_events_do_not_conflict() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    let a = services
        .request_service
        .create(request_data(1, "2024-06-01", "10:00", "12:00"), true)
        .await
        .unwrap();
    let event_id = a.request.event_id.unwrap();

    sqlx::query("UPDATE events SET status = 'completed' WHERE id = $1")
        .bind(event_id)
        .execute(&db.pool)
        .await
        .unwrap();

    let b = services
        .request_service
        .create(request_data(2, "2024-06-01", "11:00", "13:00"), false)
        .await
        .unwrap();
    assert!(!b.request.has_conflict);
}

#[tokio::test]
#[serial]
async fn test_canceled_events_hidden_from_calendar() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    let a = services
        .request_service
        .create(request_data(1, "2024-06-01", "10:00", "12:00"), true)
        .await
        .unwrap();
    let event_id = a.request.event_id.unwrap();

    let listed = services.event_service.find_all(None, None).await.unwrap();
    assert_eq!(listed.len(), 1);

    sqlx::query("UPDATE events SET status = 'canceled' WHERE id = $1")
        .bind(event_id)
        .execute(&db.pool)
        .await
        .unwrap();

    let listed = services.event_service.find_all(None, None).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
#[serial]
async fn test_calendar_window_uses_full_overlap() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    // Event spanning the 1st through the 10th
    services
        .request_service
        .create(
            multi_day_request_data(1, "2024-06-01", "2024-06-10", "10:00", "12:00"),
            true,
        )
        .await
        .unwrap();

    // A window strictly inside the event's range still lists it
    let listed = services
        .event_service
        .find_all(Some(date("2024-06-04")), Some(date("2024-06-05")))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_conflict_prefilter_misses_fully_spanning_event() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    // Event spanning the 1st through the 10th, materialized as planned
    services
        .request_service
        .create(
            multi_day_request_data(1, "2024-06-01", "2024-06-10", "10:00", "12:00"),
            true,
        )
        .await
        .unwrap();

    // The conflict prefilter only matches range endpoints inside the probe
    // window, so a probe strictly inside the event's range sees nothing.
    let b = services
        .request_service
        .create(request_data(2, "2024-06-04", "10:00", "12:00"), false)
        .await
        .unwrap();
    assert!(!b.request.has_conflict);

    // A probe containing an endpoint does see it
    let c = services
        .request_service
        .create(request_data(3, "2024-06-10", "10:00", "12:00"), false)
        .await
        .unwrap();
    assert!(c.request.has_conflict);
}
