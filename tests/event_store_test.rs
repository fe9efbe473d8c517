//! Event store integration tests
//!
//! Covers the published-event semantics on their own: forced `planned`
//! status, whitelist sync with explicit NULL coalescing, the soft
//! request link, and the standalone remove cascade.

mod helpers;

use serial_test::serial;
use EventBoard::database::DatabaseService;
use EventBoard::models::event::{CreateEventData, EventFields, EventFormat, EventStatus};
use EventBoard::services::ServiceFactory;

use helpers::test_data::{date, request_data, time};
use helpers::TestDatabase;

fn services(db: &TestDatabase) -> ServiceFactory {
    ServiceFactory::new(DatabaseService::new(db.pool.clone()))
}

#[tokio::test]
#[serial]
async fn test_created_event_is_always_planned() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    // Admin-authored event with no request behind it
    let fields = EventFields {
        title: "Open day".to_string(),
        date_start: date("2024-06-01"),
        date_end: date("2024-06-01"),
        time_start: time("10:00"),
        time_end: time("12:00"),
        place: "Main hall".to_string(),
        format: EventFormat::Open,
        department_id: None,
        department_ids: None,
        labels: None,
        limit_participants: None,
        description: "University open day".to_string(),
        post_link: None,
        reg_link: None,
        responsible_link: None,
        repeat: None,
    };
    let event = services
        .event_service
        .create(&CreateEventData {
            fields,
            request_id: None,
        })
        .await
        .unwrap();

    assert_eq!(event.status, EventStatus::Planned);
    assert_eq!(event.request_id, None);
}

#[tokio::test]
#[serial]
async fn test_update_from_request_coalesces_nullables() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    let mut data = request_data(1, "2024-06-01", "10:00", "12:00");
    data.post_link = Some("https://example.org/post".to_string());
    data.limit_participants = Some(30);
    let created = services.request_service.create(data, true).await.unwrap();
    let event_id = created.request.event_id.unwrap();

    // Sync with a snapshot that dropped the nullable fields
    let mut fields = created.request.event_fields();
    fields.title = "Renamed".to_string();
    fields.post_link = None;
    fields.limit_participants = None;
    let event = services
        .event_service
        .update_from_request(event_id, &fields)
        .await
        .unwrap();

    assert_eq!(event.title, "Renamed");
    assert_eq!(event.post_link, None);
    assert_eq!(event.limit_participants, None);
}

#[tokio::test]
#[serial]
async fn test_check_time_conflict() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    let created = services
        .request_service
        .create(request_data(1, "2024-06-01", "10:00", "12:00"), true)
        .await
        .unwrap();
    let event_id = created.request.event_id.unwrap();

    let conflict = services
        .event_service
        .check_time_conflict(
            date("2024-06-01"),
            date("2024-06-01"),
            time("11:00"),
            time("13:00"),
            None,
        )
        .await
        .unwrap();
    assert!(conflict);

    // Excluding the only overlapping event clears the flag
    let conflict = services
        .event_service
        .check_time_conflict(
            date("2024-06-01"),
            date("2024-06-01"),
            time("11:00"),
            time("13:00"),
            Some(event_id),
        )
        .await
        .unwrap();
    assert!(!conflict);
}

#[tokio::test]
#[serial]
async fn test_cleared_link_lets_event_outlive_nothing_else() {
    let Some(db) = TestDatabase::new().await else { return };
    db.reset().await.unwrap();
    let services = services(&db);

    let created = services
        .request_service
        .create(request_data(1, "2024-06-01", "10:00", "12:00"), true)
        .await
        .unwrap();
    let request_id = created.request.id;
    let event_id = created.request.event_id.unwrap();

    services.event_service.clear_request_link(event_id).await.unwrap();
    let event = services.event_service.find_one(event_id).await.unwrap().unwrap();
    assert_eq!(event.event.request_id, None);

    // The link is soft: the request still carries its side until deleted
    let view = services.request_service.find_one(request_id).await.unwrap().unwrap();
    assert_eq!(view.request.event_id, Some(event_id));

    // Standalone removal takes dependents with it
    services.subscription_service.subscribe(9, event_id).await.unwrap();
    services.event_service.remove(event_id).await.unwrap();
    assert!(services.event_service.find_one(event_id).await.unwrap().is_none());
    let (subs,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscriptions WHERE event_id = $1")
        .bind(event_id)
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(subs, 0);
}
