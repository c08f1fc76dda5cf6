//! Integration tests for the calendar service

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use calendar_service::auth::BcryptHasher;
use calendar_service::store::{
    connect_sqlite, ArrayEventStore, InMemoryUserStore, MapEventStore, SharedEventStore,
    SharedUserStore, SqlEventStore, SqlUserStore,
};
use calendar_service::utils::time::from_utc;
use calendar_service::{
    Calendar, CalendarError, EventInput, EventLifecycle, EventParams, EventQuery, EventStore,
    NewUser, UserStore,
};

async fn backends() -> Vec<(&'static str, SharedEventStore, SharedUserStore)> {
    let hasher = Arc::new(BcryptHasher::new(4));
    let pool = connect_sqlite("sqlite::memory:").await.unwrap();

    let array: SharedEventStore = Arc::new(ArrayEventStore::new());
    let map: SharedEventStore = Arc::new(MapEventStore::new());
    let sql: SharedEventStore = Arc::new(SqlEventStore::new(pool.clone()).await.unwrap());

    let array_users: SharedUserStore = Arc::new(InMemoryUserStore::new(hasher.clone()));
    let map_users: SharedUserStore = Arc::new(InMemoryUserStore::new(hasher.clone()));
    let sql_users: SharedUserStore = Arc::new(SqlUserStore::new(pool, hasher).await.unwrap());

    vec![
        ("array", array, array_users),
        ("map", map, map_users),
        ("sql", sql, sql_users),
    ]
}

fn standup() -> EventInput {
    EventInput::new("Standup", "2023-01-10T09:00:00Z", "2023-01-10T09:15:00Z")
}

#[tokio::test]
async fn test_add_assigns_first_id_and_keeps_utc_times() {
    for (backend, events, _) in backends().await {
        let lifecycle = EventLifecycle::new(events);
        let event = lifecycle.create("UTC", standup()).await.unwrap();

        assert_eq!(event.id, 1, "{}", backend);
        assert_eq!(event.start, Utc.with_ymd_and_hms(2023, 1, 10, 9, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2023, 1, 10, 9, 15, 0).unwrap());
    }
}

#[tokio::test]
async fn test_empty_name_is_rejected_without_side_effects() {
    for (backend, events, _) in backends().await {
        let lifecycle = EventLifecycle::new(events.clone());
        let input = EventInput::new("", "2023-01-10T09:00:00Z", "2023-01-10T09:15:00Z");

        let err = lifecycle.create("UTC", input).await.unwrap_err();
        assert!(matches!(err, CalendarError::MissingField { field: "name" }), "{}", backend);
        assert_eq!(events.last_used_id(), 0);
        assert!(events.get(&EventParams::all()).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_inverted_range_is_rejected() {
    for (backend, events, _) in backends().await {
        let lifecycle = EventLifecycle::new(events);
        let input = EventInput::new("Backwards", "2023-01-10T10:00:00Z", "2023-01-10T09:00:00Z");

        let err = lifecycle.create("UTC", input).await.unwrap_err();
        assert!(matches!(err, CalendarError::InvalidRange), "{}", backend);
    }
}

#[tokio::test]
async fn test_day_filter_selects_one_day() {
    for (backend, events, _) in backends().await {
        let lifecycle = EventLifecycle::new(events.clone());
        lifecycle.create("UTC", standup()).await.unwrap();
        lifecycle
            .create(
                "UTC",
                EventInput::new("Retro", "2023-01-11T09:00:00", "2023-01-11T10:00:00"),
            )
            .await
            .unwrap();

        let found = events
            .get(&EventParams { day: 10, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(found.len(), 1, "{}", backend);
        assert_eq!(found[0].name, "Standup");
    }
}

#[tokio::test]
async fn test_location_change_shifts_rendering_with_dst() {
    for (backend, events, users) in backends().await {
        users.add_user("alice", "secret", "UTC").await.unwrap();
        let calendar = Calendar::new(events, users.clone());

        let winter = calendar
            .create_event(
                "alice",
                EventInput::new("Winter", "2023-01-10T14:00:00", "2023-01-10T15:00:00"),
            )
            .await
            .unwrap();
        let summer = calendar
            .create_event(
                "alice",
                EventInput::new("Summer", "2023-07-10T13:00:00", "2023-07-10T14:00:00"),
            )
            .await
            .unwrap();

        users.update_location("alice", "America/New_York").await.unwrap();
        let credential = users.get_user("alice").await.unwrap();
        assert_eq!(credential.location, "America/New_York", "{}", backend);

        let winter = calendar.get_event("alice", winter.id).await.unwrap();
        let summer = calendar.get_event("alice", summer.id).await.unwrap();
        assert_eq!(winter.start.to_rfc3339(), "2023-01-10T09:00:00-05:00");
        assert_eq!(summer.start.to_rfc3339(), "2023-07-10T09:00:00-04:00");

        let instant = Utc.with_ymd_and_hms(2023, 7, 10, 13, 0, 0).unwrap();
        let direct = from_utc(instant, &credential.location).unwrap();
        assert_eq!(direct, summer.start);
    }
}

#[tokio::test]
async fn test_delete_missing_id_leaves_store_unchanged() {
    for (backend, events, _) in backends().await {
        let lifecycle = EventLifecycle::new(events.clone());
        lifecycle.create("UTC", standup()).await.unwrap();

        let err = lifecycle.delete(42).await.unwrap_err();
        assert!(matches!(err, CalendarError::NoMatch), "{}", backend);
        assert_eq!(events.get(&EventParams::all()).await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_query_engine_end_to_end() {
    for (backend, events, users) in backends().await {
        let calendar = Calendar::new(events, users);
        calendar
            .register(NewUser {
                username: "bob".into(),
                password: "hunter2".into(),
                location: "Europe/Berlin".into(),
            })
            .await
            .unwrap();

        for (name, start, end) in [
            ("Late", "2023-03-01T18:00:00", "2023-03-01T19:00:00"),
            ("Early", "2023-03-01T08:00:00", "2023-03-01T09:00:00"),
            ("Other month", "2023-04-01T08:00:00", "2023-04-01T09:00:00"),
        ] {
            calendar
                .create_event("bob", EventInput::new(name, start, end))
                .await
                .unwrap();
        }

        let query = EventQuery {
            month: Some("3".into()),
            sorting: Some("true".into()),
            ..Default::default()
        };
        let found = calendar.list_events("bob", &query).await.unwrap();
        let names: Vec<&str> = found.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Early", "Late"], "{}", backend);
        assert_eq!(found[0].start.to_rfc3339(), "2023-03-01T08:00:00+01:00");

        let exact = EventQuery {
            start: Some("2023-03-01T18:00:00".into()),
            ..Default::default()
        };
        let found = calendar.list_events("bob", &exact).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Late");

        let bad = EventQuery { week: Some("-3".into()), ..Default::default() };
        assert!(matches!(
            calendar.list_events("bob", &bad).await,
            Err(CalendarError::InvalidParams(_))
        ));
    }
}

#[tokio::test]
async fn test_user_stores_agree_on_credentials() {
    for (backend, _, users) in backends().await {
        users.add_user("alice", "secret", "Asia/Tokyo").await.unwrap();

        assert!(users.check_credentials("alice", "secret").await.is_ok(), "{}", backend);
        let wrong = users.check_credentials("alice", "nope").await.unwrap_err();
        let unknown = users.check_credentials("eve", "secret").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());

        assert!(matches!(
            users.add_user("alice", "again", "UTC").await,
            Err(CalendarError::Duplicate(_))
        ));
        assert!(matches!(
            users.add_user("", "pw", "UTC").await,
            Err(CalendarError::MissingField { field: "username" })
        ));
        assert!(matches!(
            users.add_user("zed", "", "UTC").await,
            Err(CalendarError::MissingField { field: "password" })
        ));
        assert!(matches!(
            users.add_user("zed", "pw", "Mars/Base").await,
            Err(CalendarError::UnknownTimezone(_))
        ));

        users.clear_repo_data().await.unwrap();
        assert!(matches!(users.get_user("alice").await, Err(CalendarError::NoMatch)));
    }
}
