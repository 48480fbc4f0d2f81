mod common;

use axum::http::StatusCode;
use campus_events::{domain::models::parking::SlotBooking, error::AppError};
use chrono::Utc;
use common::{call, TestApp};
use serde_json::{json, Value};
use tokio::task::JoinSet;

fn assert_consistent(slot: &Value) {
    let fields = ["booked_by", "event_id", "booking_date", "vehicle_number"];
    let booked = slot["is_booked"].as_bool().unwrap();
    for field in fields {
        assert_eq!(!slot[field].is_null(), booked, "field {} disagrees with is_booked in {}", field, slot);
    }
}

#[tokio::test]
async fn test_booking_scenario_with_host_cancel() {
    let app = TestApp::new().await;
    let host = app.host().await;
    let a = app.principal("Alice").await;
    let b = app.principal("Bob").await;

    let event = app.create_event(&a.auth, 20).await;
    let event_id = event["id"].as_str().unwrap();
    let slot = app.create_slot(&host, "P-001", "North Lot").await;
    assert_consistent(&slot);
    let slot_id = slot["id"].as_str().unwrap();

    let book_uri = format!("/api/parking/book/{}", slot_id);
    let (status, booked) = app.request("POST", &book_uri, Some(&a.auth),
        Some(json!({ "event_id": event_id, "vehicle_number": "XYZ1" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", booked);
    assert_eq!(booked["is_booked"], true);
    assert_eq!(booked["booked_by"], a.user.id.as_str());
    assert_eq!(booked["vehicle_number"], "XYZ1");
    assert_consistent(&booked);

    let (status, body) = app.request("POST", &book_uri, Some(&b.auth),
        Some(json!({ "event_id": event_id, "vehicle_number": "ABC9" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "ALREADY_RESERVED");

    let (status, body) = app.request("DELETE", &format!("/api/parking/cancel/{}", slot_id), Some(&host), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["slot"]["is_booked"], false);
    assert_consistent(&body["slot"]);

    let (_, available) = app.request("GET", "/api/parking/available", Some(&a.auth), None).await;
    assert_eq!(available.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_owner_release_and_foreign_release() {
    let app = TestApp::new().await;
    let host = app.host().await;
    let a = app.principal("Alice").await;
    let b = app.principal("Bob").await;

    let event = app.create_event(&a.auth, 20).await;
    let slot = app.create_slot(&host, "P-002", "South Lot").await;
    let slot_id = slot["id"].as_str().unwrap();
    let cancel_uri = format!("/api/parking/cancel/{}", slot_id);

    // Nothing booked yet.
    let (status, body) = app.request("DELETE", &cancel_uri, Some(&a.auth), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "NOT_RESERVED");

    app.request("POST", &format!("/api/parking/book/{}", slot_id), Some(&a.auth),
        Some(json!({ "event_id": event["id"], "vehicle_number": "KA01" }))).await;

    let (status, body) = app.request("DELETE", &cancel_uri, Some(&b.auth), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "UNAUTHORIZED");

    let (_, mine) = app.request("GET", "/api/parking/user", Some(&a.auth), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, body) = app.request("DELETE", &cancel_uri, Some(&a.auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_consistent(&body["slot"]);

    let (_, mine) = app.request("GET", "/api/parking/user", Some(&a.auth), None).await;
    assert!(mine.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_requires_existing_slot_event_and_fields() {
    let app = TestApp::new().await;
    let host = app.host().await;
    let a = app.principal("Alice").await;

    let event = app.create_event(&a.auth, 20).await;
    let slot = app.create_slot(&host, "P-003", "North Lot").await;
    let slot_uri = format!("/api/parking/book/{}", slot["id"].as_str().unwrap());

    let (status, body) = app.request("POST", "/api/parking/book/missing", Some(&a.auth),
        Some(json!({ "event_id": event["id"], "vehicle_number": "KA01" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NOT_FOUND");

    let (status, _) = app.request("POST", &slot_uri, Some(&a.auth),
        Some(json!({ "event_id": "no-such-event", "vehicle_number": "KA01" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request("POST", &slot_uri, Some(&a.auth),
        Some(json!({ "event_id": event["id"], "vehicle_number": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, current) = app.request("GET", "/api/parking", Some(&a.auth), None).await;
    assert_eq!(current[0]["is_booked"], false);
    assert_consistent(&current[0]);
}

#[tokio::test]
async fn test_concurrent_bookings_admit_exactly_one() {
    let app = TestApp::new().await;
    let host = app.host().await;
    let organizer = app.principal("Organizer").await;
    let event = app.create_event(&organizer.auth, 50).await;
    let event_id = event["id"].as_str().unwrap().to_string();
    let slot = app.create_slot(&host, "P-100", "East Lot").await;
    let slot_id = slot["id"].as_str().unwrap().to_string();

    let mut claimants = Vec::new();
    for i in 0..6 {
        claimants.push(app.principal(&format!("Driver {}", i)).await);
    }

    let mut set = JoinSet::new();
    for (i, claimant) in claimants.iter().enumerate() {
        let router = app.router.clone();
        let auth = claimant.auth.clone();
        let uri = format!("/api/parking/book/{}", slot_id);
        let body = json!({ "event_id": event_id, "vehicle_number": format!("CAR{}", i) });
        set.spawn(async move { call(router, "POST", &uri, Some(&auth), Some(body)).await });
    }

    let mut winners = Vec::new();
    let mut rejected = 0;
    while let Some(result) = set.join_next().await {
        let (status, body) = result.unwrap();
        match status {
            StatusCode::OK => winners.push(body),
            StatusCode::BAD_REQUEST if body["kind"] == "ALREADY_RESERVED" => rejected += 1,
            other => panic!("unexpected outcome {}: {}", other, body),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(rejected, 5);

    let (_, current) = app.request("GET", "/api/parking", Some(&organizer.auth), None).await;
    assert_eq!(current[0]["booked_by"], winners[0]["booked_by"]);
    assert_consistent(&current[0]);
}

#[tokio::test]
async fn test_event_with_parking_bookings_cannot_be_deleted() {
    let app = TestApp::new().await;
    let host = app.host().await;
    let a = app.principal("Alice").await;

    let event = app.create_event(&a.auth, 20).await;
    let event_uri = format!("/api/events/{}", event["id"].as_str().unwrap());
    let slot = app.create_slot(&host, "P-200", "West Lot").await;
    let slot_id = slot["id"].as_str().unwrap();

    app.request("POST", &format!("/api/parking/book/{}", slot_id), Some(&a.auth),
        Some(json!({ "event_id": event["id"], "vehicle_number": "KA01" }))).await;

    let (status, body) = app.request("DELETE", &event_uri, Some(&a.auth), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "CONFLICT");

    app.request("DELETE", &format!("/api/parking/cancel/{}", slot_id), Some(&a.auth), None).await;

    let (status, _) = app.request("DELETE", &event_uri, Some(&a.auth), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_reads_require_a_principal() {
    let app = TestApp::new().await;
    let host = app.host().await;
    let a = app.principal("Alice").await;

    let event = app.create_event(&a.auth, 20).await;
    let event_id = event["id"].as_str().unwrap();
    let slot = app.create_slot(&host, "P-9", "Gate Lot").await;
    app.request("POST", &format!("/api/parking/book/{}", slot["id"].as_str().unwrap()), Some(&a.auth),
        Some(json!({ "event_id": event_id, "vehicle_number": "KA-01-SECRET" }))).await;

    let event_uri = format!("/api/events/{}", event_id);
    let reads = [
        "/api/parking",
        "/api/parking/available",
        "/api/events",
        event_uri.as_str(),
        "/api/events/category/technical",
        "/api/events/date/2030-09-01",
        "/api/food/items",
        "/api/food/items/snacks",
    ];
    for uri in reads {
        let (status, body) = app.request("GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} answered {}", uri, body);
        assert_eq!(body["kind"], "UNAUTHORIZED");
    }

    let (status, current) = app.request("GET", "/api/parking", Some(&a.auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current[0]["vehicle_number"], "KA-01-SECRET");
}

#[tokio::test]
async fn test_booking_guard_sees_event_removed_underneath() {
    let app = TestApp::new().await;
    let host = app.host().await;
    let a = app.principal("Alice").await;

    let event = app.create_event(&a.auth, 20).await;
    let event_id = event["id"].as_str().unwrap().to_string();
    let slot = app.create_slot(&host, "P-300", "Old Lot").await;
    let slot_id = slot["id"].as_str().unwrap();

    // The event goes away after the client picked it but before the write.
    app.state.event_repo.delete(&event_id).await.unwrap();

    let booking = SlotBooking {
        event_id: event_id.clone(),
        vehicle_number: "KA01".to_string(),
        booked_at: Utc::now(),
    };
    let applied = app.state.parking_repo.book(slot_id, &a.user.id, &booking).await.unwrap();
    assert!(applied.is_none());

    let (status, body) = app.request("POST", &format!("/api/parking/book/{}", slot_id), Some(&a.auth),
        Some(json!({ "event_id": event_id, "vehicle_number": "KA01" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{}", body);
    assert_eq!(body["kind"], "NOT_FOUND");
    assert_eq!(body["error"], "Event not found");

    let current = app.state.parking_repo.find_by_id(slot_id).await.unwrap().unwrap();
    assert!(!current.is_booked);
    assert!(current.is_consistent());
}

#[tokio::test]
async fn test_event_delete_guard_sees_booking_landed_underneath() {
    let app = TestApp::new().await;
    let host = app.host().await;
    let a = app.principal("Alice").await;

    let event = app.create_event(&a.auth, 20).await;
    let event_id = event["id"].as_str().unwrap().to_string();
    let slot = app.create_slot(&host, "P-301", "Old Lot").await;
    let slot_id = slot["id"].as_str().unwrap();

    // A booking lands after the owner check but before the delete.
    let booking = SlotBooking {
        event_id: event_id.clone(),
        vehicle_number: "KA02".to_string(),
        booked_at: Utc::now(),
    };
    let booked = app.state.parking_repo.book(slot_id, &a.user.id, &booking).await.unwrap();
    assert!(booked.is_some());

    let outcome = app.state.event_repo.delete(&event_id).await;
    assert!(matches!(outcome, Err(AppError::Conflict(_))), "{:?}", outcome);
    assert!(app.state.event_repo.find_by_id(&event_id).await.unwrap().is_some());

    let outcome = app.state.event_repo.delete("no-such-event").await;
    assert!(matches!(outcome, Err(AppError::NotFound(_))), "{:?}", outcome);

    app.state.parking_repo.release(slot_id, None).await.unwrap();
    app.state.event_repo.delete(&event_id).await.unwrap();
    assert!(app.state.event_repo.find_by_id(&event_id).await.unwrap().is_none());
}
