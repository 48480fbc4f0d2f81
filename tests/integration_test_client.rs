mod common;

use campus_events::client::{CampusClient, ClientError, EventDraft, OrderItem};
use campus_events::domain::models::{event::EventCategory, user::PrincipalRole};
use chrono::NaiveDate;
use common::TestApp;
use serde_json::json;

async fn serve(app: &TestApp) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn draft(capacity: i32) -> EventDraft {
    EventDraft {
        title: "Hack Night".into(),
        description: "Build something".into(),
        category: EventCategory::Technical,
        subcategory: "hackathon".into(),
        date: NaiveDate::from_ymd_opt(2030, 9, 1).unwrap(),
        time: "18:30".into(),
        location: "Innovation Lab".into(),
        price: 0.0,
        capacity,
        skills: vec!["rust".into()],
    }
}

#[tokio::test]
async fn test_client_event_flow_against_live_server() {
    let app = TestApp::new().await;
    let base_url = serve(&app).await;

    let mut organizer = CampusClient::new(&base_url).unwrap();
    organizer.register("Org", "org@campus.edu", "org-pass-1", PrincipalRole::Faculty, "FAC-1").await.unwrap();
    let mut student = CampusClient::new(&base_url).unwrap();
    let auth = student.register("Stu", "stu@campus.edu", "stu-pass-1", PrincipalRole::Student, "STU-1").await.unwrap();
    assert!(student.token().is_some());
    assert_eq!(auth.user.college_id, "STU-1");

    let event = organizer.create_event(&draft(1)).await.unwrap();
    assert_eq!(organizer.hosted_events().await.unwrap().len(), 1);

    let registration = student.register_for_event(&event.id).await.unwrap();
    assert_eq!(registration.event.attendees, vec![auth.user.id.clone()]);
    assert_eq!(registration.user.registered_event_ids, vec![event.id.clone()]);

    let err = organizer.register_for_event(&event.id).await.unwrap_err();
    match err {
        ClientError::Api { status, kind, message } => {
            assert_eq!(status, 400);
            assert_eq!(kind, "AT_CAPACITY");
            assert_eq!(message, "Event is at full capacity");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert_eq!(student.registered_events().await.unwrap().len(), 1);
    assert_eq!(student.me().await.unwrap().registered_event_ids, vec![event.id.clone()]);

    let on_day = student.events_on(NaiveDate::from_ymd_opt(2030, 9, 1).unwrap()).await.unwrap();
    assert_eq!(on_day.len(), 1);
    assert!(student.events_by_category(EventCategory::NonTechnical).await.unwrap().is_empty());

    student.cancel_registration(&event.id).await.unwrap();
    let err = student.cancel_registration(&event.id).await.unwrap_err();
    assert_eq!(err.kind(), Some("NOT_RESERVED"));

    assert!(student.get_event(&event.id).await.unwrap().attendees.is_empty());
    assert_eq!(student.list_events().await.unwrap().len(), 1);

    let verified = student.verify_id("STU-1").await.unwrap();
    assert!(verified.registered);

    let user = student.update_skills(&["go".to_string()]).await.unwrap();
    assert_eq!(user.skills.0, vec!["go".to_string()]);

    let mut anonymous = CampusClient::new(&base_url).unwrap();
    assert!(matches!(anonymous.login("stu@campus.edu", "nope").await, Err(ClientError::Api { status: 401, .. })));
    anonymous.login("stu@campus.edu", "stu-pass-1").await.unwrap();
    assert_eq!(anonymous.me().await.unwrap().email, "stu@campus.edu");
}

#[tokio::test]
async fn test_client_parking_and_food_flow() {
    let app = TestApp::new().await;
    let host = app.host().await;
    let organizer = app.principal("Organizer").await;
    let event = app.create_event(&organizer.auth, 10).await;
    let slot = app.create_slot(&host, "C-01", "Block C").await;
    let (_, item) = app.request("POST", "/api/host/food/items", Some(&host), Some(json!({
        "name": "Idli", "price": 2.0, "category": "meals"
    }))).await;

    let base_url = serve(&app).await;
    let mut client = CampusClient::new(&base_url).unwrap();
    client.register("Driver", "driver@campus.edu", "drive-pass", PrincipalRole::Other, "OTH-9").await.unwrap();

    assert_eq!(client.available_parking().await.unwrap().len(), 1);
    let booked = client.book_parking(slot["id"].as_str().unwrap(), event["id"].as_str().unwrap(), "TN09").await.unwrap();
    assert!(booked.is_booked);
    assert!(booked.is_consistent());
    assert_eq!(client.my_parking().await.unwrap().len(), 1);
    assert!(client.available_parking().await.unwrap().is_empty());

    let released = client.cancel_parking(&booked.id).await.unwrap();
    assert!(!released.slot.is_booked);
    assert_eq!(client.parking_slots().await.unwrap().len(), 1);

    let menu = client.food_menu().await.unwrap();
    assert_eq!(menu.len(), 1);
    assert_eq!(client.food_menu_for(campus_events::domain::models::food::FoodCategory::Meals).await.unwrap().len(), 1);

    let order = client.place_order(
        &[OrderItem { item_id: item["id"].as_str().unwrap().to_string(), quantity: 3 }],
        Some(event["id"].as_str().unwrap()),
        "Block C",
    ).await.unwrap();
    assert!((order.total - 6.0).abs() < 1e-9);
    assert_eq!(client.order_history().await.unwrap().len(), 1);

    let cancelled = client.cancel_order(&order.id).await.unwrap();
    assert_eq!(cancelled.status, "cancelled");
}
