use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use barbershop_gcal::handlers::GcalState;
use barbershop_gcal::routes::routes;
use chrono::Weekday;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use fixtures::{booking_body, create_test_config, next_weekday, InMemoryCalendar};

fn create_app() -> (Router, Arc<InMemoryCalendar>) {
    let calendar = Arc::new(InMemoryCalendar::default());
    let state = Arc::new(GcalState {
        config: create_test_config(),
        calendar: Some(calendar.clone()),
        notifier: None,
    });
    (routes(state), calendar)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post_booking(body: &Value) -> Request<Body> {
    Request::post("/criar-agendamento")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_booking_flow_removes_slot_from_listing() {
    let (app, calendar) = create_app();
    let friday = next_weekday(Weekday::Fri);
    let slots_uri = format!(
        "/horarios-disponiveis?hairdresser=brando&date={}",
        friday.format("%Y-%m-%d")
    );

    let (status, before) = send(app.clone(), Request::get(&slots_uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["slots"].as_array().unwrap().len(), 10);

    let (status, booked) = send(app.clone(), post_booking(&booking_body("Brando", friday, "17:00"))).await;
    assert_eq!(status, StatusCode::OK, "{booked}");
    assert!(booked["eventId"].as_str().is_some());
    assert!(booked["link"].as_str().is_some());

    let (_, after) = send(app.clone(), Request::get(&slots_uri).body(Body::empty()).unwrap()).await;
    let slots: Vec<&str> = after["slots"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(slots.len(), 9);
    assert!(!slots.contains(&"17:00"));

    let events = calendar.events();
    assert_eq!(events.len(), 1);
    let description = events[0].description.as_deref().unwrap();
    assert!(description.contains("Cabeleireiro: Brando"));
    assert!(description.ends_with("Extras: Barba"));
}

#[tokio::test]
async fn test_concurrent_bookings_of_one_slot_have_one_winner() {
    let (app, calendar) = create_app();
    let body = booking_body("julio", next_weekday(Weekday::Thu), "18:00");

    let first = tokio::spawn(send(app.clone(), post_booking(&body)));
    let second = tokio::spawn(send(app.clone(), post_booking(&body)));
    let (first, second) = (first.await.unwrap().0, second.await.unwrap().0);

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
    assert_eq!(calendar.events().len(), 1);
}

#[tokio::test]
async fn test_error_body_shape() {
    let (app, _) = create_app();
    let body = booking_body("julio", next_weekday(Weekday::Sun), "09:00");

    let (status, error) = send(app, post_booking(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], 400);
    assert!(error["error"]["message"].as_str().unwrap().contains("domingo"));
}

#[tokio::test]
async fn test_slot_of_a_deleted_booking_can_be_booked_again() {
    let (app, calendar) = create_app();
    let body = booking_body("julio", next_weekday(Weekday::Tue), "11:00");

    let (status, first) = send(app.clone(), post_booking(&body)).await;
    assert_eq!(status, StatusCode::OK, "{first}");
    let event_id = first["eventId"].as_str().unwrap().to_string();

    calendar.cancel(&event_id);
    let (status, second) = send(app.clone(), post_booking(&body)).await;
    assert_eq!(status, StatusCode::OK, "{second}");
    assert_eq!(second["eventId"], event_id.as_str());

    let (status, _) = send(app, post_booking(&body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(calendar.events().len(), 1);
}
