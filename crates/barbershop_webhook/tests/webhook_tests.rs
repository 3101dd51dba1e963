use barbershop_common::services::{BookingNotice, NotificationService};
use barbershop_webhook::{WebhookError, WebhookNotifier};
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notice() -> BookingNotice {
    BookingNotice {
        first_name: "Rui".to_string(),
        last_name: "Silva".to_string(),
        date: "2026-10-19".to_string(),
        time: "09:00".to_string(),
        email: "rui@example.com".to_string(),
        phone_number: "+351912345678".to_string(),
        haircut_type: "Degradê".to_string(),
        hairdresser: "Júlio".to_string(),
        extras: None,
        event_id: Some("6a756c696f202610190900".to_string()),
        timestamp: Utc.with_ymd_and_hms(2026, 10, 14, 6, 0, 0).unwrap(),
        source: "barbershop-backend".to_string(),
    }
}

#[tokio::test]
async fn test_notice_is_posted_as_camel_case_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/booking"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "firstName": "Rui",
            "phoneNumber": "+351912345678",
            "haircutType": "Degradê",
            "hairdresser": "Júlio",
            "eventId": "6a756c696f202610190900",
            "source": "barbershop-backend"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(format!("{}/booking", server.uri()));
    let result = notifier.send_booking_notice(&notice()).await.unwrap();

    assert_eq!(result.id, "6a756c696f202610190900");
    assert_eq!(result.status, "200");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(server.uri());
    let err = notifier.send_booking_notice(&notice()).await.unwrap_err();

    match err {
        WebhookError::ApiError {
            status_code,
            message,
        } => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_receiver_is_a_request_error() {
    // nothing listens on the discard port
    let notifier = WebhookNotifier::new("http://127.0.0.1:9/booking");
    let err = notifier.send_booking_notice(&notice()).await.unwrap_err();
    assert!(matches!(err, WebhookError::RequestError(_)));
}
