// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

fn ok() -> StatusCode {
    StatusCode::OK
}

#[test]
fn test_decode_events_envelope() {
    let body = r#"{
        "success": true,
        "count": 2,
        "data": [
            {
                "id": "ev-1",
                "name": "Rust Meetup",
                "description": "Monthly meetup",
                "date": "2026-03-01T18:00:00.000Z",
                "status": "open"
            },
            {
                "id": "ev-2",
                "name": "Closing Gala",
                "date": "2026-04-01T20:00:00.000Z",
                "status": "closed"
            }
        ]
    }"#;

    let dtos: Vec<EventDto> = decode_envelope(ok(), body).unwrap();
    let events: Vec<_> = dtos
        .into_iter()
        .map(|dto| dto.into_event().unwrap())
        .collect();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "ev-1");
    assert_eq!(events[0].name, "Rust Meetup");
    assert_eq!(events[0].status, EventStatus::Open);
    assert_eq!(events[1].status, EventStatus::Closed);
    assert_eq!(events[1].description, "");
}

#[test]
fn test_decode_event_defaults_status_to_open() {
    let body = r#"{"success": true, "count": 1, "data": [
        {"id": "ev-1", "name": "X", "date": "2026-03-01T18:00:00Z"}
    ]}"#;

    let dtos: Vec<EventDto> = decode_envelope(ok(), body).unwrap();
    let event = dtos.into_iter().next().unwrap().into_event().unwrap();
    assert_eq!(event.status, EventStatus::Open);
}

#[test]
fn test_decode_event_rejects_unknown_status() {
    let dto = EventDto {
        id: Some("ev-1".to_string()),
        raw_id: None,
        name: "X".to_string(),
        description: String::new(),
        date: Utc::now(),
        status: Some("cancelled".to_string()),
    };
    let result = dto.into_event();
    assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
}

#[test]
fn test_decode_event_accepts_raw_object_id() {
    // Documents without the id virtual only carry _id.
    let body = r#"{"success": true, "count": 1, "data": [
        {"_id": "681ce5e5dd7617f1eaaf5455", "name": "X", "date": "2026-03-01T18:00:00Z"}
    ]}"#;

    let dtos: Vec<EventDto> = decode_envelope(ok(), body).unwrap();
    let event = dtos.into_iter().next().unwrap().into_event().unwrap();
    assert_eq!(event.id, "681ce5e5dd7617f1eaaf5455");
}

#[test]
fn test_decode_event_with_both_id_keys_prefers_id() {
    let body = r#"{"success": true, "count": 1, "data": [
        {"_id": "raw", "id": "ev-1", "name": "X", "date": "2026-03-01T18:00:00Z"}
    ]}"#;

    let dtos: Vec<EventDto> = decode_envelope(ok(), body).unwrap();
    let event = dtos.into_iter().next().unwrap().into_event().unwrap();
    assert_eq!(event.id, "ev-1");
}

#[test]
fn test_decode_event_without_any_id_fails() {
    let dto = EventDto {
        id: None,
        raw_id: None,
        name: "X".to_string(),
        description: String::new(),
        date: Utc::now(),
        status: None,
    };
    assert!(matches!(dto.into_event(), Err(GatewayError::InvalidResponse(_))));
}

#[test]
fn test_decode_persons_fills_event_id() {
    let body = r#"{"success": true, "count": 1, "data": [
        {
            "_id": "p-1",
            "name": "Ada Lovelace",
            "credentialNumber": "C-001",
            "dni": "12345678",
            "email": "ada@example.com"
        }
    ]}"#;

    let dtos: Vec<PersonDto> = decode_envelope(ok(), body).unwrap();
    let person = dtos.into_iter().next().unwrap().into_person("ev-7").unwrap();

    assert_eq!(person.id, "p-1");
    assert_eq!(person.credential_number, "C-001");
    assert_eq!(person.dni, "12345678");
    assert_eq!(person.event_id, "ev-7");
}

#[test]
fn test_decode_error_envelope_uses_server_reason() {
    let body = r#"{"success": false, "error": "Evento no encontrado"}"#;
    let result: GatewayResult<Vec<EventDto>> = decode_envelope(StatusCode::NOT_FOUND, body);

    match result {
        Err(GatewayError::Rejected { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Evento no encontrado");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn test_decode_error_accepts_message_field_alias() {
    let body = r#"{"success": false, "message": "not today"}"#;
    let result: GatewayResult<Vec<EventDto>> = decode_envelope(StatusCode::BAD_GATEWAY, body);

    match result {
        Err(GatewayError::Rejected { message, .. }) => assert_eq!(message, "not today"),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn test_decode_error_without_message_falls_back_to_status() {
    let result: GatewayResult<Vec<EventDto>> =
        decode_envelope(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");

    match result {
        Err(GatewayError::Rejected { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("500"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn test_decode_invalid_json_body() {
    let result: GatewayResult<Vec<EventDto>> = decode_envelope(ok(), "not json");
    assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
}

#[test]
fn test_decode_missing_data_field() {
    let result: GatewayResult<Vec<EventDto>> = decode_envelope(ok(), r#"{"success": true}"#);
    assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
}

// The server reports an already-registered pair with HTTP 400.
#[parameterized(
    created = { 201, r#"{"success": true, "data": {"eventId": "ev-1", "personId": "p-1"}}"#, SubmitOutcome::Recorded },
    ok_without_data = { 200, r#"{"success": true}"#, SubmitOutcome::Recorded },
    duplicate_bad_request = { 400, r#"{"success": false, "error": "La asistencia ya ha sido registrada"}"#, SubmitOutcome::AlreadyRecorded },
    conflict = { 409, "{}", SubmitOutcome::AlreadyRecorded },
)]
fn test_decode_submit_outcome(code: u16, body: &str, expected: SubmitOutcome) {
    let status = StatusCode::from_u16(code).unwrap();
    assert_eq!(decode_submit(status, body).unwrap(), expected);
}

#[test]
fn test_decode_submit_not_found_fails() {
    let body = r#"{"success": false, "error": "Persona no encontrada"}"#;
    let result = decode_submit(StatusCode::NOT_FOUND, body);

    match result {
        Err(GatewayError::Rejected { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("Persona"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[test]
fn test_decode_submit_server_error_fails() {
    let result = decode_submit(StatusCode::INTERNAL_SERVER_ERROR, "");
    assert!(matches!(result, Err(GatewayError::Rejected { status: 500, .. })));
}

#[test]
fn test_submit_body_serializes_camel_case() {
    let body = SubmitBody {
        event_id: "ev-1",
        person_id: "p-1",
        timestamp: "2026-03-01T18:30:00Z".parse::<DateTime<Utc>>().unwrap(),
    };
    let json = serde_json::to_string(&body).unwrap();
    assert!(json.contains("\"eventId\":\"ev-1\""));
    assert!(json.contains("\"personId\":\"p-1\""));
    assert!(json.contains("\"timestamp\""));
}

#[test]
fn test_http_gateway_trims_trailing_slash() {
    let gateway = HttpGateway::new("http://localhost:4000/", Duration::from_secs(5));
    assert_eq!(gateway.base_url, "http://localhost:4000");
}
