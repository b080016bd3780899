// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway abstraction for the attendance server.
//!
//! Provides a trait-based gateway layer that enables:
//! - Real HTTP calls against the server's REST API for production
//! - Mock gateways for unit testing
//!
//! The server wraps every payload in a `{success, count, data}` envelope
//! and reports failures as `{success: false, error}`.

use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use rollcall_core::{Event, EventStatus, Person};

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The server could not be reached (connect, DNS, timeout).
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The server answered with a non-success status.
    #[error("server rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Outcome of an attendance submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server recorded the mark.
    Recorded,
    /// The server already had the mark and treated the submission as a no-op.
    AlreadyRecorded,
}

/// Gateway trait for the attendance server.
///
/// This trait abstracts over the actual server communication, allowing
/// for easy testing with mock implementations.
pub trait RemoteGateway: Send + Sync {
    /// Fetch the authoritative event list.
    fn list_events(&self) -> Pin<Box<dyn Future<Output = GatewayResult<Vec<Event>>> + Send + '_>>;

    /// Fetch the persons registered for an event.
    fn list_persons(
        &self,
        event_id: &str,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<Vec<Person>>> + Send + '_>>;

    /// Submit one attendance mark.
    ///
    /// A submission the server has already seen is accepted as a no-op, so
    /// replaying queued items after a crash is safe.
    fn submit_attendance(
        &self,
        event_id: &str,
        person_id: &str,
        recorded_at: DateTime<Utc>,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<SubmitOutcome>> + Send + '_>>;

    /// Cheap reachability check against the server root.
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Success/failure envelope the server wraps every response in.
///
/// Failure bodies carry the reason under `error`; some deployments use
/// `message` instead.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    data: Option<T>,
    #[serde(default, alias = "message")]
    error: Option<String>,
}

/// Event record as the server serializes it.
///
/// The server emits the identifier as `id`, `_id`, or both depending on
/// whether the document's virtuals are enabled, so both keys are read and
/// merged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDto {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    raw_id: Option<String>,
    name: String,
    #[serde(default)]
    description: String,
    date: DateTime<Utc>,
    #[serde(default)]
    status: Option<String>,
}

impl EventDto {
    fn into_event(self) -> GatewayResult<Event> {
        let id = self
            .id
            .or(self.raw_id)
            .ok_or_else(|| GatewayError::InvalidResponse("event without an id".to_string()))?;
        let status = match self.status.as_deref() {
            Some(s) => EventStatus::from_str(s)
                .map_err(|_| GatewayError::InvalidResponse(format!("unknown event status '{s}'")))?,
            None => EventStatus::Open,
        };
        Ok(Event {
            id,
            name: self.name,
            description: self.description,
            date: self.date,
            status,
        })
    }
}

/// Person record as the server serializes it.
///
/// The roster endpoint is scoped to one event, so the registration is
/// filled in from the requested event id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonDto {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    raw_id: Option<String>,
    name: String,
    credential_number: String,
    dni: String,
    email: String,
}

impl PersonDto {
    fn into_person(self, event_id: &str) -> GatewayResult<Person> {
        let id = self
            .id
            .or(self.raw_id)
            .ok_or_else(|| GatewayError::InvalidResponse("person without an id".to_string()))?;
        Ok(Person {
            id,
            name: self.name,
            credential_number: self.credential_number,
            dni: self.dni,
            email: self.email,
            event_id: event_id.to_string(),
        })
    }
}

/// Attendance submission body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBody<'a> {
    event_id: &'a str,
    person_id: &'a str,
    timestamp: DateTime<Utc>,
}

/// Pull the human-readable failure message out of an error body.
fn extract_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// Decode a `{success, data}` envelope, mapping non-success statuses to
/// [`GatewayError::Rejected`].
fn decode_envelope<T: DeserializeOwned + Default>(status: StatusCode, body: &str) -> GatewayResult<T> {
    if !status.is_success() {
        return Err(GatewayError::Rejected {
            status: status.as_u16(),
            message: extract_message(body, status),
        });
    }
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
    envelope
        .data
        .ok_or_else(|| GatewayError::InvalidResponse("missing data field".to_string()))
}

/// Decode a submission response.
///
/// The server answers a duplicate submission with HTTP 400; that (and a
/// 409 from servers that prefer it) collapses into success so drains can
/// replay items that were already delivered.
fn decode_submit(status: StatusCode, body: &str) -> GatewayResult<SubmitOutcome> {
    if status.is_success() {
        return Ok(SubmitOutcome::Recorded);
    }
    if status == StatusCode::BAD_REQUEST || status == StatusCode::CONFLICT {
        return Ok(SubmitOutcome::AlreadyRecorded);
    }
    Err(GatewayError::Rejected {
        status: status.as_u16(),
        message: extract_message(body, status),
    })
}

/// HTTP gateway implementation using reqwest.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpGateway {
    /// Create a gateway for the given server base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        HttpGateway {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn get_body(&self, url: String) -> GatewayResult<(StatusCode, String)> {
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
        Ok((status, body))
    }
}

impl RemoteGateway for HttpGateway {
    fn list_events(&self) -> Pin<Box<dyn Future<Output = GatewayResult<Vec<Event>>> + Send + '_>> {
        Box::pin(async move {
            let url = format!("{}/api/events", self.base_url);
            let (status, body) = self.get_body(url).await?;
            let dtos: Vec<EventDto> = decode_envelope(status, &body)?;
            dtos.into_iter().map(EventDto::into_event).collect()
        })
    }

    fn list_persons(
        &self,
        event_id: &str,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<Vec<Person>>> + Send + '_>> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            let url = format!("{}/api/events/{}/persons", self.base_url, event_id);
            let (status, body) = self.get_body(url).await?;
            let dtos: Vec<PersonDto> = decode_envelope(status, &body)?;
            dtos.into_iter()
                .map(|dto| dto.into_person(&event_id))
                .collect()
        })
    }

    fn submit_attendance(
        &self,
        event_id: &str,
        person_id: &str,
        recorded_at: DateTime<Utc>,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<SubmitOutcome>> + Send + '_>> {
        let event_id = event_id.to_string();
        let person_id = person_id.to_string();
        Box::pin(async move {
            let url = format!("{}/api/attendance", self.base_url);
            let response = self
                .client
                .post(&url)
                .timeout(self.timeout)
                .json(&SubmitBody {
                    event_id: &event_id,
                    person_id: &person_id,
                    timestamp: recorded_at,
                })
                .send()
                .await
                .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| GatewayError::Unreachable(e.to_string()))?;
            decode_submit(status, &body)
        })
    }

    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            // Any HTTP answer means the server is reachable, even an error
            // status; only a transport failure counts as offline.
            let url = format!("{}/", self.base_url);
            self.client
                .get(&url)
                .timeout(self.timeout)
                .send()
                .await
                .is_ok()
        })
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
