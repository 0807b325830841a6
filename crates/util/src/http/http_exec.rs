//! HTTP execution helpers shared by the engine and the CLI.
//!
//! Every console request funnels through [`send_request`], which issues
//! exactly one call through the session-aware [`ConsoleClient`] and classifies
//! the result into a [`DispatchOutcome`]. Nothing here retries.

use hllrcon_api::ConsoleClient;
use hllrcon_types::{DispatchOutcome, HttpMethod, OutboundRequest};
use reqwest::Method;
use tracing::{debug, warn};

use crate::redact_sensitive;

pub fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Issue one request and classify the result.
///
/// - 2xx → [`DispatchOutcome::Success`] with the raw body
/// - other statuses → [`DispatchOutcome::HttpError`] with status and raw body
/// - no response (refused, DNS, timeout, body read failure) →
///   [`DispatchOutcome::TransportError`]
pub async fn send_request(client: &ConsoleClient, request: &OutboundRequest) -> DispatchOutcome {
    let mut builder = client.request(to_reqwest_method(request.method), &request.path);
    if let Some(body) = request.body.as_ref() {
        // `.json` sets `Content-Type: application/json`
        builder = builder.json(body);
    }

    let response = match builder.send().await {
        Ok(response) => response,
        Err(error) => {
            let message = describe_transport_error(&error);
            warn!(method = %request.method, path = %request.path, error = %redact_sensitive(&message), "request failed");
            return DispatchOutcome::TransportError { message };
        }
    };

    let status = response.status().as_u16();
    match response.text().await {
        Ok(text) => {
            debug!(method = %request.method, path = %request.path, status, bytes = text.len(), "response received");
            DispatchOutcome::from_status(status, text)
        }
        Err(error) => DispatchOutcome::TransportError {
            message: format!("failed to read response body: {}", describe_transport_error(&error)),
        },
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("could not connect to API: {error}")
    } else {
        format!("network error: {error}")
    }
}
