use crate::output::ScanResponse;
use crate::scanner::ScanRequest;
use crate::server::errors::ApiError;
use crate::server::AppState;
use crate::RequestError;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Raw `POST /scan` body
///
/// Fields stay untyped so that a wrongly-typed value can be reported with a message
/// naming the field, and so that explicit `null` reads the same as an absent field.
#[derive(Debug, Default, Deserialize)]
struct ScanPayload {
    #[serde(default)]
    urls: Option<Value>,
    #[serde(default)]
    concurrency: Option<Value>,
    #[serde(default)]
    timeout: Option<Value>,
    #[serde(default)]
    user_agent: Option<Value>,
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Use POST /scan with a JSON body."
    }))
}

pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

/// Scans every URL of the batch and returns the per-URL results in submitted order
///
/// Failing URLs never fail the batch; only a malformed body is answered with 400.
pub async fn scan(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ScanResponse>, ApiError> {
    let request = parse_scan_request(&body, &state)?;

    tracing::debug!(
        "Accepted batch of {} URLs (concurrency {}, timeout {:?})",
        request.urls().len(),
        request.concurrency(),
        request.timeout()
    );

    let report = state.orchestrator.run_report(&request).await;
    Ok(Json(ScanResponse::from(report)))
}

fn parse_scan_request(body: &[u8], state: &AppState) -> Result<ScanRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::EmptyBody);
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::NotAnObject);
    }
    let payload: ScanPayload =
        serde_json::from_value(value).map_err(|e| ApiError::InvalidJson(e.to_string()))?;

    let urls = match payload.urls {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(url) => Ok(url),
                _ => Err(ApiError::NonStringUrl),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(RequestError::EmptyUrls.into()),
    };

    let concurrency = match payload.concurrency {
        None => None,
        Some(value) => Some(integer_field(&value).ok_or(ApiError::InvalidConcurrency)?),
    };

    let timeout = match payload.timeout {
        None => None,
        Some(Value::Number(n)) => Some(n.as_f64().ok_or(RequestError::InvalidTimeout)?),
        Some(_) => return Err(RequestError::InvalidTimeout.into()),
    };

    let user_agent = match payload.user_agent {
        None => None,
        Some(Value::String(agent)) => Some(agent),
        Some(_) => return Err(ApiError::InvalidUserAgent),
    };

    let request = ScanRequest::resolve(urls, concurrency, timeout, &state.scanner_config)?;
    Ok(match user_agent {
        Some(agent) => request.with_user_agent(agent),
        None => request,
    })
}

/// Reads a JSON integer; values above `i64::MAX` saturate
fn integer_field(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64()
        .or_else(|| n.as_u64().map(|_| i64::MAX))
}
