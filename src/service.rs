//! Request handlers for the HTTP surface.
//!
//! Socket handling, multipart decoding and CORS live in whatever server hosts
//! these handlers; each handler receives the already-extracted form fields and
//! returns a status code with a body. Every failure maps to a 400 carrying
//! `{"success": false, "error": <message>}`.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::detection::RegionDetector;
use crate::models::Phase;
use crate::phase::PhaseTransform;
use crate::buffer;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_PNG: &str = "image/png";

/// Handler output: status code, content type and body bytes
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// `{"success": false, "error": <message>}`
pub fn error_envelope(message: &str) -> Value {
    json!({ "success": false, "error": message })
}

impl Response {
    pub fn png(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE_PNG,
            body,
        }
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                content_type: CONTENT_TYPE_JSON,
                body,
            },
            Err(e) => {
                error!(error = %e, "Failed to serialize response");
                Self::from_value(500, &error_envelope(&format!("failed to serialize response: {}", e)))
            }
        }
    }

    /// JSON body from an already-built value
    pub fn from_value(status: u16, value: &Value) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_JSON,
            body: value.to_string().into_bytes(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        warn!(error = message, "Request rejected");
        Self::from_value(400, &error_envelope(message))
    }
}

/// `GET /health`
pub fn health() -> Response {
    Response::from_value(200, &json!({ "ok": true }))
}

/// `POST /process` with form fields `file` and `phase`
pub fn process(file: Option<&[u8]>, phase: Option<&str>) -> Response {
    let phase: Phase = match phase.unwrap_or("").parse() {
        Ok(phase) => phase,
        Err(e) => return Response::bad_request(&e.to_string()),
    };

    let bytes = match file {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Response::bad_request("empty file"),
    };

    let result = buffer::decode(bytes)
        .map_err(anyhow::Error::from)
        .and_then(|img| PhaseTransform::new(phase).apply_to_png(&img));

    match result {
        Ok(png) => {
            info!(phase = %phase, bytes = png.len(), "Processed image");
            Response::png(png)
        }
        Err(e) => Response::bad_request(&e.to_string()),
    }
}

/// `POST /analyze` with form field `file`
pub fn analyze(file: Option<&[u8]>) -> Response {
    let bytes = match file {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Response::bad_request("empty file"),
    };

    let result = buffer::decode(bytes)
        .map_err(anyhow::Error::from)
        .and_then(|img| RegionDetector::new().detect(&img));

    match result {
        Ok(detection) => {
            info!(detected = detection.detected, confidence = detection.confidence, "Analyzed image");
            Response::json(200, &detection)
        }
        Err(e) => Response::bad_request(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("boom"))
        }
    }

    #[test]
    fn serialization_failure_becomes_server_error() {
        let response = Response::json(200, &Unserializable);
        assert_eq!(response.status, 500);
        assert_eq!(response.content_type, CONTENT_TYPE_JSON);

        let body: Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("boom"));
    }

    #[test]
    fn envelope_shape() {
        assert_eq!(
            Response::bad_request("empty file").body,
            br#"{"error":"empty file","success":false}"#.to_vec()
        );
    }
}
