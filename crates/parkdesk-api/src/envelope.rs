// Response envelope decoding
//
// The backend wraps payloads as `{statusCode, error, message, data}`. Error
// responses reuse the same keys, with `error` either `true` or a reason
// phrase and `message` either a string or a list of validation messages.
// `decode` is the single place that turns a response body into a typed
// value or an `Error`; services never see the envelope.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

const PREVIEW_LEN: usize = 200;

/// Raw envelope as sent by the backend.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub error: Option<ErrorFlag>,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// `error` is a boolean on success envelopes and a reason phrase on failures.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorFlag {
    Flag(bool),
    Reason(String),
}

impl ErrorFlag {
    fn is_error(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Reason(_) => true,
        }
    }
}

/// Validation failures come back as a list of messages; the first is shown.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Message {
    One(String),
    Many(Vec<String>),
}

impl Message {
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::One(s) => Some(s),
            Self::Many(list) => list.into_iter().next(),
        }
    }
}

fn looks_like_envelope(map: &serde_json::Map<String, Value>) -> bool {
    map.contains_key("statusCode") || map.contains_key("error") || map.contains_key("data")
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(PREVIEW_LEN);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Best-effort extraction of the human-readable message from any body.
pub fn message_of(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let envelope: Envelope = serde_json::from_value(value).ok()?;
    envelope.message.and_then(Message::into_text)
}

/// Decode a response body into `T`, unwrapping the envelope.
///
/// Non-2xx statuses and envelopes flagged as errors become
/// [`Error::Api`]. On success the payload is `data` when the body is an
/// envelope, otherwise the whole body.
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, Error> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) if status.is_success() => {
                return Err(Error::Deserialization {
                    message: format!("{e} (body preview: {:?})", preview(body)),
                    body: body.to_owned(),
                });
            }
            Err(_) => {
                return Err(Error::Api {
                    status: status.as_u16(),
                    message: format!("HTTP {status}: {}", preview(body)),
                });
            }
        }
    };

    let payload = match value {
        Value::Object(ref map) if looks_like_envelope(map) => {
            let envelope: Envelope =
                serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
                    message: format!("malformed envelope: {e}"),
                    body: body.to_owned(),
                })?;
            let flagged = envelope.error.as_ref().is_some_and(ErrorFlag::is_error);
            if flagged || !status.is_success() {
                let code = envelope
                    .status_code
                    .filter(|c| *c >= 400)
                    .unwrap_or_else(|| status.as_u16());
                let message = envelope
                    .message
                    .and_then(Message::into_text)
                    .or_else(|| match envelope.error {
                        Some(ErrorFlag::Reason(reason)) => Some(reason),
                        _ => None,
                    })
                    .unwrap_or_else(|| format!("HTTP {code}"));
                return Err(Error::Api {
                    status: code,
                    message,
                });
            }
            envelope.data.unwrap_or(Value::Null)
        }
        Value::Null if !status.is_success() => {
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("HTTP {status}"),
            });
        }
        other if !status.is_success() => {
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("HTTP {status}: {}", preview(&other.to_string())),
            });
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::de::IgnoredAny;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: u32,
    }

    #[test]
    fn unwraps_data_field() {
        let body = r#"{"statusCode":200,"error":false,"message":"ok","data":{"id":7}}"#;
        let thing: Thing = decode(StatusCode::OK, body).unwrap();
        assert_eq!(thing, Thing { id: 7 });
    }

    #[test]
    fn bare_body_falls_back_to_whole_value() {
        let thing: Thing = decode(StatusCode::OK, r#"{"id":3}"#).unwrap();
        assert_eq!(thing, Thing { id: 3 });

        let list: Vec<Thing> = decode(StatusCode::OK, r#"[{"id":1},{"id":2}]"#).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn error_flag_on_success_status_is_rejection() {
        let body = r#"{"statusCode":400,"error":true,"message":"Không thể sửa đăng ký đã thanh toán"}"#;
        let err = decode::<IgnoredAny>(StatusCode::OK, body).unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("đã thanh toán"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validation_message_list_reports_first_entry() {
        let body = r#"{"statusCode":400,"message":["soThang must be positive","bienSoXe is required"],"error":"Bad Request"}"#;
        let err = decode::<IgnoredAny>(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert!(matches!(
            err,
            Error::Api { status: 400, ref message } if message == "soThang must be positive"
        ));
    }

    #[test]
    fn non_json_error_body_keeps_status() {
        let err = decode::<IgnoredAny>(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn empty_success_body_decodes_as_unit() {
        decode::<()>(StatusCode::NO_CONTENT, "").unwrap();
    }

    #[test]
    fn type_mismatch_is_deserialization_error() {
        let err = decode::<Thing>(StatusCode::OK, r#"{"data":{"id":"x"}}"#).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn message_of_reads_envelope_message() {
        assert_eq!(
            message_of(r#"{"statusCode":401,"message":"Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(message_of("not json"), None);
    }
}
