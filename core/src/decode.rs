//! Turning an assembled response body into a typed value.

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Decodes complete body bytes into a caller-chosen type.
pub trait BodyDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError>;
}

/// JSON bodies via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl BodyDecoder for Json {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError> {
        serde_json::from_slice(body).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn decodes_typed_value() {
        let map: BTreeMap<String, u32> = Json.decode(br#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(map["b"], 2);
    }

    #[test]
    fn decodes_non_ascii_text() {
        let name: String = Json.decode("\"caf\u{e9}\"".as_bytes()).unwrap();
        assert_eq!(name, "caf\u{e9}");
    }

    #[test]
    fn wrong_shape_is_error() {
        let err = Json.decode::<Vec<u32>>(br#"{"a":1}"#).unwrap_err();
        assert!(err.to_string().contains("expected a sequence"), "{err}");
    }

    #[test]
    fn empty_body_is_error() {
        assert!(Json.decode::<serde_json::Value>(b"").is_err());
    }
}
