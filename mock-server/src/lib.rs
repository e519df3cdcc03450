use std::convert::Infallible;

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use futures_util::stream;
use serde::{Deserialize, Serialize};
use tokio::net::UnixListener;

/// JSON bodies are streamed in pieces this small so a single document spans
/// many chunks and multi-byte characters straddle chunk boundaries.
pub const CHUNK_SIZE: usize = 7;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Version {
    pub version: String,
    pub api_version: String,
    #[serde(rename = "MinAPIVersion")]
    pub min_api_version: String,
    pub os: String,
    pub arch: String,
    pub components: Vec<Component>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Component {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Container {
    pub id: String,
    pub names: Vec<String>,
    pub image: String,
    pub state: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

pub fn version() -> Version {
    Version {
        version: "27.3.1-mock".to_string(),
        api_version: "1.47".to_string(),
        min_api_version: "1.24".to_string(),
        os: "linux".to_string(),
        arch: "amd64".to_string(),
        components: vec![Component {
            name: "Engine".to_string(),
            version: "27.3.1-mock".to_string(),
        }],
    }
}

pub fn containers() -> Vec<Container> {
    vec![
        Container {
            id: "8dfafdbc3a40".to_string(),
            names: vec!["/café_crème".to_string()],
            image: "ubuntu:24.04".to_string(),
            state: "running".to_string(),
            status: "Up 2 hours".to_string(),
        },
        Container {
            id: "9cd87474be90".to_string(),
            names: vec!["/ünïcödé_🐋".to_string()],
            image: "alpine:3.20".to_string(),
            state: "exited".to_string(),
            status: "Exited (0) 5 minutes ago".to_string(),
        },
    ]
}

pub fn app() -> Router {
    Router::new()
        .route("/version", get(get_version))
        .route("/containers/json", get(list_containers))
        .route("/containers/{id}/json", get(inspect_container))
        .route("/_ping", get(ping))
}

pub async fn run(listener: UnixListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serialize `value` and send it as a streamed body, which hyper frames
/// with `Transfer-Encoding: chunked`.
fn chunked_json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    let bytes = match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    let pieces: Vec<Result<Bytes, Infallible>> = bytes
        .chunks(CHUNK_SIZE)
        .map(|piece| Ok(Bytes::copy_from_slice(piece)))
        .collect();
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(stream::iter(pieces)),
    )
        .into_response()
}

async fn get_version() -> Response {
    chunked_json(StatusCode::OK, &version())
}

async fn list_containers() -> Response {
    chunked_json(StatusCode::OK, &containers())
}

async fn inspect_container(Path(id): Path<String>) -> Response {
    match containers().into_iter().find(|c| c.id == id) {
        Some(container) => chunked_json(StatusCode::OK, &container),
        None => chunked_json(
            StatusCode::NOT_FOUND,
            &ErrorBody {
                message: format!("No such container: {id}"),
            },
        ),
    }
}

/// Plain-text body with `Content-Length`, the one route that is not chunked.
async fn ping() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_serializes_with_daemon_field_names() {
        let json = serde_json::to_value(version()).unwrap();
        assert_eq!(json["ApiVersion"], "1.47");
        assert_eq!(json["MinAPIVersion"], "1.24");
        assert_eq!(json["Components"][0]["Name"], "Engine");
    }

    #[test]
    fn container_names_need_multibyte_utf8() {
        let json = serde_json::to_string(&containers()).unwrap();
        assert!(json.len() > json.chars().count());
    }

    #[test]
    fn error_body_uses_lowercase_message() {
        let json = serde_json::to_value(ErrorBody {
            message: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json["message"], "x");
    }
}
