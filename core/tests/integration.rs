//! End-to-end tests against the live mock daemon.
//!
//! # Design
//! Starts the mock server on a Unix socket in a temporary directory, then
//! talks to it with the real `Client` over `UnixStream`. The server is
//! hyper, so these tests check the client against a production HTTP/1.1
//! implementation's chunked framing, not against hand-written bytes.

use std::path::Path;

use dockwire::{
    Client, ClientConfig, ClientError, ContainerSummary, ErrorMessage, HttpMethod, HttpRequest, SystemVersion,
};

/// Bind `path` and serve the mock daemon on a background thread.
fn start_server(path: &Path) {
    let std_listener = std::os::unix::net::UnixListener::bind(path).unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::UnixListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
}

#[test]
fn daemon_session() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("mock.sock");
    start_server(&socket);

    let mut client = Client::connect(ClientConfig::new(&socket)).unwrap();

    // Step 1: version, decoded into the typed document.
    let response = client.get::<SystemVersion>("/version").unwrap();
    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.headers.get("transfer-encoding"), Some("chunked"));
    assert_eq!(response.headers.get("Content-Type"), Some("application/json"));
    assert_eq!(response.body.api_version, "1.47");
    assert_eq!(response.body.min_api_version.as_deref(), Some("1.24"));
    assert_eq!(response.body.components[0].name, "Engine");

    // Step 2: same connection, multi-byte names spread over 7-byte chunks.
    let response = client.get::<Vec<ContainerSummary>>("/containers/json").unwrap();
    assert_eq!(response.body.len(), 2);
    assert_eq!(response.body[0].names, ["/café_crème"]);
    assert_eq!(response.body[1].names, ["/ünïcödé_🐋"]);

    // Step 3: a 404 still carries a decodable JSON body.
    let response = client.get::<ErrorMessage>("/containers/missing/json").unwrap();
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.body.message, "No such container: missing");

    // Step 4: a chunked body of the wrong shape is a decode error.
    let err = client.get::<SystemVersion>("/containers/json").unwrap_err();
    assert!(matches!(err, ClientError::BodyDecode { status: 200, .. }), "{err}");

    // Step 5: the connection still works after a decode error.
    let response = client
        .send_raw(HttpRequest::new(HttpMethod::Get, "/containers/9cd87474be90/json", "docker"))
        .unwrap();
    let container: ContainerSummary = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(container.state, "exited");

    client.close().unwrap();
}

#[test]
fn small_reads_give_same_result() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("mock.sock");
    start_server(&socket);

    let mut config = ClientConfig::new(&socket);
    config.read_size = 5;
    let mut client = Client::connect(config).unwrap();

    let response = client.get::<Vec<ContainerSummary>>("/containers/json").unwrap();
    assert_eq!(response.body[1].id, "9cd87474be90");
}

#[test]
fn content_length_response_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("mock.sock");
    start_server(&socket);

    let mut client = Client::connect(ClientConfig::new(&socket)).unwrap();
    let err = client.send_raw(HttpRequest::get("/_ping", "docker")).unwrap_err();
    assert!(matches!(err, ClientError::UnsupportedBody(ref what) if what == "content-length 2"), "{err}");

    // The unread body is still on the socket; the client refuses to go on.
    let err = client.get::<SystemVersion>("/version").unwrap_err();
    assert!(matches!(err, ClientError::ConnectionClosed("after a failed response")), "{err}");
}

#[test]
fn body_limit_applies_to_live_responses() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("mock.sock");
    start_server(&socket);

    let mut config = ClientConfig::new(&socket);
    config.max_body_size = 16;
    let mut client = Client::connect(config).unwrap();
    let err = client.get::<SystemVersion>("/version").unwrap_err();
    assert!(matches!(err, ClientError::BodyTooLarge { limit: 16 }), "{err}");
}

#[test]
fn missing_socket_is_connect_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Client::connect(ClientConfig::new(dir.path().join("absent.sock"))).unwrap_err();
    assert!(matches!(err, ClientError::Connect { .. }), "{err}");
}
