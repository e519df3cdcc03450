use tokio::net::UnixListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let path = std::env::var("SOCKET").unwrap_or_else(|_| "/tmp/dockwire-mock.sock".to_string());
    match std::fs::remove_file(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    let listener = UnixListener::bind(&path)?;
    println!("listening on {path}");
    mock_server::run(listener).await
}
