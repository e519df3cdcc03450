//! Client configuration.
//!
//! # Design
//! Plain data with defaults that match a stock Docker Engine install. The
//! environment is only consulted by `from_env`; everything else is set by
//! the caller.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";
pub const DEFAULT_HOST: &str = "docker";
pub const DEFAULT_READ_SIZE: usize = 1024;
pub const DEFAULT_MAX_HEAD_SIZE: usize = 64 * 1024;
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024 * 1024;

/// Settings for one `Client`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Unix socket the daemon listens on.
    pub socket_path: PathBuf,
    /// Value of the `Host` header.
    pub host: String,
    /// Bytes requested per `read` call.
    pub read_size: usize,
    pub max_head_size: usize,
    pub max_body_size: usize,
    /// `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            host: DEFAULT_HOST.to_string(),
            read_size: DEFAULT_READ_SIZE,
            max_head_size: DEFAULT_MAX_HEAD_SIZE,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            ..Self::default()
        }
    }

    /// Defaults, with the socket taken from `DOCKER_HOST` when it names a
    /// `unix://` address.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(docker_host) = std::env::var("DOCKER_HOST") {
            match socket_path_from_docker_host(&docker_host) {
                Some(path) => config.socket_path = path,
                None => warn!(%docker_host, "ignoring DOCKER_HOST without unix:// scheme"),
            }
        }
        config
    }

    /// Apply the same timeout to reads and writes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self.write_timeout = Some(timeout);
        self
    }
}

fn socket_path_from_docker_host(value: &str) -> Option<PathBuf> {
    value
        .strip_prefix("unix://")
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_docker() {
        let config = ClientConfig::default();
        assert_eq!(config.socket_path, PathBuf::from("/var/run/docker.sock"));
        assert_eq!(config.host, "docker");
        assert_eq!(config.read_size, 1024);
        assert!(config.read_timeout.is_none());
    }

    #[test]
    fn new_overrides_only_the_socket() {
        let config = ClientConfig::new("/tmp/test.sock");
        assert_eq!(config.socket_path, PathBuf::from("/tmp/test.sock"));
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn with_timeout_sets_both_directions() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(3));
        assert_eq!(config.read_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.write_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn docker_host_unix_scheme() {
        assert_eq!(
            socket_path_from_docker_host("unix:///run/user/1000/docker.sock"),
            Some(PathBuf::from("/run/user/1000/docker.sock"))
        );
        assert_eq!(socket_path_from_docker_host("tcp://127.0.0.1:2375"), None);
        assert_eq!(socket_path_from_docker_host("unix://"), None);
    }
}
