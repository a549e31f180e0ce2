//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;

use shopfront::config::{load_config, AppConfig};
use shopfront::lifecycle::{build_server, Shutdown};
use tokio::net::TcpListener;

/// A running portal on an ephemeral port.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub shutdown: Shutdown,
    base_path: String,
}

impl TestApp {
    /// Absolute URL for a path below the configured base path.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}{}", self.addr, self.base_path, path)
    }

    /// Absolute URL ignoring the base path.
    #[allow(dead_code)]
    pub fn raw_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// The shipped configuration file.
pub fn shipped_config() -> AppConfig {
    load_config(&Path::new(env!("CARGO_MANIFEST_DIR")).join("config/shopfront.toml")).unwrap()
}

/// Bind 127.0.0.1:0 and serve `config` until the returned app is dropped.
pub async fn spawn_app(mut config: AppConfig) -> TestApp {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let base_path = config.app.base_path.clone();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = build_server(config).unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        shutdown,
        base_path,
    }
}
