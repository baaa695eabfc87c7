#![allow(dead_code)]

use auralis_client::{Client, ClientConfig, MemoryTokenStore, ProgressConfig};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use httpmock::MockServer;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

pub fn token_for(user: &str) -> String {
    let payload = format!(r#"{{"sub":"{user}","exp":4102444800}}"#);
    format!(
        "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.{}.sig",
        URL_SAFE_NO_PAD.encode(payload)
    )
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    let mut cfg = ClientConfig::default().with_api_url(server.base_url());
    cfg.progress = ProgressConfig {
        tick_ms: 5,
        step: 5,
        ceiling: 90,
    };
    cfg
}

pub fn logged_in(server: &MockServer, user: &str) -> (Client, MemoryTokenStore) {
    let store = MemoryTokenStore::with_token(token_for(user));
    let client = Client::new(config_for(server), store.clone()).expect("client");
    (client, store)
}

pub fn audio_file(dir: &TempDir, name: &str) -> PathBuf {
    let p = dir.path().join(name);
    fs::write(&p, b"RIFF....WAVEfmt fake audio bytes").unwrap();
    p
}
