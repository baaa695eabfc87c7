mod common;

use auralis_client::{ScriptedPrompt, StemCollection, StemSettings};
use common::{audio_file, logged_in};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn upload_sends_bearer_and_creates_entry() {
    let server = MockServer::start();
    let (client, _store) = logged_in(&server, "alice");
    let auth = format!("Bearer {}", common::token_for("alice"));
    let up = server.mock(|when, then| {
        when.method(POST)
            .path("/upload")
            .header("Authorization", auth.as_str())
            .body_contains("vocals.wav");
        then.status(200)
            .json_body(json!({"filename": "vocals.wav", "url": "/static/vocals.wav"}));
    });

    let dir = tempdir().unwrap();
    let file = audio_file(&dir, "vocals.wav");
    let prompt = ScriptedPrompt::default();
    let mut stems = StemCollection::new();
    let report = stems.upload(&client.api(), &[file], &prompt);

    up.assert();
    assert_eq!(report.uploaded, vec!["vocals".to_string()]);
    let e = stems.get("vocals").unwrap();
    assert_eq!(e.remote_filename, "vocals.wav");
    assert_eq!(e.url, format!("{}/static/vocals.wav", server.base_url()));
    assert_eq!((e.gain, e.pan), (0.0, 0.0));
    assert!(prompt.notices().is_empty());
}

#[test]
fn second_upload_with_same_name_wins() {
    let server = MockServer::start();
    let (client, _store) = logged_in(&server, "alice");
    server.mock(|when, then| {
        when.method(POST).path("/upload").body_contains("drums.wav");
        then.status(200)
            .json_body(json!({"filename": "drums.wav", "url": "/static/drums.wav"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/upload").body_contains("drums.mp3");
        then.status(200)
            .json_body(json!({"filename": "drums.mp3", "url": "/static/drums.mp3"}));
    });

    let dir = tempdir().unwrap();
    let files = [audio_file(&dir, "drums.wav"), audio_file(&dir, "drums.mp3")];
    let mut stems = StemCollection::new();
    stems.upload(&client.api(), &files, &ScriptedPrompt::default());

    assert_eq!(stems.len(), 1);
    assert_eq!(stems.get("drums").unwrap().remote_filename, "drums.mp3");
}

#[test]
fn one_failed_upload_does_not_block_the_rest() {
    let server = MockServer::start();
    let (client, _store) = logged_in(&server, "alice");
    server.mock(|when, then| {
        when.method(POST).path("/upload").body_contains("bad.wav");
        then.status(500).json_body(json!({"detail": "disk full"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/upload").body_contains("bass.wav");
        then.status(200)
            .json_body(json!({"filename": "bass.wav", "url": "/static/bass.wav"}));
    });

    let dir = tempdir().unwrap();
    let files = [audio_file(&dir, "bad.wav"), audio_file(&dir, "bass.wav")];
    let prompt = ScriptedPrompt::default();
    let mut stems = StemCollection::new();
    let report = stems.upload(&client.api(), &files, &prompt);

    assert_eq!(report.uploaded, vec!["bass".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].1.contains("disk full"));
    assert!(stems.get("bad").is_none());
    assert!(stems.get("bass").is_some());
    assert_eq!(prompt.notices(), vec!["Failed to upload file".to_string()]);
}

#[test]
fn settings_changes_survive_until_delete() {
    let server = MockServer::start();
    let (client, _store) = logged_in(&server, "alice");
    server.mock(|when, then| {
        when.method(POST).path("/upload");
        then.status(200)
            .json_body(json!({"filename": "keys.wav", "url": "/static/keys.wav"}));
    });

    let dir = tempdir().unwrap();
    let mut stems = StemCollection::new();
    stems.upload(&client.api(), &[audio_file(&dir, "keys.wav")], &ScriptedPrompt::default());

    stems.update("keys", StemSettings { gain: 12.0, pan: 0.25 });
    let e = stems.get("keys").unwrap();
    assert_eq!(e.gain, 6.0);
    assert_eq!(e.pan, 0.25);

    stems.delete("keys");
    assert!(!stems.update("keys", StemSettings { gain: 1.0, pan: 0.0 }));
    assert!(stems.is_empty());
}
