use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const GAIN_RANGE_DB: (f32, f32) = (-6.0, 6.0);
pub const PAN_RANGE: (f32, f32) = (-1.0, 1.0);

/// One uploaded stem, keyed by `name` in the [`StemCollection`](crate::StemCollection).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StemEntry {
    pub name: String,
    /// File name the backend stored the upload under.
    pub remote_filename: String,
    pub url: String,
    pub gain: f32,
    pub pan: f32,
}

/// The user-adjustable part of a [`StemEntry`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StemSettings {
    pub gain: f32,
    pub pan: f32,
}

impl StemSettings {
    pub fn is_finite(&self) -> bool {
        self.gain.is_finite() && self.pan.is_finite()
    }

    pub fn clamped(self) -> Self {
        Self {
            gain: self.gain.clamp(GAIN_RANGE_DB.0, GAIN_RANGE_DB.1),
            pan: self.pan.clamp(PAN_RANGE.0, PAN_RANGE.1),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MixRequest {
    pub stems: BTreeMap<String, String>,
    pub gains: BTreeMap<String, f32>,
    pub pans: BTreeMap<String, f32>,
    pub auto_gain: bool,
    pub use_cnn: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MixResult {
    pub url: String,
    #[serde(default)]
    pub logs: Option<String>,
    /// Per-stem gains the backend settled on; only meaningful with auto-gain.
    #[serde(default)]
    pub gains: Option<BTreeMap<String, f32>>,
    #[serde(default)]
    pub history_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub timestamp: String,
    pub settings_summary: String,
    pub logs: String,
    pub output_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}
