use crate::{
    api::ApiClient,
    prompt::Prompt,
    types::{MixRequest, StemEntry, StemSettings, UploadedFile},
};
use std::{
    collections::{btree_map, BTreeMap},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// Outcome of a multi-file upload; files are handled independently.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Stem name for an uploaded file: its base name up to the first dot.
pub fn stem_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.split('.').next().unwrap_or_default().to_string()
}

/// The stems currently loaded for mixing, keyed by name.
#[derive(Debug, Default, Clone)]
pub struct StemCollection {
    entries: BTreeMap<String, StemEntry>,
}

impl StemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&StemEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, StemEntry> {
        self.entries.values()
    }

    /// Upload each file and add it on success. A failed file is reported through
    /// `prompt` and skipped; it never leaves a partial entry.
    pub fn upload<P: AsRef<Path>>(
        &mut self,
        api: &ApiClient,
        files: &[P],
        prompt: &dyn Prompt,
    ) -> UploadReport {
        let mut report = UploadReport::default();
        for file in files {
            let path = file.as_ref();
            if stem_name(path).is_empty() {
                warn!(path = %path.display(), "no stem name in file name; skipped");
                prompt.notify("Failed to upload file");
                report
                    .failed
                    .push((path.to_path_buf(), "file name yields no stem name".into()));
                continue;
            }
            match api.upload(path) {
                Ok(up) => {
                    let name = self.insert_uploaded(path, up, api);
                    report.uploaded.push(name);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "upload failed");
                    prompt.notify("Failed to upload file");
                    report.failed.push((path.to_path_buf(), e.to_string()));
                }
            }
        }
        report
    }

    /// Record a finished upload. An existing entry with the same name is replaced.
    pub fn insert_uploaded(&mut self, local: &Path, up: UploadedFile, api: &ApiClient) -> String {
        let name = stem_name(local);
        let entry = StemEntry {
            name: name.clone(),
            remote_filename: up.filename,
            url: api.absolute(&up.url),
            gain: 0.0,
            pan: 0.0,
        };
        if self.entries.insert(name.clone(), entry).is_some() {
            info!(stem = %name, "replaced existing stem");
        }
        name
    }

    /// Set gain and pan, clamped to the control ranges. Unknown names and
    /// non-finite values are ignored.
    pub fn update(&mut self, name: &str, settings: StemSettings) -> bool {
        if !settings.is_finite() {
            return false;
        }
        match self.entries.get_mut(name) {
            Some(e) => {
                let s = settings.clamped();
                e.gain = s.gain;
                e.pan = s.pan;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, name: &str) -> Option<StemEntry> {
        self.entries.remove(name)
    }

    pub fn mix_request(&self, auto_gain: bool, use_cnn: bool) -> MixRequest {
        let mut req = MixRequest {
            auto_gain,
            use_cnn,
            ..MixRequest::default()
        };
        for (name, e) in &self.entries {
            req.stems.insert(name.clone(), e.remote_filename.clone());
            req.gains.insert(name.clone(), e.gain);
            req.pans.insert(name.clone(), e.pan);
        }
        req
    }

    /// Overwrite gains for stems named in `gains`; returns how many matched.
    pub fn apply_gains(&mut self, gains: &BTreeMap<String, f32>) -> usize {
        let mut n = 0;
        for (name, gain) in gains {
            if let Some(e) = self.entries.get_mut(name) {
                e.gain = *gain;
                n += 1;
            }
        }
        n
    }
}
