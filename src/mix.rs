//! Mix submission: build the request from the stem collection, send it, and fold the
//! result back into the collection and the visible state.

use crate::{
    api::ApiClient,
    config::ProgressConfig,
    error::{ClientError, Result},
    io::progress::SimulatedProgress,
    prompt::Prompt,
    stems::StemCollection,
    types::MixResult,
};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

pub const INITIAL_LOG: &str = "Initializing mix...\n";
pub const NO_LOGS_FALLBACK: &str = "Mix complete (no logs returned).";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MixPhase {
    Idle,
    Submitting,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MixOutcome {
    Succeeded,
    Failed(String),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MixOptions {
    pub auto_gain: bool,
    pub use_cnn: bool,
}

pub struct MixWorkflow {
    phase: MixPhase,
    outcome: Option<MixOutcome>,
    progress: SimulatedProgress,
    progress_cfg: ProgressConfig,
    logs: String,
    mix_url: Option<String>,
}

impl MixWorkflow {
    pub fn new(progress_cfg: ProgressConfig) -> Self {
        Self::with_progress(progress_cfg, SimulatedProgress::new())
    }

    /// Use `progress` to observe the simulated percentage while a mix runs.
    pub fn with_progress(progress_cfg: ProgressConfig, progress: SimulatedProgress) -> Self {
        Self {
            phase: MixPhase::Idle,
            outcome: None,
            progress,
            progress_cfg,
            logs: String::new(),
            mix_url: None,
        }
    }

    pub fn phase(&self) -> MixPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&MixOutcome> {
        self.outcome.as_ref()
    }

    /// Simulated percentage; see [`SimulatedProgress`].
    pub fn progress(&self) -> u8 {
        self.progress.get()
    }

    pub fn logs(&self) -> &str {
        &self.logs
    }

    /// Result URL with a cache-busting `t` parameter.
    pub fn mix_url(&self) -> Option<&str> {
        self.mix_url.as_deref()
    }

    /// Submit one mix. Never retried; the workflow is back in [`MixPhase::Idle`]
    /// when this returns, whatever the outcome.
    pub fn submit(
        &mut self,
        api: &ApiClient,
        stems: &mut StemCollection,
        opts: MixOptions,
        prompt: &dyn Prompt,
    ) -> Result<MixResult> {
        if stems.is_empty() {
            return Err(ClientError::NoStems);
        }

        self.phase = MixPhase::Submitting;
        self.mix_url = None;
        self.logs = INITIAL_LOG.to_string();
        self.progress.set(0);

        let res = self.run(api, stems, opts, prompt);

        self.phase = MixPhase::Idle;
        res
    }

    fn run(
        &mut self,
        api: &ApiClient,
        stems: &mut StemCollection,
        opts: MixOptions,
        prompt: &dyn Prompt,
    ) -> Result<MixResult> {
        let req = stems.mix_request(opts.auto_gain, opts.use_cnn);
        let ticker = self.progress.start(self.progress_cfg);
        let sent = api.mix(&req);
        ticker.stop();

        match sent {
            Ok(result) => {
                self.progress.set(100);
                self.mix_url = Some(cache_busted(&api.absolute(&result.url), now_millis()));
                self.logs = match result.logs.as_deref() {
                    Some(l) if !l.is_empty() => l.to_string(),
                    _ => NO_LOGS_FALLBACK.to_string(),
                };
                if opts.auto_gain {
                    if let Some(gains) = &result.gains {
                        let n = stems.apply_gains(gains);
                        info!(updated = n, "applied auto-gain results");
                    }
                }
                self.outcome = Some(MixOutcome::Succeeded);
                info!(url = %result.url, "mix complete");
                Ok(result)
            }
            Err(e) => {
                self.progress.set(0);
                let reason = e.to_string();
                self.logs.push_str("\nMixing failed: ");
                self.logs.push_str(&reason);
                warn!(error = %reason, "mix failed");
                prompt.notify("Mixing failed");
                self.outcome = Some(MixOutcome::Failed(reason));
                Err(e)
            }
        }
    }
}

fn cache_busted(url: &str, millis: u128) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={millis}")
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_buster_joins_existing_query() {
        assert_eq!(cache_busted("http://h/o/m.wav", 7), "http://h/o/m.wav?t=7");
        assert_eq!(
            cache_busted("http://h/o/m.wav?sig=abc", 7),
            "http://h/o/m.wav?sig=abc&t=7"
        );
    }
}
