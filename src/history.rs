use crate::{api::ApiClient, error::ClientError, prompt::Prompt, types::HistoryRecord};
use tracing::{info, warn};

pub const DELETE_QUESTION: &str = "Are you sure you want to delete this mix log?";

#[derive(Clone, Debug, PartialEq)]
pub enum HistoryState {
    Loading,
    Loaded(Vec<HistoryRecord>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Failed(String),
}

/// Client-side cache of the user's past mixes.
pub struct History {
    state: HistoryState,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            state: HistoryState::Loading,
        }
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    pub fn records(&self) -> &[HistoryRecord] {
        match &self.state {
            HistoryState::Loaded(r) => r,
            HistoryState::Loading => &[],
        }
    }

    pub fn get(&self, id: i64) -> Option<&HistoryRecord> {
        self.records().iter().find(|r| r.id == id)
    }

    /// Refetch from the backend. A failed fetch shows as an empty list.
    // TODO: surface fetch failures separately from "no records" once the UI has a
    // place to show them.
    pub fn refresh(&mut self, api: &ApiClient) -> &[HistoryRecord] {
        self.state = HistoryState::Loading;
        let records = match api.history() {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "failed to fetch history");
                Vec::new()
            }
        };
        self.state = HistoryState::Loaded(records);
        self.records()
    }

    pub fn delete(&mut self, api: &ApiClient, id: i64, prompt: &dyn Prompt) -> DeleteOutcome {
        if !prompt.confirm(DELETE_QUESTION) {
            return DeleteOutcome::Cancelled;
        }
        match api.delete_history(id) {
            Ok(()) => {
                if let HistoryState::Loaded(records) = &mut self.state {
                    records.retain(|r| r.id != id);
                }
                info!(id, "deleted history item");
                DeleteOutcome::Deleted
            }
            Err(e @ ClientError::Http { .. }) => {
                warn!(id, error = %e, "history delete rejected");
                prompt.notify("Failed to delete history item");
                DeleteOutcome::Failed(e.to_string())
            }
            Err(e) => {
                warn!(id, error = %e, "error deleting history item");
                prompt.notify("Error deleting item");
                DeleteOutcome::Failed(e.to_string())
            }
        }
    }
}
