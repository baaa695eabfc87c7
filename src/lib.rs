//! # auralis-client
//!
//! Client library for the Auralis stem mixing service: log in, upload stems,
//! set per-stem gain and pan, request a mix, and browse or prune past mixes.
//! All audio work happens on the backend.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod history;
pub mod io;
pub mod mix;
pub mod paths;
pub mod prompt;
pub mod session;
pub mod stems;
pub mod types;

pub use crate::{
    api::ApiClient,
    client::Client,
    config::{ClientConfig, ProgressConfig},
    error::{ClientError, Result},
    gate::{gate, Navigation, Route},
    history::{DeleteOutcome, History, HistoryState},
    io::progress::SimulatedProgress,
    mix::{MixOptions, MixOutcome, MixPhase, MixWorkflow},
    prompt::{Prompt, ScriptedPrompt, TerminalPrompt},
    session::{decode_claims, Claims, FileTokenStore, MemoryTokenStore, Session, SessionStore, TokenStore},
    stems::{StemCollection, UploadReport},
    types::{HistoryRecord, MixRequest, MixResult, StemEntry, StemSettings},
};
