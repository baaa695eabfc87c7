//! Simulated mix progress.
//!
//! The backend reports nothing while it mixes, so the client shows an approximation:
//! a ticker adds a fixed step every interval and stops short of completion. The value
//! is cosmetic and must never be read as real server progress.

use crate::config::ProgressConfig;
use parking_lot::Mutex;
use std::{
    sync::{
        mpsc::{self, RecvTimeoutError, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync + 'static>;

/// Shared percentage written by the ticker and by the workflow that owns it.
#[derive(Clone, Default)]
pub struct SimulatedProgress {
    value: Arc<Mutex<u8>>,
    callback: Option<ProgressCallback>,
}

impl SimulatedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(cb: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            value: Arc::default(),
            callback: Some(Arc::new(cb)),
        }
    }

    pub fn get(&self) -> u8 {
        *self.value.lock()
    }

    pub fn set(&self, pct: u8) {
        *self.value.lock() = pct.min(100);
        self.emit(pct.min(100));
    }

    fn advance(&self, step: u8, ceiling: u8) {
        let next = {
            let mut g = self.value.lock();
            if *g >= ceiling {
                return;
            }
            *g = g.saturating_add(step).min(ceiling);
            *g
        };
        self.emit(next);
    }

    fn emit(&self, pct: u8) {
        if let Some(cb) = &self.callback {
            cb(pct);
        }
    }

    /// Start ticking in the background. The returned handle must be stopped before the
    /// final value is written.
    pub fn start(&self, cfg: ProgressConfig) -> Ticker {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let progress = self.clone();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(cfg.tick()) {
                Err(RecvTimeoutError::Timeout) => progress.advance(cfg.step, cfg.ceiling),
                _ => break,
            }
        });
        Ticker {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }
}

pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Stop and join the ticker thread; no tick can land after this returns.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.halt();
    }
}
