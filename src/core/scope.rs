//! Screen lifetime token.
//!
//! A screen's requests run through its [`ScreenScope`]. Once the scope is
//! closed, in-flight requests are abandoned and their results are never
//! applied to the screen's state.

use crate::errors::{AppError, AppResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct ScreenScope {
    closed: Arc<watch::Sender<bool>>,
}

impl Default for ScreenScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            closed: Arc::new(tx),
        }
    }

    pub fn is_alive(&self) -> bool {
        !*self.closed.borrow()
    }

    /// Ends the scope for every clone sharing it.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        // the sender lives as long as `self`, so this only returns once closed
        let _ = rx.wait_for(|closed| *closed).await;
    }

    /// Await `fut` unless the scope closes first; re-checks liveness before
    /// handing the result back so callers never apply a stale response.
    pub async fn run<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if !self.is_alive() {
            return Err(AppError::Cancelled);
        }

        let out = tokio::select! {
            biased;
            _ = self.closed() => return Err(AppError::Cancelled),
            out = fut => out,
        };

        if !self.is_alive() {
            return Err(AppError::Cancelled);
        }
        out
    }
}
