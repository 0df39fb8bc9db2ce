//! Background worker that keeps the access token fresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};

use crate::error::ClientError;
use crate::identity::IdentityProvider;

/// Session status as last observed by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Valid,
    /// Renewal failed and a new login was requested.
    Expired,
}

/// Periodically renews the token; on failure asks the provider for a new login.
pub struct TokenRefreshWorker {
    identity: Arc<dyn IdentityProvider>,
    interval: Duration,
    min_validity: Duration,
    shutdown: Arc<Notify>,
    status: watch::Sender<AuthStatus>,
}

impl TokenRefreshWorker {
    pub fn new(identity: Arc<dyn IdentityProvider>, interval: Duration, min_validity: Duration) -> Self {
        let (status, _) = watch::channel(AuthStatus::Valid);
        Self {
            identity,
            interval,
            min_validity,
            shutdown: Arc::new(Notify::new()),
            status,
        }
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    /// Handle that stops the worker when notified.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// One refresh attempt.
    pub async fn run_once(&self) -> AuthStatus {
        let status = match self.identity.refresh(self.min_validity).await {
            Ok(true) => {
                tracing::debug!("token renewed");
                AuthStatus::Valid
            }
            Ok(false) => AuthStatus::Valid,
            Err(e) => {
                if e != ClientError::AuthExpired {
                    tracing::warn!("unexpected refresh failure: {e}");
                }
                tracing::error!("token refresh failed; requesting a new login");
                self.identity.login().await;
                AuthStatus::Expired
            }
        };
        self.status.send_replace(status);
        status
    }

    /// Spawn the worker on the current runtime.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(interval = ?self.interval, "token refresh worker started");

            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = self.shutdown.notified() => {
                        tracing::info!("token refresh worker received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.run_once().await;
                    }
                }
            }

            tracing::info!("token refresh worker stopped");
        })
    }
}
