//! Daemon composition: one scheduler task plus the HTTP listener.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::{Action, RtcnError, Scheduler};
use crate::ingress::Ingress;

use super::api;

/// Fully wired daemon.
pub struct Daemon<A> {
    bind_addr: String,
    ingress: Ingress,
    scheduler: Arc<Scheduler<A>>,
}

impl<A: Action> Daemon<A> {
    /// Assemble a daemon from its parts.
    pub fn new(bind_addr: impl Into<String>, ingress: Ingress, scheduler: Scheduler<A>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            ingress,
            scheduler: Arc::new(scheduler),
        }
    }

    /// Address `serve` binds to.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Report intake.
    pub const fn ingress(&self) -> &Ingress {
        &self.ingress
    }

    /// The scheduler driving trigger cycles.
    pub const fn scheduler(&self) -> &Arc<Scheduler<A>> {
        &self.scheduler
    }

    /// HTTP router bound to this daemon's ingress.
    pub fn router(&self) -> Router {
        api::router(self.ingress.clone())
    }

    /// Start the scheduler loop on the current tokio runtime.
    pub fn spawn_scheduler(&self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let scheduler = Arc::clone(&self.scheduler);
        tokio::spawn(async move { scheduler.run(shutdown).await })
    }

    /// Bind the configured address and serve until `shutdown` turns `true`.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::Io`] when binding or serving fails.
    pub async fn serve(self, shutdown: watch::Receiver<bool>) -> Result<(), RtcnError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` turns `true`.
    ///
    /// The scheduler is started exactly once here and is stopped by the same
    /// signal that stops the listener.
    ///
    /// # Errors
    ///
    /// Returns [`RtcnError::Io`] when serving fails.
    pub async fn serve_on(
        self,
        listener: TcpListener,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), RtcnError> {
        tracing::info!("rtcnd listening on http://{}", listener.local_addr()?);
        let scheduler_task = self.spawn_scheduler(shutdown.clone());

        let mut http_shutdown = shutdown;
        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = http_shutdown.wait_for(|stop| *stop).await;
            })
            .await;

        if served.is_err() {
            scheduler_task.abort();
        } else if let Err(e) = scheduler_task.await {
            tracing::error!("scheduler task failed: {}", e);
        }
        served?;
        Ok(())
    }
}
