//! Component runtime: spawns the relay's long-running units.
//!
//! A [`Component`] is any independently-runnable unit: a comms channel
//! (console, Telegram) or the health listener. Components capture their
//! shared state at construction time and are handed to [`spawn_components`].
//! Any component error cancels the shared [`CancellationToken`] so siblings
//! shut down cleanly.

use std::future::Future;
use std::pin::Pin;

use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::AppError;

/// A boxed, owned future returned by [`Component::run`].
pub type ComponentFuture = Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'static>>;

/// A self-contained, concurrently-runnable unit.
pub trait Component: Send + 'static {
    /// Stable identifier used in log messages.
    fn id(&self) -> &str;

    /// Consume the component and return its run-loop. The future should
    /// return once `shutdown` is cancelled or its own work is done.
    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture;
}

/// Handle to a running component set.
pub struct RuntimeHandle {
    inner: JoinHandle<Result<(), AppError>>,
}

impl RuntimeHandle {
    /// Await all components and return the first error, if any.
    pub async fn join(self) -> Result<(), AppError> {
        match self.inner.await {
            Ok(r) => r,
            Err(e) => Err(AppError::Comms(format!("runtime task panicked: {e}"))),
        }
    }
}

/// Spawn each [`Component`] as its own Tokio task.
///
/// If any component returns `Err` or panics, `shutdown` is cancelled and the
/// first error is reported once the remaining components have drained.
pub fn spawn_components(components: Vec<Box<dyn Component>>, shutdown: CancellationToken) -> RuntimeHandle {
    let handle = tokio::spawn(async move {
        let mut set: JoinSet<Result<(), AppError>> = JoinSet::new();

        for component in components {
            let id = component.id().to_string();
            debug!(component = %id, "spawning component");
            set.spawn(component.run(shutdown.clone()));
        }

        let mut first_err: Option<AppError> = None;

        while let Some(res) = set.join_next().await {
            match res {
                Err(e) => {
                    error!("component panicked: {e}");
                    shutdown.cancel();
                    first_err.get_or_insert_with(|| AppError::Comms(format!("component panicked: {e}")));
                }
                Ok(Err(e)) => {
                    error!("component error: {e}");
                    shutdown.cancel();
                    first_err.get_or_insert(e);
                }
                Ok(Ok(())) => {}
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    });

    RuntimeHandle { inner: handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Waiter;

    impl Component for Waiter {
        fn id(&self) -> &str {
            "waiter"
        }

        fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
            Box::pin(async move {
                shutdown.cancelled().await;
                Ok(())
            })
        }
    }

    struct Failing;

    impl Component for Failing {
        fn id(&self) -> &str {
            "failing"
        }

        fn run(self: Box<Self>, _shutdown: CancellationToken) -> ComponentFuture {
            Box::pin(async { Err(AppError::Comms("bind failed".into())) })
        }
    }

    #[tokio::test]
    async fn empty_set_finishes_immediately() {
        let handle = spawn_components(Vec::new(), CancellationToken::new());
        assert!(handle.join().await.is_ok());
    }

    #[tokio::test]
    async fn cancellation_stops_components() {
        let shutdown = CancellationToken::new();
        let handle = spawn_components(vec![Box::new(Waiter)], shutdown.clone());
        shutdown.cancel();
        assert!(handle.join().await.is_ok());
    }

    #[tokio::test]
    async fn failure_cancels_siblings_and_reports_error() {
        let shutdown = CancellationToken::new();
        let handle = spawn_components(vec![Box::new(Waiter), Box::new(Failing)], shutdown.clone());
        let err = handle.join().await.unwrap_err();
        assert!(err.to_string().contains("bind failed"));
        assert!(shutdown.is_cancelled());
    }
}
