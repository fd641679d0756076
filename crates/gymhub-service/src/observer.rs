//! Operation hooks shared by every service.
//!
//! Services call [`observe`] around each public operation. The default
//! [`TracingObserver`] turns the hooks into log lines; tests inject a
//! recording observer instead.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use gymhub_core::error::{AppError, ErrorKind};

/// Receives start, success and failure notifications for service operations.
pub trait ServiceObserver: Send + Sync + std::fmt::Debug + 'static {
    /// An operation began.
    fn on_start(&self, operation: &'static str);
    /// An operation completed successfully.
    fn on_success(&self, operation: &'static str, elapsed: Duration);
    /// An operation failed.
    fn on_error(&self, operation: &'static str, error: &AppError, elapsed: Duration);
}

/// Logs every hook through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ServiceObserver for TracingObserver {
    fn on_start(&self, operation: &'static str) {
        debug!(operation, "Service operation started");
    }

    fn on_success(&self, operation: &'static str, elapsed: Duration) {
        info!(
            operation,
            elapsed_ms = elapsed.as_millis() as u64,
            "Service operation completed"
        );
    }

    fn on_error(&self, operation: &'static str, err: &AppError, elapsed: Duration) {
        let elapsed_ms = elapsed.as_millis() as u64;
        match err.kind {
            ErrorKind::Validation
            | ErrorKind::NotFound
            | ErrorKind::Authentication
            | ErrorKind::Authorization
            | ErrorKind::Conflict => {
                warn!(operation, elapsed_ms, kind = %err.kind, error = %err, "Service operation rejected");
            }
            _ => {
                error!(operation, elapsed_ms, kind = %err.kind, error = %err, "Service operation failed");
            }
        }
    }
}

/// Run `fut` between the observer's hooks.
pub async fn observe<T, F>(
    observer: &dyn ServiceObserver,
    operation: &'static str,
    fut: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    observer.on_start(operation);
    let started = Instant::now();
    let result = fut.await;
    match &result {
        Ok(_) => observer.on_success(operation, started.elapsed()),
        Err(err) => observer.on_error(operation, err, started.elapsed()),
    }
    result
}
