//! Cancellation and deadline signal threaded through every database call.

use crate::error::{DbError, DbResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Caller-supplied cancellation signal for database calls.
///
/// The default context never expires and cannot be cancelled. Contexts are
/// cheap to clone; clones share the cancellation token.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl Context {
    pub fn background() -> Self {
        Self::default()
    }

    /// Context expiring `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::default().timeout(timeout)
    }

    /// Context cancelled when `token` is.
    pub fn with_cancel(token: CancellationToken) -> Self {
        Self {
            deadline: None,
            cancel: Some(token),
        }
    }

    /// Tighten the deadline to at most `timeout` from now.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.deadline(Instant::now() + timeout)
    }

    /// Tighten the deadline to at most `deadline`.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Child context cancelled with this one, and additionally through the
    /// returned token.
    pub fn child(&self) -> (Self, CancellationToken) {
        let token = match &self.cancel {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let ctx = Self {
            deadline: self.deadline,
            cancel: Some(token.clone()),
        };
        (ctx, token)
    }

    pub fn get_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Run `fut` unless the context is cancelled or its deadline passes first.
    ///
    /// A context that is already cancelled or past its deadline never polls
    /// `fut`. On interruption `fut` is dropped; what the driver did with the
    /// in-flight statement is up to the driver.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> DbResult<T>
    where
        F: Future<Output = DbResult<T>>,
    {
        if self.is_cancelled() {
            return Err(DbError::cancelled(operation));
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(DbError::deadline_exceeded(operation));
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, fut)
                    .await
                    .map_err(|_| DbError::deadline_exceeded(operation))?,
                None => fut.await,
            }
        };

        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(DbError::cancelled(operation)),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = Context::background();
        let value = ctx.run("noop", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = Context::with_cancel(token);
        let err = ctx.run("query", async { Ok(()) }).await.unwrap_err();
        assert!(matches!(err, DbError::Cancelled { ref operation } if operation == "query"));
    }

    #[tokio::test]
    async fn test_cancelled_while_running() {
        let (ctx, token) = Context::background().child();
        let handle = tokio::spawn(async move {
            ctx.run("sleep", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await
        });
        token.cancel();
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, DbError::Cancelled { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let ctx = Context::with_timeout(Duration::from_millis(10));
        let err = ctx
            .run("sleep", async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::DeadlineExceeded { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_never_starts() {
        let ctx = Context::with_timeout(Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(20)).await;

        let started = std::sync::atomic::AtomicBool::new(false);
        let err = ctx
            .run("commit", async {
                started.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::DeadlineExceeded { ref operation } if operation == "commit"));
        assert!(!started.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_deadline_only_tightens() {
        let ctx = Context::with_timeout(Duration::from_secs(1)).timeout(Duration::from_secs(60));
        let deadline = ctx.get_deadline().unwrap();
        assert!(deadline <= Instant::now() + Duration::from_secs(1));
    }

    #[test]
    fn test_child_follows_parent_cancel() {
        let parent_token = CancellationToken::new();
        let parent = Context::with_cancel(parent_token.clone());
        let (child, _) = parent.child();
        parent_token.cancel();
        assert!(child.is_cancelled());
    }
}
