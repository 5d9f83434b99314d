use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::BotError;

/// Runs `task` detached from the interaction that started it. Failures are
/// logged under `name` and never reach the user.
pub fn spawn_logged<F>(name: &'static str, task: F) -> JoinHandle<()>
where F: Future<Output = Result<(), BotError>> + Send + 'static {
    tokio::spawn(async move {
        match task.await {
            Ok(()) => debug!(task = name, "background task finished"),
            Err(why) => error!(task = name, "background task failed: {}", why),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_task_is_contained() {
        let handle = spawn_logged("test", async { Err(BotError::GuildOnly) });
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn task_runs_to_completion() {
        let (tx, rx) = tokio::sync::oneshot::channel();

        spawn_logged("test", async move {
            tx.send(42).ok();
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(rx.await.unwrap(), 42);
    }
}
