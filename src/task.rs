//! Task polling utilities
//!
//! The UI thread never awaits. Background work (the map geometry download)
//! is spawned on the tokio runtime and checked once per frame.

use futures::FutureExt;
use tokio::task::JoinHandle;

/// Result of polling a task
pub enum PollResult<T> {
    /// No task to poll (task was None)
    NoTask,
    /// Task is still running
    Pending,
    /// Task completed with result (may be Ok or join error)
    Complete(Result<T, tokio::task::JoinError>),
}

/// Poll an optional task handle and take its result if finished.
///
/// The handle is cleared once the task completes, so a finished task is
/// reported exactly once.
///
/// # Example
/// ```ignore
/// match poll_task(&mut self.task) {
///     PollResult::Complete(Ok(Ok(geometry))) => { /* fetched */ }
///     PollResult::Complete(Ok(Err(e))) => { /* fetch or parse failed */ }
///     PollResult::Complete(Err(e)) => { /* task panicked */ }
///     PollResult::Pending => ctx.request_repaint(),
///     PollResult::NoTask => {}
/// }
/// ```
pub fn poll_task<T>(task: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    let Some(handle) = task.as_mut() else {
        return PollResult::NoTask;
    };

    if !handle.is_finished() {
        return PollResult::Pending;
    }

    match handle.now_or_never() {
        Some(result) => {
            *task = None;
            PollResult::Complete(result)
        }
        None => {
            // is_finished() said otherwise; keep the handle and poll next frame
            tracing::warn!("Task not ready despite is_finished()");
            PollResult::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_task() {
        let mut task: Option<JoinHandle<u32>> = None;
        assert!(matches!(poll_task(&mut task), PollResult::NoTask));
    }

    #[tokio::test]
    async fn test_completed_task_is_taken() {
        let mut task = Some(tokio::spawn(async { 42u32 }));
        while task.as_ref().is_some_and(|t| !t.is_finished()) {
            tokio::task::yield_now().await;
        }

        assert!(matches!(poll_task(&mut task), PollResult::Complete(Ok(42))));
        assert!(task.is_none());
        assert!(matches!(poll_task(&mut task), PollResult::NoTask));
    }
}
