use crate::domain::ports::CallbackExecutor;
use tokio::runtime::Handle;

/// Delivers callbacks as tasks on a tokio runtime.
///
/// Callbacks therefore always run after the call that scheduled them returns.
#[derive(Debug, Clone)]
pub struct TokioCallbackExecutor {
    handle: Handle,
}

impl TokioCallbackExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl CallbackExecutor for TokioCallbackExecutor {
    fn execute(&self, task: Box<dyn FnOnce() + Send + 'static>) {
        self.handle.spawn(async move { task() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_task_runs_after_execute_returns() {
        let executor = TokioCallbackExecutor::current();
        let ran = Arc::new(AtomicBool::new(false));
        let (tx, rx) = oneshot::channel();

        let flag = ran.clone();
        executor.execute(Box::new(move || {
            flag.store(true, Ordering::SeqCst);
            let _ = tx.send(());
        }));
        // current-thread runtime: nothing ran before this task yields
        assert!(!ran.load(Ordering::SeqCst));

        rx.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }
}
