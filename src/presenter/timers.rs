//! Scheduled work for HUD instances
//!
//! Two kinds of timers exist: the one-shot auto-dismiss timer and the
//! repeating message-cycle timer. Cancellation is synchronous from the
//! caller's point of view: the token is cancelled and the task aborted
//! before the handle is dropped, and the presenter additionally bumps the
//! instance epoch so a tick that already fired but has not yet locked the
//! instance becomes a no-op.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tokio_util::sync::CancellationToken;

/// Handle to a scheduled task. Cancelled on drop.
#[derive(Debug)]
pub(crate) struct TimerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub(crate) fn cancel(&self) {
        self.token.cancel();
        self.task.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `work` once after `delay`.
pub(crate) fn one_shot<F>(delay: Duration, work: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let token = CancellationToken::new();
    let guard = token.clone();
    let task = tokio::spawn(async move {
        tokio::select! {
            _ = guard.cancelled() => {}
            _ = sleep(delay) => work.await,
        }
    });
    TimerHandle { token, task }
}

/// Run `tick` every `period`, starting one period from now.
pub(crate) fn repeating<F, Fut>(period: Duration, mut tick: F) -> TimerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let token = CancellationToken::new();
    let guard = token.clone();
    let task = tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        loop {
            tokio::select! {
                _ = guard.cancelled() => break,
                _ = interval.tick() => tick().await,
            }
        }
    });
    TimerHandle { token, task }
}
