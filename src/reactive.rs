//! Combine-latest over watch channels

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

type CombineFn<A, B, T> = dyn Fn(&A, &B, &T) -> T + Send + Sync;

/// Derives an output value from the latest values of two inputs.
///
/// Every change of either input recomputes the output and publishes it to
/// all subscribers. The combine function also receives the current output so
/// it can carry over fields it does not derive.
///
/// The recomputation task only runs while someone is subscribed. Once the
/// last subscriber is gone it waits for the grace period, and stops if
/// nobody subscribed again in the meantime. Input changes are still
/// combined during that wait. The next `subscribe` restarts it
/// from the latest inputs. Dropping the combinator stops the task.
pub struct SharedCombine<A, B, T> {
    a: watch::Receiver<A>,
    b: watch::Receiver<B>,
    output: Arc<watch::Sender<T>>,
    combine: Arc<CombineFn<A, B, T>>,
    grace: Duration,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<A, B, T> SharedCombine<A, B, T>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub fn new(
        a: watch::Receiver<A>,
        b: watch::Receiver<B>,
        initial: T,
        grace: Duration,
        combine: impl Fn(&A, &B, &T) -> T + Send + Sync + 'static,
    ) -> Self {
        let (output, _) = watch::channel(initial);
        Self {
            a,
            b,
            output: Arc::new(output),
            combine: Arc::new(combine),
            grace,
            task: Arc::new(Mutex::new(None)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        // The receiver must exist before the running check, see `run`
        let receiver = self.output.subscribe();
        self.ensure_running();
        receiver
    }

    /// Updates fields of the output that the combination does not derive.
    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.output.send_modify(modify);
    }

    /// Handle for publishing non-derived fields from other tasks.
    pub fn sender(&self) -> Arc<watch::Sender<T>> {
        Arc::clone(&self.output)
    }

    pub fn current(&self) -> watch::Ref<'_, T> {
        self.output.borrow()
    }

    pub fn is_running(&self) -> bool {
        match self.task.lock() {
            Ok(task) => task.as_ref().is_some_and(|handle| !handle.is_finished()),
            Err(_) => false,
        }
    }

    fn ensure_running(&self) {
        let Ok(mut task) = self.task.lock() else {
            return;
        };
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        debug!("Starting combination");
        *task = Some(tokio::spawn(run(
            self.a.clone(),
            self.b.clone(),
            Arc::clone(&self.output),
            Arc::clone(&self.combine),
            self.grace,
            Arc::clone(&self.task),
        )));
    }
}

impl<A, B, T> Drop for SharedCombine<A, B, T> {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}

/// Recomputes until the inputs close or the grace period passes without
/// subscribers.
///
/// The stop decision is taken under the `task` lock and clears the slot, so a
/// concurrent `subscribe` either keeps this task alive or starts a new one.
async fn run<A, B, T>(
    mut a: watch::Receiver<A>,
    mut b: watch::Receiver<B>,
    output: Arc<watch::Sender<T>>,
    combine: Arc<CombineFn<A, B, T>>,
    grace: Duration,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
) {
    let recompute = |a: &mut watch::Receiver<A>, b: &mut watch::Receiver<B>| {
        let a = a.borrow_and_update();
        let b = b.borrow_and_update();
        output.send_modify(|current| *current = combine(&a, &b, current));
    };

    // Inputs may have moved while the task was stopped
    recompute(&mut a, &mut b);

    let grace_timer = tokio::time::sleep(grace);
    tokio::pin!(grace_timer);
    let mut idle = false;

    loop {
        tokio::select! {
            changed = a.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            changed = b.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = output.closed(), if !idle => {
                idle = true;
                grace_timer.as_mut().reset(Instant::now() + grace);
                continue;
            }
            _ = &mut grace_timer, if idle => {
                let stop = match task.lock() {
                    Ok(mut slot) if output.receiver_count() == 0 => {
                        *slot = None;
                        true
                    }
                    Ok(_) => false,
                    Err(_) => true,
                };
                if stop {
                    debug!("No subscribers after {:?}, stopping combination", grace);
                    break;
                }
                idle = false;
                continue;
            }
        }
        recompute(&mut a, &mut b);
    }
}
