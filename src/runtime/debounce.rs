//! Per-event debouncing.
//!
//! Each event name has at most one pending timer. Arming a timer for an
//! event aborts whatever was pending for that same name, so only the last
//! call of a burst ever reaches the dispatcher.

use super::error::InvokeError;
use super::machine::Machine;
use crate::core::{Args, State};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

/// A scheduled timer, tagged with the generation that armed it.
#[derive(Debug)]
pub(crate) struct Armed {
    generation: u64,
    handle: AbortHandle,
}

impl Armed {
    pub(crate) fn abort(self) {
        self.handle.abort();
    }
}

/// Completion of a debounced call.
///
/// Resolves to the current state once the delay elapses and the event has
/// been dispatched, or to [`InvokeError::Superseded`] when a later call for
/// the same event replaced this one. Dropping a `Debounce` does not cancel
/// the timer.
#[must_use = "the debounced call still fires when dropped; await it to observe the result"]
pub struct Debounce<S: State> {
    event: String,
    inner: DebounceInner<S>,
}

enum DebounceInner<S: State> {
    Ready(Option<Result<S, InvokeError>>),
    Pending(JoinHandle<Result<S, InvokeError>>),
}

impl<S: State> Debounce<S> {
    pub(crate) fn ready(event: &str, result: Result<S, InvokeError>) -> Self {
        Self {
            event: event.to_string(),
            inner: DebounceInner::Ready(Some(result)),
        }
    }

    fn pending(event: &str, task: JoinHandle<Result<S, InvokeError>>) -> Self {
        Self {
            event: event.to_string(),
            inner: DebounceInner::Pending(task),
        }
    }

    /// Event this call was armed for.
    pub fn event(&self) -> &str {
        &self.event
    }
}

// No field is ever pinned: the join handle is itself `Unpin`.
impl<S: State> Unpin for Debounce<S> {}

impl<S: State> Future for Debounce<S> {
    type Output = Result<S, InvokeError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.inner {
            DebounceInner::Ready(result) => {
                Poll::Ready(result.take().expect("Debounce polled after completion"))
            }
            DebounceInner::Pending(task) => match Pin::new(task).poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Ok(result)) => Poll::Ready(result),
                Poll::Ready(Err(err)) if err.is_cancelled() => {
                    Poll::Ready(Err(InvokeError::Superseded {
                        event: this.event.clone(),
                    }))
                }
                Poll::Ready(Err(err)) => std::panic::resume_unwind(err.into_panic()),
            },
        }
    }
}

impl<S: State> Machine<S> {
    /// Dispatch `event` after `wait`, unless another call for the same event
    /// arrives first.
    ///
    /// Any timer already pending for `event` is cancelled before the new one
    /// is armed. A `wait` of `None` only cancels and resolves immediately to
    /// the current state. Timers run on the ambient tokio runtime; without
    /// one the call resolves to [`InvokeError::NoRuntime`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use switchboard::{args, create_machine, ActionTable, Registry};
    /// use std::time::Duration;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let machine = create_machine(
    ///     "idle",
    ///     Registry::<String>::new()
    ///         .state("idle", ActionTable::new().on("search", "searching"))
    ///         .state("searching", ActionTable::new()),
    /// )
    /// .unwrap();
    ///
    /// let first = machine.debounce("search", Duration::from_millis(20), args!["r"]);
    /// let last = machine.debounce("search", Duration::from_millis(20), args!["rust"]);
    ///
    /// assert!(first.await.is_err());
    /// assert_eq!(last.await.unwrap(), "searching");
    /// # }
    /// ```
    pub fn debounce(
        &self,
        event: &str,
        wait: impl Into<Option<Duration>>,
        args: Args,
    ) -> Debounce<S> {
        let mut timers = self.inner.timers.lock();
        if let Some(previous) = timers.remove(event) {
            debug!(event, generation = previous.generation, "debounced call superseded");
            previous.abort();
        }

        let Some(wait) = wait.into() else {
            return Debounce::ready(event, Ok(self.current()));
        };

        let Ok(runtime) = Handle::try_current() else {
            return Debounce::ready(
                event,
                Err(InvokeError::NoRuntime {
                    event: event.to_string(),
                }),
            );
        };

        let generation = self.inner.next_timer.fetch_add(1, Ordering::Relaxed);
        let machine = self.downgrade();
        let name = event.to_string();
        let task = runtime.spawn(async move {
            tokio::time::sleep(wait).await;
            let Some(machine) = Machine::from_weak(&machine) else {
                return Err(InvokeError::MachineDropped { event: name });
            };
            if !machine.disarm(&name, generation) {
                return Err(InvokeError::Superseded { event: name });
            }
            debug!(event = %name, generation, "debounced call firing");
            Ok(machine.invoke(&name, args))
        });

        let wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        debug!(event, generation, wait_ms, "debounced call armed");
        timers.insert(
            event.to_string(),
            Armed {
                generation,
                handle: task.abort_handle(),
            },
        );
        Debounce::pending(event, task)
    }

    /// Cancel the pending debounced call for `event`.
    ///
    /// Returns whether a call was pending.
    pub fn cancel_debounce(&self, event: &str) -> bool {
        match self.inner.timers.lock().remove(event) {
            Some(armed) => {
                debug!(event, generation = armed.generation, "debounced call cancelled");
                armed.abort();
                true
            }
            None => false,
        }
    }

    /// Whether a debounced call for `event` is waiting to fire.
    pub fn is_debouncing(&self, event: &str) -> bool {
        self.inner.timers.lock().contains_key(event)
    }

    /// Clear the timer entry for `event` if it still belongs to `generation`.
    fn disarm(&self, event: &str, generation: u64) -> bool {
        let mut timers = self.inner.timers.lock();
        match timers.get(event) {
            Some(armed) if armed.generation == generation => {
                timers.remove(event);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use crate::core::{ActionTable, Outcome, Registry};
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicUsize;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    struct Fixture {
        machine: Machine<String>,
        toggles: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<Vec<Value>>>>,
    }

    fn fixture() -> Fixture {
        let toggles = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let on_toggle = {
            let toggles = Arc::clone(&toggles);
            let seen = Arc::clone(&seen);
            move |_: &Machine<String>, args: &[Value]| {
                toggles.fetch_add(1, Ordering::SeqCst);
                seen.lock().push(args.to_vec());
                Outcome::goto("on")
            }
        };
        let registry = Registry::new()
            .state("off", ActionTable::new().on_fn("toggle", on_toggle))
            .state("on", ActionTable::new().on("toggle", "off"))
            .wildcard(ActionTable::new().on("reset", "off"));
        let machine = Machine::start("off".to_string(), registry, MachineConfig::default());
        Fixture {
            machine,
            toggles,
            seen,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn last_call_in_burst_wins() {
        let f = fixture();

        let first = f.machine.debounce("toggle", ms(50), vec![json!(1)]);
        let second = f.machine.debounce("toggle", ms(50), vec![json!(2)]);

        assert!(matches!(first.await, Err(InvokeError::Superseded { .. })));
        assert_eq!(second.await.unwrap(), "on");
        assert_eq!(f.toggles.load(Ordering::SeqCst), 1);
        assert_eq!(*f.seen.lock(), vec![vec![json!(2)]]);
    }

    #[tokio::test(start_paused = true)]
    async fn shorter_rearm_still_fires_once() {
        let f = fixture();

        let first = f.machine.debounce("toggle", ms(100), Vec::new());
        let second = f.machine.debounce("toggle", ms(50), Vec::new());

        assert_eq!(second.await.unwrap(), "on");
        assert!(first.await.is_err());
        tokio::time::sleep(ms(200)).await;
        assert_eq!(f.toggles.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn none_wait_only_cancels() {
        let f = fixture();

        let pending = f.machine.debounce("toggle", ms(50), Vec::new());
        assert!(f.machine.is_debouncing("toggle"));

        let cancel = f.machine.debounce("toggle", None, Vec::new());
        assert_eq!(cancel.await.unwrap(), "off");
        assert!(!f.machine.is_debouncing("toggle"));

        assert!(matches!(pending.await, Err(InvokeError::Superseded { .. })));
        tokio::time::sleep(ms(100)).await;
        assert_eq!(f.toggles.load(Ordering::SeqCst), 0);
        assert_eq!(f.machine.current(), "off");
    }

    #[tokio::test(start_paused = true)]
    async fn events_debounce_independently() {
        let f = fixture();

        let toggle = f.machine.debounce("toggle", ms(10), Vec::new());
        let reset = f.machine.debounce("reset", ms(30), Vec::new());

        assert_eq!(toggle.await.unwrap(), "on");
        assert_eq!(reset.await.unwrap(), "off");
        assert_eq!(f.toggles.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn direct_calls_are_not_blocked_by_pending_timer() {
        let f = fixture();

        let pending = f.machine.debounce("reset", ms(50), Vec::new());
        assert_eq!(f.machine.invoke("toggle", Vec::new()), "on");
        assert_eq!(pending.await.unwrap(), "off");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_debounce_reports_pending_call() {
        let f = fixture();

        assert!(!f.machine.cancel_debounce("toggle"));
        let pending = f.machine.debounce("toggle", ms(50), Vec::new());
        assert!(f.machine.cancel_debounce("toggle"));
        assert!(pending.await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_wait_arms_and_cancels() {
        let f = fixture();

        let pending = f.machine.debounce("toggle", Duration::MAX, Vec::new());
        assert!(f.machine.is_debouncing("toggle"));
        assert!(f.machine.cancel_debounce("toggle"));

        assert!(pending.await.is_err());
        assert_eq!(f.toggles.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_machine_cancels_timers() {
        let f = fixture();
        let toggles = Arc::clone(&f.toggles);

        let pending = f.machine.debounce("toggle", ms(50), Vec::new());
        drop(f);

        assert!(pending.await.is_err());
        assert_eq!(toggles.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn without_runtime_resolves_to_error() {
        let f = fixture();
        let debounce = f.machine.debounce("toggle", ms(10), Vec::new());

        let result = block_on(debounce);
        assert_eq!(
            result,
            Err(InvokeError::NoRuntime {
                event: "toggle".to_string()
            })
        );
        assert!(!f.machine.is_debouncing("toggle"));
    }

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }
}
