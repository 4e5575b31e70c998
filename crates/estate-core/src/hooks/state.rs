// ── Hook state and subscriptions ──
//
// Every hook keeps a `HookState` behind a `watch` channel. Actions flip
// `loading` on, await the service, then merge the outcome and flip
// `loading` off in one atomic `send_modify`, so subscribers never observe
// a half-applied result. Overlapping actions are counted; `loading` stays on
// until the last one settles.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::error::CoreError;

/// What a hook exposes to UI code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookState<D> {
    pub data: D,
    pub loading: bool,
    /// User-facing message of the last failed action.
    pub error: Option<String>,
}

/// Owner side of a hook's state.
#[derive(Debug)]
pub(crate) struct HookCell<D> {
    tx: watch::Sender<HookState<D>>,
    /// Actions started and not yet merged.
    in_flight: AtomicUsize,
}

impl<D: Clone + Send + Sync + 'static> HookCell<D> {
    pub(crate) fn new(data: D) -> Self {
        let (tx, _) = watch::channel(HookState {
            data,
            loading: false,
            error: None,
        });
        Self {
            tx,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn snapshot(&self) -> HookState<D> {
        self.tx.borrow().clone()
    }

    /// Read the current data without cloning it.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        f(&self.tx.borrow().data)
    }

    pub(crate) fn subscribe(&self) -> StateWatch<D> {
        StateWatch::new(self.tx.subscribe())
    }

    /// Local edit outside any request lifecycle.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut D)) {
        self.tx.send_modify(|state| f(&mut state.data));
    }

    pub(crate) fn clear_error(&self) {
        self.tx.send_if_modified(|state| state.error.take().is_some());
    }

    /// Run one action through the loading lifecycle.
    ///
    /// On success `merge` applies the result to the data; on failure the
    /// data is untouched and the error message is recorded. The result is
    /// handed back to the caller either way.
    pub(crate) async fn run<T, Fut>(
        &self,
        action: Fut,
        merge: impl FnOnce(&mut D, &T),
    ) -> Result<T, CoreError>
    where
        Fut: Future<Output = Result<T, CoreError>>,
    {
        self.tx.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::AcqRel);
            state.loading = true;
            state.error = None;
        });

        let result = action.await;

        self.tx.send_modify(|state| {
            match &result {
                Ok(value) => merge(&mut state.data, value),
                Err(e) => state.error = Some(e.to_string()),
            }
            let remaining = self.in_flight.fetch_sub(1, Ordering::AcqRel) - 1;
            state.loading = remaining > 0;
        });
        result
    }
}

// ── Subscriptions ────────────────────────────────────────────────────

/// A subscription to one hook's state.
///
/// Offers the snapshot taken at subscription time, the latest value, and
/// change notification via `changed()` or a `Stream`.
pub struct StateWatch<D: Clone + Send + Sync + 'static> {
    current: HookState<D>,
    receiver: watch::Receiver<HookState<D>>,
}

impl<D: Clone + Send + Sync + 'static> StateWatch<D> {
    fn new(receiver: watch::Receiver<HookState<D>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &HookState<D> {
        &self.current
    }

    pub fn latest(&self) -> HookState<D> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the hook is dropped.
    pub async fn changed(&mut self) -> Option<HookState<D>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> StateStream<D> {
        StateStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` of state snapshots, starting with the current one.
pub struct StateStream<D: Clone + Send + Sync + 'static> {
    inner: WatchStream<HookState<D>>,
}

impl<D: Clone + Send + Sync + 'static> Stream for StateStream<D> {
    type Item = HookState<D>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_action_keeps_data_and_records_message() {
        let cell = HookCell::new(vec![1, 2]);
        let result = cell
            .run(
                async { Err::<i32, _>(CoreError::rejected(None, "Không thể tạo")) },
                |data, v| data.push(*v),
            )
            .await;

        assert!(result.is_err());
        let state = cell.snapshot();
        assert_eq!(state.data, vec![1, 2]);
        assert_eq!(state.error.as_deref(), Some("Không thể tạo"));
        assert!(!state.loading);

        cell.clear_error();
        assert!(cell.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn subscribers_see_loading_then_result() {
        let cell = HookCell::new(Vec::<i32>::new());
        let mut watch = cell.subscribe();
        assert!(!watch.current().loading);

        let (tx, rx) = tokio::sync::oneshot::channel::<i32>();
        let run = cell.run(async move { Ok(rx.await.unwrap()) }, |data, v| data.push(*v));
        let observe = async {
            let during = watch.changed().await.unwrap();
            assert!(during.loading);
            tx.send(7).unwrap();
            let after = watch.changed().await.unwrap();
            assert!(!after.loading);
            assert_eq!(after.data, vec![7]);
        };

        let (result, ()) = tokio::join!(run, observe);
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn loading_holds_until_last_overlapping_action_settles() {
        let cell = HookCell::new(Vec::<i32>::new());
        let (first_tx, first_rx) = tokio::sync::oneshot::channel::<i32>();
        let (second_tx, second_rx) = tokio::sync::oneshot::channel::<i32>();

        let first = cell.run(async move { Ok(first_rx.await.unwrap()) }, |data, v| data.push(*v));
        let second = cell.run(async move { Ok(second_rx.await.unwrap()) }, |data, v| data.push(*v));
        let drive = async {
            tokio::task::yield_now().await;
            assert!(cell.snapshot().loading);

            first_tx.send(1).unwrap();
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            let mid = cell.snapshot();
            assert_eq!(mid.data, vec![1]);
            assert!(mid.loading, "second action still in flight");

            second_tx.send(2).unwrap();
        };

        let (a, b, ()) = tokio::join!(first, second, drive);
        assert_eq!((a.unwrap(), b.unwrap()), (1, 2));
        let done = cell.snapshot();
        assert_eq!(done.data, vec![1, 2]);
        assert!(!done.loading);
    }
}
