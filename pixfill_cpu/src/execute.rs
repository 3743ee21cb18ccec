// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Running a fill operation in one of several invocation shapes.
//!
//! An operation is a closure taking an [`OperationContext`] and returning whether it
//! ran to completion. It can be run inline with the default context, inline with a
//! context derived from a [`FillConfig`], inline in a context supplied by the caller,
//! or scheduled on a worker and collected later through an [`AsyncHandle`] or a
//! [`FillFuture`]. Each of them runs the operation exactly once and reports the same
//! result for the same operation.

use crate::context::{FillConfig, OperationContext};
use core::fmt::{Debug, Formatter};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures_intrusive::channel::shared::{GenericOneshotReceiver, oneshot_channel};
use parking_lot::RawMutex;
use pixfill_common::error::{FillError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The result of a scheduled operation, including a panic it may have raised.
type Outcome = std::thread::Result<Result<bool>>;

/// Identifies the kind of operation an [`AsyncHandle`] was created for.
pub trait OperationTag: Copy + Eq + Debug + Send + 'static {
    /// The name of the operation, used in error messages.
    fn name(self) -> &'static str;
}

/// Run `op` on the calling thread with the default context.
pub fn run(op: impl FnOnce(&OperationContext) -> Result<bool>) -> Result<bool> {
    run_in(OperationContext::default_context(), op)
}

/// Run `op` on the calling thread with a new context derived from `config`.
///
/// Returns `Ok(false)` if the operation was canceled, unless `config` asks for
/// [`FillError::Canceled`] instead.
pub fn run_with(
    config: &FillConfig,
    op: impl FnOnce(&OperationContext) -> Result<bool>,
) -> Result<bool> {
    run_in(&OperationContext::from_config(config), op)
}

/// Run `op` on the calling thread in `ctx`, which may belong to a larger operation.
pub fn run_in(
    ctx: &OperationContext,
    op: impl FnOnce(&OperationContext) -> Result<bool>,
) -> Result<bool> {
    let completed = op(ctx)?;
    if completed {
        Ok(true)
    } else if ctx.throw_on_cancel() {
        Err(FillError::Canceled)
    } else {
        Ok(false)
    }
}

/// A pending operation started by [`begin`].
pub struct AsyncHandle<K> {
    tag: K,
    completed: Arc<AtomicBool>,
    receiver: GenericOneshotReceiver<RawMutex, Outcome>,
}

impl<K: OperationTag> AsyncHandle<K> {
    /// The operation this handle was created for.
    pub fn tag(&self) -> K {
        self.tag
    }

    /// Whether the operation has finished, so that [`end`] will not block.
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }
}

impl<K: Debug> Debug for AsyncHandle<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AsyncHandle")
            .field("tag", &self.tag)
            .field("completed", &self.completed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

/// Schedule `op` on a worker with a new context derived from `config`.
///
/// The returned handle must be passed to [`end`] together with the same tag.
pub fn begin<K: OperationTag>(
    tag: K,
    config: &FillConfig,
    op: impl FnOnce(&OperationContext) -> Result<bool> + Send + 'static,
) -> AsyncHandle<K> {
    let completed = Arc::new(AtomicBool::new(false));
    let receiver = schedule(config, completed.clone(), op);

    AsyncHandle {
        tag,
        completed,
        receiver,
    }
}

/// Wait for the operation behind `handle` and return its result.
///
/// Fails with [`FillError::HandleMismatch`] if the handle was not created for
/// `expected`, whatever the outcome of the operation. A panic raised by the
/// operation is resumed on the calling thread.
///
/// This blocks the calling thread until the operation finishes. Operations run on the
/// global rayon pool, so this must not be called from a rayon worker thread, where it
/// can starve the pool of the thread the operation needs.
pub fn end<K: OperationTag>(handle: AsyncHandle<K>, expected: K) -> Result<bool> {
    if handle.tag != expected {
        return Err(FillError::HandleMismatch {
            expected: expected.name(),
            found: handle.tag.name(),
        });
    }

    let outcome = pollster::block_on(handle.receiver.receive());
    settle(outcome)
}

/// Schedule `op` on a worker with a new context derived from `config`, returning a
/// future that resolves to its result.
pub fn spawn(
    config: &FillConfig,
    op: impl FnOnce(&OperationContext) -> Result<bool> + Send + 'static,
) -> FillFuture {
    let receiver = schedule(config, Arc::new(AtomicBool::new(false)), op);

    FillFuture {
        inner: Box::pin(async move { settle(receiver.receive().await) }),
    }
}

/// The result of a fill scheduled on a worker.
///
/// Resolves to the same value the blocking call would have returned. A panic raised
/// by the operation is resumed in the task polling the future.
#[must_use = "futures do nothing unless awaited"]
pub struct FillFuture {
    inner: Pin<Box<dyn Future<Output = Result<bool>> + Send>>,
}

impl Future for FillFuture {
    type Output = Result<bool>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl Debug for FillFuture {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FillFuture").finish_non_exhaustive()
    }
}

fn schedule(
    config: &FillConfig,
    completed: Arc<AtomicBool>,
    op: impl FnOnce(&OperationContext) -> Result<bool> + Send + 'static,
) -> GenericOneshotReceiver<RawMutex, Outcome> {
    let ctx = OperationContext::from_config(config);
    let (sender, receiver) = oneshot_channel();

    rayon::spawn(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_in(&ctx, op)));
        completed.store(true, Ordering::Release);
        // The receiver is gone if the handle was dropped or rejected, nobody is
        // interested in the result then.
        let _ = sender.send(outcome);
    });

    receiver
}

fn settle(outcome: Option<Outcome>) -> Result<bool> {
    match outcome {
        Some(Ok(result)) => result,
        Some(Err(payload)) => panic::resume_unwind(payload),
        None => Err(FillError::WorkerDisconnected),
    }
}

#[cfg(test)]
mod tests {
    use super::{OperationTag, begin, end, run, run_in, run_with, spawn};
    use crate::context::{CancelToken, FillConfig, OperationContext};
    use pixfill_common::error::{FillError, Result};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Tag {
        Left,
        Right,
    }

    impl OperationTag for Tag {
        fn name(self) -> &'static str {
            match self {
                Self::Left => "left",
                Self::Right => "right",
            }
        }
    }

    fn canceled(throw_on_cancel: bool) -> FillConfig {
        let token = CancelToken::new();
        token.cancel();
        FillConfig::new()
            .with_cancel_token(token)
            .with_throw_on_cancel(throw_on_cancel)
    }

    fn observe_cancel(ctx: &OperationContext) -> Result<bool> {
        Ok(!ctx.is_cancellation_requested())
    }

    fn counting(
        calls: &Arc<AtomicUsize>,
    ) -> impl FnOnce(&OperationContext) -> Result<bool> + Send + 'static {
        let calls = calls.clone();
        move |_| {
            calls.fetch_add(1, Ordering::Relaxed);
            Ok(true)
        }
    }

    #[test]
    fn runs_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = FillConfig::new();

        assert!(run(counting(&calls)).unwrap());
        assert!(run_with(&config, counting(&calls)).unwrap());
        assert!(run_in(OperationContext::single_threaded(), counting(&calls)).unwrap());
        assert!(end(begin(Tag::Left, &config, counting(&calls)), Tag::Left).unwrap());
        assert!(pollster::block_on(spawn(&config, counting(&calls))).unwrap());

        assert_eq!(calls.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn cancellation_result_depends_on_config() {
        assert!(!run_with(&canceled(false), observe_cancel).unwrap());
        assert!(matches!(
            run_with(&canceled(true), observe_cancel),
            Err(FillError::Canceled)
        ));

        let handle = begin(Tag::Left, &canceled(false), observe_cancel);
        assert!(!end(handle, Tag::Left).unwrap());
        assert!(matches!(
            pollster::block_on(spawn(&canceled(true), observe_cancel)),
            Err(FillError::Canceled)
        ));
    }

    #[test]
    fn caller_context_is_reused() {
        let outer = OperationContext::from_config(&canceled(false));
        let result = run_in(&outer, |ctx| {
            assert!(core::ptr::eq(ctx, &outer));
            observe_cancel(ctx)
        });
        assert!(!result.unwrap());
    }

    #[test]
    fn mismatched_handle_is_rejected() {
        let handle = begin(Tag::Left, &FillConfig::new(), |_| Ok(true));
        assert_eq!(handle.tag(), Tag::Left);

        assert!(matches!(
            end(handle, Tag::Right),
            Err(FillError::HandleMismatch {
                expected: "right",
                found: "left"
            })
        ));
    }

    #[test]
    fn errors_propagate_unchanged() {
        let handle = begin(Tag::Right, &FillConfig::new(), |_| {
            Err(FillError::CoordinateOverflow)
        });
        assert!(matches!(
            end(handle, Tag::Right),
            Err(FillError::CoordinateOverflow)
        ));
    }

    #[test]
    fn handle_reports_completion() {
        let handle = begin(Tag::Left, &FillConfig::new(), |_| Ok(true));
        while !handle.is_completed() {
            std::thread::yield_now();
        }
        assert!(end(handle, Tag::Left).unwrap());
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn panics_are_resumed_by_end() {
        let handle = begin(Tag::Left, &FillConfig::new(), |_| panic!("boom"));
        let _ = end(handle, Tag::Left);
    }
}
