// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The context every fill runs in: cancellation, progress reporting and the parallelism
//! budget.

use core::fmt::{Debug, Formatter};
use core::num::NonZeroUsize;
use core::ops::Range;
use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// How many threads a fill may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Use the global rayon thread pool.
    #[default]
    Auto,
    /// Use at most this many threads.
    Fixed(NonZeroUsize),
}

impl Parallelism {
    /// Run everything on the calling thread.
    pub const SINGLE: Self = Self::Fixed(NonZeroUsize::MIN);

    /// Whether work must run serially on the calling thread.
    pub fn is_serial(self) -> bool {
        self == Self::SINGLE
    }
}

/// A cancellation signal, shared between the caller and a running operation.
///
/// Cancellation is cooperative: operations check the token between rows and stop at
/// their own convenience.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that has not been canceled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every operation holding this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The stage of a fill that progress is reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawingOperation {
    /// Writing a color directly into a rectangle of pixels.
    WritingPixels,
    /// Computing the coverage of a path.
    GeneratingRegion,
    /// Painting covered pixels with a brush.
    PaintingRegion,
}

/// Receives progress updates. Called from worker threads.
pub trait ProgressSink: Send + Sync {
    /// `fraction` is between 0 and 1 and grows monotonically per stage.
    fn report(&self, operation: DrawingOperation, fraction: f32);
}

impl<F> ProgressSink for F
where
    F: Fn(DrawingOperation, f32) + Send + Sync,
{
    fn report(&self, operation: DrawingOperation, fraction: f32) {
        self(operation, fraction);
    }
}

/// The configuration for a fill that runs in its own context.
#[derive(Clone)]
pub struct FillConfig {
    max_parallelism: Parallelism,
    cancel: Option<CancelToken>,
    progress: Option<Arc<dyn ProgressSink>>,
    throw_on_cancel: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            max_parallelism: Parallelism::Auto,
            cancel: None,
            progress: None,
            throw_on_cancel: true,
        }
    }
}

impl FillConfig {
    /// Create the default configuration.
    ///
    /// It uses automatic parallelism, cannot be canceled, reports no progress and
    /// turns cancellation into [`FillError::Canceled`](pixfill_common::error::FillError::Canceled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parallelism budget.
    #[must_use]
    pub fn with_max_parallelism(mut self, max_parallelism: Parallelism) -> Self {
        self.max_parallelism = max_parallelism;
        self
    }

    /// Set the cancellation token.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set the progress sink.
    #[must_use]
    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Some(Arc::new(sink));
        self
    }

    /// Whether a canceled fill reports an error instead of returning `false`.
    #[must_use]
    pub fn with_throw_on_cancel(mut self, throw_on_cancel: bool) -> Self {
        self.throw_on_cancel = throw_on_cancel;
        self
    }

    /// The parallelism budget.
    pub fn max_parallelism(&self) -> Parallelism {
        self.max_parallelism
    }

    /// Whether a canceled fill reports an error instead of returning `false`.
    pub fn throw_on_cancel(&self) -> bool {
        self.throw_on_cancel
    }
}

impl Debug for FillConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FillConfig")
            .field("max_parallelism", &self.max_parallelism)
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.is_some())
            .field("throw_on_cancel", &self.throw_on_cancel)
            .finish()
    }
}

/// The context a fill operation runs in.
///
/// A context can be passed to nested fills, which then share its cancellation signal
/// and its parallelism budget. Clones share the thread pool of the original.
#[derive(Clone)]
pub struct OperationContext {
    parallelism: Parallelism,
    cancel: Option<CancelToken>,
    progress: Option<Arc<dyn ProgressSink>>,
    throw_on_cancel: bool,
    pool: Arc<OnceLock<Option<ThreadPool>>>,
}

impl OperationContext {
    /// The context used when the caller supplies none.
    ///
    /// It uses automatic parallelism and can be neither canceled nor observed.
    pub fn default_context() -> &'static Self {
        static DEFAULT: OnceLock<OperationContext> = OnceLock::new();
        DEFAULT.get_or_init(|| Self::from_config(&FillConfig::default()))
    }

    /// A context that runs everything on the calling thread, including nested fills.
    pub fn single_threaded() -> &'static Self {
        static SINGLE: OnceLock<OperationContext> = OnceLock::new();
        SINGLE.get_or_init(|| {
            Self::from_config(&FillConfig::default().with_max_parallelism(Parallelism::SINGLE))
        })
    }

    /// Create a fresh context from `config`.
    pub fn from_config(config: &FillConfig) -> Self {
        Self {
            parallelism: config.max_parallelism,
            cancel: config.cancel.clone(),
            progress: config.progress.clone(),
            throw_on_cancel: config.throw_on_cancel,
            pool: Arc::new(OnceLock::new()),
        }
    }

    /// The parallelism budget.
    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// Whether a canceled fill in this context reports an error instead of `false`.
    pub fn throw_on_cancel(&self) -> bool {
        self.throw_on_cancel
    }

    /// Whether cancellation was requested.
    pub fn is_cancellation_requested(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_canceled)
    }

    /// Forward a progress update to the sink, if there is one.
    pub fn report_progress(&self, operation: DrawingOperation, fraction: f32) {
        if let Some(sink) = &self.progress {
            sink.report(operation, fraction);
        }
    }

    /// Run `op` within the thread pool of this context.
    pub fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match self.pool() {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Call `f` for each row in `rows`, in parallel within the budget.
    ///
    /// Rows not yet started when cancellation is requested are skipped. Returns
    /// `false` if the operation was canceled.
    pub fn for_each_row(
        &self,
        operation: DrawingOperation,
        rows: Range<usize>,
        f: impl Fn(usize) + Sync + Send,
    ) -> bool {
        let progress = Progress::new(self, operation, rows.len());
        let row = |y: usize| {
            if self.is_cancellation_requested() {
                return;
            }
            f(y);
            progress.advance();
        };

        if self.parallelism.is_serial() {
            rows.for_each(row);
        } else {
            self.install(|| rows.into_par_iter().for_each(row));
        }

        !self.is_cancellation_requested()
    }

    /// Call `f` for each `chunk_len` long chunk of `buf` with the chunk index, in
    /// parallel within the budget.
    ///
    /// Like [`for_each_row`](Self::for_each_row), returns `false` if the operation
    /// was canceled.
    pub fn for_each_chunk<T: Send>(
        &self,
        operation: DrawingOperation,
        buf: &mut [T],
        chunk_len: usize,
        f: impl Fn(usize, &mut [T]) + Sync + Send,
    ) -> bool {
        if buf.is_empty() {
            return !self.is_cancellation_requested();
        }

        let progress = Progress::new(self, operation, buf.len().div_ceil(chunk_len));
        let chunk = |(i, chunk): (usize, &mut [T])| {
            if self.is_cancellation_requested() {
                return;
            }
            f(i, chunk);
            progress.advance();
        };

        if self.parallelism.is_serial() {
            buf.chunks_mut(chunk_len).enumerate().for_each(chunk);
        } else {
            self.install(|| buf.par_chunks_mut(chunk_len).enumerate().for_each(chunk));
        }

        !self.is_cancellation_requested()
    }

    fn pool(&self) -> Option<&ThreadPool> {
        let Parallelism::Fixed(threads) = self.parallelism else {
            return None;
        };
        if threads.get() == 1 {
            return None;
        }

        self.pool
            .get_or_init(|| {
                match ThreadPoolBuilder::new().num_threads(threads.get()).build() {
                    Ok(pool) => {
                        debug!("created a thread pool with {threads} threads");
                        Some(pool)
                    }
                    Err(e) => {
                        warn!("failed to create a thread pool, running inline: {e}");
                        None
                    }
                }
            })
            .as_ref()
    }
}

impl Debug for OperationContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OperationContext")
            .field("parallelism", &self.parallelism)
            .field("canceled", &self.is_cancellation_requested())
            .field("progress", &self.progress.is_some())
            .field("throw_on_cancel", &self.throw_on_cancel)
            .finish_non_exhaustive()
    }
}

struct Progress<'a> {
    ctx: &'a OperationContext,
    operation: DrawingOperation,
    total: usize,
    done: AtomicUsize,
}

impl<'a> Progress<'a> {
    fn new(ctx: &'a OperationContext, operation: DrawingOperation, total: usize) -> Self {
        Self {
            ctx,
            operation,
            total,
            done: AtomicUsize::new(0),
        }
    }

    fn advance(&self) {
        if self.ctx.progress.is_none() {
            return;
        }
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.ctx
            .report_progress(self.operation, done as f32 / self.total as f32);
    }
}
