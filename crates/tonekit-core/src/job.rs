//! Cooperative cancellation, progress reporting and background effect jobs.
//!
//! Long-running effects poll a [`CancelToken`] between passes and report a
//! completion fraction to a [`ProgressSink`]. [`EffectJob`] runs one effect on
//! a worker thread so a caller can keep responding while it computes.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::buffer::ImageBuffer;
use crate::effects::{apply_effect_cancellable, EffectKind, EffectParams};
use crate::error::EngineError;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once [`cancel`](Self::cancel) has been called.
    #[inline]
    pub fn check(&self) -> Result<(), EngineError> {
        if self.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Receives completion fractions in `[0, 1]`.
pub trait ProgressSink {
    fn report(&self, fraction: f32);
}

impl<F: Fn(f32)> ProgressSink for F {
    fn report(&self, fraction: f32) {
        self(fraction);
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _fraction: f32) {}
}

/// An effect computing on a worker thread.
///
/// The source image is moved into the job; the caller's copy, if any, is
/// never touched.
#[derive(Debug)]
pub struct EffectJob {
    token: CancelToken,
    handle: JoinHandle<Result<ImageBuffer, EngineError>>,
}

impl EffectJob {
    /// Start `kind` on a new thread.
    pub fn spawn<P>(image: ImageBuffer, kind: EffectKind, params: EffectParams, progress: P) -> Self
    where
        P: ProgressSink + Send + 'static,
    {
        Self::spawn_with_token(image, kind, params, CancelToken::new(), progress)
    }

    /// Start `kind` on a new thread, observing an existing token.
    pub fn spawn_with_token<P>(
        image: ImageBuffer,
        kind: EffectKind,
        params: EffectParams,
        token: CancelToken,
        progress: P,
    ) -> Self
    where
        P: ProgressSink + Send + 'static,
    {
        let worker_token = token.clone();
        debug!(effect = kind.name(), "Spawning effect job");
        let handle = thread::spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                apply_effect_cancellable(&image, kind, &params, &worker_token, &progress)
            }));
            match outcome {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(effect = kind.name(), %message, "Effect job panicked");
                    Err(EngineError::JobFailed(message))
                }
            }
        });
        Self { token, handle }
    }

    /// Ask the worker to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A handle that cancels this job from elsewhere.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result.
    pub fn join(self) -> Result<ImageBuffer, EngineError> {
        self.handle
            .join()
            .map_err(|payload| EngineError::JobFailed(panic_message(payload.as_ref())))?
    }
}

/// Best-effort text from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
