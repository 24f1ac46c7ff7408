//! Cooperative deadline and cancellation.

use crate::error::{FeatselError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Checked by optimizers between fitness evaluations.
///
/// Clones share the cancellation flag.
///
/// # Example
///
/// ```
/// use featsel::metaheuristics::StopSignal;
///
/// let stop = StopSignal::never();
/// assert!(stop.check().is_ok());
/// stop.cancel();
/// assert!(stop.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl StopSignal {
    /// Never fires unless cancelled.
    #[must_use]
    pub fn never() -> Self {
        Self::default()
    }

    /// Fires once `timeout` has elapsed from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            cancelled: Arc::default(),
        }
    }

    /// Request every holder to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `Ok` while the run may continue.
    ///
    /// # Errors
    ///
    /// Returns [`FeatselError::Aborted`] after cancellation or past the
    /// deadline.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(FeatselError::Aborted {
                reason: "cancelled".into(),
            });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(FeatselError::Aborted {
                reason: "deadline exceeded".into(),
            });
        }
        Ok(())
    }
}
