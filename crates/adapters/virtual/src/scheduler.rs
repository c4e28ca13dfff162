//! Tokio-backed scheduler with a simulation time scale.

use std::future::Future;
use std::time::Duration;

use workcell_app::ports::Scheduler;
use workcell_domain::error::{ValidationError, WorkcellError};

/// Sleeps on the tokio timer for `duration * time_scale`.
///
/// A scale of `1.0` is real time, `0.0` turns every wait into a no-op.
#[derive(Debug, Clone, Copy)]
pub struct TokioScheduler {
    time_scale: f64,
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

impl TokioScheduler {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeScale`] for negative, NaN or
    /// infinite factors.
    pub fn new(time_scale: f64) -> Result<Self, WorkcellError> {
        if !(time_scale.is_finite() && time_scale >= 0.0) {
            return Err(ValidationError::InvalidTimeScale(time_scale).into());
        }
        Ok(Self { time_scale })
    }

    #[must_use]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// The wall-clock time a wait of `duration` actually takes, saturating
    /// at [`Duration::MAX`].
    #[must_use]
    pub fn scaled(&self, duration: Duration) -> Duration {
        Duration::try_from_secs_f64(duration.as_secs_f64() * self.time_scale)
            .unwrap_or(Duration::MAX)
    }
}

impl Scheduler for TokioScheduler {
    fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        let scaled = self.scaled(duration);
        async move {
            if !scaled.is_zero() {
                tokio::time::sleep(scaled).await;
            }
        }
    }
}
