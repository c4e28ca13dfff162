//! Scheduler port: timed waits between motion steps and after actions.

use std::future::Future;
use std::time::Duration;

/// Suspends the caller for a fixed duration.
///
/// A wait that has begun always runs to completion; there is no
/// cancellation.
pub trait Scheduler {
    fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

impl<T: Scheduler + Send + Sync> Scheduler for std::sync::Arc<T> {
    fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).wait(duration)
    }
}
