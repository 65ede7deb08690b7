//! Live device position tracking.
//!
//! A [`PositionTracker`] adapts the platform positioning facility into a
//! single validated stream of [`PositionSample`]s delivered to caller
//! callbacks from a background task. Samples never feed into route
//! geometry.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::traits::{PositionSource, PositionStream};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("no position received within {0:?}")]
    Timeout(Duration),

    #[error("positioning failed: {0}")]
    Platform(String),

    #[error("position tracker is already running")]
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub coordinate: Coordinate,
    pub captured_at: DateTime<Utc>,
    pub accuracy_meters: Option<f64>,
}

impl PositionSample {
    pub fn new(lat: f64, lng: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            coordinate: Coordinate::new(lat, lng),
            captured_at,
            accuracy_meters: None,
        }
    }

    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy_meters = Some(meters);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Ask the platform for its most precise (and most power hungry) fix.
    pub high_accuracy: bool,
    /// Samples older than this on arrival are discarded.
    pub max_sample_age_ms: u64,
    /// How long to wait for a sample before reporting a timeout. Zero
    /// disables timeout reporting.
    pub timeout_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            max_sample_age_ms: 10_000,
            timeout_ms: 10_000,
        }
    }
}

impl TrackerConfig {
    pub fn max_sample_age(&self) -> Duration {
        Duration::from_millis(self.max_sample_age_ms)
    }

    /// `None` when timeouts are disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Owns at most one live subscription to a [`PositionSource`].
pub struct PositionTracker<S> {
    source: S,
    config: TrackerConfig,
    session: Option<CancellationToken>,
}

impl<S: PositionSource> PositionTracker<S> {
    pub fn new(source: S, config: TrackerConfig) -> Self {
        Self {
            source,
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// True while a started session has been neither stopped nor closed
    /// by the platform.
    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.is_cancelled())
    }

    /// Subscribes to the platform and starts delivering samples.
    ///
    /// Returns `Ok(None)` when the platform has no positioning support;
    /// nothing is subscribed and no callback will ever run. Starting
    /// while a session is live is rejected with
    /// [`TrackerError::AlreadyRunning`].
    ///
    /// Must be called from within a tokio runtime; outside one it fails
    /// with [`TrackerError::Platform`] before subscribing.
    pub fn start<F, E>(&mut self, on_sample: F, on_error: E) -> Result<Option<TrackerHandle>, TrackerError>
    where
        F: FnMut(PositionSample) + Send + 'static,
        E: FnMut(TrackerError) + Send + 'static,
    {
        if self.is_running() {
            return Err(TrackerError::AlreadyRunning);
        }

        if !self.source.is_supported() {
            debug!("positioning unsupported on this platform");
            return Ok(None);
        }

        let runtime = Handle::try_current().map_err(|err| TrackerError::Platform(err.to_string()))?;
        let stream = self.source.subscribe(&self.config)?;
        let cancel = CancellationToken::new();
        let task = runtime.spawn(run(
            stream,
            self.config.clone(),
            cancel.clone(),
            on_sample,
            on_error,
        ));

        debug!(
            high_accuracy = self.config.high_accuracy,
            timeout_ms = self.config.timeout_ms,
            "position tracking started"
        );
        self.session = Some(cancel.clone());

        Ok(Some(TrackerHandle {
            cancel,
            task: Some(task),
        }))
    }
}

/// Handle to a running tracking session.
///
/// Dropping the handle cancels the session without waiting for it.
pub struct TrackerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TrackerHandle {
    /// Unsubscribes and waits for the delivery task to finish.
    ///
    /// Once this returns no callback runs again. Repeated calls are
    /// no-ops. Must not be awaited from inside a tracker callback.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "position tracker task ended abnormally");
            }
            debug!("position tracking stopped");
        }
    }

    /// True once the session has ended for any reason.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<F, E>(
    mut stream: PositionStream,
    config: TrackerConfig,
    cancel: CancellationToken,
    mut on_sample: F,
    mut on_error: E,
) where
    F: FnMut(PositionSample),
    E: FnMut(TrackerError),
{
    let timeout = config.timeout();
    let max_age = TimeDelta::from_std(config.max_sample_age()).unwrap_or(TimeDelta::MAX);
    // One timeout report per silent stretch; re-armed by the next delivered sample.
    let mut timeout_armed = true;

    loop {
        let next = tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            next = next_update(&mut stream, timeout) => next,
        };

        if cancel.is_cancelled() {
            break;
        }

        match next {
            Err(waited) => {
                if timeout_armed {
                    timeout_armed = false;
                    on_error(TrackerError::Timeout(waited));
                }
            }
            Ok(None) => {
                debug!("position source closed the stream");
                break;
            }
            Ok(Some(Ok(sample))) => {
                if !sample.coordinate.is_valid() {
                    debug!(
                        lat = sample.coordinate.lat,
                        lng = sample.coordinate.lng,
                        "dropping invalid position sample"
                    );
                    continue;
                }

                let age = Utc::now() - sample.captured_at;
                if age > max_age {
                    debug!(age_ms = age.num_milliseconds(), "dropping stale position sample");
                    continue;
                }

                timeout_armed = true;
                on_sample(sample);
            }
            Ok(Some(Err(err))) => on_error(err),
        }
    }

    cancel.cancel();
}

/// Next item from the platform, or `Err(waited)` when the timeout elapsed first.
async fn next_update(
    stream: &mut PositionStream,
    timeout: Option<Duration>,
) -> Result<Option<Result<PositionSample, TrackerError>>, Duration> {
    match timeout {
        Some(waited) => time::timeout(waited, stream.recv()).await.map_err(|_| waited),
        None => Ok(stream.recv().await),
    }
}
