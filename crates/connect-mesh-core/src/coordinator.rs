// ── Per-device polling coordinator ──
//
// One coordinator owns one device's refresh lifecycle: a primary status
// poll on a fixed interval, plus two opportunistic subtasks spawned from
// it (device-detail refresh and new-device discovery). Each of the three
// is single-flight; they do not exclude one another.
//
// Subtask failures are logged and absorbed. Primary poll failures become
// `PollOutcome::Failed` in the published snapshot, and a rejected token
// is handed to the host as a reauth request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::MeshApi;
use crate::config::{STALE_AFTER, SUBTASK_TIMEOUT, SessionConfig};
use crate::error::CoreError;
use crate::host::{EntityRequest, MeshHost};
use crate::model::Device;
use crate::status::DeviceStatus;
use crate::store::DeviceRegistry;

// ── Snapshot ─────────────────────────────────────────────────────────

/// Result of the most recent primary poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    /// No cycle has finished yet.
    Pending,
    Succeeded,
    Failed {
        error: String,
        /// The token was rejected; reauth has been requested.
        auth: bool,
    },
}

/// What a host reads about one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollSnapshot {
    pub device_id: String,
    #[serde(flatten)]
    pub outcome: PollOutcome,
    /// Last successfully fetched status. Kept across failed cycles.
    pub status: Option<DeviceStatus>,
    pub last_updated: DateTime<Utc>,
}

impl PollSnapshot {
    fn pending(device: &Device) -> Self {
        Self {
            device_id: device.id().to_owned(),
            outcome: PollOutcome::Pending,
            status: None,
            last_updated: device.last_updated(),
        }
    }

    /// Last cycle succeeded with a status, and it is recent enough.
    pub fn is_available(&self) -> bool {
        self.is_available_at(Utc::now())
    }

    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        let fresh = (now - self.last_updated)
            .to_std()
            .map_or(true, |age| age <= STALE_AFTER);
        matches!(self.outcome, PollOutcome::Succeeded) && self.status.is_some() && fresh
    }
}

// ── In-flight guard ──────────────────────────────────────────────────

/// Claims a single-flight flag; releases it on drop.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn try_claim(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Tracks when a periodic subtask last started. Due once strictly more
/// than `every` has passed.
#[derive(Debug)]
struct Schedule {
    every: Duration,
    last: Mutex<Option<Instant>>,
}

impl Schedule {
    fn new(every: Duration, last: Option<Instant>) -> Self {
        Self {
            every,
            last: Mutex::new(last),
        }
    }

    fn is_due(&self, now: Instant) -> bool {
        let last = *self.last.lock().unwrap_or_else(PoisonError::into_inner);
        last.is_none_or(|at| now.duration_since(at) > self.every)
    }

    fn mark(&self, now: Instant) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(now);
    }
}

// ── Coordinator ──────────────────────────────────────────────────────

/// Drives polling for a single device.
///
/// Cheaply cloneable. Call [`start`](Self::start) to begin the scheduled
/// loop and [`shutdown`](Self::shutdown) to stop it.
pub struct DeviceCoordinator<H: MeshHost> {
    inner: Arc<Inner<H>>,
}

impl<H: MeshHost> Clone for DeviceCoordinator<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<H: MeshHost> {
    api: MeshApi,
    host: Arc<H>,
    registry: Arc<DeviceRegistry>,
    device: ArcSwap<Device>,
    network_id: String,
    scan_interval: Duration,
    snapshot: watch::Sender<PollSnapshot>,
    /// Held for the duration of a primary poll.
    poll_lock: tokio::sync::Mutex<()>,
    details: Schedule,
    details_in_flight: Arc<AtomicBool>,
    discovery: Schedule,
    discovery_in_flight: Arc<AtomicBool>,
    cancel: CancellationToken,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl<H: MeshHost> DeviceCoordinator<H> {
    pub fn new(
        api: MeshApi,
        device: Arc<Device>,
        registry: Arc<DeviceRegistry>,
        host: Arc<H>,
        config: &SessionConfig,
    ) -> Self {
        Self::with_cancellation(api, device, registry, host, config, CancellationToken::new())
    }

    /// Like [`new`](Self::new), stopping when `cancel` fires.
    pub fn with_cancellation(
        api: MeshApi,
        device: Arc<Device>,
        registry: Arc<DeviceRegistry>,
        host: Arc<H>,
        config: &SessionConfig,
        cancel: CancellationToken,
    ) -> Self {
        let (snapshot, _) = watch::channel(PollSnapshot::pending(&device));
        let now = Instant::now();

        Self {
            inner: Arc::new(Inner {
                api: api.with_request_timeout(config.request_timeout),
                host,
                registry,
                device: ArcSwap::new(device),
                network_id: config.network_id.clone(),
                scan_interval: config.scan_interval,
                snapshot,
                poll_lock: tokio::sync::Mutex::new(()),
                // first detail check runs on the first cycle
                details: Schedule::new(config.details_interval, None),
                details_in_flight: Arc::new(AtomicBool::new(false)),
                discovery: Schedule::new(config.discovery_interval, Some(now)),
                discovery_in_flight: Arc::new(AtomicBool::new(false)),
                cancel,
                loop_handle: Mutex::new(None),
            }),
        }
    }

    /// Current device record. Replaced when a detail check sees a rename.
    pub fn device(&self) -> Arc<Device> {
        self.inner.device.load_full()
    }

    pub fn snapshot(&self) -> PollSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Snapshot updates as a stream, starting with the current value.
    pub fn snapshots(&self) -> WatchStream<PollSnapshot> {
        WatchStream::new(self.subscribe())
    }

    /// A primary poll is running right now.
    pub fn is_fetching(&self) -> bool {
        self.inner.poll_lock.try_lock().is_err()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    /// Run one cycle now, waiting for any in-flight cycle to finish first.
    ///
    /// Returns `None` if the coordinator was cancelled.
    pub async fn refresh(&self) -> Option<PollSnapshot> {
        let _guard = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => return None,
            guard = self.inner.poll_lock.lock() => guard,
        };
        Inner::poll_cycle(&self.inner).await
    }

    /// Spawn the scheduled loop. A second call is a no-op.
    pub fn start(&self) {
        let mut handle = self
            .inner
            .loop_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if handle.is_some() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        *handle = Some(tokio::spawn(async move { Inner::run(inner).await }));
    }

    /// Cancel the loop and any in-flight work, then wait for the loop to exit.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handle = self
            .inner
            .loop_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "poll loop ended abnormally");
            }
        }
        debug!(device_id = %self.inner.device.load().id(), "coordinator stopped");
    }
}

impl<H: MeshHost> Inner<H> {
    async fn run(inner: Arc<Self>) {
        let mut interval = tokio::time::interval(inner.scan_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = inner.cancel.cancelled() => break,
                _ = interval.tick() => {
                    // Skip, don't queue, if a manual refresh holds the lock.
                    let Ok(_guard) = inner.poll_lock.try_lock() else {
                        debug!("poll already in flight, skipping tick");
                        continue;
                    };
                    Self::poll_cycle(&inner).await;
                }
            }
        }
    }

    /// One primary cycle. Caller holds `poll_lock`.
    async fn poll_cycle(inner: &Arc<Self>) -> Option<PollSnapshot> {
        let device = inner.device.load_full();

        let result = tokio::select! {
            biased;
            () = inner.cancel.cancelled() => return None,
            r = inner.api.get_device_status(&device) => r,
        };
        if inner.cancel.is_cancelled() {
            return None;
        }

        device.touch();
        let previous = inner.snapshot.borrow().status;

        let snapshot = match result {
            Ok(status) => {
                debug!(device_id = %device.id(), power = status.power, "status updated");
                PollSnapshot {
                    device_id: device.id().to_owned(),
                    outcome: PollOutcome::Succeeded,
                    status: Some(status),
                    last_updated: device.last_updated(),
                }
            }
            Err(e) => {
                let auth = e.is_auth_failure();
                if auth {
                    warn!(device_id = %device.id(), "token rejected, requesting reauthentication");
                    inner.host.request_reauth().await;
                } else {
                    error!(device_id = %device.id(), error = %e, "status poll failed");
                }
                PollSnapshot {
                    device_id: device.id().to_owned(),
                    outcome: PollOutcome::Failed {
                        error: e.to_string(),
                        auth,
                    },
                    status: previous,
                    last_updated: device.last_updated(),
                }
            }
        };

        // The reauth handoff may have outlived a shutdown.
        if inner.cancel.is_cancelled() {
            return None;
        }

        let auth_failed = matches!(snapshot.outcome, PollOutcome::Failed { auth: true, .. });
        if !auth_failed {
            Self::maybe_spawn_details(inner);
            Self::maybe_spawn_discovery(inner);
        }

        inner.snapshot.send_replace(snapshot.clone());
        inner.host.on_snapshot(&device, &snapshot).await;
        Some(snapshot)
    }

    // ── Subtasks ─────────────────────────────────────────────────────

    fn maybe_spawn_details(inner: &Arc<Self>) {
        let now = Instant::now();
        if !inner.details.is_due(now) {
            return;
        }
        let Some(claim) = InFlight::try_claim(&inner.details_in_flight) else {
            debug!("device detail check still running, skipping");
            return;
        };
        inner.details.mark(now);

        let task = Arc::clone(inner);
        tokio::spawn(async move {
            let _claim = claim;
            task.run_subtask("device detail check", task.refresh_details())
                .await;
        });
    }

    fn maybe_spawn_discovery(inner: &Arc<Self>) {
        let now = Instant::now();
        if !inner.discovery.is_due(now) {
            return;
        }
        let Some(claim) = InFlight::try_claim(&inner.discovery_in_flight) else {
            debug!("device discovery still running, skipping");
            return;
        };
        inner.discovery.mark(now);

        let task = Arc::clone(inner);
        tokio::spawn(async move {
            let _claim = claim;
            task.run_subtask("device discovery", task.discover_devices())
                .await;
        });
    }

    /// Bound a subtask by the subtask timeout and cancellation; log failures.
    async fn run_subtask<F>(&self, name: &'static str, work: F)
    where
        F: Future<Output = Result<(), CoreError>>,
    {
        let device_id = self.device.load().id().to_owned();
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!(%device_id, name, "subtask abandoned on shutdown");
            }
            outcome = tokio::time::timeout(SUBTASK_TIMEOUT, work) => match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(%device_id, name, error = %e, "subtask failed"),
                Err(_) => error!(%device_id, name, "subtask timed out"),
            },
        }
    }

    /// Re-fetch the device; on a rename, tell the host and swap our copy.
    async fn refresh_details(&self) -> Result<(), CoreError> {
        let current = self.device.load_full();
        let fresh = self.api.get_device(current.id()).await?;
        if self.cancel.is_cancelled() || fresh.name() == current.name() {
            return Ok(());
        }

        info!(
            device_id = %current.id(),
            old = %current.name(),
            new = %fresh.name(),
            "device renamed upstream"
        );
        self.host.rename_device(&current, fresh.name()).await?;
        if self.cancel.is_cancelled() {
            return Ok(());
        }

        fresh.carry_stamp_from(&current);
        let fresh = Arc::new(fresh);
        self.device.store(Arc::clone(&fresh));
        self.registry.replace(fresh);
        Ok(())
    }

    /// List the network's devices and create entities for unseen ones.
    ///
    /// A device stays registered only once every entity it needs exists;
    /// otherwise its claim is released so the next run tries again.
    async fn discover_devices(&self) -> Result<(), CoreError> {
        let known = self.registry.snapshot_ids();
        let devices = self.api.list_devices_for_network(&self.network_id).await?;

        for device in devices.into_iter().filter(|d| !known.contains(d.id())) {
            if self.cancel.is_cancelled() {
                break;
            }
            // Another coordinator may have claimed it since the snapshot.
            if !self.registry.insert_if_absent(Arc::clone(&device)) {
                continue;
            }
            info!(device_id = %device.id(), name = %device.name(), "discovered new device");

            let mut complete = true;
            for request in EntityRequest::for_device(&device) {
                if self.cancel.is_cancelled() {
                    complete = false;
                    break;
                }
                if self.host.entity_exists(&request.unique_id).await {
                    debug!(unique_id = %request.unique_id, "entity already exists");
                    continue;
                }
                let unique_id = request.unique_id.clone();
                if let Err(e) = self.host.create_entity(request).await {
                    error!(%unique_id, error = %e, "failed to create entity");
                    complete = false;
                }
            }

            if !complete {
                warn!(
                    device_id = %device.id(),
                    "entities incomplete, will retry on next discovery"
                );
                self.registry.remove(device.id());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::test_support::device;

    fn snapshot(outcome: PollOutcome, status: Option<DeviceStatus>, age_secs: i64) -> PollSnapshot {
        PollSnapshot {
            device_id: "dev-1".into(),
            outcome,
            status,
            last_updated: Utc::now() - TimeDelta::seconds(age_secs),
        }
    }

    const ON: DeviceStatus = DeviceStatus {
        power: true,
        lightness: None,
        last_lightness: None,
        temperature: None,
    };

    #[test]
    fn availability_needs_success_status_and_freshness() {
        assert!(snapshot(PollOutcome::Succeeded, Some(ON), 5).is_available());
        assert!(!snapshot(PollOutcome::Succeeded, Some(ON), 121).is_available());
        assert!(!snapshot(PollOutcome::Succeeded, None, 5).is_available());
        let failed = PollOutcome::Failed {
            error: "boom".into(),
            auth: false,
        };
        assert!(!snapshot(failed, Some(ON), 5).is_available());
        assert!(!PollSnapshot::pending(&device("d", "n", "de.jung.socket")).is_available());
    }

    #[test]
    fn in_flight_claim_is_exclusive_until_dropped() {
        let flag = Arc::new(AtomicBool::new(false));
        let first = InFlight::try_claim(&flag);
        assert!(first.is_some());
        assert!(InFlight::try_claim(&flag).is_none());
        drop(first);
        assert!(InFlight::try_claim(&flag).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_due_once_interval_is_exceeded() {
        let schedule = Schedule::new(Duration::from_secs(300), None);
        let start = Instant::now();
        assert!(schedule.is_due(start));

        schedule.mark(start);
        assert!(!schedule.is_due(start));

        tokio::time::advance(Duration::from_secs(300)).await;
        assert!(!schedule.is_due(Instant::now()));
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(schedule.is_due(Instant::now()));
    }

    #[test]
    fn snapshot_serializes_flat() {
        let snap = PollSnapshot {
            device_id: "dev-1".into(),
            outcome: PollOutcome::Failed {
                error: "timeout".into(),
                auth: false,
            },
            status: None,
            last_updated: DateTime::from_timestamp(0, 0).unwrap(),
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["auth"], false);
        assert_eq!(json["device_id"], "dev-1");
    }
}
