use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::error::TrackerError;
use super::position::{Propagator, Sgp4Propagator};
use super::session::Session;
use super::trail::DEFAULT_TRAIL_LENGTH;
use super::types::{Event, Telemetry, ViewState};
use crate::catalog::{Catalog, SatelliteChoice};
use crate::map::{MarkerBoard, MarkerView};
use crate::preferences::Preferences;

pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(1000);

/// User actions waiting for the update loop
pub const EVENT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub enum TrackerMode {
    Idle,
    Running {
        start: DateTime<Utc>,
        satellites: usize,
    },
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TrackerStatus {
    pub mode: TrackerMode,
    pub satellites: Vec<SatelliteChoice>,
    pub markers: Vec<MarkerView>,
    pub telemetry: Option<Telemetry>,
    pub view: Option<ViewState>,
}

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub update_interval: Duration,
    pub trail_length: usize,
    pub primary_id: String,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            trail_length: DEFAULT_TRAIL_LENGTH,
            primary_id: "iss".to_string(),
        }
    }
}

#[derive(Debug)]
struct Shared {
    status: TrackerStatus,
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    events_tx: mpsc::Sender<Event>,
    join: JoinHandle<()>,
}

/// Owns the update loop task. The task is the only writer of the session and
/// the map; everyone else sends events and reads published snapshots.
pub struct Tracker {
    settings: TrackerSettings,
    shared: Arc<StdMutex<Shared>>,
    worker: Option<WorkerHandle>,
}

fn lock(shared: &StdMutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Tracker {
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            settings,
            shared: Arc::new(StdMutex::new(Shared {
                status: TrackerStatus {
                    mode: TrackerMode::Idle,
                    satellites: Vec::new(),
                    markers: Vec::new(),
                    telemetry: None,
                    view: None,
                },
            })),
            worker: None,
        }
    }

    pub fn status(&self) -> TrackerStatus {
        lock(&self.shared).status.clone()
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Idle -> Running with the default SGP4 propagator.
    pub fn start(
        &mut self,
        catalog: Arc<Catalog>,
        preferences: Preferences,
    ) -> Result<(), TrackerError> {
        self.start_with(catalog, Sgp4Propagator, preferences)
    }

    pub fn start_with<P>(
        &mut self,
        catalog: Arc<Catalog>,
        propagator: P,
        preferences: Preferences,
    ) -> Result<(), TrackerError>
    where
        P: Propagator + Send + 'static,
    {
        if self.worker.is_some() {
            return Err(TrackerError::AlreadyRunning);
        }

        let satellites = catalog.choices();
        let session = Session::new(
            catalog,
            propagator,
            &self.settings.primary_id,
            self.settings.trail_length,
            preferences,
        );
        let mut map = MarkerBoard::default();
        session.attach(&mut map);

        {
            let mut locked = lock(&self.shared);
            locked.status.mode = TrackerMode::Running {
                start: Utc::now(),
                satellites: satellites.len(),
            };
            locked.status.satellites = satellites;
            locked.status.view = Some(session.view_state(&map));
        }

        let shared = self.shared.clone();
        let period = self.settings.update_interval;
        let (stop_tx, stop_rx) = oneshot::channel();
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);

        let join = tokio::spawn(async move {
            run_update_loop(shared, session, map, period, events_rx, stop_rx).await;
        });

        self.worker = Some(WorkerHandle {
            stop_tx,
            events_tx,
            join,
        });
        log::info!("Tracker running, updating every {:?}", period);
        Ok(())
    }

    /// Queue a user action for the update loop. Never waits: a full queue
    /// is reported as `QueueFull`.
    pub fn send(&self, event: Event) -> Result<(), TrackerError> {
        let worker = self.worker.as_ref().ok_or(TrackerError::NotRunning)?;
        worker.events_tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => TrackerError::QueueFull,
            TrySendError::Closed(_) => TrackerError::NotRunning,
        })
    }

    /// Running -> Idle. Markers and telemetry of the last tick stay visible.
    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
            log::info!("Tracker stopped");
        }
        let mut locked = lock(&self.shared);
        locked.status.mode = TrackerMode::Idle;
    }
}

async fn run_update_loop<P: Propagator>(
    shared: Arc<StdMutex<Shared>>,
    mut session: Session<P>,
    mut map: MarkerBoard,
    period: Duration,
    mut events_rx: mpsc::Receiver<Event>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let should_stop = tokio::select! {
            _ = ticker.tick() => {
                let report = session.tick(Utc::now(), &mut map);
                if !report.skipped.is_empty() {
                    log::debug!("Tick skipped {:?}", report.skipped);
                }
                false
            }
            Some(event) = events_rx.recv() => {
                if let Err(e) = session.dispatch(event, Utc::now(), &mut map) {
                    log::warn!("Ignoring event: {}", e);
                }
                false
            }
            _ = &mut stop_rx => true,
        };
        if should_stop {
            break;
        }

        publish(&shared, &session, &map);
    }

    let mut locked = lock(&shared);
    locked.status.mode = TrackerMode::Idle;
}

fn publish<P: Propagator>(shared: &StdMutex<Shared>, session: &Session<P>, map: &MarkerBoard) {
    let markers = map.markers();
    let view = session.view_state(map);
    let mut locked = lock(shared);
    locked.status.markers = markers;
    locked.status.telemetry = session.telemetry().cloned();
    locked.status.view = Some(view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ElementSet, Naming};
    use crate::tracker::Position;

    struct Fixed;

    impl Propagator for Fixed {
        fn resolve(&self, elements: &ElementSet, _at: DateTime<Utc>) -> Result<Position, TrackerError> {
            if elements.line1 == "bad" {
                return Err(TrackerError::NonFinite);
            }
            Ok(Position {
                latitude_deg: 12.5,
                longitude_deg: -45.25,
                altitude_m: 420_000.0,
                speed_kmh: 27_600.0,
            })
        }
    }

    fn settings() -> TrackerSettings {
        TrackerSettings {
            update_interval: Duration::from_millis(10),
            ..TrackerSettings::default()
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_texts("ISS\nl1\nl2", "A\nl1\nl2\nB\nbad\nl2", &Naming::default())
                .unwrap(),
        )
    }

    async fn wait_for<F: Fn(&TrackerStatus) -> bool>(tracker: &Tracker, condition: F) {
        for _ in 0..200 {
            if condition(&tracker.status()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached, status: {:?}", tracker.status());
    }

    #[tokio::test]
    async fn runs_until_stopped() {
        let mut tracker = Tracker::new(settings());
        assert!(matches!(tracker.status().mode, TrackerMode::Idle));
        assert!(matches!(
            tracker.send(Event::MapClick),
            Err(TrackerError::NotRunning)
        ));

        tracker
            .start_with(catalog(), Fixed, Preferences::in_memory())
            .unwrap();
        assert!(matches!(
            tracker.start_with(catalog(), Fixed, Preferences::in_memory()),
            Err(TrackerError::AlreadyRunning)
        ));

        wait_for(&tracker, |s| s.markers.len() == 2).await;
        let status = tracker.status();
        assert_eq!(status.satellites.len(), 3);
        assert!(status.markers.iter().all(|m| m.id != "starlink-1"));
        assert_eq!(status.telemetry.unwrap().satellite_id, "iss");

        tracker.stop().await;
        assert!(!tracker.is_running());
        assert!(matches!(tracker.status().mode, TrackerMode::Idle));
        assert_eq!(tracker.status().markers.len(), 2);
    }

    #[tokio::test]
    async fn events_are_applied_by_the_loop() {
        let mut tracker = Tracker::new(settings());
        tracker
            .start_with(catalog(), Fixed, Preferences::in_memory())
            .unwrap();

        tracker.send(Event::Select("starlink-0".into())).unwrap();
        wait_for(&tracker, |s| {
            s.telemetry
                .as_ref()
                .is_some_and(|t| t.satellite_id == "starlink-0")
        })
        .await;

        tracker.send(Event::CycleTheme).unwrap();
        wait_for(&tracker, |s| {
            s.view.as_ref().is_some_and(|v| v.body_class == "dark")
        })
        .await;

        tracker.stop().await;
    }

    #[tokio::test]
    async fn full_queue_is_rejected_without_waiting() {
        let mut tracker = Tracker::new(settings());
        tracker
            .start_with(catalog(), Fixed, Preferences::in_memory())
            .unwrap();

        // the loop cannot drain the queue until this test yields
        for _ in 0..EVENT_QUEUE_CAPACITY {
            tracker.send(Event::MapClick).unwrap();
        }
        assert!(matches!(
            tracker.send(Event::MapClick),
            Err(TrackerError::QueueFull)
        ));

        tracker.stop().await;
        assert!(matches!(
            tracker.send(Event::MapClick),
            Err(TrackerError::NotRunning)
        ));
    }
}
