//! Periodic entity scan.
//!
//! Walking every live entity is the expensive part of the overlay, so it
//! runs on its own interval (default 250ms) instead of every frame. Each
//! scan filters to dead monsters in range and publishes a new snapshot.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::config::{OverlaySettings, DRAW_DISTANCE_RANGE, SCAN_INTERVAL_MS_RANGE};
use crate::core::error::Result;
use crate::core::types::EntityCategory;
use crate::host::{EntitySource, EntityView, SessionContext};
use crate::tracking::shared::{CommitReport, ScanBatch, TrackingState};

/// Per-scan parameters, re-read at every scan tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanParams {
    pub enabled: bool,
    pub interval: Duration,
    pub max_distance_sq: f32,
}

impl ScanParams {
    /// Ranged values are clamped, so hand-edited settings cannot stall the scan
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        let interval_ms = settings
            .scan_interval_ms
            .clamp(*SCAN_INTERVAL_MS_RANGE.start(), *SCAN_INTERVAL_MS_RANGE.end());
        let draw_distance = settings
            .draw_distance
            .clamp(*DRAW_DISTANCE_RANGE.start(), *DRAW_DISTANCE_RANGE.end()) as f32;
        Self {
            enabled: settings.enabled,
            interval: Duration::from_millis(interval_ms),
            max_distance_sq: draw_distance * draw_distance,
        }
    }
}

impl Default for ScanParams {
    fn default() -> Self {
        Self::from_settings(&OverlaySettings::default())
    }
}

/// Dead monster with a monster metadata path within range of the player
pub fn is_corpse_candidate(view: &EntityView, player_position: Vec3, max_distance_sq: f32) -> bool {
    view.is_dead
        && view.category == EntityCategory::Monster
        && !view.metadata.is_empty()
        && view.metadata.is_monster_path()
        && view.position.distance_squared(player_position) <= max_distance_sq
}

/// Run one scan and commit it.
///
/// When the player is not in a session the snapshot is replaced by an
/// empty one so nothing stale lingers.
pub fn scan_once(
    state: &TrackingState,
    source: &dyn EntitySource,
    session: &dyn SessionContext,
    params: &ScanParams,
) -> CommitReport {
    let generation = state.generation();
    let player = session.player();

    let candidates = if player.in_game && params.enabled {
        source
            .live_entities()
            .into_iter()
            .filter(|view| is_corpse_candidate(view, player.position, params.max_distance_sq))
            .collect()
    } else {
        Vec::new()
    };

    state.commit(ScanBatch {
        generation,
        scanned_at: Instant::now(),
        candidates,
    })
}

/// Time gate for scanning inline from the render pass
#[derive(Debug, Clone)]
pub struct ScanGate {
    interval: Duration,
    last_scan: Option<Instant>,
}

impl ScanGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_scan: None,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// True (and re-armed) when a scan is due at `now`
    pub fn ready(&mut self, now: Instant) -> bool {
        let due = match self.last_scan {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last_scan = Some(now);
        }
        due
    }

    /// Force the next `ready` call to fire
    pub fn reset(&mut self) {
        self.last_scan = None;
    }
}

/// Handle to the background scan task
#[derive(Debug)]
pub struct ScanTask {
    handle: Option<JoinHandle<()>>,
    cancel: watch::Sender<bool>,
    params: watch::Sender<ScanParams>,
}

impl ScanTask {
    /// Push new parameters; the task picks them up at its next interval boundary
    pub fn update_params(&self, params: ScanParams) {
        self.params.send_if_modified(|current| {
            if *current == params {
                false
            } else {
                *current = params;
                true
            }
        });
    }

    /// Ask the task to stop at its next interval boundary
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map(JoinHandle::is_finished).unwrap_or(true)
    }

    /// Cancel and wait for the task to exit
    pub async fn shutdown(mut self) -> Result<()> {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            handle.await?;
        }
        Ok(())
    }
}

impl Drop for ScanTask {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}

/// Spawn the periodic scan on the given runtime
pub fn spawn_scan_task(
    runtime: &tokio::runtime::Handle,
    state: Arc<TrackingState>,
    source: Arc<dyn EntitySource>,
    session: Arc<dyn SessionContext>,
    params: ScanParams,
) -> ScanTask {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let (params_tx, params_rx) = watch::channel(params);
    let handle = runtime.spawn(run_scan_loop(state, source, session, params_rx, cancel_rx));
    ScanTask {
        handle: Some(handle),
        cancel: cancel_tx,
        params: params_tx,
    }
}

fn scan_interval(period: Duration) -> tokio::time::Interval {
    // tokio panics on a zero period
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn run_scan_loop(
    state: Arc<TrackingState>,
    source: Arc<dyn EntitySource>,
    session: Arc<dyn SessionContext>,
    params_rx: watch::Receiver<ScanParams>,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let mut period = params_rx.borrow().interval;
    let mut interval = scan_interval(period);
    tracing::info!("Scan task started ({}ms interval)", period.as_millis());

    loop {
        tokio::select! {
            changed = cancel_rx.changed() => {
                if changed.is_err() || *cancel_rx.borrow() {
                    break;
                }
                continue;
            }
            _ = interval.tick() => {}
        }
        if *cancel_rx.borrow() {
            break;
        }

        let params = *params_rx.borrow();
        if params.interval != period {
            period = params.interval;
            interval = scan_interval(period);
            interval.reset();
            tracing::debug!("Scan interval changed to {}ms", period.as_millis());
        }

        let report = scan_once(&state, source.as_ref(), session.as_ref(), &params);
        if report.new_sightings > 0 {
            tracing::debug!(
                "Scan found {} candidates, {} new sightings",
                report.candidates,
                report.new_sightings
            );
        }
    }

    tracing::info!("Scan task stopped");
}
