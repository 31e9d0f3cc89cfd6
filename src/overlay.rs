//! Overlay session: owns settings and tracking state and exposes the
//! lifecycle hooks the host calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::config::OverlaySettings;
use crate::core::error::Result;
use crate::core::types::EntityAddress;
use crate::host::{EntitySource, EntityView, Painter, Projector, SessionContext};
use crate::render::{render_corpses, RenderStats};
use crate::tracking::index::{EntityIndex, IndexedSource};
use crate::tracking::scanner::{scan_once, spawn_scan_task, ScanGate, ScanParams, ScanTask};
use crate::tracking::shared::TrackingState;
use crate::ui::editor::{draw_settings_panel, SpectreEditor};

/// One activation of the overlay, from plugin load to unload
pub struct SpectreOverlay {
    settings: OverlaySettings,
    tracking: Arc<TrackingState>,
    index: Arc<EntityIndex>,
    editor: SpectreEditor,
    scan_task: Option<ScanTask>,
    scan_gate: ScanGate,
}

impl SpectreOverlay {
    pub fn new(settings: OverlaySettings) -> Self {
        let settings = settings.sanitized();
        let tracking = TrackingState::shared(&settings);
        let scan_gate = ScanGate::new(Duration::from_millis(settings.scan_interval_ms));
        Self {
            settings,
            tracking,
            index: Arc::new(EntityIndex::new()),
            editor: SpectreEditor::new(),
            scan_task: None,
            scan_gate,
        }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// Mutable settings; changes take effect on the next frame, with ranged
    /// values clamped first
    pub fn settings_mut(&mut self) -> &mut OverlaySettings {
        &mut self.settings
    }

    pub fn tracking(&self) -> &Arc<TrackingState> {
        &self.tracking
    }

    /// Entity index fed by `on_entity_added` / `on_entity_removed`
    pub fn entity_index(&self) -> Arc<EntityIndex> {
        Arc::clone(&self.index)
    }

    /// Scan source for hosts without full enumeration: the indexed monsters,
    /// each read fresh through `live` so later deaths are seen
    pub fn indexed<S: EntitySource>(&self, live: S) -> IndexedSource<S> {
        IndexedSource::new(Arc::clone(&self.index), live)
    }

    /// Start scanning in the background on `runtime`. Replaces a running scan task.
    pub fn activate(
        &mut self,
        runtime: &tokio::runtime::Handle,
        source: Arc<dyn EntitySource>,
        session: Arc<dyn SessionContext>,
    ) {
        if let Some(previous) = self.scan_task.take() {
            previous.cancel();
        }
        let params = ScanParams::from_settings(&self.settings);
        self.scan_task = Some(spawn_scan_task(
            runtime,
            Arc::clone(&self.tracking),
            source,
            session,
            params,
        ));
        tracing::info!("Spectre overlay activated");
    }

    pub fn is_scanning_in_background(&self) -> bool {
        self.scan_task.as_ref().map(|task| !task.is_finished()).unwrap_or(false)
    }

    pub fn on_entity_added(&self, view: &EntityView) -> bool {
        self.index.on_added(view)
    }

    pub fn on_entity_removed(&self, address: EntityAddress) -> bool {
        self.index.on_removed(address)
    }

    /// Forget everything tied to the previous area
    pub fn on_area_change(&mut self) {
        let generation = self.tracking.reset();
        self.index.clear();
        self.scan_gate.reset();
        tracing::info!("Area changed, tracking state cleared (generation {})", generation);
    }

    /// Clear all transient state and stop the scan task without waiting for it
    pub fn on_unload(&mut self) {
        if let Some(task) = self.scan_task.take() {
            task.cancel();
        }
        self.on_area_change();
        tracing::info!("Spectre overlay unloaded");
    }

    /// Clear state, stop the scan task and wait for it to exit
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(task) = self.scan_task.take() {
            task.shutdown().await?;
        }
        self.on_area_change();
        tracing::info!("Spectre overlay shut down");
        Ok(())
    }

    fn sync_settings(&mut self) {
        if self.settings.clamp_ranges() {
            tracing::warn!("Out-of-range settings clamped");
        }
        self.settings.normalize_color_keys();
        if self.scan_task.as_ref().is_some_and(ScanTask::is_finished) {
            self.scan_task = None;
            self.scan_gate.reset();
            tracing::warn!("Scan task exited, scanning inline");
        }
        self.tracking.sync_settings(&self.settings);
        let params = ScanParams::from_settings(&self.settings);
        self.scan_gate.set_interval(params.interval);
        if let Some(task) = &self.scan_task {
            task.update_params(params);
        }
    }

    /// Per-frame hook. Scans inline when no background task is running.
    pub fn render(
        &mut self,
        source: &dyn EntitySource,
        session: &dyn SessionContext,
        projector: &dyn Projector,
        painter: &mut dyn Painter,
    ) -> RenderStats {
        self.sync_settings();

        if self.scan_task.is_none() && self.scan_gate.ready(Instant::now()) {
            let params = ScanParams::from_settings(&self.settings);
            scan_once(&self.tracking, source, session, &params);
        }

        render_corpses(
            &self.tracking,
            &self.settings,
            source,
            session.player(),
            projector,
            painter,
        )
    }

    /// Editor window hook; handles the toggle hotkey too
    pub fn draw_editor(&mut self, ctx: &egui::Context) -> bool {
        self.editor.handle_hotkey(ctx, &mut self.settings);
        self.editor.show(ctx, &mut self.settings, &self.tracking)
    }

    /// Inline settings hook
    pub fn draw_settings(&mut self, ui: &mut egui::Ui) -> bool {
        draw_settings_panel(ui, &mut self.settings, &mut self.editor, &self.tracking)
    }
}

impl Drop for SpectreOverlay {
    fn drop(&mut self) {
        if let Some(task) = self.scan_task.take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MetadataPath;
    use crate::render::RecordingPainter;
    use crate::sim::SimZone;
    use glam::{Vec2, Vec3};

    struct Flat;

    impl Projector for Flat {
        fn world_to_screen(&self, world: Vec3) -> Vec2 {
            Vec2::new(world.x + 5000.0, world.y + 5000.0)
        }
    }

    fn frame(overlay: &mut SpectreOverlay, zone: &SimZone) -> (RenderStats, RecordingPainter) {
        let mut painter = RecordingPainter::new();
        let stats = overlay.render(zone, zone, &Flat, &mut painter);
        (stats, painter)
    }

    #[test]
    fn test_inline_scan_labels_known_corpse() {
        let mut overlay = SpectreOverlay::new(OverlaySettings::default());
        let zone = SimZone::new(1);
        let wicker = zone.spawn_monster("Metadata/Monsters/WickerMan/WickerMan", "Wicker Man", Vec3::ZERO);
        zone.spawn_monster("Metadata/Monsters/Other/Other", "Other", Vec3::X);
        zone.kill_random();
        zone.kill_random();
        assert!(zone.entity(wicker.address).is_some_and(|e| e.is_dead));

        let (stats, painter) = frame(&mut overlay, &zone);
        assert_eq!(stats.candidates, 2);
        assert_eq!(painter.labels().collect::<Vec<_>>(), vec!["Wicker Man"]);
        assert_eq!(painter.circle_count(), 1);
        assert_eq!(
            overlay.tracking().recent_sightings(),
            vec![MetadataPath::from("Metadata/Monsters/Other/Other")]
        );
    }

    #[test]
    fn test_area_change_clears_everything() {
        let mut overlay = SpectreOverlay::new(OverlaySettings::default());
        let zone = SimZone::new(2);
        let view = zone.spawn_monster("Metadata/Monsters/Other/Other", "Other", Vec3::ZERO);
        zone.kill(view.address);
        assert!(overlay.on_entity_added(&view));
        frame(&mut overlay, &zone);
        assert_eq!(overlay.tracking().sighting_count(), 1);

        zone.change_area();
        overlay.on_area_change();
        assert_eq!(overlay.tracking().sighting_count(), 0);
        assert!(overlay.tracking().current_snapshot().is_empty());
        assert!(overlay.entity_index().is_empty());

        let (stats, painter) = frame(&mut overlay, &zone);
        assert_eq!(stats.candidates, 0);
        assert!(painter.commands.is_empty());
    }

    #[test]
    fn test_disabled_overlay_draws_nothing() {
        let mut overlay = SpectreOverlay::new(OverlaySettings::default());
        overlay.settings_mut().enabled = false;
        let zone = SimZone::new(3);
        let view = zone.spawn_monster("Metadata/Monsters/WickerMan/WickerMan", "Wicker Man", Vec3::ZERO);
        zone.kill(view.address);
        let (stats, painter) = frame(&mut overlay, &zone);
        assert_eq!(stats, RenderStats::default());
        assert!(painter.commands.is_empty());
    }

    #[test]
    fn test_settings_edits_apply_next_frame() {
        let mut overlay = SpectreOverlay::new(OverlaySettings::default());
        let zone = SimZone::new(4);
        let view = zone.spawn_monster("Metadata/Monsters/Other/Other", "Other", Vec3::ZERO);
        zone.kill(view.address);
        let (stats, _) = frame(&mut overlay, &zone);
        assert_eq!(stats.labels, 0);

        overlay.settings_mut().show_all_corpses = true;
        let (stats, painter) = frame(&mut overlay, &zone);
        assert_eq!(stats.labels, 1);
        assert_eq!(painter.labels().collect::<Vec<_>>(), vec!["Metadata/Monsters/Other/Other"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_background_scan_and_shutdown() {
        let mut overlay = SpectreOverlay::new(OverlaySettings::default());
        let zone = std::sync::Arc::new(SimZone::new(5));
        let view = zone.spawn_monster("Metadata/Monsters/WickerMan/WickerMan", "Wicker Man", Vec3::ZERO);
        zone.kill(view.address);

        overlay.activate(&tokio::runtime::Handle::current(), zone.clone(), zone.clone());
        assert!(overlay.is_scanning_in_background());

        let mut published = false;
        for _ in 0..50 {
            if !overlay.tracking().current_snapshot().is_empty() {
                published = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(published);

        overlay.shutdown().await.unwrap();
        assert!(!overlay.is_scanning_in_background());
        assert!(overlay.tracking().current_snapshot().is_empty());
    }
}
