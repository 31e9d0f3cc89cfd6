//! Per-frame corpse labelling
//!
//! Reads the latest scan snapshot and draws labels and highlight circles.
//! This module is READ-ONLY with respect to tracking state apart from the
//! display-name cache it fills.

pub mod camera;
pub mod colors;
pub mod painter;

use glam::Vec3;

use crate::core::config::OverlaySettings;
use crate::host::{EntitySource, Painter, PlayerContext, Projector, TextAlign};
use crate::tracking::names::{resolve_color, NamePreferences};
use crate::tracking::shared::TrackingState;

pub use camera::TopDownCamera;
pub use colors::Color;
pub use painter::{DrawCommand, EguiPainter, RecordingPainter};

/// Line width of highlight circles
pub const HIGHLIGHT_THICKNESS: f32 = 2.0;

/// What one render pass drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub candidates: usize,
    pub labels: usize,
    pub circles: usize,
    pub off_screen: usize,
}

/// Draw every labelled corpse from the current snapshot.
///
/// Hostility and targetability are re-read from the live entity since they
/// can change between scan and frame. Failed projections skip only that
/// element and are retried next frame.
pub fn render_corpses(
    state: &TrackingState,
    settings: &OverlaySettings,
    source: &dyn EntitySource,
    player: PlayerContext,
    projector: &dyn Projector,
    painter: &mut dyn Painter,
) -> RenderStats {
    let mut stats = RenderStats::default();
    if !settings.enabled || !player.is_active() {
        return stats;
    }

    let snapshot = state.current_snapshot();
    stats.candidates = snapshot.len();
    let prefs = NamePreferences::from_settings(settings);
    let text_lift = Vec3::Z * settings.text_z_offset as f32;
    let circle_lift = Vec3::Z * settings.highlight_z_offset as f32;

    for candidate in &snapshot.candidates {
        let Some(live) = source.entity(candidate.address) else {
            continue;
        };
        if !live.is_dead || !live.is_hostile || !live.is_targetable {
            continue;
        }

        let is_known = state.is_known(&live.metadata);
        if !prefs.show_all && !is_known {
            continue;
        }

        match projector.project(live.position + text_lift) {
            Some(screen) => {
                let observed = if live.render_name.is_empty() {
                    state.cached_render_name(&live.metadata).unwrap_or_default()
                } else {
                    live.render_name.clone()
                };
                let name = state.display_name(&live.metadata, &observed, prefs);
                let color = resolve_color(settings, &live.metadata, settings.text_color);
                painter.draw_text_with_background(
                    &name,
                    screen,
                    color,
                    settings.background_color,
                    TextAlign::Center,
                );
                stats.labels += 1;
            }
            None => stats.off_screen += 1,
        }

        if settings.highlight_corpse {
            match projector.project(live.position + circle_lift) {
                Some(screen) => {
                    painter.draw_circle(
                        screen,
                        settings.highlight_radius as f32,
                        settings.highlight_color,
                        HIGHLIGHT_THICKNESS,
                        settings.highlight_segments.max(3) as u32,
                    );
                    stats.circles += 1;
                }
                None => stats.off_screen += 1,
            }
        }
    }

    stats
}
