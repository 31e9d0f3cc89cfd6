//! Capabilities the overlay consumes from the host process.
//!
//! The host enumerates live entities, knows where the player is, projects
//! world positions onto the screen and owns the drawing primitives. The
//! overlay only talks to it through these traits.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::core::types::{EntityAddress, EntityCategory, MetadataPath};
use crate::render::colors::Color;

/// Read-only view of one live entity at the moment it was read
#[derive(Debug, Clone)]
pub struct EntityView {
    pub address: EntityAddress,
    pub metadata: MetadataPath,
    pub category: EntityCategory,
    pub position: Vec3,
    pub is_dead: bool,
    pub is_hostile: bool,
    pub is_targetable: bool,
    /// Human-readable in-game name, may be empty
    pub render_name: String,
}

/// Player and session state
#[derive(Debug, Clone, Copy)]
pub struct PlayerContext {
    pub position: Vec3,
    pub in_game: bool,
    /// Towns and hideouts; nothing is drawn there
    pub in_safe_zone: bool,
}

impl PlayerContext {
    /// Whether the render pass should run at all
    pub fn is_active(&self) -> bool {
        self.in_game && !self.in_safe_zone
    }
}

/// Enumerates live entities. Called from the scan task, so it must be shareable.
pub trait EntitySource: Send + Sync {
    fn live_entities(&self) -> Vec<EntityView>;

    /// Fresh read of a single entity, `None` once it is gone
    fn entity(&self, address: EntityAddress) -> Option<EntityView>;
}

impl<T: EntitySource + ?Sized> EntitySource for &T {
    fn live_entities(&self) -> Vec<EntityView> {
        (**self).live_entities()
    }

    fn entity(&self, address: EntityAddress) -> Option<EntityView> {
        (**self).entity(address)
    }
}

impl<T: EntitySource + ?Sized> EntitySource for Arc<T> {
    fn live_entities(&self) -> Vec<EntityView> {
        (**self).live_entities()
    }

    fn entity(&self, address: EntityAddress) -> Option<EntityView> {
        (**self).entity(address)
    }
}

pub trait SessionContext: Send + Sync {
    fn player(&self) -> PlayerContext;
}

/// World-to-screen projection.
///
/// Implementations return `Vec2::ZERO` for points that are off-screen or
/// cannot be projected.
pub trait Projector {
    fn world_to_screen(&self, world: Vec3) -> Vec2;

    /// Projection with the zero sentinel mapped to `None`
    fn project(&self, world: Vec3) -> Option<Vec2> {
        let screen = self.world_to_screen(world);
        if screen == Vec2::ZERO || !screen.is_finite() {
            None
        } else {
            Some(screen)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Immediate-mode drawing primitives
pub trait Painter {
    fn draw_text_with_background(
        &mut self,
        text: &str,
        position: Vec2,
        color: Color,
        background: Color,
        align: TextAlign,
    );

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32, segments: u32);
}
