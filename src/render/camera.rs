//! Top-down reference camera
//!
//! Stand-in for the game's camera in the simulator and tests. Projects
//! world positions onto the viewport and reports off-screen points with
//! the zero sentinel, the same way the in-game camera does.

use glam::{Vec2, Vec3};

use crate::host::Projector;

/// Scale factor: 1 world unit = PIXELS_PER_UNIT pixels at zoom 1.0
pub const PIXELS_PER_UNIT: f32 = 0.5;

/// Camera looking straight down, height shown as an upward screen offset
#[derive(Debug, Clone, Copy)]
pub struct TopDownCamera {
    /// Center position in world coordinates (x, y)
    pub center: Vec2,
    /// Zoom level (1.0 = normal, 2.0 = 2x magnification)
    pub zoom: f32,
    /// Viewport size in pixels
    pub viewport_size: Vec2,
}

impl TopDownCamera {
    /// Create a new camera centered at origin
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
            viewport_size: Vec2::new(viewport_width, viewport_height),
        }
    }

    /// Screen position without culling; screen origin is top-left, Y grows downward
    pub fn world_to_screen_unclamped(&self, world: Vec3) -> Vec2 {
        let relative = world.truncate() - self.center;
        let scale = self.zoom * PIXELS_PER_UNIT;
        Vec2::new(
            self.viewport_size.x / 2.0 + relative.x * scale,
            self.viewport_size.y / 2.0 - relative.y * scale - world.z * scale,
        )
    }

    /// Check if a screen position lies inside the viewport
    pub fn is_on_screen(&self, screen: Vec2) -> bool {
        screen.x >= 0.0 && screen.y >= 0.0 && screen.x <= self.viewport_size.x && screen.y <= self.viewport_size.y
    }

    /// Keep the camera on the player
    pub fn follow(&mut self, player_position: Vec3) {
        self.center = player_position.truncate();
    }

    /// Adjust zoom level, clamped to [0.1, 10.0]
    pub fn adjust_zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom * (1.0 + delta)).clamp(0.1, 10.0);
    }

    /// Update viewport size (call on window resize)
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = Vec2::new(width, height);
    }
}

impl Projector for TopDownCamera {
    fn world_to_screen(&self, world: Vec3) -> Vec2 {
        let screen = self.world_to_screen_unclamped(world);
        if self.is_on_screen(screen) {
            screen
        } else {
            Vec2::ZERO
        }
    }
}
