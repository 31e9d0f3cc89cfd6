//! Painter implementations: egui for real frames, a recorder for headless runs

use std::f32::consts::TAU;

use egui::{FontId, Pos2, Shape, Stroke};
use glam::Vec2;

use crate::host::{Painter, TextAlign};
use crate::render::colors::Color;

/// Padding between label text and its background box, in pixels
const LABEL_PADDING: f32 = 2.0;

/// Outline points of a circle approximated with `segments` straight lines
pub fn circle_points(center: Vec2, radius: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn to_pos(v: Vec2) -> Pos2 {
    egui::pos2(v.x, v.y)
}

/// Draws onto an egui layer, typically the foreground of the overlay viewport
pub struct EguiPainter<'a> {
    painter: &'a egui::Painter,
    font: FontId,
}

impl<'a> EguiPainter<'a> {
    pub fn new(painter: &'a egui::Painter) -> Self {
        Self {
            painter,
            font: FontId::proportional(14.0),
        }
    }

    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = font;
        self
    }
}

impl Painter for EguiPainter<'_> {
    fn draw_text_with_background(
        &mut self,
        text: &str,
        position: Vec2,
        color: Color,
        background: Color,
        align: TextAlign,
    ) {
        let galley = self
            .painter
            .layout_no_wrap(text.to_string(), self.font.clone(), color.to_egui());
        let size = galley.size();
        let x = match align {
            TextAlign::Left => position.x,
            TextAlign::Center => position.x - size.x / 2.0,
            TextAlign::Right => position.x - size.x,
        };
        let min = egui::pos2(x, position.y - size.y / 2.0);
        let rect = egui::Rect::from_min_size(min, size).expand(LABEL_PADDING);
        self.painter.rect_filled(rect, 0.0, background.to_egui());
        self.painter.galley(min, galley, color.to_egui());
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32, segments: u32) {
        let points = circle_points(center, radius, segments)
            .into_iter()
            .map(to_pos)
            .collect();
        self.painter
            .add(Shape::closed_line(points, Stroke::new(thickness, color.to_egui())));
    }
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Label {
        text: String,
        position: Vec2,
        color: Color,
        background: Color,
        align: TextAlign,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        thickness: f32,
        segments: u32,
    },
}

/// Painter that only records what it was asked to draw
#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub commands: Vec<DrawCommand>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Label { text, .. } => Some(text.as_str()),
            DrawCommand::Circle { .. } => None,
        })
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Circle { .. }))
            .count()
    }
}

impl Painter for RecordingPainter {
    fn draw_text_with_background(
        &mut self,
        text: &str,
        position: Vec2,
        color: Color,
        background: Color,
        align: TextAlign,
    ) {
        self.commands.push(DrawCommand::Label {
            text: text.to_string(),
            position,
            color,
            background,
            align,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32, segments: u32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            thickness,
            segments,
        });
    }
}
