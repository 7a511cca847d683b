//! Presentation state: the bolt scene node and the radar glyph.
//!
//! Drawing itself belongs to the embedding game; this module only decides
//! what should be drawn.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use arena_core::config::RadarDisplay;
use arena_core::constants::{MISSILE_COLOR, MISSILE_TEXTURE_FRAMES, RADAR_TIP_COLOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Scene node for a glowing shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltVisual {
    pub position: Vec3,
    pub velocity: Vec3,
    pub texture: Option<TextureId>,
    /// Texture animation grid (columns, rows).
    pub texture_frames: (u32, u32),
    pub color: [f32; 3],
    pub flares: bool,
}

impl BoltVisual {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            texture: None,
            texture_frames: (1, 1),
            color: [1.0, 1.0, 1.0],
            flares: false,
        }
    }

    /// Dress the node as a missile.
    pub fn apply_missile_texture(&mut self, texture: TextureId) {
        self.texture = Some(texture);
        self.texture_frames = MISSILE_TEXTURE_FRAMES;
        self.color = MISSILE_COLOR;
        self.flares = true;
    }

    pub fn move_to(&mut self, position: Vec3, velocity: Vec3) {
        self.position = position;
        self.velocity = velocity;
    }
}

/// Receives dynamic nodes for the current frame.
pub trait SceneSink {
    fn add_dynamic_node(&mut self, node: &BoltVisual);
}

/// A point on the radar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub at: Vec2,
    pub size: f32,
    /// `None` keeps the current radar colour.
    pub color: Option<[f32; 3]>,
}

/// Radar primitives for one shot, in world x/y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarGlyph {
    pub line: Option<[Vec2; 2]>,
    pub point: Option<RadarPoint>,
}

pub fn radar_glyph(position: Vec3, velocity: Vec3, display: &RadarDisplay, tail_length: f32) -> RadarGlyph {
    let origin = position.truncate();

    if display.lined_shots > 0 {
        let dir = (velocity.normalize_or_zero() * tail_length * display.lined_shots as f32).truncate();
        let end = if display.leading_line {
            origin + dir
        } else {
            origin - dir
        };
        let tip = (display.sized_shots > 0).then(|| RadarPoint {
            at: origin,
            size: display.sized_shots as f32,
            color: Some(RADAR_TIP_COLOR),
        });
        return RadarGlyph {
            line: Some([origin, end]),
            point: tip,
        };
    }

    let size = if display.sized_shots > 0 {
        display.sized_shots as f32
    } else {
        1.0
    };
    RadarGlyph {
        line: None,
        point: Some(RadarPoint {
            at: origin,
            size,
            color: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_line_with_tip() {
        let display = RadarDisplay {
            lined_shots: 2,
            sized_shots: 3,
            leading_line: false,
        };
        let glyph = radar_glyph(Vec3::new(10.0, 10.0, 5.0), Vec3::new(0.0, 50.0, 0.0), &display, 4.0);
        assert_eq!(glyph.line, Some([Vec2::new(10.0, 10.0), Vec2::new(10.0, 2.0)]));
        let tip = glyph.point.unwrap();
        assert_eq!(tip.size, 3.0);
        assert_eq!(tip.color, Some(RADAR_TIP_COLOR));
    }

    #[test]
    fn test_leading_line_without_tip() {
        let display = RadarDisplay {
            lined_shots: 1,
            sized_shots: 0,
            leading_line: true,
        };
        let glyph = radar_glyph(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0), &display, 5.0);
        assert_eq!(glyph.line, Some([Vec2::ZERO, Vec2::new(3.0, 0.0)]));
        assert!(glyph.point.is_none());
    }

    #[test]
    fn test_plain_point() {
        let display = RadarDisplay {
            lined_shots: 0,
            sized_shots: 0,
            leading_line: false,
        };
        let glyph = radar_glyph(Vec3::new(1.0, 2.0, 3.0), Vec3::X, &display, 4.0);
        assert!(glyph.line.is_none());
        assert_eq!(
            glyph.point,
            Some(RadarPoint {
                at: Vec2::new(1.0, 2.0),
                size: 1.0,
                color: None
            })
        );
    }

    #[test]
    fn test_missile_texture_dresses_node() {
        let mut node = BoltVisual::new(Vec3::ZERO, Vec3::X);
        node.apply_missile_texture(TextureId(7));
        assert_eq!(node.texture, Some(TextureId(7)));
        assert_eq!(node.texture_frames, (4, 4));
        assert_eq!(node.color, MISSILE_COLOR);
        assert!(node.flares);
        node.move_to(Vec3::ONE, Vec3::Y);
        assert_eq!(node.position, Vec3::ONE);
    }
}
