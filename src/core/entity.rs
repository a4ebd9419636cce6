//! Entity, player and sprite state.

use std::collections::HashMap;
use std::f32::consts::PI;
use std::sync::Arc;

use raylib::prelude::Color;

use crate::render::textures::TextureAtlas;

/// Pose and movement intent shared by the player and sprites.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Position in map units.
    pub x: f32,
    pub y: f32,
    /// Rotation angle in radians.
    pub rot: f32,
    /// Turning direction: -1 left, 1 right, 0 none.
    pub dir: f32,
    /// Moving direction: 1 forward, -1 backwards, 0 none.
    pub speed: f32,
    /// Strafing direction: -1 left, 1 right, 0 none.
    pub strafe: f32,
    /// Move step per nominal simulation tick, in map units.
    pub move_speed: f32,
    /// Rotation step per nominal simulation tick, in radians.
    pub rot_speed: f32,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            x: 2.0,
            y: 2.0,
            rot: 0.0,
            dir: 0.0,
            speed: 0.0,
            strafe: 0.0,
            move_speed: 0.21,
            rot_speed: PI / 180.0,
        }
    }
}

/// Stable sprite identity assigned by the engine at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u32);

/// The viewpoint entity plus per-render-frame derived data.
///
/// `sprite_distances` and `crosshair_hits` are overwritten wholly on every
/// rendered frame and never carry state across frames.
#[derive(Debug, Clone)]
pub struct Player {
    pub ent: Entity,
    /// Rotation speed the turn keys reset to on release.
    pub min_rot_speed: f32,
    pub max_rot_speed: f32,
    /// Factor applied to `rot_speed` while a turn key is held.
    pub rot_accel: f32,
    /// Half-width in pixels of the screen region counted as the crosshair.
    pub crosshair_size: i32,
    /// Distance to every registered sprite, from the last rendered frame.
    pub sprite_distances: HashMap<SpriteId, f32>,
    /// Sprites whose visible spans straddled the crosshair last frame.
    pub crosshair_hits: Vec<SpriteId>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            ent: Entity::default(),
            min_rot_speed: 2.0 * PI / 180.0,
            max_rot_speed: 7.0 * PI / 180.0,
            rot_accel: 3.0,
            crosshair_size: 1,
            sprite_distances: HashMap::new(),
            crosshair_hits: Vec::new(),
        }
    }
}

/// One unoccluded part of a sprite: a run of atlas columns mapped to a run
/// of screen columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitSpan {
    pub atlas_x: i32,
    pub atlas_w: i32,
    pub screen_x: i32,
    pub screen_w: i32,
}

/// A billboard entity drawn from an atlas frame.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: SpriteId,
    pub ent: Entity,
    /// Whether the simulation tick advances this sprite.
    pub is_moving: bool,
    pub draw_on_minimap: bool,
    pub minimap_color: Color,

    pub atlas: Arc<TextureAtlas>,
    /// Current frame origin on the atlas, in pixels.
    pub offset_x: i32,
    pub offset_y: i32,
    /// Frame size on the atlas, in pixels.
    pub width: i32,
    pub height: i32,
    pub scale_x: f32,
    pub scale_y: f32,

    /// Visible spans from the last rendered frame; the render artifact
    /// consumed by hit-testing collaborators.
    pub hit_list: Vec<HitSpan>,
    /// Atlas x coordinate under the crosshair, when hit last frame.
    pub crosshair_u: Option<f32>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            id: SpriteId(0),
            ent: Entity {
                move_speed: 0.05,
                rot_speed: 6.0 * PI / 180.0,
                ..Entity::default()
            },
            is_moving: false,
            draw_on_minimap: false,
            minimap_color: Color::RED,
            atlas: Arc::new(TextureAtlas::default()),
            offset_x: 0,
            offset_y: 0,
            width: 64,
            height: 64,
            scale_x: 1.0,
            scale_y: 1.0,
            hit_list: Vec::new(),
            crosshair_u: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_session_conventions() {
        let player = Player::default();
        assert_eq!(player.ent.x, 2.0);
        assert_eq!(player.ent.move_speed, 0.21);
        assert!(player.sprite_distances.is_empty());

        let sprite = Sprite::default();
        assert_eq!(sprite.ent.move_speed, 0.05);
        assert_eq!(sprite.width, 64);
        assert!(!sprite.is_moving);
        assert!(sprite.hit_list.is_empty());
    }
}
