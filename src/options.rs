//! Session configuration and defaults.

use std::f32::consts::PI;

use raylib::prelude::*;

use crate::core::entity::Sprite;
use crate::core::input::{DefaultEventHandler, EventHandler};
use crate::engine::GameState;
use crate::error::EngineError;
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::{FloorCeilingMapping, TextureAtlas, WallMapping};

/// Called after every simulation tick with the state and the sprite
/// registry (ordered far to near once a frame has been rendered).
pub type MoveHandler = Box<dyn FnMut(&GameState, &[Sprite])>;

/// Called at the end of every rendered frame, before presentation; the
/// hit-lists and crosshair data are complete at that point.
pub type DrawHandler = Box<dyn FnMut(&mut Framebuffer, &GameState, &[Sprite])>;

/// Immutable-for-session engine configuration. Every field has a default;
/// build with struct update syntax over `RenderOptions::default()`.
pub struct RenderOptions {
    /// Minimap cell size in pixels; the minimap framebuffer is sized to the
    /// map dimensions times this at start.
    pub minimap_scale: u32,
    pub minimap_player_color: Color,

    /// Key handler mutating the player's movement intent.
    pub event_handler: Box<dyn EventHandler>,
    pub move_handler: Option<MoveHandler>,
    pub draw_handler: Option<DrawHandler>,

    pub wall_atlas: TextureAtlas,
    pub wall_mapping: WallMapping,
    pub floor_ceiling_atlas: TextureAtlas,
    pub floor_ceiling_mapping: FloorCeilingMapping,
    /// Tile size shared by all atlases.
    pub texture_width: u32,
    pub texture_height: u32,

    /// Optional sky panorama wrapped across the top half of the screen.
    pub sky_image: Option<TextureAtlas>,
    pub ceiling_color: Color,
    pub floor_color: Color,

    /// Simulation ticks per second.
    pub move_rate: u32,

    /// Projection plane size in pixels.
    pub screen_width: u32,
    pub screen_height: u32,
    /// Displayed element size; presentation scales the framebuffer up.
    pub screen_element_width: u32,
    pub screen_element_height: u32,
    /// Width of each rendered column, in pixels.
    pub strip_width: u32,
    /// Field of view, in radians.
    pub fov: f32,
    /// Wall standoff for collision probes, in map units.
    pub min_dist_to_wall: f32,

    /// Offsets moving sprites into the center of their tile.
    pub sprite_draw_offset_x: f32,
    pub sprite_draw_offset_y: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            minimap_scale: 10,
            minimap_player_color: Color::BLUE,
            event_handler: Box::new(DefaultEventHandler),
            move_handler: None,
            draw_handler: None,
            wall_atlas: TextureAtlas::default(),
            wall_mapping: WallMapping::new(),
            floor_ceiling_atlas: TextureAtlas::default(),
            floor_ceiling_mapping: FloorCeilingMapping::new(),
            texture_width: 64,
            texture_height: 64,
            sky_image: None,
            ceiling_color: Color::GRAY,
            floor_color: Color::LIGHTGRAY,
            move_rate: 30,
            screen_width: 320,
            screen_height: 200,
            screen_element_width: 480,
            screen_element_height: 300,
            strip_width: 2,
            fov: 60.0 * PI / 180.0,
            min_dist_to_wall: 0.2,
            sprite_draw_offset_x: 0.5,
            sprite_draw_offset_y: 0.5,
        }
    }
}

impl RenderOptions {
    /// Validates the numeric configuration once, before any loop runs.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(EngineError::InvalidOptions { reason: "screen size must be non-zero" });
        }
        if self.strip_width == 0 {
            return Err(EngineError::InvalidOptions { reason: "strip_width must be at least 1" });
        }
        if self.texture_width == 0 || self.texture_height == 0 {
            return Err(EngineError::InvalidOptions { reason: "texture tile size must be at least 1" });
        }
        if self.move_rate == 0 {
            return Err(EngineError::InvalidOptions { reason: "move_rate must be at least 1" });
        }
        if self.minimap_scale == 0 {
            return Err(EngineError::InvalidOptions { reason: "minimap_scale must be at least 1" });
        }
        if !(self.fov > 0.0 && self.fov < PI) {
            return Err(EngineError::InvalidOptions { reason: "fov must lie strictly between 0 and pi" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = RenderOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.screen_width, 320);
        assert_eq!(options.strip_width, 2);
        assert_eq!(options.move_rate, 30);
        assert!((options.fov - 60.0 * PI / 180.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_strip = RenderOptions { strip_width: 0, ..RenderOptions::default() };
        assert!(matches!(
            zero_strip.validate(),
            Err(EngineError::InvalidOptions { .. })
        ));

        let wild_fov = RenderOptions { fov: PI, ..RenderOptions::default() };
        assert!(matches!(
            wild_fov.validate(),
            Err(EngineError::InvalidOptions { .. })
        ));
    }
}
