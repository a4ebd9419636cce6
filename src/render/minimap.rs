//! Top-down minimap overlay: wall cells, sprite markers and the player
//! marker with its heading line.

use raylib::prelude::*;

use crate::core::entity::{Player, Sprite};
use crate::core::map::Map;
use crate::options::RenderOptions;
use crate::render::framebuffer::Framebuffer;
use crate::render::line::draw_line;

const WALL_COLOR: Color = Color::new(200, 200, 200, 255);
const MARKER_SIZE: i32 = 4;

pub fn render_minimap(
    fb: &mut Framebuffer,
    map: &Map,
    player: &Player,
    sprites: &[Sprite],
    options: &RenderOptions,
) {
    let scale = options.minimap_scale as i32;
    fb.clear();

    fb.set_current_color(WALL_COLOR);
    for y in 0..map.height() {
        for x in 0..map.width() {
            if map.cell(x as isize, y as isize).unwrap_or(0) > 0 {
                fb.fill_rect(x as i32 * scale, y as i32 * scale, scale, scale);
            }
        }
    }

    for sprite in sprites.iter().filter(|s| s.draw_on_minimap) {
        fb.set_current_color(sprite.minimap_color);
        fb.fill_rect(
            ((sprite.ent.x - options.sprite_draw_offset_x) * scale as f32) as i32,
            ((sprite.ent.y - options.sprite_draw_offset_y) * scale as f32) as i32,
            MARKER_SIZE,
            MARKER_SIZE,
        );
    }

    let px = player.ent.x * scale as f32;
    let py = player.ent.y * scale as f32;
    fb.set_current_color(options.minimap_player_color);
    fb.fill_rect(px as i32 - 2, py as i32 - 2, MARKER_SIZE, MARKER_SIZE);
    draw_line(
        fb,
        px as i32,
        py as i32,
        (px + player.ent.rot.cos() * scale as f32) as i32,
        (py + player.ent.rot.sin() * scale as f32) as i32,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;

    #[test]
    fn walls_player_and_flagged_sprites_are_marked() {
        let map = Map::from_rows(vec![
            vec![1, 1, 1, 1],
            vec![1, 0, 0, 1],
            vec![1, 0, 0, 1],
            vec![1, 1, 1, 1],
        ])
        .unwrap();
        let options = RenderOptions::default();
        let mut fb = Framebuffer::new(40, 40);

        let player = Player {
            ent: Entity { x: 1.5, y: 1.5, ..Entity::default() },
            ..Player::default()
        };
        let shown = Sprite {
            ent: Entity { x: 2.5, y: 2.5, ..Entity::default() },
            draw_on_minimap: true,
            minimap_color: Color::RED,
            ..Sprite::default()
        };
        let hidden = Sprite {
            ent: Entity { x: 2.5, y: 1.5, ..Entity::default() },
            draw_on_minimap: false,
            ..Sprite::default()
        };

        render_minimap(&mut fb, &map, &player, &[shown, hidden], &options);

        // Wall corner cell.
        assert_eq!(fb.get_pixel(2, 2), WALL_COLOR);
        // Player marker around (15, 15).
        assert_eq!(fb.get_pixel(15, 15), options.minimap_player_color);
        // Flagged sprite marker at its tile-centered position (20, 20).
        assert_eq!(fb.get_pixel(21, 21), Color::RED);
        // Unflagged sprite leaves its spot untouched (open cell, cleared).
        assert_eq!(fb.get_pixel(21, 11), fb.background_color);
    }
}
