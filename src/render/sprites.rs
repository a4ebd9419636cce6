//! Sprite projection: painter-ordered billboards clipped per column
//! against the wall distances of the current frame.
//!
//! Every sprite's `hit_list` is rebuilt from scratch here; collaborators
//! read it after the frame for hit testing.

use std::cmp::Ordering;

use crate::core::entity::{HitSpan, Player, Sprite};
use crate::error::EngineError;
use crate::options::RenderOptions;
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::AtlasKind;
use crate::render::walls::Projection;

/// Distances below this are degenerate: the sprite sits on the viewer and
/// is skipped instead of blowing up the projection.
const MIN_SPRITE_DIST: f32 = 1e-4;

/// Relative tolerance when comparing a sprite against a column's wall
/// distance; rounding errors grow with distance.
const OCCLUSION_TOLERANCE: f32 = 0.1;

/// Sorts the registry far to near, projects each sprite and draws its
/// unoccluded column runs. Fills the player's per-frame sprite distances
/// and crosshair hits.
pub fn render_sprites(
    fb: &mut Framebuffer,
    options: &RenderOptions,
    proj: &Projection,
    player: &mut Player,
    sprites: &mut [Sprite],
    dist_array: &[f32],
) -> Result<(), EngineError> {
    player.sprite_distances.clear();
    player.crosshair_hits.clear();
    if sprites.is_empty() {
        return Ok(());
    }

    let off_x = options.sprite_draw_offset_x;
    let off_y = options.sprite_draw_offset_y;
    let (px, py, prot) = (player.ent.x, player.ent.y, player.ent.rot);

    // Distances are computed once per sprite and reused for the sort and
    // the projection; the cache never survives the frame.
    for sprite in sprites.iter() {
        let dx = sprite.ent.x - off_x - px;
        let dy = sprite.ent.y - off_y - py;
        player
            .sprite_distances
            .insert(sprite.id, (dx * dx + dy * dy).sqrt());
    }

    // Painter's algorithm: farthest first, so nearer sprites overdraw.
    let distances = &player.sprite_distances;
    sprites.sort_by(|a, b| {
        let da = distances.get(&a.id).copied().unwrap_or(0.0);
        let db = distances.get(&b.id).copied().unwrap_or(0.0);
        db.partial_cmp(&da).unwrap_or(Ordering::Equal)
    });

    let screen_w = options.screen_width as f32;
    let screen_h = options.screen_height as f32;
    let strip_w = options.strip_width as i32;

    for sprite in sprites.iter_mut() {
        sprite.hit_list.clear();
        sprite.crosshair_u = None;

        let Some(dist) = player.sprite_distances.get(&sprite.id).copied() else {
            continue;
        };
        if dist < MIN_SPRITE_DIST {
            continue;
        }

        let rel_x = sprite.ent.x - off_x - px;
        let rel_y = sprite.ent.y - off_y - py;
        let bearing = rel_y.atan2(rel_x) - prot;
        let size = proj.view_dist / (bearing.cos() * dist);
        // Behind the viewer or projected to nothing.
        if !size.is_finite() || size <= 0.0 {
            continue;
        }

        sprite.atlas.ensure_ready(AtlasKind::Sprite)?;

        let x0 = (screen_w / 2.0 + bearing.tan() * proj.view_dist - size * sprite.scale_x / 2.0)
            .floor() as i32;
        // Vertical placement constants put a unit-scale sprite on the
        // floor plane.
        let y0 = (screen_h / 2.0 - (0.55 + sprite.scale_y - 1.0) * size).floor() as i32;
        let width_px = (size * sprite.scale_x).floor() as i32;
        let height_px = ((sprite.height as f32 * 0.01 * size).ceil()
            + (0.45 + sprite.scale_y - 1.0) * size) as i32;
        if width_px <= 0 || height_px <= 0 {
            continue;
        }

        let n_strips = (width_px as f32 / strip_w as f32).ceil() as i32;

        // Walk the horizontal extent strip by strip, collecting contiguous
        // visible runs; each run becomes one blit and one hit-list span.
        let mut runs: Vec<(i32, i32)> = Vec::new();
        let mut run_start: Option<i32> = None;
        for j in 0..=n_strips {
            let visible = j < n_strips && {
                let col_x = x0 + j * strip_w;
                let idx = (col_x as f32 * dist_array.len() as f32 / screen_w).floor();
                if idx < 0.0 || idx >= dist_array.len() as f32 {
                    // Off screen: never visible.
                    false
                } else {
                    let wall = dist_array[idx as usize];
                    wall - dist >= -OCCLUSION_TOLERANCE * dist
                }
            };
            match (run_start, visible) {
                (None, true) => run_start = Some(j),
                (Some(start), false) => {
                    runs.push((start, j));
                    run_start = None;
                }
                _ => {}
            }
        }

        for (start, end) in runs {
            let ds_start = start * strip_w;
            let ds_end = (end * strip_w).min(width_px);
            let screen_x = x0 + ds_start;
            let screen_wd = ds_end - ds_start;
            if screen_wd <= 0 {
                continue;
            }

            let atlas_from =
                (ds_start as f32 * sprite.width as f32 / width_px as f32).floor() as i32;
            let atlas_to = (ds_end as f32 * sprite.width as f32 / width_px as f32).floor() as i32;
            let atlas_x = sprite.offset_x + atlas_from;
            let atlas_wd = (atlas_to - atlas_from).min(sprite.width - atlas_from);
            if atlas_wd <= 0 {
                continue;
            }

            blit_sprite(fb, sprite, atlas_x, atlas_wd, screen_x, screen_wd, y0, height_px);
            sprite.hit_list.push(HitSpan {
                atlas_x,
                atlas_w: atlas_wd,
                screen_x,
                screen_w: screen_wd,
            });

            // Crosshair straddle check against the screen middle.
            let mid = proj.screen_middle as i32;
            let ch = player.crosshair_size;
            if screen_x <= mid + ch - 1 && screen_x + screen_wd >= mid - ch + 1 {
                sprite.crosshair_u =
                    Some((mid - screen_x) as f32 * atlas_wd as f32 / screen_wd as f32);
                if !player.crosshair_hits.contains(&sprite.id) {
                    player.crosshair_hits.push(sprite.id);
                }
            }
        }
    }
    Ok(())
}

/// Scales one atlas span onto the screen, skipping transparent pixels.
#[allow(clippy::too_many_arguments)]
fn blit_sprite(
    fb: &mut Framebuffer,
    sprite: &Sprite,
    atlas_x: i32,
    atlas_w: i32,
    screen_x: i32,
    screen_w: i32,
    y0: i32,
    height_px: i32,
) {
    for dx in 0..screen_w {
        let sx = screen_x + dx;
        if sx < 0 || sx >= fb.width as i32 {
            continue;
        }
        let tx = atlas_x + (dx as f32 * atlas_w as f32 / screen_w as f32) as i32;
        for dy in 0..height_px {
            let sy = y0 + dy;
            if sy < 0 || sy >= fb.height as i32 {
                continue;
            }
            let ty = sprite.offset_y + (dy as f32 * sprite.height as f32 / height_px as f32) as i32;
            let color = sprite.atlas.sample(tx as u32, ty as u32);
            if color.a < 8 {
                continue;
            }
            fb.set_pixel_color(sx as u32, sy as u32, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::SpriteId;
    use crate::render::textures::TextureAtlas;
    use raylib::prelude::Color;
    use std::sync::Arc;

    fn test_options() -> RenderOptions {
        RenderOptions::default()
    }

    /// Sprite whose tile-centered position lands at world (x, y).
    fn sprite_at(id: u32, x: f32, y: f32) -> Sprite {
        Sprite {
            id: SpriteId(id),
            ent: crate::core::entity::Entity {
                x: x + 0.5,
                y: y + 0.5,
                ..Default::default()
            },
            atlas: Arc::new(TextureAtlas::solid(64, 64, Color::YELLOW)),
            ..Sprite::default()
        }
    }

    fn render(
        sprites: &mut [Sprite],
        player: &mut Player,
        dist_array: &[f32],
    ) -> Framebuffer {
        let options = test_options();
        let proj = Projection::new(&options);
        let mut fb = Framebuffer::new(options.screen_width, options.screen_height);
        render_sprites(&mut fb, &options, &proj, player, sprites, dist_array).unwrap();
        fb
    }

    #[test]
    fn visible_sprite_gets_a_hit_list_span() {
        let mut player = Player::default();
        player.ent.x = 5.0;
        player.ent.y = 5.0;
        // Sprite three units ahead, walls at distance five everywhere.
        let mut sprites = vec![sprite_at(0, 8.0, 5.0)];
        let walls = vec![5.0f32; 160];

        let fb = render(&mut sprites, &mut player, &walls);

        let spans = &sprites[0].hit_list;
        assert_eq!(spans.len(), 1, "expected one contiguous visible run");
        let span = spans[0];
        assert!(span.screen_w > 0);
        // The sprite is dead ahead, so its run covers the screen middle.
        assert!(span.screen_x <= 160 && span.screen_x + span.screen_w >= 160);
        assert_eq!(player.crosshair_hits, vec![SpriteId(0)]);
        assert!(sprites[0].crosshair_u.is_some());
        assert!((player.sprite_distances[&SpriteId(0)] - 3.0).abs() < 1e-4);

        // Drawn pixels carry the sprite atlas color at the screen center.
        assert_eq!(fb.get_pixel(160, 100), Color::YELLOW);
    }

    #[test]
    fn occluded_sprite_is_excluded() {
        let mut player = Player::default();
        player.ent.x = 5.0;
        player.ent.y = 5.0;
        // Sprite at distance seven, walls at distance five: behind the wall.
        let mut sprites = vec![sprite_at(0, 12.0, 5.0)];
        let walls = vec![5.0f32; 160];

        let fb = render(&mut sprites, &mut player, &walls);

        assert!(sprites[0].hit_list.is_empty());
        assert!(player.crosshair_hits.is_empty());
        assert_eq!(fb.get_pixel(160, 100), Color::BLACK);
    }

    #[test]
    fn depth_order_is_farthest_first() {
        let mut player = Player::default();
        player.ent.x = 2.0;
        player.ent.y = 2.0;
        // Distances 2, 8 and 5 along the heading.
        let mut sprites = vec![
            sprite_at(0, 4.0, 2.0),
            sprite_at(1, 10.0, 2.0),
            sprite_at(2, 7.0, 2.0),
        ];
        let walls = vec![f32::INFINITY; 160];

        render(&mut sprites, &mut player, &walls);

        let order: Vec<u32> = sprites.iter().map(|s| s.id.0).collect();
        assert_eq!(order, vec![1, 2, 0], "visit order must be [8, 5, 2]");
        assert!((player.sprite_distances[&SpriteId(0)] - 2.0).abs() < 1e-4);
        assert!((player.sprite_distances[&SpriteId(1)] - 8.0).abs() < 1e-4);
        assert!((player.sprite_distances[&SpriteId(2)] - 5.0).abs() < 1e-4);
    }

    #[test]
    fn sprite_on_the_viewer_is_skipped_without_error() {
        let mut player = Player::default();
        player.ent.x = 4.0;
        player.ent.y = 4.0;
        // Tile-centered sprite position coincides with the viewer exactly.
        let mut sprites = vec![sprite_at(0, 4.0, 4.0)];
        let walls = vec![5.0f32; 160];

        render(&mut sprites, &mut player, &walls);

        assert!(sprites[0].hit_list.is_empty());
        assert!(sprites[0].crosshair_u.is_none());
        assert!(player.crosshair_hits.is_empty());
    }

    #[test]
    fn sprite_behind_the_viewer_is_skipped() {
        let mut player = Player::default();
        player.ent.x = 5.0;
        player.ent.y = 5.0;
        let mut sprites = vec![sprite_at(0, 1.0, 5.0)];
        let walls = vec![5.0f32; 160];

        render(&mut sprites, &mut player, &walls);
        assert!(sprites[0].hit_list.is_empty());
    }

    #[test]
    fn partial_occlusion_splits_the_run() {
        let mut player = Player::default();
        player.ent.x = 5.0;
        player.ent.y = 5.0;
        let mut sprites = vec![sprite_at(0, 8.0, 5.0)];
        // Near wall over the right half of the screen only.
        let mut walls = vec![5.0f32; 160];
        for w in walls.iter_mut().skip(80) {
            *w = 1.0;
        }

        render(&mut sprites, &mut player, &walls);

        let spans = &sprites[0].hit_list;
        assert_eq!(spans.len(), 1);
        // Only the strips left of the near wall survive.
        assert_eq!(spans[0].screen_x, 113);
        assert_eq!(spans[0].screen_w, 48);
    }
}
