//! Demo: a small textured arena with a few drifting orb sprites.
//!
//! Everything here goes through the public engine API; the binary only owns
//! the window, feeds key events and presents the framebuffers.

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use raylib::core::texture::RaylibTexture2D;
use raylib::prelude::*;

use gridcast::core::entity::{Entity, Player, Sprite};
use gridcast::core::input::KeyEvent;
use gridcast::core::map::Map;
use gridcast::engine::{Engine, RenderTargets};
use gridcast::options::RenderOptions;
use gridcast::render::framebuffer::Framebuffer;
use gridcast::render::textures::{FloorCeilingOffsets, TextureAtlas};

const TILE: u32 = 64;

#[rustfmt::skip]
const ARENA: [[i32; 12]; 10] = [
    [1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2],
    [1, 0, -1, -1, 0, 0, 0, 0, 2, 0, 0, 2],
    [1, 0, -1, -1, 0, 0, 0, 0, 2, 0, 0, 2],
    [1, 0, 0, 0, 0, 1, 0, 0, 2, 0, 0, 2],
    [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 2],
    [1, 0, 0, 0, 0, 0, 0, -1, -1, 0, 0, 2],
    [1, 0, 2, 2, 0, 0, 0, -1, -1, 0, 0, 2],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

fn arena_map() -> Map {
    let rows = ARENA.iter().map(|r| r.to_vec()).collect();
    Map::from_rows(rows).expect("arena rows are rectangular")
}

/// Loads an atlas image or falls back to a procedurally generated one.
fn load_atlas(path: &str, fallback: TextureAtlas) -> TextureAtlas {
    match Image::load_image(path) {
        Ok(img) => TextureAtlas::from_image(&img),
        Err(_) => {
            log::info!("no atlas at {path}, using procedural fallback");
            fallback
        }
    }
}

/// Two wall tiles side by side.
fn fallback_wall_atlas() -> TextureAtlas {
    let stone = TextureAtlas::checker(TILE, TILE, Color::new(110, 96, 80, 255));
    let brick = TextureAtlas::checker(TILE, TILE, Color::new(130, 60, 52, 255));
    let mut px = Vec::with_capacity((TILE * 2 * TILE) as usize);
    for y in 0..TILE {
        for x in 0..TILE {
            px.push(stone.sample(x, y));
        }
        for x in 0..TILE {
            px.push(brick.sample(x, y));
        }
    }
    TextureAtlas::from_pixels(TILE * 2, TILE, px)
}

/// Floor tile next to a darker ceiling tile.
fn fallback_floor_ceiling_atlas() -> TextureAtlas {
    let floor = TextureAtlas::checker(TILE, TILE, Color::new(60, 70, 60, 255));
    let ceiling = TextureAtlas::checker(TILE, TILE, Color::new(34, 38, 48, 255));
    let mut px = Vec::with_capacity((TILE * 2 * TILE) as usize);
    for y in 0..TILE {
        for x in 0..TILE {
            px.push(floor.sample(x, y));
        }
        for x in 0..TILE {
            px.push(ceiling.sample(x, y));
        }
    }
    TextureAtlas::from_pixels(TILE * 2, TILE, px)
}

/// Glowing orb with a transparent surround.
fn orb_atlas() -> TextureAtlas {
    let size = TILE;
    let mut px = vec![Color::new(0, 0, 0, 0); (size * size) as usize];
    let center = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let d = (dx * dx + dy * dy).sqrt() / center;
            if d < 0.85 {
                let glow = (1.0 - d / 0.85).clamp(0.0, 1.0);
                px[(y * size + x) as usize] = Color::new(
                    255,
                    (200.0 + 55.0 * glow) as u8,
                    (60.0 + 120.0 * glow) as u8,
                    255,
                );
            }
        }
    }
    TextureAtlas::from_pixels(size, size, px)
}

fn demo_options() -> RenderOptions {
    let mut options = RenderOptions {
        wall_atlas: load_atlas("assets/walls.png", fallback_wall_atlas()),
        floor_ceiling_atlas: load_atlas("assets/floors.png", fallback_floor_ceiling_atlas()),
        screen_element_width: 960,
        screen_element_height: 600,
        draw_handler: Some(Box::new(|fb, _state, _sprites| {
            // Crosshair overlay.
            let cx = fb.width / 2;
            let cy = fb.height / 2;
            fb.set_current_color(Color::WHITE);
            for d in 0..5 {
                fb.set_pixel(cx - 2 + d, cy);
                fb.set_pixel(cx, cy - 2 + d);
            }
        })),
        ..RenderOptions::default()
    };
    options.wall_mapping.insert(1, (0, 0));
    options.wall_mapping.insert(2, (TILE, 0));
    options.floor_ceiling_mapping.insert(
        -1,
        FloorCeilingOffsets { floor: (0, 0), ceiling: (TILE, 0) },
    );
    options
}

/// Scatters orbs over open cells, drifting in slow circles.
fn spawn_orbs(engine: &mut Engine, map: &Map, count: usize) {
    let atlas = Arc::new(orb_atlas());
    let mut rng = rand::thread_rng();
    let mut placed = 0;
    while placed < count {
        let x = rng.gen_range(1..map.width() - 1);
        let y = rng.gen_range(1..map.height() - 1);
        if map.cell(x as isize, y as isize) != Some(0) {
            continue;
        }
        let sprite = Sprite {
            ent: Entity {
                x: x as f32 + 0.5,
                y: y as f32 + 0.5,
                rot: rng.gen_range(0.0..std::f32::consts::TAU),
                speed: 1.0,
                dir: 1.0,
                ..Sprite::default().ent
            },
            is_moving: true,
            draw_on_minimap: true,
            minimap_color: Color::ORANGE,
            atlas: Arc::clone(&atlas),
            scale_x: 0.5,
            scale_y: 0.5,
            ..Sprite::default()
        };
        if engine.add_sprite(sprite).is_ok() {
            placed += 1;
        }
    }
}

fn feed_key_events(rl: &RaylibHandle, engine: &mut Engine) {
    let ctrl = rl.is_key_down(KeyboardKey::KEY_LEFT_CONTROL)
        || rl.is_key_down(KeyboardKey::KEY_RIGHT_CONTROL);
    let shift = rl.is_key_down(KeyboardKey::KEY_LEFT_SHIFT)
        || rl.is_key_down(KeyboardKey::KEY_RIGHT_SHIFT);
    for key in [
        KeyboardKey::KEY_UP,
        KeyboardKey::KEY_DOWN,
        KeyboardKey::KEY_LEFT,
        KeyboardKey::KEY_RIGHT,
    ] {
        let ev = KeyEvent { key, ctrl, shift };
        if rl.is_key_pressed(key) {
            engine.key_down(ev);
        }
        if rl.is_key_released(key) {
            engine.key_up(ev);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let options = demo_options();
    let element_w = options.screen_element_width as i32;
    let element_h = options.screen_element_height as i32;
    let screen_w = options.screen_width;
    let screen_h = options.screen_height;
    let scale = element_w as f32 / screen_w as f32;

    let (mut rl, thread) = raylib::init()
        .size(element_w, element_h)
        .title("gridcast demo")
        .build();
    rl.set_target_fps(60);

    let map = arena_map();
    let targets = RenderTargets {
        screen: Framebuffer::new(screen_w, screen_h),
        minimap: Some(Framebuffer::new(1, 1)),
    };
    let mut engine = Engine::initialize(targets, options)?;
    spawn_orbs(&mut engine, &map, 4);

    let player = Player {
        ent: Entity { x: 1.5, y: 1.5, rot: 0.6, ..Entity::default() },
        ..Player::default()
    };
    engine.start(map, player, Instant::now());

    // Persistent textures the framebuffers are streamed into.
    let screen_img = Image::gen_image_color(screen_w as i32, screen_h as i32, Color::BLACK);
    let mut screen_tex = rl.load_texture_from_image(&thread, &screen_img)?;
    let minimap_fb = engine.minimap().expect("minimap enabled above");
    let minimap_img =
        Image::gen_image_color(minimap_fb.width as i32, minimap_fb.height as i32, Color::BLACK);
    let mut minimap_tex = rl.load_texture_from_image(&thread, &minimap_img)?;

    while !rl.window_should_close() && engine.running() {
        feed_key_events(&rl, &mut engine);
        engine.pump(Instant::now());

        engine.screen().upload_to_texture(&mut screen_tex);
        if let Some(minimap) = engine.minimap() {
            minimap.upload_to_texture(&mut minimap_tex);
        }
        let fps = rl.get_fps();

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        d.draw_texture_ex(&screen_tex, Vector2::zero(), 0.0, scale, Color::WHITE);
        d.draw_texture(&minimap_tex, element_w - minimap_tex.width() - 10, 10, Color::WHITE);
        d.draw_text(&format!("FPS: {fps}"), 10, 10, 20, Color::WHITE);
    }

    engine.stop();
    Ok(())
}
