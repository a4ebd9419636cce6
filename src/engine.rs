//! Engine session context and the two tick loops.
//!
//! One [`Engine`] owns everything for a play session: options, framebuffers,
//! game state, the sprite registry, the per-frame column distances and both
//! tick schedules. There are no module-level singletons; independent
//! sessions can coexist.
//!
//! The simulation tick and the render tick run on independent schedules but
//! on the caller's thread, driven through [`Engine::pump`]. They are
//! serialized and never re-entrant, so the single mutable state record needs
//! no further synchronization. Within one render tick the column distance
//! array is fully rebuilt before sprite projection reads it, and every
//! hit-list is rebuilt before the draw callback can observe it.

use std::time::{Duration, Instant};

use crate::core::entity::{Player, Sprite, SpriteId};
use crate::core::input::KeyEvent;
use crate::core::map::Map;
use crate::core::movement;
use crate::error::EngineError;
use crate::options::RenderOptions;
use crate::render::framebuffer::Framebuffer;
use crate::render::minimap::render_minimap;
use crate::render::sprites::render_sprites;
use crate::render::textures::AtlasKind;
use crate::render::walls::{Projection, draw_backdrop, render_walls};

/// Target interval between rendered frames.
const RENDER_INTERVAL: Duration = Duration::from_millis(20);

/// Shared session state: the map and the player.
#[derive(Debug)]
pub struct GameState {
    pub map: Map,
    pub player: Player,
}

/// Framebuffers the engine renders into.
pub struct RenderTargets {
    pub screen: Framebuffer,
    /// Resized to the map dimensions at start; `None` disables the minimap.
    pub minimap: Option<Framebuffer>,
}

pub struct Engine {
    options: RenderOptions,
    projection: Projection,
    screen: Framebuffer,
    minimap: Option<Framebuffer>,

    state: Option<GameState>,
    sprites: Vec<Sprite>,
    next_sprite_id: u32,

    /// Perpendicular wall distance per screen column, rebuilt every frame.
    dist_array: Vec<f32>,

    running: bool,
    sim_due: Option<Instant>,
    render_due: Option<Instant>,
    last_sim: Option<Instant>,
    sim_ticks: u64,
    render_ticks: u64,
}

impl Engine {
    /// Creates a session. Fails when the screen target is missing
    /// (zero-sized), the configuration is unusable, or a configured atlas is
    /// not ready; atlas readiness is checked here once instead of surfacing
    /// mid-frame.
    pub fn initialize(targets: RenderTargets, options: RenderOptions) -> Result<Self, EngineError> {
        if targets.screen.is_empty() {
            return Err(EngineError::MissingRenderTarget);
        }
        options.validate()?;
        options.wall_atlas.ensure_ready(AtlasKind::Wall)?;
        options.floor_ceiling_atlas.ensure_ready(AtlasKind::FloorCeiling)?;
        if let Some(sky) = &options.sky_image {
            sky.ensure_ready(AtlasKind::Sky)?;
        }

        let mut screen = targets.screen;
        screen.resize(options.screen_width, options.screen_height);
        let projection = Projection::new(&options);
        let dist_array = Vec::with_capacity(projection.num_rays);

        Ok(Self {
            options,
            projection,
            screen,
            minimap: targets.minimap,
            state: None,
            sprites: Vec::new(),
            next_sprite_id: 0,
            dist_array,
            running: false,
            sim_due: None,
            render_due: None,
            last_sim: None,
            sim_ticks: 0,
            render_ticks: 0,
        })
    }

    /// Starts a session on a validated map and initial player state. Both
    /// schedules become due immediately; drive them with [`Engine::pump`].
    pub fn start(&mut self, map: Map, player: Player, now: Instant) {
        if let Some(minimap) = &mut self.minimap {
            minimap.resize(
                map.width() as u32 * self.options.minimap_scale,
                map.height() as u32 * self.options.minimap_scale,
            );
        }
        self.state = Some(GameState { map, player });
        self.running = true;
        self.last_sim = None;
        self.sim_due = Some(now);
        self.render_due = Some(now);
        log::debug!("session started, {} rays per frame", self.projection.num_rays);
    }

    /// Requests a cooperative stop; each loop stops at its next tick
    /// boundary, independently.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Registers one sprite; fields the caller does not care about come
    /// from `Sprite::default()`. Returns the assigned id.
    pub fn add_sprite(&mut self, mut sprite: Sprite) -> Result<SpriteId, EngineError> {
        sprite.atlas.ensure_ready(AtlasKind::Sprite)?;
        let id = SpriteId(self.next_sprite_id);
        self.next_sprite_id += 1;
        sprite.id = id;
        self.sprites.push(sprite);
        Ok(id)
    }

    /// Empties the sprite registry between levels.
    pub fn clear_sprites(&mut self) {
        self.sprites.clear();
    }

    pub fn key_down(&mut self, ev: KeyEvent) {
        if let Some(state) = &mut self.state {
            self.options.event_handler.on_key_down(state, ev);
        }
    }

    pub fn key_up(&mut self, ev: KeyEvent) {
        if let Some(state) = &mut self.state {
            self.options.event_handler.on_key_up(state, ev);
        }
    }

    /// Runs at most one due simulation tick and one due render tick, in
    /// that order. A late tick is compensated through `time_correction` and
    /// a shortened next interval rather than by queuing catch-up ticks.
    /// Render errors are frame-fatal: the frame is abandoned and logged,
    /// and the simulation schedule is untouched.
    pub fn pump(&mut self, now: Instant) {
        if self.running && self.sim_due.is_some_and(|due| now >= due) {
            self.sim_tick(now);
        }
        if self.running && self.render_due.is_some_and(|due| now >= due) {
            if let Err(err) = self.render_tick() {
                log::error!("render frame aborted: {err}");
            }
            self.render_due = Some(now + RENDER_INTERVAL);
            self.render_ticks += 1;
        }
    }

    fn sim_tick(&mut self, now: Instant) {
        let nominal_ms = 1000.0 / self.options.move_rate as f32;
        let elapsed_ms = self
            .last_sim
            .map(|t| now.duration_since(t).as_secs_f32() * 1000.0);

        // The first tick has no elapsed time to measure; run it uncorrected.
        let time_correction = match elapsed_ms {
            Some(ms) => ms / nominal_ms,
            None => 1.0,
        };

        if let Some(state) = &mut self.state {
            movement::advance(
                &mut state.player.ent,
                &state.map,
                time_correction,
                self.options.min_dist_to_wall,
                (0.0, 0.0),
            );
            let offset = (
                self.options.sprite_draw_offset_x,
                self.options.sprite_draw_offset_y,
            );
            for sprite in self.sprites.iter_mut().filter(|s| s.is_moving) {
                movement::advance(
                    &mut sprite.ent,
                    &state.map,
                    time_correction,
                    self.options.min_dist_to_wall,
                    offset,
                );
            }
            if let Some(handler) = self.options.move_handler.as_mut() {
                handler(state, &self.sprites);
            }
        }

        // Lag compensation: subtract the overrun from the nominal interval
        // instead of piling up extra ticks.
        let mut next_ms = nominal_ms;
        if let Some(ms) = elapsed_ms {
            if ms > nominal_ms {
                next_ms = (nominal_ms - (ms - nominal_ms)).max(1.0);
            }
        }
        self.last_sim = Some(now);
        self.sim_due = Some(now + Duration::from_secs_f32(next_ms / 1000.0));
        self.sim_ticks += 1;
    }

    fn render_tick(&mut self) -> Result<(), EngineError> {
        let frame_start = Instant::now();
        let Self {
            options,
            projection,
            screen,
            minimap,
            state,
            sprites,
            dist_array,
            ..
        } = self;
        let Some(state) = state.as_mut() else {
            return Ok(());
        };

        screen.clear();
        draw_backdrop(screen, options, state.player.ent.rot);
        render_walls(
            screen,
            &state.map,
            options,
            projection,
            state.player.ent.x,
            state.player.ent.y,
            state.player.ent.rot,
            dist_array,
        )?;
        render_sprites(screen, options, projection, &mut state.player, sprites, dist_array)?;
        if let Some(minimap) = minimap.as_mut() {
            render_minimap(minimap, &state.map, &state.player, sprites, options);
        }
        if let Some(handler) = options.draw_handler.as_mut() {
            handler(screen, state, sprites);
        }
        log::trace!("frame rendered in {:?}", frame_start.elapsed());
        Ok(())
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn screen(&self) -> &Framebuffer {
        &self.screen
    }

    pub fn minimap(&self) -> Option<&Framebuffer> {
        self.minimap.as_ref()
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Perpendicular wall distances from the last rendered frame.
    pub fn column_distances(&self) -> &[f32] {
        &self.dist_array
    }

    pub fn sim_ticks(&self) -> u64 {
        self.sim_ticks
    }

    pub fn render_ticks(&self) -> u64 {
        self.render_ticks
    }
}
