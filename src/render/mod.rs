//! Rendering: framebuffer, atlases and the per-frame passes.
//!
//! Re-exports:
//! - `framebuffer`: CPU framebuffer the engine draws into
//! - `textures`: texture atlases and per-code offset tables
//! - `caster`: grid-line ray traversal
//! - `line`: Bresenham integer line drawing
//! - `walls`: projection setup, wall strips and floor/ceiling rows
//! - `sprites`: painter-ordered billboards with occlusion hit-lists
//! - `minimap`: top-down overlay

pub mod caster;
pub mod framebuffer;
pub mod line;
pub mod minimap;
pub mod sprites;
pub mod textures;
pub mod walls;
