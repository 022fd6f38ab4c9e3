//! # Buoy Matrix Core Library
//!
//! Animation engine for a small RGB LED panel showing ocean buoy conditions.
//! Everything here is hardware-independent; the binary picks a display
//! driver and feeds it the playlist.
//!
//! ## Design Philosophy
//!
//! ### Single-threaded Frame Loop
//! - **One thread renders**: the render loop owns the display and every
//!   animation, so animation state needs no locking
//! - **Double buffering**: each frame is drawn off-screen into a cleared buffer
//!   and swapped in whole, so the panel never shows a half-drawn frame
//! - **Cooperative shutdown**: a signal handler sets a cancellation token that
//!   the loop checks once per tick
//!
//! ### Data Flow
//! 1. **Startup**: load sprites, font and station data (any failure is fatal)
//! 2. **Playlist**: wave intro, then per station a scrolling headline and a wave chart
//! 3. **Loop**: clear, tick, swap, sleep; wrap around to the first animation
//!
//! ## Core Types
//!
//! - [`sprite::Sprite`]: decoded multi-frame pixel art
//! - [`animation::Animation`]: the closed set of animations the loop can play
//! - [`render_loop::RenderLoop`]: drives animations against a [`display::Display`]
//! - [`observation::StationReport`]: what is shown for one buoy

pub mod animation;
pub mod canvas;
pub mod config;
pub mod display;
pub mod observation;
pub mod playlist;
pub mod render_loop;
pub mod sprite;
pub mod text;

/// Width of the reference panel, and the number of hourly chart columns.
pub const COLUMNS: usize = 32;

/// Height of the reference panel in pixels.
pub const ROWS: usize = 16;
