//! terminatr: a terminal world map with a live day/night terminator and
//! per-city clocks.
//!
//! The library is organized around one cooperative render loop ([`core`])
//! that owns all state: solar geometry ([`astro`]), projection and frame
//! composition ([`map`]), per-city clocks ([`clock`]), persisted preferences
//! ([`settings`]), and the terminal itself ([`surface`]). [`terminatr`]
//! wires those together from CLI options.

#[macro_use]
pub mod logger;

pub mod args;
pub mod astro;
pub mod cities;
pub mod clock;
pub mod constants;
pub mod core;
pub mod map;
pub mod scheduler;
pub mod settings;
pub mod surface;
pub mod terminatr;
pub mod time_source;
