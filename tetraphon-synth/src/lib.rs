#![no_std]

pub mod engine;
pub mod keymap;
pub mod melody;
pub mod pool;
pub mod shared;
pub mod square;
pub mod tunes;
pub mod voice;
