//! Display output generation.

pub mod redraw;
