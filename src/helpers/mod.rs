//! Helper functions shared by the renderers

mod date;

pub use date::*;
