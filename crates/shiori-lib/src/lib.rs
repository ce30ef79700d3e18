#[macro_use]
extern crate log;

pub mod error;
pub mod models;
pub mod prelude;

/// Chapter label used when a feed has no usable chapter
pub static NO_CHAPTER: &str = "0";
