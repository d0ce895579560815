// webpcbz/src/processors/mod.rs
pub mod archive;
mod compressor;
mod loader;
mod resizer;

pub use compressor::Compressor;
pub use loader::{normalize_color, Loader};
pub use resizer::{fit_longest_side, Resizer};
