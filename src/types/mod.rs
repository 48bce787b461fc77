//! Cask value model and typed-buffer helpers.

pub mod buffer;
mod value;

pub use value::CaskValue;
