//! asciify library crate.
//!
//! [`ascii`] holds the pure analysis pipeline that turns a raster into a grid
//! of styled cells; [`render`] and [`io`] are the drawing and file boundaries
//! around it.

pub mod ascii;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod render;

pub use error::{AsciifyError, Result};
