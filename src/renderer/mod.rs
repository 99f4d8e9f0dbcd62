//! Canvas2D rendering module
//!
//! Each simulator draws to its own full-screen canvas layer; the letter card
//! has a separate scratch-off canvas.

pub mod canvas;

pub use canvas::CanvasRenderer;
