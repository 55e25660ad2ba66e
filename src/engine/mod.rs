pub mod bridge;
pub mod color;
pub mod fit;
pub mod renderer_model;

pub use color::Color;
pub use fit::{FitError, FitRequest, fit, fit_with_measurer};
pub use renderer_model::{DrawCommand, TextScene, generate_draw_commands};
