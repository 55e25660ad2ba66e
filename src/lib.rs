//! `textsaver`: a fullscreen screensaver that shows one string in the largest
//! font size that fits the screen.
//!
//! - [`engine`]: the font-fit search and backend-agnostic scene model
//! - [`platform`]: font discovery, fontdue measurement, rasterization, wgpu/winit glue
//! - [`saver`]: the host application tying them together
//!
//! Logging goes through the `log` facade; the binary installs `env_logger`.

pub mod engine;
pub mod platform;
pub mod saver;

pub use engine::bridge::text::{Measurement, TextMeasurer};
pub use engine::fit::{FitError, FitRequest, fit, fit_with_measurer};
pub use saver::{SaverApp, SaverConfig, WindowMode};
