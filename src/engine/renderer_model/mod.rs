pub mod draw_command;

pub use draw_command::{DrawCommand, TextScene, generate_draw_commands};
