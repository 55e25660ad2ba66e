pub mod font;
pub mod renderer;
pub mod system;

pub(crate) mod os;
