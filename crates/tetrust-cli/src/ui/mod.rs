pub use self::terminal_renderer::*;

mod terminal_renderer;
pub mod widgets;
