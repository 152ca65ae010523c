pub use crate::commands::{AppArgs, Colors, FormatCommand};

pub mod commands;
pub mod log;
pub mod package;
pub mod printing;
pub mod txtar;

pub struct App {
    colors: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            colors: atty::is(atty::Stream::Stderr),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
