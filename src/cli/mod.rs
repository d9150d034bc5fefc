// CLI module
// Public interface for command-line arguments and console I/O

pub mod args;
mod console;
mod render;

pub use args::{Args, ModeArg};
pub use console::{Console, ScriptedConsole, TerminalConsole};
pub use render::render_task;
