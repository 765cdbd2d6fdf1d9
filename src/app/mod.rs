pub mod oneshot;
pub mod terminal;

pub use oneshot::run_once;
pub use terminal::{Command, TerminalApp};
