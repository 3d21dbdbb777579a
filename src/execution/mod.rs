//! Process boundary.
//!
//! This module owns every child process the crate starts:
//!
//! - `Launcher`: runs one candidate under a deadline and a cancellation token
//! - `Shell`: the user's interactive shell used for shell-mode candidates
//! - `restore_terminal`: best-effort `stty sane` after interactive shells

mod launcher;
mod shell;
mod terminal;

pub use launcher::{Captured, Launcher, ProcessLauncher};
pub use shell::Shell;
pub use terminal::{restore_terminal, SttyRestorer, TerminalRestorer};
