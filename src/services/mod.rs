pub mod console_control;
pub mod dir_watcher;
pub mod process_runner;
pub mod registry;
pub mod state_machine;

pub use console_control::ConsoleControl;
pub use dir_watcher::create_dir_watcher;
pub use process_runner::{create_runner, CommandRunner};
