//! DirWatcher service: responsibility and boundaries
//!
//! This module only notices that the box directory changed and queues
//! `AppCommand::DirectoryChanged`. It never touches the box set itself:
//! the reload always runs on the main command loop.

mod debounce;
mod notify_watcher;
mod polling_watcher;
mod r#trait;

pub use self::r#trait::create_dir_watcher;
