pub mod command;

pub use command::AppCommand;
