//! One module per subcommand.

pub mod close;
pub mod completions;
pub mod init;
pub mod list;
pub mod open;
