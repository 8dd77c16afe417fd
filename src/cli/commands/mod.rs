//! One module per subcommand, each exposing `execute`.

pub mod add;
pub mod completions;
pub mod decoy_init;
pub mod export;
pub mod init;
pub mod list;
pub mod lock;
pub mod note;
pub mod remove;
pub mod status;
