mod command_result;
pub mod deploy;
pub mod init;

pub use command_result::*;
