//! Line-oriented command interface.

pub mod dispatcher;
pub mod parser;
pub mod response;

pub use dispatcher::CommandDispatcher;
pub use parser::{Command, CommandParseError};
pub use response::{OutputFormat, Reply};
