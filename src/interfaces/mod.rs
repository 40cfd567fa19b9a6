//! External interfaces (line-command protocol).

pub mod command;
