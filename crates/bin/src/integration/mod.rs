//! Glue between the command line and the library crates.
//!
//! Gateway selection, output rendering and the interactive shell.

pub(crate) mod market;
pub(crate) mod render;
pub(crate) mod shell;
