#![warn(clippy::all)]
#![warn(clippy::correctness)]
#![warn(clippy::style)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]

use std::cell::Cell;

mod contrib;
mod cursor;
mod deferred;
mod error;
mod logging;
mod parser;
mod text_parser;
mod util;

pub mod prelude;

pub(crate) const LOG_TARGET: &str = "cy"; // env!("CARGO_PKG_NAME");

thread_local!(pub(crate) static LABEL: Cell<&'static str> = Cell::new(""));
