//! Report renderers for resolved dependency rows.
//!
//! - [`terminal`] — colored summary box and table; respects `--verbose` / `--quiet`.
//! - [`json`] — the sorted rows as pretty-printed JSON, to stdout or a file.

pub mod json;
pub mod terminal;
