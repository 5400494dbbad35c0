#![forbid(unsafe_code)]

//! Pure geometry for the Broadsheet client shell.
//!
//! Everything in this crate is arithmetic over primitive numbers: scroll-puck
//! sizing for custom scrollbars ([`puck`]), a one-dimensional scroll window
//! with clamped offsets ([`scroll`]), and auto-grow sizing for the comment
//! reply box ([`compose`]). No I/O, no shared state, no allocation beyond the
//! reply draft string — every function is reentrant and safe to call from any
//! context.

pub mod compose;
pub mod puck;
pub mod scroll;

pub use compose::ReplyBox;
pub use puck::{calc_puck_offset, calc_puck_size, puck_visible};
pub use scroll::{Puck, ScrollWindow};
