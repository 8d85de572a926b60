//! Wire-payload building for remote block creation.
//!
//! Translates a [`Document`](crate::model::Document) into the nested
//! object shape the remote "append block children" call requires, and
//! provides the request envelope with its optional insertion anchor.

mod block;
mod builder;

pub use block::{RichText, TextSpan, WireBlock, WireRow};
pub use builder::{
    append_request, table_block, to_wire_blocks, AppendRequest, BuildOptions, CellPolicy,
};
