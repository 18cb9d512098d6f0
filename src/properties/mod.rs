//! Properties-file loading and gap-fill merging
//!
//! Flat key=value override files are parsed with the classic properties
//! text semantics (ISO-8859-1, `=`/`:`/whitespace separators, backslash
//! continuations and escapes) and merged into a project store without
//! overwriting anything the store already has.

mod merge;
mod parse;

pub use merge::{
    read_properties, read_user_properties, MergeOrigin, MergeReport, MergeSource, Scope,
};
pub use parse::{decode_latin1, parse, ParseError};
