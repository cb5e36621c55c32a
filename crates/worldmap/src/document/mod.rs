//! Tree-structured document reader.
//!
//! Documents are XML files parsed with `roxmltree` into an owned element tree,
//! then read through [`ReaderMapping`]s: key lookups with default-preserving
//! semantics plus ordered iteration over child entries.

mod reader;

pub use reader::{
    ReaderDocument, ReaderElement, ReaderEntry, ReaderError, ReaderMapping, ReaderObject,
    SourceLocation,
};

/// Root tag shared by worldmap documents and level files.
pub const LEVEL_DOCUMENT_TAG: &str = "level-document";
