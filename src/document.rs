//! Document context seam
//!
//! The marshaling core never owns the drawing container.  Everything it
//! needs from the surrounding document — handle resolution, name-keyed
//! resource tables, handle allocation and the active format version —
//! is expressed by the [`DocumentContext`] trait and injected into the
//! operations that require it.  Callers must serialize document
//! mutation externally; the core assumes exclusive access during any
//! load or export pass.

use crate::error::{DxfError, Result};
use crate::types::{DxfVersion, Handle};
use indexmap::IndexMap;
use std::fmt;

/// Named-resource table selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceTable {
    /// STYLE table (text styles)
    TextStyles,
    /// LTYPE table (linetypes)
    LineTypes,
    /// BLOCK_RECORD table (block definitions)
    Blocks,
}

impl fmt::Display for ResourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceTable::TextStyles => write!(f, "STYLE"),
            ResourceTable::LineTypes => write!(f, "LTYPE"),
            ResourceTable::Blocks => write!(f, "BLOCK_RECORD"),
        }
    }
}

/// Services the marshaling core consumes from the surrounding document
pub trait DocumentContext {
    /// Resolve a handle to the name of the entry it identifies
    fn lookup_by_handle(&self, handle: Handle) -> Result<String>;

    /// Resolve a name in one of the named-resource tables to its handle
    fn lookup_named(&self, table: ResourceTable, name: &str) -> Result<Handle>;

    /// Find or create a named resource, returning its handle
    ///
    /// Used for on-demand resource creation, e.g. standard arrowhead
    /// blocks referenced by name before any block of that name exists.
    fn create_named(&mut self, table: ResourceTable, name: &str) -> Result<Handle>;

    /// Allocate a fresh document-unique handle
    fn allocate_handle(&mut self) -> Handle;

    /// The document's format version
    fn dxfversion(&self) -> DxfVersion;
}

/// Minimal in-memory document context
///
/// Holds the three name-keyed resource tables (case-insensitive, like
/// AutoCAD symbol tables) and a handle allocator.  Sufficient for the
/// test suite and for callers that marshal records without a full
/// drawing container.
#[derive(Debug, Clone)]
pub struct SimpleDocument {
    version: DxfVersion,
    tables: IndexMap<ResourceTable, IndexMap<String, Handle>>,
    names: IndexMap<Handle, String>,
    next_handle: u64,
}

impl SimpleDocument {
    /// Create an empty document targeting the given version
    pub fn new(version: DxfVersion) -> Self {
        let mut tables = IndexMap::new();
        tables.insert(ResourceTable::TextStyles, IndexMap::new());
        tables.insert(ResourceTable::LineTypes, IndexMap::new());
        tables.insert(ResourceTable::Blocks, IndexMap::new());
        SimpleDocument {
            version,
            tables,
            names: IndexMap::new(),
            // keep clear of the well-known low table handles
            next_handle: 0x10,
        }
    }

    /// Register a named entry, allocating its handle
    pub fn add_entry(&mut self, table: ResourceTable, name: &str) -> Handle {
        if let Ok(existing) = self.lookup_named(table, name) {
            return existing;
        }
        let handle = self.allocate_handle();
        if let Some(t) = self.tables.get_mut(&table) {
            t.insert(name.to_uppercase(), handle);
        }
        self.names.insert(handle, name.to_string());
        handle
    }

    /// Number of entries in a table
    pub fn table_len(&self, table: ResourceTable) -> usize {
        self.tables.get(&table).map_or(0, |t| t.len())
    }
}

impl DocumentContext for SimpleDocument {
    fn lookup_by_handle(&self, handle: Handle) -> Result<String> {
        self.names
            .get(&handle)
            .cloned()
            .ok_or(DxfError::UnknownHandle(handle.value()))
    }

    fn lookup_named(&self, table: ResourceTable, name: &str) -> Result<Handle> {
        self.tables
            .get(&table)
            .and_then(|t| t.get(&name.to_uppercase()))
            .copied()
            .ok_or_else(|| DxfError::UnknownName(format!("{}: {}", table, name)))
    }

    fn create_named(&mut self, table: ResourceTable, name: &str) -> Result<Handle> {
        Ok(self.add_entry(table, name))
    }

    fn allocate_handle(&mut self) -> Handle {
        let handle = Handle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn dxfversion(&self) -> DxfVersion {
        self.version
    }
}
