//! Entity layer
//!
//! An entity couples a static type definition (composed schemas, link
//! role, export maps) with its attribute namespace and lifecycle state.
//! The factory maps DXFTYPE strings to registered definitions and
//! drives record loading; the linker in [`linker`] restores sequence
//! structure over a loaded entity stream.

pub mod dimstyle;
pub mod graphic;
pub mod linker;

use indexmap::IndexMap;

use crate::attribs::namespace::DxfNamespace;
use crate::attribs::processor::SubclassProcessor;
use crate::attribs::schema::DxfAttributes;
use crate::document::DocumentContext;
use crate::error::{DxfError, Result};
use crate::notification::NotificationCollection;
use crate::tags::{DxfTag, TagWriter, STRUCTURE_MARKER};
use crate::types::{DxfVersion, Handle, TagValue, DXF_R2007};

pub use linker::EntityLinker;

/// Lifecycle state of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Constructed, not yet populated
    Unbound,
    /// Created through the factory with default content
    New,
    /// Populated from a tag stream
    Loaded,
    /// Attached to a document (handle assigned)
    Bound,
    /// Written out at least once; stays mutable
    Exported,
    /// Destroyed; any further access is an error
    Destroyed,
}

/// Role of an entity type in sequence linking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    /// Stands alone in the entity space
    Standalone,
    /// Opens a member sequence terminated by a SEQEND record
    Container {
        /// DXFTYPE of the expected members
        member: &'static str,
        /// Flag attribute gating whether members follow at all
        flag_attr: Option<&'static str>,
    },
    /// Closes an open member sequence
    Terminator,
    /// Attaches to the preceding entity when it carries no identity
    Attachable,
}

/// Hook run before export, with document access
///
/// Used to inject document-derived raw values (e.g. the text style
/// handle of a dimension style) right before the field list is walked.
pub type PreExportHook = fn(&mut DxfNamespace, &mut dyn DocumentContext) -> Result<()>;

/// Version-keyed export field lists
///
/// Table records whose emitted field set changed across format
/// revisions carry one list per era; plain entities use the subclass
/// export order instead.
#[derive(Debug)]
pub struct ExportMaps {
    /// Fields for legacy (R12) targets
    pub r12: &'static [&'static str],
    /// Fields for R2000 up to (excluding) R2007
    pub r2000: &'static [&'static str],
    /// Fields for R2007 and later
    pub r2007: &'static [&'static str],
}

impl ExportMaps {
    /// Pick the list for a target version
    pub fn for_version(&self, version: DxfVersion) -> &'static [&'static str] {
        if version.is_r12() {
            self.r12
        } else if version >= DXF_R2007 {
            self.r2007
        } else {
            self.r2000
        }
    }
}

/// Static definition of one entity type
#[derive(Debug)]
pub struct EntityDef {
    /// DXFTYPE string (e.g. `"DIMSTYLE"`)
    pub dxftype: &'static str,
    /// Composed attribute definition
    pub attribs: &'static DxfAttributes,
    /// Sequence linking role
    pub link: LinkRole,
    /// Tolerate base class tags mixed into the entity subclass area
    pub fold_base_class: bool,
    /// Pre-export injection hook
    pub pre_export: Option<PreExportHook>,
    /// Version-keyed export field lists, overriding subclass order
    pub export_maps: Option<&'static ExportMaps>,
}

/// One DXF entity: definition, values, state and sequence links
#[derive(Debug)]
pub struct DxfEntity {
    def: &'static EntityDef,
    /// The attribute namespace
    pub dxf: DxfNamespace,
    state: EntityState,
    linked: Vec<DxfEntity>,
    attached: Vec<DxfEntity>,
    seqend: Option<Box<DxfEntity>>,
}

impl DxfEntity {
    /// New empty entity of the given type
    pub fn new(def: &'static EntityDef) -> Self {
        DxfEntity {
            def,
            dxf: DxfNamespace::new(def.attribs),
            state: EntityState::New,
            linked: Vec::new(),
            attached: Vec::new(),
            seqend: None,
        }
    }

    /// Populate an entity from a record's tag stream
    ///
    /// The base class loads first, then each named subclass against its
    /// marker slice (in legacy mode everything loads sequentially from
    /// the single base slice).  Unconsumed tags are reported through
    /// `notes`, never silently dropped.
    pub fn load(
        def: &'static EntityDef,
        tags: Vec<DxfTag>,
        dxfversion: Option<DxfVersion>,
        notes: &mut NotificationCollection,
    ) -> Result<Self> {
        let mut processor = SubclassProcessor::new(tags, dxfversion);
        let mut dxf = DxfNamespace::new(def.attribs);
        let subclasses = def.attribs.subclasses();

        processor.load_dxfattribs_into_namespace(&mut dxf, subclasses[0], Some(0))?;
        if def.fold_base_class {
            processor.append_base_class_to_acdb_entity();
        }
        for sub in &subclasses[1..] {
            let rest = processor.load_dxfattribs_into_namespace(&mut dxf, sub, None)?;
            if !processor.r12 {
                processor.log_unprocessed_tags(&rest, sub.name, notes);
            }
        }
        if processor.r12 {
            if let Some(rest) = processor.subclass(0) {
                let rest = rest.to_vec();
                processor.log_unprocessed_tags(&rest, None, notes);
            }
        }
        Ok(DxfEntity {
            def,
            dxf,
            state: EntityState::Loaded,
            linked: Vec::new(),
            attached: Vec::new(),
            seqend: None,
        })
    }

    /// The entity's type definition
    pub fn def(&self) -> &'static EntityDef {
        self.def
    }

    /// DXFTYPE string
    pub fn dxftype(&self) -> &'static str {
        self.def.dxftype
    }

    /// Current lifecycle state
    pub fn state(&self) -> EntityState {
        self.state
    }

    /// True until the entity is destroyed
    pub fn is_alive(&self) -> bool {
        self.state != EntityState::Destroyed
    }

    /// Fail with `UseAfterDestroy` on a destroyed entity
    pub fn ensure_alive(&self) -> Result<()> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(DxfError::UseAfterDestroy(self.dxftype().to_string()))
        }
    }

    /// The entity's handle, if one is stored
    pub fn handle(&self) -> Option<Handle> {
        self.dxf.get_raw("handle").and_then(TagValue::as_handle)
    }

    /// Attach the entity (and its whole sequence) to a document
    ///
    /// Entities without a handle get one allocated; already-bound
    /// entities keep theirs.
    pub fn bind(&mut self, doc: &mut dyn DocumentContext) -> Result<()> {
        self.ensure_alive()?;
        if self.handle().is_none() {
            let handle = doc.allocate_handle();
            self.dxf.set_raw("handle", handle)?;
        }
        self.state = EntityState::Bound;
        for member in &mut self.linked {
            member.bind(doc)?;
        }
        for satellite in &mut self.attached {
            satellite.bind(doc)?;
        }
        if let Some(seqend) = self.seqend.as_deref_mut() {
            seqend.bind(doc)?;
        }
        Ok(())
    }

    /// Set owner and paperspace marker, recursing into the sequence
    pub fn set_owner(&mut self, owner: Handle, paperspace: i16) -> Result<()> {
        self.ensure_alive()?;
        self.dxf.set_raw("owner", owner)?;
        if self.dxf.attribs().contains("paperspace") {
            self.dxf.set_raw("paperspace", paperspace)?;
        }
        for member in &mut self.linked {
            member.set_owner(owner, paperspace)?;
        }
        for satellite in &mut self.attached {
            satellite.set_owner(owner, paperspace)?;
        }
        if let Some(seqend) = self.seqend.as_deref_mut() {
            seqend.set_owner(owner, paperspace)?;
        }
        Ok(())
    }

    /// Append a member to the linked sequence
    pub fn link_entity(&mut self, entity: DxfEntity) {
        self.linked.push(entity);
    }

    /// Set the sequence terminator
    pub fn link_seqend(&mut self, seqend: DxfEntity) {
        self.seqend = Some(Box::new(seqend));
    }

    /// Attach a handle-less satellite entity
    pub fn attach(&mut self, entity: DxfEntity) {
        self.attached.push(entity);
    }

    /// Linked sequence members
    pub fn linked_entities(&self) -> &[DxfEntity] {
        &self.linked
    }

    /// Attached satellite entities
    pub fn attached_entities(&self) -> &[DxfEntity] {
        &self.attached
    }

    /// The sequence terminator, if linked
    pub fn seqend(&self) -> Option<&DxfEntity> {
        self.seqend.as_deref()
    }

    pub(crate) fn seqend_mut(&mut self) -> Option<&mut DxfEntity> {
        self.seqend.as_deref_mut()
    }

    pub(crate) fn attached_mut(&mut self) -> &mut Vec<DxfEntity> {
        &mut self.attached
    }

    /// Destroy the entity and its whole sequence
    ///
    /// Idempotent.  Storage is released; any later operation fails with
    /// `UseAfterDestroy`.
    pub fn destroy(&mut self) {
        if !self.is_alive() {
            return;
        }
        for member in &mut self.linked {
            member.destroy();
        }
        for satellite in &mut self.attached {
            satellite.destroy();
        }
        if let Some(seqend) = self.seqend.as_deref_mut() {
            seqend.destroy();
        }
        self.linked.clear();
        self.attached.clear();
        self.seqend = None;
        self.dxf.poison();
        self.state = EntityState::Destroyed;
    }

    /// Export the entity and its sequence as tagged records
    ///
    /// The writer's target version drives subclass markers, version
    /// filtering and map selection.  A document is only needed for
    /// types with a pre-export hook; without one the hook is skipped.
    pub fn export(
        &mut self,
        w: &mut dyn TagWriter,
        doc: Option<&mut dyn DocumentContext>,
    ) -> Result<()> {
        self.ensure_alive()?;
        if let (Some(hook), Some(doc)) = (self.def.pre_export, doc) {
            hook(&mut self.dxf, doc)?;
        }
        self.export_record(w)?;
        for satellite in &mut self.attached {
            satellite.export(w, None)?;
        }
        for member in &mut self.linked {
            member.export(w, None)?;
        }
        if let Some(seqend) = self.seqend.as_deref_mut() {
            seqend.export(w, None)?;
        }
        if matches!(self.state, EntityState::Bound | EntityState::Exported) {
            self.state = EntityState::Exported;
        }
        Ok(())
    }

    fn export_record(&self, w: &mut dyn TagWriter) -> Result<()> {
        let version = w.dxfversion();
        let legacy = version.is_r12();
        w.write_str(STRUCTURE_MARKER, self.dxftype())?;

        let subclasses = self.def.attribs.subclasses();
        let base_fields = subclasses[0].export_fields();
        self.dxf.export_dxf_attribs(w, &base_fields, false)?;

        if let Some(maps) = self.def.export_maps {
            // table records: all markers first, then one combined list
            if !legacy {
                for sub in &subclasses[1..] {
                    if let Some(name) = sub.name {
                        w.write_subclass_marker(name)?;
                    }
                }
            }
            self.dxf.export_dxf_attribs(w, maps.for_version(version), true)
        } else {
            for sub in &subclasses[1..] {
                if !legacy {
                    if let Some(name) = sub.name {
                        w.write_subclass_marker(name)?;
                    }
                }
                self.dxf.export_dxf_attribs(w, &sub.export_fields(), false)?;
            }
            Ok(())
        }
    }
}

/// Registry mapping DXFTYPE strings to entity definitions
///
/// Built explicitly at startup; there is no global registration side
/// channel.
#[derive(Debug, Default)]
pub struct EntityFactory {
    defs: IndexMap<&'static str, &'static EntityDef>,
}

impl EntityFactory {
    /// Empty registry
    pub fn new() -> Self {
        EntityFactory {
            defs: IndexMap::new(),
        }
    }

    /// Registry with all built-in entity types
    pub fn standard() -> Self {
        let mut factory = EntityFactory::new();
        factory.register(&dimstyle::DIMSTYLE);
        for def in graphic::GRAPHIC_DEFS.iter() {
            factory.register(def);
        }
        factory
    }

    /// Register an entity definition under its DXFTYPE
    pub fn register(&mut self, def: &'static EntityDef) {
        self.defs.insert(def.dxftype, def);
    }

    /// Look up a definition by DXFTYPE
    pub fn get(&self, dxftype: &str) -> Result<&'static EntityDef> {
        self.defs
            .get(dxftype)
            .copied()
            .ok_or_else(|| DxfError::InvalidEntityType(dxftype.to_string()))
    }

    /// Create a new empty entity of the given type
    pub fn new_entity(&self, dxftype: &str) -> Result<DxfEntity> {
        Ok(DxfEntity::new(self.get(dxftype)?))
    }

    /// Load an entity from a record's tag stream
    ///
    /// The first tag must be the `(0, DXFTYPE)` structure tag.
    pub fn from_tags(
        &self,
        tags: Vec<DxfTag>,
        dxfversion: Option<DxfVersion>,
        notes: &mut NotificationCollection,
    ) -> Result<DxfEntity> {
        let dxftype = match tags.first() {
            Some(tag) if tag.code == STRUCTURE_MARKER => tag
                .value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| DxfError::Structure("structure tag without type name".into()))?,
            _ => {
                return Err(DxfError::Structure(
                    "record does not start with a (0, DXFTYPE) tag".into(),
                ))
            }
        };
        let def = self.get(&dxftype)?;
        DxfEntity::load(def, tags, dxfversion, notes)
    }
}
