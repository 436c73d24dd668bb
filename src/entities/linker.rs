//! Sequence linker
//!
//! Entity sections arrive as a flat record stream, but POLYLINE and
//! INSERT own their following VERTEX/ATTRIB records up to a SEQEND,
//! and a handle-less MTEXT belongs to the entity right before it.  The
//! linker consumes a loaded entity stream in order and rebuilds that
//! ownership structure, reporting malformed sequences at the exact
//! offending record.

use crate::entities::{DxfEntity, LinkRole};
use crate::error::{DxfError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    None,
    /// Last entity pushed to the main space
    Space,
    /// Terminator of the container that closed last
    SpaceSeqend,
}

/// Rebuilds entity sequences from a flat record stream
#[derive(Debug)]
pub struct EntityLinker {
    space: Vec<DxfEntity>,
    container: Option<DxfEntity>,
    expected: &'static str,
    prev: Prev,
    attach_depth: usize,
}

impl Default for EntityLinker {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityLinker {
    /// New linker with an empty entity space
    pub fn new() -> Self {
        EntityLinker {
            space: Vec::new(),
            container: None,
            expected: "",
            prev: Prev::None,
            attach_depth: 0,
        }
    }

    /// Feed the next entity of the stream
    ///
    /// Returns `true` when the entity was linked into another entity
    /// (member, terminator or attachment) and `false` when it stands
    /// in the main space.  A member of the wrong type inside an open
    /// sequence, or an attachable entity with nothing to attach to, is
    /// a structure error.
    pub fn push(&mut self, entity: DxfEntity) -> Result<bool> {
        let dxftype = entity.dxftype();

        if self.container.is_some() {
            if entity.def().link == LinkRole::Terminator {
                let mut container = self.container.take().unwrap();
                container.link_seqend(entity);
                self.space.push(container);
                self.prev = Prev::SpaceSeqend;
                self.attach_depth = 0;
                return Ok(true);
            }
            if dxftype == self.expected {
                self.container.as_mut().unwrap().link_entity(entity);
                self.attach_depth = 0;
                return Ok(true);
            }
            return Err(DxfError::Structure(format!(
                "expected {} or SEQEND entity, got {}",
                self.expected, dxftype
            )));
        }

        match entity.def().link {
            LinkRole::Container { member, flag_attr } => {
                let follows = match flag_attr {
                    Some(flag) => entity
                        .dxf
                        .get_or(flag, 0i16)?
                        .as_bool()
                        .unwrap_or(false),
                    None => true,
                };
                if follows {
                    self.expected = member;
                    self.container = Some(entity);
                    self.attach_depth = 0;
                    // reported as a main space entity; emitted on close
                    Ok(false)
                } else {
                    self.place(entity);
                    Ok(false)
                }
            }
            LinkRole::Attachable if !entity.dxf.has("handle") && !entity.dxf.has("owner") => {
                match self.resolve_prev_mut() {
                    Some(host) => {
                        host.attach(entity);
                        self.attach_depth += 1;
                        Ok(true)
                    }
                    None => Err(DxfError::Structure(format!(
                        "{} entity without a preceding entity to attach to",
                        dxftype
                    ))),
                }
            }
            _ => {
                self.place(entity);
                Ok(false)
            }
        }
    }

    /// Close the stream and hand back the linked entity space
    ///
    /// A sequence left open at end of stream keeps its members and is
    /// tolerated with a warning; the missing terminator is not
    /// restored.
    pub fn finish(mut self) -> Vec<DxfEntity> {
        if let Some(container) = self.container.take() {
            log::warn!(
                "unterminated {} sequence at end of stream",
                container.dxftype()
            );
            self.space.push(container);
        }
        self.space
    }

    /// Entities placed in the main space so far
    pub fn space(&self) -> &[DxfEntity] {
        &self.space
    }

    fn place(&mut self, entity: DxfEntity) {
        self.space.push(entity);
        self.prev = Prev::Space;
        self.attach_depth = 0;
    }

    /// The entity a new attachment targets: the previously pushed
    /// entity, descending through its attachment chain
    fn resolve_prev_mut(&mut self) -> Option<&mut DxfEntity> {
        let mut host: &mut DxfEntity = match self.prev {
            Prev::None => return None,
            Prev::Space => self.space.last_mut()?,
            Prev::SpaceSeqend => self.space.last_mut()?.seqend_mut()?,
        };
        for _ in 0..self.attach_depth {
            host = host.attached_mut().last_mut()?;
        }
        Some(host)
    }
}
