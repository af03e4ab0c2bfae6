//! Marker assignment and reference resolution.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use log::trace;

use crate::event::{DataType, Identifier};
use crate::{ErrorCode, Limits, RuleError};

/// Identifiers bound by completed markers, plus identifiers still awaiting their object.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    assigned: BTreeMap<Identifier, DataType>,
    unassigned: Vec<Identifier>,
    references: usize,
}

impl ReferenceTable {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            assigned: BTreeMap::new(),
            unassigned: Vec::new(),
            references: 0,
        }
    }

    /// Forget every identifier.
    pub fn clear(&mut self) {
        self.assigned.clear();
        self.unassigned.clear();
        self.references = 0;
    }

    /// Number of assigned identifiers.
    #[must_use]
    pub fn assigned_len(&self) -> usize {
        self.assigned.len()
    }

    /// Type bound to `id`, if assigned.
    #[must_use]
    pub fn get(&self, id: &Identifier) -> Option<DataType> {
        self.assigned.get(id).copied()
    }

    /// Admit a new marker.
    ///
    /// # Errors
    ///
    /// Returns `TooManyReferences` if the marker ceiling is reached.
    pub fn begin_marker(&self, limits: &Limits) -> Result<(), RuleError> {
        if self.assigned.len() + self.unassigned.len() >= limits.max_reference_count {
            return Err(RuleError::new(ErrorCode::TooManyReferences));
        }
        Ok(())
    }

    /// Admit a new reference use site.
    ///
    /// # Errors
    ///
    /// Returns `TooManyReferences` if the reference ceiling is reached.
    pub fn begin_reference(&mut self, limits: &Limits) -> Result<(), RuleError> {
        if self.references >= limits.max_reference_count {
            return Err(RuleError::new(ErrorCode::TooManyReferences));
        }
        self.references += 1;
        Ok(())
    }

    /// Hold a marker identifier until its object completes.
    pub fn push_unassigned(&mut self, id: Identifier) {
        self.unassigned.push(id);
    }

    /// Bind the most recent unassigned identifier to a completed object of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMarkerID` if the identifier is already bound.
    pub fn assign(&mut self, ty: DataType) -> Result<(), RuleError> {
        let id = self
            .unassigned
            .pop()
            .ok_or_else(|| RuleError::new(ErrorCode::StackUnderflow))?;
        if self.assigned.contains_key(&id) {
            return Err(RuleError::new(ErrorCode::DuplicateMarkerID));
        }
        trace!("marker {id} bound to {ty:?}");
        self.assigned.insert(id, ty);
        Ok(())
    }

    /// Resolve a reference identifier to the type of the object it names.
    ///
    /// URI identifiers name external documents and resolve to [`DataType::Any`].
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedReference` if no completed marker bound the identifier.
    pub fn resolve(&self, id: &Identifier) -> Result<DataType, RuleError> {
        if let Identifier::Uri(_) = id {
            trace!("reference {id} is external");
            return Ok(DataType::Any);
        }
        let ty = self
            .get(id)
            .ok_or_else(|| RuleError::new(ErrorCode::UnresolvedReference))?;
        trace!("reference {id} resolved to {ty:?}");
        Ok(ty)
    }
}
