// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applying compensations to the live collection

use crate::entry::Compensation;
use crate::error::CompensateError;
use sp_core::EntityCollection;

impl Compensation {
    /// Reverse the logged mutation against `collection`
    ///
    /// The compensation is consumed even on failure: a snapshot that could not
    /// be applied is dropped along with its record.
    pub fn apply<C>(self, collection: &mut C) -> Result<(), CompensateError>
    where
        C: EntityCollection + ?Sized,
    {
        match self {
            Compensation::Reinsert { index, entity } => {
                collection.insert_at(index, entity)?;
            }
            Compensation::Remove { id } => {
                collection
                    .remove_by_identity(id)
                    .ok_or(CompensateError::NotFoundInCollection { id })?;
            }
            Compensation::Restore { id, entity } => {
                let (index, _) = collection
                    .find_by_id(id)
                    .ok_or(CompensateError::NotFoundInCollection { id })?;
                collection.remove_by_identity(id);
                collection.insert_at(index, entity)?;
            }
            Compensation::Reverse => collection.reverse_order(),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "compensate_tests.rs"]
mod tests;
