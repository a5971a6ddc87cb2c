use miette::Diagnostic;
use thiserror::Error;

use crate::{RecordId, SecondaryKind};

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum DatabaseError {
    #[error("the record id {id} was used by more than one reference record")]
    #[diagnostic(help("every reference record needs its own, unique id"))]
    DuplicateRecordId { id: RecordId },

    #[error("the record {id} has a {found} coordinate, but the database already holds {expected} coordinates")]
    #[diagnostic(help(
        "a single database can store retention times or collision cross sections, but never both"
    ))]
    MixedSecondaryKinds {
        id: RecordId,
        expected: SecondaryKind,
        found: SecondaryKind,
    },
}

impl DatabaseError {
    pub(crate) const fn duplicate_record_id(id: RecordId) -> Self {
        Self::DuplicateRecordId { id }
    }

    pub(crate) const fn mixed_secondary_kinds(
        id: RecordId,
        expected: SecondaryKind,
        found: SecondaryKind,
    ) -> Self {
        Self::MixedSecondaryKinds {
            id,
            expected,
            found,
        }
    }
}
