// Local Crate Imports
use crate::{SecondaryCoordinate, SecondaryKind};

// Public API ==========================================================================================================

impl SecondaryCoordinate {
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match *self {
            Self::None => None,
            Self::RetentionTime(value) | Self::CollisionCrossSection(value) => Some(value),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> Option<SecondaryKind> {
        match self {
            Self::None => None,
            Self::RetentionTime(_) => Some(SecondaryKind::RetentionTime),
            Self::CollisionCrossSection(_) => Some(SecondaryKind::CollisionCrossSection),
        }
    }

    /// The signed difference `self - other`, which only exists when both coordinates are of the same kind
    #[must_use]
    pub fn difference(&self, other: &Self) -> Option<f64> {
        match (*self, *other) {
            (Self::RetentionTime(a), Self::RetentionTime(b))
            | (Self::CollisionCrossSection(a), Self::CollisionCrossSection(b)) => Some(a - b),
            _ => None,
        }
    }
}

impl SecondaryKind {
    #[must_use]
    pub const fn with_value(self, value: f64) -> SecondaryCoordinate {
        match self {
            Self::RetentionTime => SecondaryCoordinate::RetentionTime(value),
            Self::CollisionCrossSection => SecondaryCoordinate::CollisionCrossSection(value),
        }
    }
}

// Module Tests ========================================================================================================
