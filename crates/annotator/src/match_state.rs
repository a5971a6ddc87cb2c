// Local Crate Imports
use crate::MatchState;

// Public API ==========================================================================================================

impl MatchState {
    #[must_use]
    pub const fn new(is_precursor_mz_match: bool, is_spectrum_match: bool) -> Self {
        match (is_precursor_mz_match, is_spectrum_match) {
            (false, false) => Self::Unmatched,
            (true, false) => Self::PrecursorOnly,
            (false, true) => Self::SpectrumOnly,
            (true, true) => Self::Both,
        }
    }

    #[must_use]
    pub const fn is_precursor_mz_match(self) -> bool {
        matches!(self, Self::PrecursorOnly | Self::Both)
    }

    #[must_use]
    pub const fn is_spectrum_match(self) -> bool {
        matches!(self, Self::SpectrumOnly | Self::Both)
    }
}

// Module Tests ========================================================================================================
