// External Crate Imports
use spectral_similarity::Spectrum;

// Local Crate Imports
use crate::{Identity, IsotopePattern, RecordId, ReferenceRecord, SecondaryCoordinate};

// Public API ==========================================================================================================

impl ReferenceRecord {
    #[must_use]
    pub fn new(id: RecordId, identity: Identity, precursor_mz: f64) -> Self {
        Self {
            id,
            identity,
            precursor_mz,
            secondary: SecondaryCoordinate::None,
            spectrum: Spectrum::default(),
            isotopes: None,
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, secondary: SecondaryCoordinate) -> Self {
        self.secondary = secondary;
        self
    }

    #[must_use]
    pub fn with_spectrum(mut self, spectrum: impl Into<Spectrum>) -> Self {
        self.spectrum = spectrum.into();
        self
    }

    #[must_use]
    pub fn with_isotopes(mut self, isotopes: impl Into<IsotopePattern>) -> Self {
        self.isotopes = Some(isotopes.into());
        self
    }

    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub const fn precursor_mz(&self) -> f64 {
        self.precursor_mz
    }

    #[must_use]
    pub const fn secondary(&self) -> SecondaryCoordinate {
        self.secondary
    }

    #[must_use]
    pub const fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    #[must_use]
    pub const fn isotopes(&self) -> Option<&IsotopePattern> {
        self.isotopes.as_ref()
    }

    /// Malformed records can still be stored, but searches will skip over them
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let secondary_is_finite = self.secondary.value().is_none_or(f64::is_finite);
        let isotopes_are_valid = self.isotopes.as_ref().is_none_or(IsotopePattern::is_well_formed);

        self.precursor_mz.is_finite()
            && self.precursor_mz > 0.0
            && secondary_is_finite
            && isotopes_are_valid
            && self.spectrum.is_well_formed()
    }
}

impl Identity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

// Module Tests ========================================================================================================
