use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Number of features the classifier is trained on.
pub const FEATURE_COUNT: usize = 12;

/// Number of leading features in schema order that must always be present.
pub const REQUIRED_FEATURE_COUNT: usize = 9;

/// Catalogue column holding the disposition label.
pub const TARGET_COLUMN: &str = "koi_disposition";

/// One of the twelve measurements describing a KOI.
///
/// Variants are declared in schema order: the first nine are required, the
/// last three are optional. The `Display`/`FromStr` form is the public key
/// (`orbital_period`), while [`FeatureId::column`] gives the catalogue column
/// name (`koi_period`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeatureId {
    OrbitalPeriod,
    TransitDuration,
    TransitDepth,
    PlanetaryRadius,
    EquilibriumTemperature,
    InsolationFlux,
    TransitSignalToNoise,
    StellarEffectiveTemperature,
    StellarRadius,
    ImpactParameter,
    DispositionScore,
    StellarSurfaceGravity,
}

impl FeatureId {
    /// Catalogue column name used in KOI tables and in the persisted feature order.
    pub fn column(self) -> &'static str {
        match self {
            FeatureId::OrbitalPeriod => "koi_period",
            FeatureId::TransitDuration => "koi_duration",
            FeatureId::TransitDepth => "koi_depth",
            FeatureId::PlanetaryRadius => "koi_prad",
            FeatureId::EquilibriumTemperature => "koi_teq",
            FeatureId::InsolationFlux => "koi_insol",
            FeatureId::TransitSignalToNoise => "koi_model_snr",
            FeatureId::StellarEffectiveTemperature => "koi_steff",
            FeatureId::StellarRadius => "koi_srad",
            FeatureId::ImpactParameter => "koi_impact",
            FeatureId::DispositionScore => "koi_score",
            FeatureId::StellarSurfaceGravity => "koi_slogg",
        }
    }

    /// Public key, e.g. `orbital_period`.
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Human readable title used by interactive prompts.
    pub fn title(self) -> &'static str {
        match self {
            FeatureId::OrbitalPeriod => "Orbital Period [days]",
            FeatureId::TransitDuration => "Transit Duration [hrs]",
            FeatureId::TransitDepth => "Transit Depth [ppm]",
            FeatureId::PlanetaryRadius => "Planetary Radius [Earth radii]",
            FeatureId::EquilibriumTemperature => "Equilibrium Temperature [K]",
            FeatureId::InsolationFlux => "Insolation Flux [Earth flux]",
            FeatureId::TransitSignalToNoise => "Transit Signal-to-Noise",
            FeatureId::StellarEffectiveTemperature => "Stellar Effective Temperature [K]",
            FeatureId::StellarRadius => "Stellar Radius [Solar radii]",
            FeatureId::ImpactParameter => "Impact Parameter",
            FeatureId::DispositionScore => "Disposition Score",
            FeatureId::StellarSurfaceGravity => "Stellar Surface Gravity [log10(cm/s**2)]",
        }
    }

    /// Position of this feature in schema order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_required(self) -> bool {
        self.index() < REQUIRED_FEATURE_COUNT
    }

    /// Resolves either a public key or a catalogue column name.
    pub fn from_key(key: &str) -> Option<FeatureId> {
        let key = key.trim();
        FeatureId::iter().find(|id| id.key() == key || id.column() == key)
    }

    pub fn from_column(column: &str) -> Option<FeatureId> {
        FeatureId::iter().find(|id| id.column() == column)
    }

    pub fn required() -> impl Iterator<Item = FeatureId> {
        FeatureId::iter().filter(|id| id.is_required())
    }

    pub fn optional() -> impl Iterator<Item = FeatureId> {
        FeatureId::iter().filter(|id| !id.is_required())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn schema_has_nine_required_then_three_optional() {
        assert_eq!(FeatureId::COUNT, FEATURE_COUNT);
        let required: Vec<_> = FeatureId::required().collect();
        let optional: Vec<_> = FeatureId::optional().collect();
        assert_eq!(required.len(), 9);
        assert_eq!(
            optional,
            vec![
                FeatureId::ImpactParameter,
                FeatureId::DispositionScore,
                FeatureId::StellarSurfaceGravity
            ]
        );
        for (i, id) in FeatureId::iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn keys_and_columns_resolve() {
        assert_eq!(FeatureId::OrbitalPeriod.key(), "orbital_period");
        assert_eq!(FeatureId::TransitSignalToNoise.column(), "koi_model_snr");
        assert_eq!(
            FeatureId::from_key("koi_slogg"),
            Some(FeatureId::StellarSurfaceGravity)
        );
        assert_eq!(
            FeatureId::from_key("stellar_radius"),
            Some(FeatureId::StellarRadius)
        );
        assert_eq!(FeatureId::from_key("koi_kepmag"), None);
        assert_eq!(FeatureId::from_column("orbital_period"), None);
    }
}
