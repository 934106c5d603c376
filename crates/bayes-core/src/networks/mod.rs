//! Bundled networks, addressable by name.

pub mod random;
mod scenarios;

pub use scenarios::{chain, rain_train, respiratory, road_accident, twilight, twilight_wolves};

use crate::error::BuildError;
use crate::model::BayesNetwork;

pub type NetworkFactory = fn() -> Result<BayesNetwork, BuildError>;

pub const BUILTIN: &[(&str, NetworkFactory)] = &[
    ("rain_train", rain_train),
    ("twilight", twilight),
    ("twilight_wolves", twilight_wolves),
    ("respiratory", respiratory),
    ("road_accident", road_accident),
    ("chain", chain),
];

/// Builds the bundled network called `name`, or `None` if there is no such network.
pub fn builtin(name: &str) -> Option<Result<BayesNetwork, BuildError>> {
    BUILTIN
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, factory)| factory())
}

pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_builds() {
        for (name, factory) in BUILTIN {
            let network = factory().unwrap_or_else(|err| panic!("{name}: {err}"));
            assert_eq!(network.name(), *name);
            assert!(network.check().is_ok());
            assert!(network.topological_order().is_some());
        }
    }

    #[test]
    fn lookup_by_name() {
        assert!(builtin("twilight").is_some());
        assert!(builtin("missing").is_none());
        assert_eq!(names().count(), BUILTIN.len());
    }

    #[test]
    fn twilight_rows_land_in_parent_order() {
        let network = twilight().unwrap();
        let activity = network
            .distribution_of("VampireActivity", &["Sunny", "Night"])
            .unwrap();
        assert_eq!(activity.get("High"), Some(0.6));
        assert_eq!(
            network.parents_of("ThreatToBella").unwrap(),
            ["VampireActivity", "Volturi"]
        );
    }

    #[test]
    fn wolves_variant_adds_alliance_parent() {
        let network = twilight_wolves().unwrap();
        assert_eq!(
            network.parents_of("HumanSuspicion").unwrap(),
            ["VampireActivity", "Volturi", "WolvesAlliance"]
        );
        let suspicion = network
            .distribution_of("HumanSuspicion", &["Low", "Yes", "Strong"])
            .unwrap();
        assert_eq!(suspicion.get("High"), Some(0.08));
    }
}
