//! Read-only training drill catalog.
//!
//! The built-in catalog is compiled into the crate and parsed once on first
//! use. Custom catalogs can be built from JSON or an explicit drill list.

use std::collections::HashMap;

use kinetix_core::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const BUILTIN_CATALOG_JSON: &str = include_str!("../data/drills.json");

// Compiled-in data; `test_builtin_catalog_parses` keeps it valid
static BUILTIN_CATALOG: Lazy<DrillCatalog> = Lazy::new(|| {
    DrillCatalog::from_json(BUILTIN_CATALOG_JSON).expect("built-in drill catalog is valid")
});

/// Drill training focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillCategory {
    ArmSwing,
    Jumping,
    Timing,
    CoreStability,
    Flexibility,
    Power,
    Footwork,
}

impl DrillCategory {
    pub const ALL: [DrillCategory; 7] = [
        DrillCategory::ArmSwing,
        DrillCategory::Jumping,
        DrillCategory::Timing,
        DrillCategory::CoreStability,
        DrillCategory::Flexibility,
        DrillCategory::Power,
        DrillCategory::Footwork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DrillCategory::ArmSwing => "arm_swing",
            DrillCategory::Jumping => "jumping",
            DrillCategory::Timing => "timing",
            DrillCategory::CoreStability => "core_stability",
            DrillCategory::Flexibility => "flexibility",
            DrillCategory::Power => "power",
            DrillCategory::Footwork => "footwork",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// A remedial training exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: DrillCategory,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Prescription, e.g. "3 x 12"
    pub sets: String,
}

/// Immutable drill table, iterated in catalog order and indexed by id
#[derive(Debug, Clone)]
pub struct DrillCatalog {
    drills: Vec<Drill>,
    index: HashMap<String, usize>,
}

impl DrillCatalog {
    /// The catalog shipped with the engine
    pub fn builtin() -> &'static DrillCatalog {
        &BUILTIN_CATALOG
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let drills: Vec<Drill> = serde_json::from_str(json)
            .map_err(|e| Error::Catalog(format!("malformed drill catalog: {e}")))?;
        Self::from_drills(drills)
    }

    pub fn from_drills(drills: Vec<Drill>) -> Result<Self> {
        let mut index = HashMap::with_capacity(drills.len());
        for (position, drill) in drills.iter().enumerate() {
            if index.insert(drill.id.clone(), position).is_some() {
                return Err(Error::Catalog(format!("duplicate drill id '{}'", drill.id)));
            }
        }
        Ok(Self { drills, index })
    }

    pub fn get(&self, id: &str) -> Option<&Drill> {
        self.index.get(id).map(|&i| &self.drills[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Drill> {
        self.drills.iter()
    }

    pub fn by_category(&self, category: DrillCategory) -> impl Iterator<Item = &Drill> {
        self.drills.iter().filter(move |d| d.category == category)
    }

    pub fn len(&self) -> usize {
        self.drills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = DrillCatalog::from_json(BUILTIN_CATALOG_JSON).unwrap();
        assert_eq!(catalog.len(), 22);
        assert_eq!(catalog.len(), DrillCatalog::builtin().len());
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = DrillCatalog::builtin();
        assert!(catalog.len() >= 20);
        assert!(catalog.iter().all(|d| !d.instructions.is_empty()));
        assert!(catalog.get("box-jumps").is_some());
        assert!(catalog.get("no-such-drill").is_none());
    }

    #[test]
    fn test_every_category_is_stocked() {
        let catalog = DrillCatalog::builtin();
        for category in DrillCategory::ALL {
            assert!(
                catalog.by_category(category).next().is_some(),
                "no drills for {}",
                category.as_str()
            );
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let drill = DrillCatalog::builtin().get("box-jumps").unwrap().clone();
        let result = DrillCatalog::from_drills(vec![drill.clone(), drill]);
        assert!(matches!(result, Err(Error::Catalog(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            DrillCatalog::from_json("{\"id\": 1}"),
            Err(Error::Catalog(_))
        ));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            DrillCategory::parse("core_stability"),
            Some(DrillCategory::CoreStability)
        );
        assert_eq!(DrillCategory::parse("cardio"), None);
    }
}
