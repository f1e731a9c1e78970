//! Weakness → drill recommendation matching.
//!
//! Each weakness is run through an ordered chain of selection strategies:
//! the issue's hand-picked drill list first, then a category fallback that
//! prefers an approachable beginner and intermediate drill before filling
//! any remaining slot.

use kinetix_core::{Weakness, WeaknessCategory, WeaknessIssue};
use serde::{Deserialize, Serialize};

use crate::catalog::{Difficulty, Drill, DrillCatalog, DrillCategory};

/// Only the most severe weaknesses receive recommendations
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Upper bound on drills attached to a single weakness
pub const MAX_DRILLS_PER_WEAKNESS: usize = 3;

/// Drills recommended for one weakness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillRecommendation {
    pub weakness: Weakness,
    pub recommended_drills: Vec<Drill>,
    /// 1 = most severe addressed weakness
    pub priority: u32,
}

/// Ordered drill ids curated for each issue
pub fn issue_drill_ids(issue: WeaknessIssue) -> &'static [&'static str] {
    match issue {
        WeaknessIssue::LowContactPoint => &[
            "reach-and-snap-contact",
            "approach-jump-series",
            "full-extension-target-strikes",
        ],
        WeaknessIssue::IncompleteArmExtension => &[
            "full-extension-target-strikes",
            "towel-snap-extension",
            "reach-and-snap-contact",
        ],
        WeaknessIssue::InsufficientArmCocking => {
            &["high-elbow-wall-swings", "band-shoulder-dislocates"]
        }
        WeaknessIssue::LimitedExtensionRange => {
            &["towel-snap-extension", "band-resisted-arm-swing"]
        }
        WeaknessIssue::LowHandSpeed => &[
            "medicine-ball-overhead-throw",
            "resistance-band-accelerations",
            "band-resisted-arm-swing",
        ],
        WeaknessIssue::PoorVelocityTiming => &["metronome-swing-timing", "toss-and-catch-rhythm"],
        WeaknessIssue::LimitedVerticalJump => {
            &["box-jumps", "squat-jump-holds", "depth-jump-reactive"]
        }
        WeaknessIssue::ExcessiveForwardLean => &["wall-posture-holds", "dead-bug-anti-extension"],
        // "legacy-whip-drill" was retired from the catalog
        WeaknessIssue::SlowAccelerationPhase => {
            &["resistance-band-accelerations", "legacy-whip-drill"]
        }
        WeaknessIssue::ProlongedPreparation => &["toss-and-catch-rhythm"],
        WeaknessIssue::WeakAcceleration => &["medicine-ball-overhead-throw", "plyo-push-ups"],
        WeaknessIssue::LimitedShoulderRange => &[
            "sleeper-stretch",
            "band-shoulder-dislocates",
            "thoracic-openers",
        ],
    }
}

/// Drill categories that address a weakness category; `None` means the
/// category is matched against drill categories by name.
pub fn mapped_categories(category: WeaknessCategory) -> Option<&'static [DrillCategory]> {
    match category {
        WeaknessCategory::ContactPoint => Some(&[DrillCategory::ArmSwing, DrillCategory::Jumping]),
        WeaknessCategory::ArmMechanics => {
            Some(&[DrillCategory::ArmSwing, DrillCategory::Flexibility])
        }
        WeaknessCategory::Power => Some(&[DrillCategory::Power, DrillCategory::ArmSwing]),
        WeaknessCategory::Jumping => Some(&[DrillCategory::Jumping, DrillCategory::Footwork]),
        WeaknessCategory::Posture => {
            Some(&[DrillCategory::CoreStability, DrillCategory::Flexibility])
        }
        WeaknessCategory::Flexibility => Some(&[DrillCategory::Flexibility]),
        WeaknessCategory::Timing => None,
    }
}

fn category_matches(category: WeaknessCategory, drill: &Drill) -> bool {
    match mapped_categories(category) {
        Some(set) => set.contains(&drill.category),
        None => drill.category.as_str() == category.as_str(),
    }
}

fn already_chosen(chosen: &[&Drill], drill: &Drill) -> bool {
    chosen.iter().any(|c| c.id == drill.id)
}

/// One link in the drill selection chain
pub trait DrillStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Append drills for `weakness` to `chosen`, never exceeding `limit`
    fn extend<'c>(
        &self,
        weakness: &Weakness,
        catalog: &'c DrillCatalog,
        chosen: &mut Vec<&'c Drill>,
        limit: usize,
    );
}

/// Curated issue → drill list, in list order, skipping ids absent from the catalog
pub struct IssueMappingStrategy;

impl DrillStrategy for IssueMappingStrategy {
    fn name(&self) -> &'static str {
        "issue-mapping"
    }

    fn extend<'c>(
        &self,
        weakness: &Weakness,
        catalog: &'c DrillCatalog,
        chosen: &mut Vec<&'c Drill>,
        limit: usize,
    ) {
        for id in issue_drill_ids(weakness.issue) {
            if chosen.len() >= limit {
                break;
            }
            if let Some(drill) = catalog.get(id) {
                if !already_chosen(chosen.as_slice(), drill) {
                    chosen.push(drill);
                }
            }
        }
    }
}

/// Category match in catalog order: one beginner, one intermediate, then anything left
pub struct CategoryFallbackStrategy;

impl DrillStrategy for CategoryFallbackStrategy {
    fn name(&self) -> &'static str {
        "category-fallback"
    }

    fn extend<'c>(
        &self,
        weakness: &Weakness,
        catalog: &'c DrillCatalog,
        chosen: &mut Vec<&'c Drill>,
        limit: usize,
    ) {
        if chosen.len() >= limit {
            return;
        }

        let mut candidates: Vec<&'c Drill> = catalog
            .iter()
            .filter(|d| category_matches(weakness.category, d))
            .filter(|d| !already_chosen(chosen.as_slice(), d))
            .collect();

        for preferred in [Difficulty::Beginner, Difficulty::Intermediate] {
            if chosen.len() >= limit {
                return;
            }
            if let Some(pos) = candidates.iter().position(|d| d.difficulty == preferred) {
                chosen.push(candidates.remove(pos));
            }
        }

        let open = limit.saturating_sub(chosen.len());
        chosen.extend(candidates.into_iter().take(open));
    }
}

/// Maps severity-sorted weaknesses to drill recommendations
pub struct DrillMatcher<'c> {
    catalog: &'c DrillCatalog,
    strategies: Vec<Box<dyn DrillStrategy>>,
}

impl<'c> DrillMatcher<'c> {
    pub fn new(catalog: &'c DrillCatalog) -> Self {
        Self {
            catalog,
            strategies: vec![
                Box::new(IssueMappingStrategy),
                Box::new(CategoryFallbackStrategy),
            ],
        }
    }

    pub fn with_strategies(
        catalog: &'c DrillCatalog,
        strategies: Vec<Box<dyn DrillStrategy>>,
    ) -> Self {
        Self { catalog, strategies }
    }

    /// Drills for a single weakness, at most [`MAX_DRILLS_PER_WEAKNESS`]
    pub fn drills_for(&self, weakness: &Weakness) -> Vec<&'c Drill> {
        let mut chosen = Vec::with_capacity(MAX_DRILLS_PER_WEAKNESS);
        for strategy in &self.strategies {
            if chosen.len() >= MAX_DRILLS_PER_WEAKNESS {
                break;
            }
            strategy.extend(weakness, self.catalog, &mut chosen, MAX_DRILLS_PER_WEAKNESS);
            tracing::trace!(
                strategy = strategy.name(),
                issue = weakness.issue.title(),
                selected = chosen.len(),
                "drill strategy applied"
            );
        }
        chosen.truncate(MAX_DRILLS_PER_WEAKNESS);
        chosen
    }

    /// Recommendations for the top weaknesses of an already severity-sorted list.
    ///
    /// Priority is the weakness's 1-based position in that list, so a weakness
    /// that finds no drills leaves a gap.
    pub fn recommend(&self, weaknesses: &[Weakness]) -> Vec<DrillRecommendation> {
        weaknesses
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .enumerate()
            .filter_map(|(index, weakness)| {
                let drills = self.drills_for(weakness);
                if drills.is_empty() {
                    tracing::debug!("No drills found for {}", weakness.issue.title());
                    return None;
                }
                Some(DrillRecommendation {
                    weakness: weakness.clone(),
                    recommended_drills: drills.into_iter().cloned().collect(),
                    priority: index as u32 + 1,
                })
            })
            .collect()
    }
}
