//! EPI item reconciliation.
//!
//! Turns EPI item divergences into add/remove lists a form-filling
//! collaborator can apply. Removal is opt-in through
//! [`EngineConfig::remove_extra_items`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::base_table::EpiCategory;
use crate::config::EngineConfig;
use crate::divergence::{diff, ActualAnswers, DivergenceCategory, DivergenceKind};
use crate::plan::Plan;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpiItemActions {
    /// Planned items not recorded, per category.
    pub add: BTreeMap<EpiCategory, Vec<String>>,
    /// Recorded items not planned, per category. Empty unless removal is on.
    pub remove: BTreeMap<EpiCategory, Vec<String>>,
}

impl EpiItemActions {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

pub fn plan_epi_actions(plan: &Plan, actual: &ActualAnswers, config: &EngineConfig) -> EpiItemActions {
    let mut actions = EpiItemActions::default();

    for item in diff(plan, actual).iter() {
        let DivergenceCategory::EpiItems(category) = item.category else {
            continue;
        };
        match item.kind {
            DivergenceKind::Missing => actions
                .add
                .entry(category)
                .or_default()
                .push(item.key.clone()),
            DivergenceKind::Extra if config.remove_extra_items => actions
                .remove
                .entry(category)
                .or_default()
                .push(item.key.clone()),
            _ => {}
        }
    }

    tracing::debug!(
        add = actions.add.values().map(Vec::len).sum::<usize>(),
        remove = actions.remove.values().map(Vec::len).sum::<usize>(),
        "planned epi item actions"
    );

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_table::items;
    use crate::context::{Context, Flag};
    use crate::plan::build_plan;

    fn welding_with_stale_respiratory() -> (Plan, ActualAnswers) {
        let plan = build_plan(&Context::from_flags([Flag::Welding]));
        let mut actual = ActualAnswers::from_plan(&plan);
        actual.epi_items.insert(
            EpiCategory::Respiratory,
            vec![items::RESPIRATORY_NOT_APPLICABLE.to_string()],
        );
        (plan, actual)
    }

    #[test]
    fn report_only_by_default() {
        let (plan, actual) = welding_with_stale_respiratory();
        let actions = plan_epi_actions(&plan, &actual, &EngineConfig::default());
        assert_eq!(
            actions.add.get(&EpiCategory::Respiratory),
            Some(&vec![items::FILTERING_HALF_MASK.to_string()])
        );
        assert!(actions.remove.is_empty());
    }

    #[test]
    fn removal_when_enabled() {
        let (plan, actual) = welding_with_stale_respiratory();
        let config = EngineConfig {
            remove_extra_items: true,
            ..EngineConfig::default()
        };
        let actions = plan_epi_actions(&plan, &actual, &config);
        assert_eq!(
            actions.remove.get(&EpiCategory::Respiratory),
            Some(&vec![items::RESPIRATORY_NOT_APPLICABLE.to_string()])
        );
    }

    #[test]
    fn nothing_to_do_when_items_agree() {
        let plan = build_plan(&Context::default());
        let actual = ActualAnswers::from_plan(&plan);
        assert!(plan_epi_actions(&plan, &actual, &EngineConfig::default()).is_empty());
    }
}
