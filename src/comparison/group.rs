//! Comparison groups: simulations that share a `group_id`.

use std::collections::BTreeMap;

use crate::models::Simulation;

/// Group simulations by `group_id`, dropping ungrouped ones.
pub fn group_simulations(simulations: Vec<Simulation>) -> BTreeMap<String, Vec<Simulation>> {
    let mut groups: BTreeMap<String, Vec<Simulation>> = BTreeMap::new();
    for sim in simulations {
        if let Some(group_id) = sim.group_id.clone() {
            groups.entry(group_id).or_default().push(sim);
        }
    }
    groups
}
