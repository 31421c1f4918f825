mod department_mix;
mod random_chunk;

pub use department_mix::DepartmentMixStrategy;
pub use random_chunk::RandomChunkStrategy;

use rand::RngCore;

use crate::sizing::plan;
use crate::types::{Group, GroupSizeConfig, Person};

/// Trait for lunch grouping policies.
///
/// A strategy turns one day's requesters into tables. Implementations own no
/// state across calls; all randomness comes from `rng`, so a seeded generator
/// makes a run reproducible.
pub trait GroupingStrategy: Send + Sync {
    /// Partition `requesters` into groups.
    ///
    /// Every requester must land in exactly one group. Group sizes follow
    /// `config` whenever the population allows it.
    fn assign(
        &self,
        requesters: &[Person],
        config: &GroupSizeConfig,
        rng: &mut dyn RngCore,
    ) -> Vec<Group>;
}

/// Cut `people` into consecutive groups sized by [`plan`].
fn chunk(people: Vec<Person>, config: &GroupSizeConfig) -> Vec<Group> {
    let sizes = plan(people.len(), config);
    let mut people = people.into_iter();
    sizes
        .into_iter()
        .map(|size| Group::new(people.by_ref().take(size).collect()))
        .collect()
}
