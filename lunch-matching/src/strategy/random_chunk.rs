use rand::seq::SliceRandom;
use rand::RngCore;

use crate::redistribute::redistribute;
use crate::types::{Group, GroupSizeConfig, Person};

use super::{chunk, GroupingStrategy};

/// Department-blind grouping: shuffle everyone and cut the line into tables.
///
/// Uses the same sizing and leftover handling as [`super::DepartmentMixStrategy`],
/// which makes it a baseline for measuring how much the department-aware
/// policy actually mixes people.
pub struct RandomChunkStrategy;

impl GroupingStrategy for RandomChunkStrategy {
    fn assign(
        &self,
        requesters: &[Person],
        config: &GroupSizeConfig,
        rng: &mut dyn RngCore,
    ) -> Vec<Group> {
        let mut people = requesters.to_vec();
        people.shuffle(rng);
        redistribute(chunk(people, config), config)
    }
}
