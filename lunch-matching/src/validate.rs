use std::collections::HashMap;

use crate::error::AssignmentViolation;
use crate::sizing::is_partitionable;
use crate::types::{Group, GroupSizeConfig, Person};

/// Check that `groups` is a valid assignment of `requesters`.
///
/// Every requester must appear exactly once. Size rules depend on the
/// population:
/// - fewer than `min_size` people: exactly one group holding everyone;
/// - a population the bounds can cover: every group within bounds;
/// - otherwise (e.g. five people with bounds 3-4): every group at least
///   `min_size`, since some table has to take the extra seat.
pub fn validate_assignment(
    requesters: &[Person],
    groups: &[Group],
    config: &GroupSizeConfig,
) -> Result<(), AssignmentViolation> {
    check_partition(requesters, groups)?;

    let population = requesters.len();
    if population == 0 {
        return Ok(());
    }

    if population < config.min_size() {
        if groups.len() != 1 {
            return Err(AssignmentViolation::ExpectedSingleGroup {
                population,
                groups: groups.len(),
            });
        }
        return Ok(());
    }

    let enforce_max = is_partitionable(population, config);
    for (index, group) in groups.iter().enumerate() {
        if group.len() < config.min_size() {
            return Err(AssignmentViolation::GroupTooSmall {
                index,
                size: group.len(),
                min: config.min_size(),
            });
        }
        if enforce_max && group.len() > config.max_size() {
            return Err(AssignmentViolation::GroupTooLarge {
                index,
                size: group.len(),
                max: config.max_size(),
            });
        }
    }

    Ok(())
}

fn check_partition(requesters: &[Person], groups: &[Group]) -> Result<(), AssignmentViolation> {
    let mut expected: HashMap<&str, usize> = HashMap::with_capacity(requesters.len());
    for person in requesters {
        *expected.entry(person.id.as_str()).or_default() += 1;
    }

    for (index, group) in groups.iter().enumerate() {
        if group.is_empty() {
            return Err(AssignmentViolation::EmptyGroup { index });
        }
        for person in group.members() {
            match expected.get_mut(person.id.as_str()) {
                None => return Err(AssignmentViolation::Unknown(person.id.clone())),
                Some(0) => return Err(AssignmentViolation::Duplicated(person.id.clone())),
                Some(count) => *count -= 1,
            }
        }
    }

    // Report the first missing requester in input order.
    match requesters
        .iter()
        .find(|person| expected.get(person.id.as_str()).is_some_and(|count| *count > 0))
    {
        Some(person) => Err(AssignmentViolation::Missing(person.id.clone())),
        None => Ok(()),
    }
}
