use std::collections::VecDeque;

use crate::types::{Group, GroupSizeConfig, Person};

/// Where a leftover person ends up. Rungs are tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Join the first finished group that still has a free seat.
    JoinOpenGroup(usize),
    /// Start a new group with the next `min_size - 1` leftovers.
    FormGroup,
    /// Every group is full and too few leftovers remain to form one: squeeze
    /// into the smallest group.
    JoinSmallest(usize),
    /// Nothing has been formed yet.
    Singleton,
}

/// Pick a placement for one leftover person.
///
/// `pending` counts the leftovers still waiting, the current person included.
pub fn choose_placement(groups: &[Group], pending: usize, config: &GroupSizeConfig) -> Placement {
    if let Some(index) = groups.iter().position(|g| g.len() < config.max_size()) {
        return Placement::JoinOpenGroup(index);
    }
    if pending >= config.min_size() {
        return Placement::FormGroup;
    }
    // Ties go to the first group found.
    groups
        .iter()
        .enumerate()
        .min_by_key(|(_, group)| group.len())
        .map_or(Placement::Singleton, |(index, _)| {
            Placement::JoinSmallest(index)
        })
}

/// Fold undersized candidates into the final set of groups.
///
/// Candidates that already meet `min_size` are kept as they are; the members
/// of the rest are pooled and placed one at a time via [`choose_placement`].
pub fn redistribute(candidates: Vec<Group>, config: &GroupSizeConfig) -> Vec<Group> {
    let mut finished = Vec::with_capacity(candidates.len());
    let mut leftovers: VecDeque<Person> = VecDeque::new();

    for group in candidates {
        if group.len() >= config.min_size() {
            finished.push(group);
        } else {
            leftovers.extend(group.into_members());
        }
    }

    if !leftovers.is_empty() {
        tracing::debug!(
            leftovers = leftovers.len(),
            groups = finished.len(),
            "redistributing leftover requesters"
        );
    }

    while let Some(person) = leftovers.pop_front() {
        match choose_placement(&finished, leftovers.len() + 1, config) {
            Placement::JoinOpenGroup(index) | Placement::JoinSmallest(index) => {
                finished[index].push(person);
            }
            Placement::FormGroup => {
                let mut members = Vec::with_capacity(config.min_size());
                members.push(person);
                members.extend(leftovers.drain(..config.min_size() - 1));
                finished.push(Group::new(members));
            }
            Placement::Singleton => finished.push(Group::new(vec![person])),
        }
    }

    finished
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_of(size: usize, tag: &str) -> Group {
        Group::new(
            (0..size)
                .map(|i| Person::new(format!("{tag}-{i}"), "dept"))
                .collect(),
        )
    }

    fn sizes(groups: &[Group]) -> Vec<usize> {
        groups.iter().map(Group::len).collect()
    }

    #[test]
    fn prefers_first_group_with_room() {
        let config = GroupSizeConfig::default();
        let groups = vec![group_of(4, "a"), group_of(3, "b"), group_of(3, "c")];
        assert_eq!(
            choose_placement(&groups, 5, &config),
            Placement::JoinOpenGroup(1)
        );
    }

    #[test]
    fn forms_group_when_all_full_and_enough_pending() {
        let config = GroupSizeConfig::default();
        let groups = vec![group_of(4, "a")];
        assert_eq!(choose_placement(&groups, 3, &config), Placement::FormGroup);
        assert_eq!(choose_placement(&[], 3, &config), Placement::FormGroup);
    }

    #[test]
    fn joins_smallest_when_all_full_and_few_pending() {
        let config = GroupSizeConfig::default();
        let groups = vec![group_of(5, "a"), group_of(4, "b"), group_of(4, "c")];
        assert_eq!(
            choose_placement(&groups, 2, &config),
            Placement::JoinSmallest(1)
        );
    }

    #[test]
    fn singleton_when_nothing_exists() {
        let config = GroupSizeConfig::default();
        assert_eq!(choose_placement(&[], 2, &config), Placement::Singleton);
    }

    #[test]
    fn valid_candidates_pass_through_untouched() {
        let config = GroupSizeConfig::default();
        let candidates = vec![group_of(3, "a"), group_of(4, "b")];
        let result = redistribute(candidates.clone(), &config);
        assert_eq!(result, candidates);
    }

    #[test]
    fn short_tail_fills_open_seats() {
        let config = GroupSizeConfig::default();
        let result = redistribute(vec![group_of(3, "a"), group_of(3, "b"), group_of(2, "c")], &config);
        assert_eq!(sizes(&result), vec![4, 4]);
    }

    #[test]
    fn leftovers_form_their_own_group_when_seats_run_out() {
        let config = GroupSizeConfig::default();
        let candidates = vec![
            group_of(4, "a"),
            group_of(2, "b"),
            group_of(1, "c"),
        ];
        let result = redistribute(candidates, &config);
        assert_eq!(sizes(&result), vec![4, 3]);
    }

    #[test]
    fn lone_leftover_overflows_into_smallest_full_group() {
        let config = GroupSizeConfig::default();
        let result = redistribute(vec![group_of(4, "a"), group_of(1, "b")], &config);
        assert_eq!(sizes(&result), vec![5]);
    }

    #[test]
    fn tiny_population_collapses_into_one_group() {
        let config = GroupSizeConfig::default();
        let result = redistribute(vec![group_of(1, "a"), group_of(1, "b")], &config);
        assert_eq!(sizes(&result), vec![2]);
    }

    #[test]
    fn no_one_is_lost() {
        let config = GroupSizeConfig::default();
        let candidates = vec![group_of(2, "a"), group_of(1, "b"), group_of(2, "c"), group_of(2, "d")];
        let result = redistribute(candidates, &config);
        assert_eq!(sizes(&result).iter().sum::<usize>(), 7);
        assert!(result.iter().all(|g| g.len() >= 3));
    }
}
