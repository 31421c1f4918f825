use std::collections::{BTreeMap, VecDeque};

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::redistribute::redistribute;
use crate::sizing::next_group_size;
use crate::types::{Group, GroupSizeConfig, Person};

use super::{chunk, GroupingStrategy};

/// Groups requesters so that each table mixes as many departments as
/// possible.
///
/// People are bucketed by department and each bucket is shuffled. Tables are
/// then filled round-robin: every round visits the departments that still
/// have people, in a freshly shuffled order, and takes one person from each
/// until the table reaches its target size. With a single department the
/// shuffled population is simply cut into chunks. Tables that end up too
/// small are dissolved and their members redistributed.
pub struct DepartmentMixStrategy;

impl GroupingStrategy for DepartmentMixStrategy {
    fn assign(
        &self,
        requesters: &[Person],
        config: &GroupSizeConfig,
        rng: &mut dyn RngCore,
    ) -> Vec<Group> {
        match requesters {
            [] => return Vec::new(),
            [only] => return vec![Group::new(vec![only.clone()])],
            _ => {}
        }

        let mut buckets = bucket_by_department(requesters);
        for bucket in buckets.iter_mut() {
            bucket.make_contiguous().shuffle(rng);
        }

        let candidates = if buckets.len() >= 2 {
            round_robin(buckets, config, rng)
        } else {
            chunk(buckets.into_iter().flatten().collect(), config)
        };

        let groups = redistribute(candidates, config);

        tracing::debug!(
            requesters = requesters.len(),
            groups = groups.len(),
            "assigned lunch groups"
        );

        groups
    }
}

/// One queue per department label, in label order so a seeded run is
/// reproducible.
fn bucket_by_department(requesters: &[Person]) -> Vec<VecDeque<Person>> {
    let mut buckets: BTreeMap<Option<&str>, VecDeque<Person>> = BTreeMap::new();
    for person in requesters {
        buckets
            .entry(person.department())
            .or_default()
            .push_back(person.clone());
    }
    buckets.into_values().collect()
}

fn round_robin(
    mut queues: Vec<VecDeque<Person>>,
    config: &GroupSizeConfig,
    rng: &mut dyn RngCore,
) -> Vec<Group> {
    let mut remaining: usize = queues.iter().map(VecDeque::len).sum();
    let mut groups = Vec::new();

    while remaining > 0 {
        let target = next_group_size(remaining, config);
        let mut members = Vec::with_capacity(target);

        while members.len() < target {
            let mut order: Vec<usize> = (0..queues.len())
                .filter(|&i| !queues[i].is_empty())
                .collect();
            if order.is_empty() {
                break;
            }
            order.shuffle(rng);

            for i in order {
                if members.len() == target {
                    break;
                }
                if let Some(person) = queues[i].pop_front() {
                    members.push(person);
                }
            }
        }

        if members.is_empty() {
            break;
        }
        remaining -= members.len();
        groups.push(Group::new(members));
    }

    groups
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn people(spec: &[(&str, usize)]) -> Vec<Person> {
        spec.iter()
            .flat_map(|(dept, count)| {
                (0..*count).map(move |i| Person::new(format!("{dept}-{i}"), *dept))
            })
            .collect()
    }

    fn assign(requesters: &[Person], seed: u64) -> Vec<Group> {
        let mut rng = StdRng::seed_from_u64(seed);
        DepartmentMixStrategy.assign(requesters, &GroupSizeConfig::default(), &mut rng)
    }

    #[test]
    fn empty_input() {
        assert!(assign(&[], 1).is_empty());
    }

    #[test]
    fn single_requester() {
        let alone = people(&[("forecast", 1)]);
        assert_eq!(assign(&alone, 1), vec![Group::new(alone.clone())]);
    }

    #[test]
    fn buckets_follow_label_order() {
        let requesters = vec![
            Person::new("b-0", "b"),
            Person::new("a-0", "a"),
            Person::new("b-1", "b"),
        ];
        let buckets = bucket_by_department(&requesters);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0][0].id, "a-0");
        assert_eq!(buckets[1].len(), 2);
    }

    #[test]
    fn round_robin_takes_one_per_department_per_round() {
        let mut rng = StdRng::seed_from_u64(7);
        let queues = bucket_by_department(&people(&[("a", 3), ("b", 3), ("c", 3)]));
        let groups = round_robin(queues, &GroupSizeConfig::default(), &mut rng);

        assert_eq!(groups.len(), 3);
        for group in &groups {
            assert_eq!(group.len(), 3);
            assert_eq!(group.departments().len(), 3, "{group:?}");
        }
    }

    #[test]
    fn two_even_departments_always_mix() {
        let requesters = people(&[("a", 3), ("b", 3)]);
        for seed in 0..50 {
            let groups = assign(&requesters, seed);
            assert_eq!(groups.len(), 2);
            for group in &groups {
                assert_eq!(group.departments().len(), 2, "seed {seed}: {group:?}");
            }
        }
    }

    #[test]
    fn dominant_department_still_spreads_minority() {
        let requesters = people(&[("big", 9), ("small", 3)]);
        for seed in 0..20 {
            let groups = assign(&requesters, seed);
            assert_eq!(groups.len(), 4);
            assert_eq!(groups[0].departments().len(), 2, "seed {seed}: {groups:?}");
            let mixed = groups.iter().filter(|g| g.departments().len() > 1).count();
            assert!(mixed >= 2, "seed {seed}: only {mixed} mixed tables");
        }
    }

    #[test]
    fn missing_department_is_its_own_bucket() {
        let mut requesters = people(&[("a", 2)]);
        requesters.push(Person {
            id: "anon".to_string(),
            department: None,
            name: None,
        });
        let groups = assign(&requesters, 3);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].departments().len(), 2);
    }

    #[test]
    fn same_seed_same_groups() {
        let requesters = people(&[("a", 5), ("b", 4), ("c", 2)]);
        assert_eq!(assign(&requesters, 42), assign(&requesters, 42));
    }
}
