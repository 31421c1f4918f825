use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::types::{MatchGroup, Profile};

const TOP_PARTICIPANTS: usize = 10;

/// Participation over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipationStats {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub groups: usize,
    /// Seats filled: one per member of each group.
    pub participations: usize,
    /// Zero when there are no groups.
    pub average_group_size: f64,
    /// Fraction of groups seating at least two departments, in `[0, 1]`.
    pub cross_department_rate: f64,
    /// Seats per department. Members without one are left out.
    pub by_department: BTreeMap<String, usize>,
    /// Most frequent participants, most lunches first.
    pub top_participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub profile: Profile,
    pub lunches: usize,
}

/// Summarize the groups dated within `from..=to`.
///
/// `profiles` resolves member ids; members it does not know count towards
/// sizes but not towards departments or the top participants.
pub fn summarize(
    from: NaiveDate,
    to: NaiveDate,
    groups: &[MatchGroup],
    profiles: &HashMap<Uuid, Profile>,
) -> ParticipationStats {
    let groups: Vec<&MatchGroup> = groups
        .iter()
        .filter(|g| (from..=to).contains(&g.match_date))
        .collect();

    let participations: usize = groups.iter().map(|g| g.members.len()).sum();
    let mixed = groups
        .iter()
        .filter(|g| departments(g, profiles).len() >= 2)
        .count();

    let mut by_department: BTreeMap<String, usize> = BTreeMap::new();
    let mut lunches: HashMap<Uuid, usize> = HashMap::new();
    for member in groups.iter().flat_map(|g| g.members.iter()) {
        *lunches.entry(*member).or_default() += 1;
        if let Some(department) = profiles.get(member).and_then(|p| p.department.clone()) {
            *by_department.entry(department).or_default() += 1;
        }
    }

    let mut top_participants: Vec<Participant> = lunches
        .into_iter()
        .filter_map(|(id, lunches)| {
            profiles.get(&id).map(|profile| Participant {
                profile: profile.clone(),
                lunches,
            })
        })
        .collect();
    top_participants.sort_by(|a, b| {
        b.lunches
            .cmp(&a.lunches)
            .then_with(|| a.profile.name.cmp(&b.profile.name))
    });
    top_participants.truncate(TOP_PARTICIPANTS);

    ParticipationStats {
        from,
        to,
        groups: groups.len(),
        participations,
        average_group_size: ratio(participations, groups.len()),
        cross_department_rate: ratio(mixed, groups.len()),
        by_department,
        top_participants,
    }
}

fn departments<'a>(
    group: &MatchGroup,
    profiles: &'a HashMap<Uuid, Profile>,
) -> HashSet<Option<&'a str>> {
    group
        .members
        .iter()
        .map(|id| profiles.get(id).and_then(|p| p.department.as_deref()))
        .collect()
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}
