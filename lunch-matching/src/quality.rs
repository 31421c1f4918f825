use crate::types::Group;

/// Tables at least this big count fully toward the quality score; smaller
/// ones count half.
const FULL_TABLE_SIZE: usize = 3;

/// Number of distinct departments at the table.
pub fn diversity_score(group: &Group) -> usize {
    group.departments().len()
}

/// Mean per-table score of an assignment, `0.0` when there are no tables.
///
/// Each table scores its department count, halved when the table is smaller
/// than three. Only used to compare grouping policies offline.
pub fn matching_quality(groups: &[Group]) -> f64 {
    if groups.is_empty() {
        return 0.0;
    }

    let total: f64 = groups
        .iter()
        .map(|group| {
            let size_factor = if group.len() >= FULL_TABLE_SIZE { 1.0 } else { 0.5 };
            diversity_score(group) as f64 * size_factor
        })
        .sum();

    total / groups.len() as f64
}
