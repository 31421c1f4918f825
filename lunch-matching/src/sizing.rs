use crate::types::GroupSizeConfig;

/// Whether `n` people can be split into groups that all respect the size
/// bounds. Zero people trivially can.
///
/// With `g` groups anywhere from `g * min` to `g * max` people fit, so the
/// fewest groups that can hold everyone (`ceil(n / max)`) is the one to check.
pub fn is_partitionable(n: usize, config: &GroupSizeConfig) -> bool {
    n == 0 || n.div_ceil(config.max_size()) * config.min_size() <= n
}

/// Size of the next group to cut from `remaining` people.
///
/// Prefers `min_size` and grows only as far as needed for the people left
/// behind to still form valid groups. When no size achieves that (the
/// population itself is not partitionable) it takes as many as fit, and
/// whatever is too small at the end goes through redistribution.
pub fn next_group_size(remaining: usize, config: &GroupSizeConfig) -> usize {
    let upper = config.max_size().min(remaining);
    (config.min_size()..=upper)
        .find(|size| is_partitionable(remaining - size, config))
        .unwrap_or(upper)
}

/// The full list of group sizes `next_group_size` produces for `n` people.
pub fn plan(n: usize, config: &GroupSizeConfig) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut remaining = n;
    while remaining > 0 {
        let size = next_group_size(remaining, config);
        sizes.push(size);
        remaining -= size;
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: usize, max: usize) -> GroupSizeConfig {
        GroupSizeConfig::new(min, max).unwrap()
    }

    #[test]
    fn partitionable_populations_for_default_bounds() {
        let config = GroupSizeConfig::default();
        let partitionable: Vec<usize> = (0..=12).filter(|n| is_partitionable(*n, &config)).collect();
        // 5 is the only population above 2 that 3s and 4s cannot cover.
        assert_eq!(partitionable, vec![0, 3, 4, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn equal_bounds_need_exact_multiples() {
        let config = bounds(3, 3);
        assert!(is_partitionable(9, &config));
        assert!(!is_partitionable(10, &config));
    }

    #[test]
    fn prefers_min_size_chunks() {
        assert_eq!(plan(6, &GroupSizeConfig::default()), vec![3, 3]);
        assert_eq!(plan(9, &GroupSizeConfig::default()), vec![3, 3, 3]);
    }

    #[test]
    fn grows_chunks_to_avoid_a_short_tail() {
        assert_eq!(plan(7, &GroupSizeConfig::default()), vec![3, 4]);
        assert_eq!(plan(8, &GroupSizeConfig::default()), vec![4, 4]);
        assert_eq!(plan(11, &GroupSizeConfig::default()), vec![3, 4, 4]);
    }

    #[test]
    fn small_population_is_a_single_chunk() {
        assert_eq!(plan(2, &GroupSizeConfig::default()), vec![2]);
        assert_eq!(plan(1, &GroupSizeConfig::default()), vec![1]);
        assert!(plan(0, &GroupSizeConfig::default()).is_empty());
    }

    #[test]
    fn unpartitionable_population_leaves_a_short_tail() {
        assert_eq!(plan(5, &GroupSizeConfig::default()), vec![4, 1]);
    }

    #[test]
    fn plans_respect_bounds_whenever_possible() {
        for (min, max) in [(1, 1), (2, 3), (3, 4), (3, 6), (4, 5), (5, 6)] {
            let config = bounds(min, max);
            for n in 0..60 {
                let sizes = plan(n, &config);
                assert_eq!(sizes.iter().sum::<usize>(), n);
                if is_partitionable(n, &config) {
                    assert!(
                        sizes.iter().all(|s| (min..=max).contains(s)),
                        "{n} people with bounds {min}-{max} planned as {sizes:?}"
                    );
                }
            }
        }
    }
}
