//! Grouping and reduction over typed record collections.

use std::collections::BTreeMap;

/// Groups `items` by the key returned from `key`. Items with no key are skipped.
///
/// Groups are ordered by key and keep their items in input order.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    F: FnMut(&T) -> Option<K>,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();

    for item in items {
        if let Some(k) = key(&item) {
            groups.entry(k).or_default().push(item);
        }
    }

    groups
}

/// Groups `items` by `key` then collapses every group with `reduce`.
///
/// A group whose reduction returns `None` is left out of the result.
pub fn group_reduce<T, K, R, F, G>(
    items: impl IntoIterator<Item = T>,
    key: F,
    mut reduce: G,
) -> BTreeMap<K, R>
where
    K: Ord,
    F: FnMut(&T) -> Option<K>,
    G: FnMut(Vec<T>) -> Option<R>,
{
    group_by(items, key)
        .into_iter()
        .filter_map(|(k, group)| reduce(group).map(|r| (k, r)))
        .collect()
}

/// Mean and sample standard deviation of a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// `None` for a group of one.
    pub std: Option<f64>,
}

/// Summarises the finite values of a group. Returns `None` if there are none.
pub fn summarise(values: impl IntoIterator<Item = f64>) -> Option<Summary> {
    let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    let count = values.len();
    if count == 0 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });

    Some(Summary { count, mean, std })
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn should_group_in_key_order() {
        let groups = group_by(vec![3, 1, 4, 1, 5, 9, 2, 6], |v| Some(v % 3));

        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert_eq!(groups[&0], vec![3, 9, 6]);
        assert_eq!(groups[&1], vec![1, 4, 1]);
        assert_eq!(groups[&2], vec![5, 2]);
    }

    #[test]
    fn should_skip_items_without_key() {
        let groups = group_by(vec![Some(1), None, Some(1)], |v| *v);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&1].len(), 2);
    }

    #[test]
    fn should_reduce_groups() {
        let maxima = group_reduce(
            vec![("a", 1), ("b", 7), ("a", 3)],
            |(k, _)| Some(*k),
            |g| g.into_iter().map(|(_, v)| v).max(),
        );

        assert_eq!(maxima.get(&"a"), Some(&3));
        assert_eq!(maxima.get(&"b"), Some(&7));
    }

    #[test]
    fn should_have_no_std_for_singleton() {
        let s = summarise([412.0]).unwrap();

        assert_eq!(s.count, 1);
        assert_eq!(s.mean, 412.0);
        assert_eq!(s.std, None);
    }

    #[test]
    fn should_have_zero_std_for_identical_pair() {
        let s = summarise([380.5, 380.5]).unwrap();

        assert_eq!(s.std, Some(0.0));
    }

    #[test]
    fn should_use_sample_std() {
        let s = summarise([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();

        assert_relative_eq!(s.mean, 5.0);
        assert_relative_eq!(s.std.unwrap(), (32.0_f64 / 7.0).sqrt());
    }

    #[test]
    fn should_ignore_nan() {
        let s = summarise([1.0, f64::NAN, 3.0]).unwrap();

        assert_eq!(s.count, 2);
        assert_relative_eq!(s.mean, 2.0);
        assert!(summarise([f64::NAN]).is_none());
    }
}
