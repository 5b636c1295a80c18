use rand::seq::SliceRandom;
use rand::Rng;

/// Attempt budget for plain label shuffles.
pub const DEFAULT_SHUFFLE_ATTEMPTS: usize = 50;
/// Attempt budget used when laying out weighted wheel slots.
pub const WEIGHTED_SHUFFLE_ATTEMPTS: usize = 80;

/// Counts positions whose value equals the value right before it.
pub fn adjacent_duplicates<T: PartialEq>(items: &[T]) -> usize {
    items.windows(2).filter(|pair| pair[0] == pair[1]).count()
}

/// Shuffles `items` so that equal values are not neighbours, best effort.
///
/// Up to `max_attempts` independent uniform permutations are drawn and the
/// first one without neighbouring duplicates is returned. Otherwise the
/// permutation with the fewest duplicates is repaired greedily, which can
/// still leave duplicates behind when one value fills more than half of
/// the sequence.
///
/// Sequences of two items or fewer are returned unchanged.
pub fn shuffle_avoid_adjacent<T, R>(items: &[T], max_attempts: usize, rng: &mut R) -> Vec<T>
where
    T: PartialEq + Clone,
    R: Rng + ?Sized,
{
    if items.len() <= 2 {
        return items.to_vec();
    }

    let mut best = items.to_vec();
    let mut best_bad = usize::MAX;

    for _ in 0..max_attempts {
        let mut arr = items.to_vec();
        arr.shuffle(rng);
        let bad = adjacent_duplicates(&arr);
        if bad == 0 {
            return arr;
        }
        if bad < best_bad {
            best_bad = bad;
            best = arr;
        }
    }

    log::debug!(
        "No clean shuffle of {} items after {} attempts, repairing best ({} duplicates)",
        items.len(),
        max_attempts,
        best_bad
    );
    repair_adjacent(&mut best);
    best
}

/// Left-to-right greedy pass: a duplicate at `i` is swapped with the nearest
/// later value that differs from `arr[i - 1]`. Unfixable spots are left alone.
fn repair_adjacent<T: PartialEq>(arr: &mut [T]) {
    for i in 1..arr.len() {
        if arr[i] != arr[i - 1] {
            continue;
        }
        if let Some(j) = (i + 1..arr.len()).find(|&k| arr[k] != arr[i - 1]) {
            arr.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted(mut v: Vec<&'static str>) -> Vec<&'static str> {
        v.sort();
        v
    }

    #[test]
    fn test_short_input_is_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(shuffle_avoid_adjacent(&["a", "a"], 50, &mut rng), vec!["a", "a"]);
        assert_eq!(shuffle_avoid_adjacent(&["b"], 50, &mut rng), vec!["b"]);
        assert!(shuffle_avoid_adjacent::<&str, _>(&[], 50, &mut rng).is_empty());
    }

    #[test]
    fn test_output_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = vec!["a", "b", "b", "c", "c", "c", "d"];
        let out = shuffle_avoid_adjacent(&input, 80, &mut rng);
        assert_eq!(sorted(out), sorted(input));
    }

    #[test]
    fn test_greedy_repair_without_attempts() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = shuffle_avoid_adjacent(&["a", "a", "b", "b"], 0, &mut rng);
        assert_eq!(out, vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_repair_leaves_unavoidable_duplicate() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = shuffle_avoid_adjacent(&["a", "a", "a", "b"], 0, &mut rng);
        assert_eq!(out, vec!["a", "b", "a", "a"]);
        assert_eq!(adjacent_duplicates(&out), 1);
    }

    #[test]
    fn test_dominant_label_never_panics() {
        let mut rng = StdRng::seed_from_u64(11);
        let input = vec!["x", "x", "x", "x", "x", "y"];
        let out = shuffle_avoid_adjacent(&input, 80, &mut rng);
        assert_eq!(out.len(), 6);
        assert!(adjacent_duplicates(&out) >= 3);
    }

    #[test]
    fn test_feasible_input_converges() {
        let mut rng = StdRng::seed_from_u64(2024);
        let input = vec!["a", "b", "b", "c", "c", "c"];
        let clean = (0..1000)
            .filter(|_| {
                let out = shuffle_avoid_adjacent(&input, WEIGHTED_SHUFFLE_ATTEMPTS, &mut rng);
                adjacent_duplicates(&out) == 0
            })
            .count();
        assert!(clean >= 990, "only {} of 1000 shuffles were clean", clean);
    }
}
