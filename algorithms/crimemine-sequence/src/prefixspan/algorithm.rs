use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crimemine::Fit;
use log::debug;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::SequenceError;
use crate::prefixspan::{PrefixSpanParams, PrefixSpanValidParams};

/// Frequent sequential pattern mining by prefix projection
///
/// A pattern is an ordered list of symbols and a sequence *contains* it when the symbols occur
/// in the sequence in the same order, not necessarily next to each other. The support of a
/// pattern is the number of sequences containing it, and a pattern is frequent when its
/// support reaches `max(1, floor(min_support * n_sequences))`.
///
/// ## Algorithm
///
/// The search grows patterns one symbol at a time, depth first:
/// - every symbol contained in at least `min_count` sequences of the current database starts or
///   extends a pattern, counting each symbol once per sequence;
/// - the database is then *projected* on that symbol: every sequence is replaced by its suffix
///   after the first occurrence of the symbol, sequences without it or with an empty suffix are
///   dropped;
/// - the search recurses into the projected database until no frequent symbol is left.
///
/// Because the first occurrence is the earliest possible end of a match, a symbol counted in
/// the projected database of a pattern is exactly a one symbol extension of that pattern, so
/// its count is the support of the extended pattern. The search is exhaustive under the support
/// threshold.
///
/// Patterns are ranked by decreasing support, longer patterns first among equal support, and
/// in discovery order otherwise.
///
/// ## Tutorial
///
/// ```
/// use crimemine::Fit;
/// use crimemine_sequence::PrefixSpan;
///
/// let sequences = vec![vec!["A", "B"], vec!["A", "B", "C"], vec!["A", "C"]];
/// let patterns = PrefixSpan::params(0.7).fit(sequences.as_slice()).unwrap();
///
/// assert_eq!(patterns.min_count(), 2);
/// assert_eq!(patterns.patterns()[0].items(), &["A"]);
/// assert_eq!(patterns.support(&["A", "B"]), Some(2));
/// assert_eq!(patterns.support(&["B", "C"]), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PrefixSpan;

impl PrefixSpan {
    pub fn params(min_support: f64) -> PrefixSpanParams {
        PrefixSpanParams::new(min_support)
    }
}

/// A frequent pattern together with its support count
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern<S> {
    items: Vec<S>,
    support: usize,
}

impl<S> Pattern<S> {
    pub fn items(&self) -> &[S] {
        &self.items
    }

    /// Number of sequences containing the pattern
    pub fn support(&self) -> usize {
        self.support
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<S> {
        self.items
    }
}

/// Ranked result of a PrefixSpan run
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct FrequentPatterns<S> {
    patterns: Vec<Pattern<S>>,
    n_sequences: usize,
    min_count: usize,
}

impl<S: PartialEq> FrequentPatterns<S> {
    /// Every frequent pattern, ranked
    pub fn patterns(&self) -> &[Pattern<S>] {
        &self.patterns
    }

    /// The `n` best ranked patterns, or all of them if there are fewer
    pub fn top(&self, n: usize) -> &[Pattern<S>] {
        &self.patterns[..n.min(self.patterns.len())]
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of sequences mined
    pub fn n_sequences(&self) -> usize {
        self.n_sequences
    }

    /// Support a pattern needed to be reported
    pub fn min_count(&self) -> usize {
        self.min_count
    }

    /// Support of `items` if it was found frequent
    pub fn support<T>(&self, items: &[T]) -> Option<usize>
    where
        S: PartialEq<T>,
    {
        self.patterns
            .iter()
            .find(|p| {
                p.items.len() == items.len() && p.items.iter().zip(items).all(|(a, b)| a == b)
            })
            .map(|p| p.support)
    }

    pub fn into_patterns(self) -> Vec<Pattern<S>> {
        self.patterns
    }
}

impl<S: Clone + Eq + Hash> Fit<[Vec<S>], SequenceError> for PrefixSpanValidParams {
    type Object = FrequentPatterns<S>;

    /// Mine every frequent pattern of `sequences`
    ///
    /// An empty corpus yields no pattern.
    fn fit(&self, sequences: &[Vec<S>]) -> Result<Self::Object, SequenceError> {
        let min_count = self.min_count(sequences.len());
        let database = sequences.iter().map(Vec::as_slice).collect::<Vec<_>>();

        let mut prefix = Vec::new();
        let mut patterns = Vec::new();
        grow(&mut prefix, &database, min_count, &mut patterns);

        // stable, ties keep discovery order
        patterns.sort_by(|a: &Pattern<S>, b| {
            b.support
                .cmp(&a.support)
                .then_with(|| b.items.len().cmp(&a.items.len()))
        });
        debug!(
            "{} frequent patterns in {} sequences (min count {})",
            patterns.len(),
            sequences.len(),
            min_count
        );

        Ok(FrequentPatterns {
            patterns,
            n_sequences: sequences.len(),
            min_count,
        })
    }
}

/// Depth first prefix growth over a projected database
fn grow<S: Clone + Eq + Hash>(
    prefix: &mut Vec<S>,
    database: &[&[S]],
    min_count: usize,
    patterns: &mut Vec<Pattern<S>>,
) {
    let items = frequent_items(database, min_count);
    debug!(
        "{} frequent items in {} projected sequences at depth {}",
        items.len(),
        database.len(),
        prefix.len()
    );

    for (item, support) in items {
        prefix.push(item.clone());
        patterns.push(Pattern {
            items: prefix.clone(),
            support,
        });

        let projected = project(item, database);
        if !projected.is_empty() {
            grow(prefix, &projected, min_count, patterns);
        }
        prefix.pop();
    }
}

/// Symbols contained in at least `min_count` sequences, with their count, in order of first
/// appearance. A symbol is counted once per sequence.
pub fn frequent_items<'a, S: Eq + Hash>(
    database: &[&'a [S]],
    min_count: usize,
) -> Vec<(&'a S, usize)> {
    let mut order = Vec::new();
    let mut counts: HashMap<&S, usize> = HashMap::new();
    for &sequence in database {
        let mut seen = HashSet::with_capacity(sequence.len());
        for item in sequence {
            if !seen.insert(item) {
                continue;
            }
            let count = counts.entry(item).or_insert(0);
            if *count == 0 {
                order.push(item);
            }
            *count += 1;
        }
    }

    order
        .into_iter()
        .filter_map(|item| {
            let count = counts[item];
            if count >= min_count {
                Some((item, count))
            } else {
                None
            }
        })
        .collect()
}

/// Suffixes strictly after the first occurrence of `item`
///
/// Sequences without `item`, or ending with its first occurrence, have no suffix.
pub fn project<'a, S: PartialEq>(item: &S, database: &[&'a [S]]) -> Vec<&'a [S]> {
    database
        .iter()
        .filter_map(|&sequence| {
            let position = sequence.iter().position(|x| x == item)?;
            let suffix = &sequence[position + 1..];
            if suffix.is_empty() {
                None
            } else {
                Some(suffix)
            }
        })
        .collect()
}

/// Whether the symbols of `pattern` occur in `sequence` in order, not necessarily contiguously
///
/// The empty pattern is contained in every sequence.
pub fn is_subsequence<S: PartialEq>(pattern: &[S], sequence: &[S]) -> bool {
    let mut remaining = pattern.iter().peekable();
    for item in sequence {
        match remaining.peek() {
            Some(&next) if next == item => {
                remaining.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    remaining.peek().is_none()
}

/// Number of `sequences` containing `pattern`
pub fn support_count<S: PartialEq>(pattern: &[S], sequences: &[Vec<S>]) -> usize {
    sequences
        .iter()
        .filter(|sequence| is_subsequence(pattern, sequence))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crimemine::ParamGuard;
    use ndarray_rand::rand::SeedableRng;
    use rand_isaac::Isaac64Rng;

    fn fixture() -> Vec<Vec<&'static str>> {
        vec![vec!["A", "B"], vec!["A", "B", "C"], vec!["A", "C"]]
    }

    fn mine<S: Clone + Eq + Hash>(sequences: &[Vec<S>], min_support: f64) -> FrequentPatterns<S> {
        PrefixSpan::params(min_support).fit(sequences).unwrap()
    }

    #[test]
    fn subsequence_test() {
        assert!(is_subsequence(&["A", "C"], &["A", "B", "C"]));
        assert!(is_subsequence::<&str>(&[], &[]));
        assert!(!is_subsequence(&["C", "A"], &["A", "B", "C"]));
        assert!(!is_subsequence(&["A", "A"], &["A", "B"]));
        assert!(is_subsequence(&["A", "A"], &["A", "B", "A"]));
    }

    #[test]
    fn items_are_counted_once_per_sequence() {
        let a = ["A", "A", "B"];
        let b = ["B", "C"];
        let database: Vec<&[&str]> = vec![&a, &b];
        assert_eq!(
            frequent_items(&database, 1),
            vec![(&"A", 1), (&"B", 2), (&"C", 1)]
        );
        assert_eq!(frequent_items(&database, 2), vec![(&"B", 2)]);
    }

    #[test]
    fn projection_skips_empty_suffixes() {
        let a = ["A", "B", "A", "C"];
        let b = ["B", "A"];
        let c = ["C"];
        let database: Vec<&[&str]> = vec![&a, &b, &c];
        let projected = project(&"A", &database);
        assert_eq!(projected, vec![&["B", "A", "C"][..]]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let patterns = mine(&fixture(), 0.7);
        assert_eq!(patterns.min_count(), 2);
        let found = patterns
            .patterns()
            .iter()
            .map(|p| (p.items().to_vec(), p.support()))
            .collect::<Vec<_>>();
        assert_eq!(
            found,
            vec![
                (vec!["A"], 3),
                (vec!["A", "B"], 2),
                (vec!["A", "C"], 2),
                (vec!["B"], 2),
                (vec!["C"], 2),
            ]
        );
        // support 1 is below the threshold
        assert_eq!(patterns.support(&["B", "C"]), None);
    }

    #[test]
    fn floor_of_fractional_threshold() {
        // 0.6 * 3 floors to 1, every contained pattern is frequent
        let patterns = mine(&fixture(), 0.6);
        assert_eq!(patterns.min_count(), 1);
        assert_eq!(patterns.support(&["B", "C"]), Some(1));
        assert_eq!(patterns.support(&["A", "B", "C"]), Some(1));
        assert_eq!(patterns.len(), 7);
    }

    #[test]
    fn extension_support_counts_sequences_not_suffixes() {
        // the first B precedes every C, a later B must not be counted twice
        let sequences = vec![vec!["B", "C", "B", "C"], vec!["B", "C"], vec!["C", "B"]];
        let patterns = mine(&sequences, 0.0);
        assert_eq!(patterns.support(&["B", "C"]), Some(2));
        assert_eq!(patterns.support(&["C", "B"]), Some(2));
        assert_eq!(patterns.support(&["B", "C", "B", "C"]), Some(1));
    }

    #[test]
    fn reported_support_matches_direct_count() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let sequences = crimemine_datasets::generate::event_sequences(
            60,
            2,
            7,
            &["THEFT", "ASSAULT", "BURGLARY", "VANDALISM"],
            &mut rng,
        );
        let patterns = mine(&sequences, 0.1);
        assert!(!patterns.is_empty());
        for pattern in patterns.patterns() {
            assert_eq!(pattern.support(), support_count(pattern.items(), &sequences));
            assert!(pattern.support() >= patterns.min_count());
        }
    }

    #[test]
    fn extensions_never_gain_support() {
        let mut rng = Isaac64Rng::seed_from_u64(7);
        let sequences =
            crimemine_datasets::generate::event_sequences(40, 2, 6, &["A", "B", "C"], &mut rng);
        let patterns = mine(&sequences, 0.05);
        for pattern in patterns.patterns().iter().filter(|p| p.len() > 1) {
            let prefix = &pattern.items()[..pattern.len() - 1];
            let parent = patterns.support(prefix).expect("prefix of a frequent pattern");
            assert!(pattern.support() <= parent);
        }
    }

    #[test]
    fn ranking_is_by_support_then_length() {
        let mut rng = Isaac64Rng::seed_from_u64(3);
        let sequences =
            crimemine_datasets::generate::event_sequences(30, 2, 5, &["X", "Y", "Z"], &mut rng);
        let patterns = mine(&sequences, 0.1);
        for pair in patterns.patterns().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.support() > b.support() || (a.support() == b.support() && a.len() >= b.len())
            );
        }
    }

    #[test]
    fn empty_corpus() {
        let sequences: Vec<Vec<String>> = Vec::new();
        let patterns = mine(&sequences, 0.5);
        assert!(patterns.is_empty());
        assert_eq!(patterns.n_sequences(), 0);
    }

    #[test]
    fn top_truncates_after_ranking() {
        let patterns = mine(&fixture(), 0.7);
        assert_eq!(patterns.top(2).len(), 2);
        assert_eq!(patterns.top(2)[0].items(), &["A"]);
        assert_eq!(patterns.top(100).len(), 5);
    }

    #[test]
    fn invalid_support_is_rejected() {
        let res: Result<FrequentPatterns<&str>, _> =
            PrefixSpan::params(2.).fit(fixture().as_slice());
        assert!(matches!(res, Err(SequenceError::InvalidParams(_))));
        assert!(PrefixSpan::params(-1.).check().is_err());
    }
}
