//! Ratcliff/Obershelp string similarity.
//!
//! The ratio of two sequences is `2·M / T`, where `T` is their combined
//! length and `M` the number of characters in matching blocks. Blocks are
//! found by taking the longest common substring, then recursing on the
//! pieces to its left and right.
//!
//! The query side is indexed once in a [`QueryProfile`] and compared
//! against many candidate titles.

use std::collections::HashMap;

/// Queries at least this long ignore "popular" characters when seeding
/// matches.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A query indexed for repeated comparison against candidate titles.
#[derive(Debug, Clone)]
pub struct QueryProfile {
    chars: Vec<char>,
    /// Character to ascending query offsets, minus popular characters.
    offsets: HashMap<char, Vec<usize>>,
    /// Full character counts, used by [`QueryProfile::quick_ratio`].
    counts: HashMap<char, usize>,
}

impl QueryProfile {
    #[must_use]
    pub fn new(query: &str) -> Self {
        let chars: Vec<char> = query.chars().collect();

        let mut offsets: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in chars.iter().enumerate() {
            offsets.entry(c).or_default().push(j);
        }
        let counts = offsets.iter().map(|(&c, js)| (c, js.len())).collect();

        let n = chars.len();
        if n >= AUTOJUNK_MIN_LEN {
            let popular_above = n / 100 + 1;
            offsets.retain(|_, js| js.len() <= popular_above);
        }

        Self {
            chars,
            offsets,
            counts,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths alone.
    #[must_use]
    pub fn real_quick_ratio(&self, candidate_len: usize) -> f64 {
        let matches = candidate_len.min(self.len());
        ratio_of(matches, candidate_len + self.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from shared character counts.
    #[must_use]
    pub fn quick_ratio(&self, candidate: &[char]) -> f64 {
        let mut available: HashMap<char, usize> = HashMap::new();
        let mut matches = 0;
        for c in candidate {
            let left = available
                .entry(*c)
                .or_insert_with(|| self.counts.get(c).copied().unwrap_or(0));
            if *left > 0 {
                *left -= 1;
                matches += 1;
            }
        }
        ratio_of(matches, candidate.len() + self.len())
    }

    /// Exact Ratcliff/Obershelp ratio between `candidate` and the query.
    #[must_use]
    pub fn ratio(&self, candidate: &[char]) -> f64 {
        ratio_of(
            self.matching_characters(candidate),
            candidate.len() + self.len(),
        )
    }

    /// Total size of all matching blocks.
    fn matching_characters(&self, a: &[char]) -> usize {
        let mut pending = vec![(0, a.len(), 0, self.len())];
        let mut total = 0;

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }

        total
    }

    /// Longest block `a[i..i+k] == query[j..j+k]` within the given bounds.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// earliest in the query.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.chars;
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // run_ending_at[j] = length of the match ending at a[i-1], b[j]
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.offsets.get(c) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending_at.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            run_ending_at = next;
        }

        // Popular characters never seed a match but may still extend one.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }
}

fn ratio_of(matches: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        2.0 * matches as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(a: &str, b: &str) -> f64 {
        let candidate: Vec<char> = a.chars().collect();
        QueryProfile::new(b).ratio(&candidate)
    }

    #[test]
    fn test_ratio_known_values() {
        assert!((ratio("abcd", "bcde") - 0.75).abs() < 1e-12);
        assert!((ratio(" abcd", "abcd abcd") - 10.0 / 14.0).abs() < 1e-12);
        assert!((ratio("apple", "appel") - 0.8).abs() < 1e-12);
        assert!((ratio("ape", "appel") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_transposed_letters() {
        // "incept" + "i" + "n": 8 matching characters out of 18.
        assert!((ratio("inception", "inceptoin") - 16.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_identical_and_disjoint() {
        assert!((ratio("the matrix", "the matrix") - 1.0).abs() < f64::EPSILON);
        assert!(ratio("abc", "xyz").abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_both_empty_is_one() {
        assert!((ratio("", "") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_empty_query() {
        assert!(ratio("avatar", "").abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_multibyte_characters() {
        // Compared per character, not per byte.
        assert!((ratio("amélie", "amelie") - 10.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_never_below_ratio() {
        let profile = QueryProfile::new("interstelar");
        for title in ["interstellar", "inception", "stellar", "the matrix", ""] {
            let chars: Vec<char> = title.chars().collect();
            let exact = profile.ratio(&chars);
            assert!(profile.quick_ratio(&chars) >= exact, "{title}");
            assert!(profile.real_quick_ratio(chars.len()) >= profile.quick_ratio(&chars));
        }
    }

    #[test]
    fn test_quick_ratio_counts_multiset_overlap() {
        let profile = QueryProfile::new("aab");
        let candidate: Vec<char> = "abbb".chars().collect();
        // overlap {a, b} = 2 of 7
        assert!((profile.quick_ratio(&candidate) - 4.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_long_query_popular_characters_only_extend() {
        let query = "a".repeat(200);
        let profile = QueryProfile::new(&query);
        let candidate: Vec<char> = "aaa".chars().collect();
        assert!((profile.ratio(&candidate) - 6.0 / 203.0).abs() < 1e-12);
    }
}
