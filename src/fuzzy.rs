// Approximate title matching for the search fallback.
//
// Scores are on a 0-100 scale. `weighted_ratio` combines a plain edit
// similarity with token-order-insensitive and substring-aware variants, and
// takes the best of them, so "matrix the" still scores well against
// "The Matrix" and a short query can match inside a long title.

const UNBASE_SCALE: f64 = 0.95;

/// Lowercases, replaces anything that is not alphanumeric with a space, and
/// trims.
pub fn normalize(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    mapped.trim().to_string()
}

/// Returns the `limit` best-scoring choices, highest first. Ties keep the
/// order of `choices`.
pub fn extract<'a, I>(query: &str, choices: I, limit: usize) -> Vec<(&'a str, u8)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(&str, u8)> = choices
        .into_iter()
        .map(|choice| (choice, weighted_ratio(query, choice)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(limit);
    scored
}

/// Best of several similarity measures, each scaled by how much it should
/// be trusted.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let p1 = normalize(a);
    let p2 = normalize(b);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let base = ratio(&p1, &p2);
    let (l1, l2) = (p1.chars().count() as f64, p2.chars().count() as f64);
    let len_ratio = l1.max(l2) / l1.min(l2);

    let best = if len_ratio < 1.5 {
        let sorted = token_sort_ratio(&p1, &p2) * UNBASE_SCALE;
        let set = token_set_ratio(&p1, &p2, ratio) * UNBASE_SCALE;
        [base, sorted, set].into_iter().fold(0.0, f64::max)
    } else {
        let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
        let partial = partial_ratio(&p1, &p2) * partial_scale;
        let sorted = partial_ratio(&sort_tokens(&p1), &sort_tokens(&p2)) * UNBASE_SCALE * partial_scale;
        let set = token_set_ratio(&p1, &p2, partial_ratio) * UNBASE_SCALE * partial_scale;
        [base, partial, sorted, set].into_iter().fold(0.0, f64::max)
    };
    best.round().clamp(0.0, 100.0) as u8
}

/// Edit similarity: `2 * lcs / (len_a + len_b)`, as a percentage.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / total as f64
}

/// Best `ratio` of the shorter string against every same-length window of
/// the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let mut best: f64 = 0.0;
    for window in long.windows(short.len()) {
        let score = 200.0 * lcs_len(&short, window) as f64 / (2 * short.len()) as f64;
        best = best.max(score);
        if best >= 100.0 {
            break;
        }
    }
    best
}

pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sort_tokens(a), &sort_tokens(b))
}

/// Compares the shared tokens against each side's shared-plus-remaining
/// tokens, so extra words on one side cost little.
pub fn token_set_ratio(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let mut ta: Vec<&str> = a.split_whitespace().collect();
    let mut tb: Vec<&str> = b.split_whitespace().collect();
    ta.sort_unstable();
    ta.dedup();
    tb.sort_unstable();
    tb.dedup();

    let common: Vec<&str> = ta.iter().copied().filter(|t| tb.contains(t)).collect();
    let only_a: Vec<&str> = ta.iter().copied().filter(|t| !tb.contains(t)).collect();
    let only_b: Vec<&str> = tb.iter().copied().filter(|t| !ta.contains(t)).collect();

    let sect = common.join(" ");
    let combined_a = join_trimmed(&sect, &only_a.join(" "));
    let combined_b = join_trimmed(&sect, &only_b.join(" "));

    let pairs = [(&sect, &combined_a), (&sect, &combined_b), (&combined_a, &combined_b)];
    pairs
        .iter()
        .map(|(x, y)| if x.is_empty() || y.is_empty() { 0.0 } else { scorer(x, y) })
        .fold(0.0, f64::max)
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_trimmed(a: &str, b: &str) -> String {
    format!("{a} {b}").trim().to_string()
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb { prev[j] + 1 } else { prev[j + 1].max(cur[j]) };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("  Spider-Man: Homecoming! "), "spider man  homecoming");
    }

    #[test]
    fn identical_after_normalizing_scores_100() {
        assert_eq!(weighted_ratio("spider man", "Spider-Man"), 100);
    }

    #[test]
    fn word_order_is_forgiven() {
        assert!(weighted_ratio("matrix the", "The Matrix") >= 90);
    }

    #[test]
    fn typo_scores_below_exact_threshold() {
        let score = weighted_ratio("inceptoin", "Inception");
        assert!(score < 96, "score was {score}");
        assert!(score > 80, "score was {score}");
    }

    #[test]
    fn unrelated_strings_score_low() {
        assert!(weighted_ratio("zzz", "Casablanca") < 30);
    }

    #[test]
    fn extract_orders_by_score_and_limits() {
        let titles = ["Heat", "Inception 2", "Inception"];
        let found = extract("inceptoin", titles, 2);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "Inception");
        assert_eq!(found[1].0, "Inception 2");
        assert!(found[0].1 >= found[1].1);
    }

    #[test]
    fn partial_ratio_finds_substring() {
        assert_eq!(partial_ratio("godfather", "the godfather part ii"), 100.0);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(weighted_ratio("", "Heat"), 0);
        assert_eq!(weighted_ratio("!!!", "Heat"), 0);
    }
}
