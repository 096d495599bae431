//! Random dictionary words
//!
//! The `words` keyword draws from an embedded common-word list using the
//! global RNG. Unlike every other resolver it deliberately ignores the
//! per-position seed, so each render produces fresh words.

use rand::seq::SliceRandom;

/// Default word count when no (or a malformed) count argument is given
pub const DEFAULT_COUNT: usize = 5;

/// Common English nouns and adjectives, flavor-neutral on purpose
const WORD_LIST: &[&str] = &[
    "anchor", "animal", "answer", "apple", "autumn", "balance", "basket", "beacon",
    "bicycle", "blanket", "border", "bottle", "branch", "breath", "bridge", "bright",
    "brother", "butter", "candle", "canyon", "carpet", "castle", "charcoal", "circle",
    "clover", "cobweb", "compass", "copper", "corner", "cottage", "courage", "cradle",
    "crystal", "curtain", "danger", "desert", "diamond", "dinner", "distance", "dream",
    "driftwood", "echo", "elbow", "ember", "engine", "evening", "feather", "fiction",
    "finger", "firefly", "flavor", "forest", "fortune", "fountain", "freckle", "garden",
    "gentle", "glacier", "glimmer", "granite", "gravel", "habit", "hammer", "harbor",
    "harvest", "hollow", "honey", "horizon", "hunger", "island", "ivory", "jacket",
    "journey", "jungle", "kettle", "kitchen", "ladder", "lantern", "laughter", "lemon",
    "letter", "library", "lightning", "lumber", "machine", "magnet", "marble", "meadow",
    "memory", "mirror", "mountain", "museum", "needle", "nectar", "night", "ocean",
    "orbit", "orchard", "oyster", "paper", "pattern", "pebble", "pencil", "pepper",
    "picture", "pillow", "planet", "pocket", "powder", "prairie", "puzzle", "quarry",
    "quiet", "rabbit", "railway", "rainbow", "raven", "ribbon", "river", "rocket",
    "saddle", "sailor", "salt", "shadow", "shelter", "shoulder", "signal", "silver",
    "sister", "sketch", "smoke", "spark", "spider", "spiral", "spring", "stone",
    "storm", "stranger", "stream", "street", "sugar", "summer", "sunset", "supper",
    "swallow", "tangle", "teacher", "temple", "theater", "thunder", "ticket", "timber",
    "tower", "train", "travel", "treasure", "tunnel", "turtle", "umbrella", "valley",
    "velvet", "village", "vision", "voyage", "wagon", "walnut", "weather", "whisper",
    "willow", "window", "winter", "wonder", "writer", "yellow",
];

/// Produce `count` pseudo-random words joined by comma-space.
pub fn random_words(count: usize) -> String {
    let mut rng = rand::thread_rng();
    let picks: Vec<&str> = (0..count)
        .map(|_| *WORD_LIST.choose(&mut rng).unwrap_or(&"word"))
        .collect();
    picks.join(", ")
}

/// Parse a count argument, falling back to [`DEFAULT_COUNT`].
pub fn parse_count(arg: Option<&str>) -> usize {
    arg.and_then(|s| s.trim().parse().ok()).unwrap_or(DEFAULT_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_requested_count() {
        let joined = random_words(3);
        assert_eq!(joined.split(", ").count(), 3);
    }

    #[test]
    fn single_word_has_no_separator() {
        let word = random_words(1);
        assert!(!word.contains(','));
        assert!(WORD_LIST.contains(&word.as_str()));
    }

    #[test]
    fn count_parsing_falls_back_to_default() {
        assert_eq!(parse_count(None), 5);
        assert_eq!(parse_count(Some("3")), 3);
        assert_eq!(parse_count(Some(" 7 ")), 7);
        assert_eq!(parse_count(Some("many")), 5);
    }
}
