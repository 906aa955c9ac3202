//! Static contest theme catalog.

use rand::seq::SliceRandom;

/// Contest prompts cycled through by automatic rotation.
pub const THEMES: &[&str] = &[
    "Sleepiest Sunday",
    "Muddiest Paws",
    "Best Costume",
    "Caught Mid-Zoomies",
    "Most Dramatic Yawn",
    "Tiniest Tongue",
    "Window Watcher",
    "Snow Day",
    "Beach Bum",
    "Couch Potato",
    "Best Friends",
    "Puppy Dog Eyes",
    "Box Fort Champion",
    "Majestic Floof",
    "Snack Time",
];

/// Pick a prompt from the catalog, uniformly at random.
///
/// Total for any non-empty catalog; [`THEMES`] is a non-empty constant, so
/// callers always get a prompt back.
#[must_use]
pub fn random_theme() -> &'static str {
    THEMES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(THEMES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_non_empty() {
        assert!(!THEMES.is_empty());
    }

    #[test]
    fn test_random_theme_comes_from_catalog() {
        for _ in 0..32 {
            let theme = random_theme();
            assert!(THEMES.contains(&theme));
        }
    }
}
