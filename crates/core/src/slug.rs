//! Challenge-title slugs for sign-asset paths.
//!
//! Letter questions point at assets laid out as
//! `/<challenge-slug>/<letter>.png`, so the slug must match the asset
//! tree exactly: NFD-decompose, drop combining marks, lowercase, and
//! turn spaces into hyphens.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Slug for a challenge title.
#[must_use]
pub fn slug(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Asset path for a letter question: the sign image for `word` under the
/// challenge's asset directory.
#[must_use]
pub fn asset_path(challenge_title: &str, word: &str) -> String {
    format!("/{}/{}.png", slug(challenge_title), word.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_lowercases() {
        assert_eq!(slug("Letra Ã"), "letra-a");
        assert_eq!(slug("Letra Ç"), "letra-c");
        assert_eq!(slug("Saudações"), "saudacoes");
    }

    #[test]
    fn spaces_become_hyphens() {
        assert_eq!(slug("Animais da Fazenda"), "animais-da-fazenda");
    }

    #[test]
    fn asset_path_pins_the_letter_convention() {
        assert_eq!(asset_path("Letra Ã", "A"), "/letra-a/a.png");
        assert_eq!(asset_path("Letra B", "B"), "/letra-b/b.png");
    }
}
