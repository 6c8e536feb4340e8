//! Turkish alphabetical ordering.
//!
//! Letters sort in Turkish alphabet order (`c < ç < d`, `h < ı < i`,
//! `o < ö < p`, `s < ş < t`, `u < ü < v`) with Turkish case folding
//! (`I` folds to `ı`, `İ` to `i`). Whitespace and punctuation sort before
//! digits, digits before letters, and anything outside the alphabet after
//! letters by code point.

use std::cmp::Ordering;

/// Lowercase Turkish alphabet, plus `q`, `w` and `x` at their Latin positions.
const ALPHABET: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";

/// Primary sort weight of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Weight {
    Punctuation(char),
    Digit(char),
    Letter(usize),
    Other(char),
}

/// Lowercase `c` the Turkish way.
pub fn fold_char(c: char) -> char {
    match c {
        'I' => 'ı',
        'İ' => 'i',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

/// Lowercase `s` the Turkish way.
pub fn fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Lowercase `s` for matching: every dotted and dotless `i` in either case
/// becomes `i`, so ASCII and Turkish spellings find each other.
pub fn search_fold(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'I' | 'ı' | 'İ' => 'i',
            _ => fold_char(c),
        })
        .collect()
}

fn weight(c: char) -> Weight {
    let folded = fold_char(c);
    if let Some(pos) = ALPHABET.chars().position(|letter| letter == folded) {
        Weight::Letter(pos)
    } else if folded.is_ascii_digit() {
        Weight::Digit(folded)
    } else if folded.is_whitespace() || folded.is_ascii_punctuation() {
        Weight::Punctuation(folded)
    } else {
        Weight::Other(folded)
    }
}

/// Compare two strings in Turkish alphabetical order.
///
/// Strings equal under folding fall back to byte order, so the result is
/// a total order.
pub fn compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(weight)
        .cmp(b.chars().map(weight))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(words: &[&str]) -> Vec<String> {
        let mut words: Vec<String> = words.iter().map(|w| (*w).to_owned()).collect();
        words.sort_by(|a, b| compare(a, b));
        words
    }

    #[test]
    fn turkish_letters_sit_after_their_base() {
        assert_eq!(
            sorted(&["dilek", "çiçek", "cem"]),
            vec!["cem", "çiçek", "dilek"]
        );
        assert_eq!(sorted(&["pelin", "öykü", "oya"]), vec!["oya", "öykü", "pelin"]);
        assert_eq!(sorted(&["tuna", "şule", "selin"]), vec!["selin", "şule", "tuna"]);
        assert_eq!(sorted(&["veli", "ümit", "umut"]), vec!["umut", "ümit", "veli"]);
        assert_eq!(sorted(&["hasan", "ğ", "gül"]), vec!["gül", "ğ", "hasan"]);
    }

    #[test]
    fn dotless_i_before_dotted_i() {
        assert_eq!(sorted(&["irmak", "ılgın"]), vec!["ılgın", "irmak"]);
        assert_eq!(compare("Irmak", "ırmak"), Ordering::Less);
        assert_eq!(compare("Işık", "irem"), Ordering::Less);
        assert_eq!(compare("İrem", "ırmak"), Ordering::Greater);
    }

    #[test]
    fn case_is_folded_before_tiebreak() {
        assert_eq!(sorted(&["b", "A", "a", "B"]), vec!["A", "a", "B", "b"]);
    }

    #[test]
    fn punctuation_then_digits_then_letters() {
        assert_eq!(
            sorted(&["ayse", "_ayse", "1ayse", "ayşe", "ayse2"]),
            vec!["_ayse", "1ayse", "ayse", "ayse2", "ayşe"]
        );
    }

    #[test]
    fn fold_uses_turkish_rules() {
        assert_eq!(fold("İSTANBUL"), "istanbul");
        assert_eq!(fold("IŞIK"), "ışık");
        assert_eq!(fold("Çağrı"), "çağrı");
    }

    #[test]
    fn search_fold_merges_every_i() {
        assert_eq!(search_fold("Alice_IG"), "alice_ig");
        assert_eq!(search_fold("IŞIK"), "işik");
        assert_eq!(search_fold("İzmir"), "izmir");
        assert_eq!(search_fold("ılgın"), search_fold("ILGIN"));
    }
}
