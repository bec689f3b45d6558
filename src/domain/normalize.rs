//! Text normalisation shared by the utterance parser (UP). Lower-case,
//! strip accents, fold curly apostrophes, drop punctuation, collapse
//! whitespace, fold hawai(i|ï) variants.

use std::borrow::Cow;

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^a-z0-9\s\-&]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Diacritic folding table for the Latin letters that show up in Dutch
/// menu/address speech (NFD decomposition + combining-mark strip, without
/// pulling in a full Unicode-normalisation crate for a handful of letters).
static ACCENT_FOLD: phf::Map<char, char> = phf_map! {
    'à' => 'a', 'á' => 'a', 'â' => 'a', 'ä' => 'a', 'ã' => 'a', 'å' => 'a',
    'è' => 'e', 'é' => 'e', 'ê' => 'e', 'ë' => 'e',
    'ì' => 'i', 'í' => 'i', 'î' => 'i', 'ï' => 'i',
    'ò' => 'o', 'ó' => 'o', 'ô' => 'o', 'ö' => 'o', 'õ' => 'o',
    'ù' => 'u', 'ú' => 'u', 'û' => 'u', 'ü' => 'u',
    'ý' => 'y', 'ÿ' => 'y',
    'ç' => 'c', 'ñ' => 'n',
};

/// Normalises a caller utterance for keyword/token matching.
pub fn normalize(input: &str) -> String {
    let lower = input.to_lowercase();
    let folded = fold_apostrophes(&lower);
    let stripped_accents: String = folded
        .chars()
        .map(|c| *ACCENT_FOLD.get(&c).unwrap_or(&c))
        .collect();
    let pizzas_fixed = stripped_accents.replace("'s", "s");
    let no_punct = NON_WORD.replace_all(&pizzas_fixed, " ");
    let collapsed = WHITESPACE.replace_all(&no_punct, " ");
    let hawai = fold_hawai(collapsed.trim());
    hawai.into_owned()
}

fn fold_apostrophes(s: &str) -> Cow<'_, str> {
    if s.contains(['\u{2019}', '\u{2018}', '`']) {
        Cow::Owned(
            s.replace('\u{2019}', "'")
                .replace('\u{2018}', "'")
                .replace('`', "'"),
        )
    } else {
        Cow::Borrowed(s)
    }
}

fn fold_hawai(s: &str) -> Cow<'_, str> {
    if s.contains("hawaii") || s.contains("hawai") {
        Cow::Owned(s.replace("hawaii", "hawai"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Tokens of length >= 3, used for overlap scoring against menu items.
pub fn significant_tokens(normalized: &str) -> Vec<&str> {
    normalized.split(' ').filter(|t| t.len() >= 3).collect()
}
