//! Utterance Parser (UP). Stateless text -> intent/items extraction.
//! Quantity + menu-tail segments are parsed with `nom` combinators in the
//! style of the teacher's `DayOfWeekParser`/`CanteenParser`; the two
//! fixed-format extractions (postcode, house number) use `regex`, exactly
//! as named in spec.md §4.3.

use lazy_static::lazy_static;
use nom::character::complete::{digit1, space1};
use nom::combinator::{map_res, rest};
use nom::sequence::separated_pair;
use nom::IResult;
use phf::phf_set;
use regex::Regex;

use super::model::prelude::{MenuIndex, OrderItem};
use super::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
    Unknown,
}

static YES_PHRASES: phf::Set<&'static str> = phf_set! {
    "ja", "jazeker", "klopt", "is goed", "oke", "is prima", "correct",
};

static NO_PHRASES: phf::Set<&'static str> = phf_set! {
    "nee", "niets", "dat was het", "is alles", "klaar", "klopt niet", "anders",
};

/// Membership of the yes/no token sets on the normalised utterance.
pub fn yes_no(text: &str) -> YesNo {
    let normalised = normalize(text);
    if YES_PHRASES.iter().any(|p| normalised.contains(p)) {
        YesNo::Yes
    } else if NO_PHRASES.iter().any(|p| normalised.contains(p)) {
        YesNo::No
    } else {
        YesNo::Unknown
    }
}

/// Extracts digits from a phone utterance; a leading international "31"
/// prefix (len >= 11) is folded back to a local leading "0".
pub fn phone_digits(text: &str) -> String {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.starts_with("31") && digits.len() >= 11 {
        format!("0{}", &digits[2..])
    } else {
        digits
    }
}

lazy_static! {
    static ref POSTCODE_RE: Regex = Regex::new(r"(?i)\b(\d{4})\s?([A-Za-z]{2})\b").unwrap();
    static ref HOUSE_NUMBER_RE: Regex = Regex::new(r"\b(\d{1,4}[A-Za-z]?)\b").unwrap();
    static ref SPLIT_RE: Regex = Regex::new(r"\s*(?:,| en dan | en | plus | & )\s*").unwrap();
    static ref PIZZA_WORD_RE: Regex = Regex::new(r"\bpizzas?\b").unwrap();
}

/// 4-digit + 2-letter postcode, upper-cased with spaces removed.
pub fn postcode(text: &str) -> Option<String> {
    let caps = POSTCODE_RE.captures(text)?;
    Some(format!("{}{}", &caps[1], caps[2].to_uppercase()))
}

/// First `\d{1,4}[A-Za-z]?` match.
pub fn house_number(text: &str) -> Option<String> {
    HOUSE_NUMBER_RE
        .captures(text)
        .map(|c| c[1].to_string())
}

/// Dutch number words "een".."tien" -> 1..10.
pub fn number_word(word: &str) -> Option<u32> {
    match word {
        "een" | "één" => Some(1),
        "twee" => Some(2),
        "drie" => Some(3),
        "vier" => Some(4),
        "vijf" => Some(5),
        "zes" => Some(6),
        "zeven" => Some(7),
        "acht" => Some(8),
        "negen" => Some(9),
        "tien" => Some(10),
        _ => None,
    }
}

fn quantity_token(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>)(input).or_else(|_: nom::Err<nom::error::Error<&str>>| {
        let mut words = input.splitn(2, ' ');
        let first = words.next().unwrap_or("");
        match number_word(first) {
            Some(n) => Ok((&input[first.len()..], n)),
            None => Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Digit,
            ))),
        }
    })
}

/// Parses "<qty> <tail>" into (qty, tail); used for segments like
/// "twee margherita" / "3 quattro formaggi".
fn quantity_and_tail(input: &str) -> IResult<&str, (u32, &str)> {
    separated_pair(quantity_token, space1, rest)(input)
}

fn split_segments(text: &str) -> Vec<String> {
    SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses menu items out of a caller utterance against the given index.
/// Deduplicates by menu item within the utterance; quantity per occurrence
/// is `max(1, parsed_qty)`. Returns empty if the caller mentions
/// pizza(s) without naming a specific one (DSM then asks which pizza).
pub fn parse_items(text: &str, menu: &MenuIndex) -> Vec<OrderItem> {
    let normalised = normalize(text);
    if normalised.is_empty() {
        return Vec::new();
    }

    let segments = split_segments(&normalised);
    let mut used = std::collections::HashSet::new();
    let mut out = Vec::new();

    for segment in &segments {
        if let Ok((_, (qty, tail))) = quantity_and_tail(segment) {
            if let Some(hit) = menu.best_match(tail) {
                if used.insert(hit.normalised_name.clone()) {
                    out.push(OrderItem {
                        code: hit.code.clone(),
                        display_name: hit.display_name.clone(),
                        price: hit.price,
                        qty: qty.max(1),
                    });
                }
            }
        }
    }

    if out.is_empty() {
        for segment in &segments {
            if let Some(hit) = menu.best_match(segment) {
                if used.insert(hit.normalised_name.clone()) {
                    out.push(OrderItem {
                        code: hit.code.clone(),
                        display_name: hit.display_name.clone(),
                        price: hit.price,
                        qty: 1,
                    });
                }
            }
        }
    }

    if out.is_empty() && PIZZA_WORD_RE.is_match(&normalised) {
        return Vec::new();
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domain::model::prelude::MenuIndex;

    fn menu() -> MenuIndex {
        MenuIndex::load_from_str(
            r#"[{"name":"Pizza Margherita","price":10},{"name":"Pizza Hawai","price":11},{"name":"Spaghetti Carbonara","price":12}]"#,
        )
    }

    #[test]
    fn yes_no_detects_membership() {
        assert_eq!(yes_no("Ja, klopt helemaal"), YesNo::Yes);
        assert_eq!(yes_no("nee dank u"), YesNo::No);
        assert_eq!(yes_no("euhm"), YesNo::Unknown);
    }

    #[test]
    fn phone_digits_folds_country_code() {
        assert_eq!(phone_digits("+31612345678"), "0612345678");
        assert_eq!(phone_digits("0612345678"), "0612345678");
    }

    #[test]
    fn postcode_and_house_number_extraction() {
        assert_eq!(postcode("mijn postcode is 1234 AB").as_deref(), Some("1234AB"));
        assert_eq!(house_number("huisnummer 12a graag").as_deref(), Some("12"));
    }

    #[test]
    fn parses_quantity_and_menu_item() {
        let items = parse_items("twee margherita", &menu());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].qty, 2);
        assert_eq!(items[0].display_name, "Pizza Margherita");
    }

    #[test]
    fn parses_multiple_segments_deduplicated() {
        let items = parse_items("een margherita en een hawai", &menu());
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn unspecified_pizza_returns_empty() {
        let items = parse_items("ik wil graag pizzas", &menu());
        assert!(items.is_empty());
    }

    #[test]
    fn reparses_its_own_spoken_back_items() {
        let spoken = "2 Pizza Margherita, 1 Spaghetti Carbonara";
        let items = parse_items(spoken, &menu());
        let mut names: Vec<_> = items.iter().map(|i| i.display_name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["Pizza Margherita", "Spaghetti Carbonara"]);
    }
}
