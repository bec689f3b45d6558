//! Prompt templates: a keyed map from prompt-id to Dutch template string,
//! loaded from JSON with built-in defaults for every required key (spec.md
//! §6 "Configuration files").

use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Prompts {
    map: HashMap<String, String>,
}

const REQUIRED_KEYS: &[(&str, &str)] = &[
    ("greet_open_morning", "Goedemorgen, u spreekt met het bestelsysteem. Waarmee kan ik u helpen?"),
    ("greet_open_afternoon", "Goedemiddag, u spreekt met het bestelsysteem. Waarmee kan ik u helpen?"),
    ("greet_open_evening", "Goedenavond, u spreekt met het bestelsysteem. Waarmee kan ik u helpen?"),
    ("greet_closed", "We zijn op dit moment gesloten. Onze openingstijden zijn van vier uur 's middags tot tien uur 's avonds."),
    ("recording_notice", "Dit gesprek kan worden opgenomen voor trainingsdoeleinden."),
    ("ask_items", "Wat wilt u bestellen?"),
    ("ask_items_more", "Wilt u nog iets toevoegen, of is dit alles?"),
    ("item_added", "Genoteerd: {qty}× {name}."),
    ("ask_pizza_which", "Welke pizza bedoelt u precies?"),
    ("confirm_items", "Samengevat: {items}."),
    ("ask_items_confirm_ok", "Klopt dat zo?"),
    ("total_after_confirm", "Het totaalbedrag is {amount} euro."),
    ("ask_fulfilment", "Wilt u afhalen of laten bezorgen?"),
    ("ask_payment_pickup", "Betaalt u bij afhalen contant of pin, of wilt u een iDEAL-link?"),
    ("ask_payment_delivery", "Betaalt u contant of wilt u een iDEAL-link?"),
    ("ask_phone_for_delivery", "Kunt u uw telefoonnummer geven, dan controleer ik uw adres?"),
    ("confirm_lookup_found", "Ik heb {straat} {huisnr} in {postcode}. Klopt dat?"),
    ("confirm_lookup_missing", "Ik heb dit adres niet in mijn systeem. Wat is uw postcode en huisnummer?"),
    ("ask_postcode_house", "Kunt u uw postcode en huisnummer herhalen?"),
    ("pickup_eta", "Uw bestelling staat klaar om {time}."),
    ("delivery_eta", "Uw bestelling wordt bezorgd om {time}."),
    ("closing_pickup", "Dank u wel voor uw bestelling. Tot zo."),
    ("closing_delivery", "Dank u wel voor uw bestelling. Fijne dag."),
    ("fallback1", "Ik heb u niet goed verstaan. Kunt u het herhalen?"),
    ("say_prompt", "Zegt u het maar."),
];

impl Prompts {
    pub fn defaults() -> Self {
        let map = REQUIRED_KEYS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { map }
    }

    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::load_from_str(&raw),
            Err(err) => {
                tracing::warn!(?path, %err, "prompts file unreadable, using built-in defaults");
                Self::defaults()
            }
        }
    }

    pub fn load_from_str(raw: &str) -> Self {
        let mut prompts = Self::defaults();
        match serde_json::from_str::<HashMap<String, String>>(raw) {
            Ok(overrides) => prompts.map.extend(overrides),
            Err(err) => {
                tracing::warn!(%err, "prompts file is not valid JSON, using built-in defaults");
            }
        }
        prompts
    }

    pub fn get(&self, key: &str) -> &str {
        self.map
            .get(key)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn render(&self, key: &str, fields: &[(&str, &str)]) -> String {
        let mut out = self.get(key).to_string();
        for (name, value) in fields {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_cover_all_required_keys() {
        let prompts = Prompts::defaults();
        for (key, _) in REQUIRED_KEYS {
            assert!(!prompts.get(key).is_empty(), "missing default for {key}");
        }
    }

    #[test]
    fn render_substitutes_named_fields() {
        let prompts = Prompts::defaults();
        let out = prompts.render("item_added", &[("qty", "2"), ("name", "Pizza Margherita")]);
        assert_eq!(out, "Genoteerd: 2× Pizza Margherita.");
    }

    #[test]
    fn missing_json_falls_back_to_defaults() {
        let prompts = Prompts::load_from_str("not json");
        assert_eq!(prompts.get("ask_items"), "Wat wilt u bestellen?");
    }
}
