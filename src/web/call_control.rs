//! Renders the small internal call-control XML vocabulary named in
//! spec.md §6: play-audio-from-URL, gather-speech-until-silence (`nl-NL`
//! plus a hints list), redirect-to-URL, dial-with-caller-id, hang-up. The
//! telephony provider's own dialect is deliberately out of scope; this is
//! the minimal shared vocabulary the provider adapter is specified against.

const ORDER_HINTS: &str = "ja,nee,pizza,pasta,schotel,afhalen,bezorgen,contant,pin,ideal,postcode";

pub enum Action {
    Play(String),
    Gather { action_url: String },
    Redirect(String),
    Dial { caller_id: String, number: String },
    Hangup,
}

pub struct CallControlDoc {
    actions: Vec<Action>,
}

impl CallControlDoc {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    pub fn play(mut self, url: String) -> Self {
        self.actions.push(Action::Play(url));
        self
    }

    pub fn gather(mut self, action_url: String) -> Self {
        self.actions.push(Action::Gather { action_url });
        self
    }

    pub fn redirect(mut self, url: String) -> Self {
        self.actions.push(Action::Redirect(url));
        self
    }

    pub fn dial(mut self, caller_id: String, number: String) -> Self {
        self.actions.push(Action::Dial { caller_id, number });
        self
    }

    pub fn hangup(mut self) -> Self {
        self.actions.push(Action::Hangup);
        self
    }

    pub fn render(&self) -> String {
        let mut body = String::new();
        for action in &self.actions {
            match action {
                Action::Play(url) => {
                    body.push_str(&format!("<Play>{}</Play>", xml_escape(url)));
                }
                Action::Gather { action_url } => {
                    body.push_str(&format!(
                        "<Gather input=\"speech\" language=\"nl-NL\" hints=\"{}\" action=\"{}\"/>",
                        xml_escape(ORDER_HINTS),
                        xml_escape(action_url)
                    ));
                }
                Action::Redirect(url) => {
                    body.push_str(&format!("<Redirect>{}</Redirect>", xml_escape(url)));
                }
                Action::Dial { caller_id, number } => {
                    body.push_str(&format!(
                        "<Dial callerId=\"{}\">{}</Dial>",
                        xml_escape(caller_id),
                        xml_escape(number)
                    ));
                }
                Action::Hangup => body.push_str("<Hangup/>"),
            }
        }
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>{body}</Response>")
    }
}

impl Default for CallControlDoc {
    fn default() -> Self {
        Self::new()
    }
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Points the provider at the internal TTS endpoint with the spoken text as
/// a URL parameter, per spec.md §4.9.
pub fn tts_url(public_base_url: &str, text: &str) -> String {
    format!("{public_base_url}/tts?text={}", urlencode(text))
}

fn urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
