use serde::{Deserialize, Serialize};

pub const REST: &str = "~";

/// Instrument label attached to a rhythm gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    Kick,
    Snare,
    HiHat,
    Percussion,
    /// Synthesized by a mutation template
    Generated,
    Unknown,
}

impl Instrument {
    pub fn label(&self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::Snare => "snare",
            Instrument::HiHat => "hihat",
            Instrument::Percussion => "percussion",
            Instrument::Generated => "generated",
            Instrument::Unknown => "unknown",
        }
    }
}

pub fn is_rest(token: &str) -> bool {
    token == REST
}

/// Instrument class of a single hit token, `None` for rests
pub fn classify(token: &str) -> Option<Instrument> {
    if is_rest(token) {
        return None;
    }
    let lower = token.to_ascii_lowercase();
    let class = if lower.contains("bd") || lower.contains("kick") {
        Instrument::Kick
    } else if lower.contains("sd")
        || lower.contains("snare")
        || lower.contains("clap")
        || lower.contains("cp")
    {
        Instrument::Snare
    } else if lower.contains("hh")
        || lower.contains("hat")
        || lower.starts_with("ch")
        || lower.starts_with("oh")
    {
        Instrument::HiHat
    } else if lower.contains("perc") {
        Instrument::Percussion
    } else {
        Instrument::Unknown
    };
    Some(class)
}

/// Label for a whole token run: the class of its first hit
pub fn identify_instrument(tokens: &[String]) -> Instrument {
    tokens
        .iter()
        .find_map(|token| classify(token))
        .unwrap_or(Instrument::Unknown)
}

/// Split mini-notation on whitespace, keeping bracket groups whole
pub fn tokenize(pattern: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in pattern.chars() {
        match ch {
            '[' | '<' | '{' | '(' => {
                depth += 1;
                current.push(ch);
            }
            ']' | '>' | '}' | ')' => {
                depth = (depth - 1).max(0);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Separate a token run into one voice per instrument class.
///
/// Positions owned by another instrument become rests, so the voices
/// stacked together play the same hits as the original run. A run with
/// a single class (or only rests) comes back as one voice, unchanged.
pub fn split_voices(tokens: &[String]) -> Vec<(Instrument, Vec<String>)> {
    let mut classes: Vec<Instrument> = Vec::new();
    for class in tokens.iter().filter_map(|token| classify(token)) {
        if !classes.contains(&class) {
            classes.push(class);
        }
    }

    if classes.len() <= 1 {
        return vec![(identify_instrument(tokens), tokens.to_vec())];
    }

    classes
        .into_iter()
        .map(|class| {
            let voice = tokens
                .iter()
                .map(|token| {
                    if classify(token) == Some(class) {
                        token.clone()
                    } else {
                        REST.to_string()
                    }
                })
                .collect();
            (class, voice)
        })
        .collect()
}
