//! Script metadata: direction, OpenType tags, distance-shaper scripts

// this_file: crates/feagen-unicode/src/scripts.rs

use feagen_core::types::{Direction, NEUTRAL_SCRIPT};

/// Script codes that fold into the neutral bucket
pub const NEUTRAL_SCRIPTS: [&str; 3] = ["Zyyy", "Zinh", "Zzzz"];

/// Scripts written right to left
pub const RTL_SCRIPTS: &[&str] = &[
    "Adlm", "Arab", "Armi", "Avst", "Chrs", "Cprt", "Elym", "Hatr", "Hebr", "Hung", "Khar",
    "Lydi", "Mand", "Mani", "Mend", "Merc", "Mero", "Narb", "Nbat", "Nkoo", "Orkh", "Ougr",
    "Palm", "Phli", "Phlp", "Phnx", "Prti", "Rohg", "Samr", "Sarb", "Sogd", "Sogo", "Syrc",
    "Thaa", "Yezi",
];

/// Scripts whose shapers (Indic, Khmer, Myanmar, USE) apply `dist`
/// instead of `kern`
pub const DIST_ENABLED_SCRIPTS: &[&str] = &[
    // Indic
    "Beng", "Deva", "Gujr", "Guru", "Knda", "Mlym", "Orya", "Taml", "Telu", "Sinh",
    // Khmer, Myanmar
    "Khmr", "Mymr",
    // Universal Shaping Engine
    "Buhd", "Hano", "Tglg", "Tagb", "Limb", "Tale", "Bugi", "Khar", "Sylo", "Tfng", "Bali",
    "Cham", "Kali", "Lepc", "Rjng", "Saur", "Sund", "Egyp", "Java", "Kthi", "Mtei", "Lana",
    "Tavt", "Batk", "Brah", "Cakm", "Shrd", "Takr", "Dupl", "Gran", "Khoj", "Sind", "Mahj",
    "Modi", "Hmng", "Sidd", "Tirh", "Ahom", "Mult", "Bhks", "Marc", "Newa", "Gonm", "Soyo",
    "Zanb", "Dogr", "Gong", "Maka",
];

/// Scripts with both new-style and old-style OpenType tags, newest first
const NEW_SCRIPT_TAGS: &[(&str, &[&str])] = &[
    ("Beng", &["bng2"]),
    ("Deva", &["dev2"]),
    ("Gujr", &["gjr2"]),
    ("Guru", &["gur2"]),
    ("Knda", &["knd2"]),
    ("Mlym", &["mlm2"]),
    ("Mymr", &["mym2"]),
    ("Orya", &["ory2"]),
    ("Taml", &["tml2"]),
    ("Telu", &["tel2"]),
];

/// Scripts whose tag is not the lowercased code
const SCRIPT_EXCEPTIONS: &[(&str, &str)] = &[
    ("Hira", "kana"),
    ("Hrkt", "kana"),
    ("Laoo", "lao"),
    ("Nkoo", "nko"),
    ("Vaii", "vai"),
    ("Yiii", "yi"),
    ("Zmth", "math"),
];

pub fn is_neutral(script: &str) -> bool {
    NEUTRAL_SCRIPTS.contains(&script)
}

pub fn is_dist_enabled(script: &str) -> bool {
    DIST_ENABLED_SCRIPTS.contains(&script)
}

/// Horizontal direction of a script; `None` for the neutral scripts
pub fn script_direction(script: &str) -> Option<Direction> {
    if is_neutral(script) {
        None
    } else if RTL_SCRIPTS.contains(&script) {
        Some(Direction::RightToLeft)
    } else {
        Some(Direction::LeftToRight)
    }
}

/// OpenType script tags for an ISO 15924 code, preferred tag first
///
/// Tags are returned without trailing padding (`lao`, not `lao `).
pub fn ot_tags_from_script(script: &str) -> Vec<String> {
    if is_neutral(script) {
        return vec!["DFLT".to_string()];
    }
    if let Some((_, tag)) = SCRIPT_EXCEPTIONS.iter().find(|(s, _)| *s == script) {
        return vec![(*tag).to_string()];
    }
    let mut tags: Vec<String> = NEW_SCRIPT_TAGS
        .iter()
        .find(|(s, _)| *s == script)
        .map(|(_, new)| new.iter().map(|t| (*t).to_string()).collect())
        .unwrap_or_default();
    tags.push(script.to_ascii_lowercase());
    tags
}

/// ISO 15924 code for an OpenType script tag
pub fn ot_tag_to_script(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag == "DFLT" {
        return Some(NEUTRAL_SCRIPT.to_string());
    }
    if tag == "kana" {
        return Some("Kana".to_string());
    }
    if let Some((script, _)) = SCRIPT_EXCEPTIONS
        .iter()
        .find(|(s, t)| *t == tag && *s != "Hira" && *s != "Hrkt")
    {
        return Some((*script).to_string());
    }
    if let Some((script, _)) = NEW_SCRIPT_TAGS.iter().find(|(_, tags)| tags.contains(&tag)) {
        return Some((*script).to_string());
    }
    if tag.len() != 4 || !tag.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut chars = tag.chars();
    chars
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions() {
        assert_eq!(script_direction("Arab"), Some(Direction::RightToLeft));
        assert_eq!(script_direction("Latn"), Some(Direction::LeftToRight));
        assert_eq!(script_direction("Zyyy"), None);
        assert_eq!(script_direction("Zinh"), None);
    }

    #[test]
    fn test_ot_tags() {
        assert_eq!(ot_tags_from_script("Latn"), vec!["latn"]);
        assert_eq!(ot_tags_from_script("Deva"), vec!["dev2", "deva"]);
        assert_eq!(ot_tags_from_script("Zyyy"), vec!["DFLT"]);
        assert_eq!(ot_tags_from_script("Hira"), vec!["kana"]);
        assert_eq!(ot_tags_from_script("Laoo"), vec!["lao"]);
    }

    #[test]
    fn test_ot_tag_inverse() {
        assert_eq!(ot_tag_to_script("latn").as_deref(), Some("Latn"));
        assert_eq!(ot_tag_to_script("dev2").as_deref(), Some("Deva"));
        assert_eq!(ot_tag_to_script("deva").as_deref(), Some("Deva"));
        assert_eq!(ot_tag_to_script("DFLT").as_deref(), Some("Zyyy"));
        assert_eq!(ot_tag_to_script("kana").as_deref(), Some("Kana"));
        assert_eq!(ot_tag_to_script("lao ").as_deref(), Some("Laoo"));
        assert_eq!(ot_tag_to_script("math").as_deref(), Some("Zmth"));
        assert_eq!(ot_tag_to_script("x1"), None);
    }

    #[test]
    fn test_dist_scripts() {
        assert!(is_dist_enabled("Deva"));
        assert!(is_dist_enabled("Khmr"));
        assert!(!is_dist_enabled("Latn"));
        assert!(!is_dist_enabled("Arab"));
    }
}
