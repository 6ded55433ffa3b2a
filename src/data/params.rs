//! Display parameters read from the page address.
//!
//! Pairs are matched the way the node map page always matched them: every
//! run of `?`/`&` followed by `key=value` anywhere in the address, fragment
//! included. Values are taken verbatim; percent escapes and `+` are not
//! decoded.

use fxhash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

pub const STYLE_KEY: &str = "style";
pub const FOCUS_KEY: &str = "userid";
pub const ZOOM_KEY: &str = "zoom";

/// Marker presentation requested through `style`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapStyle {
    Plain,
    Cluster,
    /// Unrecognized value, rendered like `Plain`
    Other(String),
}

impl MapStyle {
    pub fn parse(value: &str) -> Self {
        match value {
            "plain" => Self::Plain,
            "cluster" => Self::Cluster,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayParams {
    pub style: Option<MapStyle>,
    /// Marker title to focus; `Some("")` when the key was given empty
    pub focus_id: Option<String>,
    pub zoom: Option<i32>,
}

impl DisplayParams {
    /// Parses an address; never fails
    pub fn from_address(address: &str) -> Self {
        Self::from_vars(&parse_query_vars(address))
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        Self {
            style: vars.get(STYLE_KEY).map(|v| MapStyle::parse(v)),
            focus_id: vars.get(FOCUS_KEY).cloned(),
            zoom: vars.get(ZOOM_KEY).and_then(|v| parse_leading_int(v)),
        }
    }

    pub fn wants_clustering(&self) -> bool {
        self.style.as_ref().is_some_and(MapStyle::is_cluster)
    }

    /// Focus id if one was given and is non-empty
    pub fn focus(&self) -> Option<&str> {
        self.focus_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Shorthand for [`DisplayParams::from_address`]
pub fn parse_display_params(address: &str) -> DisplayParams {
    DisplayParams::from_address(address)
}

fn is_separator(byte: u8) -> bool {
    byte == b'?' || byte == b'&'
}

/// Extracts every `key=value` pair introduced by `?` or `&`.
/// Later occurrences of a key replace earlier ones.
pub fn parse_query_vars(address: &str) -> HashMap<String, String> {
    let bytes = address.as_bytes();
    let mut vars = HashMap::default();
    let mut i = 0;

    while i < bytes.len() {
        if !is_separator(bytes[i]) {
            i += 1;
            continue;
        }

        let mut key_start = i;
        while key_start < bytes.len() && is_separator(bytes[key_start]) {
            key_start += 1;
        }

        // Keys run up to '=' or '&' and may contain '?'. A run like "??=v"
        // still yields the key "?" by giving back the last separator.
        let mut key_end = key_start;
        while key_end < bytes.len() && bytes[key_end] != b'=' && bytes[key_end] != b'&' {
            key_end += 1;
        }
        if key_end == key_start && key_start - 1 > i && bytes[key_start - 1] == b'?' {
            key_start -= 1;
        }

        if key_end > key_start && key_end < bytes.len() && bytes[key_end] == b'=' {
            let value_start = key_end + 1;
            let value_end = bytes[value_start..]
                .iter()
                .position(|&b| b == b'&')
                .map_or(bytes.len(), |offset| value_start + offset);

            vars.insert(
                address[key_start..key_end].to_string(),
                address[value_start..value_end].to_string(),
            );
            i = value_end;
        } else {
            i += 1;
        }
    }

    vars
}

/// Leading-integer parse: optional whitespace and sign followed by digits,
/// with a `0x`/`0X` prefix switching to hexadecimal. Anything after the
/// digits is ignored; no digits means no value.
pub fn parse_leading_int(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first().copied() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits = rest
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();
    if digits == 0 {
        return None;
    }

    let magnitude = i64::from_str_radix(&rest[..digits], radix).unwrap_or(i64::MAX);
    let signed = if negative { -magnitude } else { magnitude };
    Some(signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(address: &str) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = parse_query_vars(address).into_iter().collect();
        pairs.sort();
        pairs
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_basic_pairs() {
        assert_eq!(
            vars("http://host/map.html?style=cluster&userid=VA4ABC&zoom=12"),
            vec![
                pair("style", "cluster"),
                pair("userid", "VA4ABC"),
                pair("zoom", "12")
            ]
        );
    }

    #[test]
    fn test_last_occurrence_wins() {
        let params = parse_display_params("?userid=A&zoom=3&userid=B");
        assert_eq!(params.focus_id.as_deref(), Some("B"));
        assert_eq!(params.zoom, Some(3));
    }

    #[test]
    fn test_missing_and_empty_keys_differ() {
        let absent = parse_display_params("http://host/map.html");
        assert_eq!(absent, DisplayParams::default());

        let empty = parse_display_params("?userid=&style=");
        assert_eq!(empty.focus_id.as_deref(), Some(""));
        assert_eq!(empty.focus(), None);
        assert_eq!(empty.style, Some(MapStyle::Other(String::new())));
    }

    #[test]
    fn test_values_are_not_decoded() {
        let params = parse_display_params("?userid=VE4%20X+Y");
        assert_eq!(params.focus_id.as_deref(), Some("VE4%20X+Y"));
    }

    #[test]
    fn test_matcher_edge_cases() {
        // key without '=' is skipped, the next pair is still found
        assert_eq!(vars("?a&b=1"), vec![pair("b", "1")]);
        // empty key never matches
        assert_eq!(vars("?=1&c=2"), vec![pair("c", "2")]);
        // separators may repeat
        assert_eq!(vars("??&&a=1"), vec![pair("a", "1")]);
        // '?' may appear inside a key, '=' inside a value
        assert_eq!(vars("?a?b=x=y"), vec![pair("a?b", "x=y")]);
        // a lone '?' can itself be the key
        assert_eq!(vars("??=v"), vec![pair("?", "v")]);
        // the fragment stays in the value
        assert_eq!(vars("?userid=A#top"), vec![pair("userid", "A#top")]);
        // pairs without a leading separator are ignored
        assert!(vars("style=cluster").is_empty());
    }

    #[test]
    fn test_total_on_odd_input() {
        for address in ["", "?", "&", "?&=", "==&&??", "ünïcødé?ä=ö&", "?zoom=&zoom"] {
            let _ = parse_display_params(address);
        }
        assert_eq!(vars("ünïcødé?ä=ö&"), vec![pair("ä", "ö")]);
    }

    #[test]
    fn test_style_values() {
        assert_eq!(parse_display_params("?style=cluster").style, Some(MapStyle::Cluster));
        assert_eq!(parse_display_params("?style=plain").style, Some(MapStyle::Plain));
        assert!(parse_display_params("?style=cluster").wants_clustering());
        assert!(!parse_display_params("?style=Cluster").wants_clustering());
        assert!(!parse_display_params("").wants_clustering());
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(parse_leading_int("10"), Some(10));
        assert_eq!(parse_leading_int("  7x"), Some(7));
        assert_eq!(parse_leading_int("-4"), Some(-4));
        assert_eq!(parse_leading_int("+9"), Some(9));
        assert_eq!(parse_leading_int("12.9"), Some(12));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999"), Some(i32::MAX));
    }

    #[test]
    fn test_leading_int_hex_prefix() {
        assert_eq!(parse_leading_int("0x10"), Some(16));
        assert_eq!(parse_leading_int("0XfF"), Some(255));
        assert_eq!(parse_leading_int("-0x1g"), Some(-1));
        assert_eq!(parse_leading_int("0x"), None);
        assert_eq!(parse_leading_int("0xzz"), None);
        assert_eq!(parse_leading_int("010"), Some(10));
        assert_eq!(parse_display_params("?zoom=0x0c").zoom, Some(12));
    }

    #[test]
    fn test_unparseable_zoom_is_absent() {
        assert_eq!(parse_display_params("?zoom=close").zoom, None);
        assert_eq!(parse_display_params("?zoom=0").zoom, Some(0));
    }
}
