//! The `KEY:VALUE` block in front of the SGML body.
//!
//!   OFXHEADER:100
//!   DATA:OFXSGML
//!   VERSION:102
//!   SECURITY:NONE

use serde::{Serialize, Serializer};

/// Header fields in document order. `NONE` values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Option<String>)>,
}

impl Headers {
    fn insert(&mut self, key: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// `None` if the header is missing, `Some(None)` if it was `NONE`.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn version(&self) -> Option<&str> {
        self.value("VERSION")
    }

    pub fn encoding(&self) -> Option<&str> {
        self.value("ENCODING")
    }

    pub fn charset(&self) -> Option<&str> {
        self.value("CHARSET")
    }
}

/// Serializes as a map in document order, `NONE` as `null`.
impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Parse a header block.
///
/// Some banks terminate lines with a bare `\r`; those become `\n` first.
/// Lines without a `:` are skipped. Returns `None` when no line parsed at all.
pub fn parse_headers(text: &str) -> Option<Headers> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut headers = Headers::default();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim_end();
        let value = (value != "NONE").then(|| value.to_string());
        headers.insert(key.to_string(), value);
    }

    if headers.is_empty() {
        tracing::debug!("no headers found");
        return None;
    }
    tracing::debug!(count = headers.len(), "parsed headers");
    Some(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "OFXHEADER:100\r\nDATA:OFXSGML\r\nVERSION:102\r\nSECURITY:NONE\r\nENCODING:USASCII\r\nCHARSET:1252\r\nCOMPRESSION:NONE\r\nOLDFILEUID:NONE\r\nNEWFILEUID:NONE\r\n";

    #[test]
    fn test_parses_crlf_headers_in_order() {
        let headers = parse_headers(SAMPLE).unwrap();
        assert_eq!(headers.len(), 9);
        let keys: Vec<_> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(keys[0], "OFXHEADER");
        assert_eq!(keys[8], "NEWFILEUID");
        assert_eq!(headers.version(), Some("102"));
        assert_eq!(headers.charset(), Some("1252"));
    }

    #[test]
    fn test_none_is_absent() {
        let headers = parse_headers(SAMPLE).unwrap();
        assert_eq!(headers.get("SECURITY"), Some(None));
        assert_eq!(headers.value("SECURITY"), None);
        assert_eq!(headers.get("MISSING"), None);
        assert!(headers.iter().all(|(_, v)| v != Some("NONE")));
    }

    #[test]
    fn test_bare_carriage_returns() {
        let headers = parse_headers("OFXHEADER:100\rDATA:OFXSGML\rVERSION:102\r").unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers.value("DATA"), Some("OFXSGML"));
        assert_eq!(headers.version(), Some("102"));
    }

    #[test]
    fn test_consecutive_bare_carriage_returns() {
        let headers = parse_headers("A:1\r\rB:2\r").unwrap();
        assert_eq!(headers.value("A"), Some("1"));
        assert_eq!(headers.value("B"), Some("2"));
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let headers = parse_headers("garbage line\nVERSION:102\n:orphan\n\n").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.version(), Some("102"));
    }

    #[test]
    fn test_value_keeps_everything_after_first_colon() {
        let headers = parse_headers("NEWFILEUID:abc:def  \n").unwrap();
        assert_eq!(headers.value("NEWFILEUID"), Some("abc:def"));
    }

    #[test]
    fn test_only_exact_none_is_absent() {
        let headers = parse_headers("A:none\nB: NONE\n").unwrap();
        assert_eq!(headers.value("A"), Some("none"));
        assert_eq!(headers.value("B"), Some(" NONE"));
    }

    #[test]
    fn test_repeated_key_keeps_position_takes_last_value() {
        let headers = parse_headers("A:1\nB:2\nA:3\n").unwrap();
        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(entries, vec![("A", Some("3")), ("B", Some("2"))]);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let headers = parse_headers("VERSION:102\nSECURITY:NONE\n").unwrap();
        assert_eq!(
            serde_json::to_string(&headers).unwrap(),
            r#"{"VERSION":"102","SECURITY":null}"#
        );
    }

    #[test]
    fn test_no_headers_is_none() {
        assert_eq!(parse_headers(""), None);
        assert_eq!(parse_headers("\r\n\r\n"), None);
        assert_eq!(parse_headers("no colons here"), None);
    }
}
