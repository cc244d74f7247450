//! Whole-file entry point: split the header block from the SGML body.

use ofx_core::{OfxError, OfxResult};

use crate::header::Headers;

/// `VERSION` header values read with the 1.0.2 rules.
pub const SUPPORTED_VERSIONS: [&str; 3] = ["100", "102", "103"];

/// Split a raw document into `(header_text, body_text)` at the first `<OFX>`
/// (any case). The body keeps the `<OFX>` tag.
pub fn split_document(raw: &str) -> OfxResult<(&str, &str)> {
    let at = raw
        .to_ascii_uppercase()
        .find("<OFX>")
        .ok_or(OfxError::MissingBody)?;
    Ok(raw.split_at(at))
}

/// Reject documents that declare a version this reader doesn't speak.
/// Documents with no headers, or no `VERSION`, are let through.
pub(crate) fn check_version(headers: Option<&Headers>) -> OfxResult<()> {
    match headers.and_then(Headers::version) {
        Some(version) if !SUPPORTED_VERSIONS.contains(&version.trim()) => {
            Err(OfxError::UnsupportedVersion(version.to_string()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::parse_headers;

    #[test]
    fn test_split_keeps_ofx_tag_in_body() {
        let raw = "OFXHEADER:100\r\nVERSION:102\r\n\r\n<OFX><SIGNONMSGSRSV1></OFX>";
        let (header, body) = split_document(raw).unwrap();
        assert_eq!(header, "OFXHEADER:100\r\nVERSION:102\r\n\r\n");
        assert!(body.starts_with("<OFX>"));
    }

    #[test]
    fn test_split_is_case_insensitive() {
        let (header, body) = split_document("VERSION:102\n<ofx></ofx>").unwrap();
        assert_eq!(header, "VERSION:102\n");
        assert_eq!(body, "<ofx></ofx>");
    }

    #[test]
    fn test_split_without_body() {
        assert_eq!(split_document("OFXHEADER:100\n"), Err(OfxError::MissingBody));
    }

    #[test]
    fn test_version_gate() {
        let ok = parse_headers("VERSION:102\n");
        assert!(check_version(ok.as_ref()).is_ok());
        assert!(check_version(None).is_ok());

        let xml = parse_headers("VERSION:200\n");
        assert_eq!(
            check_version(xml.as_ref()),
            Err(OfxError::UnsupportedVersion("200".to_string()))
        );
    }
}
