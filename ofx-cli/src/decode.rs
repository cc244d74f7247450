//! OFX 1.0.2 files are usually `CHARSET:1252`; newer exports are UTF-8.

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            tracing::debug!("input is not UTF-8, decoding as windows-1252");
            WINDOWS_1252.decode(bytes).0
        }
    }
}

pub fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(decode(&bytes).into_owned())
}
