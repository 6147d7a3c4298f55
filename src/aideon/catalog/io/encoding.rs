//! Character encoding detection for catalog documents.
//!
//! Documents are decoded to UTF-8 before parsing. The encoding is taken from
//! the byte order mark, then from the byte pattern of a UTF-16 declaration,
//! then from the `encoding` pseudo-attribute of the XML declaration, and
//! defaults to UTF-8.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};

use crate::aideon::catalog::error::{CatalogError, Result};

/// Decodes a complete document into UTF-8 text.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, body) = detect_encoding(bytes)?;
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            CatalogError::MalformedDocument(format!(
                "input is not valid {} text",
                encoding.name()
            ))
        })
}

/// Returns the encoding of the document and the bytes following any BOM.
fn detect_encoding(bytes: &[u8]) -> Result<(&'static Encoding, &[u8])> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        return Ok((encoding, &bytes[bom_length..]));
    }

    match bytes {
        [b'<', 0, b'?', 0, ..] => return Ok((UTF_16LE, bytes)),
        [0, b'<', 0, b'?', ..] => return Ok((UTF_16BE, bytes)),
        _ => {}
    }

    match declared_label(bytes) {
        Some(label) => {
            let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                CatalogError::MalformedDocument(format!("unsupported encoding '{label}'"))
            })?;
            Ok((encoding, bytes))
        }
        None => Ok((UTF_8, bytes)),
    }
}

/// Reads the `encoding` value of a leading `<?xml ...?>` declaration.
fn declared_label(bytes: &[u8]) -> Option<String> {
    let rest = bytes.strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|pair| pair == b"?>")?;
    let declaration = std::str::from_utf8(&rest[..end]).ok()?;

    let (_, after_key) = declaration.split_once("encoding")?;
    let value = after_key.trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let (label, _) = value[1..].split_once(quote)?;
    Some(label.trim().to_string())
}
