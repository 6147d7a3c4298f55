use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};

use crate::aideon::catalog::error::{CatalogError, Result};
use crate::aideon::catalog::io::encoding::decode_document;
use crate::aideon::catalog::io::xml::{BOOK_ELEMENT, FIELD_ELEMENTS, ID_ATTRIBUTE};
use crate::aideon::catalog::model::{Record, RecordTable, book_location, parse_price};

/// Reads a catalog document from disk. See [`parse_catalog`].
pub fn read_catalog(path: &Path) -> Result<RecordTable> {
    let bytes = fs::read(path)?;
    parse_catalog(&bytes)
}

/// Parses a catalog document into a [`RecordTable`].
///
/// Every direct `book` child of the root element becomes one record, in
/// document order. Other children of the root are ignored. Each book must
/// carry an `id` attribute and the `author`, `title`, `genre`, `price`,
/// `publish_date` and `description` child elements.
///
/// The input is decoded according to its BOM or XML declaration, line endings
/// are normalised to `\n`, and entities declared in an internal DTD subset are
/// expanded.
pub fn parse_catalog(bytes: &[u8]) -> Result<RecordTable> {
    let decoded = decode_document(bytes)?;
    let text = normalize_line_endings(&decoded);

    let mut reader = Reader::from_str(&text);
    reader.config_mut().expand_empty_elements = true;

    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut book: Option<BookBuilder> = None;
    let mut field: Option<FieldCapture> = None;
    let mut entities = EntityTable::default();

    loop {
        let event = reader.read_event().map_err(|err| {
            CatalogError::MalformedDocument(format!(
                "{err} at byte {}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(element) => {
                match depth {
                    0 if root_seen => {
                        return Err(CatalogError::MalformedDocument(
                            "document has more than one root element".into(),
                        ));
                    }
                    0 => root_seen = true,
                    1 if element.name().as_ref() == BOOK_ELEMENT.as_bytes() => {
                        book = Some(BookBuilder::start(&element, records.len() + 1, &entities)?);
                    }
                    2 => {
                        if let Some(builder) = book.as_ref() {
                            field = builder.capture_for(&element);
                        }
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 => {
                        if let (Some(builder), Some(capture)) = (book.as_mut(), field.take()) {
                            builder.values[capture.index] = Some(capture.text);
                        }
                    }
                    1 => {
                        if let Some(builder) = book.take() {
                            records.push(builder.finish()?);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(content) => {
                if depth == 3 {
                    if let Some(capture) = field.as_mut() {
                        let unescaped = content
                            .unescape_with(|name| entities.resolve(name))
                            .map_err(|err| {
                                CatalogError::MalformedDocument(format!(
                                    "{err} at byte {}",
                                    reader.buffer_position()
                                ))
                            })?;
                        capture.text.push_str(&unescaped);
                    }
                } else if depth == 0 && !content.iter().all(u8::is_ascii_whitespace) {
                    return Err(CatalogError::MalformedDocument(
                        "text found outside the root element".into(),
                    ));
                }
            }
            Event::CData(content) => {
                if depth == 3 {
                    if let Some(capture) = field.as_mut() {
                        capture.text.push_str(&String::from_utf8_lossy(&content));
                    }
                }
            }
            Event::DocType(doctype) => {
                entities = EntityTable::from_doctype(&String::from_utf8_lossy(&doctype));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(CatalogError::MalformedDocument(
            "document has no root element".into(),
        ));
    }
    if depth != 0 {
        return Err(CatalogError::MalformedDocument(
            "document ended before all elements were closed".into(),
        ));
    }

    Ok(RecordTable::from_records(records))
}

/// Text collected for one field element of the current book.
struct FieldCapture {
    index: usize,
    text: String,
}

/// Partially read `book` element. Values are only promoted into a [`Record`]
/// once every required part is present.
struct BookBuilder {
    position: usize,
    id: Option<String>,
    values: [Option<String>; 6],
}

impl BookBuilder {
    fn start(element: &BytesStart<'_>, position: usize, entities: &EntityTable) -> Result<Self> {
        let id = element
            .try_get_attribute(ID_ATTRIBUTE)
            .map_err(|err| CatalogError::MalformedDocument(err.to_string()))?
            .map(|attr| {
                attr.unescape_value_with(|name| entities.resolve(name))
                    .map(|value| value.into_owned())
                    .map_err(|err| CatalogError::MalformedDocument(err.to_string()))
            })
            .transpose()?;

        Ok(Self {
            position,
            id,
            values: Default::default(),
        })
    }

    /// Returns a capture when `element` is a field not seen yet in this book.
    fn capture_for(&self, element: &BytesStart<'_>) -> Option<FieldCapture> {
        let name = element.name();
        let index = FIELD_ELEMENTS
            .iter()
            .position(|field| field.as_bytes() == name.as_ref())?;
        if self.values[index].is_some() {
            return None;
        }
        Some(FieldCapture {
            index,
            text: String::new(),
        })
    }

    fn finish(self) -> Result<Record> {
        let location = book_location(self.position, self.id.as_deref());
        let id = self
            .id
            .ok_or_else(|| CatalogError::missing_field(ID_ATTRIBUTE, location.clone()))?;

        let [author, title, genre, price, publish_date, description] = self.values;
        let require = |value: Option<String>, name: &str| {
            value.ok_or_else(|| CatalogError::missing_field(name, location.clone()))
        };

        let author = require(author, FIELD_ELEMENTS[0])?;
        let title = require(title, FIELD_ELEMENTS[1])?;
        let genre = require(genre, FIELD_ELEMENTS[2])?;
        let price = require(price, FIELD_ELEMENTS[3])?;
        let publish_date = require(publish_date, FIELD_ELEMENTS[4])?;
        let description = require(description, FIELD_ELEMENTS[5])?;

        Ok(Record {
            id,
            author,
            title,
            genre,
            price: parse_price(&price, &location)?,
            publish_date,
            description: description.trim().to_string(),
        })
    }
}

/// Collapses `\r\n` and lone `\r` into `\n`, as XML processors must.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// General entities declared in the internal subset of a `DOCTYPE`.
///
/// Parameter entities and external (`SYSTEM`/`PUBLIC`) entities are skipped;
/// a reference to one of them is reported as an unrecognised entity.
#[derive(Debug, Default)]
struct EntityTable {
    values: HashMap<String, String>,
}

impl EntityTable {
    fn from_doctype(doctype: &str) -> Self {
        let mut table = Self::default();
        let mut rest = doctype;

        while let Some(start) = rest.find("<!ENTITY") {
            rest = rest[start + "<!ENTITY".len()..].trim_start();
            if rest.starts_with('%') {
                continue;
            }

            let name_end = rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            let definition = rest[name_end..].trim_start();
            rest = definition;

            let Some(quote) = definition.chars().next().filter(|c| *c == '"' || *c == '\'') else {
                continue;
            };
            let Some((raw, _)) = definition[1..].split_once(quote) else {
                break;
            };
            let value = unescape_with(raw, |name| table.resolve(name))
                .map(|value| value.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            table.values.entry(name.to_string()).or_insert(value);
            rest = &definition[1 + raw.len()..];
        }

        table
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        resolve_predefined_entity(name).or_else(|| self.values.get(name).map(String::as_str))
    }
}
