use std::fs;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::aideon::catalog::error::{CatalogError, Result};
use crate::aideon::catalog::io::xml::{BOOK_ELEMENT, FIELD_ELEMENTS, ID_ATTRIBUTE, ROOT_ELEMENT};
use crate::aideon::catalog::model::{RecordTable, format_price};

/// Writes the catalog document for `table` to the given path.
pub fn write_catalog(path: &Path, table: &RecordTable) -> Result<()> {
    let bytes = serialize_catalog(table)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Serialises the table as a UTF-8 catalog document with an XML declaration.
pub fn serialize_catalog(table: &RecordTable) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    emit(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)))?;

    for record in table {
        let mut book = BytesStart::new(BOOK_ELEMENT);
        book.push_attribute((ID_ATTRIBUTE, record.id.as_str()));
        emit(&mut writer, Event::Start(book))?;

        let price = format_price(record.price);
        let values = [
            record.author.as_str(),
            record.title.as_str(),
            record.genre.as_str(),
            price.as_str(),
            record.publish_date.as_str(),
            record.description.as_str(),
        ];
        for (name, value) in FIELD_ELEMENTS.iter().zip(values) {
            emit(&mut writer, Event::Start(BytesStart::new(*name)))?;
            emit(&mut writer, Event::Text(BytesText::new(value)))?;
            emit(&mut writer, Event::End(BytesEnd::new(*name)))?;
        }

        emit(&mut writer, Event::End(BytesEnd::new(BOOK_ELEMENT)))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|err| CatalogError::Serialization(err.to_string()))
}
