//! Element and attribute names of the catalog document.

/// Root element emitted by the exporter.
pub const ROOT_ELEMENT: &str = "catalog";
/// Element wrapping a single record.
pub const BOOK_ELEMENT: &str = "book";
/// Attribute carrying the record identifier.
pub const ID_ATTRIBUTE: &str = "id";
/// Child elements of a book, in the order they are written.
pub const FIELD_ELEMENTS: [&str; 6] = [
    "author",
    "title",
    "genre",
    "price",
    "publish_date",
    "description",
];
