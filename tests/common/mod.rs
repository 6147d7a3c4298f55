#![allow(dead_code)]

use aideon_catalog::model::{Record, RecordTable};

/// Two-book catalog used across the test suites.
pub const TWO_BOOKS: &str = r#"<?xml version="1.0"?>
<catalog>
   <book id="1">
      <author>Gambardella, Matthew</author>
      <title>XML Developer's Guide</title>
      <genre>Computer</genre>
      <price>12.50</price>
      <publish_date>2000-10-01</publish_date>
      <description>
         An in-depth look at creating applications with XML.
      </description>
   </book>
   <book id="2">
      <author>Ralls, Kim</author>
      <title>Midnight Rain</title>
      <genre>Fantasy</genre>
      <price>8.00</price>
      <publish_date>2000-12-16</publish_date>
      <description>A former architect battles corporate zombies.</description>
   </book>
</catalog>
"#;

pub fn record(id: &str, price: f64) -> Record {
    Record {
        id: id.to_string(),
        author: format!("Author {id}"),
        title: format!("Title {id}"),
        genre: "Fiction".to_string(),
        price,
        publish_date: "2001-03-10".to_string(),
        description: format!("Description of book {id}."),
    }
}

pub fn sample_table() -> RecordTable {
    RecordTable::from_records(vec![record("bk101", 44.95), record("bk102", 5.0)])
}

/// Asserts field equality, comparing prices with a 1e-9 tolerance.
pub fn assert_tables_match(expected: &RecordTable, actual: &RecordTable) {
    assert_eq!(expected.len(), actual.len(), "record count differs");
    for (lhs, rhs) in expected.iter().zip(actual.iter()) {
        assert_eq!(lhs.id, rhs.id);
        assert_eq!(lhs.author, rhs.author);
        assert_eq!(lhs.title, rhs.title);
        assert_eq!(lhs.genre, rhs.genre);
        assert!(
            (lhs.price - rhs.price).abs() <= 1e-9,
            "price {} differs from {}",
            lhs.price,
            rhs.price
        );
        assert_eq!(lhs.publish_date, rhs.publish_date);
        assert_eq!(lhs.description, rhs.description);
    }
}
