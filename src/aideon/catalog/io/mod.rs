pub mod csv_io;
pub mod encoding;
pub mod excel_read;
pub mod excel_write;
pub mod xml;
pub mod xml_read;
pub mod xml_write;
