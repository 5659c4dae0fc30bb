//! XML parsing and output for the bundled engine.
//!
//! The parser turns text into a [`crate::Document`]; the printer writes any
//! node back out as XML.

mod parser;
mod printer;

pub use parser::{ParserOptions, XmlParser};
pub use printer::{print_to_string, print_to_string_pretty, XmlPrinter, XmlPrinterOptions};
