//! XML parsing and output.
//!
//! The parser turns XML text into an [`XmlTree`](crate::node::XmlTree); the
//! printer turns any subtree back into indented XML text.

mod parser;
mod printer;

pub use parser::{parse_file, parse_str, XmlParser};
pub use printer::{print_to_string, print_to_string_pretty, XmlPrinter, XmlPrinterOptions};
