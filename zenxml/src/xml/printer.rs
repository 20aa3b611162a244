//! XML printer that outputs node trees.
//!
//! Output carries no XML declaration. In pretty mode each element starts on
//! its own line indented by two spaces per level, except inside elements with
//! text content, which are written inline so no whitespace is added to their
//! text.

use std::fmt::{self, Write};

use crate::node::{NodeId, XmlContent, XmlElement, XmlTree};

/// Options for XML printing.
#[derive(Debug, Clone, Default)]
pub struct XmlPrinterOptions {
    /// Whether to pretty-print with indentation.
    pub pretty_print: bool,
}

/// Pending work of the printer: an element or leaf to write, or the end tag
/// of an element whose children are already queued.
enum Frame<'t> {
    Open {
        node: NodeId,
        indent: usize,
        pretty: bool,
        newline: bool,
    },
    Close {
        name: &'t str,
        indent: usize,
        pretty: bool,
    },
}

/// XML printer that writes a subtree to any [`fmt::Write`] sink.
pub struct XmlPrinter<'t, W: Write> {
    writer: W,
    tree: &'t XmlTree,
    options: XmlPrinterOptions,
}

impl<'t, W: Write> XmlPrinter<'t, W> {
    /// Creates a new compact XML printer.
    pub fn new(writer: W, tree: &'t XmlTree) -> Self {
        Self::with_options(writer, tree, XmlPrinterOptions::default())
    }

    /// Creates a new XML printer with the given options.
    pub fn with_options(writer: W, tree: &'t XmlTree, options: XmlPrinterOptions) -> Self {
        XmlPrinter {
            writer,
            tree,
            options,
        }
    }

    /// Prints the subtree rooted at `node`.
    ///
    /// Printing the document node prints each top-level node on its own line.
    pub fn print(&mut self, node: NodeId) -> fmt::Result {
        let tree = self.tree;
        let pretty = self.options.pretty_print;
        let mut stack: Vec<Frame<'t>> = match tree.content(node) {
            XmlContent::Document => tree
                .children(node)
                .iter()
                .enumerate()
                .rev()
                .map(|(i, &child)| Frame::Open {
                    node: child,
                    indent: 0,
                    pretty,
                    newline: i > 0 && pretty,
                })
                .collect(),
            _ => vec![Frame::Open {
                node,
                indent: 0,
                pretty,
                newline: false,
            }],
        };

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Open {
                    node,
                    indent,
                    pretty,
                    newline,
                } => {
                    if newline {
                        self.writer.write_char('\n')?;
                    }
                    match tree.content(node) {
                        XmlContent::Text(text) => {
                            write_escaped(&mut self.writer, text.text(), false)?
                        }
                        XmlContent::Comment(comment) => {
                            self.write_indent(indent, pretty)?;
                            write!(self.writer, "<!--{}-->", comment.text())?;
                        }
                        XmlContent::Element(element) => {
                            self.write_start_tag(element, indent, pretty)?;
                            let children = tree.children(node);
                            if children.is_empty() {
                                self.writer.write_str(" />")?;
                                continue;
                            }
                            self.writer.write_char('>')?;

                            // Text content disables indentation for the whole subtree
                            let nested_pretty = pretty && !tree.has_text(node);
                            stack.push(Frame::Close {
                                name: element.qname(),
                                indent,
                                pretty: nested_pretty,
                            });
                            stack.extend(children.iter().rev().map(|&child| Frame::Open {
                                node: child,
                                indent: indent + 1,
                                pretty: nested_pretty,
                                newline: nested_pretty,
                            }));
                        }
                        XmlContent::Document => {}
                    }
                }
                Frame::Close {
                    name,
                    indent,
                    pretty,
                } => {
                    if pretty {
                        self.writer.write_char('\n')?;
                        self.write_indent(indent, true)?;
                    }
                    write!(self.writer, "</{}>", name)?;
                }
            }
        }
        Ok(())
    }

    /// Consumes the printer and returns the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_start_tag(&mut self, element: &XmlElement, indent: usize, pretty: bool) -> fmt::Result {
        self.write_indent(indent, pretty)?;
        self.writer.write_char('<')?;
        self.writer.write_str(element.qname())?;
        for attr in element.attributes() {
            write!(self.writer, " {}=\"", attr.qname())?;
            write_escaped(&mut self.writer, attr.value(), true)?;
            self.writer.write_char('"')?;
        }
        Ok(())
    }

    fn write_indent(&mut self, level: usize, pretty: bool) -> fmt::Result {
        if pretty {
            for _ in 0..level {
                self.writer.write_str("  ")?;
            }
        }
        Ok(())
    }
}

/// Writes `s` with XML special characters replaced by entities.
///
/// Quotes are only escaped inside attribute values.
fn write_escaped<W: Write>(writer: &mut W, s: &str, attribute: bool) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => writer.write_str("&amp;")?,
            '<' => writer.write_str("&lt;")?,
            '>' => writer.write_str("&gt;")?,
            '"' if attribute => writer.write_str("&quot;")?,
            _ => writer.write_char(c)?,
        }
    }
    Ok(())
}

/// Prints a subtree to a compact string.
pub fn print_to_string(tree: &XmlTree, node: NodeId) -> String {
    let mut printer = XmlPrinter::new(String::new(), tree);
    // Writing into a String cannot fail
    let _ = printer.print(node);
    printer.into_inner()
}

/// Prints a subtree to a string with pretty printing.
pub fn print_to_string_pretty(tree: &XmlTree, node: NodeId) -> String {
    let options = XmlPrinterOptions { pretty_print: true };
    let mut printer = XmlPrinter::with_options(String::new(), tree, options);
    let _ = printer.print(node);
    printer.into_inner()
}
