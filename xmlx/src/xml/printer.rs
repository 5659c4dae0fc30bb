//! XML printer that outputs node trees.

use std::io::Write;

use crate::node::{NodeRef, XmlContent, XmlElement};

/// Options for XML printing.
#[derive(Debug, Clone, Default)]
pub struct XmlPrinterOptions {
    /// Whether to pretty-print with indentation.
    pub pretty_print: bool,
}

/// XML printer that outputs node trees.
pub struct XmlPrinter<W: Write> {
    writer: W,
    options: XmlPrinterOptions,
    indent: usize,
    /// Stack of "has content" flags for each element level
    content_stack: Vec<bool>,
    /// Whether the innermost open element has content yet
    has_content: bool,
}

impl<W: Write> XmlPrinter<W> {
    /// Creates a new XML printer.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, XmlPrinterOptions::default())
    }

    /// Creates a new XML printer with the given options.
    pub fn with_options(writer: W, options: XmlPrinterOptions) -> Self {
        XmlPrinter {
            writer,
            options,
            indent: 0,
            content_stack: Vec::new(),
            has_content: true,
        }
    }

    /// Prints a node and its subtree.
    ///
    /// A document node is printed with an XML declaration; any other node
    /// is printed as a fragment.
    pub fn print(&mut self, node: &NodeRef) -> std::io::Result<()> {
        self.print_node(node)?;
        if !self.options.pretty_print {
            writeln!(self.writer)?;
        }
        self.writer.flush()
    }

    fn print_node(&mut self, node: &NodeRef) -> std::io::Result<()> {
        let borrowed = node.borrow();

        match borrowed.content() {
            XmlContent::Document => {
                self.print_line(r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
                for child in borrowed.children() {
                    self.print_node(child)?;
                }
            }
            XmlContent::Text(text) => self.characters(text.text())?,
            XmlContent::Comment(comment) => {
                self.close_start_tag()?;
                let line = format!("{}", comment);
                self.print_line(&line)?;
            }
            XmlContent::ProcessingInstruction(pi) => {
                self.close_start_tag()?;
                let line = format!("{}", pi);
                self.print_line(&line)?;
            }
            XmlContent::Element(element) => {
                self.start_element(element)?;
                for child in borrowed.children() {
                    self.print_node(child)?;
                }
                self.end_element(element.qname())?;
            }
        }

        Ok(())
    }

    fn start_element(&mut self, element: &XmlElement) -> std::io::Result<()> {
        self.close_start_tag()?;

        let mut tag = String::new();
        tag.push('<');
        tag.push_str(element.qname());

        // Sorted for deterministic output
        for name in element.sorted_attribute_names() {
            if let Some(value) = element.attribute(name) {
                tag.push(' ');
                tag.push_str(name);
                tag.push_str("=\"");
                tag.push_str(&to_entities(&value.as_text()));
                tag.push('"');
            }
        }

        write!(self.writer, "{}{}", self.indent_str(), tag)?;

        self.content_stack.push(self.has_content);
        self.has_content = false;
        self.indent += 1;

        Ok(())
    }

    fn end_element(&mut self, qname: &str) -> std::io::Result<()> {
        self.indent -= 1;

        if !self.has_content {
            self.print_line(" />")?;
        } else {
            let close_tag = format!("{}</{}>", self.indent_str(), qname);
            self.print_line(&close_tag)?;
        }

        self.has_content = self.content_stack.pop().unwrap_or(true);
        Ok(())
    }

    fn characters(&mut self, text: &str) -> std::io::Result<()> {
        self.close_start_tag()?;
        if text.is_empty() {
            return Ok(());
        }
        let line = format!("{}{}", self.indent_str(), to_entities(text));
        self.print_line(&line)
    }

    /// Finishes a pending `<tag ...` with `>` once it turns out to have content.
    fn close_start_tag(&mut self) -> std::io::Result<()> {
        if !self.has_content {
            self.print_line(">")?;
            self.has_content = true;
        }
        Ok(())
    }

    fn print_line(&mut self, s: &str) -> std::io::Result<()> {
        if self.options.pretty_print {
            writeln!(self.writer, "{}", s)
        } else {
            write!(self.writer, "{}", s)
        }
    }

    fn indent_str(&self) -> String {
        if self.options.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }
}

/// Converts special characters to XML entities.
fn to_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\'' => result.push_str("&apos;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Prints a node tree to a string.
pub fn print_to_string(node: &NodeRef) -> std::io::Result<String> {
    let mut output = Vec::new();
    XmlPrinter::new(&mut output).print(node)?;
    let xml = String::from_utf8_lossy(&output);
    Ok(xml.strip_suffix('\n').unwrap_or(&xml).to_string())
}

/// Prints a node tree to a string with pretty printing.
pub fn print_to_string_pretty(node: &NodeRef) -> std::io::Result<String> {
    let mut output = Vec::new();
    let options = XmlPrinterOptions { pretty_print: true };
    XmlPrinter::with_options(&mut output, options).print(node)?;
    Ok(String::from_utf8_lossy(&output).to_string())
}
