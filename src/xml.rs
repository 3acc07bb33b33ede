pub mod c14n;
mod element;
mod error;
mod parse;

pub use element::{Element, NamespaceBindings};
pub use error::Error;
pub use parse::parse_document;

pub type Result<T> = error::Result<T>;

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Serializes an element tree to an undecorated UTF-8 XML string with the
/// standard prologue.
///
/// This is the output surface, not the canonical form: attributes keep
/// insertion order and namespace declarations are written where first
/// needed, with the ambient bindings declared on the root so a verifier
/// re-canonicalizing the document sees the same namespace context the
/// signature was computed under.
pub fn serialize_document(root: &Element, ambient: &NamespaceBindings) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_node(&mut writer, root, None, Some(ambient))?;
    let body = String::from_utf8(writer.into_inner().into_inner())?;
    Ok(format!("{XML_DECLARATION}{body}"))
}

fn write_node<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
    inherited_default: Option<&str>,
    ambient: Option<&NamespaceBindings>,
) -> Result<()> {
    let mut declarations: Vec<(String, String)> = Vec::new();
    let default_ns = match element.namespace() {
        Some(uri) => {
            if inherited_default != Some(uri) {
                declarations.push(("xmlns".to_string(), uri.to_string()));
            }
            Some(uri)
        }
        None => inherited_default,
    };
    if let Some(bindings) = ambient {
        for (prefix, uri) in bindings.iter() {
            if prefix.is_empty() {
                continue;
            }
            declarations.push((format!("xmlns:{prefix}"), uri.to_string()));
        }
    }

    let mut start = BytesStart::new(element.tag());
    for (name, value) in &declarations {
        start.push_attribute((name.as_str(), value.as_str()));
    }
    for (name, value) in element.attributes() {
        start.push_attribute((name, value));
    }
    writer.write_event(Event::Start(start))?;

    if element.children().is_empty() {
        if let Some(text) = element.text() {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
    } else {
        for child in element.children() {
            write_node(writer, child, default_ns, None)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(element.tag())))?;
    Ok(())
}
