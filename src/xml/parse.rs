use std::str;

use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;

use super::element::{Element, NamespaceBindings};
use super::error::{Error, Result};

/// Reads a document back into an element tree plus the prefixed namespace
/// declarations it carries.
///
/// Elements are stored by local name with their resolved namespace URI;
/// prefixed declarations (`xmlns:p="uri"`) are collected into the returned
/// bindings so the tree can be re-canonicalized under the same ambient
/// context it was serialized with. Mixed element/text content is rejected.
pub fn parse_document(xml: &str) -> Result<(Element, NamespaceBindings)> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().expand_empty_elements = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut texts: Vec<String> = Vec::new();
    let mut bindings = NamespaceBindings::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_resolved_event()? {
            (resolve, Event::Start(start)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(Error::Malformed("multiple root elements".into()));
                }
                let local = str::from_utf8(start.local_name().into_inner())?.to_string();
                let mut element = match resolve {
                    ResolveResult::Bound(namespace) => {
                        let uri = str::from_utf8(namespace.0)?;
                        Element::with_namespace(local, uri)
                    }
                    ResolveResult::Unbound => Element::new(local),
                    ResolveResult::Unknown(prefix) => {
                        return Err(Error::Malformed(format!(
                            "undeclared namespace prefix {}",
                            String::from_utf8_lossy(&prefix)
                        )));
                    }
                };
                for attr in start.attributes() {
                    let attr = attr?;
                    let key = str::from_utf8(attr.key.as_ref())?;
                    let value = attr.unescape_value()?;
                    if key == "xmlns" {
                        // already applied by the namespace resolver
                        continue;
                    }
                    if let Some(prefix) = key.strip_prefix("xmlns:") {
                        bindings.insert(prefix, value.as_ref());
                        continue;
                    }
                    element.set_attribute(key, value.as_ref());
                }
                stack.push(element);
                texts.push(String::new());
            }
            (_, Event::End(_)) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| Error::Malformed("unbalanced end tag".into()))?;
                let text = texts.pop().unwrap_or_default();
                if element.children().is_empty() {
                    if !text.is_empty() {
                        element.set_text(text);
                    }
                } else if !text.trim().is_empty() {
                    return Err(Error::Malformed("mixed content is not supported".into()));
                }
                match stack.last_mut() {
                    Some(parent) => parent.append_child(element),
                    None => root = Some(element),
                }
            }
            (_, Event::Text(event)) => {
                if let Some(text) = texts.last_mut() {
                    text.push_str(event.decode().map_err(quick_xml::Error::from)?.as_ref());
                }
            }
            (_, Event::CData(event)) => {
                if let Some(text) = texts.last_mut() {
                    text.push_str(str::from_utf8(&event.into_inner())?);
                }
            }
            (_, Event::GeneralRef(event)) => {
                let name = str::from_utf8(&event)?.to_string();
                let ch = resolve_reference(&name)
                    .ok_or_else(|| Error::Malformed(format!("unresolved entity &{name};")))?;
                if let Some(text) = texts.last_mut() {
                    text.push(ch);
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    root.map(|element| (element, bindings))
        .ok_or_else(|| Error::Malformed("no root element".into()))
}

/// Predefined entity and numeric character references.
fn resolve_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::c14n::canonicalize;
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let (root, bindings) =
            parse_document(r#"<root attr="value"><child>text</child></root>"#).unwrap();

        assert_eq!(root.tag(), "root");
        assert_eq!(root.attribute("attr"), Some("value"));
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].text(), Some("text"));
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_parse_resolves_default_namespace() {
        let (root, bindings) = parse_document(
            r#"<Cancelacion xmlns="http://cancelacfd.sat.gob.mx" xmlns:xsd="http://www.w3.org/2001/XMLSchema"><Folios></Folios></Cancelacion>"#,
        )
        .unwrap();

        assert_eq!(root.namespace(), Some("http://cancelacfd.sat.gob.mx"));
        assert_eq!(
            root.children()[0].namespace(),
            Some("http://cancelacfd.sat.gob.mx")
        );
        assert_eq!(bindings.get("xsd"), Some("http://www.w3.org/2001/XMLSchema"));
    }

    #[test]
    fn test_parse_unescapes_references() {
        let (root, _) = parse_document("<node>a &amp; b &#x41;</node>").unwrap();
        assert_eq!(root.text(), Some("a & b A"));
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        let ambient = NamespaceBindings::new()
            .bind("xsd", "http://www.w3.org/2001/XMLSchema")
            .bind("xsi", "http://www.w3.org/2001/XMLSchema-instance");
        let mut root = Element::with_namespace("Cancelacion", "http://cancelacfd.sat.gob.mx");
        root.set_attribute("RfcEmisor", "LAN7008173R5");
        root.set_attribute("Fecha", "2019-04-05T16:29:17");
        let mut folios = Element::with_namespace("Folios", "http://cancelacfd.sat.gob.mx");
        let mut folio = Element::with_namespace("Folio", "http://cancelacfd.sat.gob.mx");
        folio.set_attribute("UUID", "E174F807-BEFA-4CF6-9B11-2A013B12F398");
        folio.set_attribute("Motivo", "02");
        folios.append_child(folio);
        root.append_child(folios);

        let first = canonicalize(&root, &ambient);
        let (reparsed, reparsed_bindings) = parse_document(&first).unwrap();
        let second = canonicalize(&reparsed, &reparsed_bindings);

        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(parse_document("").is_err());
    }
}
