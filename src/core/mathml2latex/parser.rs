//! MathML fragment parser
//!
//! Builds an [`Element`] tree from MathML source text using quick-xml's
//! streaming reader.

use super::element::Element;
use crate::data::maps::MATHML_ENTITIES;
use crate::utils::error::{ConversionError, ConversionResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse a MathML fragment into an element tree.
///
/// The fragment must contain exactly one root element; leading and trailing
/// whitespace, comments, XML declarations and processing instructions are
/// ignored.
pub fn parse_mathml(input: &str) -> ConversionResult<Element> {
    if input.trim().is_empty() {
        return Err(ConversionError::invalid("empty MathML fragment"));
    }

    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| parse_error_at(input, position, e.to_string()))?;

        match event {
            Event::Start(ref e) => {
                ensure_single_root(&root, input, position)?;
                stack.push(start_element(e)?);
            }
            Event::Empty(ref e) => {
                ensure_single_root(&root, input, position)?;
                let element = start_element(e)?;
                attach(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                // quick-xml already checked the end name against the open tag
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_error_at(input, position, "unexpected closing tag"))?;
                attach(element, &mut stack, &mut root);
            }
            Event::Text(ref t) => {
                let text = t
                    .decode()
                    .map_err(|e| parse_error_at(input, position, e.to_string()))?;
                push_text(&mut stack, &text, input, position)?;
            }
            Event::CData(ref c) => {
                let text = c
                    .decode()
                    .map_err(|e| parse_error_at(input, position, e.to_string()))?;
                push_text(&mut stack, &text, input, position)?;
            }
            Event::GeneralRef(ref r) => {
                let name = r
                    .decode()
                    .map_err(|e| parse_error_at(input, position, e.to_string()))?;
                let resolved = resolve_entity(&name);
                push_text(&mut stack, &resolved, input, position)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConversionError::parse(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| ConversionError::invalid("MathML fragment has no root element"))
}

fn start_element(e: &BytesStart) -> ConversionResult<Element> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut element = Element::new(&name);

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ConversionError::parse(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            // Unknown named entity: keep the raw value instead of failing
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        element.attributes.insert(key, value);
    }

    Ok(element)
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(
    stack: &mut [Element],
    text: &str,
    input: &str,
    position: usize,
) -> ConversionResult<()> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(parse_error_at(
            input,
            position,
            "text outside of the root element",
        )),
    }
}

fn ensure_single_root(
    root: &Option<Element>,
    input: &str,
    position: usize,
) -> ConversionResult<()> {
    if root.is_some() {
        Err(parse_error_at(
            input,
            position,
            "MathML fragment has more than one root element",
        ))
    } else {
        Ok(())
    }
}

/// Resolve an entity reference name (`lt`, `#x3C`, `InvisibleTimes`).
///
/// Unknown names are kept verbatim as `&name;`.
pub fn resolve_entity(name: &str) -> String {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => numeric.parse::<u32>().ok(),
        };
        if let Some(ch) = code.and_then(char::from_u32) {
            return ch.to_string();
        }
    } else if let Some(value) = MATHML_ENTITIES.get(name) {
        return (*value).to_string();
    }
    format!("&{};", name)
}

fn parse_error_at(input: &str, offset: usize, message: impl Into<String>) -> ConversionError {
    let offset = offset.min(input.len());
    let before = input.get(..offset).unwrap_or(input);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    ConversionError::parse_at(message, line, column)
}
