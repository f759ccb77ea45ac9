//! DOM traversal for the document converter
//!
//! Two passes over the `RcDom`: [`FormulaScan`] finds every `<math>` element
//! and the region it replaces, then [`TextCollector`] extracts the document
//! text, splicing a `$$` block in place of each region.

use super::{formula_block, H2MOptions};
use crate::core::mathml2latex::{convert_element_to_latex, ConversionWarning, Element};
use html5ever::Attribute;
use markup5ever_rcdom::{Handle, Node, NodeData};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Elements whose text never reaches the output
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "template"];

/// Region node (by address) -> the `<math>` element that replaces it
pub(super) type Regions = HashMap<*const Node, Handle>;

/// Locates `<math>` elements and their replacement regions.
pub(super) struct FormulaScan<'a> {
    options: &'a H2MOptions,
    ancestors: Vec<Handle>,
    pub regions: Regions,
    pub found: usize,
}

impl<'a> FormulaScan<'a> {
    pub fn new(options: &'a H2MOptions) -> Self {
        Self {
            options,
            ancestors: Vec::new(),
            regions: HashMap::new(),
            found: 0,
        }
    }

    pub fn scan(&mut self, handle: &Handle) {
        if element_name(handle) == Some("math") {
            self.found += 1;
            let region = self
                .ancestors
                .iter()
                .rev()
                .find(|ancestor| self.is_wrapper(ancestor))
                .cloned()
                .unwrap_or_else(|| handle.clone());
            // The first formula in document order claims a shared region
            self.regions
                .entry(Rc::as_ptr(&region))
                .or_insert_with(|| handle.clone());
        }

        self.ancestors.push(handle.clone());
        for child in handle.children.borrow().iter() {
            self.scan(child);
        }
        self.ancestors.pop();
    }

    fn is_wrapper(&self, handle: &Handle) -> bool {
        match &handle.data {
            NodeData::Element { name, attrs, .. } => {
                name.local.as_ref() == self.options.wrapper_tag
                    && has_class(attrs, &self.options.formula_class)
            }
            _ => false,
        }
    }
}

/// Extracts document text with formula regions replaced by `$$` blocks.
pub(super) struct TextCollector<'a> {
    options: &'a H2MOptions,
    regions: &'a Regions,
    pub pieces: Vec<String>,
    pub warnings: Vec<ConversionWarning>,
    pub formulas: usize,
}

impl<'a> TextCollector<'a> {
    pub fn new(options: &'a H2MOptions, regions: &'a Regions) -> Self {
        Self {
            options,
            regions,
            pieces: Vec::new(),
            warnings: Vec::new(),
            formulas: 0,
        }
    }

    /// Walk the subtree; a region is replaced as a whole, so formulas nested
    /// inside it are dropped with the rest of its content.
    pub fn collect(&mut self, handle: &Handle) {
        let regions = self.regions;
        if let Some(math) = regions.get(&Rc::as_ptr(handle)) {
            let block = self.convert_formula(math);
            self.pieces.push(block);
            return;
        }

        match &handle.data {
            NodeData::Document => self.collect_children(handle),
            NodeData::Element { name, .. } => {
                if SKIPPED_ELEMENTS.contains(&&*name.local) {
                    return;
                }
                self.collect_children(handle);
            }
            NodeData::Text { contents } => {
                self.pieces.push(contents.borrow().to_string());
            }
            _ => {}
        }
    }

    fn collect_children(&mut self, handle: &Handle) {
        for child in handle.children.borrow().iter() {
            self.collect(child);
        }
    }

    fn convert_formula(&mut self, math: &Handle) -> String {
        let latex = match bridge_element(math) {
            Some(element) => {
                let result = convert_element_to_latex(&element, &self.options.math);
                self.warnings.extend(result.warnings);
                result.latex
            }
            None => String::new(),
        };
        self.formulas += 1;
        formula_block(&latex)
    }
}

/// Copy a DOM element subtree into an owned [`Element`] tree.
///
/// Direct text children are concatenated into `text`; comments and other
/// node kinds are ignored.
pub(super) fn bridge_element(handle: &Handle) -> Option<Element> {
    let NodeData::Element { name, attrs, .. } = &handle.data else {
        return None;
    };

    let mut element = Element::new(name.local.as_ref());
    for attr in attrs.borrow().iter() {
        element
            .attributes
            .insert(attr.name.local.to_string(), attr.value.to_string());
    }

    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Element { .. } => {
                if let Some(el) = bridge_element(child) {
                    element.children.push(el);
                }
            }
            NodeData::Text { contents } => element.text.push_str(&contents.borrow()),
            _ => {}
        }
    }

    Some(element)
}

fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Whether the `class` attribute lists `class` among its tokens
fn has_class(attrs: &RefCell<Vec<Attribute>>, class: &str) -> bool {
    attrs
        .borrow()
        .iter()
        .find(|attr| attr.name.local.as_ref() == "class")
        .is_some_and(|attr| attr.value.split_whitespace().any(|c| c == class))
}
