//! MathML element tree
//!
//! A read-only, owned tree built once per formula, either from a standalone
//! MathML fragment (see [`super::parser`]) or bridged from an HTML DOM.

use indexmap::IndexMap;
use phf::phf_map;

/// Recognised MathML tags.
///
/// Everything outside this set is `Other` and goes through best-effort
/// passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Math,
    Mstyle,
    Mrow,
    Mi,
    Mn,
    Mo,
    Msup,
    Msub,
    Msubsup,
    Mmultiscripts,
    Apply,
    Mfrac,
    Msqrt,
    Mroot,
    Mover,
    Munder,
    Munderover,
    Mfenced,
    Mtable,
    Mtr,
    Mtd,
    Mtext,
    Annotation,
    AnnotationXml,
    Other,
}

static TAGS: phf::Map<&'static str, Tag> = phf_map! {
    "math" => Tag::Math,
    "mstyle" => Tag::Mstyle,
    "mrow" => Tag::Mrow,
    "mi" => Tag::Mi,
    "mn" => Tag::Mn,
    "mo" => Tag::Mo,
    "msup" => Tag::Msup,
    "msub" => Tag::Msub,
    "msubsup" => Tag::Msubsup,
    "mmultiscripts" => Tag::Mmultiscripts,
    "apply" => Tag::Apply,
    "mfrac" => Tag::Mfrac,
    "msqrt" => Tag::Msqrt,
    "mroot" => Tag::Mroot,
    "mover" => Tag::Mover,
    "munder" => Tag::Munder,
    "munderover" => Tag::Munderover,
    "mfenced" => Tag::Mfenced,
    "mtable" => Tag::Mtable,
    "mtr" => Tag::Mtr,
    "mtd" => Tag::Mtd,
    "mtext" => Tag::Mtext,
    "annotation" => Tag::Annotation,
    "annotation-xml" => Tag::AnnotationXml,
};

impl Tag {
    /// Resolve a tag from an element name, ignoring any namespace prefix
    /// (`m:mfrac`) or Clark-notation namespace (`{uri}mfrac`).
    pub fn from_name(name: &str) -> Tag {
        TAGS.get(local_name(name)).copied().unwrap_or(Tag::Other)
    }
}

/// Strip namespace qualification from an element name.
pub fn local_name(name: &str) -> &str {
    let name = name.rsplit('}').next().unwrap_or(name);
    name.rsplit(':').next().unwrap_or(name)
}

/// A MathML element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Resolved tag
    pub tag: Tag,
    /// Namespace-stripped element name
    pub name: String,
    /// Attributes in document order
    pub attributes: IndexMap<String, String>,
    /// Concatenated direct text content (untrimmed)
    pub text: String,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        let name = local_name(name);
        Self {
            tag: Tag::from_name(name),
            name: name.to_string(),
            attributes: IndexMap::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child element at `index`
    pub fn child(&self, index: usize) -> Option<&Element> {
        self.children.get(index)
    }

    /// First direct child with the given tag
    pub fn find_child(&self, tag: Tag) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All direct children with the given tag
    pub fn children_with_tag(&self, tag: Tag) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First descendant (excluding self) with the given tag, in document order
    pub fn find_descendant(&self, tag: Tag) -> Option<&Element> {
        for child in &self.children {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(tag) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants (excluding self) with the given tag, in document order
    pub fn descendants(&self, tag: Tag) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(tag, &mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, tag: Tag, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.tag == tag {
                out.push(child);
            }
            child.collect_descendants(tag, out);
        }
    }

    /// Direct text with surrounding whitespace removed
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    /// Whether this is an `<mo>` whose text is exactly `glyph`
    pub fn is_operator(&self, glyph: &str) -> bool {
        self.tag == Tag::Mo && self.trimmed_text() == glyph
    }
}
