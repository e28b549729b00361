// src/scan/dom.rs
// =============================================================================
// A small, typed view over a parsed HTML document.
//
// The extractors only need four things from a parser:
// - all elements with a given tag name
// - all elements carrying a given attribute
// - the text of an element (or of the whole document)
// - attribute lookup on an element
//
// Keeping them behind this wrapper means the rest of the scanner never
// touches `scraper` types beyond `ElementRef`.
// =============================================================================

use scraper::{ElementRef, Html, Node, Selector};

// Elements whose text content is not visible on a rendered page
const INVISIBLE_TAGS: &[&str] = &["script", "style"];

pub struct Document {
    html: Html,
}

impl Document {
    /// Parses markup permissively. Malformed HTML never fails, html5ever
    /// repairs it the same way a browser would.
    pub fn parse(markup: &str) -> Self {
        Document {
            html: Html::parse_document(markup),
        }
    }

    /// Every element in document order
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Elements matching a CSS selector, in document order.
    /// A selector that doesn't parse matches nothing.
    pub fn select(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(selector) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<ElementRef<'_>> {
        self.select(tag)
    }

    pub fn elements_with_attr(&self, attr: &str) -> Vec<ElementRef<'_>> {
        self.select(&format!("[{}]", attr))
    }

    /// Visible text fragments, each trimmed, empty ones dropped
    pub fn visible_text(&self) -> Vec<&str> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let parent_hidden = node
                    .parent()
                    .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                    .is_some_and(|name| INVISIBLE_TAGS.contains(&name));
                if parent_hidden {
                    return None;
                }
                let trimmed = text.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            })
            .collect()
    }
}

// Returns the element's text when it consists of one uninterrupted text node.
//
// An element with a single child element is looked through, so
// `<li><a>Docs</a></li>` yields "Docs" for both the <li> and the <a>.
// Anything with two or more children yields None.
pub fn sole_text(element: ElementRef<'_>) -> Option<&str> {
    let mut node = *element;
    loop {
        let mut children = node.children();
        let only = children.next()?;
        if children.next().is_some() {
            return None;
        }
        match only.value() {
            Node::Text(text) => return Some(&**text),
            Node::Element(_) => node = only,
            _ => return None,
        }
    }
}
