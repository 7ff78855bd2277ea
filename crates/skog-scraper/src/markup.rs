//! Markup events over storefront HTML.
//!
//! [`parse_markup`] drives a [`MarkupHandler`] with tag-open, character and
//! tag-close events in document order. The source is parsed with the HTML5
//! tree builder from `scraper`, so implied end tags (`<p>`, `<li>`, `<td>`),
//! void elements, stray end tags and character references are resolved the
//! way a browser resolves them before any event is emitted. Every open is
//! matched by exactly one close.
//!
//! Element and attribute names are lower-cased before they reach the
//! handler. Comments, doctypes and processing instructions are skipped.

use scraper::{Html, Node};

use crate::error::ScraperError;

/// Attributes of one opening tag, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    /// Returns the value of attribute `name`, or `""` when it is absent.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map_or("", |(_, value)| value.as_str())
    }

    /// Returns `true` if the whitespace-separated `class` list contains `token`.
    #[must_use]
    pub fn has_class(&self, token: &str) -> bool {
        contains_token(self.get("class"), token)
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into().to_ascii_lowercase(), v.into()))
                .collect(),
        }
    }
}

/// Returns `true` if `list` (e.g. a `class` attribute value) contains
/// `token` as a whole whitespace-separated word.
#[must_use]
pub fn contains_token(list: &str, token: &str) -> bool {
    list.split_whitespace().any(|t| t == token)
}

/// Receiver of markup events.
///
/// Every callback may fail; the first error stops the parse and is
/// returned from [`parse_markup`].
pub trait MarkupHandler {
    fn on_tag_open(&mut self, name: &str, attributes: &Attributes) -> Result<(), ScraperError>;

    fn on_characters(&mut self, _text: &str) -> Result<(), ScraperError> {
        Ok(())
    }

    fn on_tag_close(&mut self) -> Result<(), ScraperError> {
        Ok(())
    }
}

/// Parses `source` as an HTML fragment and feeds the resulting events to
/// `handler`.
///
/// Full documents are accepted too; their `html`, `head` and `body` tags
/// are folded into the fragment.
///
/// # Errors
///
/// Returns the first error returned by `handler`.
pub fn parse_markup<H>(source: &str, handler: &mut H) -> Result<(), ScraperError>
where
    H: MarkupHandler + ?Sized,
{
    let fragment = Html::parse_fragment(source);

    // (node, entered): an entered element is closed when popped again.
    let mut pending: Vec<_> = fragment
        .root_element()
        .children()
        .map(|child| (child, false))
        .collect();
    pending.reverse();

    while let Some((node, entered)) = pending.pop() {
        if entered {
            handler.on_tag_close()?;
            continue;
        }
        match node.value() {
            Node::Element(element) => {
                let attributes: Attributes = element.attrs().collect();
                handler.on_tag_open(element.name(), &attributes)?;
                pending.push((node, true));
                let first_child = pending.len();
                pending.extend(node.children().map(|child| (child, false)));
                pending[first_child..].reverse();
            }
            Node::Text(text) => {
                if !text.is_empty() {
                    handler.on_characters(text)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}
