//! Discovery of category pages and their listing ids.

use crate::error::ScraperError;
use crate::markup::{parse_markup, Attributes, MarkupHandler};

/// Emits the `href` of every top-level category link (`a.level-top`) in
/// document order. Links without a target are skipped.
pub struct CategoryParser<F> {
    on_category: F,
}

impl<F: FnMut(String)> CategoryParser<F> {
    pub fn new(on_category: F) -> Self {
        Self { on_category }
    }

    /// # Errors
    ///
    /// Propagates handler errors from [`parse_markup`].
    pub fn parse(&mut self, source: &str) -> Result<(), ScraperError> {
        parse_markup(source, self)
    }
}

impl<F: FnMut(String)> MarkupHandler for CategoryParser<F> {
    fn on_tag_open(&mut self, name: &str, attributes: &Attributes) -> Result<(), ScraperError> {
        if name == "a" && attributes.has_class("level-top") {
            let href = attributes.get("href").trim();
            if !href.is_empty() {
                (self.on_category)(href.to_owned());
            }
        }
        Ok(())
    }
}

/// Emits the value of the hidden `input#cat_id` field of a category page.
pub struct CategoryIdParser<F> {
    on_category_id: F,
}

impl<F: FnMut(String)> CategoryIdParser<F> {
    pub fn new(on_category_id: F) -> Self {
        Self { on_category_id }
    }

    /// # Errors
    ///
    /// Propagates handler errors from [`parse_markup`].
    pub fn parse(&mut self, source: &str) -> Result<(), ScraperError> {
        parse_markup(source, self)
    }
}

impl<F: FnMut(String)> MarkupHandler for CategoryIdParser<F> {
    fn on_tag_open(&mut self, name: &str, attributes: &Attributes) -> Result<(), ScraperError> {
        if name == "input" && attributes.get("id") == "cat_id" {
            let value = attributes.get("value").trim();
            if !value.is_empty() {
                (self.on_category_id)(value.to_owned());
            }
        }
        Ok(())
    }
}

/// Collects the category links of a storefront root page.
///
/// # Errors
///
/// Propagates errors from [`parse_markup`].
pub fn category_links(source: &str) -> Result<Vec<String>, ScraperError> {
    let mut links = Vec::new();
    CategoryParser::new(|href| links.push(href)).parse(source)?;
    Ok(links)
}

/// Collects the category ids of a category page.
///
/// # Errors
///
/// Propagates errors from [`parse_markup`].
pub fn category_ids(source: &str) -> Result<Vec<String>, ScraperError> {
    let mut ids = Vec::new();
    CategoryIdParser::new(|id| ids.push(id)).parse(source)?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<nav><ul>
  <li><a class="level-top" href="http://derks.spar.nl/zuivel">Zuivel</a></li>
  <li><a class="level-top active" href="/brood"><span>Brood</span></a></li>
  <li><a class="level-top" href="">Leeg</a></li>
  <li><a class="level-sub" href="/zuivel/melk">Melk</a></li>
  <li><div class="level-top" href="/niet-een-link">x</div></li>
</ul></nav>
</body></html>"#;

    #[test]
    fn finds_top_level_links_in_document_order() {
        assert_eq!(
            category_links(ROOT_PAGE).unwrap(),
            vec!["http://derks.spar.nl/zuivel", "/brood"]
        );
    }

    #[test]
    fn page_without_categories_yields_nothing() {
        assert!(category_links("<html><body><p>Onderhoud</p></body></html>")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn conditional_comments_do_not_hide_links() {
        let page = r#"<html><body><![if !IE]><p>Welkom<![endif]>
<ul><li><a class="level-top" href="/zuivel">Zuivel</a><li><a class="level-top" href="/brood">Brood</a></ul>
</body></html>"#;
        assert_eq!(category_links(page).unwrap(), vec!["/zuivel", "/brood"]);
    }

    #[test]
    fn finds_hidden_category_id() {
        let page = r#"<form><input type="hidden" name="cat" id="cat_id" value="1234"><input id="other" value="9"></form>"#;
        assert_eq!(category_ids(page).unwrap(), vec!["1234"]);
    }

    #[test]
    fn empty_category_id_is_skipped() {
        let page = r#"<input type="hidden" id="cat_id" value="">"#;
        assert!(category_ids(page).unwrap().is_empty());
    }

    #[test]
    fn category_id_on_other_element_is_ignored() {
        let page = r#"<div id="cat_id" value="1234"></div>"#;
        assert!(category_ids(page).unwrap().is_empty());
    }
}
