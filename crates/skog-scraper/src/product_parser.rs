//! Product extraction from listing fragments.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use skog_core::{Product, ProductMetadata};

use crate::error::ScraperError;
use crate::interpret::{
    interpret_discount, interpret_unit, interpret_validity, parse_price, Assessment, Volume,
};
use crate::layout::{FeedLayout, Field, IdentifierSource, ImageSource};
use crate::markup::{parse_markup, Attributes, MarkupHandler};
use crate::recorder::TextRecorder;
use crate::scope::ScopeWatcher;

static THUMBNAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)/small_image/135x/(.*)$").expect("valid thumbnail regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Init,
    Product,
    ProductImage,
    ProductBadge,
}

/// Raw fields of the product whose container is currently open.
#[derive(Debug, Default)]
struct ProductPrototype {
    identifier: Option<String>,
    name: Option<String>,
    image_uri: Option<String>,
    price: Option<u64>,
    was_price: Option<u64>,
    unit: Option<String>,
    discount: Option<String>,
    valid_from_to: Option<String>,
    assessment: Assessment,
}

/// Mutable state shared with scope and recorder callbacks.
struct ParseState {
    mode: Mode,
    prototype: ProductPrototype,
    now: DateTime<Utc>,
    emitted: Vec<(Product, ProductMetadata)>,
}

impl ParseState {
    fn set_field(&mut self, field: Field, text: String) -> Result<(), ScraperError> {
        let p = &mut self.prototype;
        match field {
            Field::Price => p.price = Some(parse_price(field.as_str(), &text)?),
            Field::WasPrice => p.was_price = Some(parse_price(field.as_str(), &text)?),
            Field::Name => p.name = Some(text),
            // Empty optional copy is treated as absent.
            _ if text.is_empty() => {}
            Field::Unit => p.unit = Some(text),
            Field::Discount => p.discount = Some(text),
            Field::Validity => p.valid_from_to = Some(text),
        }
        Ok(())
    }

    /// Finalizes the current prototype into a product, if it has a price.
    fn deliver_product(&mut self) {
        let ProductPrototype {
            identifier,
            name,
            image_uri,
            price,
            was_price,
            unit,
            discount,
            valid_from_to,
            mut assessment,
        } = std::mem::take(&mut self.prototype);

        let mut volume = Volume::default();
        if let Some(text) = &unit {
            if let Some(v) = assessment.recognize("unit", text, interpret_unit(text)) {
                volume = v;
            }
        }

        let Some(price) = price else {
            tracing::warn!(
                identifier = identifier.as_deref().unwrap_or_default(),
                product_name = name.as_deref().unwrap_or_default(),
                "price not set, dropping product"
            );
            return;
        };

        let orig_price = was_price.unwrap_or(price);
        let mut effective_price = price;
        let mut discount_amount = 1;
        if let Some(text) = &discount {
            if let Some(deal) =
                assessment.recognize("discount", text, interpret_discount(text, price))
            {
                effective_price = deal.price;
                discount_amount = deal.discount_amount;
            }
        }

        let mut valid_on = self.now;
        if let Some(text) = &valid_from_to {
            if let Some(start) =
                assessment.recognize("validity", text, interpret_validity(text, self.now))
            {
                valid_on = start;
            }
        }

        let product = Product {
            identifier: identifier.unwrap_or_default(),
            name: name.unwrap_or_default(),
            volume: volume.amount,
            volume_measure: volume.measure,
            orig_price,
            price: effective_price,
            discount_amount,
            valid_on,
        };
        let metadata = ProductMetadata {
            image_uri,
            retrieved_on: self.now,
            confidence: assessment.confidence,
            problems: assessment.problems,
        };
        self.emitted.push((product, metadata));
    }
}

/// Streaming state machine that turns one listing fragment into products.
///
/// Each product container opening in the fragment starts a fresh
/// prototype; when the container closes the prototype is finalized and
/// handed to `on_product` before the next event is processed. Nested
/// containers are not supported and are ignored.
///
/// "Now" is fixed at construction, so parsing the same fragment with two
/// parsers built with the same clock yields identical output.
pub struct ProductParser<F> {
    layout: &'static FeedLayout,
    state: ParseState,
    watcher: ScopeWatcher<ParseState>,
    recorder: Option<TextRecorder<ParseState>>,
    on_product: F,
}

impl<F> ProductParser<F>
where
    F: FnMut(Product, ProductMetadata),
{
    pub fn new(layout: &'static FeedLayout, now: DateTime<Utc>, on_product: F) -> Self {
        Self {
            layout,
            state: ParseState {
                mode: Mode::Init,
                prototype: ProductPrototype::default(),
                now,
                emitted: Vec::new(),
            },
            watcher: ScopeWatcher::new(),
            recorder: None,
            on_product,
        }
    }

    /// Feeds a complete fragment through the parser.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MalformedPrice`] or
    /// [`ScraperError::MalformedImageUri`] for structurally broken products.
    /// Products completed before the error have already been emitted.
    pub fn parse(&mut self, source: &str) -> Result<(), ScraperError> {
        parse_markup(source, self)
    }

    fn record(&mut self, field: Field) {
        if self.recorder.is_none() {
            self.recorder = Some(TextRecorder::new(move |state: &mut ParseState, text| {
                state.set_field(field, text)
            }));
        }
    }

    fn open_container(&mut self, attributes: &Attributes) {
        self.state.prototype = ProductPrototype::default();
        if let IdentifierSource::Container { attribute } = self.layout.identifier {
            let sku = attributes.get(attribute);
            if !sku.is_empty() {
                self.state.prototype.identifier = Some(sku.to_owned());
            }
        }

        self.state.mode = Mode::Product;
        self.watcher.add(|state: &mut ParseState| {
            state.mode = Mode::Init;
            state.deliver_product();
        });
    }

    fn enter(&mut self, mode: Mode) {
        self.state.mode = mode;
        self.watcher.add(|state: &mut ParseState| state.mode = Mode::Product);
    }

    fn open_in_product(&mut self, name: &str, attributes: &Attributes) {
        let layout = self.layout;

        if let IdentifierSource::Element { marker, attribute } = layout.identifier {
            if marker.matches(name, attributes) {
                self.state.prototype.identifier = Some(attributes.get(attribute).to_owned());
                return;
            }
        }
        if layout.image.matches(name, attributes) {
            self.enter(Mode::ProductImage);
            return;
        }
        if layout.badges.is_some_and(|m| m.matches(name, attributes)) {
            self.enter(Mode::ProductBadge);
            return;
        }
        if let Some(field) = layout.field_for(name, attributes) {
            self.record(field);
        }
    }

    fn image_uri(&self, attributes: &Attributes) -> Result<Option<String>, ScraperError> {
        let src = attributes.get("src");
        match self.layout.image_source {
            ImageSource::ThumbnailRewrite => {
                let caps = THUMBNAIL_RE
                    .captures(src)
                    .ok_or_else(|| ScraperError::MalformedImageUri {
                        uri: src.to_owned(),
                    })?;
                Ok(Some(format!("{}/image/{}", &caps[1], &caps[2])))
            }
            ImageSource::Attribute(name) => {
                let uri = match attributes.get(name) {
                    "" => src,
                    hd => hd,
                };
                Ok((!uri.is_empty()).then(|| uri.to_owned()))
            }
        }
    }

    fn flush(&mut self) {
        for (product, metadata) in self.state.emitted.drain(..) {
            (self.on_product)(product, metadata);
        }
    }
}

impl<F> MarkupHandler for ProductParser<F>
where
    F: FnMut(Product, ProductMetadata),
{
    fn on_tag_open(&mut self, name: &str, attributes: &Attributes) -> Result<(), ScraperError> {
        if let Some(recorder) = &mut self.recorder {
            recorder.start_element();
        }
        self.watcher.start_element();

        match self.state.mode {
            Mode::Init => {
                if self.layout.container.matches(name, attributes) {
                    self.open_container(attributes);
                }
            }
            Mode::Product => self.open_in_product(name, attributes),
            Mode::ProductImage => {
                if name == "img" && self.state.prototype.image_uri.is_none() {
                    self.state.prototype.image_uri = self.image_uri(attributes)?;
                }
            }
            Mode::ProductBadge => {
                let alt = attributes.get("alt").trim();
                if name == "img" && !alt.is_empty() && self.state.prototype.discount.is_none() {
                    self.state.prototype.discount = Some(alt.to_owned());
                }
            }
        }
        Ok(())
    }

    fn on_characters(&mut self, text: &str) -> Result<(), ScraperError> {
        if let Some(recorder) = &mut self.recorder {
            recorder.characters(text);
        }
        Ok(())
    }

    fn on_tag_close(&mut self) -> Result<(), ScraperError> {
        if let Some(recorder) = &mut self.recorder {
            if recorder.end_element(&mut self.state)? {
                self.recorder = None;
            }
        }
        self.watcher.end_element(&mut self.state);
        self.flush();
        Ok(())
    }
}

/// Parses `source` with a fresh parser and collects the emitted products.
///
/// # Errors
///
/// See [`ProductParser::parse`].
pub fn parse_products(
    layout: &'static FeedLayout,
    now: DateTime<Utc>,
    source: &str,
) -> Result<Vec<(Product, ProductMetadata)>, ScraperError> {
    let mut products = Vec::new();
    ProductParser::new(layout, now, |product, metadata| {
        products.push((product, metadata));
    })
    .parse(source)?;
    Ok(products)
}

#[cfg(test)]
#[path = "product_parser_test.rs"]
mod tests;
