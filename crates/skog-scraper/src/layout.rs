//! Feed layouts: which markup carries which product field.
//!
//! The retailer has served its listing fragments in two shapes over time.
//! Both are driven by the same [`ProductParser`](crate::ProductParser)
//! engine; a [`FeedLayout`] only says which elements to look at.

use crate::markup::Attributes;

/// Element selector: a class token, optionally narrowed by tag name and by
/// one exact attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub tag: Option<&'static str>,
    pub class: &'static str,
    pub attribute: Option<(&'static str, &'static str)>,
}

impl Marker {
    /// `.class`
    #[must_use]
    pub const fn class(class: &'static str) -> Self {
        Self {
            tag: None,
            class,
            attribute: None,
        }
    }

    /// `tag.class`
    #[must_use]
    pub const fn tagged(tag: &'static str, class: &'static str) -> Self {
        Self {
            tag: Some(tag),
            class,
            attribute: None,
        }
    }

    /// `tag[name=value].class`
    #[must_use]
    pub const fn with_attribute(self, name: &'static str, value: &'static str) -> Self {
        Self {
            attribute: Some((name, value)),
            ..self
        }
    }

    #[must_use]
    pub fn matches(&self, name: &str, attributes: &Attributes) -> bool {
        self.tag.is_none_or(|tag| tag == name)
            && attributes.has_class(self.class)
            && self
                .attribute
                .is_none_or(|(key, value)| attributes.get(key) == value)
    }
}

/// Where the product identifier lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierSource {
    /// An attribute of a dedicated element inside the container.
    Element {
        marker: Marker,
        attribute: &'static str,
    },
    /// An attribute of the container element itself.
    Container { attribute: &'static str },
}

/// How the full-size image URI is derived from an `img` inside the image
/// wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Rewrite the thumbnail path segment `/small_image/135x/` of `src`
    /// into `/image/`. A `src` without that segment is malformed.
    ThumbnailRewrite,
    /// Read the named attribute, falling back to `src` when it is empty.
    Attribute(&'static str),
}

/// Product field filled from the text content of a marked element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Price,
    WasPrice,
    Unit,
    Discount,
    Validity,
}

impl Field {
    /// Field name used in error messages and problem reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::WasPrice => "old-price",
            Field::Unit => "unit",
            Field::Discount => "discount",
            Field::Validity => "validity",
        }
    }
}

/// Binding table from markup to product fields for one feed variant.
#[derive(Debug, PartialEq, Eq)]
pub struct FeedLayout {
    pub name: &'static str,
    pub container: Marker,
    pub identifier: IdentifierSource,
    pub image: Marker,
    pub image_source: ImageSource,
    /// Wrapper whose `img` children carry promotion badges in `alt`.
    pub badges: Option<Marker>,
    /// Text fields, checked in order; the first matching marker wins.
    pub fields: &'static [(Marker, Field)],
}

/// Thumbnail grid served by the original storefront theme.
pub static CLASSIC: FeedLayout = FeedLayout {
    name: "classic",
    container: Marker::class("item-product"),
    identifier: IdentifierSource::Element {
        marker: Marker::tagged("input", "pid").with_attribute("name", "product"),
        attribute: "value",
    },
    image: Marker::class("thumb-img"),
    image_source: ImageSource::ThumbnailRewrite,
    badges: None,
    fields: &[
        (Marker::class("product-name"), Field::Name),
        (Marker::tagged("span", "price"), Field::Price),
        (Marker::tagged("span", "old-price"), Field::WasPrice),
        (Marker::tagged("span", "discount"), Field::Discount),
        (Marker::tagged("span", "caliber"), Field::Unit),
    ],
};

/// Product cards with SKU data attributes and image badges.
pub static BADGED: FeedLayout = FeedLayout {
    name: "badged",
    container: Marker::class("product-item"),
    identifier: IdentifierSource::Container {
        attribute: "data-sku",
    },
    image: Marker::class("product-image"),
    image_source: ImageSource::Attribute("data-src-hd"),
    badges: Some(Marker::class("product-badges")),
    fields: &[
        (Marker::class("product-title"), Field::Name),
        (Marker::tagged("span", "product-price"), Field::Price),
        (Marker::tagged("span", "product-was-price"), Field::WasPrice),
        (Marker::tagged("span", "product-discount"), Field::Discount),
        (Marker::tagged("span", "product-unit"), Field::Unit),
        (Marker::class("product-validity"), Field::Validity),
    ],
};

impl FeedLayout {
    /// Names accepted by [`by_name`](Self::by_name).
    pub const NAMES: &'static [&'static str] = &["classic", "badged"];

    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static FeedLayout> {
        match name {
            "classic" => Some(&CLASSIC),
            "badged" => Some(&BADGED),
            _ => None,
        }
    }

    /// Returns the text field bound to an element, if any.
    #[must_use]
    pub fn field_for(&self, name: &str, attributes: &Attributes) -> Option<Field> {
        self.fields
            .iter()
            .find(|(marker, _)| marker.matches(name, attributes))
            .map(|&(_, field)| field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn class_marker_matches_whole_tokens_only() {
        let marker = Marker::class("price");
        assert!(marker.matches("span", &attrs(&[("class", "big price")])));
        assert!(!marker.matches("span", &attrs(&[("class", "old-price")])));
        assert!(!marker.matches("span", &attrs(&[])));
    }

    #[test]
    fn tagged_marker_requires_tag_name() {
        let marker = Marker::tagged("span", "price");
        assert!(marker.matches("span", &attrs(&[("class", "price")])));
        assert!(!marker.matches("div", &attrs(&[("class", "price")])));
    }

    #[test]
    fn attribute_marker_requires_exact_value() {
        let marker = Marker::tagged("input", "pid").with_attribute("name", "product");
        assert!(marker.matches("input", &attrs(&[("name", "product"), ("class", "pid")])));
        assert!(!marker.matches("input", &attrs(&[("name", "qty"), ("class", "pid")])));
    }

    #[test]
    fn layouts_resolve_by_name() {
        assert_eq!(FeedLayout::by_name("classic"), Some(&CLASSIC));
        assert_eq!(FeedLayout::by_name("badged"), Some(&BADGED));
        assert_eq!(FeedLayout::by_name("Classic"), None);
        for name in FeedLayout::NAMES {
            assert!(FeedLayout::by_name(name).is_some(), "{name} should resolve");
        }
    }

    #[test]
    fn field_lookup_distinguishes_price_from_old_price() {
        let price = attrs(&[("class", "price")]);
        let old = attrs(&[("class", "old-price")]);
        assert_eq!(CLASSIC.field_for("span", &price), Some(Field::Price));
        assert_eq!(CLASSIC.field_for("span", &old), Some(Field::WasPrice));
        assert_eq!(CLASSIC.field_for("div", &price), None);
    }
}
