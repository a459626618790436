use crate::domain::Field;

/// How one record field is read from a review element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// Rendered text of the first descendant matching `selector`
    Text { selector: String },
    /// Attribute of the review element itself (`selector: None`) or of its
    /// first matching descendant
    Attr {
        selector: Option<String>,
        attr: String,
    },
    /// Number of matching descendants; empty when there are none
    Count { selector: String },
    /// Attribute of the first matching descendant, resolved against the page URL
    Url { selector: String, attr: String },
    /// First rule that yields a non-empty value
    FirstOf(Vec<FieldRule>),
}

impl FieldRule {
    pub fn text(selector: &str) -> Self {
        FieldRule::Text {
            selector: selector.to_string(),
        }
    }

    pub fn own_attr(attr: &str) -> Self {
        FieldRule::Attr {
            selector: None,
            attr: attr.to_string(),
        }
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        FieldRule::Attr {
            selector: Some(selector.to_string()),
            attr: attr.to_string(),
        }
    }

    pub fn count(selector: &str) -> Self {
        FieldRule::Count {
            selector: selector.to_string(),
        }
    }

    pub fn url(selector: &str, attr: &str) -> Self {
        FieldRule::Url {
            selector: selector.to_string(),
            attr: attr.to_string(),
        }
    }
}

/// Post-processing applied to a field value after lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    None,
    /// Replace each line break with a single space
    CollapseNewlines,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub rule: FieldRule,
    pub transform: Transform,
}

/// Declarative description of where a widget variant keeps each field.
///
/// Listing and carousel markup differ only in their maps; the extractor,
/// dedup and export treat both identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    /// Selector for one review element
    pub item: String,
    pub fields: Vec<FieldSpec>,
}

impl FieldMap {
    pub fn new(item: &str) -> Self {
        Self {
            item: item.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, field: Field, rule: FieldRule) -> Self {
        let transform = match field {
            Field::Body => Transform::CollapseNewlines,
            _ => Transform::None,
        };
        self.fields.push(FieldSpec {
            field,
            rule,
            transform,
        });
        self
    }

    /// Full review listing (`.jdgm-rev`), paginated or infinite-scroll
    pub fn listing() -> Self {
        Self::new(".jdgm-rev")
            .with(Field::Id, FieldRule::own_attr("data-review-id"))
            .with(Field::Author, FieldRule::text(".jdgm-rev__author"))
            .with(Field::Date, FieldRule::text(".jdgm-rev__timestamp"))
            .with(
                Field::Rating,
                FieldRule::attr(".jdgm-rev__rating", "data-score"),
            )
            .with(Field::Title, FieldRule::text(".jdgm-rev__title"))
            .with(Field::Body, FieldRule::text(".jdgm-rev__body"))
            .with(
                Field::Product,
                FieldRule::FirstOf(vec![
                    FieldRule::own_attr("data-product-title"),
                    FieldRule::text(".jdgm-rev__prod-link"),
                ]),
            )
            .with(Field::Image, FieldRule::url(".jdgm-rev__pic-img", "src"))
    }

    /// Product-page carousel (`.jdgm-carousel-item`)
    pub fn carousel() -> Self {
        Self::new(".jdgm-carousel-item")
            .with(Field::Id, FieldRule::own_attr("data-review-id"))
            .with(
                Field::Author,
                FieldRule::text(".jdgm-carousel-item__reviewer-name"),
            )
            .with(
                Field::Date,
                FieldRule::attr(".jdgm-carousel-item__timestamp", "data-time"),
            )
            .with(Field::Rating, FieldRule::count(".jdgm-star.jdgm--on"))
            .with(
                Field::Title,
                FieldRule::text(".jdgm-carousel-item__review-title"),
            )
            .with(
                Field::Body,
                FieldRule::text(".jdgm-carousel-item__review-body"),
            )
            .with(
                Field::Product,
                FieldRule::text(".jdgm-carousel-item__product-title"),
            )
            .with(
                Field::Image,
                FieldRule::url(".jdgm-carousel-item__product-image", "src"),
            )
    }
}
