/// One review as read from the widget markup.
///
/// Every field is plain text; a field whose markup element is missing is
/// the empty string rather than an absent value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewRecord {
    pub id: String,
    pub author: String,
    pub date: String,
    /// Score attribute in listing mode, active-star count in carousel mode
    pub rating: String,
    pub title: String,
    pub body: String,
    pub product: String,
    pub image_url: String,
}

/// Named columns of a [`ReviewRecord`], in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Author,
    Date,
    Rating,
    Title,
    Body,
    Product,
    Image,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Id,
        Field::Author,
        Field::Date,
        Field::Rating,
        Field::Title,
        Field::Body,
        Field::Product,
        Field::Image,
    ];

    /// Column header used in the CSV export
    pub fn header(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Author => "Name",
            Field::Date => "Date",
            Field::Rating => "Rating",
            Field::Title => "Title",
            Field::Body => "Body",
            Field::Product => "Product",
            Field::Image => "Image",
        }
    }
}

impl ReviewRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Author => &self.author,
            Field::Date => &self.date,
            Field::Rating => &self.rating,
            Field::Title => &self.title,
            Field::Body => &self.body,
            Field::Product => &self.product,
            Field::Image => &self.image_url,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Id => &mut self.id,
            Field::Author => &mut self.author,
            Field::Date => &mut self.date,
            Field::Rating => &mut self.rating,
            Field::Title => &mut self.title,
            Field::Body => &mut self.body,
            Field::Product => &mut self.product,
            Field::Image => &mut self.image_url,
        }
    }
}
