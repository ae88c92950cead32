//! Shared record fixtures for tests

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::property::{FieldValue, Record, Schema, Searchable};
use crate::value::{CustomType, EnumType, Value, ValueType};

pub const GRADE: EnumType = EnumType::new("Grade", &["BAD", "GOOD"]);

static BOOK_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("Book")
        .value("id", ValueType::I64)
        .value("name", ValueType::String)
        .record("address", Address::schema)
        .values("tags", ValueType::String)
        .records("reviews", Review::schema)
        .value("published", ValueType::Date)
        .value("price", ValueType::F64)
        .value("isbn", ValueType::Custom(CustomType::of::<Isbn>("Isbn")))
        .build()
});

static ADDRESS_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("Address")
        .value("street", ValueType::String)
        .build()
});

static REVIEW_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("Review")
        .value("review", ValueType::Enum(GRADE))
        .values("authors", ValueType::String)
        .build()
});

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct Isbn(String);

impl FromStr for Isbn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '-') {
            Ok(Isbn(s.to_string()))
        } else {
            Err(format!("Not an ISBN: {}", s))
        }
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub address: Option<Address>,
    pub tags: Vec<String>,
    pub reviews: Vec<Review>,
    pub published: Option<NaiveDate>,
    pub price: Option<f64>,
    pub isbn: Option<Isbn>,
}

impl Book {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl Record for Book {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let field = match name {
            "id" => FieldValue::value(self.id),
            "name" => FieldValue::value(self.name.as_str()),
            "address" => FieldValue::record(self.address.as_ref()),
            "tags" => FieldValue::values(self.tags.iter().map(String::as_str)),
            "reviews" => FieldValue::records(&self.reviews),
            "published" => FieldValue::optional(self.published),
            "price" => FieldValue::optional(self.price),
            "isbn" => FieldValue::optional(
                self.isbn
                    .clone()
                    .map(|isbn| Value::Custom(Arc::new(isbn))),
            ),
            _ => return None,
        };
        Some(field)
    }
}

impl Searchable for Book {
    fn schema() -> &'static Schema {
        &BOOK_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
}

impl Address {
    pub fn new(street: &str) -> Self {
        Self {
            street: street.to_string(),
        }
    }
}

impl Record for Address {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "street" => Some(FieldValue::value(self.street.as_str())),
            _ => None,
        }
    }
}

impl Searchable for Address {
    fn schema() -> &'static Schema {
        &ADDRESS_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub review: Value,
    pub authors: Vec<String>,
}

impl Review {
    pub fn new(review: Value, authors: &[&str]) -> Self {
        Self {
            review,
            authors: authors.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Record for Review {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "review" => Some(FieldValue::Value(self.review.clone())),
            "authors" => Some(FieldValue::values(self.authors.iter().map(String::as_str))),
            _ => None,
        }
    }
}

impl Searchable for Review {
    fn schema() -> &'static Schema {
        &REVIEW_SCHEMA
    }
}
