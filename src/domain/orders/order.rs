use std::fmt;
use std::str::FromStr;

use crate::domain::books::book::Book;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Accepted,
    Rejected,
    Dispatched,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct OrderStatusParseError(pub String);

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Dispatched => "DISPATCHED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCEPTED" => Ok(OrderStatus::Accepted),
            "REJECTED" => Ok(OrderStatus::Rejected),
            "DISPATCHED" => Ok(OrderStatus::Dispatched),
            other => Err(OrderStatusParseError(other.to_string())),
        }
    }
}

/// An order that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub book_isbn: String,
    pub book_name: Option<String>,
    pub book_price: Option<f64>,
    pub quantity: i32,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub book_isbn: String,
    pub book_name: Option<String>,
    pub book_price: Option<f64>,
    pub quantity: i32,
    pub status: OrderStatus,
    pub created_date: chrono::DateTime<chrono::Utc>,
    pub last_modified_date: chrono::DateTime<chrono::Utc>,
    pub version: i32,
}

pub fn build_accepted_order(book: &Book, quantity: i32) -> NewOrder {
    NewOrder {
        book_isbn: book.isbn.clone(),
        book_name: Some(format!("{} - {}", book.title, book.author)),
        book_price: Some(book.price),
        quantity,
        status: OrderStatus::Accepted,
    }
}

// Rejected orders carry no quantity regardless of what was requested.
pub fn build_rejected_order(isbn: &str, _quantity: i32) -> NewOrder {
    NewOrder {
        book_isbn: isbn.to_string(),
        book_name: None,
        book_price: None,
        quantity: 0,
        status: OrderStatus::Rejected,
    }
}
