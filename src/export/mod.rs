//! CSV export of harvested reviews.
//!
//! Column order is fixed: `ID, Name, Date, Rating, Title, Body, Product, Image`.
//! Non-empty cells are always quoted; empty cells are left bare.

mod csv;

pub use self::csv::{escape_cell, to_csv, write_csv};
