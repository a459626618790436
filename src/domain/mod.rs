pub mod collection;
pub mod review;

pub use collection::ReviewCollection;
pub use review::{Field, ReviewRecord};
