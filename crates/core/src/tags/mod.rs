//! Tags module - domain models.

mod tags_model;

pub use tags_model::Tag;
