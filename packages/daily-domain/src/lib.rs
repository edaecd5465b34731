//! Relevance ranking shared by every search surface.
//!
//! A query is parsed once into a [`query::QueryContext`], each candidate record is reduced to
//! its [`fields::RecordFields`] and scored, and [`rank::rank`] turns the scored candidates into a
//! bounded, ordered list.

pub mod date;
pub mod fields;
pub mod query;
pub mod rank;
pub mod text;
