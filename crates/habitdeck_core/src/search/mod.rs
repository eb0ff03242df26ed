//! Search and filter helpers for library views.

pub mod library;
