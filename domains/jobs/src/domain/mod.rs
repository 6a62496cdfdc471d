//! Domain layer for Jobs: entities and form validation

pub mod entities;
pub mod validation;
