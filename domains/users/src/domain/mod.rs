//! Domain layer for Users: entities and login resolution

pub mod auth;
pub mod entities;
