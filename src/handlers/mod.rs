//! HTTP handlers for entity CRUD and auth.

pub mod auth;
pub mod entity;
