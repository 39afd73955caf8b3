//! Integration tests over the in-memory store

mod api;
mod catalog;
mod common;
