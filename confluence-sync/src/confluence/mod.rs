//! Confluence remote — read the current page and replace its body.

pub mod client;

pub use client::ConfluenceClient;
