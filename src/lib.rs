//! The Game Loop - a content site for game developers
//!
//! This library provides the site's content client, view controllers,
//! theme engine and HTTP layer. Content comes from a headless CMS, with a
//! built-in fallback set served whenever the CMS cannot be used.

pub mod api;
pub mod config;
pub mod content;
pub mod keys;
pub mod models;
pub mod services;
pub mod theme;
