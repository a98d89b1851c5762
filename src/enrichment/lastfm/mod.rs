//! Last.fm API integration
//!
//! Looks up artist images and album release dates/covers by name.
//! Requires an API key.
//!
//! API docs: https://www.last.fm/api

pub mod dto;
mod adapter;
mod client;

pub use client::LastFmClient;
