//! # Picture Telegram Bot
//!
//! A Telegram bot that takes a photo and, through an inline-button menu,
//! sends back a pixelated, inverted or mirrored copy, or an ASCII-art
//! rendering of it.

pub mod ascii_art;
pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod session_store;
pub mod transforms;
