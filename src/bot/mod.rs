//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `actions`: Menu actions and their callback tags
//! - `ui_builder`: Creates menus and inline keyboards
//! - `transport`: The outbound seam used by the state machine
//! - `dialogue_manager`: The per-chat interaction state machine
//! - `telegram_transport`: Telegram implementation of the transport
//! - `message_handler`: Handles incoming text, photo, and document messages
//! - `callback_handler`: Handles inline keyboard callback queries

pub mod actions;
pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod telegram_transport;
pub mod transport;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

pub use actions::MenuAction;
pub use dialogue_manager::{BotCommand, InboundEvent, Incoming, InteractionManager};
pub use transport::{TextFormat, Transport};
pub use ui_builder::Menu;
