//! Photocast Telegram: delivery sink on top of the Bot API
//!
//! One photo goes out as `sendPhoto`, two to ten as `sendMediaGroup`
//! (caption on the first item). Text goes out as `sendMessage`.

mod sink;

pub use sink::{parse_recipient, TelegramConfig, TelegramError, TelegramSink};
