#![deny(unsafe_code)]

/// Window shell, actions and the phone-sized frame.
pub mod app;
/// Conversation screen and its panel-coordinated views.
pub mod chat;
/// Settings persistence.
pub mod settings;
