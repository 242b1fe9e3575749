pub mod chat;
pub mod context;
pub mod prefs;
