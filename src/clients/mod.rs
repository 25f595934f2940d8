pub mod error;
pub mod telegram;
pub mod terminal;
