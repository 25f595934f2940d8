pub mod events;
pub mod telegram;
pub mod terminal;
pub mod webhook;
