pub mod dispatch;
pub mod menu;
pub mod order;
pub mod search;
pub mod statistics;
pub mod webhook;
