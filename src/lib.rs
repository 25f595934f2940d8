pub mod clients;
pub mod config;
pub mod conversation;
pub mod cron;
pub mod http;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
pub mod workers;
