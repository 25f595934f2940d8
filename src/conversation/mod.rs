pub mod calendar;
pub mod callback;
pub mod error;
pub mod keyboards;
pub mod pagination;
pub mod render;
pub mod selection;
pub mod state;
pub mod step;
pub mod texts;
pub mod validators;
