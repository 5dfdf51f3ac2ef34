// Module exports for models

pub mod event;
pub mod grid;
pub mod layout;
pub mod settings;
pub mod source;
