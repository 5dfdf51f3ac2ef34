// Week Grid Library
// Event-to-grid layout engine for a week-long calendar card

pub mod models;
pub mod services;
pub mod utils;
