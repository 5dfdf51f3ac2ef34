// Service module exports

pub mod clock;
pub mod labels;
pub mod layout;
pub mod palette;
pub mod refresh;
pub mod settings;
pub mod source;
