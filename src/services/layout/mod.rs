// Layout pipeline
// bucketize -> merge -> resolve (per day) -> place, plus the live indicator

pub mod bucketizer;
pub mod engine;
pub mod indicator;
pub mod merger;
pub mod overlap;

pub use bucketizer::bucketize;
pub use engine::layout;
pub use indicator::indicator;
pub use merger::merge;
pub use overlap::resolve;
