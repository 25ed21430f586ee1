// README metadata mining library
pub mod catalog;
pub mod config;
pub mod fields;
pub mod normalize;
pub mod output;
pub mod pdf_text;
pub mod pipeline;
pub mod sample;
pub mod types;
pub mod viz;

pub use pipeline::{run, RunConfig};
pub use types::Record;
