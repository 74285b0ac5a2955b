pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod observability;
pub mod pipeline;
pub mod scheduler;
pub mod simulate;
pub mod summarizer;
pub mod ws;

mod state;

pub use config::*;
pub use state::*;
