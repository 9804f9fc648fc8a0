//! Bubberstation ban list

mod models;
mod parser;
mod service;

pub use models::{BubberBan, BubberRecord};
pub use parser::BubberBanParser;
pub use service::BubberBanService;
