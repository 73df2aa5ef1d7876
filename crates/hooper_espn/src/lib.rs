mod client;
mod error;
pub mod news;
pub mod scores;

pub use client::{Client, DEFAULT_BASE_URL};
pub use error::Error;
pub use news::{Article, News};
pub use scores::{Competition, Competitor, Event, HomeAway, Scoreboard, Team};
