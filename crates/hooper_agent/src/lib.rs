mod agent;
mod error;
mod prompt;
mod session;
mod tools;
mod turn;

pub use agent::Agent;
pub use error::Error;
pub use session::Session;
pub use turn::{Progress, Reply, TurnError};
