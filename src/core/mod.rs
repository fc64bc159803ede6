pub mod client;

pub use crate::domain::context::RequestContext;
pub use crate::domain::model::Joke;
pub use crate::domain::ports::{ConfigProvider, JokeProvider, Transport, TransportResponse};
pub use crate::utils::error::Result;
