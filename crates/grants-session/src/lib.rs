pub mod builder;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod intake;
pub mod migration;
pub mod store;

pub use builder::ChatEngineBuilder;
pub use config::EngineConfig;
pub use dispatcher::{DispatchOutcome, Submission};
pub use engine::ChatEngine;
pub use error::{Result, SessionError};
pub use migration::migrate;
pub use store::SessionStore;
