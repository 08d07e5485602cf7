pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod traits;
pub mod types;

pub use config::BackendConfig;
pub use error::{BackendError, Result};
pub use http::HttpBackend;
pub use mock::{MockBackend, MockCall};
pub use traits::GrantBackend;
pub use types::{
    AnswerItem, DocumentQuestionRequest, DocumentQuestionResponse, SearchRequest, SearchResponse,
    NO_ANSWER,
};
