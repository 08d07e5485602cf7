pub mod display;
pub mod file;
pub mod grant;
pub mod ids;
pub mod legacy;
pub mod message;
pub mod panel;
pub mod session;

pub use display::{format_amount, format_file_size};
pub use file::{FileHandle, UploadedFile};
pub use grant::{GrantDocument, GrantDocuments, GrantStatus, SearchResult};
pub use ids::IdClock;
pub use legacy::{FileRecord, MessageRecord, SessionRecord};
pub use message::{Message, MessageContent};
pub use panel::{Panel, Role};
pub use session::{derive_title, Session, SessionSummary, DEFAULT_TITLE};
