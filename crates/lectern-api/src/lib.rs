// lectern-api: async client for the church platform admin REST API

pub mod auth;
pub mod categories;
pub mod client;
pub mod envelope;
pub mod error;
pub mod payload;
pub mod transport;
pub mod widgets;

pub use auth::{AuthHeaders, AuthStrategy};
pub use categories::CategoryView;
pub use client::{ApiClient, RequestOptions};
pub use envelope::{PageMeta, Paginated, normalize};
pub use error::Error;
pub use payload::{FilePart, MultipartPayload, RequestBody};
pub use transport::{TlsMode, TransportConfig};
pub use widgets::WidgetsConfigPayload;

pub use reqwest::Method;
