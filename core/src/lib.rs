//! Blocking client for a pastebin-style HTTP API.
//!
//! # Overview
//! Logs a user in, posts text as a new paste, deletes pastes and lists a
//! user's pastes. Requests are multipart form POSTs; responses are plain
//! text, and the API reports most failures as HTTP 200 with an error
//! sentence in the body.
//!
//! # Design
//! - `Client` holds configuration and a session key; it is configured with
//!   composable `options::set_*` values and can be saved to and restored
//!   from a JSON file.
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`)
//!   executed by an injected `Transport`. `UreqTransport` is the default.
//! - Nothing here reads files or talks to a terminal: callers pass paste
//!   content in and choose where state is saved.
//!
//! ```no_run
//! use pastebin_core::{options, Client};
//!
//! let mut client = Client::new([
//!     options::set_username("johndoe"),
//!     options::set_password("superSecretPassword"),
//! ])?;
//! client.login()?;
//! let url = client.new_paste_from_file("hello", "hello.txt", None)?;
//! println!("{url}");
//! # Ok::<(), pastebin_core::ApiError>(())
//! ```

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod keys;
pub mod options;
pub mod request;
pub mod state;
pub mod transport;
pub mod types;

pub use client::{Client, DEFAULT_BASE_URL, DEFAULT_DEV_KEY};
pub use error::{ApiError, ConfigError, Result, TransportError};
pub use form::{FormBody, Parameters};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use keys::is_valid_key;
pub use options::ClientOption;
pub use request::build_request;
pub use state::{default_state_path, ClientState};
pub use transport::{Transport, UreqTransport};
pub use types::{Expiration, Visibility};
