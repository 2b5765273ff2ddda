//! Stateful client for the paste API.
//!
//! # Design
//! `Client` owns its configuration and a boxed `Transport`. Every operation
//! follows one skeleton: collect form parameters (always including the
//! developer key), build a POST against a fixed endpoint, optionally dump it,
//! execute it, then classify the response. The API reports most failures as
//! HTTP 200 with an error sentence in the body, so status alone is never
//! trusted for login; there the body must also look like a session key.
//!
//! A `Client` is not synchronized. `login` and `update` take `&mut self`, so
//! sharing one across threads needs an outer lock; distinct clients share
//! nothing and can run on separate threads freely.

use std::fmt;

use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ApiError, Result};
use crate::form::Parameters;
use crate::http::{HttpRequest, HttpResponse};
use crate::keys::is_valid_key;
use crate::options::ClientOption;
use crate::request::{build_request_for, parse_base_url};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Expiration, Visibility};

pub const DEFAULT_BASE_URL: &str = "https://pastebin.com/api/";

/// Developer key used when none is configured.
pub const DEFAULT_DEV_KEY: &str = "10b20d3ff00b856a455ba5004ea9d2a1";

pub const LOGIN_ENDPOINT: &str = "api_login.php";
pub const POST_ENDPOINT: &str = "api_post.php";

/// `api_results_limit` sent by `list_pastes`.
pub const LIST_LIMIT: u32 = 100;

/// Form field names understood by the API.
pub mod field {
    pub const DEV_KEY: &str = "api_dev_key";
    pub const USER_KEY: &str = "api_user_key";
    pub const USER_NAME: &str = "api_user_name";
    pub const USER_PASSWORD: &str = "api_user_password";
    pub const OPTION: &str = "api_option";
    pub const PASTE_NAME: &str = "api_paste_name";
    pub const PASTE_CODE: &str = "api_paste_code";
    pub const PASTE_KEY: &str = "api_paste_key";
    pub const PASTE_EXPIRE_DATE: &str = "api_paste_expire_date";
    pub const PASTE_PRIVATE: &str = "api_paste_private";
    pub const RESULTS_LIMIT: &str = "api_results_limit";
}

const REDACTED: &str = "********";

/// Paste API client.
///
/// An empty session key means guest mode: pastes are posted anonymously and
/// `delete_paste`/`list_pastes` are refused.
pub struct Client {
    pub(crate) base_url: Url,
    pub(crate) dev_key: String,
    pub(crate) session_key: String,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) expiration: Expiration,
    pub(crate) visibility: Visibility,
    pub(crate) debug: bool,
    pub(crate) transport: Box<dyn Transport>,
}

impl Client {
    /// Build a client from the defaults, then apply `options` in order.
    /// The first failing option aborts construction.
    pub fn new(options: impl IntoIterator<Item = ClientOption>) -> Result<Self> {
        let mut client = Self {
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            dev_key: DEFAULT_DEV_KEY.to_string(),
            session_key: String::new(),
            username: String::new(),
            password: String::new(),
            expiration: Expiration::default(),
            visibility: Visibility::default(),
            debug: false,
            transport: Box::new(UreqTransport::new()),
        };
        client.update(options)?;
        Ok(client)
    }

    /// Apply `options` in order, stopping at the first failure. Options
    /// applied before the failure stay applied.
    pub fn update(&mut self, options: impl IntoIterator<Item = ClientOption>) -> Result<()> {
        for option in options {
            option(self)?;
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn dev_key(&self) -> &str {
        &self.dev_key
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn expiration(&self) -> Expiration {
        self.expiration
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    pub fn is_logged_in(&self) -> bool {
        is_valid_key(&self.session_key)
    }

    /// Exchange the configured username and password for a session key.
    ///
    /// On success the key is stored, the password is wiped, and the key is
    /// returned. A 200 response whose body is not key-shaped is a failed
    /// login: that is how the API reports bad credentials.
    pub fn login(&mut self) -> Result<String> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ApiError::MissingCredentials);
        }
        let params = parameters([
            (field::DEV_KEY, self.dev_key.as_str()),
            (field::USER_NAME, self.username.as_str()),
            (field::USER_PASSWORD, self.password.as_str()),
        ]);

        let response = self.send(LOGIN_ENDPOINT, &params)?;
        if response.is_ok() && is_valid_key(&response.body) {
            self.session_key = response.body;
            self.password.clear();
            info!(username = %self.username, "logged in");
            Ok(self.session_key.clone())
        } else {
            warn!(status = response.status, "login rejected");
            Err(ApiError::LoginFailed {
                status: response.status,
                body: response.body,
            })
        }
    }

    /// Set the credentials, then `login`. Empty credentials fail before the
    /// client is touched.
    pub fn login_with(&mut self, username: &str, password: &str) -> Result<String> {
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::MissingCredentials);
        }
        self.username = username.to_string();
        self.password = password.to_string();
        self.login()
    }

    /// Post `content` as a new paste titled `display_name`.
    ///
    /// Posts as the logged-in user when a session key is set, as a guest
    /// otherwise. `visibility` overrides the client default. On HTTP 200 the
    /// body is returned as is: normally the paste URL, but the API also uses
    /// 200 for its error sentences and no attempt is made to tell them apart.
    pub fn new_paste_from_file(
        &self,
        content: &str,
        display_name: &str,
        visibility: Option<Visibility>,
    ) -> Result<String> {
        let visibility = visibility.unwrap_or(self.visibility);
        let mut params = parameters([
            (field::DEV_KEY, self.dev_key.as_str()),
            (field::OPTION, "paste"),
            (field::PASTE_NAME, display_name),
            (field::PASTE_CODE, content),
            (field::PASTE_EXPIRE_DATE, self.expiration.code()),
            (field::PASTE_PRIVATE, visibility.code()),
        ]);
        if !self.session_key.is_empty() {
            params.insert(field::USER_KEY.to_string(), self.session_key.clone());
        }

        let response = self.send(POST_ENDPOINT, &params)?;
        expect_ok(response)
    }

    /// Delete the paste with key `paste_key`. Requires a session key.
    pub fn delete_paste(&self, paste_key: &str) -> Result<String> {
        if !self.is_logged_in() {
            return Err(ApiError::NotLoggedIn);
        }
        let params = parameters([
            (field::USER_KEY, self.session_key.as_str()),
            (field::PASTE_KEY, paste_key),
            (field::DEV_KEY, self.dev_key.as_str()),
            (field::OPTION, "delete"),
        ]);

        let response = self.send(POST_ENDPOINT, &params)?;
        expect_ok(response)
    }

    /// List the user's pastes. Requires a session key. The listing is
    /// returned exactly as the API sent it.
    pub fn list_pastes(&self) -> Result<String> {
        if !self.is_logged_in() {
            return Err(ApiError::NotLoggedIn);
        }
        let limit = LIST_LIMIT.to_string();
        let params = parameters([
            (field::DEV_KEY, self.dev_key.as_str()),
            (field::USER_KEY, self.session_key.as_str()),
            (field::RESULTS_LIMIT, limit.as_str()),
            (field::OPTION, "list"),
        ]);

        let response = self.send(POST_ENDPOINT, &params)?;
        expect_ok(response)
    }

    fn send(&self, endpoint: &str, params: &Parameters) -> Result<HttpResponse> {
        let request = build_request_for(&self.base_url, endpoint, params)?;
        debug!(
            endpoint,
            option = params.get(field::OPTION).map(String::as_str).unwrap_or("login"),
            "sending request"
        );
        if self.debug {
            info!("REQUEST:\n{}\n====", dump(&request, params));
        }

        let response = self.transport.execute(request)?;
        debug!(endpoint, status = response.status, "response received");
        Ok(response)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("dev_key", &self.dev_key)
            .field("session_key", &self.session_key)
            .field("username", &self.username)
            .field("has_password", &self.has_password())
            .field("expiration", &self.expiration)
            .field("visibility", &self.visibility)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

fn parameters<const N: usize>(pairs: [(&str, &str); N]) -> Parameters {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Anything but 200 is an error; a 200 body is handed back untouched.
fn expect_ok(response: HttpResponse) -> Result<String> {
    if response.is_ok() {
        Ok(response.body)
    } else {
        Err(ApiError::HttpError {
            status: response.status,
            body: response.body,
        })
    }
}

/// Human-readable request dump. The form is rendered from `params` so the
/// password can be masked.
fn dump(request: &HttpRequest, params: &Parameters) -> String {
    let mut out = format!("{} {}\n", request.method.as_str(), request.url);
    for (name, value) in &request.headers {
        out.push_str(&format!("{name}: {value}\n"));
    }
    out.push('\n');
    for (name, value) in params {
        let value = if name == field::USER_PASSWORD {
            REDACTED
        } else {
            value.as_str()
        };
        out.push_str(&format!("{name}={value}\n"));
    }
    out
}
