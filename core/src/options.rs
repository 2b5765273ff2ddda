//! Composable configuration for `Client`.
//!
//! # Design
//! Each `set_*` function returns a `ClientOption`: a deferred mutation that
//! does nothing until `Client::new` or `Client::update` applies it. Options
//! whose argument can be checked on its own (URLs, key shapes) validate
//! immediately and carry the error until applied. Expiration and visibility
//! codes are parsed when applied.

use tracing::debug;

use crate::client::Client;
use crate::error::ConfigError;
use crate::keys::is_valid_key;
use crate::request::parse_base_url;
use crate::transport::Transport;

/// A deferred, validating mutation of a `Client`.
pub type ClientOption = Box<dyn FnOnce(&mut Client) -> Result<(), ConfigError> + Send>;

/// Use `transport` to execute requests.
pub fn set_transport(transport: impl Transport + 'static) -> ClientOption {
    Box::new(move |c: &mut Client| {
        c.transport = Box::new(transport);
        Ok(())
    })
}

/// Root URL of the API, e.g. `https://pastebin.com/api/`.
pub fn set_base_url(url: &str) -> ClientOption {
    let parsed = parse_base_url(url);
    Box::new(move |c: &mut Client| {
        c.base_url = parsed?;
        Ok(())
    })
}

/// Session key (`api_user_key`) from an earlier login.
pub fn set_session_key(key: &str) -> ClientOption {
    let key = key.to_string();
    if !is_valid_key(&key) {
        return Box::new(|_: &mut Client| Err(ConfigError::InvalidSessionKey));
    }
    Box::new(move |c: &mut Client| {
        c.session_key = key;
        Ok(())
    })
}

pub fn set_username(username: &str) -> ClientOption {
    let username = username.to_string();
    Box::new(move |c: &mut Client| {
        c.username = username;
        Ok(())
    })
}

/// Password used by the next `login`. Cleared once login succeeds.
pub fn set_password(password: &str) -> ClientOption {
    let password = password.to_string();
    Box::new(move |c: &mut Client| {
        c.password = password;
        Ok(())
    })
}

/// Replace the built-in developer key. Rarely needed.
pub fn set_dev_key(key: &str) -> ClientOption {
    let key = key.to_string();
    if !is_valid_key(&key) {
        return Box::new(|_: &mut Client| Err(ConfigError::InvalidDevKey));
    }
    Box::new(move |c: &mut Client| {
        c.dev_key = key;
        Ok(())
    })
}

/// Default expiration for new pastes, as a wire code such as `1W`.
pub fn set_expiration(code: &str) -> ClientOption {
    let code = code.to_string();
    Box::new(move |c: &mut Client| {
        c.expiration = code.parse()?;
        debug!(expiration = %c.expiration, "default expiration set");
        Ok(())
    })
}

/// Default visibility for new pastes: `public`, `unlisted`, `private` or
/// the codes `0`, `1`, `2`.
pub fn set_visibility(visibility: &str) -> ClientOption {
    let visibility = visibility.to_string();
    Box::new(move |c: &mut Client| {
        c.visibility = visibility.parse()?;
        Ok(())
    })
}

/// Log every outgoing request in full before it is sent.
pub fn set_debug(enabled: bool) -> ClientOption {
    Box::new(move |c: &mut Client| {
        c.debug = enabled;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{DEFAULT_BASE_URL, DEFAULT_DEV_KEY};
    use crate::types::{Expiration, Visibility};
    use crate::ApiError;

    const KEY: &str = "a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4";

    #[test]
    fn no_options_gives_defaults() {
        let c = Client::new([]).unwrap();
        assert_eq!(c.base_url(), DEFAULT_BASE_URL);
        assert_eq!(c.expiration(), Expiration::TenMinutes);
        assert_eq!(c.visibility(), Visibility::Unlisted);
        assert_eq!(c.dev_key(), DEFAULT_DEV_KEY);
        assert_eq!(c.session_key(), "");
        assert!(!c.has_password());
        assert!(!c.debug());
    }

    #[test]
    fn options_apply_in_order() {
        let c = Client::new([
            set_base_url("http://localhost:3000/api/"),
            set_expiration("1H"),
            set_expiration("1W"),
            set_visibility("private"),
            set_username("alice"),
            set_password("hunter2"),
            set_session_key(KEY),
            set_debug(true),
        ])
        .unwrap();
        assert_eq!(c.base_url(), "http://localhost:3000/api/");
        assert_eq!(c.expiration(), Expiration::OneWeek);
        assert_eq!(c.visibility(), Visibility::Private);
        assert_eq!(c.username(), "alice");
        assert!(c.has_password());
        assert_eq!(c.session_key(), KEY);
        assert!(c.debug());
    }

    #[test]
    fn valid_expiration_applies() {
        let c = Client::new([set_expiration("10M")]).unwrap();
        assert_eq!(c.expiration().code(), "10M");
    }

    #[test]
    fn invalid_expiration_names_valid_set() {
        let err = Client::new([set_expiration("3Y")]).unwrap_err();
        match err {
            ApiError::Config(ConfigError::InvalidExpiration { code, valid }) => {
                assert_eq!(code, "3Y");
                assert!(valid.contains("10M"));
                assert!(valid.contains("1Y"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_visibility_fails() {
        let err = Client::new([set_visibility("hidden")]).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidVisibility(_))));
    }

    #[test]
    fn bad_session_key_fails() {
        let err = Client::new([set_session_key("not-a-key")]).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidSessionKey)));
    }

    #[test]
    fn empty_session_key_option_fails() {
        let err = Client::new([set_session_key("")]).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidSessionKey)));
    }

    #[test]
    fn bad_dev_key_fails() {
        let err = Client::new([set_dev_key("short")]).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidDevKey)));
    }

    #[test]
    fn custom_dev_key_applies() {
        let c = Client::new([set_dev_key(KEY)]).unwrap();
        assert_eq!(c.dev_key(), KEY);
    }

    #[test]
    fn bad_url_fails() {
        let err = Client::new([set_base_url("::not a url::")]).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn first_failure_aborts_construction() {
        let err = Client::new([
            set_username("alice"),
            set_expiration("3Y"),
            set_visibility("nope"),
        ])
        .unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidExpiration { .. })));
    }

    #[test]
    fn update_keeps_changes_made_before_a_failure() {
        let mut c = Client::new([]).unwrap();
        let err = c
            .update([
                set_username("bob"),
                set_expiration("bogus"),
                set_expiration("1D"),
            ])
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidExpiration { .. })));
        assert_eq!(c.username(), "bob");
        assert_eq!(c.expiration(), Expiration::TenMinutes);
    }

    #[test]
    fn update_applies_all_on_success() {
        let mut c = Client::new([]).unwrap();
        c.update([set_expiration("N"), set_visibility("0")]).unwrap();
        assert_eq!(c.expiration(), Expiration::Never);
        assert_eq!(c.visibility(), Visibility::Public);
    }
}
