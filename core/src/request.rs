//! Request construction: endpoint URL joining plus form body.

use url::Url;

use crate::error::{ConfigError, Result};
use crate::form::{self, Parameters};
use crate::http::{HttpMethod, HttpRequest};

/// Parse `raw` as an absolute URL that can take an endpoint path.
pub fn parse_base_url(raw: &str) -> std::result::Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::CannotBeBase(raw.to_string()));
    }
    Ok(url)
}

/// Append `endpoint` to the path of `base`, collapsing duplicate slashes and
/// resolving `.` and `..` segments. Query and fragment are kept.
pub fn endpoint_url(base: &Url, endpoint: &str) -> Url {
    let mut url = base.clone();
    url.set_path(&join_path(base.path(), endpoint));
    url
}

/// Build a POST for `endpoint` under `base_url` with `params` as a
/// multipart body.
pub fn build_request(base_url: &str, endpoint: &str, params: &Parameters) -> Result<HttpRequest> {
    let base = parse_base_url(base_url)?;
    build_request_for(&base, endpoint, params)
}

pub(crate) fn build_request_for(
    base: &Url,
    endpoint: &str,
    params: &Parameters,
) -> Result<HttpRequest> {
    let (body, content_type) = form::encode(params)?;
    Ok(HttpRequest {
        method: HttpMethod::Post,
        url: endpoint_url(base, endpoint).to_string(),
        headers: vec![("Content-Type".to_string(), content_type)],
        body,
    })
}

fn join_path(base: &str, endpoint: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(endpoint.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}
