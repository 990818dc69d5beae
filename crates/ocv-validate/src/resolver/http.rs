use std::collections::BTreeMap;

use ocv_model::Scheme;
use ocv_standards::ResolverSettings;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::{debug, warn};

use super::{Resolution, Resolver};
use crate::error::ResolveError;

/// Characters left unescaped in a looked-up value. Keeps `/` and `:`, which
/// DOIs and similar identifiers contain.
const PATH_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b':')
    .remove(b'(')
    .remove(b')')
    .remove(b';');

/// Resolves identifiers with one HTTP GET per lookup.
///
/// Each scheme maps to a URL template containing `{value}`. Schemes without a
/// template are not supported and never looked up.
pub struct HttpResolver {
    client: Client,
    user_agent: String,
    endpoints: BTreeMap<Scheme, String>,
}

impl HttpResolver {
    pub fn new(settings: &ResolverSettings) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(ResolveError::Client)?;
        Ok(Self {
            client,
            user_agent: settings.user_agent.clone(),
            endpoints: settings.endpoints.clone(),
        })
    }

    /// Lookup URL for an identifier, if the scheme has an endpoint.
    pub fn lookup_url(&self, scheme: Scheme, value: &str) -> Option<String> {
        self.endpoints
            .get(&scheme)
            .map(|template| {
                template.replace("{value}", &utf8_percent_encode(value, PATH_VALUE).to_string())
            })
    }
}

impl Resolver for HttpResolver {
    fn supports(&self, scheme: Scheme) -> bool {
        self.endpoints.contains_key(&scheme)
    }

    fn resolve(&self, scheme: Scheme, value: &str) -> Resolution {
        let Some(url) = self.lookup_url(scheme, value) else {
            return Resolution::LookupFailed;
        };
        debug!(%scheme, value, url, "looking up identifier");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send();

        match response {
            Ok(response) => classify(response.status()),
            Err(error) => {
                warn!(%scheme, value, %error, "identifier lookup failed");
                Resolution::LookupFailed
            }
        }
    }
}

/// Map an HTTP status to a resolution. Only "not found" style answers count
/// as a definite `Unknown`.
pub fn classify(status: StatusCode) -> Resolution {
    if status.is_success() {
        Resolution::Known
    } else if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        Resolution::Unknown
    } else {
        warn!(status = status.as_u16(), "unexpected lookup status");
        Resolution::LookupFailed
    }
}
