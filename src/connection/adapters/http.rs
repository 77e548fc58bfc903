//! Live HTTP adapter for the notebook server REST surface.
//!
//! Uses `reqwest` with rustls. Redirects are never followed so login and
//! authorization answers can be read directly. Tokens travel in the
//! `Authorization` header and passwords in the login form body; neither is
//! logged or placed in a URL.

use crate::connection::{
    domain::{BaseEndpoint, TlsMode},
    ports::{LoginResult, NotebookServerApi, ServerApiError, ServerApiResult, ServerProbe},
    services::ResolverConfig,
};
use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, COOKIE, HeaderMap, SET_COOKIE},
    redirect::Policy,
};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::debug;
use url::Url;

const ROOT_INFO_PATH: &str = "api";
const KERNELS_PATH: &str = "api/kernels";
const LOGIN_PATH: &str = "login";
const XSRF_COOKIE: &str = "_xsrf";

/// Lowercase fragments that identify certificate verification failures in
/// transport error chains.
const CERTIFICATE_FAILURE_MARKERS: &[&str] = &[
    "certificate",
    "unknownissuer",
    "self signed",
    "self-signed",
];

/// Body of the root info endpoint.
#[derive(Debug, Deserialize)]
struct ServerInfo {
    version: Option<String>,
}

/// Whether an API request was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Authorization {
    Granted,
    Refused,
}

/// `reqwest`-backed notebook server client.
///
/// Holds a verifying client and a permissive client; the permissive client
/// is only used with [`TlsMode::AcceptInvalidCertificates`].
#[derive(Debug, Clone)]
pub struct ReqwestNotebookServerApi {
    verifying: Client,
    permissive: Client,
}

impl ReqwestNotebookServerApi {
    /// Builds both clients with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ServerApiError::Runtime`] when a client cannot be built.
    pub fn new(config: &ResolverConfig) -> ServerApiResult<Self> {
        Ok(Self {
            verifying: build_client(config.request_timeout(), false)?,
            permissive: build_client(config.request_timeout(), true)?,
        })
    }

    const fn client(&self, tls: TlsMode) -> &Client {
        match tls {
            TlsMode::Verify => &self.verifying,
            TlsMode::AcceptInvalidCertificates => &self.permissive,
        }
    }
}

#[async_trait]
impl NotebookServerApi for ReqwestNotebookServerApi {
    async fn probe(&self, endpoint: &BaseEndpoint, tls: TlsMode) -> ServerApiResult<ServerProbe> {
        let client = self.client(tls);

        let info_url = endpoint_url(endpoint, ROOT_INFO_PATH)?;
        let info_response = client
            .get(info_url.clone())
            .send()
            .await
            .map_err(classify_transport_error)?;
        if !info_response.status().is_success() {
            return Err(unexpected_status(&info_url, info_response.status()));
        }
        let info: ServerInfo =
            info_response
                .json()
                .await
                .map_err(|err| ServerApiError::MalformedResponse {
                    url: info_url.to_string(),
                    reason: err.to_string(),
                })?;

        let kernels_url = endpoint_url(endpoint, KERNELS_PATH)?;
        let kernels_response = client
            .get(kernels_url.clone())
            .send()
            .await
            .map_err(classify_transport_error)?;
        let authorization = classify_authorization(kernels_response.status())
            .ok_or_else(|| unexpected_status(&kernels_url, kernels_response.status()))?;

        debug!(endpoint = %endpoint, ?authorization, "anonymous API access checked");
        Ok(ServerProbe::new(
            info.version,
            authorization == Authorization::Refused,
        ))
    }

    async fn check_token(
        &self,
        endpoint: &BaseEndpoint,
        token: &SecretString,
        tls: TlsMode,
    ) -> ServerApiResult<bool> {
        let kernels_url = endpoint_url(endpoint, KERNELS_PATH)?;
        let response = self
            .client(tls)
            .get(kernels_url.clone())
            .header(AUTHORIZATION, format!("token {}", token.expose_secret()))
            .send()
            .await
            .map_err(classify_transport_error)?;

        match classify_authorization(response.status()) {
            Some(authorization) => Ok(authorization == Authorization::Granted),
            None => Err(unexpected_status(&kernels_url, response.status())),
        }
    }

    async fn login(
        &self,
        endpoint: &BaseEndpoint,
        password: &SecretString,
        tls: TlsMode,
    ) -> ServerApiResult<LoginResult> {
        let client = self.client(tls);
        let login_url = endpoint_url(endpoint, LOGIN_PATH)?;

        let form_response = client
            .get(login_url.clone())
            .send()
            .await
            .map_err(classify_transport_error)?;
        let cookies = collect_cookies(form_response.headers());
        let xsrf = cookies
            .iter()
            .find(|(name, _)| name == XSRF_COOKIE)
            .map(|(_, value)| value.clone())
            .unwrap_or_default();

        let mut request = client.post(login_url).form(&[
            (XSRF_COOKIE, xsrf.as_str()),
            ("password", password.expose_secret()),
        ]);
        if !cookies.is_empty() {
            request = request.header(COOKIE, cookie_header(&cookies));
        }
        let response = request.send().await.map_err(classify_transport_error)?;

        if !response.status().is_redirection() {
            debug!(endpoint = %endpoint, status = %response.status(), "login refused");
            return Ok(LoginResult::Rejected);
        }
        let opened_session = collect_cookies(response.headers())
            .iter()
            .any(|(name, _)| name != XSRF_COOKIE);
        if !opened_session {
            debug!(endpoint = %endpoint, "login redirect carried no session cookie");
            return Ok(LoginResult::Rejected);
        }
        Ok(LoginResult::Accepted)
    }
}

fn build_client(timeout: Duration, accept_invalid_certs: bool) -> ServerApiResult<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(Policy::none())
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(ServerApiError::runtime)
}

fn endpoint_url(endpoint: &BaseEndpoint, path: &str) -> ServerApiResult<Url> {
    endpoint.join(path).map_err(ServerApiError::runtime)
}

fn unexpected_status(url: &Url, status: StatusCode) -> ServerApiError {
    ServerApiError::UnexpectedStatus {
        url: url.to_string(),
        status: status.as_u16(),
    }
}

fn classify_authorization(status: StatusCode) -> Option<Authorization> {
    if status.is_success() {
        return Some(Authorization::Granted);
    }
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || status.is_redirection()
    {
        return Some(Authorization::Refused);
    }
    None
}

fn classify_transport_error(err: reqwest::Error) -> ServerApiError {
    let description = describe_error_chain(&err);
    if is_certificate_failure(&err) {
        return ServerApiError::UntrustedCertificate(description);
    }
    ServerApiError::Network(description)
}

/// Returns whether any error in the source chain reports a certificate
/// verification failure.
fn is_certificate_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(layer) = current {
        let message = layer.to_string().to_ascii_lowercase();
        if CERTIFICATE_FAILURE_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
        {
            return true;
        }
        current = layer.source();
    }
    false
}

fn describe_error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(layer) = current {
        parts.push(layer.to_string());
        current = layer.source();
    }
    parts.join(": ")
}

/// Collects `name=value` pairs from `Set-Cookie` headers, skipping cookies
/// that are being cleared.
fn collect_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(parse_set_cookie)
        .collect()
}

fn parse_set_cookie(header: &str) -> Option<(String, String)> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let cookie_name = name.trim();
    let cookie_value = value.trim();
    if cookie_name.is_empty() || cookie_value.is_empty() || cookie_value == "\"\"" {
        return None;
    }
    Some((cookie_name.to_owned(), cookie_value.to_owned()))
}

fn cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use rstest::rstest;
    use std::fmt;

    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str(self.message)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.source
                .as_deref()
                .map(|layer| layer as &(dyn StdError + 'static))
        }
    }

    fn chain(outer: &'static str, inner: &'static str) -> Layer {
        Layer {
            message: outer,
            source: Some(Box::new(Layer {
                message: inner,
                source: None,
            })),
        }
    }

    #[rstest]
    #[case("invalid peer certificate: UnknownIssuer", true)]
    #[case("self signed certificate in certificate chain", true)]
    #[case("Connection refused (os error 111)", false)]
    #[case("operation timed out", false)]
    fn certificate_failures_are_found_in_source_chain(
        #[case] inner: &'static str,
        #[case] expected: bool,
    ) {
        let err = chain("error sending request", inner);

        assert_eq!(is_certificate_failure(&err), expected);
    }

    #[test]
    fn error_chain_description_joins_layers() {
        let err = chain("error sending request", "connection refused");

        assert_eq!(
            describe_error_chain(&err),
            "error sending request: connection refused"
        );
    }

    #[rstest]
    #[case(StatusCode::OK, Some(Authorization::Granted))]
    #[case(StatusCode::FORBIDDEN, Some(Authorization::Refused))]
    #[case(StatusCode::UNAUTHORIZED, Some(Authorization::Refused))]
    #[case(StatusCode::FOUND, Some(Authorization::Refused))]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, None)]
    fn authorization_is_classified_from_status(
        #[case] status: StatusCode,
        #[case] expected: Option<Authorization>,
    ) {
        assert_eq!(classify_authorization(status), expected);
    }

    #[rstest]
    #[case("_xsrf=2|abc; Path=/", Some(("_xsrf", "2|abc")))]
    #[case("username-localhost-8888=\"2|session\"; HttpOnly", Some(("username-localhost-8888", "\"2|session\"")))]
    #[case("username-localhost-8888=\"\"; expires=Thu, 01 Jan 1970 00:00:00 GMT", None)]
    #[case("=orphan", None)]
    #[case("no-equals-sign", None)]
    fn set_cookie_headers_are_parsed(
        #[case] header: &str,
        #[case] expected: Option<(&str, &str)>,
    ) {
        let parsed = parse_set_cookie(header);

        assert_eq!(
            parsed.as_ref().map(|(name, value)| (name.as_str(), value.as_str())),
            expected
        );
    }

    #[test]
    fn cookies_are_collected_from_every_set_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("_xsrf=token; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("session=abc; HttpOnly"));

        let cookies = collect_cookies(&headers);

        assert_eq!(cookie_header(&cookies), "_xsrf=token; session=abc");
    }
}
