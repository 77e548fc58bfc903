//! Credential negotiation tests against a mocked server port.

use std::sync::Arc;

use crate::connection::{
    adapters::ScriptedPrompt,
    domain::{AuthMethod, BaseEndpoint, RawAddress, TlsMode},
    ports::{LoginResult, MockNotebookServerApi, ServerApiError, ServerProbe},
    services::{CredentialNegotiator, NegotiationError},
};
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use secrecy::{ExposeSecret as _, SecretString};
use tokio_util::sync::CancellationToken;

#[fixture]
fn endpoint() -> BaseEndpoint {
    let uri = RawAddress::from("http://localhost:8888/lab")
        .normalize()
        .expect("address should normalize");
    BaseEndpoint::resolve(&uri)
}

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_owned())
}

fn server_requiring_auth() -> MockNotebookServerApi {
    let mut api = MockNotebookServerApi::new();
    api.expect_probe()
        .returning(|_, _| Ok(ServerProbe::new(Some("7.0.0".to_owned()), true)));
    api
}

fn negotiator(
    api: MockNotebookServerApi,
    prompt: &Arc<ScriptedPrompt>,
) -> CredentialNegotiator<MockNotebookServerApi, ScriptedPrompt> {
    CredentialNegotiator::new(Arc::new(api), Arc::clone(prompt))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_server_needs_no_credentials(endpoint: BaseEndpoint) {
    let mut api = MockNotebookServerApi::new();
    api.expect_probe()
        .times(1)
        .returning(|_, _| Ok(ServerProbe::new(None, false)));
    api.expect_check_token().never();
    api.expect_login().never();
    let prompt = Arc::new(ScriptedPrompt::new());

    let credentials = negotiator(api, &prompt)
        .negotiate(
            &endpoint,
            Some(&secret("ABC")),
            TlsMode::Verify,
            &CancellationToken::new(),
        )
        .await
        .expect("anonymous negotiation should succeed");

    assert!(credentials.is_empty());
    assert_eq!(credentials.method(), AuthMethod::Anonymous);
    assert_eq!(prompt.password_requests(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn valid_embedded_token_skips_password_prompt(endpoint: BaseEndpoint) {
    let mut api = server_requiring_auth();
    api.expect_check_token()
        .withf(|_, token, tls| token.expose_secret() == "ABC" && *tls == TlsMode::Verify)
        .times(1)
        .returning(|_, _, _| Ok(true));
    api.expect_login().never();
    let prompt = Arc::new(ScriptedPrompt::new().with_password("unused"));

    let credentials = negotiator(api, &prompt)
        .negotiate(
            &endpoint,
            Some(&secret("ABC")),
            TlsMode::Verify,
            &CancellationToken::new(),
        )
        .await
        .expect("token negotiation should succeed");

    assert_eq!(credentials.method(), AuthMethod::Token);
    assert_eq!(
        credentials.token().map(|token| token.expose_secret().to_owned()),
        Some("ABC".to_owned())
    );
    assert_eq!(prompt.password_requests(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_token_falls_back_to_password(endpoint: BaseEndpoint) {
    let mut api = server_requiring_auth();
    api.expect_check_token()
        .times(1)
        .returning(|_, _, _| Ok(false));
    api.expect_login()
        .withf(|_, password, _| password.expose_secret() == "Hello")
        .times(1)
        .returning(|_, _, _| Ok(LoginResult::Accepted));
    let prompt = Arc::new(ScriptedPrompt::new().with_password("Hello"));

    let credentials = negotiator(api, &prompt)
        .negotiate(
            &endpoint,
            Some(&secret("stale")),
            TlsMode::Verify,
            &CancellationToken::new(),
        )
        .await
        .expect("password negotiation should succeed");

    assert_eq!(credentials.method(), AuthMethod::Password);
    assert_eq!(
        credentials.password().map(|password| password.expose_secret()),
        Some("Hello")
    );
    assert_eq!(prompt.password_requests(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_embedded_token_is_not_sent(endpoint: BaseEndpoint) {
    let mut api = server_requiring_auth();
    api.expect_check_token().never();
    api.expect_login()
        .times(1)
        .returning(|_, _, _| Ok(LoginResult::Accepted));
    let prompt = Arc::new(ScriptedPrompt::new().with_password("Hello"));

    let credentials = negotiator(api, &prompt)
        .negotiate(
            &endpoint,
            Some(&secret("")),
            TlsMode::Verify,
            &CancellationToken::new(),
        )
        .await
        .expect("password negotiation should succeed");

    assert_eq!(credentials.method(), AuthMethod::Password);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_password_is_submitted_as_an_answer(endpoint: BaseEndpoint) {
    let mut api = server_requiring_auth();
    api.expect_login()
        .withf(|_, password, _| password.expose_secret().is_empty())
        .times(1)
        .returning(|_, _, _| Ok(LoginResult::Rejected));
    let prompt = Arc::new(ScriptedPrompt::new().with_password(""));

    let result = negotiator(api, &prompt)
        .negotiate(&endpoint, None, TlsMode::Verify, &CancellationToken::new())
        .await;

    assert_eq!(result.err(), Some(NegotiationError::InvalidCredentials));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_password_is_not_retried(endpoint: BaseEndpoint) {
    let mut api = server_requiring_auth();
    api.expect_login()
        .times(1)
        .returning(|_, _, _| Ok(LoginResult::Rejected));
    let prompt = Arc::new(
        ScriptedPrompt::new()
            .with_password("Bogus")
            .with_password("Hello"),
    );

    let result = negotiator(api, &prompt)
        .negotiate(&endpoint, None, TlsMode::Verify, &CancellationToken::new())
        .await;

    assert_eq!(result.err(), Some(NegotiationError::InvalidCredentials));
    assert_eq!(prompt.password_requests(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dismissed_password_prompt_cancels(endpoint: BaseEndpoint) {
    let mut api = server_requiring_auth();
    api.expect_login().never();
    let prompt = Arc::new(ScriptedPrompt::new().with_dismissed_password());

    let result = negotiator(api, &prompt)
        .negotiate(&endpoint, None, TlsMode::Verify, &CancellationToken::new())
        .await;

    assert_eq!(result.err(), Some(NegotiationError::Cancelled));
}

#[rstest]
#[case(
    ServerApiError::Network("connection refused".to_owned()),
    NegotiationError::Network("network error: connection refused".to_owned())
)]
#[case(
    ServerApiError::UntrustedCertificate("self signed certificate".to_owned()),
    NegotiationError::UntrustedCertificate("self signed certificate".to_owned())
)]
#[case(
    ServerApiError::UnexpectedStatus { url: "http://localhost:8888/api".to_owned(), status: 500 },
    NegotiationError::Network("unexpected HTTP 500 from http://localhost:8888/api".to_owned())
)]
#[tokio::test(flavor = "multi_thread")]
async fn probe_failures_are_classified(
    endpoint: BaseEndpoint,
    #[case] failure: ServerApiError,
    #[case] expected: NegotiationError,
) {
    let mut api = MockNotebookServerApi::new();
    api.expect_probe()
        .with(eq(endpoint.clone()), eq(TlsMode::Verify))
        .times(1)
        .returning(move |_, _| Err(failure.clone()));
    let prompt = Arc::new(ScriptedPrompt::new());

    let result = negotiator(api, &prompt)
        .negotiate(&endpoint, None, TlsMode::Verify, &CancellationToken::new())
        .await;

    assert_eq!(result.err(), Some(expected));
    assert_eq!(prompt.password_requests(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fired_signal_stops_negotiation(endpoint: BaseEndpoint) {
    let api = server_requiring_auth();
    let prompt = Arc::new(ScriptedPrompt::new().with_password("Hello"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = negotiator(api, &prompt)
        .negotiate(&endpoint, None, TlsMode::Verify, &cancel)
        .await;

    assert_eq!(result.err(), Some(NegotiationError::Cancelled));
    assert_eq!(prompt.password_requests(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn requests_use_the_negotiated_tls_mode(endpoint: BaseEndpoint) {
    let mut api = MockNotebookServerApi::new();
    api.expect_probe()
        .with(eq(endpoint.clone()), eq(TlsMode::AcceptInvalidCertificates))
        .times(1)
        .returning(|_, _| Ok(ServerProbe::new(None, true)));
    api.expect_check_token()
        .withf(|_, _, tls| *tls == TlsMode::AcceptInvalidCertificates)
        .times(1)
        .returning(|_, _, _| Ok(true));
    let prompt = Arc::new(ScriptedPrompt::new());

    let credentials = negotiator(api, &prompt)
        .negotiate(
            &endpoint,
            Some(&secret("ABC")),
            TlsMode::AcceptInvalidCertificates,
            &CancellationToken::new(),
        )
        .await
        .expect("negotiation should succeed");

    assert_eq!(credentials.method(), AuthMethod::Token);
}
