//! Trust decision, trust gate and phase sequencing tests.

use std::sync::Arc;

use crate::connection::{
    adapters::ScriptedPrompt,
    domain::{
        BaseEndpoint, CertificateStatus, ConnectionFailure, FailureKind, RawAddress,
        ResolutionPhase, ResolutionTrail, Scheme, TlsMode, TrustAction, TrustDecision,
        decide_trust,
    },
    services::{TrustGate, TrustGateError},
};
use rstest::{fixture, rstest};
use tokio_util::sync::CancellationToken;

#[fixture]
fn secure_endpoint() -> BaseEndpoint {
    let uri = RawAddress::from("https://notebooks.example.org/lab")
        .normalize()
        .expect("address should normalize");
    BaseEndpoint::resolve(&uri)
}

#[rstest]
#[case(Scheme::Http, CertificateStatus::Trusted, false, TrustAction::Proceed)]
#[case(Scheme::Http, CertificateStatus::Untrusted, false, TrustAction::Proceed)]
#[case(Scheme::Http, CertificateStatus::Untrusted, true, TrustAction::Proceed)]
#[case(Scheme::Https, CertificateStatus::Trusted, false, TrustAction::Proceed)]
#[case(Scheme::Https, CertificateStatus::Trusted, true, TrustAction::Proceed)]
#[case(Scheme::Https, CertificateStatus::Untrusted, true, TrustAction::AcceptForAttempt)]
#[case(Scheme::Https, CertificateStatus::Untrusted, false, TrustAction::AskUser)]
fn trust_decision_matrix(
    #[case] scheme: Scheme,
    #[case] status: CertificateStatus,
    #[case] allow_unauthorized: bool,
    #[case] expected: TrustAction,
) {
    assert_eq!(decide_trust(scheme, status, allow_unauthorized), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gate_accepts_for_attempt_when_user_accepts(secure_endpoint: BaseEndpoint) {
    let prompt = Arc::new(ScriptedPrompt::new().with_trust_decision(TrustDecision::Accept));
    let gate = TrustGate::new(Arc::clone(&prompt), false);

    let mode = gate
        .evaluate(
            &secure_endpoint,
            CertificateStatus::Untrusted,
            "self signed certificate",
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(mode, Ok(TlsMode::AcceptInvalidCertificates));
    assert_eq!(prompt.trust_requests(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gate_reports_decline(secure_endpoint: BaseEndpoint) {
    let prompt = Arc::new(ScriptedPrompt::new().with_trust_decision(TrustDecision::Decline));
    let gate = TrustGate::new(prompt, false);

    let result = gate
        .evaluate(
            &secure_endpoint,
            CertificateStatus::Untrusted,
            "self signed certificate",
            &CancellationToken::new(),
        )
        .await;

    let error = result.expect_err("decline should stop the attempt");
    assert_eq!(error, TrustGateError::Declined);
    assert_eq!(
        error.into_failure(&secure_endpoint),
        ConnectionFailure::UntrustedCertificateDeclined {
            base_endpoint: secure_endpoint.clone(),
        }
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gate_treats_dismissed_prompt_as_cancellation(secure_endpoint: BaseEndpoint) {
    let prompt = Arc::new(ScriptedPrompt::new().with_dismissed_trust_decision());
    let gate = TrustGate::new(prompt, false);

    let result = gate
        .evaluate(
            &secure_endpoint,
            CertificateStatus::Untrusted,
            "self signed certificate",
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(result, Err(TrustGateError::Cancelled));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn policy_suppresses_the_trust_prompt(secure_endpoint: BaseEndpoint) {
    let prompt = Arc::new(ScriptedPrompt::new());
    let gate = TrustGate::new(Arc::clone(&prompt), true);

    let mode = gate
        .evaluate(
            &secure_endpoint,
            CertificateStatus::Untrusted,
            "self signed certificate",
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(mode, Ok(TlsMode::AcceptInvalidCertificates));
    assert_eq!(prompt.trust_requests(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn held_trust_prompt_yields_to_cancellation(secure_endpoint: BaseEndpoint) {
    let prompt = Arc::new(
        ScriptedPrompt::new()
            .with_trust_decision(TrustDecision::Accept)
            .held(),
    );
    let gate = TrustGate::new(Arc::clone(&prompt), false);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let observer = Arc::clone(&prompt);
    tokio::spawn(async move {
        observer.wait_until_asked().await;
        trigger.cancel();
        observer.release();
    });

    let result = gate
        .evaluate(
            &secure_endpoint,
            CertificateStatus::Untrusted,
            "self signed certificate",
            &cancel,
        )
        .await;

    assert_eq!(result, Err(TrustGateError::Cancelled));
}

#[rstest]
#[case(ResolutionPhase::Start, ResolutionPhase::Normalizing, true)]
#[case(ResolutionPhase::Normalizing, ResolutionPhase::ResolvingEndpoint, true)]
#[case(ResolutionPhase::ResolvingEndpoint, ResolutionPhase::Negotiating, true)]
#[case(ResolutionPhase::Negotiating, ResolutionPhase::TrustGating, true)]
#[case(ResolutionPhase::Negotiating, ResolutionPhase::Succeeded, true)]
#[case(ResolutionPhase::TrustGating, ResolutionPhase::Succeeded, true)]
#[case(
    ResolutionPhase::Normalizing,
    ResolutionPhase::Failed(FailureKind::MalformedAddress),
    true
)]
#[case(
    ResolutionPhase::TrustGating,
    ResolutionPhase::Failed(FailureKind::UntrustedCertificateDeclined),
    true
)]
#[case(ResolutionPhase::Start, ResolutionPhase::Negotiating, false)]
#[case(ResolutionPhase::TrustGating, ResolutionPhase::Negotiating, false)]
#[case(ResolutionPhase::ResolvingEndpoint, ResolutionPhase::Succeeded, false)]
#[case(ResolutionPhase::Succeeded, ResolutionPhase::Normalizing, false)]
#[case(
    ResolutionPhase::Failed(FailureKind::Cancelled),
    ResolutionPhase::Failed(FailureKind::Cancelled),
    false
)]
fn phase_transition_matrix(
    #[case] from: ResolutionPhase,
    #[case] to: ResolutionPhase,
    #[case] allowed: bool,
) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[rstest]
fn trail_records_phases_in_order() {
    let mut trail = ResolutionTrail::new();

    for phase in [
        ResolutionPhase::Normalizing,
        ResolutionPhase::ResolvingEndpoint,
        ResolutionPhase::Negotiating,
        ResolutionPhase::Succeeded,
    ] {
        trail.advance(phase).expect("forward transition should succeed");
    }

    assert_eq!(trail.current(), ResolutionPhase::Succeeded);
    assert!(!trail.visited(ResolutionPhase::TrustGating));
    assert_eq!(trail.phases().len(), 5);
}

#[rstest]
fn trail_rejects_leaving_a_terminal_phase() {
    let mut trail = ResolutionTrail::new();
    trail
        .advance(ResolutionPhase::Failed(FailureKind::Cancelled))
        .expect("start may fail");

    let result = trail.advance(ResolutionPhase::Normalizing);

    assert!(result.is_err());
    assert_eq!(
        trail.current(),
        ResolutionPhase::Failed(FailureKind::Cancelled)
    );
}
