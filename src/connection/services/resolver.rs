//! Connection orchestration and the command surface.

use super::{
    CredentialNegotiator, NegotiationError, ResolverConfig, TrustGate,
    cancellation::until_cancelled,
};
use crate::connection::{
    domain::{
        BaseEndpoint, CertificateStatus, CommandDescriptor, ConnectionFailure, ConnectionOutcome,
        Credentials, RawAddress, ResolutionPhase, ResolutionTrail, ResolvedServer,
        ServerProviderHandle, TlsMode,
    },
    ports::{ConnectionPrompt, CredentialStore, NotebookServerApi, ServerEntry, ServerNaming},
};
use secrecy::SecretString;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Outcome of one attempt together with the phases it went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionReport {
    outcome: ConnectionOutcome,
    trail: ResolutionTrail,
}

impl ResolutionReport {
    /// Returns the terminal outcome.
    #[must_use]
    pub const fn outcome(&self) -> &ConnectionOutcome {
        &self.outcome
    }

    /// Returns the phase trail.
    #[must_use]
    pub const fn trail(&self) -> &ResolutionTrail {
        &self.trail
    }

    /// Hands the outcome to the caller.
    #[must_use]
    pub fn into_outcome(self) -> ConnectionOutcome {
        self.outcome
    }
}

/// Resolves raw addresses into provider handles.
///
/// Attempts share nothing but the collaborators, so one resolver can serve
/// concurrent attempts.
pub struct ConnectionResolver<A, P, N, S>
where
    A: NotebookServerApi,
    P: ConnectionPrompt,
    N: ServerNaming,
    S: CredentialStore,
{
    negotiator: CredentialNegotiator<A, P>,
    trust_gate: TrustGate<P>,
    naming: Arc<N>,
    store: Arc<S>,
    config: ResolverConfig,
}

impl<A, P, N, S> ConnectionResolver<A, P, N, S>
where
    A: NotebookServerApi,
    P: ConnectionPrompt,
    N: ServerNaming,
    S: CredentialStore,
{
    /// Creates a resolver.
    #[must_use]
    pub fn new(
        api: Arc<A>,
        prompt: Arc<P>,
        naming: Arc<N>,
        store: Arc<S>,
        config: ResolverConfig,
    ) -> Self {
        let trust_gate = TrustGate::new(Arc::clone(&prompt), config.allow_unauthorized_connections);
        Self {
            negotiator: CredentialNegotiator::new(api, prompt),
            trust_gate,
            naming,
            store,
            config,
        }
    }

    /// Returns the resolver configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Lists the commands available for `raw`.
    ///
    /// A parseable address yields one connect command; blank or malformed
    /// input yields none.
    #[must_use]
    #[expect(
        clippy::unused_self,
        reason = "the command surface is exposed on the resolver instance"
    )]
    pub fn provide_commands(&self, raw: &RawAddress) -> Vec<CommandDescriptor> {
        raw.normalize().map_or_else(
            |_| Vec::new(),
            |uri| {
                vec![CommandDescriptor::connect(
                    raw.clone(),
                    &BaseEndpoint::resolve(&uri),
                )]
            },
        )
    }

    /// Runs the attempt a command describes.
    pub async fn handle_command(
        &self,
        descriptor: &CommandDescriptor,
        cancel: &CancellationToken,
    ) -> ConnectionOutcome {
        self.resolve(descriptor.address(), cancel).await
    }

    /// Resolves `raw` and returns the terminal outcome.
    pub async fn resolve(&self, raw: &RawAddress, cancel: &CancellationToken) -> ConnectionOutcome {
        self.attempt(raw, cancel).await.into_outcome()
    }

    /// Resolves `raw` and reports the outcome with its phase trail.
    pub async fn attempt(&self, raw: &RawAddress, cancel: &CancellationToken) -> ResolutionReport {
        let mut trail = ResolutionTrail::new();
        let result = self.run(raw, cancel, &mut trail).await;
        let terminal = match &result {
            Ok(_) => ResolutionPhase::Succeeded,
            Err(failure) => ResolutionPhase::Failed(failure.kind()),
        };
        enter(&mut trail, terminal);
        log_outcome(&result);

        ResolutionReport {
            outcome: ConnectionOutcome::from(result),
            trail,
        }
    }

    async fn run(
        &self,
        raw: &RawAddress,
        cancel: &CancellationToken,
        trail: &mut ResolutionTrail,
    ) -> Result<ResolvedServer, ConnectionFailure> {
        enter(trail, ResolutionPhase::Normalizing);
        let uri = raw.normalize()?;

        enter(trail, ResolutionPhase::ResolvingEndpoint);
        let endpoint = BaseEndpoint::resolve(&uri);
        let token = uri.token().map(|value| SecretString::from(value.to_owned()));

        enter(trail, ResolutionPhase::Negotiating);
        let negotiated = match self
            .negotiator
            .negotiate(&endpoint, token.as_ref(), TlsMode::Verify, cancel)
            .await
        {
            Err(NegotiationError::UntrustedCertificate(detail)) if endpoint.scheme().is_secure() => {
                enter(trail, ResolutionPhase::TrustGating);
                let tls = self
                    .trust_gate
                    .evaluate(&endpoint, CertificateStatus::Untrusted, &detail, cancel)
                    .await
                    .map_err(|err| err.into_failure(&endpoint))?;
                self.negotiator
                    .negotiate(&endpoint, token.as_ref(), tls, cancel)
                    .await
            }
            other => other,
        };
        let credentials = negotiated.map_err(|err| err.into_failure(&endpoint))?;

        self.issue_handle(endpoint, token, &credentials, cancel)
            .await
    }

    async fn issue_handle(
        &self,
        endpoint: BaseEndpoint,
        token: Option<SecretString>,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<ResolvedServer, ConnectionFailure> {
        let display_name =
            until_cancelled(cancel, self.naming.resolve_display_name(&endpoint)).await?;
        if cancel.is_cancelled() {
            return Err(ConnectionFailure::Cancelled);
        }

        // The store write commits the attempt and is not raced.
        let handle = ServerProviderHandle::new(&*self.config.extension_origin, &*display_name);
        let entry = ServerEntry::new(endpoint.clone(), token, &*display_name);
        self.store
            .store(&handle, &entry)
            .await
            .map_err(|err| ConnectionFailure::Storage {
                base_endpoint: endpoint.clone(),
                reason: err.to_string(),
            })?;

        Ok(ResolvedServer::new(
            handle,
            display_name,
            endpoint,
            credentials.method(),
        ))
    }
}

fn enter(trail: &mut ResolutionTrail, phase: ResolutionPhase) {
    let from = trail.current();
    match trail.advance(phase) {
        Ok(()) => debug!(from = %from, to = %phase, "resolution phase transition"),
        Err(err) => error!(error = %err, "resolution phase sequencing violated"),
    }
}

fn log_outcome(result: &Result<ResolvedServer, ConnectionFailure>) {
    match result {
        Ok(resolved) => info!(
            endpoint = %resolved.base_endpoint(),
            handle = %resolved.handle().id(),
            auth = %resolved.auth_method(),
            "notebook server resolved"
        ),
        Err(ConnectionFailure::Cancelled) => debug!("connection attempt cancelled"),
        Err(failure) => warn!(kind = %failure.kind(), error = %failure, "connection attempt failed"),
    }
}
