//! # Mirror Service
//!
//! Application service orchestrating the reconciliation engine: one
//! instance per chain session. Feed notifications come in, get normalized
//! and watermark-filtered, fold into the registry, and every fold schedules
//! the authoritative reads that correct it. Consumers only ever see
//! snapshots.

use std::sync::Arc;

use gov_feed::{ChainNotification, Subscription};
use gov_types::{shorten_hex, to_hex0x, BlockNumber, ChainId, ProposalId, ProposalRecord};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::algorithms::normalize::{normalize, NormalizedNotification};
use crate::algorithms::proposal_id::{hash_description, hash_proposal};
use crate::config::MirrorConfig;
use crate::domain::entities::Proposal;
use crate::domain::errors::MirrorError;
use crate::domain::events::GovernorEvent;
use crate::domain::registry::ProposalRegistry;
use crate::domain::value_objects::{GovernorParams, ProposalState, VoteTally, Watermark};
use crate::ports::inbound::MirrorApi;
use crate::ports::outbound::{GovernorReader, ProposalStore};

/// Identifies one chain session of the mirror.
///
/// Captured when an authoritative query is issued and compared again when
/// its result is applied: a result that arrives after a chain or account
/// switch carries a stale token and is discarded instead of corrupting the
/// new session's registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionToken(Uuid);

impl SessionToken {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Mirror service - orchestrates reconciliation for one chain session.
pub struct MirrorService<G: GovernorReader, S: ProposalStore> {
    /// Configuration.
    config: MirrorConfig,
    /// Authoritative read surface.
    governor: Arc<G>,
    /// Persistence gateway.
    store: Arc<S>,
    /// The proposal registry (sole writer: this service).
    registry: ProposalRegistry,
    /// Replay boundary.
    watermark: Watermark,
    /// Governor parameters, once read.
    params: Option<GovernorParams>,
    /// Current session token.
    session: SessionToken,
    /// Snapshot channel for consumers.
    snapshots: watch::Sender<Vec<Proposal>>,
}

impl<G: GovernorReader, S: ProposalStore> MirrorService<G, S> {
    /// Create a service for one chain session.
    #[must_use]
    pub fn new(chain_id: ChainId, config: MirrorConfig, governor: Arc<G>, store: Arc<S>) -> Self {
        let registry = ProposalRegistry::new(chain_id, config.max_placeholders);
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            config,
            governor,
            store,
            registry,
            watermark: Watermark::unset(),
            params: None,
            session: SessionToken::fresh(),
            snapshots,
        }
    }

    /// The current session token.
    #[must_use]
    pub fn session(&self) -> SessionToken {
        self.session
    }

    /// Subscribe to registry snapshots. The receiver holds the latest
    /// snapshot and is updated after every merge.
    #[must_use]
    pub fn subscribe_snapshots(&self) -> watch::Receiver<Vec<Proposal>> {
        self.snapshots.subscribe()
    }

    /// Tear down the current session and start one for another chain.
    ///
    /// The registry, watermark and parameters are discarded; the session
    /// token rotates so that any still-in-flight authoritative result for
    /// the old chain is dropped at apply time.
    pub fn switch_chain(&mut self, chain_id: ChainId) {
        info!(
            from = self.registry.chain_id(),
            to = chain_id,
            "Switching chain session"
        );
        self.registry = ProposalRegistry::new(chain_id, self.config.max_placeholders);
        self.watermark = Watermark::unset();
        self.params = None;
        self.session = SessionToken::fresh();
        self.publish_snapshot();
    }

    /// Bootstrap the session: observe the chain head, read governor
    /// parameters, merge persisted records, and run a full reconciliation
    /// pass.
    ///
    /// Every step is best-effort. A failed head query leaves the watermark
    /// unset (incoming events are dropped until a block header supplies a
    /// height); failed parameter reads leave them unknown; a failed load
    /// serves event-derived state only.
    pub async fn bootstrap(&mut self) {
        match self.governor.block_number().await {
            Ok(head) => {
                self.watermark.observe(head);
                debug!(head, "Watermark initialized from head query");
            }
            Err(e) => warn!(error = %e, "Head query failed, watermark stays unset"),
        }

        self.params = self.read_params().await;

        let chain_id = self.registry.chain_id();
        match self.store.load(chain_id).await {
            Ok(records) => {
                let stats = self.registry.merge_records(records);
                debug!(
                    merged = stats.merged,
                    skipped = stats.skipped,
                    "Merged persisted records"
                );
            }
            Err(e) => warn!(error = %e, "Persisted load failed, serving event-derived state only"),
        }

        self.full_resync().await;
        self.publish_snapshot();
    }

    /// Handle one raw feed notification.
    pub async fn handle_notification(&mut self, notification: ChainNotification) {
        let normalized = match normalize(notification) {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "Dropping malformed notification");
                return;
            }
        };

        match normalized {
            NormalizedNotification::NewHead(height) => {
                let first = !self.watermark.is_set();
                self.watermark.observe(height);
                if first {
                    debug!(height, "Watermark initialized from block header");
                }
                if self.config.resync_on_new_block {
                    self.full_resync().await;
                }
                self.publish_snapshot();
            }
            NormalizedNotification::Event(event) => {
                let height = event.block_number();
                if !self.watermark.accepts(height) {
                    debug!(
                        height,
                        watermark = ?self.watermark.get(),
                        "Dropping replayed or pre-watermark event"
                    );
                    return;
                }

                if let GovernorEvent::Created { id, payload, .. } = &event {
                    info!(
                        proposal = %shorten_hex(&to_hex0x(id)),
                        description = %payload.description,
                        "Proposal added"
                    );
                }

                let id = self.registry.apply_event(&event);
                // Make the local fold visible immediately; the resync below
                // corrects it as soon as the authoritative reads land.
                self.publish_snapshot();
                self.resync_proposal(id).await;
                self.publish_snapshot();
            }
        }
    }

    /// Drive the service from a feed subscription until the feed closes.
    ///
    /// Dropping the subscription (or the feed) is the normal teardown path;
    /// in-flight authoritative queries are not cancelled, their results are
    /// discarded by the session-token check if a switch happened meanwhile.
    pub async fn run(&mut self, mut subscription: Subscription) {
        while let Some(notification) = subscription.recv().await {
            self.handle_notification(notification).await;
        }
        debug!("Chain feed closed, run loop ending");
    }

    /// Issue the authoritative reads for one proposal and apply them.
    ///
    /// Each read fails independently; a failure keeps the cached value and
    /// the next trigger retries. Nothing propagates to the caller.
    pub async fn resync_proposal(&mut self, id: ProposalId) {
        let token = self.session;

        let votes = match self.governor.proposal_votes(id).await {
            Ok(votes) => Some(votes),
            Err(e) => {
                warn!(
                    proposal = %shorten_hex(&to_hex0x(&id)),
                    error = %e,
                    "Tally query failed, keeping cached value"
                );
                None
            }
        };

        let state = match self.governor.proposal_state(id).await {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(
                    proposal = %shorten_hex(&to_hex0x(&id)),
                    error = %e,
                    "State query failed, keeping cached value"
                );
                None
            }
        };

        self.apply_authoritative(token, id, votes, state);
    }

    /// Apply authoritative read results as unconditional overwrites.
    ///
    /// `token` must be the session token captured when the queries were
    /// issued. A stale token means the session was torn down or switched
    /// while the queries were in flight; the results are discarded.
    pub fn apply_authoritative(
        &mut self,
        token: SessionToken,
        id: ProposalId,
        votes: Option<VoteTally>,
        state: Option<ProposalState>,
    ) {
        if token != self.session {
            debug!(
                proposal = %shorten_hex(&to_hex0x(&id)),
                "Discarding authoritative result from a stale session"
            );
            return;
        }
        if let Some(tally) = votes {
            self.registry.apply_votes(&id, tally);
        }
        if let Some(state) = state {
            self.registry.apply_state(&id, state);
        }
    }

    /// Full reconciliation pass: authoritative reads for every known
    /// proposal. Failures are independent per proposal and per read.
    pub async fn full_resync(&mut self) {
        for id in self.registry.ids() {
            self.resync_proposal(id).await;
        }
    }

    /// Register a freshly-submitted proposal: validate, append to the
    /// persistence gateway, and merge into the registry.
    ///
    /// The same proposal arriving later as a `Created` event collapses
    /// into this entry by id.
    ///
    /// # Errors
    /// - [`MirrorError::InvalidRecord`] on a shape violation
    /// - [`MirrorError::ChainMismatch`] for a record from another chain
    /// - [`MirrorError::RecordIdMismatch`] when the carried id is wrong
    /// - [`MirrorError::StoreFailed`] when the gateway append fails
    pub async fn register_proposal(&mut self, record: ProposalRecord) -> Result<(), MirrorError> {
        record.validate()?;

        let chain_id = self.registry.chain_id();
        if record.chain_id != chain_id {
            return Err(MirrorError::ChainMismatch {
                expected: chain_id,
                got: record.chain_id,
            });
        }

        let expected = hash_proposal(
            &record.targets,
            &record.values,
            &record.calldatas,
            &hash_description(&record.description),
        );
        if expected != record.id {
            return Err(MirrorError::RecordIdMismatch {
                expected: to_hex0x(&expected),
                got: to_hex0x(&record.id),
            });
        }

        self.store.append(chain_id, &record).await?;
        self.registry.merge_record(record)?;
        self.publish_snapshot();
        Ok(())
    }

    fn publish_snapshot(&self) {
        self.snapshots.send_replace(self.registry.snapshot());
    }
}

impl<G: GovernorReader, S: ProposalStore> MirrorApi for MirrorService<G, S> {
    fn snapshot(&self) -> Vec<Proposal> {
        self.registry.snapshot()
    }

    fn proposal(&self, id: &ProposalId) -> Option<Proposal> {
        self.registry.get(id).cloned()
    }

    fn watermark(&self) -> Option<BlockNumber> {
        self.watermark.get()
    }

    fn chain_id(&self) -> ChainId {
        self.registry.chain_id()
    }

    fn governor_params(&self) -> Option<GovernorParams> {
        self.params
    }

    fn is_live(&self) -> bool {
        self.watermark.is_set()
    }
}

impl<G: GovernorReader, S: ProposalStore> MirrorService<G, S> {
    async fn read_params(&self) -> Option<GovernorParams> {
        let voting_delay = self.governor.voting_delay().await;
        let voting_period = self.governor.voting_period().await;
        let min_execution_delay = self.governor.min_execution_delay().await;

        match (voting_delay, voting_period, min_execution_delay) {
            (Ok(voting_delay), Ok(voting_period), Ok(min_execution_delay)) => {
                Some(GovernorParams {
                    voting_delay,
                    voting_period,
                    min_execution_delay,
                })
            }
            _ => {
                warn!("Governor parameter reads failed, parameters stay unknown");
                None
            }
        }
    }
}
