//! # End-to-End Pipeline
//!
//! The whole system wired together: a simulated chain publishing to the
//! feed, the mirror running its subscription loop on another task, and a
//! consumer watching snapshots converge through a proposal's life.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::watch;
    use tokio::time::timeout;

    use gov_feed::{ChainFeed, NotificationFilter};
    use gov_mirror::{
        MirrorConfig, MirrorService, MockStore, Proposal, ProposalState, SimGovernor, VoteSupport,
        VoteTally,
    };
    use gov_types::U256;

    use crate::integration::fixtures::{init_tracing, payload, CHAIN};

    /// Wait until the snapshot channel satisfies a predicate.
    async fn wait_until(
        snapshots: &mut watch::Receiver<Vec<Proposal>>,
        pred: impl Fn(&[Proposal]) -> bool,
    ) {
        timeout(Duration::from_secs(5), async {
            loop {
                let snapshot = snapshots.borrow_and_update().clone();
                if pred(&snapshot) {
                    return;
                }
                snapshots
                    .changed()
                    .await
                    .expect("snapshot channel closed before condition was met");
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_proposal_lifecycle_converges_end_to_end() {
        init_tracing();

        let feed = Arc::new(ChainFeed::new());
        let sim = Arc::new(SimGovernor::new(feed.clone()));
        let store = Arc::new(MockStore::new());

        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            sim.clone(),
            store.clone(),
        );
        let mut snapshots = service.subscribe_snapshots();

        // Subscribe before anything is published, then hand the loop off
        let subscription = feed.subscribe(NotificationFilter::all());
        let runner = tokio::spawn(async move {
            service.bootstrap().await;
            service.run(subscription).await;
        });

        // A proposal is born
        sim.mine_block().await;
        let id = sim.submit_proposal([0x01; 20], payload("end to end")).await;
        wait_until(&mut snapshots, |snapshot| {
            snapshot
                .iter()
                .any(|p| p.id == id && p.state == Some(ProposalState::Pending))
        })
        .await;

        // Votes come in; the authoritative tally counts more weight than
        // the events carry (eligibility rules the mirror cannot see)
        sim.cast_vote([0x02; 20], id, VoteSupport::For, U256::from(5u64))
            .await;
        sim.force_votes(
            id,
            VoteTally::new(U256::zero(), U256::from(7u64), U256::zero()),
        );
        sim.force_state(id, ProposalState::Active);
        sim.mine_block().await;

        wait_until(&mut snapshots, |snapshot| {
            snapshot.iter().any(|p| {
                p.id == id
                    && p.state == Some(ProposalState::Active)
                    && p.tally.as_ref().map(|t| t.for_votes) == Some(U256::from(7u64))
            })
        })
        .await;

        // Queued, then executed
        sim.queue_proposal(id).await;
        wait_until(&mut snapshots, |snapshot| {
            snapshot
                .iter()
                .any(|p| p.id == id && p.state == Some(ProposalState::Queued))
        })
        .await;

        sim.execute_proposal(id).await;
        wait_until(&mut snapshots, |snapshot| {
            snapshot
                .iter()
                .any(|p| p.id == id && p.state == Some(ProposalState::Executed))
        })
        .await;

        runner.abort();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_run_loop_ends_when_feed_closes() {
        init_tracing();

        let feed = ChainFeed::new();
        let sim = Arc::new(SimGovernor::new(Arc::new(ChainFeed::new())));
        let store = Arc::new(MockStore::new());

        let subscription = feed.subscribe(NotificationFilter::all());
        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            sim.clone(),
            store.clone(),
        );

        let runner = tokio::spawn(async move {
            service.run(subscription).await;
        });

        // Dropping the feed closes every subscription
        drop(feed);
        timeout(Duration::from_secs(1), runner)
            .await
            .expect("run loop did not end")
            .expect("run loop panicked");
    }
}
