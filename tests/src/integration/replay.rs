//! # Replay Scenarios
//!
//! A re-established subscription can redeliver historical notifications as
//! if they were live. The watermark is the only thing standing between
//! that and silent double counting.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gov_feed::ChainNotification;
    use gov_mirror::{MirrorApi, MirrorConfig, MirrorService, MockGovernor, MockStore, VoteTally};
    use gov_types::U256;

    use crate::integration::fixtures::{
        created_notification, init_tracing, payload, payload_id, vote_notification, CHAIN,
    };

    #[tokio::test]
    async fn test_everything_dropped_while_watermark_unset() {
        init_tracing();
        let governor = Arc::new(MockGovernor::new());
        // Head query fails: the watermark stays unset
        governor.set_fail(true);
        let store = Arc::new(MockStore::new());
        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;
        governor.set_fail(false);

        service
            .handle_notification(created_notification("early", 10))
            .await;
        service
            .handle_notification(vote_notification([0xaa; 32], 1, 5, 11))
            .await;
        assert!(service.snapshot().is_empty());
        assert!(!service.is_live());

        // The first block header is itself a height observation
        service
            .handle_notification(ChainNotification::NewBlock { number: 12 })
            .await;
        assert!(service.is_live());
        assert_eq!(service.watermark(), Some(12));
    }

    #[tokio::test]
    async fn test_historical_redelivery_is_dropped() {
        init_tracing();
        let governor = Arc::new(MockGovernor::new());
        governor.set_head(100);
        let store = Arc::new(MockStore::new());
        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;
        governor.set_fail(true);

        // Redelivered history from before the session started
        service
            .handle_notification(created_notification("historical", 99))
            .await;
        assert!(service.snapshot().is_empty());

        // The boundary itself and anything after it are live
        service
            .handle_notification(created_notification("live", 100))
            .await;
        assert_eq!(service.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_watermark_advances_with_blocks() {
        init_tracing();
        let governor = Arc::new(MockGovernor::new());
        governor.set_head(100);
        let store = Arc::new(MockStore::new());
        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;
        governor.set_fail(true);

        service
            .handle_notification(ChainNotification::NewBlock { number: 110 })
            .await;
        assert_eq!(service.watermark(), Some(110));

        // An event from the gap is now behind the boundary
        service
            .handle_notification(created_notification("stale", 105))
            .await;
        assert!(service.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_same_height_duplicate_drifts_then_resync_corrects() {
        // The boundary is inclusive, so a duplicate at exactly the
        // watermark height folds twice locally. That drift is bounded: the
        // next authoritative read replaces the tally wholesale.
        init_tracing();
        let governor = Arc::new(MockGovernor::new());
        governor.set_head(100);
        let store = Arc::new(MockStore::new());
        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;
        governor.set_fail(true);

        let id = payload_id(&payload("dup"));
        service
            .handle_notification(created_notification("dup", 100))
            .await;
        service
            .handle_notification(vote_notification(id, 1, 5, 100))
            .await;
        service
            .handle_notification(vote_notification(id, 1, 5, 100))
            .await;
        assert_eq!(
            service.proposal(&id).unwrap().tally.unwrap().for_votes,
            U256::from(10u64)
        );

        governor.set_fail(false);
        governor.set_votes(
            id,
            VoteTally::new(U256::zero(), U256::from(5u64), U256::zero()),
        );
        governor.set_state(id, gov_mirror::ProposalState::Active);
        service
            .handle_notification(ChainNotification::NewBlock { number: 101 })
            .await;
        assert_eq!(
            service.proposal(&id).unwrap().tally.unwrap().for_votes,
            U256::from(5u64)
        );
    }
}
