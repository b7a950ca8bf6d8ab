//! # Session Scenarios
//!
//! A mirror session is scoped to one chain id. Switching chains tears the
//! registry down, and anything still in flight for the old session must
//! land in the void, not in the new registry.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gov_feed::{ChainFeed, NotificationFilter};
    use gov_mirror::{
        MirrorApi, MirrorConfig, MirrorService, MockGovernor, MockStore, ProposalState, VoteTally,
    };
    use gov_types::U256;

    use crate::integration::fixtures::{
        created_notification, init_tracing, payload, payload_id, CHAIN,
    };

    #[tokio::test]
    async fn test_switch_chain_discards_registry() {
        init_tracing();
        let governor = Arc::new(MockGovernor::new());
        governor.set_head(50);
        let store = Arc::new(MockStore::new());
        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;
        service
            .handle_notification(created_notification("p1", 50))
            .await;
        assert_eq!(service.snapshot().len(), 1);

        service.switch_chain(1);
        assert_eq!(service.chain_id(), 1);
        assert!(service.snapshot().is_empty());
        // The new session has not observed a height yet
        assert!(!service.is_live());
        assert!(service.governor_params().is_none());
    }

    #[tokio::test]
    async fn test_stale_result_discarded_after_switch() {
        init_tracing();
        let governor = Arc::new(MockGovernor::new());
        governor.set_head(50);
        let store = Arc::new(MockStore::new());
        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;

        let id = payload_id(&payload("p1"));
        service
            .handle_notification(created_notification("p1", 50))
            .await;

        // A query goes out under this session...
        let in_flight_token = service.session();

        // ...and the user switches chains before the result lands
        service.switch_chain(1);
        service.bootstrap().await;
        service
            .handle_notification(created_notification("p1", 50))
            .await;

        // The late result must not touch the new session's entry
        service.apply_authoritative(
            in_flight_token,
            id,
            Some(VoteTally::new(
                U256::from(999u64),
                U256::zero(),
                U256::zero(),
            )),
            Some(ProposalState::Executed),
        );

        let entry = service.proposal(&id).unwrap();
        assert_ne!(entry.state, Some(ProposalState::Executed));
        assert!(entry
            .tally
            .as_ref()
            .map_or(true, |t| t.against != U256::from(999u64)));

        // A result carrying the live token applies normally
        service.apply_authoritative(
            service.session(),
            id,
            None,
            Some(ProposalState::Active),
        );
        assert_eq!(
            service.proposal(&id).unwrap().state,
            Some(ProposalState::Active)
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        init_tracing();
        let feed = Arc::new(ChainFeed::new());
        let subscription = feed.subscribe(NotificationFilter::all());
        assert_eq!(feed.subscriber_count(), 1);

        // Teardown is just dropping the handle
        drop(subscription);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
