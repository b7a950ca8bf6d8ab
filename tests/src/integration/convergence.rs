//! # Convergence Scenarios
//!
//! The transport guarantees nothing about delivery order, so the registry
//! must converge to the same state for any permutation of the same event
//! multiset - and to the authoritative values once a resync lands,
//! whatever the local folds said.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    use gov_feed::ChainNotification;
    use gov_mirror::{
        MirrorApi, MirrorConfig, MirrorService, MockGovernor, MockStore, ProposalState, VoteTally,
    };
    use gov_types::U256;

    use crate::integration::fixtures::{
        created_notification, init_tracing, payload, payload_id, vote_notification, CHAIN,
    };

    async fn folded_only_service(
        governor: &Arc<MockGovernor>,
        store: &Arc<MockStore>,
    ) -> MirrorService<MockGovernor, MockStore> {
        governor.set_fail(false);
        governor.set_head(50);
        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;
        // Authoritative reads fail from here on: only the folds remain,
        // which is exactly what this scenario wants to observe.
        governor.set_fail(true);
        service
    }

    #[tokio::test]
    async fn test_vote_permutations_converge() {
        init_tracing();
        let governor = Arc::new(MockGovernor::new());
        let store = Arc::new(MockStore::new());
        let id = payload_id(&payload("permuted"));

        let votes: Vec<ChainNotification> = vec![
            vote_notification(id, 0, 3, 51),
            vote_notification(id, 1, 5, 51),
            vote_notification(id, 1, 2, 52),
            vote_notification(id, 2, 7, 52),
            vote_notification(id, 0, 1, 53),
            vote_notification(id, 2, 4, 53),
        ];

        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        let mut tallies = Vec::new();

        for _ in 0..6 {
            let mut shuffled = votes.clone();
            shuffled.shuffle(&mut rng);

            let mut service = folded_only_service(&governor, &store).await;
            service
                .handle_notification(created_notification("permuted", 50))
                .await;
            for vote in shuffled {
                service.handle_notification(vote).await;
            }
            tallies.push(service.proposal(&id).unwrap().tally.unwrap());
        }

        let expected = VoteTally::new(U256::from(4u64), U256::from(7u64), U256::from(11u64));
        for tally in tallies {
            assert_eq!(tally, expected);
        }
    }

    #[tokio::test]
    async fn test_authoritative_read_supersedes_any_fold() {
        init_tracing();
        let governor = Arc::new(MockGovernor::new());
        let store = Arc::new(MockStore::new());
        let id = payload_id(&payload("corrected"));

        let mut service = folded_only_service(&governor, &store).await;
        service
            .handle_notification(created_notification("corrected", 50))
            .await;
        service
            .handle_notification(vote_notification(id, 1, 5, 51))
            .await;
        assert_eq!(
            service.proposal(&id).unwrap().tally.unwrap().for_votes,
            U256::from(5u64)
        );

        // The authoritative tally is larger (weight rules the client does
        // not simulate) and the state has resolved to Active.
        governor.set_fail(false);
        governor.set_votes(
            id,
            VoteTally::new(U256::zero(), U256::from(7u64), U256::zero()),
        );
        governor.set_state(id, ProposalState::Active);
        service
            .handle_notification(ChainNotification::NewBlock { number: 52 })
            .await;

        let proposal = service.proposal(&id).unwrap();
        assert_eq!(proposal.tally.unwrap().for_votes, U256::from(7u64));
        assert_eq!(proposal.state, Some(ProposalState::Active));

        // A smaller authoritative value wins just the same.
        governor.set_votes(
            id,
            VoteTally::new(U256::zero(), U256::from(2u64), U256::zero()),
        );
        service
            .handle_notification(ChainNotification::NewBlock { number: 53 })
            .await;
        assert_eq!(
            service.proposal(&id).unwrap().tally.unwrap().for_votes,
            U256::from(2u64)
        );
    }

    #[tokio::test]
    async fn test_fold_and_resync_interleave_in_any_order() {
        init_tracing();
        let governor = Arc::new(MockGovernor::new());
        let store = Arc::new(MockStore::new());
        let id = payload_id(&payload("interleaved"));

        // Authoritative queries succeed the whole time here: every fold is
        // immediately corrected, so intermediate values never stick.
        governor.set_head(50);
        governor.set_state(id, ProposalState::Active);
        governor.set_votes(
            id,
            VoteTally::new(U256::from(10u64), U256::from(20u64), U256::zero()),
        );

        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;
        service
            .handle_notification(created_notification("interleaved", 50))
            .await;
        service
            .handle_notification(vote_notification(id, 0, 999, 51))
            .await;

        let proposal = service.proposal(&id).unwrap();
        assert_eq!(
            proposal.tally.unwrap(),
            VoteTally::new(U256::from(10u64), U256::from(20u64), U256::zero())
        );
    }
}
