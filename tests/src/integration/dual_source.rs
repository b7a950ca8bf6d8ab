//! # Dual-Source Merge Scenarios
//!
//! The persistence gateway and the event feed describe the same proposals
//! and are only eventually consistent with each other. Whichever source
//! arrives first, the registry must end up with exactly one entry per id,
//! immutable fields intact.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gov_mirror::{FileStore, MirrorApi, MirrorConfig, MirrorService, MockGovernor};
    use gov_types::U256;

    use crate::integration::fixtures::{
        created_notification, init_tracing, payload, payload_id, record, vote_notification, CHAIN,
    };

    fn file_store(dir: &tempfile::TempDir) -> Arc<FileStore> {
        Arc::new(FileStore::new(dir.path().join("proposals.json")))
    }

    #[tokio::test]
    async fn test_persisted_first_then_event() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        let governor = Arc::new(MockGovernor::new());
        governor.set_head(50);

        // The record is persisted before the mirror ever connects
        use gov_mirror::ProposalStore;
        store.append(CHAIN, &record("shared", CHAIN)).await.unwrap();

        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;
        assert_eq!(service.snapshot().len(), 1);

        // The same proposal then arrives as a live event
        service
            .handle_notification(created_notification("shared", 50))
            .await;

        let snapshot = service.snapshot();
        assert_eq!(snapshot.len(), 1);
        let entry = &snapshot[0];
        assert_eq!(entry.id, payload_id(&payload("shared")));
        assert_eq!(entry.payload.as_ref().unwrap().description, "shared");
        // The event supplied what persistence cannot know
        assert_eq!(entry.created_at_block, Some(50));
        assert_eq!(entry.proposer, Some([0x01; 20]));
    }

    #[tokio::test]
    async fn test_event_first_then_registration() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        let governor = Arc::new(MockGovernor::new());
        governor.set_head(50);

        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;

        let id = payload_id(&payload("shared"));
        service
            .handle_notification(created_notification("shared", 50))
            .await;
        service
            .handle_notification(vote_notification(id, 2, 3, 51))
            .await;

        // The submission path registers the same proposal afterwards
        service
            .register_proposal(record("shared", CHAIN))
            .await
            .unwrap();

        let snapshot = service.snapshot();
        assert_eq!(snapshot.len(), 1);
        // The folded tally survived the record merge
        assert_eq!(
            snapshot[0].tally.as_ref().unwrap().abstain,
            U256::from(3u64)
        );

        // And the record actually reached the file
        use gov_mirror::ProposalStore;
        let persisted = store.load(CHAIN).await.unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, id);
    }

    #[tokio::test]
    async fn test_bootstrap_skips_foreign_and_broken_records() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        let governor = Arc::new(MockGovernor::new());
        governor.set_head(50);

        use gov_mirror::ProposalStore;
        // A record for another chain filed under this chain's key
        store.append(CHAIN, &record("foreign", 1)).await.unwrap();
        // A record whose id does not match its fields
        let mut forged = record("forged", CHAIN);
        forged.id = [0xff; 32];
        store.append(CHAIN, &forged).await.unwrap();
        // And one good record
        store.append(CHAIN, &record("good", CHAIN)).await.unwrap();

        let mut service = MirrorService::new(
            CHAIN,
            MirrorConfig::default(),
            governor.clone(),
            store.clone(),
        );
        service.bootstrap().await;

        let snapshot = service.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].payload.as_ref().unwrap().description, "good");
    }
}
