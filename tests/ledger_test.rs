//! Store properties that only show up under concurrent access, checked on
//! both backends

use std::sync::Arc;

use tempfile::TempDir;

use pointsboard::ledger::{
    ErrorKind, FjallTopicStore, Ledger, MemoryTopicStore, NewTopic, PointsAward, TopicField,
    TopicStore,
};

/// Each backend under test; the temp dir keeps the fjall files alive
fn backends() -> Vec<(&'static str, Arc<dyn TopicStore>, Option<TempDir>)> {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let fjall: Arc<dyn TopicStore> = Arc::new(
        FjallTopicStore::open(temp_dir.path().join("ledger")).expect("Failed to open fjall store"),
    );
    let memory: Arc<dyn TopicStore> = Arc::new(MemoryTopicStore::new());

    vec![("memory", memory, None), ("fjall", fjall, Some(temp_dir))]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_has_one_winner() {
    for (backend, store, _guard) in backends() {
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let topic = NewTopic::builder()
                    .name("race")
                    .list_hidden(i % 2 == 0)
                    .build();
                store.create_topic(topic).await
            }));
        }

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => created += 1,
                Err(err) => assert_eq!(err.kind(), ErrorKind::AlreadyExists, "{backend}"),
            }
        }
        assert_eq!(created, 1, "{backend}: exactly one create must win");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_awards_are_not_lost() {
    for (backend, store, _guard) in backends() {
        store
            .create_topic(NewTopic::builder().name("coffee").build())
            .await
            .unwrap();

        let users = ["@ana", "@bob", "@carl"];
        let mut tasks = Vec::new();
        for i in 0..60i64 {
            let store = store.clone();
            let user = users[(i as usize) % users.len()];
            let points = if i % 5 == 0 { -2 } else { 3 };
            tasks.push(tokio::spawn(async move {
                store
                    .award_points("coffee", PointsAward::new(user, "@host", "#general", points))
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let view = store
            .get_topic("coffee", &[TopicField::Totals, TopicField::Details])
            .await
            .unwrap()
            .unwrap();
        let totals = view.totals.unwrap();
        let details = view.details.unwrap();

        assert_eq!(details.len(), 60, "{backend}");
        for user in users {
            let logged: i64 = details
                .iter()
                .filter(|record| record.to == user)
                .map(|record| record.points)
                .sum();
            assert_eq!(totals[user], logged, "{backend}: totals must match the log for {user}");
        }
        assert_eq!(totals.values().sum::<i64>(), 12 * -2 + 48 * 3, "{backend}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hidden_topics_never_listed() {
    for (backend, store, _guard) in backends() {
        let mut tasks = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let topic = NewTopic::builder()
                    .name(format!("topic-{i:02}"))
                    .list_hidden(i % 3 == 0)
                    .build();
                store.create_topic(topic).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut listed = store.list_visible_topics().await.unwrap();
        listed.sort();
        let expected: Vec<String> = (0..20)
            .filter(|i| i % 3 != 0)
            .map(|i| format!("topic-{i:02}"))
            .collect();
        assert_eq!(listed, expected, "{backend}");
    }
}

#[tokio::test]
async fn test_zero_award_is_recorded() {
    for (backend, store, _guard) in backends() {
        let ledger = Ledger::new(store);
        ledger
            .create_topic(NewTopic::builder().name("quiet").build())
            .await
            .unwrap();

        let audit = ledger
            .award_points("quiet", PointsAward::new("@ana", "@bob", "#c", 0))
            .await
            .unwrap();
        assert_eq!(audit.points, 0);

        let view = ledger
            .get_topic("quiet", &[TopicField::Totals, TopicField::Details])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.totals.unwrap()["@ana"], 0, "{backend}");
        assert_eq!(view.details.unwrap().len(), 1, "{backend}");
    }
}

#[tokio::test]
async fn test_award_to_missing_topic_writes_nothing() {
    for (backend, store, _guard) in backends() {
        let err = store
            .award_points("ghost", PointsAward::new("@ana", "@bob", "#c", 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "{backend}");
        assert!(store.get_topic("ghost", &TopicField::ALL).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_invalid_names_rejected_and_flush() {
    for (backend, store, _guard) in backends() {
        for name in ["", "two words", "a\0b"] {
            let err = store
                .create_topic(NewTopic::builder().name(name).build())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{backend}: {name:?}");
        }

        let ledger = Ledger::new(store);
        ledger
            .create_topic(NewTopic::builder().name("coffee").build())
            .await
            .unwrap();
        ledger.flush().await.unwrap();
        assert_eq!(ledger.list_visible_topics().await.unwrap(), vec!["coffee"], "{backend}");
    }
}
