//! Store contract tests, run against every backend.

mod helpers;

use helpers::{at, backends};
use license_core::error::ErrorKind;
use license_entity::license::{CreateLicense, License};

#[tokio::test]
async fn test_create_then_get_returns_record() {
    for b in backends().await {
        b.store
            .create(CreateLicense::new("ABC-123", 42, at(2025, 1, 1)))
            .await
            .unwrap_or_else(|e| panic!("{}: create failed: {e}", b.name));

        let license = b.store.get("ABC-123").await.expect("get");
        assert_eq!(
            license,
            License {
                key: "ABC-123".to_string(),
                owner_user_id: 42,
                expires_at: at(2025, 1, 1),
                is_blocked: false,
            },
            "{}",
            b.name
        );
    }
}

#[tokio::test]
async fn test_duplicate_create_keeps_first_owner() {
    for b in backends().await {
        b.store
            .create(CreateLicense::new("ABC-123", 42, at(2025, 1, 1)))
            .await
            .expect("create");

        let err = b
            .store
            .create(CreateLicense::new("ABC-123", 99, at(2026, 1, 1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateKey, "{}", b.name);

        let license = b.store.get("ABC-123").await.expect("get");
        assert_eq!(license.owner_user_id, 42, "{}", b.name);
        assert_eq!(license.expires_at, at(2025, 1, 1), "{}", b.name);
    }
}

#[tokio::test]
async fn test_validity_follows_expiry() {
    for b in backends().await {
        b.store
            .create(CreateLicense::new("ABC-123", 42, at(2025, 1, 1)))
            .await
            .expect("create");

        assert!(b.store.is_valid("ABC-123", at(2024, 6, 1)).await.expect("valid"), "{}", b.name);
        assert!(!b.store.is_valid("ABC-123", at(2025, 6, 1)).await.expect("valid"), "{}", b.name);
    }
}

#[tokio::test]
async fn test_block_invalidates_before_expiry() {
    for b in backends().await {
        b.store
            .create(CreateLicense::new("ABC-123", 42, at(2025, 1, 1)))
            .await
            .expect("create");

        b.store.block("ABC-123").await.expect("block");
        assert!(!b.store.is_valid("ABC-123", at(2024, 6, 1)).await.expect("valid"), "{}", b.name);

        // extending a blocked license does not make it valid again
        b.store
            .extend_expiry("ABC-123", at(2030, 1, 1))
            .await
            .expect("extend");
        for year in [2024, 2026, 2029] {
            assert!(
                !b.store.is_valid("ABC-123", at(year, 1, 1)).await.expect("valid"),
                "{}: valid in {year}",
                b.name
            );
        }

        // blocking twice is a no-op success
        b.store.block("ABC-123").await.expect("block again");
    }
}

#[tokio::test]
async fn test_missing_key_fails_without_side_effects() {
    for b in backends().await {
        let now = at(2024, 6, 1);

        assert_eq!(b.store.get("does-not-exist").await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(
            b.store.is_valid("does-not-exist", now).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
        assert_eq!(b.store.block("does-not-exist").await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(
            b.store
                .extend_expiry("does-not-exist", now)
                .await
                .unwrap_err()
                .kind,
            ErrorKind::NotFound
        );

        // nothing was created by the failed operations
        assert_eq!(b.store.stats(now).await.expect("stats").total, 0, "{}", b.name);
        assert!(b.store.get("does-not-exist").await.is_err());
    }
}

#[tokio::test]
async fn test_malformed_create_is_constraint_violation() {
    for b in backends().await {
        for key in ["", " padded", "tab\tinside"] {
            let err = b
                .store
                .create(CreateLicense::new(key, 42, at(2025, 1, 1)))
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::ConstraintViolation, "{}: {key:?}", b.name);
        }

        let err = b
            .store
            .create(CreateLicense::new("ABC-123", -5, at(2025, 1, 1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConstraintViolation, "{}", b.name);
        assert_eq!(b.store.stats(at(2024, 1, 1)).await.expect("stats").total, 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_has_one_winner() {
    for b in backends().await {
        let mut handles = Vec::new();
        for owner in 1..=8_i64 {
            let store = b.store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create(CreateLicense::new("RACE-1", owner, at(2030, 1, 1)))
                    .await
            }));
        }

        let mut winners = Vec::new();
        for handle in handles {
            match handle.await.expect("join") {
                Ok(license) => winners.push(license),
                Err(e) => assert_eq!(e.kind, ErrorKind::DuplicateKey, "{}", b.name),
            }
        }

        assert_eq!(winners.len(), 1, "{}", b.name);
        let stored = b.store.get("RACE-1").await.expect("get");
        assert_eq!(stored.owner_user_id, winners[0].owner_user_id, "{}", b.name);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_not_torn() {
    for b in backends().await {
        b.store
            .create(CreateLicense::new("HOT", 1, at(2025, 1, 1)))
            .await
            .expect("create");

        let mut handles = Vec::new();
        for year in 2026..2034 {
            let store = b.store.clone();
            handles.push(tokio::spawn(async move {
                store.extend_expiry("HOT", at(year, 1, 1)).await?;
                store.block("HOT").await
            }));
        }
        for handle in handles {
            handle.await.expect("join").expect("update");
        }

        let license = b.store.get("HOT").await.expect("get");
        assert!(license.is_blocked, "{}", b.name);
        assert!(
            (2026..2034).any(|year| license.expires_at == at(year, 1, 1)),
            "{}: unexpected expiry {}",
            b.name,
            license.expires_at
        );
    }
}

#[tokio::test]
async fn test_validity_matches_predicate_for_many_records() {
    for b in backends().await {
        let checkpoints = [at(2023, 1, 1), at(2024, 6, 1), at(2025, 1, 1), at(2027, 1, 1)];

        for i in 0..24_u32 {
            let key = uuid::Uuid::new_v4().to_string();
            let expires_at = at(2023 + (i % 5) as i32, 1 + i % 12, 1);
            b.store
                .create(CreateLicense::new(key.as_str(), i64::from(i % 3), expires_at))
                .await
                .expect("create");
            if i % 4 == 0 {
                b.store.block(&key).await.expect("block");
            }

            let license = b.store.get(&key).await.expect("get");
            for now in checkpoints {
                let expected = !license.is_blocked && now < license.expires_at;
                assert_eq!(
                    b.store.is_valid(&key, now).await.expect("valid"),
                    expected,
                    "{}: {key} at {now}",
                    b.name
                );
            }
        }

        let stats = b.store.stats(at(2024, 6, 1)).await.expect("stats");
        assert_eq!(stats.total, 24, "{}", b.name);
        assert_eq!(stats.blocked, 6, "{}", b.name);
        assert_eq!(stats.active + stats.expired + stats.blocked, stats.total);
    }
}

#[tokio::test]
async fn test_find_by_owner_orders_by_expiry() {
    for b in backends().await {
        for (key, owner, year) in [("A", 7, 2025), ("B", 7, 2027), ("C", 7, 2026), ("D", 8, 2030)] {
            b.store
                .create(CreateLicense::new(key, owner, at(year, 1, 1)))
                .await
                .expect("create");
        }
        b.store.block("B").await.expect("block");

        let keys = |list: Vec<License>| list.into_iter().map(|l| l.key).collect::<Vec<_>>();
        let all = b.store.find_by_owner(7, true).await.expect("all");
        assert_eq!(keys(all), ["B", "C", "A"], "{}", b.name);

        let unblocked = b.store.find_by_owner(7, false).await.expect("unblocked");
        assert_eq!(keys(unblocked), ["C", "A"], "{}", b.name);
    }
}
