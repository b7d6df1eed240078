// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login code and session lifecycle against SQLite with a manual clock.

use std::sync::Arc;
use std::time::Duration;

use helpline_auth::AdminSessionAuthority;
use helpline_config::model::AdminConfig;
use helpline_core::{AuthError, HelplineError, ManualClock, StorageAdapter};
use helpline_storage::SqliteStorage;
use helpline_test_utils::MockChannel;

const START: i64 = 1_772_400_000_000;

struct Fixture {
    authority: AdminSessionAuthority,
    channel: Arc<MockChannel>,
    clock: Arc<ManualClock>,
    storage: Arc<SqliteStorage>,
}

async fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::new(START));
    let storage = Arc::new(SqliteStorage::in_memory(clock.clone()).await.unwrap());
    let channel = Arc::new(MockChannel::new());
    let authority = AdminSessionAuthority::new(
        storage.clone(),
        channel.clone(),
        clock.clone(),
        AdminConfig::default(),
        Duration::from_secs(1),
    );
    Fixture {
        authority,
        channel,
        clock,
        storage,
    }
}

fn auth_error(err: HelplineError) -> AuthError {
    match err {
        HelplineError::Auth(e) => e,
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn code_login_yields_a_working_session() {
    let f = fixture().await;
    assert!(f.authority.request_code("admin").await.unwrap());
    let code = f.channel.last_code().await.unwrap();

    let session = f.authority.verify_code("admin", &code).await.unwrap();
    assert_eq!(session.admin_id, "admin");
    assert_eq!(session.expires - session.created, 24 * 60 * 60 * 1000);

    let verified = f.authority.verify_session(&session.token).await.unwrap();
    assert_eq!(verified.admin_id, "admin");

    // Only the digest is persisted.
    assert!(f.storage.get_session(&session.token).await.unwrap().is_none());
}

#[tokio::test]
async fn code_is_single_use() {
    let f = fixture().await;
    f.authority.request_code("admin").await.unwrap();
    let code = f.channel.last_code().await.unwrap();
    f.authority.verify_code("admin", &code).await.unwrap();

    let err = f.authority.verify_code("admin", &code).await.unwrap_err();
    assert_eq!(auth_error(err), AuthError::CodeNotFound);
}

#[tokio::test]
async fn code_expires_after_five_minutes() {
    let f = fixture().await;
    f.authority.request_code("admin").await.unwrap();
    let code = f.channel.last_code().await.unwrap();

    f.clock.advance(Duration::from_secs(6 * 60));
    let err = f.authority.verify_code("admin", &code).await.unwrap_err();
    assert_eq!(auth_error(err), AuthError::CodeExpired);

    // The expired code is gone.
    let err = f.authority.verify_code("admin", &code).await.unwrap_err();
    assert_eq!(auth_error(err), AuthError::CodeNotFound);
}

#[tokio::test]
async fn new_request_replaces_pending_code() {
    let f = fixture().await;
    f.authority.request_code("admin").await.unwrap();
    let first = f.channel.last_code().await.unwrap();
    f.authority.request_code("admin").await.unwrap();
    let second = f.channel.last_code().await.unwrap();

    let pending = f.storage.get_code("admin").await.unwrap().unwrap();
    assert_eq!(pending.code, second);
    if first != second {
        let err = f.authority.verify_code("admin", &first).await.unwrap_err();
        assert_eq!(auth_error(err), AuthError::CodeMismatch);
    }
}

#[tokio::test]
async fn too_many_mismatches_discard_the_code() {
    let f = fixture().await;
    f.authority.request_code("admin").await.unwrap();
    let code = f.channel.last_code().await.unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    for _ in 0..AdminConfig::default().max_code_attempts {
        let err = f.authority.verify_code("admin", wrong).await.unwrap_err();
        assert_eq!(auth_error(err), AuthError::CodeMismatch);
    }
    let err = f.authority.verify_code("admin", &code).await.unwrap_err();
    assert_eq!(auth_error(err), AuthError::CodeNotFound);
}

#[tokio::test]
async fn unknown_identity_is_unauthorized() {
    let f = fixture().await;
    let err = f.authority.request_code("mallory").await.unwrap_err();
    assert!(matches!(err, HelplineError::Unauthorized(_)));
    assert_eq!(f.channel.sent_count().await, 0);
}

#[tokio::test]
async fn failed_push_reports_false_and_leaves_no_code() {
    let f = fixture().await;
    f.channel.set_failing(true);
    assert!(!f.authority.request_code("admin").await.unwrap());
    assert!(f.storage.get_code("admin").await.unwrap().is_none());
}

#[tokio::test]
async fn sessions_expire_after_fixed_ttl() {
    let f = fixture().await;
    let session = f.authority.issue_channel_session().await.unwrap();

    f.clock.advance(Duration::from_secs(23 * 60 * 60));
    assert!(f.authority.verify_session(&session.token).await.is_ok());

    // Still valid at the expiry millisecond itself.
    f.clock.set(session.expires);
    assert!(f.authority.verify_session(&session.token).await.is_ok());

    f.clock.set(session.expires + 1);
    let err = f.authority.verify_session(&session.token).await.unwrap_err();
    assert_eq!(auth_error(err), AuthError::SessionExpired);

    let err = f.authority.verify_session(&session.token).await.unwrap_err();
    assert_eq!(auth_error(err), AuthError::SessionNotFound);
}

#[tokio::test]
async fn code_is_accepted_at_its_expiry_millisecond() {
    let f = fixture().await;
    f.authority.request_code("admin").await.unwrap();
    let code = f.channel.last_code().await.unwrap();
    let expires = f.storage.get_code("admin").await.unwrap().unwrap().expires;

    f.clock.set(expires);
    assert!(f.authority.verify_code("admin", &code).await.is_ok());
}

#[tokio::test]
async fn code_is_rejected_one_millisecond_after_expiry() {
    let f = fixture().await;
    f.authority.request_code("admin").await.unwrap();
    let code = f.channel.last_code().await.unwrap();
    let expires = f.storage.get_code("admin").await.unwrap().unwrap().expires;

    f.clock.set(expires + 1);
    let err = f.authority.verify_code("admin", &code).await.unwrap_err();
    assert_eq!(auth_error(err), AuthError::CodeExpired);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_verifications_issue_one_session() {
    let f = fixture().await;
    f.authority.request_code("admin").await.unwrap();
    let code = f.channel.last_code().await.unwrap();
    let authority = Arc::new(f.authority);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let authority = authority.clone();
            let code = code.clone();
            tokio::spawn(async move { authority.verify_code("admin", &code).await })
        })
        .collect();

    let mut sessions = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => sessions += 1,
            Err(err) => assert_eq!(auth_error(err), AuthError::CodeNotFound),
        }
    }
    assert_eq!(sessions, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_guesses_respect_the_attempt_cap() {
    let f = fixture().await;
    f.authority.request_code("admin").await.unwrap();
    let code = f.channel.last_code().await.unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };
    let authority = Arc::new(f.authority);

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let authority = authority.clone();
            tokio::spawn(async move { authority.verify_code("admin", wrong).await })
        })
        .collect();

    let mut mismatches = 0;
    for task in tasks {
        match auth_error(task.await.unwrap().unwrap_err()) {
            AuthError::CodeMismatch => mismatches += 1,
            other => assert_eq!(other, AuthError::CodeNotFound),
        }
    }
    assert_eq!(mismatches, AdminConfig::default().max_code_attempts);
    assert!(f.storage.get_code("admin").await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let f = fixture().await;
    let err = f.authority.verify_session("deadbeef").await.unwrap_err();
    assert_eq!(auth_error(err), AuthError::SessionNotFound);
}

#[tokio::test]
async fn purge_removes_expired_credentials() {
    let f = fixture().await;
    let old = f.authority.issue_channel_session().await.unwrap();
    f.authority.request_code("admin").await.unwrap();

    f.clock.advance(Duration::from_secs(25 * 60 * 60));
    let fresh = f.authority.issue_channel_session().await.unwrap();

    assert_eq!(f.authority.purge_expired().await.unwrap(), 2);
    assert!(f.authority.verify_session(&fresh.token).await.is_ok());
    let err = f.authority.verify_session(&old.token).await.unwrap_err();
    assert_eq!(auth_error(err), AuthError::SessionNotFound);
}
