mod support;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::badge::{BadgeKind, SyncState};
use common::chat::DeliveryStatus;
use common::models::{ChatId, UserId};
use pulse_client::services::run_reconciler;
use pulse_client::ServiceError;

use support::{chat, Harness, PASSWORD};

async fn logged_in() -> Harness {
    let h = Harness::logged_out().await;
    h.pulse.auth().login("alice", PASSWORD).await.unwrap();
    h
}

#[tokio::test]
async fn test_refresh_badges_sets_both_counters() {
    let h = Harness::new().await;
    h.backend.unread_notifications.store(4, Ordering::SeqCst);
    h.backend.unread_messages.store(7, Ordering::SeqCst);

    let counts = h.pulse.notifications().refresh_badges().await.unwrap();

    assert_eq!(counts, (4, 7));
    let badges = h.pulse.badges();
    assert_eq!(badges.get(BadgeKind::Notifications), 4);
    assert_eq!(badges.counter(BadgeKind::Messages).state(), SyncState::Synced);
}

#[tokio::test]
async fn test_failed_refresh_keeps_drifted_value() {
    let h = Harness::new().await;
    let notifications = h.pulse.notifications();
    h.backend.unread_notifications.store(2, Ordering::SeqCst);
    notifications.refresh_badges().await.unwrap();
    notifications.record_incoming(BadgeKind::Notifications);

    h.backend.fail("badges");
    assert!(notifications.refresh_badges().await.is_err());

    let counter = h.pulse.badges().counter(BadgeKind::Notifications);
    assert_eq!(counter.value(), 3);
    assert_eq!(counter.state(), SyncState::Stale);
    assert!(h.toasts.is_empty());
}

#[tokio::test]
async fn test_authoritative_count_overrides_drift() {
    let h = Harness::new().await;
    let notifications = h.pulse.notifications();
    notifications.record_incoming(BadgeKind::Messages);
    notifications.record_incoming(BadgeKind::Messages);
    h.backend.unread_messages.store(1, Ordering::SeqCst);

    assert_eq!(notifications.reconcile(BadgeKind::Messages).await.unwrap(), 1);
    assert_eq!(h.pulse.badges().get(BadgeKind::Messages), 1);
}

#[tokio::test]
async fn test_chat_list_reconciles_badge_without_requests() {
    let h = Harness::new().await;
    *h.backend.chats.lock() = vec![
        chat("c1", "bob", 2, false),
        chat("c2", "carol", 3, false),
        chat("c3", "spammer", 9, true),
    ];

    let chats = h.pulse.chat().list().await.unwrap();

    assert_eq!(chats.len(), 3);
    assert_eq!(h.pulse.badges().get(BadgeKind::Messages), 5);
}

#[tokio::test]
async fn test_mark_read_applies_server_total() {
    let h = Harness::new().await;
    h.pulse.badges().set(BadgeKind::Messages, 5);
    h.backend.unread_after_read.store(1, Ordering::SeqCst);

    h.pulse.chat().mark_read(&ChatId::new("c1"), 2).await.unwrap();

    let counter = h.pulse.badges().counter(BadgeKind::Messages);
    assert_eq!(counter.value(), 1);
    assert_eq!(counter.state(), SyncState::Synced);
}

#[tokio::test]
async fn test_mark_read_failure_restores_badge() {
    let h = Harness::new().await;
    h.pulse.badges().set(BadgeKind::Messages, 5);
    h.backend.fail("read");

    assert!(h.pulse.chat().mark_read(&ChatId::new("c1"), 2).await.is_err());
    assert_eq!(h.pulse.badges().get(BadgeKind::Messages), 5);
}

#[tokio::test]
async fn test_mark_read_failure_restores_badge_below_unread() {
    let h = Harness::new().await;
    h.pulse.badges().set(BadgeKind::Messages, 2);
    h.backend.fail("read");

    assert!(h.pulse.chat().mark_read(&ChatId::new("c1"), 5).await.is_err());
    assert_eq!(h.pulse.badges().get(BadgeKind::Messages), 2);
}

#[tokio::test]
async fn test_send_replaces_pending_message() {
    let h = logged_in().await;
    let chat = h.pulse.chat();
    let mut conversation = chat
        .open(&ChatId::new("c1"), &UserId::new("bob"))
        .await
        .unwrap();
    assert_eq!(conversation.messages().len(), 2);

    let sent = chat.send(&mut conversation, "  see you soon ").await.unwrap();

    assert_eq!(sent.text, "see you soon");
    let last = conversation.messages().last().unwrap();
    assert_eq!(last.status, DeliveryStatus::Sent);
    assert_eq!(last.message.id, sent.id);
    assert!(!last.is_local());
    assert_eq!(conversation.pending().count(), 0);
}

#[tokio::test]
async fn test_failed_send_keeps_message_as_failed() {
    let h = logged_in().await;
    let chat = h.pulse.chat();
    let mut conversation = chat
        .open(&ChatId::new("c1"), &UserId::new("bob"))
        .await
        .unwrap();
    h.backend.fail("send");

    assert!(chat.send(&mut conversation, "hello?").await.is_err());

    let last = conversation.messages().last().unwrap();
    assert_eq!(last.status, DeliveryStatus::Failed);
    assert_eq!(last.message.text, "hello?");
    assert_eq!(h.error_toasts(), vec!["Failed to send message".to_string()]);
}

#[tokio::test]
async fn test_send_to_blocking_user_is_refused() {
    let h = logged_in().await;
    h.backend.blocked_me.lock().insert("troll".to_string());
    let chat = h.pulse.chat();
    let mut conversation = chat
        .open(&ChatId::new("c9"), &UserId::new("troll"))
        .await
        .unwrap();

    let err = chat.send(&mut conversation, "hi").await.unwrap_err();

    assert!(matches!(err, ServiceError::Blocked(ref id) if id.as_str() == "troll"));
    assert!(h.backend.sent_messages.lock().is_empty());
    assert_eq!(conversation.messages().len(), 2);
    assert_eq!(h.error_toasts().len(), 1);
}

#[tokio::test]
async fn test_approve_message_request() {
    let h = Harness::new().await;

    h.pulse.chat().approve(&ChatId::new("c3")).await.unwrap();

    assert_eq!(*h.backend.approved_chats.lock(), vec!["c3".to_string()]);
    assert!(h.error_toasts().is_empty());
}

#[tokio::test]
async fn test_approve_failure_toasts() {
    let h = Harness::new().await;
    h.backend.fail("approve");

    assert!(h.pulse.chat().approve(&ChatId::new("c3")).await.is_err());
    assert!(h.backend.approved_chats.lock().is_empty());
    assert_eq!(h.error_toasts(), vec!["Failed to accept request".to_string()]);
}

#[tokio::test]
async fn test_reconciler_refreshes_until_shutdown() {
    let h = Harness::new().await;
    h.backend.unread_notifications.store(6, Ordering::SeqCst);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());
    let task = tokio::spawn(run_reconciler(
        h.pulse.clone(),
        Duration::from_millis(20),
        shutdown_rx,
    ));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(h.pulse.badges().get(BadgeKind::Notifications), 6);

    h.backend.unread_notifications.store(8, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(h.pulse.badges().get(BadgeKind::Notifications), 8);

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .unwrap()
        .unwrap();
}
