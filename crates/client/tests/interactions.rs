mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use common::bus::{AppEvent, Topic};
use common::models::{PostId, UserId};
use common::optimistic::{TargetKey, ToggleField, ToggleState};
use pulse_client::{FollowState, ServiceError};

use support::Harness;

fn seed_like(h: &Harness, id: &PostId, liked: bool, count: u64) {
    h.pulse.local().seed(
        TargetKey::new(id, ToggleField::Liked),
        ToggleState::with_count(liked, count),
    );
    h.backend
        .likes
        .lock()
        .insert(id.to_string(), (liked, count));
}

#[tokio::test]
async fn test_like_settles_on_server_count() {
    let h = Harness::new().await;
    let post = PostId::new("p1");
    seed_like(&h, &post, false, 10);

    let state = h.pulse.posts().toggle_like(&post).await.unwrap();

    assert_eq!(state, ToggleState::with_count(true, 11));
    assert_eq!(h.pulse.posts().like_state(&post), Some(state));
    assert!(h.error_toasts().is_empty());
}

#[tokio::test]
async fn test_server_count_beats_optimistic_guess() {
    let h = Harness::new().await;
    let post = PostId::new("p1");
    seed_like(&h, &post, false, 10);
    // someone else liked it meanwhile
    h.backend.likes.lock().insert("p1".to_string(), (false, 41));

    let state = h.pulse.posts().toggle_like(&post).await.unwrap();
    assert_eq!(state, ToggleState::with_count(true, 42));
}

#[tokio::test]
async fn test_failed_like_rolls_back_with_one_toast() {
    let h = Harness::new().await;
    let post = PostId::new("p1");
    seed_like(&h, &post, false, 10);
    h.backend.fail("like");

    let result = h.pulse.posts().toggle_like(&post).await;

    assert!(matches!(result, Err(ServiceError::Api(_))));
    assert_eq!(
        h.pulse.posts().like_state(&post),
        Some(ToggleState::with_count(false, 10))
    );
    assert_eq!(h.error_toasts(), vec!["Failed to like post".to_string()]);
}

#[tokio::test]
async fn test_failed_unlike_uses_unlike_message() {
    let h = Harness::new().await;
    let post = PostId::new("p1");
    seed_like(&h, &post, true, 3);
    h.backend.fail("like");

    assert!(h.pulse.posts().toggle_like(&post).await.is_err());
    assert_eq!(h.error_toasts(), vec!["Failed to unlike post".to_string()]);
    assert_eq!(
        h.pulse.posts().like_state(&post),
        Some(ToggleState::with_count(true, 3))
    );
}

#[tokio::test]
async fn test_like_is_broadcast() {
    let h = Harness::new().await;
    let post = PostId::new("p1");
    seed_like(&h, &post, false, 10);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _sub = h
        .pulse
        .bus()
        .subscribe_topic(Topic::Likes, move |event| sink.lock().push(event.clone()));

    h.pulse.posts().toggle_like(&post).await.unwrap();

    assert_eq!(
        *seen.lock(),
        vec![AppEvent::PostLiked {
            post_id: post.clone(),
            liked: true,
            likes_count: Some(11),
        }]
    );
}

#[tokio::test]
async fn test_double_save_last_response_wins() {
    let h = Harness::new().await;
    let post = PostId::new("p9");
    *h.backend.save_delay.lock() = Duration::from_millis(300);
    let posts = h.pulse.posts();

    // slow save, then a quick unsave that resolves first
    let (first, second) = tokio::join!(posts.toggle_save(&post), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        posts.toggle_save(&post).await
    });

    assert!(!second.unwrap().active);
    assert!(first.unwrap().active);
    assert_eq!(posts.saved_state(&post), Some(ToggleState::new(true)));
    assert!(h.error_toasts().is_empty());
}

#[tokio::test]
async fn test_save_failure_restores_previous() {
    let h = Harness::new().await;
    let post = PostId::new("p2");
    h.backend.fail("save");

    assert!(h.pulse.posts().toggle_save(&post).await.is_err());
    assert_eq!(
        h.pulse.posts().saved_state(&post),
        Some(ToggleState::new(false))
    );
    assert_eq!(h.error_toasts(), vec!["Failed to save post".to_string()]);
}

#[tokio::test]
async fn test_comment_rejects_blank_text_without_request() {
    let h = Harness::new().await;
    let result = h.pulse.posts().comment(&PostId::new("p1"), "   ").await;

    assert!(matches!(result, Err(ServiceError::Invalid(_))));
    assert_eq!(h.backend.request_count(), 0);
}

#[tokio::test]
async fn test_comment_failure_toasts_once() {
    let h = Harness::new().await;
    h.backend.fail("comment");

    assert!(h.pulse.posts().comment(&PostId::new("p1"), "nice").await.is_err());
    assert_eq!(h.error_toasts(), vec!["Failed to add comment".to_string()]);
}

#[tokio::test]
async fn test_feed_pages_are_deduplicated() {
    let h = Harness::new().await;
    let posts = h.pulse.posts();
    let mut pager = h.pulse.pager();

    assert_eq!(posts.load_feed(&mut pager).await.unwrap(), 10);
    // second page repeats the last post of the first
    assert_eq!(posts.load_feed(&mut pager).await.unwrap(), 9);
    assert_eq!(pager.len(), 19);
    assert!(pager.has_more());
    assert!(posts.like_state(&PostId::new("p3")).is_some());
}

#[tokio::test]
async fn test_follow_private_account_is_requested() {
    let h = Harness::new().await;
    let user = UserId::new("eve");
    h.backend.private_users.lock().insert("eve".to_string());

    let state = h.pulse.social().toggle_follow(&user).await.unwrap();

    assert_eq!(
        state,
        FollowState {
            following: false,
            requested: true,
        }
    );
    assert_eq!(h.pulse.social().follow_state(&user), state);
    assert_eq!(h.backend.follow_notifications.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cancel_follow_request() {
    let h = Harness::new().await;
    let user = UserId::new("eve");
    h.backend.private_users.lock().insert("eve".to_string());
    h.pulse.social().toggle_follow(&user).await.unwrap();

    let state = h.pulse.social().cancel_request(&user).await.unwrap();
    assert_eq!(state, FollowState::default());
}

#[tokio::test]
async fn test_cancel_without_pending_request_never_shows_requested() {
    let h = Harness::new().await;
    let user = UserId::new("bob");
    h.pulse.social().toggle_follow(&user).await.unwrap();
    assert!(!h.pulse.social().follow_state(&user).requested);

    // server acknowledges without reporting the request state
    h.backend
        .cancel_omits_requested
        .store(true, Ordering::SeqCst);
    let state = h.pulse.social().cancel_request(&user).await.unwrap();

    assert_eq!(
        state,
        FollowState {
            following: true,
            requested: false,
        }
    );
    assert_eq!(h.pulse.social().follow_state(&user), state);
}

#[tokio::test]
async fn test_unfollow_sends_no_notification() {
    let h = Harness::new().await;
    let user = UserId::new("bob");
    h.pulse.local().seed(
        TargetKey::new(&user, ToggleField::Following),
        ToggleState::new(true),
    );

    let state = h.pulse.social().toggle_follow(&user).await.unwrap();
    assert!(!state.following);
    assert_eq!(h.backend.follow_notifications.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_follow_rolls_back() {
    let h = Harness::new().await;
    let user = UserId::new("bob");
    h.backend.fail("follow");

    assert!(h.pulse.social().toggle_follow(&user).await.is_err());
    assert_eq!(h.pulse.social().follow_state(&user), FollowState::default());
    assert_eq!(h.error_toasts(), vec!["Failed to follow user".to_string()]);
}

#[tokio::test]
async fn test_block_clears_follow_state() {
    let h = Harness::new().await;
    let user = UserId::new("mallory");
    h.pulse.local().seed(
        TargetKey::new(&user, ToggleField::Following),
        ToggleState::new(true),
    );

    assert!(h.pulse.social().toggle_block(&user).await.unwrap());
    assert_eq!(h.pulse.social().follow_state(&user), FollowState::default());
}

#[tokio::test]
async fn test_story_view_reported_once() {
    let h = Harness::new().await;
    let groups = h.pulse.stories().feed().await.unwrap();

    // dave still has an unseen story so that group is ordered first
    assert_eq!(groups[0].author.username, "dave");

    let story = groups[0].stories[1].id.clone();
    let author = groups[0].author.id.clone();
    assert!(h.pulse.stories().view(&story, &author).await);
    assert!(!h.pulse.stories().view(&story, &author).await);
    assert_eq!(h.backend.story_views.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_story_view_failure_keeps_local_mark() {
    let h = Harness::new().await;
    h.backend.fail("story");
    let story = common::models::StoryId::new("s3");

    assert!(h.pulse.stories().view(&story, &UserId::new("dave")).await);
    assert!(h.pulse.seen().is_seen(&story));
    assert!(h.error_toasts().is_empty());
}
