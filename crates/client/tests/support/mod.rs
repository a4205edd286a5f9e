//! In-process fake of the Pulse REST backend

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use common::toast::ToastQueue;
use pulse_client::{ApiClient, ClientOptions, Pulse};

pub const PASSWORD: &str = "hunter2";
pub const TOKEN: &str = "tok-alice";

/// Shared backend state; tests flip the knobs and read the counters
#[derive(Default)]
pub struct Backend {
    failing: Mutex<HashSet<&'static str>>,
    /// post id -> (liked, likes_count)
    pub likes: Mutex<HashMap<String, (bool, u64)>>,
    pub saved: Mutex<HashSet<String>>,
    /// Delay applied to POST /save only
    pub save_delay: Mutex<Duration>,
    /// Authorization header of every request (empty when absent)
    pub auth_headers: Mutex<Vec<String>>,
    pub requests: AtomicU64,
    pub unread_notifications: AtomicU64,
    pub unread_messages: AtomicU64,
    /// Total unread reported after a chat is marked read
    pub unread_after_read: AtomicU64,
    pub chats: Mutex<Vec<Value>>,
    pub private_users: Mutex<HashSet<String>>,
    pub blocked_me: Mutex<HashSet<String>>,
    pub follow_notifications: AtomicU64,
    pub story_views: AtomicU64,
    pub sent_messages: Mutex<Vec<String>>,
    /// Cancelling a follow request answers without a `requested` field
    pub cancel_omits_requested: AtomicBool,
    pub uploads: Mutex<Vec<Upload>>,
    pub approved_chats: Mutex<Vec<String>>,
}

/// One multipart upload as the backend saw it
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub path: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
    pub caption: Option<String>,
}

impl Backend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every route tagged `name` answer with a 500
    pub fn fail(&self, name: &'static str) {
        self.failing.lock().insert(name);
    }

    pub fn recover(&self, name: &'static str) {
        self.failing.lock().remove(name);
    }

    fn failing(&self, name: &str) -> bool {
        self.failing.lock().contains(name)
    }

    fn record(&self, headers: &HeaderMap) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.auth_headers.lock().push(auth);
    }

    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn last_auth(&self) -> Option<String> {
        self.auth_headers.lock().last().cloned()
    }
}

type Shared = State<Arc<Backend>>;

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "internal error" })),
    )
        .into_response()
}

pub fn user(id: &str) -> Value {
    json!({ "_id": id, "username": id, "fullName": format!("{id} example") })
}

pub fn message(id: &str, chat_id: &str, sender: &str, text: &str) -> Value {
    json!({
        "_id": id,
        "chatId": chat_id,
        "senderId": sender,
        "text": text,
        "createdAt": "2024-05-01T12:00:00Z",
    })
}

pub fn chat(id: &str, with: &str, unread: u64, request: bool) -> Value {
    json!({
        "_id": id,
        "participant": user(with),
        "unreadCount": unread,
        "isRequest": request,
    })
}

fn post_json(id: &str, liked: bool, likes: u64) -> Value {
    json!({
        "_id": id,
        "author": user("bob"),
        "caption": format!("post {id}"),
        "likesCount": likes,
        "isLiked": liked,
        "createdAt": "2024-05-01T12:00:00Z",
    })
}

#[derive(Deserialize)]
struct Credentials {
    identifier: String,
    password: String,
}

async fn login(State(b): Shared, headers: HeaderMap, Json(body): Json<Credentials>) -> Response {
    b.record(&headers);
    if body.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }
    Json(json!({ "token": TOKEN, "user": user(&body.identifier) })).into_response()
}

#[derive(Deserialize)]
struct UsernameQuery {
    username: String,
}

async fn check_username(
    State(b): Shared,
    headers: HeaderMap,
    Query(q): Query<UsernameQuery>,
) -> Response {
    b.record(&headers);
    if b.failing("availability") {
        return server_error();
    }
    Json(json!({ "available": q.username != "taken" })).into_response()
}

async fn health(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    Json(json!({ "status": "ok", "version": "test" })).into_response()
}

#[derive(Deserialize)]
struct PageQuery {
    page: u32,
    limit: u32,
}

async fn feed(State(b): Shared, headers: HeaderMap, Query(q): Query<PageQuery>) -> Response {
    b.record(&headers);
    // three pages of `limit`, the second overlapping the first by one
    let start = (q.page.saturating_sub(1) * q.limit).saturating_sub(u32::from(q.page > 1));
    let posts: Vec<Value> = (start..start + q.limit)
        .map(|i| post_json(&format!("p{i}"), false, u64::from(i)))
        .collect();
    Json(json!({ "posts": posts, "page": q.page, "hasMore": q.page < 3 })).into_response()
}

async fn like(
    State(b): Shared,
    headers: HeaderMap,
    method: Method,
    Path(id): Path<String>,
) -> Response {
    b.record(&headers);
    if b.failing("like") {
        return server_error();
    }
    let mut likes = b.likes.lock();
    let entry = likes.entry(id).or_insert((false, 0));
    let like = method == Method::POST;
    if entry.0 != like {
        entry.0 = like;
        entry.1 = if like { entry.1 + 1 } else { entry.1.saturating_sub(1) };
    }
    Json(json!({ "liked": entry.0, "likesCount": entry.1 })).into_response()
}

async fn save(
    State(b): Shared,
    headers: HeaderMap,
    method: Method,
    Path(id): Path<String>,
) -> Response {
    b.record(&headers);
    let save = method == Method::POST;
    if save {
        let delay = *b.save_delay.lock();
        tokio::time::sleep(delay).await;
    }
    if b.failing("save") {
        return server_error();
    }
    if save {
        b.saved.lock().insert(id);
    } else {
        b.saved.lock().remove(&id);
    }
    Json(json!({ "saved": save })).into_response()
}

#[derive(Deserialize)]
struct TextBody {
    text: String,
}

async fn comment(
    State(b): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<TextBody>,
) -> Response {
    b.record(&headers);
    if b.failing("comment") {
        return server_error();
    }
    Json(json!({
        "_id": "c1",
        "postId": id,
        "author": user("alice"),
        "text": body.text,
        "createdAt": "2024-05-01T12:00:00Z",
    }))
    .into_response()
}

async fn follow(
    State(b): Shared,
    headers: HeaderMap,
    method: Method,
    Path(id): Path<String>,
) -> Response {
    b.record(&headers);
    if b.failing("follow") {
        return server_error();
    }
    if method == Method::DELETE {
        return Json(json!({ "following": false, "requested": false })).into_response();
    }
    if b.private_users.lock().contains(&id) {
        Json(json!({ "following": false, "requested": true })).into_response()
    } else {
        Json(json!({ "following": true, "requested": false })).into_response()
    }
}

async fn cancel_follow_request(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    if b.cancel_omits_requested.load(Ordering::SeqCst) {
        return Json(json!({ "success": true })).into_response();
    }
    Json(json!({ "following": false, "requested": false })).into_response()
}

async fn block(State(b): Shared, headers: HeaderMap, method: Method) -> Response {
    b.record(&headers);
    if b.failing("block") {
        return server_error();
    }
    Json(json!({ "blocked": method == Method::POST })).into_response()
}

async fn relationship(State(b): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    b.record(&headers);
    let blocked_me = b.blocked_me.lock().contains(&id);
    Json(json!({ "isBlocked": false, "hasBlockedMe": blocked_me, "isFollowing": true }))
        .into_response()
}

async fn follow_notification(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    b.follow_notifications.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "success": true })).into_response()
}

async fn unread_notifications(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    if b.failing("badges") {
        return server_error();
    }
    Json(json!({ "count": b.unread_notifications.load(Ordering::SeqCst) })).into_response()
}

async fn unread_messages(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    if b.failing("badges") {
        return server_error();
    }
    Json(json!({ "unreadCount": b.unread_messages.load(Ordering::SeqCst) })).into_response()
}

async fn chats(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    Json(json!({ "chats": b.chats.lock().clone() })).into_response()
}

async fn chat_messages(State(b): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    b.record(&headers);
    Json(json!({
        "messages": [
            message("m1", &id, "bob", "hey"),
            message("m2", &id, "alice", "hi bob"),
        ]
    }))
    .into_response()
}

async fn send_message(
    State(b): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<TextBody>,
) -> Response {
    b.record(&headers);
    if b.failing("send") {
        return server_error();
    }
    let mut sent = b.sent_messages.lock();
    sent.push(body.text.clone());
    let server_id = format!("srv-{}", sent.len());
    Json(message(&server_id, &id, "alice", &body.text)).into_response()
}

async fn mark_read(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    if b.failing("read") {
        return server_error();
    }
    Json(json!({ "unreadTotal": b.unread_after_read.load(Ordering::SeqCst) })).into_response()
}

async fn story_feed(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    let story = |id: &str, seen: bool| {
        json!({ "_id": id, "mediaUrl": format!("https://cdn/{id}.jpg"), "createdAt": "2024-05-01T12:00:00Z", "isSeen": seen })
    };
    Json(json!({
        "stories": [
            { "user": user("carol"), "stories": [story("s1", true)] },
            { "user": user("dave"), "stories": [story("s2", true), story("s3", false)] },
        ]
    }))
    .into_response()
}

async fn story_view(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    b.story_views.fetch_add(1, Ordering::SeqCst);
    if b.failing("story") {
        return server_error();
    }
    Json(json!({ "success": true })).into_response()
}

async fn update_profile(State(b): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record(&headers);
    let mut updated = user("alice");
    if let Some(bio) = body.get("bio") {
        updated["bio"] = bio.clone();
    }
    Json(updated).into_response()
}

async fn delete_account(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    Json(json!({ "success": true, "message": "Account deleted" })).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Registration {
    username: String,
    email: String,
}

async fn register(State(b): Shared, headers: HeaderMap, Json(body): Json<Registration>) -> Response {
    b.record(&headers);
    if body.username == "taken" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Username already exists" })),
        )
            .into_response();
    }
    Json(json!({ "message": format!("Code sent to {}", body.email), "requiresOtp": true }))
        .into_response()
}

#[derive(Deserialize)]
struct OtpBody {
    identifier: String,
    code: String,
}

pub const OTP: &str = "424242";

async fn verify_otp(State(b): Shared, headers: HeaderMap, Json(body): Json<OtpBody>) -> Response {
    b.record(&headers);
    if body.code != OTP {
        return bad_request("Invalid or expired code");
    }
    Json(json!({ "token": TOKEN, "user": user(&body.identifier) })).into_response()
}

#[derive(Deserialize)]
struct PhoneQuery {
    phone: String,
}

async fn check_phone(State(b): Shared, headers: HeaderMap, Query(q): Query<PhoneQuery>) -> Response {
    b.record(&headers);
    if b.failing("availability") {
        return server_error();
    }
    Json(json!({ "available": q.phone != "+15550100" })).into_response()
}

fn reel_json(id: &str) -> Value {
    json!({
        "_id": id,
        "author": user("carol"),
        "videoUrl": format!("https://cdn/{id}.mp4"),
        "likesCount": 7,
        "isLiked": true,
        "isSaved": false,
    })
}

async fn reels(State(b): Shared, headers: HeaderMap, Query(q): Query<PageQuery>) -> Response {
    b.record(&headers);
    if b.failing("feed") {
        return server_error();
    }
    let reels: Vec<Value> = (0..q.limit.min(3))
        .map(|i| reel_json(&format!("r{i}")))
        .collect();
    Json(json!({ "reels": reels, "page": q.page, "hasMore": false })).into_response()
}

async fn saved_posts(State(b): Shared, headers: HeaderMap, Query(q): Query<PageQuery>) -> Response {
    b.record(&headers);
    if b.failing("feed") {
        return server_error();
    }
    let mut ids: Vec<String> = b.saved.lock().iter().cloned().collect();
    ids.sort();
    let posts: Vec<Value> = ids
        .iter()
        .map(|id| {
            let mut post = post_json(id, false, 0);
            post["isSaved"] = json!(true);
            post
        })
        .collect();
    Json(json!({ "posts": posts, "page": q.page, "hasMore": false })).into_response()
}

/// Shared multipart handling for post and story uploads
async fn record_upload(b: &Backend, path: &str, mut multipart: Multipart) -> Upload {
    let mut upload = Upload {
        path: path.to_string(),
        ..Upload::default()
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("media") => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().map(str::to_string);
                upload.size = field.bytes().await.unwrap().len();
            }
            Some("caption") => upload.caption = Some(field.text().await.unwrap()),
            _ => {}
        }
    }
    b.uploads.lock().push(upload.clone());
    upload
}

async fn create_post(State(b): Shared, headers: HeaderMap, multipart: Multipart) -> Response {
    b.record(&headers);
    let upload = record_upload(&b, "/api/posts", multipart).await;
    if b.failing("upload") {
        return server_error();
    }
    if upload.size == 0 {
        return bad_request("Media file is required");
    }
    let mut post = post_json("new-post", false, 0);
    post["caption"] = json!(upload.caption);
    Json(post).into_response()
}

async fn create_story(State(b): Shared, headers: HeaderMap, multipart: Multipart) -> Response {
    b.record(&headers);
    record_upload(&b, "/api/stories", multipart).await;
    if b.failing("upload") {
        return server_error();
    }
    Json(json!({
        "_id": "new-story",
        "mediaUrl": "https://cdn/new-story.jpg",
        "createdAt": "2024-05-01T12:00:00Z",
    }))
    .into_response()
}

async fn followers(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    if b.failing("graph") {
        return server_error();
    }
    Json(json!({ "followers": [user("bob"), user("carol")] })).into_response()
}

async fn following(State(b): Shared, headers: HeaderMap) -> Response {
    b.record(&headers);
    if b.failing("graph") {
        return server_error();
    }
    Json(json!({ "following": [user("dave")] })).into_response()
}

async fn update_settings(
    State(b): Shared,
    headers: HeaderMap,
    Path(section): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    b.record(&headers);
    if b.failing("settings") {
        return server_error();
    }
    let mut settings = json!({});
    settings[section.as_str()] = body;
    Json(settings).into_response()
}

async fn approve_chat(State(b): Shared, headers: HeaderMap, Path(id): Path<String>) -> Response {
    b.record(&headers);
    if b.failing("approve") {
        return server_error();
    }
    b.approved_chats.lock().push(id);
    Json(json!({ "success": true })).into_response()
}

pub fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/auth/check-username", get(check_username))
        .route("/api/auth/check-phone", get(check_phone))
        .route("/api/auth/register", post(register))
        .route("/api/auth/verify-otp", post(verify_otp))
        .route("/api/posts", post(create_post))
        .route("/api/posts/feed", get(feed))
        .route("/api/posts/saved", get(saved_posts))
        .route("/api/reels", get(reels))
        .route("/api/settings/:section", put(update_settings))
        .route("/api/users/:id/followers", get(followers))
        .route("/api/users/:id/following", get(following))
        .route("/api/posts/:id/like", post(like).delete(like))
        .route("/api/posts/:id/save", post(save).delete(save))
        .route("/api/posts/:id/comments", post(comment))
        .route("/api/users/me", put(update_profile).delete(delete_account))
        .route("/api/users/:id/follow", post(follow).delete(follow))
        .route("/api/users/:id/follow-request", delete(cancel_follow_request))
        .route("/api/users/:id/block", post(block).delete(block))
        .route("/api/users/:id/relationship", get(relationship))
        .route("/api/notifications/follow", post(follow_notification))
        .route("/api/notifications/unread-count", get(unread_notifications))
        .route("/api/chats", get(chats))
        .route("/api/chats/unread-count", get(unread_messages))
        .route("/api/chats/:id/messages", get(chat_messages).post(send_message))
        .route("/api/chats/:id/read", post(mark_read))
        .route("/api/chats/:id/approve", post(approve_chat))
        .route("/api/stories", post(create_story))
        .route("/api/stories/feed", get(story_feed))
        .route("/api/stories/:id/view", post(story_view))
        .with_state(backend)
}

/// Serve `backend` on an ephemeral local port and return its base URL
pub async fn spawn(backend: Arc<Backend>) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(backend)).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

pub struct Harness {
    pub backend: Arc<Backend>,
    pub pulse: Pulse,
    pub toasts: ToastQueue,
    pub url: Url,
}

impl Harness {
    /// Logged-in coordinator talking to a fresh backend
    pub async fn new() -> Self {
        Self::with_options(ClientOptions::default()).await
    }

    pub async fn with_options(options: ClientOptions) -> Self {
        let backend = Backend::new();
        let url = spawn(backend.clone()).await;
        let toasts = ToastQueue::new();
        let client = ApiClient::with_options(&url, options).unwrap();
        client.set_token(Some(TOKEN.to_string()));
        let pulse = Pulse::new(client, Arc::new(toasts.clone()));
        Self {
            backend,
            pulse,
            toasts,
            url,
        }
    }

    /// Same backend, no token and no current user
    pub async fn logged_out() -> Self {
        let harness = Self::new().await;
        harness.pulse.client().set_token(None);
        harness
    }

    pub fn success_toasts(&self) -> Vec<String> {
        self.toasts
            .snapshot()
            .into_iter()
            .filter(|t| t.level == common::toast::ToastLevel::Success)
            .map(|t| t.message)
            .collect()
    }

    pub fn error_toasts(&self) -> Vec<String> {
        self.toasts
            .snapshot()
            .into_iter()
            .filter(|t| t.level == common::toast::ToastLevel::Error)
            .map(|t| t.message)
            .collect()
    }
}
