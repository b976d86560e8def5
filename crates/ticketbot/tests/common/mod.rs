//! Common test utilities
//!
//! A wiremock server stands in for the Bot API; messages and updates are
//! built from JSON the same way Telegram delivers them.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use teloxide::types::{Message, Update};
use teloxide::Bot;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use ticketbot::telegram::{BotIdentity, HandlerDeps};
use ticketbot::ticket::{DescriptionPolicy, Router, TicketDesk};

pub const CHAT_ID: i64 = 123456789;
pub const USER_ID: u64 = 555;
pub const BOT_USERNAME: &str = "support_desk_bot";

/// Test harness with mock Bot API and real handler dependencies
pub struct TestBot {
    pub mock_server: MockServer,
    pub bot: Bot,
    pub deps: HandlerDeps,
}

impl TestBot {
    pub async fn new() -> Self {
        Self::with_policy(DescriptionPolicy::Permissive).await
    }

    pub async fn with_policy(policy: DescriptionPolicy) -> Self {
        let mock_server = MockServer::start().await;
        let bot = Bot::new("test_token_12345:ABCDEF").set_api_url(mock_server.uri().parse().unwrap());

        let identity = BotIdentity {
            id: 987654321,
            username: BOT_USERNAME.to_string(),
        };
        let desk = Arc::new(TicketDesk::new(Router::new(identity, policy)));

        let test = Self {
            mock_server,
            bot,
            deps: HandlerDeps::new(desk),
        };
        test.mock_telegram_api().await;
        test
    }

    async fn mock_telegram_api(&self) {
        self.mount_send_message().await;
        self.mount_send_photo().await;
    }

    /// Mounts a successful `sendMessage` response
    pub async fn mount_send_message(&self) {
        let send_msg = json!({
            "ok": true,
            "result": {
                "message_id": 42,
                "from": { "id": 987654321, "is_bot": true, "first_name": "TestBot" },
                "chat": { "id": CHAT_ID, "type": "private" },
                "date": 1735992000,
                "text": "Response"
            }
        });
        Mock::given(method("POST"))
            .and(path_regex("/bot[^/]+/[Ss]endMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(send_msg))
            .mount(&self.mock_server)
            .await;
    }

    /// Mounts a successful `sendPhoto` response
    pub async fn mount_send_photo(&self) {
        let photo = json!({
            "ok": true,
            "result": {
                "message_id": 44,
                "from": { "id": 987654321, "is_bot": true, "first_name": "TestBot" },
                "chat": { "id": CHAT_ID, "type": "private" },
                "date": 1735992000,
                "photo": [{ "file_id": "photo_id", "file_unique_id": "uid", "width": 100, "height": 100 }]
            }
        });
        Mock::given(method("POST"))
            .and(path_regex("/bot[^/]+/[Ss]endPhoto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(photo))
            .mount(&self.mock_server)
            .await;
    }

    /// Requests received by the mock Bot API whose method matches `api_method`
    pub async fn requests_to(&self, api_method: &str) -> Vec<Request> {
        let needle = api_method.to_lowercase();
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().to_lowercase().ends_with(&needle))
            .collect()
    }

    /// JSON bodies of every sendMessage call, in order
    pub async fn sent_messages(&self) -> Vec<serde_json::Value> {
        self.requests_to("sendMessage")
            .await
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("sendMessage body should be JSON"))
            .collect()
    }

    pub async fn reset_requests(&self) {
        self.mock_server.reset().await;
        self.mock_telegram_api().await;
    }
}

fn message_json(content: serde_json::Value) -> serde_json::Value {
    let mut value = json!({
        "message_id": 1,
        "date": 1735992000,
        "chat": {
            "id": CHAT_ID,
            "type": "private",
            "first_name": "Test",
            "username": "testuser"
        },
        "from": {
            "id": USER_ID,
            "is_bot": false,
            "first_name": "Test",
            "last_name": "User",
            "username": "testuser"
        }
    });
    if let (Some(base), Some(extra)) = (value.as_object_mut(), content.as_object()) {
        base.extend(extra.clone());
    }
    value
}

pub fn text_message(text: &str) -> Message {
    serde_json::from_value(message_json(json!({ "text": text }))).expect("Failed to deserialize message")
}

pub fn photo_message(file_id: &str, caption: Option<&str>) -> Message {
    let mut content = json!({
        "photo": [
            { "file_id": "thumb", "file_unique_id": "t", "width": 90, "height": 90 },
            { "file_id": file_id, "file_unique_id": "f", "width": 800, "height": 600 }
        ]
    });
    if let (Some(caption), Some(map)) = (caption, content.as_object_mut()) {
        map.insert("caption".to_string(), json!(caption));
    }
    serde_json::from_value(message_json(content)).expect("Failed to deserialize photo message")
}

pub fn voice_message(caption: Option<&str>) -> Message {
    let mut content = json!({
        "voice": { "file_id": "voice_id", "file_unique_id": "v", "duration": 5 }
    });
    if let (Some(caption), Some(map)) = (caption, content.as_object_mut()) {
        map.insert("caption".to_string(), json!(caption));
    }
    serde_json::from_value(message_json(content)).expect("Failed to deserialize voice message")
}

pub fn text_update(text: &str) -> Update {
    // teloxide's `UpdateKind` visitor only works with string input, not `serde_json::Value`
    let update = json!({
        "update_id": 1,
        "message": message_json(json!({ "text": text }))
    });
    serde_json::from_str(&update.to_string()).expect("Failed to deserialize update")
}
