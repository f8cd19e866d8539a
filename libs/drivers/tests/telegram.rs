use gsm_core::testkit::MockHttpClient;
use gsm_core::{
    Attachment, AttachmentKind, Button, Driver, DriverConfig, DriverState, IncomingMessage,
    IncomingRequest, Question, Reply, TelegramConfig, Webhook,
};
use gsm_drivers::{TelegramDriver, TelegramMediaDriver, default_dispatcher};
use gsm_testutil::fixture_bytes;
use http::StatusCode;
use http::header::{HeaderName, HeaderValue};
use serde_json::json;
use std::sync::Arc;
use tracing_test::traced_test;

const TOKEN: &str = "123:abc";

fn config(secret: Option<&str>) -> TelegramConfig {
    TelegramConfig {
        token: Some(TOKEN.into()),
        webhook_secret: secret.map(str::to_string),
        api_base: "https://tg.test".into(),
    }
}

fn fixture(name: &str) -> Vec<u8> {
    fixture_bytes(format!("libs/drivers/tests/fixtures/telegram/{name}")).unwrap()
}

fn request(body: Vec<u8>, secret: Option<&str>) -> IncomingRequest {
    let request = IncomingRequest::new(body);
    match secret {
        Some(secret) => request.with_header(
            HeaderName::from_static("x-telegram-bot-api-secret-token"),
            HeaderValue::from_str(secret).unwrap(),
        ),
        None => request,
    }
}

fn webhook(name: &str) -> Webhook {
    Webhook::decode(&request(fixture(name), None)).unwrap()
}

fn text_driver(client: &Arc<MockHttpClient>) -> TelegramDriver {
    TelegramDriver::new(config(None), client.clone())
}

fn media_driver(kind: AttachmentKind, client: &Arc<MockHttpClient>) -> TelegramMediaDriver {
    TelegramMediaDriver::new(kind, &config(None), client.clone())
}

#[tokio::test]
async fn text_update_is_extracted_with_string_ids() {
    let client = Arc::new(MockHttpClient::new());
    let driver = text_driver(&client);
    let hook = webhook("text.json");

    assert!(driver.matches_request(&hook));
    assert!(driver.has_matching_event(&hook).is_none());
    let messages = driver.get_messages(&hook).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), "hello bot");
    assert_eq!(messages[0].sender(), "777");
    assert_eq!(messages[0].recipient(), "-100123");

    let user = driver.get_user(&messages[0]).await;
    assert_eq!(user.id, "777");
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
    assert_eq!(user.last_name.as_deref(), Some("Lovelace"));
    assert_eq!(user.username.as_deref(), Some("ada"));
    assert!(client.requests().is_empty());
}

#[test]
#[traced_test]
fn secret_token_must_match_when_configured() {
    let driver = TelegramDriver::new(config(Some("s3cret")), Arc::new(MockHttpClient::new()));
    let decode = |secret| Webhook::decode(&request(fixture("text.json"), secret)).unwrap();

    assert!(driver.matches_request(&decode(Some("s3cret"))));
    assert!(!driver.matches_request(&decode(Some("guess"))));
    assert!(!driver.matches_request(&decode(None)));
    assert!(logs_contain("wrong secret token"));
}

#[tokio::test]
async fn callback_query_is_an_interactive_answer() {
    let client = Arc::new(MockHttpClient::new());
    let driver = text_driver(&client);
    let hook = webhook("callback_query.json");

    assert!(driver.matches_request(&hook));
    let messages = driver.get_messages(&hook).await;
    let answer = driver.get_conversation_answer(&messages[0]);
    assert!(answer.is_interactive_reply());
    assert_eq!(answer.value(), "y");
    assert_eq!(messages[0].recipient(), "-100123");
}

#[test]
fn text_driver_declines_media_updates() {
    let client = Arc::new(MockHttpClient::new());
    let driver = text_driver(&client);
    for name in ["video.json", "photo.json", "location.json"] {
        assert!(!driver.matches_request(&webhook(name)), "{name}");
    }
}

#[tokio::test]
async fn video_url_is_resolved_through_get_file() {
    let client = Arc::new(MockHttpClient::new().respond(
        "/getFile",
        StatusCode::OK,
        json!({"ok": true, "result": {"file_id": "vid-1", "file_path": "videos/file_1.mp4"}}),
    ));
    let driver = media_driver(AttachmentKind::Video, &client);
    let hook = webhook("video.json");

    assert!(driver.matches_request(&hook));
    assert!(!media_driver(AttachmentKind::Image, &client).matches_request(&hook));

    let messages = driver.get_messages(&hook).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), "%%%_VIDEO_%%%");
    assert_eq!(messages[0].sender(), "777");
    let attachments = messages[0].attachments();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].kind(), AttachmentKind::Video);
    assert_eq!(
        attachments[0].url(),
        Some("https://tg.test/file/bot123:abc/videos/file_1.mp4")
    );
    assert_eq!(attachments[0].payload()["mime_type"], "video/mp4");
    assert_eq!(
        client.requests()[0].url,
        "https://tg.test/bot123:abc/getFile?file_id=vid-1"
    );
}

#[tokio::test]
async fn photo_resolves_largest_size() {
    let client = Arc::new(MockHttpClient::new().respond(
        "/getFile",
        StatusCode::OK,
        json!({"ok": true, "result": {"file_path": "photos/l.jpg"}}),
    ));
    let driver = media_driver(AttachmentKind::Image, &client);
    let messages = driver.get_messages(&webhook("photo.json")).await;

    assert_eq!(messages[0].text(), "%%%_IMAGE_%%%");
    assert_eq!(
        messages[0].attachments()[0].url(),
        Some("https://tg.test/file/bot123:abc/photos/l.jpg")
    );
    assert!(client.requests()[0].url.ends_with("file_id=photo-l"));
}

#[tokio::test]
#[traced_test]
async fn failed_get_file_keeps_message_without_attachments() {
    let client = Arc::new(MockHttpClient::new().fail("/getFile", "connection reset"));
    let driver = media_driver(AttachmentKind::Video, &client);

    let messages = driver.get_messages(&webhook("video.json")).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), "%%%_VIDEO_%%%");
    assert!(messages[0].attachments().is_empty());
    assert!(logs_contain("telegram media could not be resolved"));
    assert!(logs_contain("connection reset"));
}

#[tokio::test]
async fn location_needs_no_fetch() {
    let client = Arc::new(MockHttpClient::new());
    let driver = media_driver(AttachmentKind::Location, &client);
    let hook = webhook("location.json");

    assert!(driver.matches_request(&hook));
    let messages = driver.get_messages(&hook).await;
    assert_eq!(messages[0].text(), "%%%_LOCATION_%%%");
    match &messages[0].attachments()[0] {
        Attachment::Location(location) => {
            assert_eq!(location.latitude, 51.5072);
            assert_eq!(location.longitude, -0.1276);
        }
        other => panic!("expected location, got {other:?}"),
    }
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn question_is_sent_as_inline_keyboard() {
    let client = Arc::new(MockHttpClient::new());
    let driver = text_driver(&client);
    let matching = driver.get_messages(&webhook("text.json")).await.remove(0);
    let question = Question::new("Continue?")
        .add_button(Button::new("Yes").value("y"))
        .add_button(Button::new("No").value("n"));

    let payload =
        driver.build_service_payload(&Reply::from(question), &matching, None, &json!({}));
    driver.send_payload(payload).await.unwrap();

    let sent = &client.requests()[0];
    assert_eq!(sent.url, "https://tg.test/bot123:abc/sendMessage");
    assert_eq!(
        sent.body,
        json!({
            "chat_id": "-100123",
            "text": "Continue?",
            "reply_markup": {"inline_keyboard": [
                [{"text": "Yes", "callback_data": "y"}],
                [{"text": "No", "callback_data": "n"}]
            ]}
        })
    );
}

#[tokio::test]
async fn typing_and_raw_requests_target_the_chat() {
    let client = Arc::new(MockHttpClient::new());
    let driver = text_driver(&client);
    let matching = IncomingMessage::new("hi", "777", "-100123", json!({}));

    driver.types(&matching).await.unwrap();
    driver
        .send_request(
            "sendSticker",
            json!({"sticker": "CAAC", "method": "deleteMessage"}),
            &matching,
        )
        .await
        .unwrap();

    let requests = client.requests();
    assert_eq!(requests[0].url, "https://tg.test/bot123:abc/sendChatAction");
    assert_eq!(
        requests[0].body,
        json!({"chat_id": "-100123", "action": "typing"})
    );
    assert_eq!(requests[1].url, "https://tg.test/bot123:abc/sendSticker");
    assert_eq!(
        requests[1].body,
        json!({"chat_id": "-100123", "sticker": "CAAC"})
    );
}

#[tokio::test]
async fn dispatcher_routes_media_and_service_messages() {
    let client = Arc::new(MockHttpClient::new().respond(
        "/getFile",
        StatusCode::OK,
        json!({"ok": true, "result": {"file_path": "videos/file_1.mp4"}}),
    ));
    let config = DriverConfig {
        telegram: config(None),
        ..DriverConfig::default()
    };
    let dispatcher = default_dispatcher(&config, client.clone());

    let video = dispatcher
        .dispatch(&request(fixture("video.json"), None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(video.driver().name(), "TelegramVideo");
    assert_eq!(video.state(), DriverState::Matched);

    let mut joined = dispatcher
        .dispatch(&request(fixture("new_chat_members.json"), None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(joined.driver().name(), "Telegram");
    assert_eq!(joined.state(), DriverState::EventOnly);
    assert!(joined.messages().is_empty());
    assert_eq!(joined.event().map(|e| e.name()), Some("new_chat_members"));

    joined.reply("Welcome!", &json!({})).await.unwrap();
    assert_eq!(joined.state(), DriverState::Claimed);
    let sent = client.requests().pop().unwrap();
    assert_eq!(sent.url, "https://tg.test/bot123:abc/sendMessage");
    assert_eq!(sent.body, json!({"chat_id": "-100123", "text": "Welcome!"}));
}

#[tokio::test]
async fn textless_messages_are_left_unclaimed() {
    let client = Arc::new(MockHttpClient::new());
    let config = DriverConfig {
        telegram: config(None),
        ..DriverConfig::default()
    };
    let dispatcher = default_dispatcher(&config, client.clone());

    for message in [
        json!({"from": {"id": 7}, "chat": {"id": 7}, "sticker": {"file_id": "s"}}),
        json!({"from": {"id": 7}, "chat": {"id": 7}, "contact": {"phone_number": "+100"}}),
        json!({"from": {"id": 7}, "chat": {"id": 7}, "text": ""}),
    ] {
        let body = json!({"update_id": 1, "message": message}).to_string();
        let outcome = dispatcher
            .dispatch(&IncomingRequest::new(body))
            .await
            .unwrap();
        assert!(outcome.is_none(), "{message}");
    }
    assert!(client.requests().is_empty());
}

#[tokio::test]
#[traced_test]
async fn wrong_secret_is_a_quiet_non_match() {
    let client = Arc::new(MockHttpClient::new());
    let driver = TelegramDriver::new(config(Some("expected")), client.clone());
    let hook = Webhook::decode(&request(fixture("text.json"), Some("forged"))).unwrap();

    assert!(!driver.matches_request(&hook));
    assert!(logs_contain("rejecting telegram update with wrong secret token"));
    assert!(!logs_contain(" WARN "));
}
