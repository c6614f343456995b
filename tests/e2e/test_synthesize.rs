use crate::e2e::helpers;

use helpers::mock_upstream::UpstreamBehavior;
use helpers::{fake_mp3, TestContext, TEST_API_KEY};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_upstream_audio_unchanged(ctx: &TestContext) {
    let audio = fake_mp3();
    ctx.upstream.respond_with(UpstreamBehavior::Audio {
        content_type: "audio/mpeg",
        body: audio.clone(),
    });

    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "Hello world", "language": "en"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mpeg")
        .assert_header("x-voice-id", "21m00Tcm4TlvDq8ikWAM")
        .assert_header("x-model-id", "eleven_turbo_v2_5")
        .assert_header("x-character-count", "11");
    assert_eq!(response.body_bytes, audio);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_relay_upstream_content_type(ctx: &TestContext) {
    ctx.upstream.respond_with(UpstreamBehavior::Audio {
        content_type: "audio/ogg",
        body: b"OggS-audio".to_vec(),
    });

    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "Hello"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/ogg");
    assert_eq!(response.body_bytes, b"OggS-audio".to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_default_italian_to_giovanni(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "Ciao a tutti", "language": "it"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("x-voice-id", "zcAOhNBS3c14rBihAFp1");
    assert_eq!(
        ctx.upstream.last_request().path,
        "/v1/text-to-speech/zcAOhNBS3c14rBihAFp1"
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_mapped_request_with_credential(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/synthesize",
            &json!({
                "text": "Hola a todos",
                "language": "es",
                "voice": "Domi",
                "model": "multilingual",
                "stability": 0.25,
                "similarity_boost": 0.5
            }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let request = ctx.upstream.last_request();
    assert_eq!(request.path, "/v1/text-to-speech/AZnzlk1XvdvUeBnXmlld");
    assert_eq!(request.api_key.as_deref(), Some(TEST_API_KEY));
    assert_eq!(request.accept.as_deref(), Some("audio/mpeg"));
    assert_eq!(
        request.body,
        json!({
            "text": "Hola a todos",
            "model_id": "eleven_multilingual_v2",
            "voice_settings": {"stability": 0.25, "similarity_boost": 0.5}
        })
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_custom_voice_ids_through(ctx: &TestContext) {
    let custom_voice = "pNInz6obpgDQGcFmaJgB";

    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "Hi", "voice": custom_voice}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("x-voice-id", custom_voice);
    assert_eq!(
        ctx.upstream.last_request().path,
        format!("/v1/text-to-speech/{}", custom_voice)
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text_without_contacting_upstream(ctx: &TestContext) {
    for text in ["", "   ", "\n\t"] {
        let response = ctx
            .client
            .post("/synthesize", &json!({"text": text, "language": "en"}))
            .await
            .unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Text cannot be empty");
    }

    assert_eq!(ctx.upstream.hits(), 0);
}

#[tokio::test]
async fn it_should_reject_too_long_text_without_contacting_upstream() {
    let ctx = TestContext::start(|config| config.max_text_chars = 20).await;

    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "a".repeat(21)}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE)
        .assert_error_message("20 characters or less");
    assert_eq!(ctx.upstream.hits(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_invalid_parameters_without_contacting_upstream(ctx: &TestContext) {
    let invalid_requests = [
        json!({"text": "Hello", "language": "xx"}),
        json!({"text": "Hello", "voice": "Nobody"}),
        json!({"text": "Hello", "voice": "../../admin"}),
        json!({"text": "Hello", "model": "eleven_v9"}),
        json!({"text": "Hello", "stability": 1.5}),
        json!({"text": "Hello", "similarity_boost": -0.1}),
    ];

    for body in invalid_requests {
        let response = ctx.client.post("/synthesize", &body).await.unwrap();
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    assert_eq!(ctx.upstream.hits(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx.client.post_raw("/synthesize", "{\"text\": ").await.unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.body.as_ref().and_then(|b| b.get("message")).is_some());

    let response = ctx
        .client
        .post("/synthesize", &json!({"language": "en"}))
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(ctx.upstream.hits(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_relay_upstream_401_without_retrying(ctx: &TestContext) {
    ctx.upstream.respond_with(UpstreamBehavior::Error {
        status: 401,
        body: r#"{"detail":{"status":"invalid_api_key","message":"Invalid API key"}}"#,
    });

    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "Hello"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Invalid API key");
    assert_eq!(ctx.upstream.hits(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_relay_upstream_server_errors(ctx: &TestContext) {
    ctx.upstream.respond_with(UpstreamBehavior::Error {
        status: 503,
        body: "Service Unavailable",
    });

    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "Hello"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("Service Unavailable");
    assert_eq!(ctx.upstream.hits(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_never_expose_the_credential(ctx: &TestContext) {
    ctx.upstream.respond_with(UpstreamBehavior::Error {
        status: 401,
        body: r#"{"detail":"Unauthorized"}"#,
    });

    let responses = [
        ctx.client.get("/health").await.unwrap(),
        ctx.client
            .post("/synthesize", &json!({"text": "Hello"}))
            .await
            .unwrap(),
        ctx.client
            .post("/synthesize", &json!({"text": ""}))
            .await
            .unwrap(),
    ];

    for response in responses {
        let body = String::from_utf8_lossy(&response.body_bytes);
        assert!(!body.contains(TEST_API_KEY));
        for value in response.headers.values() {
            assert!(!value.contains(TEST_API_KEY));
        }
    }
}

#[tokio::test]
async fn it_should_map_upstream_timeout_to_gateway_timeout() {
    let ctx = TestContext::start(|config| {
        config.upstream_timeout = Duration::from_millis(300);
    })
    .await;
    ctx.upstream.respond_with(UpstreamBehavior::Slow {
        delay: Duration::from_secs(3),
    });

    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "Hello"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(ctx.upstream.hits(), 1);
}

#[tokio::test]
async fn it_should_give_up_on_a_stalled_error_body() {
    let ctx = TestContext::start(|config| {
        config.upstream_timeout = Duration::from_millis(300);
    })
    .await;
    ctx.upstream.respond_with(UpstreamBehavior::StalledError {
        status: 500,
        first: b"Internal error",
    });

    let started = std::time::Instant::now();
    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "Hello"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Internal error");
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn it_should_map_unreachable_upstream_to_bad_gateway() {
    let base_url = helpers::unreachable_base_url().await;
    let ctx = TestContext::start(|config| config.elevenlabs_base_url = base_url).await;

    let response = ctx
        .client
        .post("/synthesize", &json!({"text": "Hello"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
}
