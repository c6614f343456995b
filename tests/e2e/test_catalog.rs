use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;
use test_context::test_context;

const LANGUAGE_CODES: [&str; 15] = [
    "it", "en", "fr", "es", "de", "pt", "pl", "nl", "ja", "ko", "zh", "ar", "ru", "hi", "tr",
];

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_supported_languages_in_order(ctx: &TestContext) {
    let response = ctx.client.get("/languages").await.unwrap();
    response.assert_status(StatusCode::OK);

    let languages: Vec<Value> = response.json().unwrap();
    let codes: Vec<&str> = languages
        .iter()
        .map(|l| l.get("code").and_then(|c| c.as_str()).unwrap())
        .collect();
    assert_eq!(codes, LANGUAGE_CODES.to_vec());
    assert_eq!(
        languages[0],
        serde_json::json!({"code": "it", "name": "Italian"})
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_voices_for_every_supported_language(ctx: &TestContext) {
    for code in LANGUAGE_CODES {
        let path = format!("/voices?language={}", code);

        let first = ctx.client.get(&path).await.unwrap();
        first.assert_status(StatusCode::OK);
        let voices: Vec<Value> = first.json().unwrap();
        assert!(!voices.is_empty(), "no voices for {}", code);

        for voice in &voices {
            assert!(voice.get("name").and_then(|v| v.as_str()).is_some());
            assert!(voice.get("voice_id").and_then(|v| v.as_str()).is_some());
            assert!(voice.get("gender").and_then(|v| v.as_str()).is_some());
            assert!(voice.get("language").and_then(|v| v.as_str()).is_some());
        }

        // Same order on every call
        let second: Vec<Value> = ctx.client.get(&path).await.unwrap().json().unwrap();
        assert_eq!(voices, second);
    }

    assert_eq!(ctx.upstream.hits(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_italian_voices_with_giovanni_first(ctx: &TestContext) {
    let voices: Vec<Value> = ctx
        .client
        .get("/voices?language=it")
        .await
        .unwrap()
        .json()
        .unwrap();

    assert_eq!(
        voices,
        vec![
            serde_json::json!({
                "name": "Giovanni",
                "voice_id": "zcAOhNBS3c14rBihAFp1",
                "gender": "male",
                "language": "it"
            }),
            serde_json::json!({
                "name": "Matilda",
                "voice_id": "XrExE9yKIg1WjnnlVkGX",
                "gender": "female",
                "language": "it"
            }),
        ]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_the_whole_catalog_without_language(ctx: &TestContext) {
    let response = ctx.client.get("/voices").await.unwrap();
    response.assert_status(StatusCode::OK);

    let voices: Vec<Value> = response.json().unwrap();
    assert_eq!(voices.len(), 12);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_treat_blank_language_as_absent(ctx: &TestContext) {
    let all: Vec<Value> = ctx.client.get("/voices").await.unwrap().json().unwrap();

    for path in ["/voices?language=", "/voices?language=%20%20"] {
        let response = ctx.client.get(path).await.unwrap();
        response.assert_status(StatusCode::OK);

        let voices: Vec<Value> = response.json().unwrap();
        assert_eq!(voices, all);
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsupported_language_without_contacting_upstream(ctx: &TestContext) {
    for code in ["xx", "klingon", "EN-us"] {
        let response = ctx
            .client
            .get(&format!("/voices?language={}", code))
            .await
            .unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("unsupported language");
    }

    assert_eq!(ctx.upstream.hits(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_first_listed_voice_as_default(ctx: &TestContext) {
    for code in ["it", "en", "ja"] {
        let voices: Vec<Value> = ctx
            .client
            .get(&format!("/voices?language={}", code))
            .await
            .unwrap()
            .json()
            .unwrap();
        let first_voice_id = voices[0].get("voice_id").and_then(|v| v.as_str()).unwrap();

        let response = ctx
            .client
            .post(
                "/synthesize",
                &serde_json::json!({"text": "Test", "language": code}),
            )
            .await
            .unwrap();

        response
            .assert_status(StatusCode::OK)
            .assert_header("x-voice-id", first_voice_id);
    }
}
