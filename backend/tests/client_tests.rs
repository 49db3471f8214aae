//! Upstream client integration tests
//!
//! Each client talks to a local axum server standing in for the real API:
//! - OpenWeatherMap current weather
//! - Bedrock InvokeModel
//! - Cognito Identity Provider JSON API
//! - Cognito JWKS signing keys

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};
use shared::LocationInput;

use kisaan_server::{
    config::{BedrockConfig, CognitoConfig},
    error::AppError,
    external::{
        cognito::{secret_hash, IdentityError},
        BedrockClient, CognitoClient, CognitoTokenVerifier, ModelProvider, OpenWeatherClient,
        TokenVerifier, WeatherProvider, WeatherQuery,
    },
};

/// Serve `router` on an ephemeral port and return its base URL
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

type Captured = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

// ============================================================================
// Weather
// ============================================================================

async fn owm_current(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("q").map(String::as_str) == Some("Nashik,Maharashtra,IN")
        && params.get("appid").map(String::as_str) == Some("owm-key")
        && params.get("units").map(String::as_str) == Some("metric")
    {
        return Json(json!({
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
            "main": {"temp": 31.0, "feels_like": 32.4, "pressure": 1009, "humidity": 38},
            "wind": {"speed": 4.6},
            "clouds": {"all": 0},
            "name": "Nashik"
        }))
        .into_response();
    }

    if params.get("q").map(String::as_str) == Some("Atlantis,IN") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"cod": "404", "message": "city not found"})),
        )
            .into_response();
    }

    let expected = [("lat", "26.85"), ("lon", "80.95"), ("appid", "owm-key"), ("units", "metric")];
    if expected
        .iter()
        .any(|(k, v)| params.get(*k).map(String::as_str) != Some(*v))
    {
        return (StatusCode::BAD_REQUEST, Json(json!({"cod": "400"}))).into_response();
    }

    Json(json!({
        "weather": [{"id": 721, "main": "Haze", "description": "haze"}],
        "main": {"temp": 28.0, "feels_like": 30.5, "pressure": 1008, "humidity": 70},
        "wind": {"speed": 3.1, "deg": 270},
        "clouds": {"all": 40},
        "rain": {"1h": 0.4, "3h": 1.2},
        "name": "Lucknow"
    }))
    .into_response()
}

#[tokio::test]
async fn test_weather_by_coordinates() {
    let base = spawn(Router::new().route("/weather", get(owm_current))).await;
    let client = OpenWeatherClient::with_base_url(reqwest::Client::new(), "owm-key".into(), base);

    let snapshot = client
        .current_weather(&WeatherQuery::Coordinates { lat: 26.85, lon: 80.95 })
        .await
        .unwrap()
        .expect("weather available");

    assert_eq!(snapshot.temperature, 28.0);
    assert_eq!(snapshot.humidity, 70);
    assert_eq!(snapshot.rainfall, 0.4);
    assert_eq!(snapshot.location_name.as_deref(), Some("Lucknow"));
}

#[tokio::test]
async fn test_weather_by_city_and_state() {
    let base = spawn(Router::new().route("/weather", get(owm_current))).await;
    let client = OpenWeatherClient::with_base_url(reqwest::Client::new(), "owm-key".into(), base);
    let location = LocationInput {
        city: Some("Nashik".into()),
        state: Some("Maharashtra".into()),
        ..Default::default()
    };

    let query = WeatherQuery::from_location(&location, "IN").unwrap();
    let snapshot = client
        .current_weather(&query)
        .await
        .unwrap()
        .expect("weather available");

    assert_eq!(snapshot.temperature, 31.0);
    assert_eq!(snapshot.rainfall, 0.0);
    assert_eq!(snapshot.description.as_deref(), Some("clear sky"));
    assert_eq!(snapshot.location_name.as_deref(), Some("Nashik"));
}

#[tokio::test]
async fn test_weather_provider_error_means_no_weather() {
    let base = spawn(Router::new().route("/weather", get(owm_current))).await;
    let client = OpenWeatherClient::with_base_url(reqwest::Client::new(), "owm-key".into(), base);

    let snapshot = client
        .current_weather(&WeatherQuery::Place("Atlantis,IN".into()))
        .await
        .unwrap();

    assert!(snapshot.is_none());
}

#[tokio::test]
async fn test_weather_unreachable_is_an_error() {
    let client = OpenWeatherClient::with_base_url(
        reqwest::Client::new(),
        "owm-key".into(),
        "http://127.0.0.1:9".into(),
    );

    let result = client
        .current_weather(&WeatherQuery::Place("Lucknow,IN".into()))
        .await;

    assert!(result.is_err());
}

// ============================================================================
// Bedrock
// ============================================================================

fn bedrock_config(endpoint: String) -> BedrockConfig {
    BedrockConfig {
        region: "us-east-1".into(),
        model_id: "anthropic.claude-3-haiku-20240307-v1:0".into(),
        api_key: "model-key".into(),
        endpoint: Some(endpoint),
        max_tokens: 4096,
        temperature: 0.3,
        anthropic_version: "bedrock-2023-05-31".into(),
    }
}

async fn bedrock_ok(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    captured.lock().unwrap().push((headers, body));
    Json(json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": "{\"generalAdvice\": \"Mulch the beds\"}"}],
        "stop_reason": "end_turn"
    }))
}

#[tokio::test]
async fn test_bedrock_invoke_payload_and_reply() {
    let captured = Captured::default();
    let router = Router::new()
        .route("/model/:model_id/invoke", post(bedrock_ok))
        .with_state(captured.clone());
    let base = spawn(router).await;
    let client = BedrockClient::new(reqwest::Client::new(), &bedrock_config(base));

    let reply = client
        .invoke("You are an agronomist.", "Plan irrigation for wheat.")
        .await
        .unwrap();
    assert_eq!(reply, "{\"generalAdvice\": \"Mulch the beds\"}");

    let captured = captured.lock().unwrap();
    let (headers, body) = &captured[0];
    assert_eq!(headers["authorization"], "Bearer model-key");
    assert_eq!(body["anthropic_version"], json!("bedrock-2023-05-31"));
    assert_eq!(body["max_tokens"], json!(4096));
    assert_eq!(body["system"], json!("You are an agronomist."));
    assert_eq!(
        body["messages"],
        json!([{"role": "user", "content": "Plan irrigation for wheat."}])
    );
}

async fn bedrock_denied() -> Response {
    (
        StatusCode::FORBIDDEN,
        [("x-amzn-ErrorType", "AccessDeniedException:http://internal.amazon.com/coral/")],
        Json(json!({"message": "You don't have access to the model with the specified model ID."})),
    )
        .into_response()
}

async fn bedrock_throttled() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [("x-amzn-ErrorType", "ThrottlingException")],
        Json(json!({"message": "Too many requests"})),
    )
        .into_response()
}

#[tokio::test]
async fn test_bedrock_access_denied() {
    let base = spawn(Router::new().route("/model/:model_id/invoke", post(bedrock_denied))).await;
    let client = BedrockClient::new(reqwest::Client::new(), &bedrock_config(base));

    let result = client.invoke("sys", "user").await;

    assert!(matches!(result, Err(AppError::ModelAccessDenied(_))));
}

#[tokio::test]
async fn test_bedrock_other_failures_keep_status() {
    let base =
        spawn(Router::new().route("/model/:model_id/invoke", post(bedrock_throttled))).await;
    let client = BedrockClient::new(reqwest::Client::new(), &bedrock_config(base));

    match client.invoke("sys", "user").await {
        Err(AppError::ModelInvocation { status, body }) => {
            assert_eq!(status, 429);
            assert!(body.contains("Too many requests"));
        }
        other => panic!("expected ModelInvocation, got {:?}", other.map(|_| ())),
    }
}

// ============================================================================
// Cognito
// ============================================================================

fn cognito_config(endpoint: String, client_secret: Option<&str>) -> CognitoConfig {
    CognitoConfig {
        region: "ap-south-1".into(),
        user_pool_id: "ap-south-1_Test".into(),
        client_id: "app-client".into(),
        client_secret: client_secret.map(str::to_string),
        endpoint: Some(endpoint),
        jwks_cache_ttl_secs: 600,
    }
}

async fn cognito_api(
    State(captured): State<Captured>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let target = headers
        .get("x-amz-target")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    captured.lock().unwrap().push((headers, body.clone()));

    match target.as_str() {
        "AWSCognitoIdentityProviderService.InitiateAuth" => Json(json!({
            "AuthenticationResult": {
                "AccessToken": "access",
                "IdToken": "id",
                "RefreshToken": "refresh",
                "ExpiresIn": 3600,
                "TokenType": "Bearer"
            },
            "ChallengeParameters": {}
        }))
        .into_response(),
        "AWSCognitoIdentityProviderService.GlobalSignOut" => StatusCode::OK.into_response(),
        "AWSCognitoIdentityProviderService.SignUp" => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "__type": "com.amazonaws.cognito.identity.idp.model#UsernameExistsException",
                "message": "An account with the given email already exists."
            })),
        )
            .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"__type": "InternalErrorException", "message": "boom"})),
        )
            .into_response(),
    }
}

async fn cognito_server() -> (String, Captured) {
    let captured = Captured::default();
    let router = Router::new()
        .route("/", post(cognito_api))
        .with_state(captured.clone());
    (spawn(router).await, captured)
}

#[tokio::test]
async fn test_cognito_sign_in_with_secret_hash() {
    let (base, captured) = cognito_server().await;
    let client = CognitoClient::new(
        reqwest::Client::new(),
        &cognito_config(base, Some("client-secret")),
    );

    let tokens = client.sign_in("farmer@example.com", "Passw0rd!").await.unwrap();
    assert_eq!(tokens.access_token, "access");
    assert_eq!(tokens.expires_in, 3600);

    let captured = captured.lock().unwrap();
    let (headers, body) = &captured[0];
    assert_eq!(
        headers["x-amz-target"],
        "AWSCognitoIdentityProviderService.InitiateAuth"
    );
    assert_eq!(headers["content-type"], "application/x-amz-json-1.1");
    assert_eq!(body["AuthFlow"], json!("USER_PASSWORD_AUTH"));
    assert_eq!(body["ClientId"], json!("app-client"));
    assert_eq!(body["AuthParameters"]["USERNAME"], json!("farmer@example.com"));
    let expected = secret_hash("client-secret", "farmer@example.com", "app-client").unwrap();
    assert_eq!(body["AuthParameters"]["SECRET_HASH"], json!(expected));
}

#[tokio::test]
async fn test_cognito_empty_success_body() {
    let (base, _) = cognito_server().await;
    let client = CognitoClient::new(reqwest::Client::new(), &cognito_config(base, None));

    client.global_sign_out("access").await.unwrap();
}

#[tokio::test]
async fn test_cognito_error_name_is_unprefixed() {
    let (base, captured) = cognito_server().await;
    let client = CognitoClient::new(reqwest::Client::new(), &cognito_config(base, None));

    let err = client
        .sign_up("uuid-1", "farmer@example.com", "Passw0rd!", "Ramesh", None)
        .await
        .unwrap_err();

    match &err {
        IdentityError::Provider { name, .. } => assert_eq!(name, "UsernameExistsException"),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(
        AppError::from(err).into_response().status(),
        StatusCode::CONFLICT
    );

    let captured = captured.lock().unwrap();
    let (_, body) = &captured[0];
    assert!(body.get("SecretHash").is_none());
    assert_eq!(body["UserAttributes"][0], json!({"Name": "email", "Value": "farmer@example.com"}));
}

#[tokio::test]
async fn test_cognito_unmapped_error_is_500() {
    let (base, _) = cognito_server().await;
    let client = CognitoClient::new(reqwest::Client::new(), &cognito_config(base, None));

    let err = client.get_user("access").await.unwrap_err();

    assert_eq!(
        AppError::from(err).into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

// ============================================================================
// Token verification
// ============================================================================

const ISSUER: &str = "https://cognito-idp.ap-south-1.amazonaws.com/ap-south-1_Test";

#[derive(Serialize)]
struct TestClaims<'a> {
    sub: &'a str,
    iss: &'a str,
    exp: i64,
    token_use: &'a str,
    username: &'a str,
    client_id: &'a str,
}

fn sign(kid: &str, iss: &str, exp: i64) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(include_bytes!("fixtures/test_rsa_key.pem")).unwrap();
    let claims = TestClaims {
        sub: "8f1c-user",
        iss,
        exp,
        token_use: "access",
        username: "8f1c-user",
        client_id: "app-client",
    };
    encode(&header, &claims, &key).unwrap()
}

async fn jwks_server() -> (String, Arc<Mutex<usize>>) {
    let fetches = Arc::new(Mutex::new(0usize));
    let router = Router::new()
        .route(
            "/ap-south-1_Test/.well-known/jwks.json",
            get(|State(fetches): State<Arc<Mutex<usize>>>| async move {
                *fetches.lock().unwrap() += 1;
                let jwks: Value =
                    serde_json::from_str(include_str!("fixtures/jwks.json")).unwrap();
                Json(jwks)
            }),
        )
        .with_state(fetches.clone());
    (spawn(router).await, fetches)
}

fn in_one_hour() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

#[tokio::test]
async fn test_valid_token_is_accepted_and_keys_cached() {
    let (base, fetches) = jwks_server().await;
    let verifier = CognitoTokenVerifier::new(reqwest::Client::new(), &cognito_config(base, None));
    let token = sign("test-key-1", ISSUER, in_one_hour());

    let user = verifier.verify(&token).await.unwrap();
    assert_eq!(user.sub, "8f1c-user");
    assert_eq!(user.username.as_deref(), Some("8f1c-user"));
    assert_eq!(user.token_use.as_deref(), Some("access"));
    assert!(user.email.is_none());

    verifier.verify(&token).await.unwrap();
    assert_eq!(*fetches.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_expired_token() {
    let (base, _) = jwks_server().await;
    let verifier = CognitoTokenVerifier::new(reqwest::Client::new(), &cognito_config(base, None));
    let token = sign("test-key-1", ISSUER, chrono::Utc::now().timestamp() - 3600);

    assert!(matches!(
        verifier.verify(&token).await,
        Err(AppError::TokenExpired)
    ));
}

#[tokio::test]
async fn test_foreign_issuer_and_unknown_key_are_rejected() {
    let (base, _) = jwks_server().await;
    let verifier = CognitoTokenVerifier::new(reqwest::Client::new(), &cognito_config(base, None));

    let foreign = sign(
        "test-key-1",
        "https://cognito-idp.us-east-1.amazonaws.com/us-east-1_Other",
        in_one_hour(),
    );
    assert!(matches!(
        verifier.verify(&foreign).await,
        Err(AppError::InvalidToken(_))
    ));

    let unknown_kid = sign("rotated-key", ISSUER, in_one_hour());
    assert!(matches!(
        verifier.verify(&unknown_kid).await,
        Err(AppError::InvalidToken(_))
    ));

    assert!(matches!(
        verifier.verify("not.a.jwt").await,
        Err(AppError::InvalidToken(_))
    ));
}

#[tokio::test]
async fn test_signing_key_outage_is_401() {
    let verifier = CognitoTokenVerifier::new(
        reqwest::Client::new(),
        &cognito_config("http://127.0.0.1:9".into(), None),
    );
    let token = sign("test-key-1", ISSUER, in_one_hour());

    let err = verifier.verify(&token).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidToken(_)));
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

