use std::time::Duration;

use group_digest::weather::{
    AmapWeatherClient, WEATHER_NOT_CONFIGURED, WEATHER_REQUEST_FAILED, WEATHER_UNAVAILABLE,
    WeatherLookup,
};
use mockito::Matcher;

fn client(key: &str, base_url: &str) -> AmapWeatherClient {
    AmapWeatherClient::new(key, base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_empty_key_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let weather = client("", &server.url()).current_weather("北京").await;

    assert_eq!(weather, WEATHER_NOT_CONFIGURED);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_live_weather_is_formatted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/weatherInfo")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("city".into(), "Shanghai".into()),
            Matcher::UrlEncoded("key".into(), "test-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"1","lives":[{"weather":"Sunny","temperature":"20"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let weather = client("test-key", &server.url())
        .current_weather("Shanghai")
        .await;

    assert!(weather.contains("Sunny"));
    assert!(weather.contains("20"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_failure_status_reports_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/weatherInfo")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status":"0","info":"INVALID_USER_KEY","lives":[]}"#)
        .create_async()
        .await;

    let weather = client("bad-key", &server.url())
        .current_weather("北京")
        .await;
    assert_eq!(weather, WEATHER_UNAVAILABLE);
}

#[tokio::test]
async fn test_http_error_reports_request_failed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/weatherInfo")
        .match_query(Matcher::Any)
        .with_status(502)
        .create_async()
        .await;

    let weather = client("k", &server.url()).current_weather("北京").await;
    assert_eq!(weather, WEATHER_REQUEST_FAILED);
}

#[tokio::test]
async fn test_malformed_body_reports_request_failed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/weatherInfo")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let weather = client("k", &server.url()).current_weather("北京").await;
    assert_eq!(weather, WEATHER_REQUEST_FAILED);
}

#[tokio::test]
async fn test_unreachable_host_reports_request_failed() {
    let weather = client("k", "http://127.0.0.1:1")
        .current_weather("北京")
        .await;
    assert_eq!(weather, WEATHER_REQUEST_FAILED);
}

#[tokio::test]
async fn test_fetch_live_surfaces_typed_errors() {
    let err = client("", "http://127.0.0.1:1")
        .fetch_live("北京")
        .await
        .unwrap_err();
    assert!(err.is_configuration_missing());

    let err = client("k", "http://127.0.0.1:1")
        .fetch_live("北京")
        .await
        .unwrap_err();
    assert!(err.is_upstream_failure());
}

#[tokio::test]
async fn test_bad_base_url_reports_request_failure() {
    let client = client("test-key", "not a url");

    let err = client.fetch_live("北京").await.unwrap_err();
    assert!(!err.is_configuration_missing());
    assert!(err.is_upstream_failure());

    assert_eq!(client.current_weather("北京").await, WEATHER_REQUEST_FAILED);
}
