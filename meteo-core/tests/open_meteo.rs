//! HTTP behaviour of the Open-Meteo clients against a mock server.

use meteo_core::{
    Dashboard, ForecastClient, ForecastError, GeocodeError, Geocoder, HtmlPage, PanelKind,
    ViewState,
    model::Coordinate,
    provider::{forecast::OpenMeteoForecast, geocoding::OpenMeteoGeocoder},
    render::PLACEHOLDER,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const PARIS: Coordinate = Coordinate {
    latitude: 48.85,
    longitude: 2.35,
};

fn paris_results() -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "id": 2988507,
            "name": "Paris",
            "latitude": 48.85,
            "longitude": 2.35,
            "country_code": "FR",
            "admin1": "Île-de-France",
            "country": "France"
        }],
        "generationtime_ms": 0.7
    })
}

fn geocoder(server: &MockServer) -> OpenMeteoGeocoder {
    OpenMeteoGeocoder::new(format!("{}/v1/search", server.uri()))
}

fn forecasts(server: &MockServer) -> OpenMeteoForecast {
    OpenMeteoForecast::new(
        format!("{}/v1/forecast", server.uri()),
        format!("{}/v1/air-quality", server.uri()),
    )
}

// ============================================================================
// Geocoding
// ============================================================================

#[tokio::test]
async fn resolve_builds_full_place_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_results()))
        .expect(1)
        .mount(&server)
        .await;

    let place = geocoder(&server).resolve("Paris").await.unwrap();

    assert_eq!(place.name, "Paris, Île-de-France, France");
    assert_eq!(place.coordinate, PARIS);
}

#[tokio::test]
async fn resolve_skips_empty_name_parts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "name": "Merit", "admin1": "", "latitude": 33.2, "longitude": -96.0 }]
        })))
        .mount(&server)
        .await;

    let place = geocoder(&server).resolve("Merit").await.unwrap();
    assert_eq!(place.name, "Merit");
}

#[tokio::test]
async fn resolve_empty_results_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })),
        )
        .mount(&server)
        .await;

    let err = geocoder(&server).resolve("Nowhere").await.unwrap_err();
    assert!(matches!(err, GeocodeError::NotFound));
}

#[tokio::test]
async fn resolve_missing_results_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "generationtime_ms": 1.0 })),
        )
        .mount(&server)
        .await;

    let err = geocoder(&server).resolve("Nowhere").await.unwrap_err();
    assert!(matches!(err, GeocodeError::NotFound));
}

#[tokio::test]
async fn resolve_http_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = geocoder(&server).resolve("Paris").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Transport { status: 429 }));
    assert_eq!(err.to_string(), "Geocoding failed (HTTP 429)");
}

#[tokio::test]
async fn resolve_invalid_json_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = geocoder(&server).resolve("Paris").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Parse(_)));
}

// ============================================================================
// Forecasts
// ============================================================================

#[tokio::test]
async fn temperature_requests_current_hourly_and_daily() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.85"))
        .and(query_param("longitude", "2.35"))
        .and(query_param("current_weather", "true"))
        .and(query_param("hourly", "temperature_2m"))
        .and(query_param("daily", "temperature_2m_max,temperature_2m_min"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_weather": { "temperature": 18.2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sample = forecasts(&server).fetch(PanelKind::Temperature, PARIS).await.unwrap();
    assert_eq!(sample.current("temperature"), Some(18.2));
}

#[tokio::test]
async fn rain_and_humidity_request_their_metrics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("hourly", "precipitation,precipitation_probability"))
        .and(query_param("daily", "precipitation_sum"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hourly": { "precipitation": [0.2] }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("hourly", "relative_humidity_2m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hourly": { "relative_humidity_2m": [81] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = forecasts(&server);
    let rain = client.fetch(PanelKind::Rain, PARIS).await.unwrap();
    let humidity = client.fetch(PanelKind::Humidity, PARIS).await.unwrap();

    assert_eq!(rain.hourly("precipitation", 0), Some(0.2));
    assert_eq!(humidity.hourly("relative_humidity_2m", 0), Some(81.0));
}

#[tokio::test]
async fn air_quality_goes_to_its_own_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .and(query_param("hourly", "pm10,pm2_5,ozone,carbon_monoxide"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hourly": { "pm2_5": [4.1] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sample = forecasts(&server).fetch(PanelKind::Air, PARIS).await.unwrap();
    assert_eq!(sample.hourly("pm2_5", 0), Some(4.1));
}

#[tokio::test]
async fn forecast_http_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true, "reason": "Latitude must be in range of -90 to 90°."
        })))
        .mount(&server)
        .await;

    let err = forecasts(&server).fetch(PanelKind::Rain, PARIS).await.unwrap_err();
    assert!(matches!(err, ForecastError::Transport { status: 400 }));
}

#[tokio::test]
async fn forecast_invalid_json_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = forecasts(&server).fetch(PanelKind::Humidity, PARIS).await.unwrap_err();
    assert!(matches!(err, ForecastError::Parse(_)));
}

// ============================================================================
// End to end through the dashboard
// ============================================================================

#[tokio::test]
async fn paris_scenario_renders_now_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_results()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_weather": { "temperature": 18.2 },
            "hourly": {
                "temperature_2m": [
                    12.0, null, null, null, null, null, null, null, null, null, null, null, 19.5
                ]
            },
            "daily": { "temperature_2m_max": [null], "temperature_2m_min": [11.0] }
        })))
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(Box::new(geocoder(&server)), Box::new(forecasts(&server)));
    let page = HtmlPage::new();

    let state = dashboard.submit(&page, &ViewState::default(), "Paris").await.unwrap();

    assert_eq!(
        state.place.as_ref().map(|p| p.name.as_str()),
        Some("Paris, Île-de-France, France")
    );
    assert_eq!(page.status(), "");

    let html = page.panel_html(PanelKind::Temperature);
    assert!(html.contains(r#"<h3>Now</h3><div class="big">18.2 °C</div>"#));
    assert!(html.contains(&format!("<span>Max (today)</span><span>{PLACEHOLDER}</span>")));
    assert!(html.contains("<span>Hour +0</span><span>12 °C</span>"));
    assert!(html.contains("<span>Hour +12</span><span>19.5 °C</span>"));
    assert!(!html.contains("Hour +6"));
    assert!(!html.contains("Hour +18"));
}

#[tokio::test]
async fn unknown_city_keeps_previous_state_and_shows_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(Box::new(geocoder(&server)), Box::new(forecasts(&server)));
    let page = HtmlPage::new();

    let result = dashboard.submit(&page, &ViewState::default(), "Atlantis").await;

    assert!(result.is_err());
    assert_eq!(page.status(), "City not found");
}
