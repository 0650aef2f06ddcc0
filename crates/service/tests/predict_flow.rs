//! Service-level prediction flow: wire request in, priced response and
//! history side effect out, over the real warp routes.

use std::sync::Arc;

use chrono::NaiveDate;
use farecast_core::{
    FittedEncoder, ForestModel, ModelBundle, Node, Normalization, TrainingRow, Tree, TripRecord,
    FEATURE_COUNT, FEATURE_NAMES, PRICE_FLOOR,
};
use farecast_service::{
    http, MemoryHistory, PredictionRequest, PredictionResponse, PredictionService,
};

fn training_row(airline: &str, day: u32, origin: &str, dest: &str, price: f64) -> TrainingRow {
    TrainingRow {
        trip: TripRecord {
            airline: airline.to_string(),
            travel_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            origin: origin.to_string(),
            destination: dest.to_string(),
            departure_hour: 8,
            departure_minute: 30,
            duration_hours: 1.2,
            stop_count: 0,
            fare_label: "Incluye equipaje".to_string(),
        },
        price,
    }
}

/// Bundle whose forest always returns a fixed raw value.
fn leaf_bundle(value: f64) -> Arc<ModelBundle> {
    let rows = vec![
        training_row("LATAM Perú", 1, "LIM", "CUZ", 320.0),
        training_row("Sky Airline Perú", 15, "CUZ", "LIM", 280.0),
    ];
    let encoder = FittedEncoder::fit(&rows).unwrap();
    let matrix = encoder.raw_matrix(&rows).unwrap();
    let scaler = Normalization::fit(&matrix).unwrap();
    let forest = ForestModel::new(vec![Tree::new(vec![Node::leaf(value)]); 3], FEATURE_COUNT);
    let names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();

    Arc::new(ModelBundle::new(forest, encoder, scaler, names).unwrap())
}

fn make_service(value: f64) -> Arc<PredictionService> {
    Arc::new(PredictionService::new(
        leaf_bundle(value),
        Arc::new(MemoryHistory::new()),
    ))
}

fn request(user: Option<&str>) -> PredictionRequest {
    PredictionRequest {
        airline: "LATAM Perú".to_string(),
        travel_date: "2024-02-01".to_string(),
        origin: "LIM".to_string(),
        destination: "CUZ".to_string(),
        departure_time: "08:30".to_string(),
        duration_hours: 1.2,
        stop_count: 0,
        fare_label: "Incluye equipaje".to_string(),
        user: user.map(str::to_string),
    }
}

#[test]
fn predict_echoes_route_and_date() {
    let service = make_service(312.341);
    let response = service.predict(request(None)).unwrap();

    assert_eq!(response.price, 312.34);
    assert_eq!(response.route, "LIM-CUZ");
    assert_eq!(response.airline, "LATAM Perú");
    assert_eq!(response.travel_date, "2024-02-01");
}

#[test]
fn predict_applies_price_floor() {
    let service = make_service(40.0);
    let response = service.predict(request(None)).unwrap();
    assert_eq!(response.price, PRICE_FLOOR);
}

#[test]
fn predict_appends_history_only_for_named_users() {
    let service = make_service(300.0);

    service.predict(request(None)).unwrap();
    assert!(service.history_for("ana").is_empty());

    service.predict(request(Some("ana"))).unwrap();
    service.predict(request(Some("ana"))).unwrap();

    let history = service.history_for("ana");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].route, "LIM-CUZ");
    assert_eq!(history[0].price, 300.0);

    assert_eq!(service.delete_user_history("ana"), 2);
    assert!(service.history_for("ana").is_empty());
}

#[test]
fn failed_predictions_leave_no_history() {
    let service = make_service(300.0);

    let mut bad = request(Some("ana"));
    bad.destination = "LIM".to_string();
    assert!(service.predict(bad).is_err());
    assert!(service.history_for("ana").is_empty());
}

#[tokio::test]
async fn http_predict_round_trip() {
    let routes = http::routes(make_service(300.0));

    let reply = warp::test::request()
        .method("POST")
        .path("/api/predict")
        .json(&serde_json::json!({
            "airline": "LATAM Perú",
            "travel_date": "2024-02-01",
            "origin": "LIM",
            "destination": "CUZ",
            "departure_time": "08:30",
            "duration_hours": 1.2,
            "stop_count": 0,
            "fare_label": "Incluye equipaje",
            "user": "ana"
        }))
        .reply(&routes)
        .await;

    assert_eq!(reply.status(), 200);
    let response: PredictionResponse = serde_json::from_slice(reply.body()).unwrap();
    assert_eq!(response.price, 300.0);
    assert_eq!(response.route, "LIM-CUZ");
}

#[tokio::test]
async fn http_rejects_same_origin_destination() {
    let routes = http::routes(make_service(300.0));

    let reply = warp::test::request()
        .method("POST")
        .path("/api/predict")
        .json(&serde_json::json!({
            "airline": "LATAM Perú",
            "travel_date": "2024-02-01",
            "origin": "LIM",
            "destination": "LIM",
            "departure_time": "08:30",
            "duration_hours": 1.2,
            "stop_count": 0,
            "fare_label": "Incluye equipaje"
        }))
        .reply(&routes)
        .await;

    assert_eq!(reply.status(), 400);
    let body: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn http_rejects_unknown_airline() {
    let routes = http::routes(make_service(300.0));

    let reply = warp::test::request()
        .method("POST")
        .path("/api/predict")
        .json(&serde_json::json!({
            "airline": "Star Perú",
            "travel_date": "2024-02-01",
            "origin": "LIM",
            "destination": "CUZ",
            "departure_time": "08:30",
            "duration_hours": 1.2,
            "stop_count": 0,
            "fare_label": "Incluye equipaje"
        }))
        .reply(&routes)
        .await;

    assert_eq!(reply.status(), 400);
    let body: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
    assert_eq!(body["error"], "unknown_category");
}

#[tokio::test]
async fn http_history_and_health() {
    let service = make_service(300.0);
    let routes = http::routes(service.clone());

    service.predict(request(Some("ana"))).unwrap();

    let reply = warp::test::request()
        .method("GET")
        .path("/api/history/ana")
        .reply(&routes)
        .await;
    assert_eq!(reply.status(), 200);
    let entries: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);

    let reply = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&routes)
        .await;
    assert_eq!(reply.status(), 200);
}

#[tokio::test]
async fn http_advise() {
    let routes = http::routes(make_service(300.0));

    let reply = warp::test::request()
        .method("POST")
        .path("/api/advise")
        .json(&serde_json::json!({ "message": "¿qué día es más barato?" }))
        .reply(&routes)
        .await;

    assert_eq!(reply.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
    assert_eq!(body["done"], false);
    assert!(body["text"].as_str().unwrap().contains("martes"));
}
