//! In-memory stand-in for the downstream Aircraft/Airport service.
//!
//! Unknown ids answer 404 with the plain body `not found`; registering an
//! airport name twice answers 409 with a structured error payload; the
//! `/status/{code}` routes answer `code` with an empty body; `/echo/accept`
//! returns the request's `accept` header values.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: u64,
    pub model: String,
}

#[derive(Deserialize)]
pub struct AircraftInput {
    pub model: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Airport {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct AirportInput {
    pub name: String,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    aircraft: BTreeMap<u64, Aircraft>,
    airports: BTreeMap<u64, Airport>,
}

impl Store {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/aircraft", get(list_aircraft).post(create_aircraft))
        .route("/aircraft/{id}", get(get_aircraft).put(update_aircraft))
        .route("/airports", get(list_airports).post(create_airport))
        .route("/airports/{id}", get(get_airport).put(update_airport))
        .route(
            "/status/{code}",
            get(status_only).post(status_only).put(status_only),
        )
        .route("/echo/accept", get(echo_accept))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

async fn list_aircraft(State(db): State<Db>) -> Json<Vec<Aircraft>> {
    let store = db.read().await;
    Json(store.aircraft.values().cloned().collect())
}

async fn create_aircraft(
    State(db): State<Db>,
    Json(input): Json<AircraftInput>,
) -> (StatusCode, Json<Aircraft>) {
    let mut store = db.write().await;
    let aircraft = Aircraft {
        id: store.allocate_id(),
        model: input.model,
    };
    store.aircraft.insert(aircraft.id, aircraft.clone());
    tracing::debug!(id = aircraft.id, "aircraft registered");
    (StatusCode::CREATED, Json(aircraft))
}

async fn get_aircraft(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    match db.read().await.aircraft.get(&id) {
        Some(aircraft) => Json(aircraft.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_aircraft(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<AircraftInput>,
) -> Response {
    let mut store = db.write().await;
    match store.aircraft.get_mut(&id) {
        Some(aircraft) => {
            aircraft.model = input.model;
            Json(aircraft.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn list_airports(State(db): State<Db>) -> Json<Vec<Airport>> {
    let store = db.read().await;
    Json(store.airports.values().cloned().collect())
}

async fn create_airport(State(db): State<Db>, Json(input): Json<AirportInput>) -> Response {
    let mut store = db.write().await;
    if store.airports.values().any(|a| a.name == input.name) {
        let payload = serde_json::json!({ "errorCode": "DUP", "message": "duplicate" });
        return (StatusCode::CONFLICT, Json(payload)).into_response();
    }
    let airport = Airport {
        id: store.allocate_id(),
        name: input.name,
    };
    store.airports.insert(airport.id, airport.clone());
    (StatusCode::CREATED, Json(airport)).into_response()
}

async fn get_airport(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    match db.read().await.airports.get(&id) {
        Some(airport) => Json(airport.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_airport(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<AirportInput>,
) -> Response {
    let mut store = db.write().await;
    match store.airports.get_mut(&id) {
        Some(airport) => {
            airport.name = input.name;
            Json(airport.clone()).into_response()
        }
        None => not_found(),
    }
}

/// Every `accept` header value the request carried, in order.
async fn echo_accept(headers: HeaderMap) -> Json<Vec<String>> {
    let values = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect();
    Json(values)
}

async fn status_only(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}
