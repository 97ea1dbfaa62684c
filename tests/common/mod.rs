//! In-process stand-in for the PowerDNS HTTP API.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use chrono::{TimeZone, Utc};
use pdns_client::{
    BasicZoneInfo, ClientConfig, Comment, PowerDnsClient, RRSet, Record, RecordType, Zone,
    ZoneCreate, ZoneKind,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-key";
pub const SERVER_ID: &str = "localhost";

pub struct MockPdns {
    zones: Mutex<BTreeMap<String, Zone>>,
}

pub type SharedMock = Arc<MockPdns>;

impl MockPdns {
    pub fn zone(&self, name: &str) -> Option<Zone> {
        self.zones.lock().unwrap().get(name).cloned()
    }
}

pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,pdns_client=debug".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

fn rrset(name: &str, rrtype: RecordType, ttl: u32, contents: &[&str]) -> RRSet {
    RRSet {
        name: name.into(),
        rrtype,
        ttl,
        records: contents.iter().map(|c| Record::new(*c)).collect(),
        comments: vec![],
        changetype: None,
    }
}

fn new_zone(name: &str, kind: ZoneKind, nameservers: &[String]) -> Zone {
    let mut zone = Zone::default();
    zone.info = BasicZoneInfo {
        id: name.into(),
        name: name.into(),
        kind: Some(kind),
        serial: 2024010101,
        url: format!("/api/v1/servers/{SERVER_ID}/zones/{name}"),
        ..Default::default()
    };
    zone.nameservers = nameservers.to_vec();
    let soa = format!("ns1.{name} hostmaster.{name} 2024010101 10800 3600 604800 3600");
    zone.rrsets
        .push(rrset(name, RecordType::SOA, 3600, &[soa.as_str()]));
    if !nameservers.is_empty() {
        let ns: Vec<&str> = nameservers.iter().map(String::as_str).collect();
        zone.rrsets.push(rrset(name, RecordType::NS, 3600, &ns));
    }
    zone
}

/// Zones every mock starts with: `example.com.` with a handful of records and
/// an empty-ish `example.org.`.
fn seed_zones() -> BTreeMap<String, Zone> {
    let ns = vec!["ns1.example.com.".to_string(), "ns2.example.com.".to_string()];

    let mut com = new_zone("example.com.", ZoneKind::NATIVE, &ns);
    com.info.dnssec = true;
    let mut www = rrset("www.example.com.", RecordType::A, 300, &["192.0.2.1", "192.0.2.2"]);
    www.comments.push(Comment {
        content: "web frontends".into(),
        account: "ops".into(),
        modified_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    });
    com.rrsets.push(www);
    com.rrsets.push(rrset("mail.example.com.", RecordType::A, 300, &["192.0.2.10"]));
    com.rrsets.push(rrset(
        "example.com.",
        RecordType::MX,
        300,
        &["10 mail.example.com."],
    ));

    let org = new_zone("example.org.", ZoneKind::MASTER, &ns);

    BTreeMap::from([("example.com.".to_string(), com), ("example.org.".to_string(), org)])
}

pub async fn spawn_mock() -> (SocketAddr, SharedMock) {
    let state = Arc::new(MockPdns {
        zones: Mutex::new(seed_zones()),
    });

    let app = Router::new()
        .route("/api/v1/servers", get(list_servers))
        .route("/api/v1/servers/{server}", get(get_server))
        .route("/api/v1/servers/{server}/config", get(list_config))
        .route(
            "/api/v1/servers/{server}/zones",
            get(list_zones).post(create_zone),
        )
        .route(
            "/api/v1/servers/{server}/zones/{zone}",
            get(get_zone).patch(patch_zone).delete(delete_zone),
        )
        .layer(middleware::from_fn(require_api_key))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, state)
}

pub fn client_for(addr: SocketAddr) -> PowerDnsClient {
    init_tracing();
    PowerDnsClient::new(&ClientConfig::new(addr.to_string(), API_KEY)).unwrap()
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message, "errors": [message] }))).into_response()
}

fn not_found() -> Response {
    api_error(StatusCode::NOT_FOUND, "Not Found")
}

async fn require_api_key(req: Request, next: Next) -> Response {
    let authorized = req
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| key == API_KEY);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(req).await
}

fn server_json() -> serde_json::Value {
    json!({
        "type": "Server",
        "id": SERVER_ID,
        "daemon_type": "authoritative",
        "version": "4.9.0",
        "url": "/api/v1/servers/localhost",
        "config_url": "/api/v1/servers/localhost/config{/config_setting}",
        "zones_url": "/api/v1/servers/localhost/zones{/zone}"
    })
}

async fn list_servers() -> Response {
    Json(json!([server_json()])).into_response()
}

// A few magic ids exercise the client's status handling.
async fn get_server(Path(server): Path<String>) -> Response {
    match server.as_str() {
        SERVER_ID => Json(server_json()).into_response(),
        "empty" => StatusCode::NO_CONTENT.into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
        "invalid" => api_error(StatusCode::UNPROCESSABLE_ENTITY, "Server id is invalid"),
        "garbled" => (StatusCode::OK, "{\"id\": ").into_response(),
        "teapot" => StatusCode::IM_A_TEAPOT.into_response(),
        "moved" => (StatusCode::MOVED_PERMANENTLY, "gone").into_response(),
        "relocated" => Redirect::permanent("/api/v1/servers/localhost").into_response(),
        "elsewhere" => Redirect::to("/api/v1/servers/localhost").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(server_json()).into_response()
        }
        _ => not_found(),
    }
}

async fn list_config(Path(server): Path<String>) -> Response {
    if server != SERVER_ID {
        return not_found();
    }
    Json(json!([
        {"name": "api", "type": "ConfigSetting", "value": "yes"},
        {"name": "default-soa-edit", "type": "ConfigSetting", "value": ""},
        {"name": "webserver-port", "type": "ConfigSetting", "value": "8081"}
    ]))
    .into_response()
}

async fn list_zones(State(state): State<SharedMock>, Path(server): Path<String>) -> Response {
    if server != SERVER_ID {
        return not_found();
    }
    let zones = state.zones.lock().unwrap();
    let infos: Vec<&BasicZoneInfo> = zones.values().map(|z| &z.info).collect();
    Json(json!(infos)).into_response()
}

async fn create_zone(
    State(state): State<SharedMock>,
    Path(server): Path<String>,
    Json(req): Json<ZoneCreate>,
) -> Response {
    if server != SERVER_ID {
        return not_found();
    }
    if !req.name.ends_with('.') {
        return api_error(StatusCode::UNPROCESSABLE_ENTITY, "DNS Name is not canonical");
    }

    let mut zones = state.zones.lock().unwrap();
    if zones.contains_key(&req.name) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "Domain already exists"})),
        )
            .into_response();
    }

    let mut zone = new_zone(&req.name, req.kind, &req.nameservers);
    zone.info.masters = req.masters;
    for mut rrset in req.rrsets {
        rrset.changetype = None;
        zone.rrsets.push(rrset);
    }
    zones.insert(req.name.clone(), zone.clone());

    (StatusCode::CREATED, Json(zone)).into_response()
}

async fn get_zone(
    State(state): State<SharedMock>,
    Path((server, zone)): Path<(String, String)>,
) -> Response {
    if server != SERVER_ID {
        return not_found();
    }
    match state.zones.lock().unwrap().get(&zone) {
        Some(zone) => Json(zone.clone()).into_response(),
        None => not_found(),
    }
}

#[derive(Deserialize)]
struct PatchRequest {
    rrsets: Vec<RRSet>,
}

async fn patch_zone(
    State(state): State<SharedMock>,
    Path((server, zone)): Path<(String, String)>,
    Json(req): Json<PatchRequest>,
) -> Response {
    if server != SERVER_ID {
        return not_found();
    }
    let mut zones = state.zones.lock().unwrap();
    let Some(zone) = zones.get_mut(&zone) else {
        return not_found();
    };

    for change in req.rrsets {
        let Some(changetype) = change.changetype.clone() else {
            return api_error(StatusCode::UNPROCESSABLE_ENTITY, "Changetype not set");
        };
        let same_set = |r: &RRSet| r.name == change.name && r.rrtype == change.rrtype;
        match changetype.as_str() {
            "DELETE" => zone.rrsets.retain(|r| !same_set(r)),
            "REPLACE" => {
                let stored = RRSet {
                    changetype: None,
                    ..change.clone()
                };
                match zone.rrsets.iter_mut().find(|r| same_set(r)) {
                    Some(existing) => *existing = stored,
                    None => zone.rrsets.push(stored),
                }
            }
            other => {
                return api_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    &format!("Changetype '{other}' is not supported"),
                );
            }
        }
    }
    zone.info.serial += 1;

    StatusCode::NO_CONTENT.into_response()
}

async fn delete_zone(
    State(state): State<SharedMock>,
    Path((server, zone)): Path<(String, String)>,
) -> Response {
    if server != SERVER_ID {
        return not_found();
    }
    match state.zones.lock().unwrap().remove(&zone) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}
