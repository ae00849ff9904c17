use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;
pub const IDEMPOTENCY_HEADER: &str = "idempotency-key";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acp {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub squadron: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct CreateAcp {
    pub name: String,
    pub code: String,
    pub description: String,
    pub squadron: String,
}

#[derive(Deserialize)]
pub struct UpdateAcp {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub squadron: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionWindow {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub status: String,
    pub capacity: u32,
    pub acp_profile_id: u64,
    pub commander_id: String,
    pub operator_id: Option<String>,
    pub banner_url: Option<String>,
    pub auth_code: Option<String>,
    pub windows: Vec<MissionWindow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMission {
    pub name: String,
    pub description: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub capacity: u32,
    pub acp_profile_id: u64,
    pub commander_id: String,
    pub banner_url: Option<String>,
    pub auth_code: Option<String>,
    #[serde(default)]
    pub windows: Vec<MissionWindow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMission {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub capacity: Option<u32>,
    pub operator_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub squadron: Option<String>,
}

fn default_status() -> String {
    "active".to_string()
}

/// Query parameters understood by every list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub squadron: Option<String>,
    pub commander_id: Option<String>,
    pub operator_id: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    /// Comma-separated field names, paired with `order` by position.
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Failure rendered as `{"message": ...}` with its status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(resource: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{resource} not found"))
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Default)]
pub struct Store {
    pub acps: Vec<Acp>,
    pub missions: Vec<Mission>,
    pub users: Vec<User>,
    /// Idempotency key -> id of the record its first create produced.
    pub acp_keys: HashMap<String, u64>,
    pub mission_keys: HashMap<String, u64>,
}

impl Store {
    fn next_acp_id(&self) -> u64 {
        self.acps.iter().map(|acp| acp.id).max().unwrap_or(0) + 1
    }

    fn next_mission_id(&self) -> u64 {
        self.missions.iter().map(|m| m.id).max().unwrap_or(0) + 1
    }
}

pub type Db = Arc<RwLock<Store>>;

fn acp(id: u64, code: &str, name: &str, squadron: &str, description: &str) -> Acp {
    Acp {
        id,
        code: code.to_string(),
        name: name.to_string(),
        squadron: squadron.to_string(),
        description: description.to_string(),
    }
}

fn user(id: u128, email: &str, name: &str, role: &str, squadron: Option<&str>) -> User {
    User {
        id: Uuid::from_u128(id),
        email: email.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        squadron: squadron.map(str::to_string),
    }
}

/// The dashboard's sample fleet.
pub fn seed() -> Store {
    Store {
        acps: vec![
            acp(1, "NYX-A1", "Viper 01", "No. 216 Squadron",
                "High-speed autonomous wingman specialized in Suppressing Enemy Air Defenses (SEAD). Equipped with electronic jamming pods."),
            acp(2, "NYX-A2", "Viper 02", "No. 216 Squadron",
                "Escort platform configured for air-to-air collaborative combat. Integrated with Tempest-class sensor fusion."),
            acp(3, "NYX-B1", "Ghost Eye", "No. 54 Squadron",
                "Stealth ISR (Intelligence, Surveillance, and Reconnaissance) unit with 24-hour loiter capability and thermal imaging."),
            acp(4, "NYX-X1", "R&D Prototype 01", "Leonardo Flight Systems",
                "Experimental airframe testing next-gen AI decision-making algorithms for autonomous dogfighting."),
            acp(5, "NYX-T1", "Test Bed Alpha", "No. 17 Test & Evaluation Squadron",
                "Evaluations unit for multi-platform swarming logic and low-latency satellite communication links."),
        ],
        missions: Vec::new(),
        acp_keys: HashMap::new(),
        mission_keys: HashMap::new(),
        users: vec![
            user(1, "c.hale@fleet.test", "Cmdr. Hale", "commander", Some("No. 216 Squadron")),
            user(2, "r.okafor@fleet.test", "Lt. Okafor", "operator", Some("No. 216 Squadron")),
            user(3, "m.ines@fleet.test", "Lt. Ines", "operator", Some("No. 54 Squadron")),
            user(4, "admin@fleet.test", "Fleet Admin", "admin", None),
        ],
    }
}

pub fn app() -> Router {
    app_with(seed())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/acps", get(list_acps).post(create_acp))
        .route("/acps/{id}", get(get_acp).patch(update_acp).delete(delete_acp))
        .route("/missions", get(list_missions).post(create_mission))
        .route(
            "/missions/{id}",
            get(get_mission).patch(update_mission).delete(delete_mission),
        )
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.to_lowercase().cmp(&b.to_lowercase()),
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Less,
        (_, Some(Value::Null) | None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Order records by the `sort`/`order` parameters, comparing their JSON form.
/// Unknown fields compare equal, so the stable sort keeps insertion order.
fn sort_items<T: Serialize>(items: &mut [&T], query: &ListQuery) {
    let Some(sort) = query.sort.as_deref().filter(|s| !s.is_empty()) else {
        return;
    };
    let orders: Vec<&str> = query.order.as_deref().unwrap_or("").split(',').collect();
    let keys: Vec<(String, bool)> = sort
        .split(',')
        .enumerate()
        .map(|(i, field)| {
            let descending = orders.get(i).is_some_and(|o| o.eq_ignore_ascii_case("desc"));
            (field.trim().to_string(), descending)
        })
        .collect();

    let mut rows: Vec<(Value, &T)> = items
        .iter()
        .map(|item| (serde_json::to_value(item).unwrap_or(Value::Null), *item))
        .collect();
    rows.sort_by(|(a, _), (b, _)| {
        keys.iter()
            .map(|(field, descending)| {
                let ordering = compare_values(a.get(field), b.get(field));
                if *descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    for (slot, (_, item)) in items.iter_mut().zip(rows) {
        *slot = item;
    }
}

/// Sort, then slice one page out of the filtered records.
fn paginate<T: Clone + Serialize>(mut items: Vec<&T>, query: &ListQuery) -> ListEnvelope<T> {
    sort_items(&mut items, query);
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let total = items.len();
    let data = items
        .into_iter()
        .skip(page.saturating_sub(1).saturating_mul(limit))
        .take(limit)
        .cloned()
        .collect();
    ListEnvelope {
        data,
        pagination: PageInfo {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Equality filter; a comma-separated filter matches any of its values.
fn field_matches(filter: &Option<String>, value: &str) -> bool {
    filter
        .as_deref()
        .is_none_or(|wanted| wanted.split(',').any(|w| w == value))
}

fn idempotency_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(IDEMPOTENCY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn require(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid(format!("{field} is required")));
    }
    Ok(())
}

// --- acps ---

async fn list_acps(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Json<ListEnvelope<Acp>> {
    let store = db.read().await;
    let items: Vec<&Acp> = store
        .acps
        .iter()
        .filter(|acp| {
            query
                .search
                .as_deref()
                .is_none_or(|s| contains_ci(&acp.name, s) || contains_ci(&acp.code, s))
        })
        .filter(|acp| field_matches(&query.squadron, &acp.squadron))
        .collect();
    Json(paginate(items, &query))
}

async fn create_acp(
    State(db): State<Db>,
    headers: HeaderMap,
    input: Result<Json<CreateAcp>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Acp>>)> {
    let Json(input) = input?;
    require("name", &input.name)?;
    require("code", &input.code)?;
    require("squadron", &input.squadron)?;

    let key = idempotency_key(&headers);
    let mut store = db.write().await;
    if let Some(existing) = key.as_ref().and_then(|k| store.acp_keys.get(k)) {
        let id = *existing;
        if let Some(acp) = store.acps.iter().find(|acp| acp.id == id) {
            return Ok((StatusCode::OK, Json(Envelope { data: acp.clone() })));
        }
    }
    let acp = Acp {
        id: store.next_acp_id(),
        code: input.code,
        name: input.name,
        squadron: input.squadron,
        description: input.description,
    };
    store.acps.push(acp.clone());
    if let Some(key) = key {
        store.acp_keys.insert(key, acp.id);
    }
    log::info!("created acp {} ({})", acp.id, acp.code);
    Ok((StatusCode::CREATED, Json(Envelope { data: acp })))
}

async fn get_acp(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Envelope<Acp>>> {
    let store = db.read().await;
    store
        .acps
        .iter()
        .find(|acp| acp.id == id)
        .cloned()
        .map(|data| Json(Envelope { data }))
        .ok_or_else(|| ApiError::not_found("acp"))
}

async fn update_acp(
    State(db): State<Db>,
    Path(id): Path<u64>,
    input: Result<Json<UpdateAcp>, JsonRejection>,
) -> ApiResult<Json<Envelope<Acp>>> {
    let Json(input) = input?;
    let mut store = db.write().await;
    let acp = store
        .acps
        .iter_mut()
        .find(|acp| acp.id == id)
        .ok_or_else(|| ApiError::not_found("acp"))?;
    if let Some(name) = input.name {
        acp.name = name;
    }
    if let Some(code) = input.code {
        acp.code = code;
    }
    if let Some(description) = input.description {
        acp.description = description;
    }
    if let Some(squadron) = input.squadron {
        acp.squadron = squadron;
    }
    Ok(Json(Envelope { data: acp.clone() }))
}

async fn delete_acp(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Envelope<Acp>>> {
    let mut store = db.write().await;
    let index = store
        .acps
        .iter()
        .position(|acp| acp.id == id)
        .ok_or_else(|| ApiError::not_found("acp"))?;
    let data = store.acps.remove(index);
    Ok(Json(Envelope { data }))
}

// --- missions ---

async fn list_missions(
    State(db): State<Db>,
    Query(mut query): Query<ListQuery>,
) -> Json<ListEnvelope<Mission>> {
    // Newest missions first unless the caller picks an order.
    if query.sort.is_none() {
        query.sort = Some("id".to_string());
        query.order = Some("desc".to_string());
    }
    let store = db.read().await;
    let items: Vec<&Mission> = store
        .missions
        .iter()
        .filter(|m| query.search.as_deref().is_none_or(|s| contains_ci(&m.name, s)))
        .filter(|m| field_matches(&query.commander_id, &m.commander_id))
        .filter(|m| {
            query
                .operator_id
                .as_deref()
                .is_none_or(|wanted| m.operator_id.as_deref() == Some(wanted))
        })
        .filter(|m| field_matches(&query.status, &m.status))
        .collect();
    Json(paginate(items, &query))
}

async fn create_mission(
    State(db): State<Db>,
    headers: HeaderMap,
    input: Result<Json<CreateMission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Mission>>)> {
    let Json(input) = input?;
    require("name", &input.name)?;
    require("commanderId", &input.commander_id)?;
    if input.capacity == 0 {
        return Err(ApiError::invalid("capacity must be at least 1"));
    }

    let key = idempotency_key(&headers);
    let mut store = db.write().await;
    if let Some(existing) = key.as_ref().and_then(|k| store.mission_keys.get(k)) {
        let id = *existing;
        if let Some(mission) = store.missions.iter().find(|m| m.id == id) {
            return Ok((StatusCode::OK, Json(Envelope { data: mission.clone() })));
        }
    }
    if !store.acps.iter().any(|acp| acp.id == input.acp_profile_id) {
        return Err(ApiError::invalid("acpProfileId does not reference a platform"));
    }
    let mission = Mission {
        id: store.next_mission_id(),
        name: input.name,
        description: input.description,
        status: input.status,
        capacity: input.capacity,
        acp_profile_id: input.acp_profile_id,
        commander_id: input.commander_id,
        operator_id: None,
        banner_url: input.banner_url,
        auth_code: input.auth_code,
        windows: input.windows,
    };
    store.missions.push(mission.clone());
    if let Some(key) = key {
        store.mission_keys.insert(key, mission.id);
    }
    log::info!("created mission {} ({})", mission.id, mission.name);
    Ok((StatusCode::CREATED, Json(Envelope { data: mission })))
}

async fn get_mission(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Envelope<Mission>>> {
    let store = db.read().await;
    store
        .missions
        .iter()
        .find(|m| m.id == id)
        .cloned()
        .map(|data| Json(Envelope { data }))
        .ok_or_else(|| ApiError::not_found("mission"))
}

async fn update_mission(
    State(db): State<Db>,
    Path(id): Path<u64>,
    input: Result<Json<UpdateMission>, JsonRejection>,
) -> ApiResult<Json<Envelope<Mission>>> {
    let Json(input) = input?;
    let mut store = db.write().await;
    let mission = store
        .missions
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| ApiError::not_found("mission"))?;
    if let Some(name) = input.name {
        mission.name = name;
    }
    if let Some(description) = input.description {
        mission.description = description;
    }
    if let Some(status) = input.status {
        mission.status = status;
    }
    if let Some(capacity) = input.capacity {
        mission.capacity = capacity;
    }
    if let Some(operator_id) = input.operator_id {
        mission.operator_id = Some(operator_id);
    }
    Ok(Json(Envelope {
        data: mission.clone(),
    }))
}

async fn delete_mission(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Envelope<Mission>>> {
    let mut store = db.write().await;
    let index = store
        .missions
        .iter()
        .position(|m| m.id == id)
        .ok_or_else(|| ApiError::not_found("mission"))?;
    let data = store.missions.remove(index);
    Ok(Json(Envelope { data }))
}

// --- users ---

async fn list_users(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Json<ListEnvelope<User>> {
    let store = db.read().await;
    let items: Vec<&User> = store
        .users
        .iter()
        .filter(|u| {
            query
                .search
                .as_deref()
                .is_none_or(|s| contains_ci(&u.name, s) || contains_ci(&u.email, s))
        })
        .filter(|u| field_matches(&query.role, &u.role))
        .filter(|u| {
            query
                .squadron
                .as_deref()
                .is_none_or(|wanted| u.squadron.as_deref() == Some(wanted))
        })
        .collect();
    Json(paginate(items, &query))
}

async fn get_user(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<Json<Envelope<User>>> {
    let store = db.read().await;
    store
        .users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(|data| Json(Envelope { data }))
        .ok_or_else(|| ApiError::not_found("user"))
}
