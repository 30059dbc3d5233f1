//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Env overrides: HOST, PORT, ELO_K (base K, 10-200), SEARCH_BUDGET (searches per
//! generation), OPTIONS (options per generation).

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::Utc;
use club_league::{
    generate_options, read_roster, record_session_result, regroup_session, store_session_options,
    undo_session_result, GenerationSession, Jersey, MatchReport, MovementUnit, Player,
    SearchConfig, SessionId, Team, TeamsError, DEFAULT_K, K_RANGE,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-session entry: generation state + last activity time (for auto-cleanup).
struct SessionEntry {
    session: GenerationSession,
    last_activity: Instant,
}

/// In-memory state: many generation sessions by ID. Entries are removed after 12h inactivity.
type Sessions = Data<RwLock<HashMap<SessionId, SessionEntry>>>;

/// Inactivity threshold: sessions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Settings read from the environment at startup.
#[derive(Clone, Debug)]
struct AppConfig {
    host: String,
    port: u16,
    base_k: u32,
    options: usize,
    search: SearchConfig,
}

impl AppConfig {
    fn from_env() -> Self {
        let base_k = env_parse("ELO_K").unwrap_or(DEFAULT_K);
        let base_k = if K_RANGE.contains(&base_k) {
            base_k
        } else {
            log::warn!("ELO_K={} outside {:?}, using {}", base_k, K_RANGE, DEFAULT_K);
            DEFAULT_K
        };
        let mut search = SearchConfig::default();
        search.max_searches = env_parse("SEARCH_BUDGET").unwrap_or_else(default_search_budget);
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: env_parse("PORT").unwrap_or_else(default_port),
            base_k,
            options: env_parse("OPTIONS")
                .filter(|n: &usize| *n > 0)
                .unwrap_or_else(default_options),
            search,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_search_budget() -> usize {
    240
}

fn default_options() -> usize {
    3
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateSessionBody {
    players: Vec<Player>,
}

#[derive(Deserialize)]
struct GroupsBody {
    groups: Vec<Vec<String>>,
}

#[derive(Deserialize, Default)]
struct GenerateBody {
    n_options: Option<usize>,
    /// Seed for the swap fallback; random when absent.
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct SwapBody {
    team_1_player: String,
    team_2_player: String,
}

#[derive(Deserialize)]
struct JerseyBody {
    team: Team,
    jersey: Option<Jersey>,
}

#[derive(Deserialize)]
struct ResultBody {
    #[serde(flatten)]
    report: MatchReport,
    k: Option<u32>,
}

/// Path segment: session id (e.g. /api/sessions/{id})
#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

/// Path segments: session id and option index (e.g. /api/sessions/{id}/options/{index})
#[derive(Deserialize)]
struct OptionPath {
    id: SessionId,
    index: usize,
}

fn bad_request(e: TeamsError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" }))
}

/// Run `f` on a session, refreshing its activity time. Errors become 400, missing sessions 404.
fn with_session<F>(state: &Sessions, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut GenerationSession) -> Result<HttpResponse, TeamsError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    f(&mut entry.session).unwrap_or_else(bad_request)
}

fn insert_session(state: &Sessions, players: Vec<Player>) -> HttpResponse {
    let session = match GenerationSession::new(players) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!("session {} created with {} unit(s)", session.id, session.units.len());
    let response = HttpResponse::Ok().json(&session);
    g.insert(
        session.id,
        SessionEntry {
            session,
            last_activity: Instant::now(),
        },
    );
    response
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "club-league",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Start a session from the ten confirmed players of a match (JSON roster).
#[post("/api/sessions")]
async fn api_create_session(state: Sessions, body: Json<CreateSessionBody>) -> HttpResponse {
    insert_session(&state, body.into_inner().players)
}

/// Start a session from a CSV roster (`id,name,rating,group`).
#[post("/api/sessions/csv")]
async fn api_create_session_csv(state: Sessions, body: String) -> HttpResponse {
    match read_roster(body.as_bytes()) {
        Ok(players) => insert_session(&state, players),
        Err(e) => bad_request(e),
    }
}

/// Get a session by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/sessions/{id}")]
async fn api_get_session(state: Sessions, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| Ok(HttpResponse::Ok().json(&*s)))
}

/// Define pairs and trios (replaces earlier groups, drops generated options).
#[put("/api/sessions/{id}/groups")]
async fn api_set_groups(state: Sessions, path: Path<SessionPath>, body: Json<GroupsBody>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        regroup_session(s, &body.groups)?;
        Ok(HttpResponse::Ok().json(&*s))
    })
}

/// Copy of a session's units for work done outside the lock.
fn snapshot_units(state: &Sessions, id: SessionId) -> Result<Vec<MovementUnit>, HttpResponse> {
    let mut g = state
        .write()
        .map_err(|_| HttpResponse::InternalServerError().body("lock error"))?;
    let entry = g.get_mut(&id).ok_or_else(not_found)?;
    entry.last_activity = Instant::now();
    if entry.session.confirmed.is_some() {
        return Err(bad_request(TeamsError::AlreadyConfirmed));
    }
    Ok(entry.session.units.clone())
}

/// Generate balanced options (not allowed once teams are confirmed).
/// The search runs on the blocking pool; the session lock is only taken around it.
#[post("/api/sessions/{id}/options")]
async fn api_generate_options(
    state: Sessions,
    config: Data<AppConfig>,
    path: Path<SessionPath>,
    body: Option<Json<GenerateBody>>,
) -> HttpResponse {
    let body = body.map(Json::into_inner).unwrap_or_default();
    let n_options = body.n_options.unwrap_or(config.options);
    let mut rng = match body.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let units = match snapshot_units(&state, path.id) {
        Ok(units) => units,
        Err(response) => return response,
    };
    let search = config.search.clone();
    let (units, generated) = match web::block(move || {
        let generated = generate_options(&units, n_options, &search, &mut rng);
        (units, generated)
    })
    .await
    {
        Ok(done) => done,
        Err(e) => {
            log::error!("option generation failed: {}", e);
            return HttpResponse::InternalServerError().body("generation failed");
        }
    };
    with_session(&state, path.id, |s| {
        let found = store_session_options(s, &units, generated?)?.len();
        if found < n_options {
            log::warn!("session {}: only {} of {} options", s.id, found, n_options);
        }
        Ok(HttpResponse::Ok().json(&*s))
    })
}

/// Load one option for manual adjustment.
#[post("/api/sessions/{id}/options/{index}/select")]
async fn api_select_option(state: Sessions, path: Path<OptionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.select(path.index)?;
        Ok(HttpResponse::Ok().json(&*s))
    })
}

/// Swap one player of Team 1 with one of Team 2 in the selected option.
#[put("/api/sessions/{id}/swap")]
async fn api_swap_players(state: Sessions, path: Path<SessionPath>, body: Json<SwapBody>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.swap(&body.team_1_player, &body.team_2_player)?;
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "session": &*s,
            "team_ratings": s.team_ratings(),
        })))
    })
}

/// Confirm the selected option (exactly 5 per side); default kits are assigned.
#[post("/api/sessions/{id}/confirm")]
async fn api_confirm(state: Sessions, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        let teams = s.confirm()?.clone();
        log::info!("session {}: teams confirmed ({} vs {})", s.id, teams.rating_1, teams.rating_2);
        Ok(HttpResponse::Ok().json(teams))
    })
}

/// Clear confirmed teams so options can be generated again.
#[delete("/api/sessions/{id}/confirm")]
async fn api_clear_confirmed(state: Sessions, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.clear_confirmed();
        Ok(HttpResponse::Ok().json(&*s))
    })
}

/// Set or clear one team's kit.
#[put("/api/sessions/{id}/jerseys")]
async fn api_set_jersey(state: Sessions, path: Path<SessionPath>, body: Json<JerseyBody>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        let teams = s.confirmed.as_mut().ok_or(TeamsError::NotConfirmed)?;
        teams.set_jersey(body.team, body.jersey);
        Ok(HttpResponse::Ok().json(&*teams))
    })
}

/// Exchange the kits of both teams.
#[post("/api/sessions/{id}/jerseys/swap")]
async fn api_swap_jerseys(state: Sessions, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        let teams = s.confirmed.as_mut().ok_or(TeamsError::NotConfirmed)?;
        teams.swap_jerseys();
        Ok(HttpResponse::Ok().json(&*teams))
    })
}

/// Record the match result; official matches return the rating history rows.
/// Refused once a result exists or while a team has no kit.
#[post("/api/sessions/{id}/result")]
async fn api_record_result(
    state: Sessions,
    config: Data<AppConfig>,
    path: Path<SessionPath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    let k = body.k.unwrap_or(config.base_k);
    with_session(&state, path.id, |s| {
        let changes = record_session_result(s, &body.report, k, Utc::now())?;
        Ok(HttpResponse::Ok().json(changes))
    })
}

/// Undo the recorded result: ratings go back and the match is open again.
#[delete("/api/sessions/{id}/result")]
async fn api_undo_result(state: Sessions, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        let reverted = undo_session_result(s)?;
        Ok(HttpResponse::Ok().json(reverted))
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!(
        "K={}, {} option(s), {} search(es) per generation",
        config.base_k,
        config.options,
        config.search.max_searches
    );

    let state = Data::new(RwLock::new(HashMap::<SessionId, SessionEntry>::new()));
    let config = Data::new(config);

    // Background task: every 30 minutes, remove sessions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive session(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_session_csv)
            .service(api_create_session)
            .service(api_get_session)
            .service(api_set_groups)
            .service(api_generate_options)
            .service(api_select_option)
            .service(api_swap_players)
            .service(api_confirm)
            .service(api_clear_confirmed)
            .service(api_set_jersey)
            .service(api_swap_jerseys)
            .service(api_record_result)
            .service(api_undo_result)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
