//! Single binary web server exposing the bracket engine over a JSON API.
//! Run with: cargo run --bin web
//! Reads configuration from BRACKET_CONFIG (default bracket.toml); HOST and PORT override the file.

use actix_web::{
    get, patch, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer,
};
use serde::{Deserialize, Serialize};
use sports_bracket::{
    advance_round, bracket_view, generate_bracket, standings, update_match, write_standings_csv,
    AppConfig, DetailId, DetailUpdate, EngineError, Entrant, EntrantDirectory, EntrantId,
    EntrantKind, MemoryStore, PhaseId, RegistrationCategory, ScoringPolicy, Sport, SportId,
    WindowLimiter,
};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

/// Shared server state: configuration, the store, and the public-endpoint limiter.
struct AppState {
    config: AppConfig,
    store: MemoryStore,
    standings_limiter: WindowLimiter,
}

type State = Data<AppState>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RegisterEntrantBody {
    id: EntrantId,
    name: String,
    #[serde(default)]
    cycle: Option<String>,
    #[serde(default)]
    category: RegistrationCategory,
    /// Player shown in place of the team name for single-player team sports.
    #[serde(default)]
    representative: Option<String>,
}

#[derive(Deserialize)]
struct GenerateBody {
    entrant_ids: Vec<EntrantId>,
}

#[derive(Deserialize)]
struct AdvanceBody {
    phase_id: PhaseId,
}

/// Path segment: sport id (e.g. /api/sports/{sport_id}/bracket)
#[derive(Deserialize)]
struct SportPath {
    sport_id: SportId,
}

/// Path segments: sport id and match detail id.
#[derive(Deserialize)]
struct DetailPath {
    sport_id: SportId,
    detail_id: DetailId,
}

fn error_json(e: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        EngineError::UnknownSport(_) | EngineError::DetailNotFound(_) | EngineError::UnknownPhase(_) => {
            HttpResponse::NotFound().json(body)
        }
        EngineError::MatchesPending { .. }
        | EngineError::AlreadyFinished(_)
        | EngineError::NotFinished(_)
        | EngineError::ByeResult(_)
        | EngineError::BracketExists { .. }
        | EngineError::EntrantAlreadyPlaced(_)
        | EngineError::EntrantSportMismatch { .. } => HttpResponse::Conflict().json(body),
        e if e.is_recoverable() => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn sport_or_404(state: &AppState, id: SportId) -> Result<Sport, HttpResponse> {
    state
        .config
        .sport(id)
        .ok_or_else(|| error_json(&EngineError::UnknownSport(id)))
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "sports-bracket",
    })
}

#[get("/api/sports")]
async fn api_sports(state: State) -> HttpResponse {
    HttpResponse::Ok().json(state.config.sports())
}

/// Register (or replace) an entrant of a sport.
#[post("/api/sports/{sport_id}/entrants")]
async fn api_register_entrant(state: State, path: Path<SportPath>, body: Json<RegisterEntrantBody>) -> HttpResponse {
    let sport = match sport_or_404(&state, path.sport_id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let body = body.into_inner();
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    let mut entrant = Entrant::new(body.id, sport.kind, name, sport.id).with_category(body.category);
    entrant.cycle = body.cycle;
    if let Err(e) = state.store.register_entrant(entrant.clone()) {
        return error_json(&e);
    }
    if let (EntrantKind::Team, Some(rep)) = (sport.kind, body.representative) {
        if let Err(e) = state.store.set_representative(entrant.id, rep) {
            return error_json(&e);
        }
    }
    HttpResponse::Ok().json(entrant)
}

#[get("/api/sports/{sport_id}/entrants")]
async fn api_list_entrants(state: State, path: Path<SportPath>) -> HttpResponse {
    let sport = match sport_or_404(&state, path.sport_id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match state.store.entrants_for_sport(sport.kind, sport.id) {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_json(&e),
    }
}

/// Current bracket of a sport, grouped by phase.
#[get("/api/sports/{sport_id}/bracket")]
async fn api_get_bracket(state: State, path: Path<SportPath>) -> HttpResponse {
    let sport = match sport_or_404(&state, path.sport_id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match bracket_view(&state.store, &sport, state.config.event.id) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_json(&e),
    }
}

/// Generate round 1 from the listed registered entrants.
#[post("/api/sports/{sport_id}/bracket")]
async fn api_generate_bracket(state: State, path: Path<SportPath>, body: Json<GenerateBody>) -> HttpResponse {
    let sport = match sport_or_404(&state, path.sport_id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let registered = match state.store.entrants_for_sport(sport.kind, sport.id) {
        Ok(list) => list,
        Err(e) => return error_json(&e),
    };
    let mut seen = HashSet::new();
    let mut entrants = Vec::with_capacity(body.entrant_ids.len());
    for &id in &body.entrant_ids {
        if !seen.insert(id) {
            return HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": format!("Entrant {id} listed twice") }));
        }
        match registered.iter().find(|e| e.id == id) {
            Some(e) => entrants.push(e.clone()),
            None => return error_json(&EngineError::UnknownEntrant(id)),
        }
    }
    let result = generate_bracket(
        &state.store,
        &state.config.engine,
        &sport,
        state.config.event.id,
        &entrants,
        &mut rand::thread_rng(),
    );
    match result {
        Ok(bracket) => HttpResponse::Ok().json(bracket),
        Err(e) => error_json(&e),
    }
}

/// Advance a completed phase (next phase seeded, or champion returned).
#[post("/api/sports/{sport_id}/advance")]
async fn api_advance(state: State, path: Path<SportPath>, body: Json<AdvanceBody>) -> HttpResponse {
    let sport = match sport_or_404(&state, path.sport_id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match advance_round(&state.store, &sport, body.phase_id) {
        Ok(advancement) => HttpResponse::Ok().json(advancement),
        Err(e) => error_json(&e),
    }
}

/// Start, finish or amend one match.
#[patch("/api/sports/{sport_id}/details/{detail_id}")]
async fn api_update_detail(state: State, path: Path<DetailPath>, body: Json<DetailUpdate>) -> HttpResponse {
    let sport = match sport_or_404(&state, path.sport_id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let scoring = ScoringPolicy::from_config(&state.config.engine);
    match update_match(&state.store, &scoring, sport.kind, path.detail_id, &body) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_json(&e),
    }
}

/// Public standings for every sport, keyed by sport name.
#[get("/api/standings")]
async fn api_standings(state: State) -> HttpResponse {
    if !state.standings_limiter.try_acquire() {
        log::warn!("standings rate limit hit");
        return HttpResponse::TooManyRequests()
            .json(serde_json::json!({ "error": "Too many requests, try again in a few minutes" }));
    }
    let mut out = BTreeMap::new();
    for sport in state.config.sports() {
        match standings(&state.store, &sport) {
            Ok(rows) => {
                out.insert(sport.name.to_lowercase(), rows);
            }
            Err(e) => return error_json(&e),
        }
    }
    HttpResponse::Ok().json(out)
}

#[get("/api/sports/{sport_id}/standings.csv")]
async fn api_standings_csv(state: State, path: Path<SportPath>) -> HttpResponse {
    let sport = match sport_or_404(&state, path.sport_id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let rows = match standings(&state.store, &sport) {
        Ok(rows) => rows,
        Err(e) => return error_json(&e),
    };
    let mut buf = Vec::new();
    if let Err(e) = write_standings_csv(&rows, &mut buf) {
        log::error!("standings csv for sport {}: {}", sport.id, e);
        return HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }));
    }
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(buf)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config_path = std::env::var("BRACKET_CONFIG").unwrap_or_else(|_| "bracket.toml".to_string());
    let mut config = match AppConfig::load(std::path::Path::new(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}: {}", config_path, e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
        }
    };
    config.apply_env_overrides();

    let bind = (config.server.host.clone(), config.server.port);
    log::info!(
        "Starting server at http://{}:{} (event {}, {} phases, {} sports)",
        bind.0,
        bind.1,
        config.event.id,
        config.event.phases.len(),
        config.sports.len()
    );

    let state = Data::new(AppState {
        store: MemoryStore::new(config.phases()),
        standings_limiter: WindowLimiter::new(
            config.server.standings_rate_limit,
            Duration::from_secs(config.server.standings_rate_window_secs),
        ),
        config,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_sports)
            .service(api_register_entrant)
            .service(api_list_entrants)
            .service(api_get_bracket)
            .service(api_generate_bracket)
            .service(api_advance)
            .service(api_update_detail)
            .service(api_standings)
            .service(api_standings_csv)
    })
    .bind(bind)?
    .run()
    .await
}
