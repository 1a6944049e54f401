//! Single binary web server: JSON API over the tournament service.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DATA_DIR, RNG_SEED.

use actix_web::{
    get, post,
    web::{self, Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use futures_util::stream;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use towerfall_bracket::{
    by_score, commit_round, end_match, get_runnerups, player_action, register_player,
    start_match, start_tournament, update_players, config::ServerConfig, Color, Direction,
    FileStore, MatchId, MatchKind, Notifier, RoundScore, ServiceError, StatKind, TournamentId,
    TournamentService,
};
use uuid::Uuid;

type AppState = Data<TournamentService>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    id: Option<TournamentId>,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    color: Color,
}

#[derive(Deserialize)]
struct CommitBody {
    scores: Vec<RoundScore>,
    #[serde(default)]
    shots: Vec<bool>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments addressing a match (e.g. /api/tournaments/{id}/tryout/2)
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    kind: MatchKind,
    index: usize,
}

impl MatchPath {
    fn match_id(&self) -> MatchId {
        MatchId::new(self.kind, self.index)
    }
}

/// Path segments addressing a player action (e.g. /api/tournaments/{id}/semi/0/3/kills/up)
#[derive(Deserialize)]
struct PlayerActionPath {
    id: TournamentId,
    kind: MatchKind,
    index: usize,
    slot: usize,
    stat: StatKind,
    dir: Direction,
}

#[derive(Serialize)]
struct ScoreRow<'a> {
    name: &'a str,
    color: Option<Color>,
    kills: u32,
    shots: u32,
    sweeps: u32,
    #[serde(rename = "self")]
    self_kills: u32,
    explosions: u32,
    matches: u32,
    score: u32,
}

fn error_response(e: ServiceError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        ServiceError::UnknownTournament(_) => HttpResponse::NotFound().json(body),
        ServiceError::DuplicateTournament(_) => HttpResponse::Conflict().json(body),
        ServiceError::Tournament(_) => HttpResponse::BadRequest().json(body),
        ServiceError::Store(_) | ServiceError::LockPoisoned => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Respond with the tournament's current state once a mutation succeeded.
fn state_response(state: &AppState, id: &str, result: Result<(), ServiceError>) -> HttpResponse {
    match result.and_then(|_| state.snapshot(id)) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "towerfall-bracket",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    match state.ids() {
        Ok(ids) => HttpResponse::Ok().json(ids),
        Err(e) => error_response(e),
    }
}

/// Create a new tournament; the id defaults to a fresh UUID.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let id = body.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    match state.create(id, body.name) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.snapshot(&path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

/// Register a player; the tryouts are reseeded.
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddPlayerBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let result = state.update(&path.id, |t, rng| {
        register_player(t, body.name.trim(), body.color, rng)
    });
    state_response(&state, &path.id, result)
}

#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let result = state.update(&path.id, |t, _| start_tournament(t));
    state_response(&state, &path.id, result)
}

/// Address of the next match to be played.
#[get("/api/tournaments/{id}/next")]
async fn api_next_match(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let t = match state.snapshot(&path.id) {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    match t.next_match() {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({
            "kind": id.kind,
            "index": id.index,
            "path": id.path(&t.id),
        })),
        Err(e) => error_response(ServiceError::Tournament(e)),
    }
}

#[get("/api/tournaments/{id}/runnerups")]
async fn api_runnerups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.snapshot(&path.id) {
        Ok(mut t) => HttpResponse::Ok().json(get_runnerups(&mut t)),
        Err(e) => error_response(e),
    }
}

/// Cumulative scoreboard as CSV, best score first.
#[get("/api/tournaments/{id}/scores.csv")]
async fn api_scores_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut t = match state.snapshot(&path.id) {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    update_players(&mut t);
    let mut players = t.players.clone();
    players.sort_by(by_score);

    let mut wtr = csv::Writer::from_writer(Vec::new());
    for p in &players {
        let row = ScoreRow {
            name: &p.name,
            color: p.preferred_color,
            kills: p.kills,
            shots: p.shots,
            sweeps: p.sweeps,
            self_kills: p.self_kills,
            explosions: p.explosions,
            matches: p.matches,
            score: p.score(),
        };
        if let Err(e) = wtr.serialize(row) {
            return HttpResponse::InternalServerError().body(e.to_string());
        }
    }
    match wtr.into_inner() {
        Ok(bytes) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(bytes),
        Err(e) => HttpResponse::InternalServerError().body(e.error().to_string()),
    }
}

/// Server-sent events: one `changed` event each time this tournament is persisted.
#[get("/api/tournaments/{id}/events")]
async fn api_events(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.into_inner().id;
    let rx = state.notifier().subscribe();
    let events = stream::unfold(rx, move |mut rx| {
        let id = id.clone();
        async move {
            loop {
                match rx.recv().await {
                    Ok(ev) if ev.tournament_id == id => {
                        let frame = Bytes::from(format!("event: changed\ndata: {}\n\n", id));
                        return Some((Ok::<_, std::io::Error>(frame), rx));
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(n)) => {
                        log::debug!("{}: event observer skipped {} changes", id, n);
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        }
    });
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .streaming(events)
}

/// Start a match; empty slots are filled from the runnerups.
#[post("/api/tournaments/{id}/{kind}/{index}/start")]
async fn api_start_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let match_id = path.match_id();
    let result = state.update(&path.id, |t, rng| start_match(t, match_id, rng));
    state_response(&state, &path.id, result)
}

#[post("/api/tournaments/{id}/{kind}/{index}/end")]
async fn api_end_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let match_id = path.match_id();
    let result = state.update(&path.id, |t, _| end_match(t, match_id));
    state_response(&state, &path.id, result)
}

/// Commit one round of live results.
#[post("/api/tournaments/{id}/{kind}/{index}/commit")]
async fn api_commit(state: AppState, path: Path<MatchPath>, body: Json<CommitBody>) -> HttpResponse {
    let match_id = path.match_id();
    let result = state.update(&path.id, |t, _| {
        commit_round(t, match_id, &body.scores, &body.shots)
    });
    state_response(&state, &path.id, result)
}

/// Judge correction for the player in a slot.
#[post("/api/tournaments/{id}/{kind}/{index}/{slot}/{stat}/{dir}")]
async fn api_player_action(state: AppState, path: Path<PlayerActionPath>) -> HttpResponse {
    let match_id = MatchId::new(path.kind, path.index);
    let result = state.update(&path.id, |t, _| {
        player_action(t, match_id, path.slot, path.stat, path.dir)
    });
    state_response(&state, &path.id, result)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = FileStore::open(&config.data_dir)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let service = TournamentService::new(Box::new(store), Notifier::new(), config.rng_seed);
    // Unreadable snapshots are fatal: serving a partial set would silently drop tournaments.
    let loaded = service
        .load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    log::info!("Loaded {} tournament(s) from {}", loaded, config.data_dir.display());

    let state = Data::new(service);
    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_player)
            .service(api_start_tournament)
            .service(api_next_match)
            .service(api_runnerups)
            .service(api_scores_csv)
            .service(api_events)
            .service(api_start_match)
            .service(api_end_match)
            .service(api_commit)
            .service(api_player_action)
            .default_service(web::to(|| async {
                HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind(bind)?
    .run()
    .await
}
