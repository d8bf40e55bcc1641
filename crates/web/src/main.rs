use crickpacks_core::{
    Event, EventBus, OwnedCard, PackItem, PackKind, PackResult, PlayerCard, RngState, Session,
    Stats, Tier, TierWeight,
};
use crickpacks_data::{
    default_data_dir, load_pack_catalog_or_builtin, load_state, persist, FileStorage,
};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tiny_http::{Header, Method, Response, Server, StatusCode};

fn main() {
    let server = Server::http("0.0.0.0:7878").expect("start server");
    println!("Crickpacks web server on http://localhost:7878");
    let state = Arc::new(Mutex::new(AppState::new()));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            eprintln!("request error: {err}");
        }
    }
}

struct AppState {
    session: Session,
    events: EventBus,
    storage: FileStorage,
}

impl AppState {
    fn new() -> Self {
        let catalog =
            load_pack_catalog_or_builtin(Path::new("assets")).expect("load pack catalog");
        let storage =
            FileStorage::new(default_data_dir().unwrap_or_else(|| PathBuf::from(".")));
        let fallback_seed = RngState::from_entropy().seed();
        let (store, roster_seed) = load_state(&storage, fallback_seed);
        let draw_seed = RngState::from_entropy().seed();
        let session = Session::new(catalog, store, roster_seed, draw_seed);
        Self {
            session,
            events: EventBus::default(),
            storage,
        }
    }

    fn persist(&self) {
        persist(
            &self.storage,
            &self.session.state,
            self.session.roster_seed(),
        );
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    state: UiState,
    events: Vec<Event>,
    pending: Option<UiPackResult>,
}

#[derive(Serialize)]
struct UiState {
    coins: i64,
    mute: bool,
    packs: Vec<UiPack>,
    collection: Vec<UiOwnedCard>,
}

#[derive(Serialize)]
struct UiPack {
    kind: PackKind,
    price: i64,
    draws: u8,
    odds: Vec<TierWeight>,
}

#[derive(Serialize)]
struct UiCard {
    id: u32,
    name: String,
    team: String,
    role: String,
    rating: u8,
    tier: Tier,
    stats: Stats,
}

#[derive(Serialize)]
struct UiOwnedCard {
    card: UiCard,
    stars: u8,
    count: u32,
}

#[derive(Serialize)]
struct UiPackResult {
    kind: PackKind,
    items: Vec<UiPackItem>,
    any_premium: bool,
    coins_delta: i64,
}

#[derive(Serialize)]
struct UiPackItem {
    card: UiCard,
    is_dupe: bool,
    upgraded: bool,
    converted_coins: i64,
}

#[derive(Deserialize)]
struct ActionRequest {
    action: String,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    amount: Option<i64>,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    match (request.method(), url.as_str()) {
        (&Method::Get, "/") => {
            respond_with_file(request, web_path("index.html"), "text/html; charset=utf-8")?;
        }
        (&Method::Get, "/app.js") => {
            respond_with_file(request, web_path("app.js"), "application/javascript")?;
        }
        (&Method::Get, "/styles.css") => {
            respond_with_file(request, web_path("styles.css"), "text/css; charset=utf-8")?;
        }
        (&Method::Get, "/api/state") => {
            let mut guard = state.lock().unwrap();
            let response = build_response(&mut *guard, None);
            respond_json(request, response)?;
        }
        (&Method::Post, "/api/action") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let action: ActionRequest = serde_json::from_str(&body)?;
            let mut guard = state.lock().unwrap();
            let err = apply_action(&mut *guard, action);
            let response = build_response(&mut *guard, err);
            respond_json(request, response)?;
        }
        _ => {
            let response = Response::empty(StatusCode(404));
            request.respond(response)?;
        }
    }
    Ok(())
}

fn web_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("web")
        .join(file)
}

fn respond_with_file(
    request: tiny_http::Request,
    path: PathBuf,
    content_type: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = std::fs::File::open(path)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    let header = Header::from_bytes(&b"Content-Type"[..], content_type)
        .map_err(|_| "invalid header".to_string())?;
    let response = Response::from_data(content).with_header(header);
    request.respond(response)?;
    Ok(())
}

fn respond_json(
    request: tiny_http::Request,
    response: ApiResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec_pretty(&response)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "invalid header".to_string())?;
    request.respond(Response::from_data(body).with_header(header))?;
    Ok(())
}

fn build_response(state: &mut AppState, err: Option<String>) -> ApiResponse {
    let events: Vec<_> = state.events.drain().collect();
    ApiResponse {
        ok: err.is_none(),
        error: err,
        state: snapshot_state(&state.session),
        events,
        pending: state.session.pending().map(snapshot_result),
    }
}

fn snapshot_state(session: &Session) -> UiState {
    let packs = session
        .catalog
        .packs
        .iter()
        .map(|pack| UiPack {
            kind: pack.kind,
            price: pack.price,
            draws: pack.draws,
            odds: pack.odds.clone(),
        })
        .collect();
    let collection = session
        .state
        .collection(None, None)
        .into_iter()
        .map(snapshot_owned)
        .collect();
    UiState {
        coins: session.state.coins,
        mute: session.state.mute,
        packs,
        collection,
    }
}

fn snapshot_owned(owned: &OwnedCard) -> UiOwnedCard {
    UiOwnedCard {
        card: snapshot_card(&owned.card),
        stars: owned.stars,
        count: owned.count,
    }
}

fn snapshot_result(result: &PackResult) -> UiPackResult {
    UiPackResult {
        kind: result.kind,
        items: result.items.iter().map(snapshot_item).collect(),
        any_premium: result.any_premium,
        coins_delta: result.coins_delta,
    }
}

fn snapshot_item(item: &PackItem) -> UiPackItem {
    UiPackItem {
        card: snapshot_card(&item.card),
        is_dupe: item.is_dupe,
        upgraded: item.upgraded,
        converted_coins: item.converted_coins,
    }
}

fn snapshot_card(card: &PlayerCard) -> UiCard {
    UiCard {
        id: card.id,
        name: card.name.clone(),
        team: card.team.clone(),
        role: card.role.code().to_string(),
        rating: card.rating,
        tier: card.tier,
        stats: card.stats,
    }
}

fn apply_action(state: &mut AppState, req: ActionRequest) -> Option<String> {
    match req.action.as_str() {
        "open_pack" => {
            let Some(kind) = req.target.as_deref().and_then(PackKind::parse) else {
                return Some("unknown pack".to_string());
            };
            // Resolution only; nothing committed or persisted until the
            // client finishes the reveal and posts a commit.
            state
                .session
                .resolve_open(kind)
                .map(|_| ())
                .map_err(|err| err.to_string())
                .err()
        }
        "commit" => match state.session.commit(&mut state.events) {
            Ok(_) => {
                state.persist();
                None
            }
            Err(err) => Some(err.to_string()),
        },
        "add_coins" => {
            let amount = req.amount.unwrap_or(5000);
            state.session.add_coins(amount, &mut state.events);
            state.persist();
            None
        }
        "toggle_mute" => {
            state.session.toggle_mute(&mut state.events);
            state.persist();
            None
        }
        "reset" => {
            state.session.reset(&mut state.events);
            state.persist();
            None
        }
        _ => Some("unknown action".to_string()),
    }
}
