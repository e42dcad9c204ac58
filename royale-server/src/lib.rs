use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;

use crate::auth::{AuthService, AuthedUser};
use royale_persistence::repositories::{GameRepository, UserRepository};
use royale_types::{
    AuthResponse, CreateGameRequest, GameError, LoginRequest, RegisterRequest, RequestHintRequest,
    RespondGuessRequest, RespondHintRequest, SubmitGuessRequest, UpdateNotesRequest,
};

pub mod auth;
pub mod config;

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

pub fn create_routes(
    game_repository: Arc<GameRepository>,
    user_repository: Arc<UserRepository>,
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // Clone for filters
    let game_repository_filter = warp::any().map({
        let game_repository = game_repository.clone();
        move || game_repository.clone()
    });

    let user_repository_filter = warp::any().map({
        let user_repository = user_repository.clone();
        move || user_repository.clone()
    });

    let auth_filter = warp::any().map({
        let auth_service = auth_service.clone();
        move || auth_service.clone()
    });

    let auth_header = warp::header::optional::<String>("authorization");

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Credential endpoints (the only unauthenticated surface)
    let register = warp::path!("auth" / "register")
        .and(warp::post())
        .and(warp::body::json())
        .and(user_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_register);

    let login = warp::path!("auth" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and(user_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_login);

    // Game lifecycle endpoints
    let create_game = warp::path!("games")
        .and(warp::post())
        .and(auth_header.clone())
        .and(warp::body::json())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_create_game);

    let list_games = warp::path!("games")
        .and(warp::get())
        .and(auth_header.clone())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_list_games);

    let game_detail = warp::path!("games" / String)
        .and(warp::get())
        .and(auth_header.clone())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_game_detail);

    let submit_guess = warp::path!("games" / String / "guess")
        .and(warp::post())
        .and(auth_header.clone())
        .and(warp::body::json())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_submit_guess);

    let respond_guess = warp::path!("games" / String / "guess" / String / "respond")
        .and(warp::post())
        .and(auth_header.clone())
        .and(warp::body::json())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_respond_guess);

    let request_hint = warp::path!("games" / String / "hint")
        .and(warp::post())
        .and(auth_header.clone())
        .and(warp::body::json())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_request_hint);

    let respond_hint = warp::path!("games" / String / "hint" / String / "respond")
        .and(warp::post())
        .and(auth_header.clone())
        .and(warp::body::json())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_respond_hint);

    let solve_game = warp::path!("games" / String / "solve")
        .and(warp::post())
        .and(auth_header.clone())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_solve_game);

    let update_notes = warp::path!("games" / String / "notes")
        .and(warp::patch())
        .and(auth_header.clone())
        .and(warp::body::json())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_update_notes);

    let delete_game = warp::path!("games" / String)
        .and(warp::delete())
        .and(auth_header.clone())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_delete_game);

    // Aggregate read views
    let pint_progress = warp::path!("stats" / "pint-progress")
        .and(warp::get())
        .and(auth_header.clone())
        .and(user_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_pint_progress);

    let user_stats = warp::path!("stats" / "user" / String)
        .and(warp::get())
        .and(auth_header.clone())
        .and(game_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_user_stats);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "PATCH", "DELETE"]);

    health
        .or(register)
        .or(login)
        .or(create_game)
        .or(list_games)
        .or(submit_guess)
        .or(respond_guess)
        .or(request_hint)
        .or(respond_hint)
        .or(solve_game)
        .or(update_notes)
        .or(game_detail)
        .or(delete_game)
        .or(pint_progress)
        .or(user_stats)
        .with(cors)
        .with(warp::log("earworm_royale"))
}

fn json_error(message: &str, status: StatusCode) -> JsonReply {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": message })),
        status,
    )
}

/// One status per error kind; messages travel verbatim.
fn error_reply(err: &GameError) -> JsonReply {
    let status = match err {
        GameError::Validation(_) => StatusCode::BAD_REQUEST,
        GameError::NotFound(_) => StatusCode::NOT_FOUND,
        GameError::Authorization(_) => StatusCode::FORBIDDEN,
        GameError::Conflict(_) => StatusCode::CONFLICT,
        GameError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(&err.to_string(), status)
}

fn authenticate(
    auth_service: &AuthService,
    auth_header: Option<&str>,
) -> Result<AuthedUser, JsonReply> {
    let header = auth_header
        .ok_or_else(|| json_error("Authentication required", StatusCode::UNAUTHORIZED))?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header);

    auth_service
        .validate_token(token)
        .map_err(|_| json_error("Invalid authentication token", StatusCode::UNAUTHORIZED))
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, JsonReply> {
    Uuid::parse_str(raw).map_err(|_| {
        json_error(
            &format!("Invalid {} ID format", what),
            StatusCode::BAD_REQUEST,
        )
    })
}

async fn handle_register(
    request: RegisterRequest,
    user_repository: Arc<UserRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    if request.email.trim().is_empty()
        || request.password.is_empty()
        || request.display_name.trim().is_empty()
    {
        return Ok(json_error("All fields are required", StatusCode::BAD_REQUEST));
    }

    let password_hash = match auth_service.hash_password(&request.password) {
        Ok(hash) => hash,
        Err(_) => {
            return Ok(json_error(
                "Registration failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    let user = match user_repository
        .create_user(
            request.email.trim(),
            &password_hash,
            request.display_name.trim(),
        )
        .await
    {
        Ok(user) => user,
        Err(err) => return Ok(error_reply(&err)),
    };

    match auth_service.issue_token(&user) {
        Ok(token) => Ok(warp::reply::with_status(
            warp::reply::json(&AuthResponse { token, user }),
            StatusCode::OK,
        )),
        Err(err) => {
            tracing::error!("Failed to issue token after registration: {}", err);
            Ok(json_error(
                "Registration failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_login(
    request: LoginRequest,
    user_repository: Arc<UserRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Ok(json_error(
            "Email and password required",
            StatusCode::BAD_REQUEST,
        ));
    }

    let credentials = match user_repository.find_credentials(request.email.trim()).await {
        Ok(Some(credentials)) => credentials,
        Ok(None) => return Ok(json_error("Invalid credentials", StatusCode::UNAUTHORIZED)),
        Err(err) => return Ok(error_reply(&err)),
    };

    match auth_service.verify_password(&request.password, &credentials.password_hash) {
        Ok(true) => {}
        _ => return Ok(json_error("Invalid credentials", StatusCode::UNAUTHORIZED)),
    }

    match auth_service.issue_token(&credentials.user) {
        Ok(token) => Ok(warp::reply::with_status(
            warp::reply::json(&AuthResponse {
                token,
                user: credentials.user,
            }),
            StatusCode::OK,
        )),
        Err(err) => {
            tracing::error!("Failed to issue token at login: {}", err);
            Ok(json_error("Login failed", StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

async fn handle_create_game(
    auth_header: Option<String>,
    request: CreateGameRequest,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };

    match game_repository.create_game(actor.id, &request).await {
        Ok(game) => Ok(warp::reply::with_status(
            warp::reply::json(&game),
            StatusCode::CREATED,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_list_games(
    auth_header: Option<String>,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };

    match game_repository.list_for_user(actor.id).await {
        Ok(list) => Ok(warp::reply::with_status(
            warp::reply::json(&list),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_game_detail(
    game_id: String,
    auth_header: Option<String>,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };
    let game_id = match parse_id(&game_id, "game") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_repository.detail(game_id, actor.id).await {
        Ok(detail) => Ok(warp::reply::with_status(
            warp::reply::json(&detail),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_submit_guess(
    game_id: String,
    auth_header: Option<String>,
    request: SubmitGuessRequest,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };
    let game_id = match parse_id(&game_id, "game") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_repository
        .submit_guess(game_id, actor.id, &request.guess_text)
        .await
    {
        Ok(game) => Ok(warp::reply::with_status(
            warp::reply::json(&game),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_respond_guess(
    game_id: String,
    guess_id: String,
    auth_header: Option<String>,
    request: RespondGuessRequest,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };
    let game_id = match parse_id(&game_id, "game") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };
    let guess_id = match parse_id(&guess_id, "guess") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_repository
        .respond_guess(game_id, guess_id, actor.id, request.correct, request.feedback)
        .await
    {
        Ok(game) => Ok(warp::reply::with_status(
            warp::reply::json(&game),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_request_hint(
    game_id: String,
    auth_header: Option<String>,
    request: RequestHintRequest,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };
    let game_id = match parse_id(&game_id, "game") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_repository
        .request_hint(game_id, actor.id, &request.hint_request)
        .await
    {
        Ok(game) => Ok(warp::reply::with_status(
            warp::reply::json(&game),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_respond_hint(
    game_id: String,
    hint_id: String,
    auth_header: Option<String>,
    request: RespondHintRequest,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };
    let game_id = match parse_id(&game_id, "game") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };
    let hint_id = match parse_id(&hint_id, "hint") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_repository
        .respond_hint(game_id, hint_id, actor.id, &request.hint_response)
        .await
    {
        Ok(game) => Ok(warp::reply::with_status(
            warp::reply::json(&game),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_solve_game(
    game_id: String,
    auth_header: Option<String>,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };
    let game_id = match parse_id(&game_id, "game") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_repository.solve(game_id, actor.id).await {
        Ok(game) => Ok(warp::reply::with_status(
            warp::reply::json(&game),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_update_notes(
    game_id: String,
    auth_header: Option<String>,
    request: UpdateNotesRequest,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };
    let game_id = match parse_id(&game_id, "game") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_repository
        .update_notes(game_id, actor.id, &request.notes)
        .await
    {
        Ok(game) => Ok(warp::reply::with_status(
            warp::reply::json(&game),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_delete_game(
    game_id: String,
    auth_header: Option<String>,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    let actor = match authenticate(&auth_service, auth_header.as_deref()) {
        Ok(actor) => actor,
        Err(reply) => return Ok(reply),
    };
    let game_id = match parse_id(&game_id, "game") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_repository.delete_game(game_id, actor.id).await {
        Ok(()) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "message": "Game deleted" })),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_pint_progress(
    auth_header: Option<String>,
    user_repository: Arc<UserRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authenticate(&auth_service, auth_header.as_deref()) {
        return Ok(reply);
    }

    match user_repository.total_winnings().await {
        Ok(total) => Ok(warp::reply::with_status(
            warp::reply::json(&royale_core::pint_progress(total)),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

async fn handle_user_stats(
    user_id: String,
    auth_header: Option<String>,
    game_repository: Arc<GameRepository>,
    auth_service: Arc<AuthService>,
) -> Result<JsonReply, warp::Rejection> {
    if let Err(reply) = authenticate(&auth_service, auth_header.as_deref()) {
        return Ok(reply);
    }
    let user_id = match parse_id(&user_id, "user") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_repository.stats_for_user(user_id).await {
        Ok(stats) => Ok(warp::reply::with_status(
            warp::reply::json(&stats),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}
