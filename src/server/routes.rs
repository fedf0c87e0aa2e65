use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::room::{RoomError, RoomInfo, RoomRegistry};

use super::dto::{
    ActionRequest, CreateRoomRequest, CreateRoomResponse, JoinByNameRequest, JoinRoomRequest,
    JoinRoomResponse, LeaveRoomRequest, StartGameRequest, StartGameResponse, StateQuery,
};
use super::error::ApiError;
use super::ws::ws_upgrade;

/// Shared application state handed to every handler via `Extension`.
/// Grounded in the now-retired `server/routes.rs`'s `ServerContext<C>`
/// shape, minus the curve-generic coordinator/lobby fields this crate has
/// no use for — a single `RoomRegistry` is the entire shared surface now.
#[derive(Clone)]
pub struct ServerContext {
    pub rooms: RoomRegistry,
}

pub struct HoldemServer {
    router: Router,
}

impl HoldemServer {
    pub fn new(rooms: RoomRegistry, cors_origin: Option<String>) -> Self {
        let context = Arc::new(ServerContext { rooms });

        let cors = match cors_origin {
            Some(origin) => match origin.parse::<axum::http::HeaderValue>() {
                Ok(value) => CorsLayer::new()
                    .allow_origin(value)
                    .allow_methods(Any)
                    .allow_headers(Any),
                Err(_) => {
                    tracing::warn!(target = "server::routes", %origin, "invalid CORS origin, allowing any");
                    CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
                }
            },
            None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
        };

        let router = Router::new()
            .route("/api/game/create-room", post(create_room))
            .route("/api/game/room/join-by-name", post(join_by_name))
            .route("/api/game/room/:room_id/join", post(join_room))
            .route("/api/game/room/:room_id", get(get_room))
            .route("/api/game/room/:room_id/start-game", post(start_game))
            .route("/api/game/room/:room_id/leave", post(leave_room))
            .route("/api/game/:game_id/action", post(player_action))
            .route("/api/game/:game_id/state", get(game_state))
            .route("/ws/room", get(ws_upgrade))
            .layer(Extension(context))
            .layer(middleware::from_fn(super::logging::log_requests))
            .layer(cors);

        HoldemServer { router }
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

async fn create_room(
    Extension(ctx): Extension<Arc<ServerContext>>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, ApiError> {
    let info = ctx.rooms.create_room(
        req.room_name,
        req.player_name,
        req.max_players,
        req.small_blind,
        req.big_blind,
        req.buy_in,
        req.password,
    )?;
    Ok(Json(CreateRoomResponse {
        room_id: info.room_id,
        host_name: info.host_name,
        message: "room created".to_string(),
    }))
}

async fn join_by_name(
    Extension(ctx): Extension<Arc<ServerContext>>,
    Json(req): Json<JoinByNameRequest>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let room_id = ctx
        .rooms
        .room_id_by_name(&req.room_name)
        .ok_or(RoomError::RoomNotFound)?;
    let info = ctx.rooms.join(room_id, req.player_name.clone(), req.password).await?;
    Ok(Json(JoinRoomResponse {
        room_id: info.room_id,
        room_name: info.room_name,
        player_name: req.player_name,
    }))
}

async fn join_room(
    Extension(ctx): Extension<Arc<ServerContext>>,
    Path(room_id): Path<Uuid>,
    Json(req): Json<JoinRoomRequest>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let info = ctx.rooms.join(room_id, req.player_name.clone(), req.password).await?;
    Ok(Json(JoinRoomResponse {
        room_id: info.room_id,
        room_name: info.room_name,
        player_name: req.player_name,
    }))
}

async fn get_room(
    Extension(ctx): Extension<Arc<ServerContext>>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<RoomInfo>, ApiError> {
    let info = ctx.rooms.room_snapshot(room_id).await?;
    Ok(Json(info))
}

async fn start_game(
    Extension(ctx): Extension<Arc<ServerContext>>,
    Path(room_id): Path<Uuid>,
    Json(req): Json<StartGameRequest>,
) -> Result<Json<StartGameResponse>, ApiError> {
    let game_id = ctx.rooms.start_game(room_id, req.player_name).await?;
    Ok(Json(StartGameResponse {
        game_id,
        message: "game started".to_string(),
    }))
}

async fn leave_room(
    Extension(ctx): Extension<Arc<ServerContext>>,
    Path(room_id): Path<Uuid>,
    Json(req): Json<LeaveRoomRequest>,
) -> Result<StatusCode, ApiError> {
    ctx.rooms.leave(room_id, req.player_name).await?;
    Ok(StatusCode::OK)
}

async fn player_action(
    Extension(ctx): Extension<Arc<ServerContext>>,
    Path(game_id): Path<Uuid>,
    Json(req): Json<ActionRequest>,
) -> Result<StatusCode, ApiError> {
    ctx.rooms.player_action(game_id, req.player_name, req.action).await?;
    Ok(StatusCode::OK)
}

async fn game_state(
    Extension(ctx): Extension<Arc<ServerContext>>,
    Path(game_id): Path<Uuid>,
    Query(query): Query<StateQuery>,
) -> Result<Json<crate::room::GameSnapshot>, ApiError> {
    let snapshot = ctx.rooms.game_snapshot(game_id, query.player_name).await?;
    Ok(Json(snapshot))
}
