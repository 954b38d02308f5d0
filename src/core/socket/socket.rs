use async_channel::{Receiver, Sender};
use salvo::prelude::*;
use socketioxide::{
    SocketIo,
    extract::{Data, SocketRef, State},
    handler::ConnectHandler,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{
    core::{
        dtos::socket::socket_dto::{JoinRoomDto, RelayMessageDto},
        types::{
            app_channel::AppEvent,
            enums::ws_event::{WsEvent, room_topic},
            errors::chat_error::ChatError,
            responses::failed_response::FailedResponse,
            session::ConnectionSession,
        },
        utils::jwt_utils::JwtUtils,
    },
    features::{
        chat::{
            repository::ChatRepositoryImpl,
            service::{ChatService, ChatServiceImpl},
        },
        room::repository::RoomRepositoryImpl,
        user::repository::UserRepositoryImpl,
    },
};

pub type ChatRelayService =
    ChatServiceImpl<ChatRepositoryImpl, RoomRepositoryImpl, UserRepositoryImpl>;

#[endpoint(tags("socket.io"))]
async fn version() -> &'static str {
    "WebChat relay endpoint"
}

pub async fn get_socket_router(
    jwt_utils: JwtUtils,
    chat_service: ChatRelayService,
    message_sender: Sender<AppEvent>,
    message_receiver: Receiver<AppEvent>,
) -> Result<Router, Box<dyn std::error::Error>> {
    let (layer, io) = SocketIo::builder()
        .with_state(jwt_utils)
        .with_state(chat_service)
        .with_state(message_sender)
        .build_layer();

    let layer = ServiceBuilder::new()
        .layer(CorsLayer::permissive()) // Enable CORS policy
        .layer(layer);

    io.ns("/", on_connect.with(session_middleware));

    let layer = layer.compat();
    let router = Router::new().hoop(layer).path("/socket.io").goal(version);

    let io_clone = io.clone();
    tokio::spawn(handle_message_broadcast(io_clone, message_receiver));

    Ok(router)
}

/// Publishes every persisted message to its room topic. Fire-and-forget:
/// no per-subscriber retry, no delivery tracking, the sender receives its
/// own copy like any other subscriber.
pub async fn handle_message_broadcast(io: SocketIo, receiver: Receiver<AppEvent>) {
    while let Ok(event) = receiver.recv().await {
        match event {
            AppEvent::MessageCreated(message) => {
                let io = io.clone();
                tokio::spawn(async move {
                    let _ = io
                        .broadcast()
                        .to(room_topic(message.room_id))
                        .emit(WsEvent::ChatMessage.to_str(), &message)
                        .await
                        .ok();
                });
            }
        }
    }
}

/// Attach the session context from the handshake token. A missing or
/// invalid token still connects; the connection simply stays
/// unauthenticated and every relay operation on it is rejected.
async fn session_middleware(
    s: SocketRef,
    State(jwt_utils): State<JwtUtils>,
) -> Result<(), anyhow::Error> {
    let token = s
        .req_parts()
        .headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start_matches("Bearer ").to_owned());

    let session = match token {
        Some(token) => match jwt_utils.decode_token(&token) {
            Ok(claims) => ConnectionSession::authenticated(claims.username),
            Err(err) => {
                warn!("decode token failed: {:?}", err);
                ConnectionSession::default()
            }
        },
        None => ConnectionSession::default(),
    };

    s.extensions.insert(session);

    Ok(())
}

async fn on_connect(socket: SocketRef) {
    let session = socket
        .extensions
        .get::<ConnectionSession>()
        .unwrap_or_default();

    info!(
        "connection {} opened (user: {:?})",
        socket.id, session.username
    );

    socket.on(WsEvent::ChatSendMessage.to_str(), handle_send_message);
    socket.on(WsEvent::ChatAddUser.to_str(), handle_add_user);

    socket.on_disconnect(on_disconnect);
}

async fn on_disconnect(socket: SocketRef) {
    info!("connection {} closed", socket.id);
}

async fn handle_send_message(
    socket: SocketRef,
    Data(data): Data<RelayMessageDto>,
    State(chat_service): State<ChatRelayService>,
    State(message_sender): State<Sender<AppEvent>>,
) {
    let session = socket
        .extensions
        .get::<ConnectionSession>()
        .unwrap_or_default();

    match chat_service.send_message(&session, data).await {
        Ok(message) => {
            let _ = message_sender.send(AppEvent::MessageCreated(message)).await;
        }
        Err(err) => reject(&socket, err),
    }
}

async fn handle_add_user(
    socket: SocketRef,
    Data(data): Data<JoinRoomDto>,
    State(chat_service): State<ChatRelayService>,
    State(message_sender): State<Sender<AppEvent>>,
) {
    let mut session = socket
        .extensions
        .get::<ConnectionSession>()
        .unwrap_or_default();

    match chat_service.add_user(&session, data.room_id).await {
        Ok(message) => {
            // One room at a time: a second join replaces the association.
            if let Some(previous) = session.current_room_id {
                if previous != data.room_id {
                    socket.leave(room_topic(previous));
                }
            }
            socket.join(room_topic(data.room_id));
            session.current_room_id = Some(data.room_id);
            socket.extensions.insert(session);

            let _ = message_sender.send(AppEvent::MessageCreated(message)).await;
        }
        Err(err) => reject(&socket, err),
    }
}

/// Failure policy of the relay: log server-side, answer the caller with the
/// user-facing reason, keep the connection open.
fn reject(socket: &SocketRef, err: ChatError) {
    warn!("relay operation rejected: {err}");
    socket
        .emit(
            WsEvent::ChatError.to_str(),
            &FailedResponse {
                message: err.to_string(),
            },
        )
        .ok();
}
