/// Real-time notification stream
///
/// `GET /api/notifications/ws` upgrades to a WebSocket subscribed to the
/// caller's topic. A newer connection for the same user replaces this one.
use actix_middleware::UserId;
use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_actors::ws;

use crate::channel::user_topic;
use crate::websocket::{ConnectionManager, NotificationSession};

pub async fn notification_stream(
    req: HttpRequest,
    stream: web::Payload,
    user_id: UserId,
    manager: web::Data<ConnectionManager>,
) -> actix_web::Result<HttpResponse> {
    // Reject bad upgrades before touching the hub.
    ws::handshake(&req)?;

    let subscription = manager.subscribe(&user_topic(user_id.0)).await;
    tracing::info!(user_id = user_id.0, subscription = subscription.id, "WebSocket subscription opened");

    let session = NotificationSession::new(user_id, subscription, manager.get_ref().clone());
    ws::start(session, &req, stream)
}
