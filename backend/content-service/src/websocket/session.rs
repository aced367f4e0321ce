use actix::{Actor, ActorContext, AsyncContext, StreamHandler};
use actix_middleware::UserId;
use actix_web_actors::ws;
use std::time::{Duration, Instant};

use super::manager::{ConnectionManager, EventReceiver, Subscription};
use super::messages::ServerMessage;
use crate::channel::NotificationEvent;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// One live notification connection for one user
pub struct NotificationSession {
    user_id: UserId,
    topic: String,
    subscription_id: u64,
    receiver: Option<EventReceiver>,
    manager: ConnectionManager,
    hb: Instant,
}

impl NotificationSession {
    pub fn new(user_id: UserId, subscription: Subscription, manager: ConnectionManager) -> Self {
        Self {
            user_id,
            topic: subscription.topic,
            subscription_id: subscription.id,
            receiver: Some(subscription.receiver),
            manager,
            hb: Instant::now(),
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::warn!(user_id = %act.user_id, "WebSocket heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn send(&self, message: &ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match message.to_json() {
            Ok(text) => ctx.text(text),
            Err(e) => tracing::warn!(error = %e, "failed to encode WebSocket frame"),
        }
    }
}

impl Actor for NotificationSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(user_id = %self.user_id, topic = %self.topic, "notification stream opened");

        self.hb(ctx);

        if let Some(receiver) = self.receiver.take() {
            let events = futures::stream::unfold(receiver, |mut rx| async move {
                rx.recv().await.map(|event| (event, rx))
            });
            ctx.add_stream(events);
        }

        self.send(&ServerMessage::connected(&self.topic), ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(user_id = %self.user_id, topic = %self.topic, "notification stream closed");

        let manager = self.manager.clone();
        let topic = self.topic.clone();
        let subscription_id = self.subscription_id;

        actix::spawn(async move {
            manager.unsubscribe(&topic, subscription_id).await;
        });
    }
}

// Events published to this connection's topic
impl StreamHandler<NotificationEvent> for NotificationSession {
    fn handle(&mut self, event: NotificationEvent, ctx: &mut Self::Context) {
        self.send(&ServerMessage::Notification(event), ctx);
    }

    /// The hub dropped our sender: a newer connection took over the topic.
    fn finished(&mut self, ctx: &mut Self::Context) {
        tracing::info!(user_id = %self.user_id, "superseded by a newer connection");
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Normal,
            description: Some("superseded".to_string()),
        }));
        ctx.stop();
    }
}

// Handle WebSocket protocol messages
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for NotificationSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(_)) | Ok(ws::Message::Binary(_)) => {
                // The stream is push-only; inbound frames only count as liveness.
                self.hb = Instant::now();
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::debug!(?reason, "WebSocket close message received");
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                tracing::warn!(error = %e, "WebSocket protocol error");
                ctx.stop();
            }
            _ => {}
        }
    }
}
