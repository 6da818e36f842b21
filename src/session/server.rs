use super::ClientMessage;
use super::Outbox;
use super::ServerMessage;
use crate::lobby::Lobby;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;

pub struct Server;

impl Server {
    pub async fn run(port: u16) -> Result<(), std::io::Error> {
        let state = web::Data::new(Arc::new(Lobby::default()));
        log::info!("listening on port {}", port);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(state.clone())
                .route("/ws", web::get().to(connect))
                .route("/health", web::get().to(health))
        })
        .workers(4)
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn connect(
    lobby: web::Data<Arc<Lobby>>,
    req: HttpRequest,
    body: web::Payload,
) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            bridge(lobby.get_ref().clone(), session, stream).await;
            response.map_into_left_body()
        }
        Err(e) => HttpResponse::InternalServerError()
            .body(e.to_string())
            .map_into_right_body(),
    }
}

/// Pumps one socket: outbound frames drain from the client's outbox,
/// inbound text parses into [`ClientMessage`] and routes; anything
/// unparseable is rejected without state change. Socket loss runs the
/// disconnect path.
async fn bridge(lobby: Arc<Lobby>, mut session: actix_ws::Session, mut stream: actix_ws::MessageStream) {
    use futures::StreamExt;
    let (tx, mut rx): (Outbox, _) = tokio::sync::mpsc::unbounded_channel();
    let id = lobby.register(tx).await;
    let _ = session.text(ServerMessage::Welcome { client_id: id }.to_json()).await;
    actix_web::rt::spawn(async move {
        'sesh: loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Some(json) => if session.text(json).await.is_err() { break 'sesh },
                    None => break 'sesh,
                },
                msg = stream.next() => match msg {
                    Some(Ok(actix_ws::Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(message) => lobby.route(id, message).await,
                            Err(e) => {
                                log::debug!("[bridge {}] bad frame: {}", id, e);
                                lobby
                                    .reply(id, &ServerMessage::error("Unknown message type"))
                                    .await;
                            }
                        }
                    }
                    Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                    Some(Err(_)) => break 'sesh,
                    None => break 'sesh,
                    _ => continue 'sesh,
                },
            }
        }
        lobby.disconnect(id).await;
        log::debug!("[bridge {}] closed", id);
    });
}
