//! Real HTTP server on an ephemeral port, for WebSocket clients

use std::net::{SocketAddr, TcpListener};

use actix_web::{dev::ServerHandle, App, HttpServer};
use content_service::AppServices;

pub async fn start_server(services: AppServices) -> std::io::Result<(SocketAddr, ServerHandle)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new().configure(|cfg| services.configure(cfg))
    })
    .workers(1)
    .disable_signals()
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_rt::spawn(server);
    Ok((addr, handle))
}
