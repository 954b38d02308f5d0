use salvo::prelude::*;
use webchat::core::{api::salvo_config::get_salvo_service, env::app_env::AppEnv};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt().init();

    let env = AppEnv::new();
    let http_addr = format!("0.0.0.0:{}", env.app_port);

    let acceptor = TcpListener::new(&http_addr).bind().await;
    let server = Server::new(acceptor);
    let handle = server.handle();

    // Graceful shutdown handler
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl_c");
        tracing::info!("Signal received, shutting down gracefully...");
        handle.stop_graceful(None);
    });

    server.serve(get_salvo_service(&env).await).await;

    Ok(())
}
