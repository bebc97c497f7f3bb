use anyhow::Result;
use clap::Parser;
use payment_service::api::{self, AppState};
use payment_service::config::Args;
use payment_service::db;
use payment_service::handlers::PaymentReconciler;
use payment_service::repository::PgOrderRepository;
use payment_service::signature::SignatureVerifier;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    db::run_migrations(&args.database_url)?;
    let pool = db::connect_pool(&args.database_url, args.max_db_connections).await?;

    let repository = Arc::new(PgOrderRepository::new(pool));
    let reconciler = PaymentReconciler::new(repository, args.redirect_config());

    let verifier = match args.easebuzz_salt.as_deref().filter(|salt| !salt.is_empty()) {
        Some(salt) => Some(Arc::new(SignatureVerifier::new(salt))),
        None => {
            warn!("EASEBUZZ_SALT is not set, payment callbacks will not be authenticated");
            None
        }
    };

    let app_state = AppState {
        reconciler: Arc::new(reconciler),
        verifier,
    };

    let app = api::create_router(app_state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;

    info!("Payment service web server started on port {}", args.port);
    info!("Payment callbacks accepted at http://0.0.0.0:{}/api/payment_callback", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
