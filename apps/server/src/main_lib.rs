//! Application state construction and tracing setup.

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::auth::AuthManager;
use crate::config::Config;
use seva_core::donations::{DonationService, DonationServiceTrait};
use seva_core::donors::{DonorService, DonorServiceTrait};
use seva_core::gateway::{GatewayCredentials, RazorpayClient};
use seva_core::notifications::{EmailClient, ReceiptMailerTrait};
use seva_core::programs::{ProgramService, ProgramServiceTrait};
use seva_core::reporting::{ReportingService, ReportingServiceTrait};
use seva_core::settings::{SettingsService, SettingsServiceTrait};
use seva_storage_sqlite::donations::DonationRepository;
use seva_storage_sqlite::donors::DonorRepository;
use seva_storage_sqlite::programs::ProgramRepository;
use seva_storage_sqlite::settings::SettingsRepository;
use seva_storage_sqlite::{db, spawn_writer};

pub struct AppState {
    pub donation_service: Arc<dyn DonationServiceTrait + Send + Sync>,
    pub donor_service: Arc<dyn DonorServiceTrait + Send + Sync>,
    pub program_service: Arc<dyn ProgramServiceTrait + Send + Sync>,
    pub reporting_service: Arc<dyn ReportingServiceTrait + Send + Sync>,
    pub settings_service: Arc<SettingsService>,
    pub db_path: String,
    pub instance_id: String,
    pub auth: Option<Arc<AuthManager>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SEVA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let settings_repo = Arc::new(SettingsRepository::new(pool.clone(), writer.clone()));
    let settings_service = Arc::new(SettingsService::new(settings_repo));
    let instance_id = settings_service.ensure_instance_id().await?;
    let settings = settings_service.get_settings()?;

    let donor_repo = Arc::new(DonorRepository::new(pool.clone(), writer.clone()));
    let donor_service = Arc::new(DonorService::new(donor_repo.clone()));

    let program_repo = Arc::new(ProgramRepository::new(pool.clone(), writer.clone()));
    let program_service = Arc::new(ProgramService::new(program_repo.clone()));

    let donation_repo = Arc::new(DonationRepository::new(pool.clone(), writer.clone()));
    let reporting_service = Arc::new(ReportingService::new(donation_repo.clone()));

    if config.razorpay_key_id.is_empty() || config.razorpay_key_secret.is_empty() {
        tracing::warn!(
            "Razorpay credentials are not configured; order creation and verification will fail"
        );
    }
    let credentials = GatewayCredentials {
        key_id: config.razorpay_key_id.clone(),
        key_secret: config.razorpay_key_secret.clone(),
    };
    let gateway = Arc::new(RazorpayClient::new(credentials.clone()));

    let mut donation_service = DonationService::new(
        donation_repo.clone(),
        donor_repo.clone(),
        program_repo.clone(),
        settings_service.clone(),
        gateway,
        credentials,
    );
    if let Some(email_env) = config.email.clone() {
        let mailer: Arc<dyn ReceiptMailerTrait> = Arc::new(EmailClient::new(
            email_env.into_email_config(settings.organization_name.clone()),
        ));
        donation_service = donation_service.with_mailer(mailer);
    } else {
        tracing::info!("Email sender not configured; receipt emails are disabled");
    }

    let auth = config
        .auth
        .as_ref()
        .map(AuthManager::new)
        .transpose()?
        .map(Arc::new);

    Ok(Arc::new(AppState {
        donation_service: Arc::new(donation_service),
        donor_service,
        program_service,
        reporting_service,
        settings_service,
        db_path,
        instance_id,
        auth,
    }))
}
