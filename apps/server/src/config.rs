//! Server configuration sourced from the environment.

use seva_core::notifications::EmailConfig;

/// Admin authentication settings. Absent when no password hash is
/// configured, which leaves the admin API open (local deployments).
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Argon2 PHC-format hash of the admin password.
    pub password_hash: String,
    /// HS256 secret for issued bearer tokens.
    pub jwt_secret: String,
}

/// Transactional email settings. Absent config disables receipt emails.
#[derive(Debug, Clone)]
pub struct EmailEnv {
    pub base_url: String,
    pub auth_token: String,
    pub from_address: String,
}

impl EmailEnv {
    pub fn into_email_config(self, organization_name: String) -> EmailConfig {
        EmailConfig {
            base_url: self.base_url,
            auth_token: self.auth_token,
            from_address: self.from_address,
            organization_name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub db_path: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub email: Option<EmailEnv>,
    pub cors_origin: Option<String>,
    pub auth: Option<AuthConfig>,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        let listen_addr =
            env_opt("SEVA_LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let db_path = env_opt("SEVA_DB_PATH").unwrap_or_else(|| "data/seva.db".to_string());

        let razorpay_key_id = env_opt("RAZORPAY_KEY_ID").unwrap_or_default();
        let razorpay_key_secret = env_opt("RAZORPAY_KEY_SECRET").unwrap_or_default();

        let email = match (
            env_opt("SEVA_EMAIL_API_URL"),
            env_opt("SEVA_EMAIL_TOKEN"),
            env_opt("SEVA_EMAIL_FROM"),
        ) {
            (Some(base_url), Some(auth_token), Some(from_address)) => Some(EmailEnv {
                base_url,
                auth_token,
                from_address,
            }),
            _ => None,
        };

        let auth = env_opt("SEVA_ADMIN_PASSWORD_HASH").map(|password_hash| AuthConfig {
            password_hash,
            // Fall back to a per-boot secret: tokens then survive only
            // until the next restart, which is fine for a single node.
            jwt_secret: env_opt("SEVA_JWT_SECRET")
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        });

        Self {
            listen_addr,
            db_path,
            razorpay_key_id,
            razorpay_key_secret,
            email,
            cors_origin: env_opt("SEVA_CORS_ORIGIN"),
            auth,
        }
    }
}
