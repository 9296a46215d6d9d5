/// Attendance service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AttendanceConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for access-token validation. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Secret the QR payload key is derived from. Env var: `QR_SECRET`.
    pub qr_secret: String,
    /// TCP port for the HTTP server (default 3114). Env var: `ATTENDANCE_PORT`.
    pub attendance_port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

const DEFAULT_PORT: u16 = 3114;

impl AttendanceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let attendance_port = match lookup("ATTENDANCE_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "ATTENDANCE_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            qr_secret: required("QR_SECRET")?,
            attendance_port,
        })
    }
}
