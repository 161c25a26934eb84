use tracing::warn;

/// Runtime configuration, read once at startup from the environment.
pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub allowed_origins: Vec<String>,
    /// Upstream base URLs. Overridable so tests and local stubs can point
    /// the fetchers at a fake server.
    pub viacep_url: String,
    pub nominatim_url: String,
    pub locat_url: String,
}

impl Config {
    const DEFAULT_DATA_DIR: &'static str = "./data";
    const DEFAULT_VIACEP_URL: &'static str = "https://viacep.com.br/ws";
    const DEFAULT_NOMINATIM_URL: &'static str = "https://nominatim.openstreetmap.org/search";
    const DEFAULT_LOCAT_URL: &'static str = "https://locatsp.saclimpeza2.com.br/mapa/resultados/";

    pub fn from_env() -> Self {
        let host = std::env::var("LOGOALI_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let http_port = std::env::var("LOGOALI_HTTP_PORT")
            .unwrap_or_else(|_| "3333".to_string())
            .parse::<u16>()
            .unwrap_or_else(|_| {
                warn!("LOGOALI_HTTP_PORT is not a valid port, falling back to 3333");
                3333
            });
        Self {
            host,
            http_port,
            data_dir: std::env::var("LOGOALI_DATA_DIR")
                .unwrap_or_else(|_| Self::DEFAULT_DATA_DIR.to_string()),
            allowed_origins: std::env::var("LOGOALI_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            viacep_url: std::env::var("LOGOALI_VIACEP_URL")
                .unwrap_or_else(|_| Self::DEFAULT_VIACEP_URL.to_string()),
            nominatim_url: std::env::var("LOGOALI_NOMINATIM_URL")
                .unwrap_or_else(|_| Self::DEFAULT_NOMINATIM_URL.to_string()),
            locat_url: std::env::var("LOGOALI_LOCAT_URL")
                .unwrap_or_else(|_| Self::DEFAULT_LOCAT_URL.to_string()),
        }
    }
}
