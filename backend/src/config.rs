use crate::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_file: Option<PathBuf>,
    pub static_dir: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `DATA_FILE`, `STATIC_DIR` and `ALLOWED_ORIGINS` (comma separated).
    pub fn from_env() -> Result<Self, Error> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("BIND_ADDR: {}", e)))?;

        let data_file = std::env::var("DATA_FILE")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| resolve_static_dir());

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://127.0.0.1:8080".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        Ok(Self {
            bind_addr,
            data_file,
            static_dir,
            allowed_origins,
        })
    }
}

// Works whether the server is started from the workspace root or from backend/.
fn resolve_static_dir() -> PathBuf {
    for candidate in [DEFAULT_STATIC_DIR, "backend/static", "../frontend/dist", "frontend/dist"] {
        let path = std::path::Path::new(candidate);
        if path.exists() {
            return path.to_path_buf();
        }
    }
    PathBuf::from(DEFAULT_STATIC_DIR)
}
