use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.cricapi.com/v1";
pub const DEFAULT_SERIES_ID: &str = "d5a498c8-7596-4b93-8ab0-e0efc3345312";
pub const DEFAULT_MATCH_LIST_CSV: &str = "data/IPL_2025_Match_List.csv";
pub const DEFAULT_MATCH_JSON_DIR: &str = "data/match_json";
pub const DEFAULT_PARSED_CSV_DIR: &str = "data/parsed_csv";
pub const DEFAULT_FETCH_LIMIT: usize = 10;

const MAX_FETCH_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub series_id: String,
    pub match_list_csv: PathBuf,
    pub match_json_dir: PathBuf,
    pub parsed_csv_dir: PathBuf,
    pub fetch_limit: usize,
}

impl IngestConfig {
    /// Reads `.env.local` and `.env` (if present) before the process
    /// environment is consulted.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let api_key = env_non_empty("API_KEY");
        let base_url = env_non_empty("CRICAPI_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let series_id =
            env_non_empty("SERIES_ID").unwrap_or_else(|| DEFAULT_SERIES_ID.to_string());
        let match_list_csv = env_path("MATCH_LIST_CSV", DEFAULT_MATCH_LIST_CSV);
        let match_json_dir = env_path("MATCH_JSON_DIR", DEFAULT_MATCH_JSON_DIR);
        let parsed_csv_dir = env_path("PARSED_CSV_DIR", DEFAULT_PARSED_CSV_DIR);
        let fetch_limit = env::var("FETCH_LIMIT")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_FETCH_LIMIT)
            .clamp(1, MAX_FETCH_LIMIT);

        Self {
            api_key,
            base_url,
            series_id,
            match_list_csv,
            match_json_dir,
            parsed_csv_dir,
            fetch_limit,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            series_id: DEFAULT_SERIES_ID.to_string(),
            match_list_csv: PathBuf::from(DEFAULT_MATCH_LIST_CSV),
            match_json_dir: PathBuf::from(DEFAULT_MATCH_JSON_DIR),
            parsed_csv_dir: PathBuf::from(DEFAULT_PARSED_CSV_DIR),
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    env_non_empty(key)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
