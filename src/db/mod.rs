use crate::components::PreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
use rusqlite::OptionalExtension;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

/// Error type for preference storage on every platform
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("database error: {0}")]
    Database(String),
}

#[cfg(not(target_arch = "wasm32"))]
impl From<rusqlite::Error> for PreferenceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

pub const DEFAULT_PREFERENCE_KEY: &str = "music-muted";

/// Background music and page timing settings
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    pub target_volume: f64,
    pub fade_step: f64,
    pub fade_interval_ms: u64,
    pub fade_out_floor: f64,
    pub autoplay_delay_ms: u32,
    pub preference_key: String,
    pub source_url: String,
    pub data_url: String,
    pub loading_screen_ms: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            target_volume: 0.3,
            fade_step: 0.05,
            fade_interval_ms: 50,
            fade_out_floor: 0.05,
            autoplay_delay_ms: 3000,
            preference_key: DEFAULT_PREFERENCE_KEY.to_string(),
            source_url: "/assets/audio/background-music.mp3".to_string(),
            data_url: "/assets/data.json".to_string(),
            loading_screen_ms: 2000,
        }
    }
}

fn unit_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

impl AudioSettings {
    /// Pull every value back into a usable range; anything unusable takes the default.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.target_volume = unit_or(self.target_volume, defaults.target_volume);
        self.fade_out_floor = unit_or(self.fade_out_floor, defaults.fade_out_floor);
        self.fade_step = unit_or(self.fade_step, defaults.fade_step);
        if self.fade_step <= 0.0 {
            self.fade_step = defaults.fade_step;
        }
        if self.fade_interval_ms == 0 {
            self.fade_interval_ms = defaults.fade_interval_ms;
        }
        if self.preference_key.trim().is_empty() {
            self.preference_key = defaults.preference_key;
        }
        self
    }
}

/// Browser localStorage, values kept as the raw strings "true" / "false"
#[cfg(target_arch = "wasm32")]
pub struct LocalPreferenceStore;

#[cfg(target_arch = "wasm32")]
impl PreferenceStore for LocalPreferenceStore {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| PreferenceError::Storage(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| PreferenceError::Storage(format!("{e:?}")))
    }
}

/// Key/value settings table for native preview builds
#[cfg(not(target_arch = "wasm32"))]
pub struct SqlitePreferenceStore {
    conn: rusqlite::Connection,
}

#[cfg(not(target_arch = "wasm32"))]
impl SqlitePreferenceStore {
    pub fn open_default() -> Result<Self, PreferenceError> {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join("neon-portfolio"))
            .unwrap_or_else(|| std::path::PathBuf::from(".neon-portfolio"));
        std::fs::create_dir_all(&data_dir)
            .map_err(|e| PreferenceError::Storage(e.to_string()))?;

        let conn = rusqlite::Connection::open(data_dir.join("portfolio.db"))
            .map_err(|e| PreferenceError::Database(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: rusqlite::Connection) -> Result<Self, PreferenceError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for SqlitePreferenceStore {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [key],
                |row: &rusqlite::Row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            [key, value],
        )?;
        Ok(())
    }
}

/// In-memory fallback when no persistent store can be opened
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: std::collections::HashMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn store() -> SqlitePreferenceStore {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        SqlitePreferenceStore::from_connection(conn).unwrap()
    }

    #[test]
    fn sqlite_store_round_trips_the_flag() {
        let mut store = store();
        assert_eq!(store.read(DEFAULT_PREFERENCE_KEY).unwrap(), None);

        store.write(DEFAULT_PREFERENCE_KEY, "true").unwrap();
        assert_eq!(
            store.read(DEFAULT_PREFERENCE_KEY).unwrap().as_deref(),
            Some("true")
        );

        store.write(DEFAULT_PREFERENCE_KEY, "false").unwrap();
        assert_eq!(
            store.read(DEFAULT_PREFERENCE_KEY).unwrap().as_deref(),
            Some("false")
        );
    }

    #[test]
    fn memory_store_keeps_keys_apart() {
        let mut store = MemoryPreferenceStore::default();
        store.write("a", "true").unwrap();
        assert_eq!(store.read("a").unwrap().as_deref(), Some("true"));
        assert_eq!(store.read("b").unwrap(), None);
    }

    #[test]
    fn defaults_match_the_background_music_contract() {
        let settings = AudioSettings::default();
        assert_eq!(settings.target_volume, 0.3);
        assert_eq!(settings.fade_step, 0.05);
        assert_eq!(settings.fade_interval_ms, 50);
        assert_eq!(settings.autoplay_delay_ms, 3000);
        assert_eq!(settings.preference_key, "music-muted");
    }

    #[test]
    fn normalized_repairs_out_of_range_values() {
        let settings = AudioSettings {
            target_volume: 1.8,
            fade_step: 0.0,
            fade_interval_ms: 0,
            fade_out_floor: f64::NAN,
            preference_key: "  ".into(),
            ..AudioSettings::default()
        }
        .normalized();

        assert_eq!(settings.target_volume, 1.0);
        assert_eq!(settings.fade_step, 0.05);
        assert_eq!(settings.fade_interval_ms, 50);
        assert_eq!(settings.fade_out_floor, 0.05);
        assert_eq!(settings.preference_key, "music-muted");
    }
}
