pub mod files;
pub mod migration;
pub mod preferences;
pub mod storage;

pub use files::{ensure_data_dir, init_local_data_dir, log_file, storage_file};
pub use migration::{load_and_migrate, migrate_records, parse_records, TODOS_KEY};
pub use preferences::{load_preferences, save_appearance, save_color_theme, Preferences};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
