pub mod paths;
pub mod schema;
pub mod tasks;

pub use paths::{atomic_write, database_path, init_local_data_dir, log_file_for};
pub use tasks::{TaskStore, DEFAULT_HISTORY_LIMIT};
