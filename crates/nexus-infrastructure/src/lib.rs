pub mod config_service;
pub mod history_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::history_repository::FileHistoryRepository;
pub use crate::paths::NexusPaths;
