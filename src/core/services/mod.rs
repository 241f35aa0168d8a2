pub mod category_service;
pub mod data_service;
pub mod history_service;
pub mod summary_service;
pub mod transaction_service;

pub use category_service::CategoryService;
pub use data_service::{BuildInfo, DataService, StorageInfo};
pub use history_service::{HistoryService, KindFilter, TransactionFilter};
pub use summary_service::{CategoryShare, DashboardData, MonthlyStats, SummaryService, Totals};
pub use transaction_service::TransactionService;

use crate::errors::BookError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Book(#[from] BookError),
    #[error("{0}")]
    Invalid(String),
    #[error("Transaction `{0}` not found")]
    NotFound(String),
}
