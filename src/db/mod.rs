// src/db/mod.rs

mod accounting_repo;
mod catalog_repo;
mod dashboard_repo;
mod leather_repo;
mod purchases_repo;
mod receivable;
mod sales_repo;
mod tenancy_repo;
mod user_repo;

pub use accounting_repo::{AccountingRepository, InvoiceForUpdate};
pub use catalog_repo::CatalogRepository;
pub use dashboard_repo::DashboardRepository;
pub use leather_repo::LeatherRepository;
pub use purchases_repo::PurchasesRepository;
pub use receivable::{ReceivableOrderHead, ReceivableOrders, StockLedgerEffect};
pub use sales_repo::{SalesOrderForUpdate, SalesRepository};
pub use tenancy_repo::TenantRepository;
pub use user_repo::UserRepository;
