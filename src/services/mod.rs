// src/services/mod.rs

pub mod accounting_service;
pub mod auth;
pub mod catalog_service;
pub mod dashboard_service;
pub mod document_service;
pub mod leather_service;
pub mod purchases_service;
pub mod receiving;
pub mod sales_service;
pub mod tenancy_service;
