// src/models/mod.rs

pub mod accounting;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod leather;
pub mod purchases;
pub mod sales;
pub mod tenancy;
