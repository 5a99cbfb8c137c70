// src/handlers/mod.rs

pub mod accounting;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod documents;
pub mod leather;
pub mod purchases;
pub mod sales;
pub mod tenancy;

use rust_decimal::Decimal;
use validator::ValidationError;

// Validação compartilhada pelos payloads com valores monetários
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}
