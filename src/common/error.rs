use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As variantes de ciclo de vida (NotFound, InvalidState, InsufficientStock,
// Unscoped, OperationFailed) carregam contexto suficiente para o chamador
// agir, sem vazar detalhes de armazenamento.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Entidade ausente ou fora do escopo do tenant do chamador.
    // As duas situações são indistinguíveis de propósito.
    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    // Transição tentada a partir de um status que não a permite
    #[error("{0}")]
    InvalidState(String),

    // A confirmação de venda deixaria o estoque negativo
    #[error(
        "Estoque insuficiente para {product_name} (Solicitado: {requested}, Disponível: {available})"
    )]
    InsufficientStock {
        product_name: String,
        requested: i32,
        available: i32,
    },

    // Chamador sem tenant associado e sem acesso administrativo,
    // ou operação de escrita sem tenant explícito
    #[error("Usuário não está associado a nenhum tenant")]
    Unscoped,

    // O banco abortou a transação (conflito de serialização / deadlock).
    // Seguro repetir: nada foi aplicado.
    #[error("A operação falhou por conflito de concorrência. Tente novamente.")]
    OperationFailed,

    // Violação de unicidade por tenant (número de pedido, SKU, nome...)
    #[error("{0} já existe")]
    UniqueViolation(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if let Some(code) = db_err.code() {
                // 40001 = serialization_failure, 40P01 = deadlock_detected
                if code == "40001" || code == "40P01" {
                    return AppError::OperationFailed;
                }
            }
        }
        AppError::DatabaseError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Nomeia o produto e as quantidades para o chamador agir.
            AppError::InsufficientStock {
                ref product_name,
                requested,
                available,
            } => {
                let body = Json(json!({
                    "error": self.to_string(),
                    "product": product_name,
                    "requested": requested,
                    "available": available,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InvalidState(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Unscoped => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::OperationFailed => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::UniqueViolation(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".into())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".into())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".into(),
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado.".into()),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".into(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
