// src/services/document_service.rs

use genpdf::{Element, elements, style};
use image::Luma;
use qrcode::QrCode;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AccountingRepository,
    models::tenancy::TenantScope,
};

#[derive(Clone)]
pub struct DocumentService {
    accounting_repo: AccountingRepository,
}

impl DocumentService {
    pub fn new(accounting_repo: AccountingRepository) -> Self {
        Self { accounting_repo }
    }

    /// Renderiza a fatura em PDF: cabeçalho, razão de pagamentos e saldos
    /// derivados no momento da emissão.
    pub async fn generate_invoice_pdf<'e, E>(
        &self,
        executor: E,
        scope: TenantScope,
        invoice_id: Uuid,
    ) -> Result<Vec<u8>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // 1. Busca os dados em uma transação (snapshot consistente)
        let mut tx = executor.begin().await?;

        let invoice = self
            .accounting_repo
            .get_invoice(&mut *tx, scope, invoice_id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;

        let customer_name =
            sqlx::query_scalar::<_, String>("SELECT name FROM customers WHERE id = $1")
                .bind(invoice.customer_id)
                .fetch_one(&mut *tx)
                .await?;

        let payments = self
            .accounting_repo
            .list_payments(&mut *tx, scope, invoice_id)
            .await?;

        tx.commit().await?;

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Fatura {}", invoice.invoice_number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(format!("FATURA {}", invoice.invoice_number))
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Emissão: {}",
            invoice.date.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Vencimento: {}",
            invoice.due_date.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!("Cliente: {}", customer_name)));
        doc.push(elements::Paragraph::new(format!(
            "Status: {}",
            invoice.status.label()
        )));

        doc.push(elements::Break::new(2));

        // --- RAZÃO DE PAGAMENTOS ---
        // Pesos das colunas: Data (2), Método (2), Referência (3), Valor (2)
        let mut table = elements::TableLayout::new(vec![2, 2, 3, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Data").styled(style_bold))
            .element(elements::Paragraph::new("Método").styled(style_bold))
            .element(elements::Paragraph::new("Referência").styled(style_bold))
            .element(elements::Paragraph::new("Valor").styled(style_bold))
            .push()
            .expect("Table error");

        if payments.is_empty() {
            table
                .row()
                .element(elements::Paragraph::new("-"))
                .element(elements::Paragraph::new("-"))
                .element(elements::Paragraph::new("Nenhum pagamento registrado"))
                .element(elements::Paragraph::new("-"))
                .push()
                .expect("Table row error");
        }

        for payment in &payments {
            table
                .row()
                .element(elements::Paragraph::new(
                    payment.date.format("%d/%m/%Y").to_string(),
                ))
                .element(elements::Paragraph::new(payment.method.label()))
                .element(elements::Paragraph::new(
                    payment.reference.clone().unwrap_or_else(|| "-".to_string()),
                ))
                .element(elements::Paragraph::new(format!("R$ {:.2}", payment.amount)))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        let mut total_paragraph =
            elements::Paragraph::new(format!("TOTAL: R$ {:.2}", invoice.total_amount));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        let mut paid_paragraph =
            elements::Paragraph::new(format!("PAGO: R$ {:.2}", invoice.amount_paid));
        paid_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(paid_paragraph);

        let mut due_paragraph =
            elements::Paragraph::new(format!("EM ABERTO: R$ {:.2}", invoice.amount_due));
        due_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(due_paragraph.styled(style::Style::new().bold()));

        doc.push(elements::Break::new(2));

        // --- CÓDIGO DE CONFERÊNCIA (QR) ---
        let code = QrCode::new(invoice.invoice_number.as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));

        doc.push(pdf_image);

        // 3. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
