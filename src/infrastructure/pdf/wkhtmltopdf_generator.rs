use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::invoice_renderer::InvoiceHtmlRenderer;
use crate::domain::invoice::{InvoiceDocument, InvoiceError, PdfGenerator};

/// Renders the invoice template and pipes it through `wkhtmltopdf`
pub struct WkHtmlToPdfGenerator {
  renderer: InvoiceHtmlRenderer,
  wkhtmltopdf_path: String,
}

impl WkHtmlToPdfGenerator {
  pub fn new(renderer: InvoiceHtmlRenderer, wkhtmltopdf_path: Option<String>) -> Self {
    let wkhtmltopdf_path = wkhtmltopdf_path.unwrap_or_else(|| "wkhtmltopdf".to_string());

    Self {
      renderer,
      wkhtmltopdf_path,
    }
  }

  async fn verify_wkhtmltopdf_installed(&self) -> Result<(), InvoiceError> {
    let output = Command::new(&self.wkhtmltopdf_path)
      .arg("--version")
      .output()
      .await
      .map_err(|e| {
        InvoiceError::PdfGenerationFailed(format!(
          "wkhtmltopdf not found: {}. Please install wkhtmltopdf.",
          e
        ))
      })?;

    if !output.status.success() {
      return Err(InvoiceError::PdfGenerationFailed(
        "wkhtmltopdf is not working correctly".to_string(),
      ));
    }

    Ok(())
  }

  async fn convert(&self, html: String) -> Result<Vec<u8>, InvoiceError> {
    let mut child = Command::new(&self.wkhtmltopdf_path)
      .args([
        "--page-size",
        "A4",
        "--margin-top",
        "10mm",
        "--margin-bottom",
        "10mm",
        "--margin-left",
        "10mm",
        "--margin-right",
        "10mm",
        "--encoding",
        "utf-8",
        "--quiet",
        "-",
        "-",
      ])
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()
      .map_err(|e| {
        InvoiceError::PdfGenerationFailed(format!("wkhtmltopdf execution failed: {}", e))
      })?;

    let mut stdin = child.stdin.take().ok_or_else(|| {
      InvoiceError::PdfGenerationFailed("wkhtmltopdf stdin unavailable".to_string())
    })?;
    stdin.write_all(html.as_bytes()).await.map_err(|e| {
      InvoiceError::PdfGenerationFailed(format!("Failed to send HTML to wkhtmltopdf: {}", e))
    })?;
    drop(stdin);

    let output = child.wait_with_output().await.map_err(|e| {
      InvoiceError::PdfGenerationFailed(format!("wkhtmltopdf execution failed: {}", e))
    })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(InvoiceError::PdfGenerationFailed(format!(
        "wkhtmltopdf failed: {}",
        stderr
      )));
    }
    if output.stdout.is_empty() {
      return Err(InvoiceError::PdfGenerationFailed(
        "wkhtmltopdf produced no output".to_string(),
      ));
    }

    Ok(output.stdout)
  }
}

#[async_trait]
impl PdfGenerator for WkHtmlToPdfGenerator {
  async fn generate(&self, document: &InvoiceDocument) -> Result<Vec<u8>, InvoiceError> {
    self.verify_wkhtmltopdf_installed().await?;

    let html = self.renderer.render(document)?;
    tracing::info!(
      invoice_id = %document.invoice.id,
      html_bytes = html.len(),
      "Generating invoice PDF"
    );

    self.convert(html).await
  }
}
