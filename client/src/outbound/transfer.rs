//! Import/export service adapter: bulk document upload and download.

use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};

use crate::config::Service;
use crate::domain::error::ClientError;
use crate::domain::language::Language;
use crate::domain::model::{ImportJob, ImportStarted, TermStatus};
use crate::outbound::http::{Auth, HttpClient};

/// Bulk document formats accepted on both directions of the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array of term objects.
    Json,
}

impl TransferFormat {
    /// Wire value for the `format` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Infer the format from a file extension, defaulting to CSV.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Filters applied to an export download.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportFilter {
    /// Restrict to one category.
    pub category_id: Option<i64>,
    /// Restrict to one moderation stage.
    pub status: Option<TermStatus>,
}

/// Typed client for the import/export service.
pub struct ImportExportClient {
    http: Arc<HttpClient>,
}

impl ImportExportClient {
    /// Wire the adapter to the shared request core.
    #[must_use]
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Download the dictionary in the given format and language.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures.
    pub async fn export(
        &self,
        format: TransferFormat,
        lang: Language,
        filter: &ExportFilter,
    ) -> Result<Vec<u8>, ClientError> {
        let mut pairs = vec![
            ("format".to_owned(), format.as_str().to_owned()),
            ("lang".to_owned(), lang.wire_code().to_owned()),
        ];
        if let Some(category_id) = filter.category_id {
            pairs.push(("category_id".to_owned(), category_id.to_string()));
        }
        if let Some(status) = filter.status {
            pairs.push(("status".to_owned(), status.as_str().to_owned()));
        }
        self.http
            .get_bytes(Service::ImportExport, "/export", &pairs, Auth::Required)
            .await
    }

    /// Upload a bulk document and start an import job.
    ///
    /// Imports run in tolerant mode: valid rows are applied and invalid rows
    /// are reported back on the job rather than failing the whole upload.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures, including the 400 for an unsupported format.
    pub async fn import(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        format: TransferFormat,
    ) -> Result<ImportStarted, ClientError> {
        let file_name = file_name.to_owned();
        let make_form = move || {
            Ok(Form::new()
                .part(
                    "file",
                    Part::bytes(contents.clone()).file_name(file_name.clone()),
                )
                .text("format", format.as_str())
                .text("mode", "tolerant"))
        };
        self.http
            .post_multipart(Service::ImportExport, "/import", make_form, Auth::Required)
            .await
    }

    /// Poll an import job for progress and per-row errors.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport, authentication, and server
    /// failures, including the 404 for an unknown job.
    pub async fn import_status(&self, job_id: &str) -> Result<ImportJob, ClientError> {
        self.http
            .get_json(
                Service::ImportExport,
                &format!("/import/{job_id}"),
                &[],
                Auth::Required,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    //! Format inference coverage.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::json(Path::new("terms.json"), TransferFormat::Json)]
    #[case::csv(Path::new("terms.csv"), TransferFormat::Csv)]
    #[case::unknown(Path::new("terms.xlsx"), TransferFormat::Csv)]
    #[case::bare(Path::new("terms"), TransferFormat::Csv)]
    fn infers_format_from_extension(#[case] path: &Path, #[case] expected: TransferFormat) {
        assert_eq!(TransferFormat::from_path(path), expected);
    }
}
