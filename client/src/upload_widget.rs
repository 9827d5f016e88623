use crate::api_client::{ApiError, QaBackend};
use crate::models::{PdfFile, UploadResult};

pub const INVALID_FILE_MESSAGE: &str = "Please upload a PDF file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Accepts a single PDF through the file picker or a drop and hands it to
/// the backend.
#[derive(Debug, Default)]
pub struct UploadWidget {
    drag_state: DragState,
    progress: u8,
    error: Option<String>,
    in_flight: bool,
}

impl UploadWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_over(&mut self) {
        self.drag_state = DragState::Dragging;
    }

    pub fn drag_leave(&mut self) {
        self.drag_state = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_state == DragState::Dragging
    }

    /// 0 until a request completes, 100 once it succeeds.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight
    }

    /// Validates a candidate from the file picker. Returns the file when a
    /// request should be issued for it.
    pub fn begin_upload(&mut self, file: Option<PdfFile>) -> Option<PdfFile> {
        if self.in_flight {
            log::debug!("Upload already in flight, ignoring new file");
            return None;
        }

        self.error = None;

        let file = match file {
            Some(file) if file.is_pdf() => file,
            other => {
                if let Some(file) = other {
                    log::info!("Rejected {} ({})", file.file_name, file.mime_type);
                }
                self.error = Some(INVALID_FILE_MESSAGE.to_string());
                return None;
            }
        };

        self.progress = 0;
        self.in_flight = true;
        Some(file)
    }

    /// Same as [`begin_upload`](Self::begin_upload) for a dropped file; a
    /// drop always ends the drag.
    pub fn begin_drop(&mut self, file: Option<PdfFile>) -> Option<PdfFile> {
        self.drag_state = DragState::Idle;
        self.begin_upload(file)
    }

    /// Settles the in-flight request. The result is returned on success so the
    /// caller can notify its parent.
    pub fn finish_upload(
        &mut self,
        result: Result<UploadResult, ApiError>,
    ) -> Option<UploadResult> {
        if !self.in_flight {
            log::warn!("Upload result arrived with no upload in flight");
            return None;
        }
        self.in_flight = false;

        match result {
            Ok(result) => {
                self.progress = 100;
                Some(result)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub async fn select_file<B>(&mut self, backend: &B, file: Option<PdfFile>) -> Option<UploadResult>
    where
        B: QaBackend + ?Sized,
    {
        let file = self.begin_upload(file)?;
        let result = backend.upload_pdf(&file).await;
        self.finish_upload(result)
    }

    pub async fn drop_file<B>(&mut self, backend: &B, file: Option<PdfFile>) -> Option<UploadResult>
    where
        B: QaBackend + ?Sized,
    {
        let file = self.begin_drop(file)?;
        let result = backend.upload_pdf(&file).await;
        self.finish_upload(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::MockQaBackend;
    use serde_json::json;

    fn pdf() -> PdfFile {
        PdfFile::new("test.pdf", "application/pdf", b"dummy content".to_vec())
    }

    fn text_file() -> PdfFile {
        PdfFile::new("test.txt", "text/plain", b"dummy content".to_vec())
    }

    #[tokio::test]
    async fn selecting_pdf_uploads_once_and_reports_success() {
        let mut backend = MockQaBackend::new();
        backend
            .expect_upload_pdf()
            .withf(|file| *file == pdf())
            .times(1)
            .returning(|_| Ok(UploadResult(json!({ "success": true }))));

        let mut widget = UploadWidget::new();
        let result = widget.select_file(&backend, Some(pdf())).await;

        assert_eq!(result, Some(UploadResult(json!({ "success": true }))));
        assert_eq!(widget.progress(), 100);
        assert!(widget.error().is_none());
        assert!(!widget.is_uploading());
    }

    #[tokio::test]
    async fn non_pdf_is_rejected_without_upload() {
        let mut backend = MockQaBackend::new();
        backend.expect_upload_pdf().never();

        let mut widget = UploadWidget::new();
        let result = widget.select_file(&backend, Some(text_file())).await;

        assert!(result.is_none());
        assert_eq!(widget.error(), Some(INVALID_FILE_MESSAGE));
    }

    #[tokio::test]
    async fn missing_file_is_rejected_without_upload() {
        let mut backend = MockQaBackend::new();
        backend.expect_upload_pdf().never();

        let mut widget = UploadWidget::new();
        assert!(widget.drop_file(&backend, None).await.is_none());
        assert_eq!(widget.error(), Some(INVALID_FILE_MESSAGE));
    }

    #[tokio::test]
    async fn upload_failure_shows_error_text() {
        let mut backend = MockQaBackend::new();
        backend
            .expect_upload_pdf()
            .times(1)
            .returning(|_| Err(ApiError::Upload("PDF upload failed".to_string())));

        let mut widget = UploadWidget::new();
        let result = widget.select_file(&backend, Some(pdf())).await;

        assert!(result.is_none());
        assert_eq!(widget.error(), Some("Error uploading PDF: PDF upload failed"));
        assert_eq!(widget.progress(), 0);
        assert!(!widget.is_uploading());
    }

    #[tokio::test]
    async fn drag_and_drop_cycle() {
        let mut backend = MockQaBackend::new();
        backend
            .expect_upload_pdf()
            .times(1)
            .returning(|_| Ok(UploadResult(json!({ "success": true }))));

        let mut widget = UploadWidget::new();
        widget.drag_over();
        assert!(widget.is_dragging());
        widget.drag_leave();
        assert!(!widget.is_dragging());

        widget.drag_over();
        let result = widget.drop_file(&backend, Some(pdf())).await;

        assert!(result.is_some());
        assert!(!widget.is_dragging());
    }

    #[test]
    fn new_candidate_clears_previous_error() {
        let mut widget = UploadWidget::new();
        assert!(widget.begin_upload(Some(text_file())).is_none());
        assert!(widget.error().is_some());

        assert!(widget.begin_upload(Some(pdf())).is_some());
        assert!(widget.error().is_none());
        assert!(widget.is_uploading());
    }

    #[test]
    fn second_upload_refused_while_in_flight() {
        let mut widget = UploadWidget::new();
        assert!(widget.begin_upload(Some(pdf())).is_some());
        assert!(widget.begin_drop(Some(pdf())).is_none());
        assert!(widget.error().is_none());

        let settled = widget.finish_upload(Ok(UploadResult(json!({ "success": true }))));
        assert!(settled.is_some());
        assert!(widget.begin_upload(Some(pdf())).is_some());
    }

    #[test]
    fn stray_result_is_ignored() {
        let mut widget = UploadWidget::new();
        assert!(widget
            .finish_upload(Ok(UploadResult(json!({ "success": true }))))
            .is_none());
        assert_eq!(widget.progress(), 0);
    }
}
