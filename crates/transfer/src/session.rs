use fardaria_core::{ParsedRow, PortfolioRecord};

use crate::{parse_csv, TransferError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for a file.
    #[default]
    Upload,
    /// Rows parsed and awaiting operator review.
    Preview,
    /// Dismissed; parsed state discarded.
    Closed,
    /// Bulk insert confirmed and committed.
    Imported,
}

/// The import review flow: upload → preview → imported/closed.
///
/// Parsed rows are owned exclusively by the session and discarded wholesale
/// on any exit transition. One session per import; a terminal session is not
/// reused.
///
/// The store call itself lives with the caller: take the batch from
/// [`importable`](Self::importable), and call [`complete`](Self::complete)
/// only after the insert commits. On a store failure the session is still in
/// `Preview`, so the operator can retry or cancel.
#[derive(Debug, Default)]
pub struct ImportSession {
    state: SessionState,
    rows: Vec<ParsedRow>,
}

impl ImportSession {
    pub fn new() -> Self {
        ImportSession::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// All parsed rows, valid and rejected, in file order. Display ordinals
    /// are 1-based positions in this slice.
    pub fn rows(&self) -> &[ParsedRow] {
        &self.rows
    }

    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_valid()).count()
    }

    pub fn error_count(&self) -> usize {
        self.rows.len() - self.valid_count()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SessionState::Closed | SessionState::Imported)
    }

    /// Parse uploaded file content and move to the preview step.
    ///
    /// A structural error leaves the session in the upload step with no rows;
    /// the error is surfaced to the caller, never stored as a row.
    pub fn load(&mut self, content: &str) -> Result<usize, TransferError> {
        let rows = parse_csv(content)?;
        self.rows = rows;
        self.state = SessionState::Preview;
        Ok(self.rows.len())
    }

    /// Back out of the preview to pick a different file.
    pub fn back(&mut self) {
        if self.state == SessionState::Preview {
            self.rows.clear();
            self.state = SessionState::Upload;
        }
    }

    /// Dismiss the session from any live state.
    pub fn cancel(&mut self) {
        if !self.is_terminal() {
            self.rows.clear();
            self.state = SessionState::Closed;
        }
    }

    /// The confirm action is enabled only in preview with at least one
    /// error-free row.
    pub fn can_confirm(&self) -> bool {
        self.state == SessionState::Preview && self.valid_count() > 0
    }

    /// The bulk-insert batch: only error-free rows. Empty unless
    /// [`can_confirm`](Self::can_confirm) holds.
    pub fn importable(&self) -> Vec<PortfolioRecord> {
        if !self.can_confirm() {
            return Vec::new();
        }
        self.rows
            .iter()
            .filter(|r| r.is_valid())
            .map(|r| r.record.clone())
            .collect()
    }

    /// Mark the session imported after the store confirms the bulk insert.
    pub fn complete(&mut self) {
        if self.state == SessionState::Preview {
            self.rows.clear();
            self.state = SessionState::Imported;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "titulo,ordem\nCamisa Polo,1\n,2\nFato Macaco,3";

    #[test]
    fn starts_in_upload() {
        let session = ImportSession::new();
        assert_eq!(session.state(), SessionState::Upload);
        assert!(session.rows().is_empty());
        assert!(!session.can_confirm());
    }

    #[test]
    fn load_moves_to_preview_with_all_rows_visible() {
        let mut session = ImportSession::new();
        assert_eq!(session.load(GOOD).unwrap(), 3);
        assert_eq!(session.state(), SessionState::Preview);
        assert_eq!(session.valid_count(), 2);
        assert_eq!(session.error_count(), 1);
        // The rejected row stays in the preview with its reason.
        assert!(session.rows()[1].error.is_some());
    }

    #[test]
    fn structural_error_stays_in_upload() {
        let mut session = ImportSession::new();
        let result = session.load("descricao\nfoo");
        assert!(matches!(result, Err(TransferError::MissingColumn(_))));
        assert_eq!(session.state(), SessionState::Upload);
        assert!(session.rows().is_empty());
    }

    #[test]
    fn back_discards_rows() {
        let mut session = ImportSession::new();
        session.load(GOOD).unwrap();
        session.back();
        assert_eq!(session.state(), SessionState::Upload);
        assert!(session.rows().is_empty());
    }

    #[test]
    fn cancel_closes_from_any_live_state() {
        let mut session = ImportSession::new();
        session.cancel();
        assert_eq!(session.state(), SessionState::Closed);

        let mut session = ImportSession::new();
        session.load(GOOD).unwrap();
        session.cancel();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.rows().is_empty());
    }

    #[test]
    fn importable_excludes_rejected_rows() {
        let mut session = ImportSession::new();
        session.load(GOOD).unwrap();
        let batch = session.importable();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].title, "Camisa Polo");
        assert_eq!(batch[1].title, "Fato Macaco");
    }

    #[test]
    fn confirm_disabled_when_no_valid_rows() {
        let mut session = ImportSession::new();
        session.load("titulo,ordem\n,1\n,2").unwrap();
        assert_eq!(session.state(), SessionState::Preview);
        assert_eq!(session.valid_count(), 0);
        assert!(!session.can_confirm());
        assert!(session.importable().is_empty());
    }

    #[test]
    fn complete_is_terminal() {
        let mut session = ImportSession::new();
        session.load(GOOD).unwrap();
        session.complete();
        assert_eq!(session.state(), SessionState::Imported);
        assert!(session.is_terminal());
        assert!(session.rows().is_empty());
        // Terminal sessions ignore further transitions.
        session.cancel();
        assert_eq!(session.state(), SessionState::Imported);
    }

    #[test]
    fn store_failure_path_leaves_preview_intact() {
        let mut session = ImportSession::new();
        session.load(GOOD).unwrap();
        let _batch = session.importable();
        // Caller's insert failed: no complete() call. Operator can retry.
        assert_eq!(session.state(), SessionState::Preview);
        assert!(session.can_confirm());
    }
}
