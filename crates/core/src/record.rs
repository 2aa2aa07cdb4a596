use serde::{Deserialize, Serialize};

/// Error string attached to a row whose title is missing. This is the only
/// validation rule enforced before records reach the store.
pub const TITLE_REQUIRED: &str = "title is required";

/// One showcased project/client entry managed through the admin panel.
///
/// Optional fields distinguish *absent* from *empty*: an empty CSV cell or
/// form field never produces `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRecord {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_date: Option<String>,
    pub order: i64,
    pub visible: bool,
}

impl PortfolioRecord {
    pub fn new(title: impl Into<String>) -> Self {
        PortfolioRecord {
            title: title.into(),
            ..Default::default()
        }
    }

    /// The single pre-insert validation rule: a record needs a non-blank title.
    pub fn validation_error(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            Some(TITLE_REQUIRED.to_string())
        } else {
            None
        }
    }
}

impl Default for PortfolioRecord {
    fn default() -> Self {
        PortfolioRecord {
            title: String::new(),
            description: None,
            client: None,
            category: None,
            image_url: None,
            project_link: None,
            project_date: None,
            order: 0,
            visible: true,
        }
    }
}

/// A parsed CSV row: the record plus the reason it was rejected, if any.
///
/// A row with `error == None` is insertable; a row with an error is shown to
/// the operator in the preview but never sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRow {
    pub record: PortfolioRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedRow {
    pub fn new(record: PortfolioRecord) -> Self {
        let error = record.validation_error();
        ParsedRow { record, error }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}
