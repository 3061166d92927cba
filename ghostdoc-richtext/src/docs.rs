//! Request model for the document service's batch update call.
//!
//! Requests serialize to the service's JSON shape, e.g.
//! `{"updateTextStyle": {"range": {...}, "textStyle": {...}, "fields": "bold"}}`.

use serde::{Deserialize, Serialize};

use crate::types::{StyleOperation, TextStyle};

/// One entry of a batch update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocsRequest {
    InsertText(InsertText),
    UpdateTextStyle(UpdateTextStyle),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertText {
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyle {
    pub range: Range,
    pub text_style: TextStyle,
    /// Update mask; only these attributes are written.
    pub fields: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
}

/// Request body of a batch update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdate {
    pub requests: Vec<DocsRequest>,
}

impl BatchUpdate {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }
}

impl FromIterator<DocsRequest> for BatchUpdate {
    fn from_iter<I: IntoIterator<Item = DocsRequest>>(iter: I) -> Self {
        BatchUpdate {
            requests: iter.into_iter().collect(),
        }
    }
}

/// Insert `text` at `index` of the destination document.
pub fn insert_text(index: usize, text: impl Into<String>) -> DocsRequest {
    DocsRequest::InsertText(InsertText {
        location: Location { index },
        text: text.into(),
    })
}

impl From<&StyleOperation> for DocsRequest {
    fn from(op: &StyleOperation) -> Self {
        DocsRequest::UpdateTextStyle(UpdateTextStyle {
            range: Range {
                start_index: op.absolute_start,
                end_index: op.absolute_end,
            },
            fields: op.attributes.fields(),
            text_style: op.attributes.clone(),
        })
    }
}
