//! Document filters for ranked search: `(id, status, rating) -> bool`.

use crate::{DocId, DocumentStatus};

/// Accepts documents with status [`DocumentStatus::Actual`].
pub fn actual() -> impl Fn(DocId, DocumentStatus, i32) -> bool + Copy {
    with_status(DocumentStatus::Actual)
}

pub fn with_status(wanted: DocumentStatus) -> impl Fn(DocId, DocumentStatus, i32) -> bool + Copy {
    move |_, status, _| status == wanted
}

pub fn any() -> impl Fn(DocId, DocumentStatus, i32) -> bool + Copy {
    |_, _, _| true
}
