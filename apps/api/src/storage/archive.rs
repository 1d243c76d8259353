//! Review archive — line-delimited JSON dumps of every review, one record per line.
//!
//! Lookups scan the dump and return the first record for the employee.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::review::{HalfYearReview, MonthlyReview};
use crate::search::mapper::{
    employee_id_of, half_year_review_from_fields, monthly_review_from_fields, FieldMap,
};
use crate::storage::{ObjectStore, StorageError};

/// Object keys of the two review dumps.
#[derive(Debug, Clone)]
pub struct ArchiveKeys {
    pub half_year: String,
    pub monthly: String,
}

impl Default for ArchiveKeys {
    fn default() -> Self {
        Self {
            half_year: "reviews/half_year_review.jsonl".to_string(),
            monthly: "reviews/monthly_review.jsonl".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ReviewArchive {
    store: Arc<dyn ObjectStore>,
    keys: ArchiveKeys,
}

impl ReviewArchive {
    pub fn new(store: Arc<dyn ObjectStore>, keys: ArchiveKeys) -> Self {
        Self { store, keys }
    }

    /// Empty record if the dump is missing or has no line for the employee.
    pub async fn half_year_review(&self, employee_id: &str) -> Result<HalfYearReview, StorageError> {
        let fields = self.find(&self.keys.half_year, employee_id).await?;
        Ok(fields
            .map(|f| half_year_review_from_fields(&f))
            .unwrap_or_default())
    }

    pub async fn monthly_review(&self, employee_id: &str) -> Result<MonthlyReview, StorageError> {
        let fields = self.find(&self.keys.monthly, employee_id).await?;
        Ok(fields
            .map(|f| monthly_review_from_fields(&f))
            .unwrap_or_default())
    }

    async fn find(&self, key: &str, employee_id: &str) -> Result<Option<FieldMap>, StorageError> {
        let Some(data) = self.store.get(key).await? else {
            warn!("Review dump {key} not found");
            return Ok(None);
        };
        Ok(first_record_for(&data, employee_id, key))
    }
}

/// Scans `data` line by line for the first object whose `employee_id` is `employee_id`.
/// Blank and malformed lines are skipped.
fn first_record_for(data: &[u8], employee_id: &str, source: &str) -> Option<FieldMap> {
    for (line_no, line) in data.split(|b| *b == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let fields = match serde_json::from_slice::<Value>(line) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                warn!("{source}:{}: not a JSON object, skipping", line_no + 1);
                continue;
            }
            Err(e) => {
                warn!("{source}:{}: {e}, skipping", line_no + 1);
                continue;
            }
        };

        if employee_id_of(&fields).as_deref() == Some(employee_id) {
            debug!("Found review for {employee_id} at {source}:{}", line_no + 1);
            return Some(fields);
        }
    }
    None
}
