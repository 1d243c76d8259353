//! Per-employee documents kept in the bucket: face photo, CV and resume.

use std::sync::Arc;

use bytes::Bytes;

use crate::storage::{ObjectStore, StorageError};

pub fn face_image_key(employee_id: &str) -> String {
    format!("photos/{employee_id}.jpg")
}

pub fn cv_key(employee_id: &str) -> String {
    format!("cv/{employee_id}_cv.pdf")
}

pub fn resume_key(employee_id: &str) -> String {
    format!("resume/{employee_id}_resume.pdf")
}

#[derive(Clone)]
pub struct EmployeeDocuments {
    store: Arc<dyn ObjectStore>,
}

impl EmployeeDocuments {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// JPEG bytes of the employee's photo, `None` if there is none.
    pub async fn face_image(&self, employee_id: &str) -> Result<Option<Bytes>, StorageError> {
        self.store.get(&face_image_key(employee_id)).await
    }

    pub async fn cv_exists(&self, employee_id: &str) -> Result<bool, StorageError> {
        self.store.exists(&cv_key(employee_id)).await
    }

    pub async fn resume_exists(&self, employee_id: &str) -> Result<bool, StorageError> {
        self.store.exists(&resume_key(employee_id)).await
    }
}
