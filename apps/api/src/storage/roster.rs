//! Employee roster and persona dumps: the full directory as one JSON array and
//! previously generated personas keyed by employee id.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::models::person::Person;
use crate::search::mapper::person_from_fields;
use crate::storage::{ObjectStore, StorageError};

#[derive(Debug, Clone)]
pub struct RosterKeys {
    pub employees: String,
    pub personas: String,
}

impl Default for RosterKeys {
    fn default() -> Self {
        Self {
            employees: "employees/employees.json".to_string(),
            personas: "personas/personas.json".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct EmployeeRoster {
    store: Arc<dyn ObjectStore>,
    keys: RosterKeys,
}

impl EmployeeRoster {
    pub fn new(store: Arc<dyn ObjectStore>, keys: RosterKeys) -> Self {
        Self { store, keys }
    }

    /// Every employee in the dump, in file order. Empty if the dump is missing.
    /// Entries that are not objects are skipped.
    pub async fn employees(&self) -> Result<Vec<Person>, StorageError> {
        let entries = match self.load(&self.keys.employees).await? {
            None => return Ok(Vec::new()),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(malformed(&self.keys.employees, "expected a JSON array")),
        };

        let total = entries.len();
        let people: Vec<Person> = entries
            .iter()
            .filter_map(|entry| entry.as_object().map(person_from_fields))
            .collect();
        if people.len() < total {
            warn!(
                "{}: skipped {} entries that are not objects",
                self.keys.employees,
                total - people.len()
            );
        }
        info!("Loaded {} employees from {}", people.len(), self.keys.employees);
        Ok(people)
    }

    /// Skill names of each employee's stored persona. Empty if the dump is missing.
    pub async fn persona_skills(&self) -> Result<HashMap<String, Vec<String>>, StorageError> {
        let personas = match self.load(&self.keys.personas).await? {
            None => return Ok(HashMap::new()),
            Some(Value::Object(personas)) => personas,
            Some(_) => return Err(malformed(&self.keys.personas, "expected a JSON object")),
        };

        Ok(personas
            .iter()
            .map(|(employee_id, persona)| (employee_id.clone(), skill_names(persona)))
            .collect())
    }

    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let Some(data) = self.store.get(key).await? else {
            warn!("Dump {key} not found");
            return Ok(None);
        };

        let value = serde_json::from_slice(&data).map_err(|e| malformed(key, &e.to_string()))?;
        Ok(Some(value))
    }
}

fn malformed(key: &str, message: &str) -> StorageError {
    StorageError::Malformed {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn skill_names(persona: &Value) -> Vec<String> {
    persona["skills"]
        .as_array()
        .map(|skills| {
            skills
                .iter()
                .filter_map(|skill| skill["name"].as_str())
                .filter(|name| !name.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
