use crate::error::{EngineError, ErrorClass};

/// A non-fatal problem met while processing a batch. The batch carried on
/// without the offending file (or with degraded reference data).
#[derive(Debug)]
pub struct Warning {
    pub file_name: Option<String>,
    pub error: EngineError,
}

impl Warning {
    pub fn for_file(file_name: &str, error: EngineError) -> Self {
        Self {
            file_name: Some(file_name.to_string()),
            error,
        }
    }

    pub fn general(error: EngineError) -> Self {
        Self {
            file_name: None,
            error,
        }
    }

    pub fn class(&self) -> ErrorClass {
        self.error.class()
    }

    pub fn message(&self) -> String {
        match &self.file_name {
            Some(name) => format!("{}: {}", name, self.error),
            None => self.error.to_string(),
        }
    }
}

/// Successfully produced value together with the warnings collected on the way.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn into_parts(self) -> (T, Vec<Warning>) {
        (self.value, self.warnings)
    }
}

pub fn count_by_class(warnings: &[Warning], class: ErrorClass) -> usize {
    warnings
        .iter()
        .filter(|warning| warning.class() == class)
        .count()
}
