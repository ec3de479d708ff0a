use crate::customer::{COLUMNS, CustomerData};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl FeatureValue {
    /// Numeric view of the value, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Text(_) => None,
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{}'", s),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A single-row table: named columns with raw values, in training order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<(&'static str, FeatureValue)>,
}

impl FeatureFrame {
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<&CustomerData> for FeatureFrame {
    fn from(c: &CustomerData) -> Self {
        use FeatureValue::{Float, Integer, Text};

        let values = [
            Text(c.gender.clone()),
            Text(c.senior_citizen.clone()),
            Text(c.partner.clone()),
            Text(c.dependents.clone()),
            Integer(c.tenure_months),
            Text(c.phone_service.clone()),
            Text(c.multiple_lines.clone()),
            Text(c.internet_service.clone()),
            Text(c.online_security.clone()),
            Text(c.online_backup.clone()),
            Text(c.device_protection.clone()),
            Text(c.tech_support.clone()),
            Text(c.streaming_tv.clone()),
            Text(c.streaming_movies.clone()),
            Text(c.contract.clone()),
            Text(c.paperless_billing.clone()),
            Text(c.payment_method.clone()),
            Float(c.monthly_charges),
            Float(c.total_charges),
        ];

        Self {
            columns: COLUMNS.into_iter().zip(values).collect(),
        }
    }
}
