//! Request schema for a single customer.

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names in the order the pipeline was trained on.
pub const COLUMNS: [&str; 19] = [
    "Gender",
    "Senior_Citizen",
    "Partner",
    "Dependents",
    "Tenure_Months",
    "Phone_Service",
    "Multiple_Lines",
    "Internet_Service",
    "Online_Security",
    "Online_Backup",
    "Device_Protection",
    "Tech_Support",
    "Streaming_TV",
    "Streaming_Movies",
    "Contract",
    "Paperless_Billing",
    "Payment_Method",
    "Monthly_Charges",
    "Total_Charges",
];

/// One customer's attributes. Every field is required.
///
/// Numeric fields also accept numeric strings (`"29.85"`), and the integer
/// field accepts floats without a fractional part (`1.0`).
///
/// `Senior_Citizen` is a string ("Yes"/"No"), not an integer: the pipeline
/// was trained with it as a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerData {
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Senior_Citizen")]
    pub senior_citizen: String,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    #[serde(rename = "Tenure_Months", deserialize_with = "lax_integer")]
    pub tenure_months: i64,
    #[serde(rename = "Phone_Service")]
    pub phone_service: String,
    #[serde(rename = "Multiple_Lines")]
    pub multiple_lines: String,
    #[serde(rename = "Internet_Service")]
    pub internet_service: String,
    #[serde(rename = "Online_Security")]
    pub online_security: String,
    #[serde(rename = "Online_Backup")]
    pub online_backup: String,
    #[serde(rename = "Device_Protection")]
    pub device_protection: String,
    #[serde(rename = "Tech_Support")]
    pub tech_support: String,
    #[serde(rename = "Streaming_TV")]
    pub streaming_tv: String,
    #[serde(rename = "Streaming_Movies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "Paperless_Billing")]
    pub paperless_billing: String,
    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
    #[serde(rename = "Monthly_Charges", deserialize_with = "lax_float")]
    pub monthly_charges: f64,
    #[serde(rename = "Total_Charges", deserialize_with = "lax_float")]
    pub total_charges: f64,
}

impl CustomerData {
    /// The documented example customer.
    pub fn example() -> Self {
        Self {
            gender: "Female".to_string(),
            senior_citizen: "No".to_string(),
            partner: "Yes".to_string(),
            dependents: "No".to_string(),
            tenure_months: 1,
            phone_service: "No".to_string(),
            multiple_lines: "Phone_service".to_string(),
            internet_service: "DSL".to_string(),
            online_security: "No".to_string(),
            online_backup: "Yes".to_string(),
            device_protection: "No".to_string(),
            tech_support: "No".to_string(),
            streaming_tv: "No".to_string(),
            streaming_movies: "No".to_string(),
            contract: "Month-to-month".to_string(),
            paperless_billing: "Yes".to_string(),
            payment_method: "Electronic_check".to_string(),
            monthly_charges: 29.85,
            total_charges: 29.85,
        }
    }
}

struct IntegerVisitor;

impl Visitor<'_> for IntegerVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        whole_number(v).ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let trimmed = v.trim();
        trimmed
            .parse::<i64>()
            .ok()
            .or_else(|| trimmed.parse::<f64>().ok().and_then(whole_number))
            .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}

fn whole_number(v: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

struct FloatVisitor;

impl Visitor<'_> for FloatVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a string containing a finite number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}

fn lax_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(IntegerVisitor)
}

fn lax_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(FloatVisitor)
}
