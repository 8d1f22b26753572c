use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde_json::Value;

use crate::core::{Record, number_field, text_field};
use crate::error::{DashError, DashResult};
use crate::widgets::{PieChartConfig, PieDatum};

pub const COUNTRY_FIELD: &str = "Country";
pub const SORT_FIELD: &str = "TotalConfirmed";

/// Validated summary payload: per-country records, the global aggregate and
/// the report date.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPayload {
    pub countries: Vec<Record>,
    pub global: Record,
    pub date: String,
}

impl SummaryPayload {
    /// Checks the top-level shape of a summary body.
    ///
    /// `Countries` may be an array of records or an object keyed by country
    /// name; keyed records without a `Country` field get the key as one.
    pub fn from_value(value: Value) -> DashResult<Self> {
        let Value::Object(mut body) = value else {
            return Err(DashError::InvalidPayload("summary body must be an object".to_owned()));
        };

        let countries = match body.remove("Countries") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| into_record(item, "Countries entry"))
                .collect::<DashResult<Vec<_>>>()?,
            Some(Value::Object(by_name)) => by_name
                .into_iter()
                .map(|(name, item)| {
                    let mut record = into_record(item, "Countries entry")?;
                    if !record.contains_key(COUNTRY_FIELD) {
                        record.insert(COUNTRY_FIELD.to_owned(), Value::String(name));
                    }
                    Ok(record)
                })
                .collect::<DashResult<Vec<_>>>()?,
            Some(_) => {
                return Err(DashError::InvalidPayload(
                    "`Countries` must be an array or an object".to_owned(),
                ));
            }
            None => return Err(DashError::InvalidPayload("missing `Countries`".to_owned())),
        };

        let global = match body.remove("Global") {
            Some(item @ Value::Object(_)) => into_record(item, "Global")?,
            Some(_) => {
                return Err(DashError::InvalidPayload(
                    "`Global` must be an object".to_owned(),
                ));
            }
            None => return Err(DashError::InvalidPayload("missing `Global`".to_owned())),
        };

        let date = match body.remove("Date") {
            Some(Value::String(date)) if !date.trim().is_empty() => date,
            _ => return Err(DashError::InvalidPayload("missing `Date`".to_owned())),
        };

        Ok(Self {
            countries,
            global,
            date,
        })
    }

    pub fn from_json_str(input: &str) -> DashResult<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| DashError::InvalidPayload(format!("failed to parse summary json: {e}")))?;
        Self::from_value(value)
    }

    /// Sorts countries by confirmed cases, largest first. Ties keep their
    /// source order; records without a count sort last.
    pub fn sort_countries_by_confirmed(&mut self) {
        self.countries.sort_by_key(|record| {
            std::cmp::Reverse(OrderedFloat(
                number_field(record, SORT_FIELD).unwrap_or(f64::NEG_INFINITY),
            ))
        });
    }

    #[must_use]
    pub fn country(&self, name: &str) -> Option<&Record> {
        self.countries
            .iter()
            .find(|record| text_field(record, COUNTRY_FIELD) == Some(name))
    }

    /// Report timestamp, when the `Date` field is RFC 3339.
    #[must_use]
    pub fn report_date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }
}

fn into_record(value: Value, what: &str) -> DashResult<Record> {
    serde_json::from_value(value)
        .map_err(|e| DashError::InvalidPayload(format!("{what} must be an object: {e}")))
}

/// One slice per configured category, valued from `record`; missing or
/// non-numeric fields count as zero.
#[must_use]
pub fn pie_data_for(record: &Record, chart: &PieChartConfig) -> Vec<PieDatum> {
    chart
        .category_labels
        .iter()
        .map(|(field, label)| {
            PieDatum::new(label.clone(), number_field(record, field).unwrap_or(0.0))
        })
        .collect()
}
