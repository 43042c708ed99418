//! Billing page controller
//!
//! The usage summary is fetched once per visit. Opening a dimension creates a
//! [`DetailState`] that fetches its own date-filtered breakdown, independent
//! of the summary.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use super::{Flow, Phase};
use crate::api::{ApiClient, HttpTransport, UsagePeriod, UsageRecord};
use crate::error::ApiResult;

const SUMMARY_FAILED: &str = "Failed to fetch usage data";
const DETAIL_FAILED: &str = "Failed to fetch detailed usage data";

/// Date format of range inputs
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default)]
pub struct BillingState {
    pub phase: Phase,
    pub summary: Option<UsagePeriod>,
    /// Open detail view, if any
    pub detail: Option<DetailState>,
}

impl BillingState {
    pub fn begin(&mut self) {
        self.phase = Phase::Loading;
    }

    pub fn finish(&mut self, result: ApiResult<UsagePeriod>) -> Flow {
        match result {
            Ok(period) => {
                self.summary = Some(period);
                self.phase = Phase::Idle;
                Flow::Stay
            }
            Err(e) => self.phase.fail(&e, SUMMARY_FAILED),
        }
    }

    pub async fn load<T: HttpTransport>(&mut self, client: &ApiClient<T>) -> Flow {
        self.begin();
        let result = client.usage().await;
        self.finish(result)
    }

    /// Records of the loaded summary
    pub fn records(&self) -> &[UsageRecord] {
        self.summary.as_ref().map(|s| s.usage.as_slice()).unwrap_or(&[])
    }

    /// Open the detail view for `dimension`, initially covering the summary
    /// period. The caller then loads it.
    pub fn open_detail(&mut self, dimension: &str, today: NaiveDate) -> &mut DetailState {
        let range = match &self.summary {
            Some(period) => DateRange::of_period(period, today),
            None => DateRange::month_to_date(today),
        };
        self.detail.insert(DetailState::new(dimension, range))
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }
}

// ============================================
// DETAIL VIEW
// ============================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("End date {end} is before start date {start}")]
    Reversed { start: NaiveDate, end: NaiveDate },
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse two `YYYY-MM-DD` inputs
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// From the first of the month through `today`
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: today.with_day(1).unwrap_or(today),
            end: today,
        }
    }

    /// Days covered by a billing period; missing bounds fall back to
    /// month-to-date
    pub fn of_period(period: &UsagePeriod, today: NaiveDate) -> Self {
        let fallback = Self::month_to_date(today);
        let start = period
            .start_time
            .map(|t| t.date_naive())
            .unwrap_or(fallback.start);
        let end = period
            .end_time
            .map(|t| t.date_naive())
            .unwrap_or(fallback.end);

        Self::new(start, end).unwrap_or(fallback)
    }

    /// Timestamps sent to the backend: start of the first day through the
    /// last second of the last day
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.start.and_time(NaiveTime::MIN).and_utc();
        let end = self.end.and_time(NaiveTime::MIN).and_utc() + Duration::seconds(86_399);
        (start, end)
    }

    pub fn start_input(&self) -> String {
        self.start.format(DATE_INPUT_FORMAT).to_string()
    }

    pub fn end_input(&self) -> String {
        self.end.format(DATE_INPUT_FORMAT).to_string()
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(input.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| RangeError::InvalidDate(input.to_string()))
}

/// Usage of one dimension over a chosen range
#[derive(Debug, Clone, PartialEq)]
pub struct DetailState {
    pub dimension: String,
    pub range: DateRange,
    pub phase: Phase,
    /// Records of this dimension, ordered by start time
    pub records: Vec<UsageRecord>,
}

impl DetailState {
    pub fn new(dimension: &str, range: DateRange) -> Self {
        Self {
            dimension: dimension.to_string(),
            range,
            phase: Phase::Idle,
            records: Vec::new(),
        }
    }

    pub fn kind(&self) -> DimensionKind {
        DimensionKind::classify(&self.dimension)
    }

    /// Start a fetch; returns the bounds to request
    pub fn begin(&mut self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.phase = Phase::Loading;
        self.records.clear();
        self.range.bounds()
    }

    pub fn finish(&mut self, result: ApiResult<UsagePeriod>) -> Flow {
        match result {
            Ok(period) => {
                self.records = records_for_dimension(period.usage, &self.dimension);
                self.phase = Phase::Idle;
                Flow::Stay
            }
            Err(e) => self.phase.fail(&e, DETAIL_FAILED),
        }
    }

    pub async fn load<T: HttpTransport>(&mut self, client: &ApiClient<T>) -> Flow {
        let (start, end) = self.begin();
        let result = client.usage_range(start, end).await;
        self.finish(result)
    }

    /// Apply a new range and refetch
    pub async fn apply_range<T: HttpTransport>(
        &mut self,
        client: &ApiClient<T>,
        range: DateRange,
    ) -> Flow {
        self.range = range;
        self.load(client).await
    }

    pub fn chart_points(&self) -> Vec<ChartPoint> {
        chart_points(&self.records)
    }
}

/// Records matching `dimension` exactly, ordered by start time
pub fn records_for_dimension(records: Vec<UsageRecord>, dimension: &str) -> Vec<UsageRecord> {
    let mut matching: Vec<UsageRecord> = records
        .into_iter()
        .filter(|r| r.dimension == dimension)
        .collect();
    matching.sort_by_key(|r| r.start_time);
    matching
}

// ============================================
// PRESENTATION
// ============================================

/// Category of a billing dimension, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    Storage,
    Compute,
    Memory,
    Resource,
}

impl DimensionKind {
    pub fn classify(dimension: &str) -> Self {
        if dimension.contains("Storage") {
            DimensionKind::Storage
        } else if dimension.contains("CPU") {
            DimensionKind::Compute
        } else if dimension.contains("Memory") {
            DimensionKind::Memory
        } else {
            DimensionKind::Resource
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DimensionKind::Storage => "Storage",
            DimensionKind::Compute => "Compute",
            DimensionKind::Memory => "Memory",
            DimensionKind::Resource => "Resource",
        }
    }

    /// Accent colour as a CSS hex string
    pub fn color(&self) -> &'static str {
        match self {
            DimensionKind::Storage => "#0A84FF",
            DimensionKind::Compute => "#FF9500",
            DimensionKind::Memory => "#5856D6",
            DimensionKind::Resource => "#999999",
        }
    }
}

/// One bar of the detail chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Day label, e.g. `Jul 3`
    pub label: String,
    pub value: f64,
}

pub fn chart_points(records: &[UsageRecord]) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|r| ChartPoint {
            label: r
                .start_time
                .map(|t| t.format("%b %-d").to_string())
                .unwrap_or_default(),
            value: r.total,
        })
        .collect()
}

/// Format a total with thousands separators and at most three decimals
pub fn format_total(total: f64) -> String {
    let rounded = format!("{:.3}", total.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if total < 0.0 && rounded.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::{ok, signed_in_client, status};
    use crate::api::transport::{HttpRequest, MockHttpTransport};
    use crate::auth::Route;
    use chrono::TimeZone;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = DateRange::parse("2024-07-01", "2024-07-31").unwrap();
        let (start, end) = range.bounds();

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 7, 31, 23, 59, 59).unwrap());
        assert_eq!(range.start_input(), "2024-07-01");
    }

    #[test]
    fn test_range_validation() {
        assert_eq!(
            DateRange::parse("07/01/2024", "2024-07-31"),
            Err(RangeError::InvalidDate("07/01/2024".to_string()))
        );
        assert!(matches!(
            DateRange::parse("2024-07-31", "2024-07-01"),
            Err(RangeError::Reversed { .. })
        ));
        // A single day is a valid range
        assert!(DateRange::parse("2024-07-01", "2024-07-01").is_ok());
    }

    #[test]
    fn test_range_of_period_falls_back_to_month_to_date() {
        let today = date(2024, 8, 15);
        let range = DateRange::of_period(&UsagePeriod::default(), today);

        assert_eq!(range.start, date(2024, 8, 1));
        assert_eq!(range.end, today);
    }

    #[test]
    fn test_dimension_kind() {
        assert_eq!(DimensionKind::classify("Storage GiB hours"), DimensionKind::Storage);
        assert_eq!(DimensionKind::classify("CPU core hours"), DimensionKind::Compute);
        assert_eq!(DimensionKind::classify("Memory GiB hours"), DimensionKind::Memory);
        assert_eq!(DimensionKind::classify("Replica hours"), DimensionKind::Resource);
        assert_eq!(DimensionKind::Compute.label(), "Compute");
        assert_eq!(DimensionKind::Storage.color(), "#0A84FF");
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(0.0), "0");
        assert_eq!(format_total(12.0), "12");
        assert_eq!(format_total(1234567.891), "1,234,567.891");
        assert_eq!(format_total(999.5), "999.5");
        assert_eq!(format_total(-1500.25), "-1,500.25");
    }

    #[tokio::test]
    async fn test_summary_load() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req: &HttpRequest| req.url == "http://api.test/billing/usage")
            .returning(|_| {
                ok(json!({ "usage": {
                    "usage": [{ "dimension": "CPU core hours", "total": 40 }],
                    "startTime": "2024-07-01T00:00:00Z",
                    "endTime": "2024-07-31T23:59:59Z"
                }}))
            });

        let client = signed_in_client(mock);
        let mut state = BillingState::default();

        assert_eq!(state.load(&client).await, Flow::Stay);
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.records()[0].total, 40.0);

        let detail = state.open_detail("CPU core hours", date(2024, 8, 15));
        assert_eq!(detail.range, DateRange::parse("2024-07-01", "2024-07-31").unwrap());
        assert_eq!(detail.kind(), DimensionKind::Compute);
    }

    #[tokio::test]
    async fn test_summary_error_banner() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| status(500, json!({})));

        let client = signed_in_client(mock);
        let mut state = BillingState::default();

        assert_eq!(state.load(&client).await, Flow::Stay);
        assert_eq!(state.phase.error(), Some("Failed to fetch usage data"));
    }

    #[tokio::test]
    async fn test_detail_filters_and_sorts() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req: &HttpRequest| {
                req.url
                    == "http://api.test/billing/usage/range/2024-07-01T00%3A00%3A00Z/2024-07-03T23%3A59%3A59Z"
            })
            .returning(|_| {
                ok(json!({ "usage": { "usage": [
                    { "dimension": "Storage GiB hours", "total": 3, "startTime": "2024-07-03T00:00:00Z" },
                    { "dimension": "CPU core hours", "total": 9, "startTime": "2024-07-01T00:00:00Z" },
                    { "dimension": "Storage GiB hours", "total": 1, "startTime": "2024-07-01T00:00:00Z" },
                    { "dimension": "Storage GiB hours", "total": 2, "startTime": "2024-07-02T00:00:00Z" }
                ]}}))
            });

        let client = signed_in_client(mock);
        let range = DateRange::parse("2024-07-01", "2024-07-03").unwrap();
        let mut detail = DetailState::new("Storage GiB hours", range);

        assert_eq!(detail.load(&client).await, Flow::Stay);

        let totals: Vec<f64> = detail.records.iter().map(|r| r.total).collect();
        assert_eq!(totals, vec![1.0, 2.0, 3.0]);

        let labels: Vec<String> = detail.chart_points().into_iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["Jul 1", "Jul 2", "Jul 3"]);
    }

    #[tokio::test]
    async fn test_detail_unauthorized_redirects() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| status(401, json!({})));

        let client = signed_in_client(mock);
        let mut detail = DetailState::new(
            "CPU core hours",
            DateRange::month_to_date(date(2024, 7, 10)),
        );

        assert_eq!(detail.load(&client).await, Flow::Redirect(Route::SignIn));
        assert_eq!(detail.phase.error(), Some("Failed to fetch detailed usage data"));
        assert!(client.session().token().is_none());
    }
}
