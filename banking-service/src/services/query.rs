//! Collection query pipeline shared by every list endpoint.
//!
//! A request's query string is parsed once into a [`CollectionQuery`], which is
//! then a pure function from an entity list to one page of results:
//!
//! 1. exact-match filters (`accountId`, `transactionType`, `status`, ...)
//! 2. inclusive date range on the entity's date (`startDate`, `endDate`)
//! 3. inclusive range on the absolute amount (`minAmount`, `maxAmount`)
//! 4. newest-first ordering, for collections with a natural date order
//! 5. pagination (`page`, `limit`)
//!
//! All filters are conjunctive, so their order never changes the result set.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use service_core::error::AppError;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 1000;

static DATE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Query-facing view of an entity.
pub trait Filterable {
    /// Value of an exact-match attribute, by its query parameter name.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Date tested by `startDate` / `endDate`.
    fn event_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Absolute amount tested by `minAmount` / `maxAmount`.
    fn magnitude(&self) -> Option<f64> {
        None
    }

    /// Timestamp used for newest-first ordering.
    fn sort_key(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Parameters a collection endpoint accepts beyond `page` and `limit`.
#[derive(Debug, Clone, Copy)]
pub struct QuerySpec {
    pub exact: &'static [&'static str],
    pub date_range: bool,
    pub amount_range: bool,
    pub newest_first: bool,
}

impl QuerySpec {
    pub const fn exact(exact: &'static [&'static str]) -> Self {
        Self {
            exact,
            date_range: false,
            amount_range: false,
            newest_first: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let page = match param(params, "page") {
            None => DEFAULT_PAGE,
            Some(raw) => raw.parse::<u32>().ok().filter(|page| *page >= 1).ok_or_else(|| {
                AppError::invalid_parameter(format!(
                    "Invalid page '{raw}': must be an integer greater than or equal to 1"
                ))
            })?,
        };

        let limit = match param(params, "limit") {
            None => DEFAULT_LIMIT,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|limit| (1..=MAX_LIMIT).contains(limit))
                .ok_or_else(|| {
                    AppError::invalid_parameter(format!(
                        "Invalid limit '{raw}': must be an integer between 1 and {MAX_LIMIT}"
                    ))
                })?,
        };

        Ok(Self { page, limit })
    }

    fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub total_records: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Slice one page out of `items`. Pages past the end are empty, not errors.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_records = items.len() as u64;
    let total_pages = total_records.div_ceil(u64::from(request.limit));
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);

    let items = items
        .into_iter()
        .skip(offset)
        .take(request.limit as usize)
        .collect();

    Page {
        items,
        pagination: Pagination {
            page: request.page,
            limit: request.limit,
            total_pages,
            total_records,
        },
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| start <= date) && self.end.map_or(true, |end| date <= end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmountRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AmountRange {
    pub fn contains(&self, magnitude: f64) -> bool {
        self.min.map_or(true, |min| min <= magnitude) && self.max.map_or(true, |max| magnitude <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionQuery {
    pub page: PageRequest,
    pub exact: Vec<(&'static str, String)>,
    pub dates: DateRange,
    pub amounts: AmountRange,
    pub newest_first: bool,
}

impl CollectionQuery {
    /// Parse and validate the query string of a collection request.
    ///
    /// Parameters not named in `spec` are ignored; empty values count as
    /// absent.
    pub fn parse(params: &HashMap<String, String>, spec: &QuerySpec) -> Result<Self, AppError> {
        let page = PageRequest::parse(params)?;

        let exact = spec
            .exact
            .iter()
            .filter_map(|name| param(params, name).map(|value| (*name, value.to_string())))
            .collect();

        let dates = if spec.date_range {
            let dates = DateRange {
                start: parse_date(params, "startDate")?,
                end: parse_date(params, "endDate")?,
            };
            if let (Some(start), Some(end)) = (dates.start, dates.end) {
                if start > end {
                    return Err(AppError::invalid_parameter(
                        "startDate must not be after endDate",
                    ));
                }
            }
            dates
        } else {
            DateRange::default()
        };

        let amounts = if spec.amount_range {
            let amounts = AmountRange {
                min: parse_amount(params, "minAmount")?,
                max: parse_amount(params, "maxAmount")?,
            };
            if let (Some(min), Some(max)) = (amounts.min, amounts.max) {
                if min > max {
                    return Err(AppError::invalid_parameter(
                        "minAmount must not be greater than maxAmount",
                    ));
                }
            }
            amounts
        } else {
            AmountRange::default()
        };

        Ok(Self {
            page,
            exact,
            dates,
            amounts,
            newest_first: spec.newest_first,
        })
    }

    /// Whether `item` passes every filter of this query.
    pub fn matches<T: Filterable>(&self, item: &T) -> bool {
        let exact = self
            .exact
            .iter()
            .all(|(name, expected)| item.attribute(name) == Some(expected.as_str()));
        if !exact {
            return false;
        }

        if !self.dates.is_unbounded()
            && !item.event_date().is_some_and(|date| self.dates.contains(date))
        {
            return false;
        }

        self.amounts.is_unbounded()
            || item
                .magnitude()
                .is_some_and(|magnitude| self.amounts.contains(magnitude))
    }

    /// Filter, order and paginate `items`.
    pub fn execute<T: Filterable>(&self, items: impl IntoIterator<Item = T>) -> Page<T> {
        let mut matching: Vec<T> = items.into_iter().filter(|item| self.matches(item)).collect();

        if self.newest_first {
            // Stable, so equal timestamps keep their store order.
            matching.sort_by(|a, b| newest_first(a.sort_key(), b.sort_key()));
        }

        paginate(matching, self.page)
    }
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Parse a strict `YYYY-MM-DD` date parameter.
pub fn parse_date(params: &HashMap<String, String>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    let Some(raw) = param(params, name) else {
        return Ok(None);
    };

    parse_iso_date(raw).map(Some).ok_or_else(|| {
        AppError::invalid_parameter(format!(
            "Invalid {name} '{raw}': expected a calendar date in format YYYY-MM-DD"
        ))
    })
}

/// Strict `YYYY-MM-DD`; `None` for other layouts and impossible dates.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    if !DATE_FORMAT.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn parse_amount(params: &HashMap<String, String>, name: &str) -> Result<Option<f64>, AppError> {
    let Some(raw) = param(params, name) else {
        return Ok(None);
    };

    raw.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .map(Some)
        .ok_or_else(|| {
            AppError::invalid_parameter(format!(
                "Invalid {name} '{raw}': must be a non-negative number"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        account: String,
        kind: String,
        at: DateTime<Utc>,
        amount: f64,
    }

    impl Filterable for Row {
        fn attribute(&self, name: &str) -> Option<&str> {
            match name {
                "accountId" => Some(&self.account),
                "transactionType" => Some(&self.kind),
                _ => None,
            }
        }

        fn event_date(&self) -> Option<NaiveDate> {
            Some(self.at.date_naive())
        }

        fn magnitude(&self) -> Option<f64> {
            Some(self.amount.abs())
        }

        fn sort_key(&self) -> Option<DateTime<Utc>> {
            Some(self.at)
        }
    }

    const SPEC: QuerySpec = QuerySpec {
        exact: &["accountId", "transactionType"],
        date_range: true,
        amount_range: true,
        newest_first: true,
    };

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn row(account: &str, kind: &str, day: u32, amount: f64) -> Row {
        Row {
            account: account.to_string(),
            kind: kind.to_string(),
            at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            amount,
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            row("acc-1", "DEBIT", 3, -50.0),
            row("acc-1", "CREDIT", 10, 200.0),
            row("acc-2", "DEBIT", 5, -15.0),
            row("acc-1", "DEBIT", 20, -500.0),
            row("acc-2", "FEE", 31, 10.0),
        ]
    }

    #[test]
    fn defaults_to_first_page_of_twenty() {
        let query = CollectionQuery::parse(&HashMap::new(), &SPEC).unwrap();
        assert_eq!(query.page, PageRequest { page: 1, limit: 20 });
        assert!(query.exact.is_empty());
        assert!(query.dates.is_unbounded());
        assert!(query.amounts.is_unbounded());
    }

    #[rstest]
    #[case("page", "0")]
    #[case("page", "-1")]
    #[case("page", "abc")]
    #[case("page", "1.5")]
    #[case("limit", "0")]
    #[case("limit", "1001")]
    #[case("limit", "ten")]
    #[case("startDate", "2024-1-05")]
    #[case("startDate", "05/01/2024")]
    #[case("endDate", "2024-02-30")]
    #[case("minAmount", "-1")]
    #[case("maxAmount", "lots")]
    #[case("maxAmount", "NaN")]
    fn rejects_invalid_parameters(#[case] name: &str, #[case] value: &str) {
        let err = CollectionQuery::parse(&params(&[(name, value)]), &SPEC).unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMETER");
    }

    #[rstest]
    #[case(&[("startDate", "2024-02-01"), ("endDate", "2024-01-01")])]
    #[case(&[("minAmount", "100"), ("maxAmount", "10")])]
    fn rejects_inverted_ranges(#[case] pairs: &[(&str, &str)]) {
        let err = CollectionQuery::parse(&params(pairs), &SPEC).unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMETER");
    }

    #[test]
    fn ignores_parameters_outside_the_spec() {
        let spec = QuerySpec::exact(&["status"]);
        let query = CollectionQuery::parse(
            &params(&[("startDate", "not-a-date"), ("accountId", "acc-1"), ("status", "ACTIVE")]),
            &spec,
        )
        .unwrap();

        assert_eq!(query.exact, vec![("status", "ACTIVE".to_string())]);
        assert!(query.dates.is_unbounded());
    }

    #[test]
    fn empty_values_count_as_absent() {
        let query =
            CollectionQuery::parse(&params(&[("page", ""), ("accountId", " ")]), &SPEC).unwrap();
        assert_eq!(query.page.page, 1);
        assert!(query.exact.is_empty());
    }

    #[test]
    fn applies_every_filter_and_sorts_newest_first() {
        let query = CollectionQuery::parse(
            &params(&[
                ("accountId", "acc-1"),
                ("transactionType", "DEBIT"),
                ("startDate", "2024-01-03"),
                ("endDate", "2024-01-20"),
                ("minAmount", "50"),
                ("maxAmount", "500"),
            ]),
            &SPEC,
        )
        .unwrap();

        let page = query.execute(rows());

        assert_eq!(page.items, vec![row("acc-1", "DEBIT", 20, -500.0), row("acc-1", "DEBIT", 3, -50.0)]);
        assert_eq!(page.pagination.total_records, 2);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn page_past_the_end_is_empty_with_metadata() {
        let query = CollectionQuery::parse(&params(&[("page", "4"), ("limit", "2")]), &SPEC).unwrap();
        let page = query.execute(rows());

        assert!(page.items.is_empty());
        assert_eq!(
            page.pagination,
            Pagination {
                page: 4,
                limit: 2,
                total_pages: 3,
                total_records: 5
            }
        );
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let page = paginate(Vec::<Row>::new(), PageRequest::default());
        assert_eq!(page.pagination.total_pages, 0);
        assert_eq!(page.pagination.total_records, 0);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(
            (0usize..3, 0usize..3, 0i64..90 * 24, -600.0f64..600.0),
            0..60,
        )
        .prop_map(|entries| {
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            entries
                .into_iter()
                .map(|(account, kind, hours, amount)| Row {
                    account: format!("acc-{account}"),
                    kind: ["DEBIT", "CREDIT", "FEE"][kind].to_string(),
                    at: base + Duration::hours(hours),
                    amount,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn pagination_metadata_is_consistent(
            items in arb_rows(),
            page in 1u32..10,
            limit in 1u32..=MAX_LIMIT,
        ) {
            let total = items.len() as u64;
            let result = paginate(items, PageRequest { page, limit });

            prop_assert_eq!(result.pagination.total_records, total);
            prop_assert_eq!(result.pagination.total_pages, (total + u64::from(limit) - 1) / u64::from(limit));
            prop_assert!(result.items.len() <= limit as usize);
        }

        #[test]
        fn filter_order_does_not_matter(items in arb_rows(), account in 0usize..3, min in 0.0f64..300.0) {
            let account = format!("acc-{account}");
            let min = format!("{min}");
            let by_account = params(&[("accountId", account.as_str()), ("limit", "1000")]);
            let by_amount = params(&[("minAmount", min.as_str()), ("limit", "1000")]);
            let both = params(&[("accountId", account.as_str()), ("minAmount", min.as_str()), ("limit", "1000")]);

            let account_query = CollectionQuery::parse(&by_account, &SPEC).unwrap();
            let amount_query = CollectionQuery::parse(&by_amount, &SPEC).unwrap();
            let combined = CollectionQuery::parse(&both, &SPEC).unwrap();

            let account_then_amount = amount_query.execute(account_query.execute(items.clone()).items).items;
            let amount_then_account = account_query.execute(amount_query.execute(items.clone()).items).items;
            let at_once = combined.execute(items).items;

            prop_assert_eq!(&account_then_amount, &amount_then_account);
            prop_assert_eq!(&account_then_amount, &at_once);
        }

        #[test]
        fn results_are_newest_first(items in arb_rows(), kind in 0usize..3) {
            let kind = ["DEBIT", "CREDIT", "FEE"][kind];
            let query = CollectionQuery::parse(&params(&[("transactionType", kind), ("limit", "1000")]), &SPEC).unwrap();
            let page = query.execute(items);

            prop_assert!(page.items.windows(2).all(|pair| pair[0].at >= pair[1].at));
            prop_assert!(page.items.iter().all(|row| row.kind == kind));
        }
    }
}
