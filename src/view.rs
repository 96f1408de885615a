//! Filter → sort → paginate derivation over a store snapshot.
//!
//! Nothing here mutates the store; every function returns borrowed rows in
//! a freshly built order.

use crate::row::{Column, FieldValue, Row};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::cmp::Ordering;

lazy_static! {
    static ref NUMBER_REGEX: Regex =
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

/// Which column the view is sorted by, if any.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: Option<String>,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn by(key: impl Into<String>, order: SortOrder) -> Self {
        SortSpec {
            key: Some(key.into()),
            order,
        }
    }

    /// Applies one click on a column header. The same column cycles
    /// unsorted → ascending → descending → unsorted; another column starts
    /// at ascending.
    pub fn select(&mut self, key: &str) {
        if self.key.as_deref() != Some(key) {
            self.key = Some(key.to_string());
            self.order = SortOrder::Ascending;
            return;
        }
        self.order = match self.order {
            SortOrder::Unsorted => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Unsorted,
        };
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some() && self.order != SortOrder::Unsorted
    }
}

/// Ephemeral query, sort and page position of one table view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    query: String,
    sort: SortSpec,
    page: usize,
    page_size: usize,
}

impl ViewState {
    /// `page_size` must be positive; zero is bumped to one.
    pub fn new(page_size: usize) -> Self {
        ViewState {
            query: String::new(),
            sort: SortSpec::default(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// A new query always starts again from the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 0;
    }

    pub fn select_sort(&mut self, key: &str) {
        self.sort.select(key);
        debug!("sort {:?} {:?}", self.sort.key, self.sort.order);
    }

    /// Moves to `page` if it exists for `total` rows. Page 0 always exists.
    pub fn go_to_page(&mut self, page: usize, total: usize) -> bool {
        let max_page = page_count(total, self.page_size).saturating_sub(1);
        if page > max_page {
            return false;
        }
        self.page = page;
        true
    }

    /// Pulls the page back onto the last existing one after rows went away.
    pub fn clamp_page(&mut self, total: usize) {
        let max_page = page_count(total, self.page_size).saturating_sub(1);
        self.page = self.page.min(max_page);
    }

    /// Clears query, sort and page, keeping the page size.
    pub fn reset(&mut self) {
        *self = ViewState::new(self.page_size);
    }
}

/// One page of the derived view.
#[derive(Debug, PartialEq)]
pub struct ViewPage<'a> {
    pub rows: Vec<&'a Row>,
    /// Length of the filtered and sorted sequence before pagination.
    pub total_count: usize,
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

pub fn visible_columns(columns: &[Column]) -> Vec<&Column> {
    columns.iter().filter(|c| c.visible).collect()
}

/// Full pipeline: projection, filter, sort, then the requested page.
pub fn derive_view<'a>(rows: &'a [Row], columns: &[Column], state: &ViewState) -> ViewPage<'a> {
    let arranged = arrange(rows, columns, &state.query, &state.sort);
    paginate(arranged, state.page, state.page_size)
}

/// Filtered and sorted rows, unpaginated. This is what export reads.
pub fn arrange<'a>(rows: &'a [Row], columns: &[Column], query: &str, sort: &SortSpec) -> Vec<&'a Row> {
    let visible = visible_columns(columns);
    let mut out = filter_rows(rows, &visible, query);
    if let (Some(key), true) = (sort.key.as_deref(), sort.is_active()) {
        sort_rows(&mut out, key, sort.order);
    }
    out
}

pub fn filter_rows<'a>(rows: &'a [Row], visible: &[&Column], query: &str) -> Vec<&'a Row> {
    if query.is_empty() {
        return rows.iter().collect();
    }
    let needle = query.to_lowercase();
    rows.iter()
        .filter(|row| {
            visible
                .iter()
                .any(|col| display_lower(row.get(&col.key)).contains(&needle))
        })
        .collect()
}

pub fn sort_rows(rows: &mut Vec<&Row>, key: &str, order: SortOrder) {
    match order {
        SortOrder::Unsorted => {}
        SortOrder::Ascending => merge_sort_by(rows, |a, b| compare_values(a.get(key), b.get(key))),
        SortOrder::Descending => merge_sort_by(rows, |a, b| compare_values(b.get(key), a.get(key))),
    }
}

pub fn paginate(rows: Vec<&Row>, page: usize, page_size: usize) -> ViewPage<'_> {
    let total_count = rows.len();
    let start = page.saturating_mul(page_size).min(total_count);
    let end = start.saturating_add(page_size).min(total_count);
    ViewPage {
        rows: rows[start..end].to_vec(),
        total_count,
    }
}

/// Numeric when both sides coerce to numbers, lowercase text otherwise.
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    display_lower(a).cmp(&display_lower(b))
}

/// Numeric coercion for sorting. Blank text counts as zero, an absent
/// value is never numeric.
pub fn as_number(value: Option<&FieldValue>) -> Option<f64> {
    match value? {
        FieldValue::Number(n) if n.is_nan() => None,
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => parse_number(s),
    }
}

pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    if !NUMBER_REGEX.is_match(s) {
        return None;
    }
    s.parse::<f64>().ok()
}

fn display_lower(value: Option<&FieldValue>) -> String {
    value.map(|v| v.to_string().to_lowercase()).unwrap_or_default()
}

// Pairwise numeric-or-text comparison is not a total order on mixed
// columns, and std's sorts may panic on such comparators.
fn merge_sort_by<T: Copy, F>(items: &mut Vec<T>, mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = items.len();
    if n < 2 {
        return;
    }
    let mut buf = items.clone();
    let mut width = 1;
    while width < n {
        let mut start = 0;
        while start < n {
            let mid = (start + width).min(n);
            let end = (start + 2 * width).min(n);
            let (mut i, mut j) = (start, mid);
            for slot in buf.iter_mut().take(end).skip(start) {
                let take_right = i >= mid || (j < end && cmp(&items[j], &items[i]) == Ordering::Less);
                if take_right {
                    *slot = items[j];
                    j += 1;
                } else {
                    *slot = items[i];
                    i += 1;
                }
            }
            start = end;
        }
        std::mem::swap(items, &mut buf);
        width *= 2;
    }
}
