//! Category filtering for map listings

use crate::domains::points::models::DonationPoint;

/// A map category filter. `All` keeps every point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    /// Absent, blank, "all" and "todos" (any case) select everything.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(value)
                if value.eq_ignore_ascii_case("all") || value.eq_ignore_ascii_case("todos") =>
            {
                CategoryFilter::All
            }
            Some(value) => CategoryFilter::Only(value.to_string()),
        }
    }

    pub fn matches(&self, point: &DonationPoint) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => point.has_category(category),
        }
    }
}

/// Keep points matching the filter, preserving order.
pub fn filter_by_category(points: Vec<DonationPoint>, filter: &CategoryFilter) -> Vec<DonationPoint> {
    points.into_iter().filter(|p| filter.matches(p)).collect()
}

/// Public map listing: approved, active points matching the filter.
pub fn public_listing(points: Vec<DonationPoint>, filter: &CategoryFilter) -> Vec<DonationPoint> {
    points
        .into_iter()
        .filter(|p| p.is_publicly_visible() && filter.matches(p))
        .collect()
}
