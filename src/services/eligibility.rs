use chrono::{Datelike, NaiveDate};

use crate::services::catalog_service::{ActivityCatalog, ALL_AGES_BUCKET};
use crate::services::date_utils;

/// Whole years between `birth_date` and `today`.
///
/// Missing, unparseable and future birth dates produce `None`, which callers
/// treat as "every activity is eligible".
pub fn calculate_age(birth_date: Option<&str>, today: NaiveDate) -> Option<u32> {
    let birth = date_utils::parse_optional_calendar_date(birth_date)?;
    if birth > today {
        return None;
    }

    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// `all` followed by every catalog age range matching `age`, first-seen order.
pub fn age_buckets(catalog: &ActivityCatalog, age: Option<u32>) -> Vec<String> {
    let mut buckets = vec![ALL_AGES_BUCKET.to_string()];
    if age.is_none() {
        return buckets;
    }

    buckets.extend(
        catalog
            .age_range_labels()
            .into_iter()
            .filter(|(range, _)| range.matches(age))
            .map(|(_, label)| label),
    );
    buckets
}
