//! The complaint list: live search and the filtered projection.
//!
//! Nothing here is stored. The view is recomputed from the collection and the
//! current keyword every time it is read.

use crate::complaint::{ComplaintRecord, Urgency};

/// The search box above the complaint list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    keyword: String,
}

impl SearchBox {
    /// Replace the keyword with `input`, lowercased.
    pub fn set(&mut self, input: &str) {
        self.keyword = input.to_lowercase();
    }

    /// Empty the box.
    pub fn clear(&mut self) {
        self.keyword.clear();
    }

    /// The current (lowercase) keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

/// Whether `record` matches `keyword` by name or category.
///
/// Case-insensitive substring match. An empty keyword matches everything.
#[must_use]
pub fn matches(record: &ComplaintRecord, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    record.name.to_lowercase().contains(&keyword)
        || record.category.as_str().to_lowercase().contains(&keyword)
}

/// Records matching `keyword`, in collection order.
#[must_use]
pub fn filtered<'a>(records: &'a [ComplaintRecord], keyword: &str) -> Vec<&'a ComplaintRecord> {
    records.iter().filter(|r| matches(r, keyword)).collect()
}

/// Display emphasis for an urgency badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyTier {
    /// High urgency.
    Strong,
    /// Medium urgency.
    Moderate,
    /// Low urgency.
    Mild,
}

impl From<Urgency> for UrgencyTier {
    fn from(urgency: Urgency) -> Self {
        match urgency {
            Urgency::High => Self::Strong,
            Urgency::Medium => Self::Moderate,
            Urgency::Low => Self::Mild,
        }
    }
}

/// One row of the complaint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    /// The record shown.
    pub record: &'a ComplaintRecord,
    /// How its urgency badge is emphasised.
    pub tier: UrgencyTier,
}

/// What the complaint table shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<'a> {
    /// Nothing matched: show the "No complaints found" placeholder.
    NoResults,
    /// At least one record matched.
    Rows(Vec<Row<'a>>),
}

impl<'a> ListView<'a> {
    /// Project `records` through `keyword`.
    #[must_use]
    pub fn build(records: &'a [ComplaintRecord], keyword: &str) -> Self {
        let rows: Vec<_> = filtered(records, keyword)
            .into_iter()
            .map(|record| Row {
                record,
                tier: record.urgency.into(),
            })
            .collect();

        if rows.is_empty() {
            Self::NoResults
        } else {
            Self::Rows(rows)
        }
    }

    /// The matched records, in order.
    #[must_use]
    pub fn records(&self) -> Vec<&'a ComplaintRecord> {
        match self {
            Self::NoResults => Vec::new(),
            Self::Rows(rows) => rows.iter().map(|row| row.record).collect(),
        }
    }

    /// Number of rows shown, not counting the placeholder.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::NoResults => 0,
            Self::Rows(rows) => rows.len(),
        }
    }

    /// Whether the placeholder is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoResults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaint::{Category, ComplaintId};

    fn record(id: u32, name: &str, category: Category, urgency: Urgency) -> ComplaintRecord {
        ComplaintRecord {
            id: ComplaintId::from_number(id).unwrap(),
            name: name.to_string(),
            email: "someone@example.org".to_string(),
            category,
            description: "Details".to_string(),
            urgency,
        }
    }

    fn sample() -> Vec<ComplaintRecord> {
        vec![
            record(10_001, "Alice", Category::General, Urgency::High),
            record(10_002, "Bob", Category::General, Urgency::Low),
            record(10_003, "Carol", Category::Billing, Urgency::Medium),
            record(10_004, "Dan", Category::MedicalCare, Urgency::Medium),
        ]
    }

    fn names<'a>(records: &[&'a ComplaintRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_search_box_lowercases_on_set() {
        let mut search = SearchBox::default();
        search.set("BiL");
        assert_eq!(search.keyword(), "bil");
        search.clear();
        assert_eq!(search.keyword(), "");
    }

    #[test]
    fn test_empty_keyword_matches_all_in_order() {
        let records = sample();
        let all = filtered(&records, "");
        assert_eq!(names(&all), ["Alice", "Bob", "Carol", "Dan"]);
    }

    #[test]
    fn test_matches_category_regardless_of_name() {
        let records = sample();
        assert_eq!(names(&filtered(&records, "bil")), ["Carol"]);
    }

    #[test]
    fn test_matches_name_substring() {
        let records = sample();
        assert_eq!(names(&filtered(&records, "ali")), ["Alice"]);
        assert_eq!(names(&filtered(&records, "o")), ["Bob", "Carol"]);
    }

    #[test]
    fn test_matches_is_case_insensitive_both_ways() {
        let records = sample();
        assert_eq!(names(&filtered(&records, "GENERAL")), ["Alice", "Bob"]);
        assert_eq!(names(&filtered(&records, "medical c")), ["Dan"]);
    }

    #[test]
    fn test_description_and_email_are_not_searched() {
        let records = sample();
        assert!(filtered(&records, "details").is_empty());
        assert!(filtered(&records, "example.org").is_empty());
    }

    #[test]
    fn test_list_view_placeholder() {
        assert!(ListView::build(&[], "").is_empty());
        assert!(ListView::build(&[], "anything").is_empty());

        let records = sample();
        let view = ListView::build(&records, "zzz");
        assert_eq!(view, ListView::NoResults);
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn test_list_view_rows_carry_tiers() {
        let records = sample();
        let ListView::Rows(rows) = ListView::build(&records, "general") else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tier, UrgencyTier::Strong);
        assert_eq!(rows[1].tier, UrgencyTier::Mild);
    }

    #[test]
    fn test_urgency_tiers() {
        assert_eq!(UrgencyTier::from(Urgency::High), UrgencyTier::Strong);
        assert_eq!(UrgencyTier::from(Urgency::Medium), UrgencyTier::Moderate);
        assert_eq!(UrgencyTier::from(Urgency::Low), UrgencyTier::Mild);
    }

    #[test]
    fn test_list_view_records() {
        let records = sample();
        let view = ListView::build(&records, "car");
        assert_eq!(names(&view.records()), ["Carol", "Dan"]);
    }
}
