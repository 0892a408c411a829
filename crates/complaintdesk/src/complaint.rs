//! Core complaint types for complaintdesk.
//!
//! This module defines the complaint record that the desk persists, along with
//! its identifier and the two closed vocabularies (category and urgency).

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Prefix of every complaint id.
pub const ID_PREFIX: &str = "CMP-";

/// Smallest numeric part of a complaint id.
pub const ID_MIN: u32 = 10_000;

/// Largest numeric part of a complaint id.
pub const ID_MAX: u32 = 99_999;

/// Identifier of a complaint, rendered as `CMP-NNNNN`.
///
/// Ids are drawn at random from `[10000, 99999]` and are not guaranteed to be
/// unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplaintId(u32);

impl ComplaintId {
    /// Draw a fresh id from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(ID_MIN..=ID_MAX))
    }

    /// Build an id from its numeric part.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedId`] if `value` is outside `[10000, 99999]`.
    pub fn from_number(value: u32) -> Result<Self, Error> {
        if (ID_MIN..=ID_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::MalformedId(value.to_string()))
        }
    }

    /// The numeric part of the id.
    #[must_use]
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.0)
    }
}

impl FromStr for ComplaintId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(ID_PREFIX)
            .filter(|d| d.len() == 5 && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| Error::MalformedId(s.to_string()))?;
        let value: u32 = digits
            .parse()
            .map_err(|_| Error::MalformedId(s.to_string()))?;
        Self::from_number(value).map_err(|_| Error::MalformedId(s.to_string()))
    }
}

impl TryFrom<String> for ComplaintId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComplaintId> for String {
    fn from(id: ComplaintId) -> Self {
        id.to_string()
    }
}

/// What a complaint is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    /// Anything not covered below.
    #[default]
    General,
    /// Invoices, charges, insurance.
    Billing,
    /// Treatment and clinical care.
    #[serde(rename = "Medical Care")]
    MedicalCare,
    /// Conduct of hospital staff.
    #[serde(rename = "Staff Behavior")]
    StaffBehavior,
    /// Buildings, rooms, parking, food.
    Facilities,
}

impl Category {
    /// Every category, in form order.
    pub const ALL: [Self; 5] = [
        Self::General,
        Self::Billing,
        Self::MedicalCare,
        Self::StaffBehavior,
        Self::Facilities,
    ];

    /// Display name, which is also the persisted form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Billing => "Billing",
            Self::MedicalCare => "Medical Care",
            Self::StaffBehavior => "Staff Behavior",
            Self::Facilities => "Facilities",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts display names in any case, with `-` or `_` standing in for spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_choice(s);
        Self::ALL
            .into_iter()
            .find(|c| normalize_choice(c.as_str()) == wanted)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// How pressing a complaint is. Used for display emphasis only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Urgency {
    /// Can wait.
    Low,
    /// The default.
    #[default]
    Medium,
    /// Needs attention soon.
    High,
}

impl Urgency {
    /// Every urgency, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Display name, which is also the persisted form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_choice(s);
        Self::ALL
            .into_iter()
            .find(|u| normalize_choice(u.as_str()) == wanted)
            .ok_or_else(|| Error::UnknownUrgency(s.to_string()))
    }
}

fn normalize_choice(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// A submitted complaint.
///
/// Records are immutable once created: the desk only ever appends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    /// Assigned at submission time.
    pub id: ComplaintId,
    /// Full name of the complainant.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// What the complaint is about.
    pub category: Category,
    /// Free text.
    pub description: String,
    /// How pressing it is.
    pub urgency: Urgency,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_record() -> ComplaintRecord {
        ComplaintRecord {
            id: ComplaintId::from_number(12_345).unwrap(),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            category: Category::MedicalCare,
            description: "Overcharged".to_string(),
            urgency: Urgency::High,
        }
    }

    #[test]
    fn test_generated_ids_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let id = ComplaintId::generate(&mut rng);
            assert!((ID_MIN..=ID_MAX).contains(&id.number()));
            let text = id.to_string();
            assert_eq!(text.len(), 9);
            assert!(text.starts_with("CMP-"));
            assert!(text[4..].bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_id_parse() {
        let id: ComplaintId = "CMP-48213".parse().unwrap();
        assert_eq!(id.number(), 48_213);
        assert_eq!(id.to_string(), "CMP-48213");
    }

    #[test]
    fn test_id_parse_rejects_bad_shapes() {
        for bad in ["CMP-1234", "CMP-123456", "CMP-01234", "cmp-12345", "12345", "CMP-12a45", ""] {
            assert!(bad.parse::<ComplaintId>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_id_from_number_bounds() {
        assert!(ComplaintId::from_number(9_999).is_err());
        assert!(ComplaintId::from_number(10_000).is_ok());
        assert!(ComplaintId::from_number(99_999).is_ok());
        assert!(ComplaintId::from_number(100_000).is_err());
    }

    #[test]
    fn test_category_parse_is_lenient() {
        assert_eq!("billing".parse::<Category>().unwrap(), Category::Billing);
        assert_eq!(
            "medical-care".parse::<Category>().unwrap(),
            Category::MedicalCare
        );
        assert_eq!(
            "Staff_Behavior".parse::<Category>().unwrap(),
            Category::StaffBehavior
        );
        assert!("Parking".parse::<Category>().is_err());
    }

    #[test]
    fn test_urgency_parse() {
        assert_eq!("HIGH".parse::<Urgency>().unwrap(), Urgency::High);
        assert!("urgent".parse::<Urgency>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Category::default(), Category::General);
        assert_eq!(Urgency::default(), Urgency::Medium);
    }

    #[test]
    fn test_record_persisted_shape() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["id"], "CMP-12345");
        assert_eq!(json["category"], "Medical Care");
        assert_eq!(json["urgency"], "High");
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_record_rejects_foreign_payloads() {
        let bad_id = r#"{"id":"X-1","name":"a","email":"b","category":"General","description":"c","urgency":"Low"}"#;
        assert!(serde_json::from_str::<ComplaintRecord>(bad_id).is_err());

        let missing_field = r#"{"id":"CMP-12345","name":"a","email":"b","category":"General","urgency":"Low"}"#;
        assert!(serde_json::from_str::<ComplaintRecord>(missing_field).is_err());

        let bad_enum = r#"{"id":"CMP-12345","name":"a","email":"b","category":"Parking","description":"c","urgency":"Low"}"#;
        assert!(serde_json::from_str::<ComplaintRecord>(bad_enum).is_err());
    }

    #[test]
    fn test_record_reads_browser_written_payload() {
        let json = r#"{"id":"CMP-55555","name":"Bob","email":"bob@example.org","category":"Staff Behavior","description":"Rude","urgency":"Low"}"#;
        let record: ComplaintRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category, Category::StaffBehavior);
        assert_eq!(record.id.number(), 55_555);
    }
}
