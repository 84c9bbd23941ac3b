use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deadline placeholder the listing service emits when a source has none.
const DEADLINE_NOT_SPECIFIED: &str = "Not specified";

// ============================================================================
// Category
// ============================================================================

/// One of the dashboard tabs. Each maps to its own listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Scholarships,
    Hackathons,
    Freelancing,
}

impl Category {
    /// All categories in tab order.
    pub const ALL: [Category; 3] = [
        Category::Scholarships,
        Category::Hackathons,
        Category::Freelancing,
    ];

    /// Name used both for display and as the endpoint path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Scholarships => "Scholarships",
            Category::Hackathons => "Hackathons",
            Category::Freelancing => "Freelancing",
        }
    }

    /// Position of this category in [`Category::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Category::Scholarships => 0,
            Category::Hackathons => 1,
            Category::Freelancing => 2,
        }
    }

    /// Next tab, wrapping around.
    pub fn next(&self) -> Category {
        Category::ALL[(self.index() + 1) % Category::ALL.len()]
    }

    /// Previous tab, wrapping around.
    pub fn prev(&self) -> Category {
        Category::ALL[(self.index() + Category::ALL.len() - 1) % Category::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown category: {0} (expected Scholarships, Hackathons or Freelancing)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// Cache Key
// ============================================================================

/// Composite key `"{category}-{query or all}"` identifying one result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(category: Category, query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            Self(format!("{}-all", category.as_str()))
        } else {
            Self(format!("{}-{}", category.as_str(), query))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Opportunity
// ============================================================================

/// Kind of listing, as tagged by the backend agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OpportunityType {
    Scholarship,
    Hackathon,
    Freelancing,
    /// Untagged or unrecognized listings.
    General,
}

impl From<String> for OpportunityType {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "scholarship" | "scholarships" => OpportunityType::Scholarship,
            "hackathon" | "hackathons" => OpportunityType::Hackathon,
            "freelancing" | "freelance" => OpportunityType::Freelancing,
            _ => OpportunityType::General,
        }
    }
}

impl From<OpportunityType> for String {
    fn from(t: OpportunityType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpportunityType::Scholarship => "Scholarship",
            OpportunityType::Hackathon => "Hackathon",
            OpportunityType::Freelancing => "Freelancing",
            OpportunityType::General => "General",
        };
        f.write_str(s)
    }
}

/// A single listing record. Immutable once fetched.
///
/// Decoding goes through [`RawOpportunity`] so that sparse records coming
/// from scrapers still produce displayable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOpportunity")]
pub struct Opportunity {
    pub title: String,
    pub description: String,
    pub link: String,
    pub source: String,
    pub deadline: Option<String>,
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    pub relevance_score: f64,
}

impl Opportunity {
    /// Identity used for saved-list de-duplication.
    pub fn identity(&self) -> (&str, &str) {
        (&self.title, &self.source)
    }

    pub fn same_identity(&self, other: &Opportunity) -> bool {
        self.identity() == other.identity()
    }
}

/// Wire shape with every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawOpportunity {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    source: Option<String>,
    deadline: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    relevance_score: Option<f64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<RawOpportunity> for Opportunity {
    fn from(raw: RawOpportunity) -> Self {
        let relevance_score = raw
            .relevance_score
            .filter(|s| s.is_finite())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);

        Opportunity {
            title: non_empty(raw.title).unwrap_or_else(|| "Untitled Opportunity".to_string()),
            description: non_empty(raw.description)
                .unwrap_or_else(|| "No description available".to_string()),
            link: non_empty(raw.link).unwrap_or_else(|| "#".to_string()),
            source: non_empty(raw.source).unwrap_or_else(|| "Unknown Source".to_string()),
            deadline: non_empty(raw.deadline).filter(|d| d.trim() != DEADLINE_NOT_SPECIFIED),
            kind: raw
                .kind
                .map(OpportunityType::from)
                .unwrap_or(OpportunityType::General),
            relevance_score,
        }
    }
}

/// Response body of the listing endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListingResponse {
    pub opportunities: Vec<Opportunity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(
            CacheKey::new(Category::Scholarships, "").as_str(),
            "Scholarships-all"
        );
        assert_eq!(
            CacheKey::new(Category::Hackathons, "  ai ").as_str(),
            "Hackathons-ai"
        );
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!("hackathons".parse::<Category>().unwrap(), Category::Hackathons);
        assert_eq!("FREELANCING".parse::<Category>().unwrap(), Category::Freelancing);
        assert!("jobs".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_cycle() {
        assert_eq!(Category::Scholarships.next(), Category::Hackathons);
        assert_eq!(Category::Freelancing.next(), Category::Scholarships);
        assert_eq!(Category::Scholarships.prev(), Category::Freelancing);
    }

    #[test]
    fn test_decode_full_record() {
        let json = r#"{
            "title": "STEM Grant",
            "description": "For engineering students",
            "link": "https://example.com/grant",
            "source": "example.com",
            "deadline": "2026-12-01",
            "type": "Scholarship",
            "relevance_score": 0.8
        }"#;
        let opp: Opportunity = serde_json::from_str(json).unwrap();
        assert_eq!(opp.title, "STEM Grant");
        assert_eq!(opp.kind, OpportunityType::Scholarship);
        assert_eq!(opp.deadline.as_deref(), Some("2026-12-01"));
        assert!((opp.relevance_score - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_sparse_record_applies_defaults() {
        let opp: Opportunity = serde_json::from_str(r#"{"deadline": "Not specified"}"#).unwrap();
        assert_eq!(opp.title, "Untitled Opportunity");
        assert_eq!(opp.description, "No description available");
        assert_eq!(opp.source, "Unknown Source");
        assert_eq!(opp.link, "#");
        assert_eq!(opp.deadline, None);
        assert_eq!(opp.kind, OpportunityType::General);
        assert_eq!(opp.relevance_score, 0.0);
    }

    #[test]
    fn test_unknown_type_is_general() {
        let opp: Opportunity = serde_json::from_str(r#"{"type": "internship"}"#).unwrap();
        assert_eq!(opp.kind, OpportunityType::General);
        let opp: Opportunity = serde_json::from_str(r#"{"type": " Freelance "}"#).unwrap();
        assert_eq!(opp.kind, OpportunityType::Freelancing);
    }

    #[test]
    fn test_relevance_clamped() {
        let opp: Opportunity = serde_json::from_str(r#"{"relevance_score": 3.5}"#).unwrap();
        assert_eq!(opp.relevance_score, 1.0);
        let opp: Opportunity = serde_json::from_str(r#"{"relevance_score": -1}"#).unwrap();
        assert_eq!(opp.relevance_score, 0.0);
    }

    #[test]
    fn test_serialized_form_decodes_to_same_value() {
        let opp: Opportunity =
            serde_json::from_str(r#"{"title": "Hack Night", "type": "Hackathon"}"#).unwrap();
        let json = serde_json::to_string(&opp).unwrap();
        assert!(json.contains(r#""type":"Hackathon""#));
        let back: Opportunity = serde_json::from_str(&json).unwrap();
        assert_eq!(opp, back);
    }

    #[test]
    fn test_response_without_opportunities_field() {
        let resp: ListingResponse = serde_json::from_str(r#"{"category": "Hackathons"}"#).unwrap();
        assert!(resp.opportunities.is_empty());
    }
}
