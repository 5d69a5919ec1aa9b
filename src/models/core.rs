// src/models/core.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//------------------------------------------------------------------------------
// IDENTIFIER TYPES
//------------------------------------------------------------------------------
// Using newtype pattern for type safety to prevent mixing different ID types

/// Strongly typed identifier for lead records
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl std::fmt::Display for LeadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//------------------------------------------------------------------------------
// CORE DOMAIN MODELS
//------------------------------------------------------------------------------

/// One scraped contact record.
///
/// Read-only input to the quality pass: `id` is unique within a batch and
/// immutable, every other field is optional. Merging never mutates a record
/// in place; it produces a new derived record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Unique identifier within the batch
    pub id: LeadId,

    /// Canonical professional-network profile URL, if scraped
    pub professional_network_url: Option<String>,

    /// Contact email address
    pub email: Option<String>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,

    pub company_name: Option<String>,
    pub company_domain: Option<String>,

    /// Free-text job title as scraped
    pub title: Option<String>,

    pub phone: Option<String>,

    /// Free-form locality string, e.g. "Austin, TX, USA"
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,

    /// Company industry label, when the scraper resolved one
    pub industry: Option<String>,

    /// Company headcount, when known
    pub company_size: Option<u32>,

    /// When the record was first scraped
    pub created_at: Option<DateTime<Utc>>,
}

impl LeadRecord {
    /// The identity attributes counted when ranking merge candidates by
    /// completeness. Order matches the merge documentation; `industry` and
    /// `company_size` are firmographic enrichment, not identity, and are
    /// excluded on purpose.
    pub fn identity_fields(&self) -> [(&'static str, Option<&str>); 12] {
        [
            ("professional_network_url", self.professional_network_url.as_deref()),
            ("email", self.email.as_deref()),
            ("first_name", self.first_name.as_deref()),
            ("last_name", self.last_name.as_deref()),
            ("company_name", self.company_name.as_deref()),
            ("company_domain", self.company_domain.as_deref()),
            ("title", self.title.as_deref()),
            ("phone", self.phone.as_deref()),
            ("location", self.location.as_deref()),
            ("city", self.city.as_deref()),
            ("state", self.state.as_deref()),
            ("country", self.country.as_deref()),
        ]
    }

    /// Number of populated identity attributes.
    pub fn populated_field_count(&self) -> usize {
        self.identity_fields()
            .iter()
            .filter(|(_, v)| v.map_or(false, |s| !s.trim().is_empty()))
            .count()
    }
}

/// Why a historical identity key excludes a current lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    ContactedRecently,
    Bounced,
    Unsubscribed,
    Suppressed,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::ContactedRecently => "contacted_recently",
            ExclusionReason::Bounced => "bounced",
            ExclusionReason::Unsubscribed => "unsubscribed",
            ExclusionReason::Suppressed => "suppressed",
        }
    }
}

/// One identity known from prior campaigns or the suppression list.
///
/// Supplied by whatever layer owns historical campaign data; this core only
/// reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub email: Option<String>,
    pub professional_network_url: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub reason: ExclusionReason,
}
