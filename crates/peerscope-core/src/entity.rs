//! Legal-entity data model.
//!
//! Entity rows are created and updated by ingestion collaborators and are
//! read-only to the engines in this workspace. Embeddings, community ids and
//! revenue buckets are nullable until the corresponding batch engine has
//! assigned them.

use crate::error::KernelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Set of disclosure tag identifiers for one filing.
///
/// A `BTreeSet` keeps iteration order deterministic across runs.
pub type TagSet = BTreeSet<String>;

/// Jurisdiction-qualified, immutable entity identifier.
///
/// Rendered as `"<jurisdiction>:<local id>"`, e.g. `"US:0000320193"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    jurisdiction: String,
    local: String,
}

impl EntityId {
    /// Create a new identifier. Both parts must be non-empty.
    pub fn new(
        jurisdiction: impl Into<String>,
        local: impl Into<String>,
    ) -> Result<Self, KernelError> {
        let jurisdiction = jurisdiction.into();
        let local = local.into();
        if jurisdiction.is_empty() || local.is_empty() {
            return Err(KernelError::validation(
                "entity id requires non-empty jurisdiction and local id",
            ));
        }
        Ok(Self {
            jurisdiction,
            local,
        })
    }

    /// Jurisdiction code.
    #[must_use]
    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    /// Local (registry-scoped) identifier.
    #[must_use]
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.jurisdiction, self.local)
    }
}

impl FromStr for EntityId {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((jurisdiction, local)) => EntityId::new(jurisdiction, local),
            None => Err(KernelError::validation(format!(
                "entity id must be jurisdiction-qualified: {s}"
            ))),
        }
    }
}

impl TryFrom<String> for EntityId {
    type Error = KernelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}

/// Key identifying one filing: form type plus reporting period.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DisclosureKey {
    /// Form type identifier (e.g., "10-K").
    pub form_type: String,
    /// Fiscal year of the filing.
    pub fiscal_year: i32,
    /// Filing period within the fiscal year (e.g., "FY", "Q2").
    pub filing_period: String,
}

/// Tag set disclosed in one filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosure {
    /// Which filing this tag set belongs to.
    pub key: DisclosureKey,
    /// Disclosure tag identifiers reported in that filing.
    pub tags: TagSet,
}

/// A legal entity row as seen by the engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Immutable identifier.
    pub id: EntityId,
    /// Description embedding; None until the embedding model has run.
    pub embedding: Option<Vec<f64>>,
    /// Community label assigned by the embedding engine; -1 is noise.
    pub community: Option<i32>,
    /// Revenue bucket assigned by the revenue engine; -1 is unbucketable.
    pub revenue_bucket: Option<i32>,
    /// Revenue normalized to the common reference currency.
    pub revenue: Option<f64>,
    /// Disclosed tag sets, one per (form type, period).
    pub disclosures: Vec<Disclosure>,
}

impl EntityRecord {
    /// Create a record with no derived attributes yet.
    #[must_use]
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            embedding: None,
            community: None,
            revenue_bucket: None,
            revenue: None,
            disclosures: Vec::new(),
        }
    }

    /// Attach an embedding.
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f64>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Attach a normalized revenue figure.
    #[must_use]
    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = Some(revenue);
        self
    }

    /// Attach a community label.
    #[must_use]
    pub fn with_community(mut self, community: i32) -> Self {
        self.community = Some(community);
        self
    }

    /// Attach one filing's tag set.
    #[must_use]
    pub fn with_disclosure(mut self, key: DisclosureKey, tags: TagSet) -> Self {
        self.disclosures.push(Disclosure { key, tags });
        self
    }

    /// True if this entity can be the source of a similarity query.
    #[must_use]
    pub fn can_query(&self) -> bool {
        self.embedding.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// True if this entity can participate in revenue bucketing.
    #[must_use]
    pub fn can_bucket(&self) -> bool {
        self.revenue.is_some_and(|r| r.is_finite() && r >= 0.0)
    }

    /// Tag set for one filing, if present.
    #[must_use]
    pub fn tags(&self, key: &DisclosureKey) -> Option<&TagSet> {
        self.disclosures
            .iter()
            .find(|d| &d.key == key)
            .map(|d| &d.tags)
    }
}
