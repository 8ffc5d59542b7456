use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staybook_core::{DomainError, DomainResult, Money, PropertyId, UserId};

/// A rental property listing.
///
/// # Invariants
/// - `title` is non-empty (after trimming).
/// - `location`, when present, is non-empty.
/// - `price_per_night` is non-negative (guaranteed by [`Money`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Money,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when creating a listing. The owner comes from the
/// authenticated session, never from the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDraft {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Money,
    pub is_active: Option<bool>,
}

/// Partial update of a listing. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Option<Money>,
    pub is_active: Option<bool>,
}

impl Property {
    /// Validate a draft and build the listing record.
    pub fn create(
        id: PropertyId,
        owner_id: UserId,
        draft: PropertyDraft,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let property = Self {
            id,
            owner_id,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            price_per_night: draft.price_per_night,
            is_active: draft.is_active.unwrap_or(true),
            created_at: now,
        };
        property.validate()?;
        Ok(property)
    }

    /// Merge a patch over the current fields and re-validate the result.
    ///
    /// `id`, `owner_id` and `created_at` are immutable.
    pub fn apply_patch(&self, patch: PropertyPatch) -> DomainResult<Self> {
        let merged = Self {
            id: self.id,
            owner_id: self.owner_id,
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            description: patch.description.or_else(|| self.description.clone()),
            location: patch.location.or_else(|| self.location.clone()),
            price_per_night: patch.price_per_night.unwrap_or(self.price_per_night),
            is_active: patch.is_active.unwrap_or(self.is_active),
            created_at: self.created_at,
        };
        merged.validate()?;
        Ok(merged)
    }

    fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        if let Some(location) = &self.location {
            if location.trim().is_empty() {
                return Err(DomainError::validation("location must not be blank"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PropertyDraft {
        PropertyDraft {
            title: "Stuga vid sjön".to_string(),
            description: Some("Two rooms, sauna, jetty".to_string()),
            location: Some("Dalarna".to_string()),
            price_per_night: Money::from_minor(120_000),
            is_active: None,
        }
    }

    #[test]
    fn create_defaults_to_active() {
        let p = Property::create(PropertyId::new(), UserId::new(), draft(), Utc::now()).unwrap();
        assert!(p.is_active);
        assert_eq!(p.price_per_night, Money::from_minor(120_000));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut d = draft();
        d.title = "   ".to_string();
        let err = Property::create(PropertyId::new(), UserId::new(), d, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_location_is_rejected_but_absent_is_fine() {
        let mut d = draft();
        d.location = Some(String::new());
        assert!(Property::create(PropertyId::new(), UserId::new(), d, Utc::now()).is_err());

        let mut d = draft();
        d.location = None;
        assert!(Property::create(PropertyId::new(), UserId::new(), d, Utc::now()).is_ok());
    }

    #[test]
    fn patch_merges_over_current_fields() {
        let p = Property::create(PropertyId::new(), UserId::new(), draft(), Utc::now()).unwrap();
        let patched = p
            .apply_patch(PropertyPatch {
                price_per_night: Some(Money::from_minor(95_000)),
                is_active: Some(false),
                ..PropertyPatch::default()
            })
            .unwrap();

        assert_eq!(patched.id, p.id);
        assert_eq!(patched.owner_id, p.owner_id);
        assert_eq!(patched.title, p.title);
        assert_eq!(patched.price_per_night, Money::from_minor(95_000));
        assert!(!patched.is_active);
    }

    #[test]
    fn patch_cannot_blank_the_title() {
        let p = Property::create(PropertyId::new(), UserId::new(), draft(), Utc::now()).unwrap();
        let err = p
            .apply_patch(PropertyPatch {
                title: Some("  ".to_string()),
                ..PropertyPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
