//! # Domain Types
//!
//! Core domain types used throughout Barbearia POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    SaleDraft    │   │      Sale       │   │   SalesTotals   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  client         │──►│  id (UUID)      │   │  today          │       │
//! │  │  barber         │   │  sale_date      │   │  month          │       │
//! │  │  service prices │   │  sale_time      │   └─────────────────┘       │
//! │  │  product        │   │  total          │                             │
//! │  │  discount       │   │  deleted_at     │   ┌─────────────────┐       │
//! │  └─────────────────┘   └─────────────────┘   │      Role       │       │
//! │                                              │  Admin / Barber │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// What a logged-in user is allowed to see and do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shop owner: sees every barber, records sales for anyone.
    Admin,
    /// A barber: sees and records only their own sales.
    #[serde(rename = "barbeiro")]
    Barber,
}

impl Role {
    /// Returns true for the admin role.
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Wire name as stored in config files and session tokens.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Barber => "barbeiro",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "barbeiro" | "barber" => Ok(Role::Barber),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "barbeiro".to_string()],
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// Public view of a configured user (never carries the password).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Normalized (trimmed, lowercase) login name.
    pub username: String,
    /// Name shown on pages.
    pub display_name: String,
    pub role: Role,
}

// =============================================================================
// Sale Draft
// =============================================================================

/// The user-entered part of a sale, before it gets an id and a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    pub client: String,
    /// Username of the barber credited with the sale.
    pub barber: String,
    pub haircut: Money,
    pub beard: Money,
    pub eyebrow: Money,
    /// Product sold at the counter, if any.
    pub product_name: Option<String>,
    pub product_price: Money,
    pub discount: Money,
}

impl SaleDraft {
    /// Sum of services and product minus discount, never below zero.
    ///
    /// ## Example
    /// ```rust
    /// use barber_core::{Money, SaleDraft};
    ///
    /// let draft = SaleDraft {
    ///     client: "Pedro".into(),
    ///     barber: "artur".into(),
    ///     haircut: Money::from_cents(3000),
    ///     beard: Money::zero(),
    ///     eyebrow: Money::zero(),
    ///     product_name: None,
    ///     product_price: Money::zero(),
    ///     discount: Money::from_cents(5000),
    /// };
    /// assert!(draft.total().is_zero());
    /// ```
    pub fn total(&self) -> Money {
        (self.services() + self.product_price - self.discount).clamp_non_negative()
    }

    /// Sum of the three services.
    pub fn services(&self) -> Money {
        self.haircut + self.beard + self.eyebrow
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    /// UUID v4.
    pub id: String,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
    /// Shop-local calendar day of the sale.
    pub sale_date: NaiveDate,
    /// Shop-local time of day, `HH:MM`.
    pub sale_time: String,
    pub client: String,
    pub barber: String,
    pub haircut: Money,
    pub beard: Money,
    pub eyebrow: Money,
    pub product_name: Option<String>,
    pub product_price: Money,
    pub discount: Money,
    pub total: Money,
    /// Set when an admin removes the sale; such rows are hidden everywhere.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Returns true once the sale has been soft-deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Running totals shown above the history table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesTotals {
    /// Sum of today's sales.
    pub today: Money,
    /// Sum from the first of the month through today.
    pub month: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
