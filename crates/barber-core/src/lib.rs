//! # barber-core: Pure Business Logic for Barbearia POS
//!
//! This crate holds the sale math, input parsing and report scoping rules
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Barbearia POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser (HTML forms)                         │   │
//! │  │        Login ──► Registrar venda ──► Histórico ──► CSV          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/web (axum)                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ barber-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  filter   │  │  export   │  │   │
//! │  │   │   Sale    │  │   Money   │  │ DateRange │  │   CSV     │  │   │
//! │  │   │   Role    │  │  parsing  │  │ SaleFilter│  │  layout   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    barber-db (Database Layer)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sale, SaleDraft, Role, ...)
//! - [`money`] - Money type with integer arithmetic and lenient parsing
//! - [`filter`] - Date range and role scoping for history/export
//! - [`export`] - CSV layout for downloads and legacy imports
//! - [`error`] - Domain error types
//! - [`validation`] - Form field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use barber_core::money::Money;
//! use barber_core::types::SaleDraft;
//!
//! let draft = SaleDraft {
//!     client: "João".to_string(),
//!     barber: "vini".to_string(),
//!     haircut: Money::parse_lenient("35,00"),
//!     beard: Money::parse_lenient("20"),
//!     eyebrow: Money::zero(),
//!     product_name: None,
//!     product_price: Money::zero(),
//!     discount: Money::parse_lenient("5"),
//! };
//!
//! assert_eq!(draft.total().to_string(), "50.00");
//! ```

pub mod error;
pub mod export;
pub mod filter;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use filter::{DateRange, SaleFilter};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Products offered at the counter when no list is configured.
pub const DEFAULT_PRODUCTS: &[&str] = &["Gel de cabelo", "Espuma de barbear", "Xampu"];

/// Maximum length of free-text fields (client and product names).
pub const MAX_TEXT_LEN: usize = 120;

/// Largest amount accepted in any single money field: R$ 1.000.000,00.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;
