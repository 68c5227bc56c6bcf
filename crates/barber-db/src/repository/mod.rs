//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                           │
//! │       │  db.sales().list(&filter, SortOrder::Newest)                    │
//! │       ▼                                                                 │
//! │  SaleRepository                                                         │
//! │  ├── insert(&self, new_sale)                                            │
//! │  ├── list(&self, filter, order)                                         │
//! │  ├── totals(&self, barber, today)                                       │
//! │  └── soft_delete(&self, id, at)                                         │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod sale;
