//! In-memory record store.
//!
//! # Responsibilities
//! - Hold shops, applications, leases, invoices, payments and tickets
//! - Assign monotonically increasing ids per record kind
//! - Apply state transitions atomically per record
//! - Append an audit entry for every transition
//!
//! # Design Decisions
//! - `Store` is a cheap `Clone` handle around shared `DashMap`s
//! - Listings are sorted by id; map iteration order is never exposed
//! - Never hold a guard on one map while re-entering the same map

pub mod billing;
pub mod leasing;
pub mod maintenance;
pub mod models;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use crate::config::{SeedConfig, ShopSeed};
use crate::store::models::{
    Application, AuditEntry, Invoice, Lease, Payment, Period, Shop, ShopStatus, Ticket,
};

/// Errors raised by store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    /// The record is not in a state that allows the transition.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),
}

#[derive(Default)]
struct Sequences {
    shop: AtomicU64,
    application: AtomicU64,
    lease: AtomicU64,
    invoice: AtomicU64,
    payment: AtomicU64,
    ticket: AtomicU64,
    audit: AtomicU64,
}

fn next(seq: &AtomicU64) -> u64 {
    seq.fetch_add(1, Ordering::Relaxed) + 1
}

#[derive(Default)]
struct Inner {
    shops: DashMap<u64, Shop>,
    applications: DashMap<u64, Application>,
    leases: DashMap<u64, Lease>,
    invoices: DashMap<u64, Invoice>,
    /// (lease, period) → invoice id; one invoice per lease per month.
    invoice_index: DashMap<(u64, Period), u64>,
    payments: DashMap<u64, Payment>,
    tickets: DashMap<u64, Ticket>,
    audit: DashMap<u64, AuditEntry>,
    ids: Sequences,
}

/// Shared handle to the record store.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("shops", &self.inner.shops.len())
            .field("leases", &self.inner.leases.len())
            .field("invoices", &self.inner.invoices.len())
            .field("tickets", &self.inner.tickets.len())
            .finish()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the configured shops in the catalog.
    pub fn from_seed(seed: &SeedConfig) -> Self {
        let store = Self::new();
        for shop in &seed.shops {
            store.add_shop(shop);
        }
        tracing::info!(shops = seed.shops.len(), "Store seeded");
        store
    }

    pub fn add_shop(&self, seed: &ShopSeed) -> Shop {
        let shop = Shop {
            id: next(&self.inner.ids.shop),
            code: seed.code.clone(),
            name: seed.name.clone(),
            floor: seed.floor,
            area_sqm: seed.area_sqm,
            monthly_rent_cents: seed.monthly_rent_cents,
            status: ShopStatus::Available,
        };
        self.inner.shops.insert(shop.id, shop.clone());
        shop
    }

    pub fn shop(&self, id: u64) -> Result<Shop, StoreError> {
        get(&self.inner.shops, "shop", id)
    }

    pub fn shops(&self) -> Vec<Shop> {
        sorted(&self.inner.shops)
    }

    pub fn audit_log(&self) -> Vec<AuditEntry> {
        sorted(&self.inner.audit)
    }

    fn set_shop_status(&self, id: u64, status: ShopStatus) -> Result<(), StoreError> {
        let mut shop = self
            .inner
            .shops
            .get_mut(&id)
            .ok_or(StoreError::NotFound { kind: "shop", id })?;
        shop.status = status;
        Ok(())
    }

    fn record(&self, action: &str, subject: String) {
        tracing::info!(action, subject = %subject, "Audit");
        let entry = AuditEntry {
            id: next(&self.inner.ids.audit),
            at: Utc::now(),
            action: action.to_string(),
            subject,
        };
        self.inner.audit.insert(entry.id, entry);
    }
}

fn get<T: Clone>(map: &DashMap<u64, T>, kind: &'static str, id: u64) -> Result<T, StoreError> {
    map.get(&id)
        .map(|r| r.value().clone())
        .ok_or(StoreError::NotFound { kind, id })
}

fn sorted<T: Clone>(map: &DashMap<u64, T>) -> Vec<T> {
    let mut entries: Vec<(u64, T)> = map
        .iter()
        .map(|r| (*r.key(), r.value().clone()))
        .collect();
    entries.sort_by_key(|(id, _)| *id);
    entries.into_iter().map(|(_, v)| v).collect()
}
