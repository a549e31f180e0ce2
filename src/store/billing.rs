//! Invoices and payments.

use chrono::Utc;
use dashmap::mapref::entry::Entry;

use crate::config::InvoiceConfig;
use crate::store::models::{Invoice, InvoiceStatus, Lease, LeaseStatus, Payment, Period};
use crate::store::{get, next, sorted, Store, StoreError};

impl Store {
    pub fn invoice(&self, id: u64) -> Result<Invoice, StoreError> {
        get(&self.inner.invoices, "invoice", id)
    }

    pub fn invoices(&self) -> Vec<Invoice> {
        sorted(&self.inner.invoices)
    }

    pub fn payments_for(&self, invoice_id: u64) -> Vec<Payment> {
        sorted(&self.inner.payments)
            .into_iter()
            .filter(|p| p.invoice_id == invoice_id)
            .collect()
    }

    /// Invoice every active lease covering `period` that has no invoice for it yet.
    ///
    /// Running this twice for the same period creates nothing the second time.
    pub fn generate_invoices(&self, period: Period, terms: &InvoiceConfig) -> Vec<Invoice> {
        let leases: Vec<Lease> = self
            .inner
            .leases
            .iter()
            .filter(|l| l.status == LeaseStatus::Active)
            .filter(|l| {
                Period::containing(l.start_date) <= period && period <= Period::containing(l.end_date)
            })
            .map(|l| l.value().clone())
            .collect();

        let mut created: Vec<Invoice> = leases
            .iter()
            .filter_map(|lease| self.invoice_once(lease, period, terms.due_day))
            .collect();
        created.sort_by_key(|i| i.id);

        tracing::info!(period = %period, created = created.len(), "Invoices generated");
        created
    }

    /// Create the invoice for (lease, period) unless one exists.
    pub(crate) fn invoice_once(&self, lease: &Lease, period: Period, due_day: u32) -> Option<Invoice> {
        match self.inner.invoice_index.entry((lease.id, period)) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let invoice = Invoice {
                    id: next(&self.inner.ids.invoice),
                    lease_id: lease.id,
                    period,
                    amount_cents: lease.monthly_rent_cents,
                    due_date: period.day(due_day),
                    status: InvoiceStatus::Unpaid,
                    paid_at: None,
                };
                self.inner.invoices.insert(invoice.id, invoice.clone());
                slot.insert(invoice.id);
                self.record(
                    "invoice.issued",
                    format!("invoice {} for lease {} ({period})", invoice.id, lease.id),
                );
                Some(invoice)
            }
        }
    }

    /// Settle an unpaid invoice in full.
    pub fn record_payment(
        &self,
        invoice_id: u64,
        amount_cents: i64,
        method: &str,
    ) -> Result<(Invoice, Payment), StoreError> {
        if method.trim().is_empty() {
            return Err(StoreError::Invalid("payment method is required".into()));
        }

        let invoice = {
            let mut invoice = self
                .inner
                .invoices
                .get_mut(&invoice_id)
                .ok_or(StoreError::NotFound { kind: "invoice", id: invoice_id })?;
            if invoice.status != InvoiceStatus::Unpaid {
                return Err(StoreError::Conflict(format!(
                    "invoice {invoice_id} is not awaiting payment"
                )));
            }
            if amount_cents != invoice.amount_cents {
                return Err(StoreError::Invalid(format!(
                    "payment of {amount_cents} does not match outstanding {}",
                    invoice.amount_cents
                )));
            }
            invoice.status = InvoiceStatus::Paid;
            invoice.paid_at = Some(Utc::now());
            invoice.clone()
        };

        let payment = Payment {
            id: next(&self.inner.ids.payment),
            invoice_id,
            amount_cents,
            method: method.to_string(),
            received_at: Utc::now(),
        };
        self.inner.payments.insert(payment.id, payment.clone());
        self.record("invoice.paid", format!("invoice {invoice_id} via {method}"));
        Ok((invoice, payment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::leasing::NewApplication;
    use crate::store::tests::seeded;
    use chrono::NaiveDate;

    fn active_lease(store: &Store, shop_id: u64, start: &str) -> Lease {
        let terms = InvoiceConfig::default();
        let app = store
            .submit_application(
                shop_id,
                NewApplication {
                    applicant: "Ana".into(),
                    email: "ana@example.com".into(),
                    business: "Florist".into(),
                },
            )
            .unwrap();
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
        let lease = store.approve_application(app.id, start, &terms).unwrap();
        store.activate_lease(lease.id, &terms).unwrap().0
    }

    #[test]
    fn test_generate_is_idempotent_per_period() {
        let store = seeded();
        let terms = InvoiceConfig::default();
        active_lease(&store, 1, "2024-01-01");
        active_lease(&store, 2, "2024-01-01");

        let period: Period = "2024-02".parse().unwrap();
        assert_eq!(store.generate_invoices(period, &terms).len(), 2);
        assert!(store.generate_invoices(period, &terms).is_empty());
        // Two activation invoices plus two for February.
        assert_eq!(store.invoices().len(), 4);
    }

    #[test]
    fn test_generate_skips_months_outside_term() {
        let store = seeded();
        let terms = InvoiceConfig::default();
        active_lease(&store, 1, "2024-06-01");

        assert!(store.generate_invoices("2024-05".parse().unwrap(), &terms).is_empty());
        assert!(store.generate_invoices("2025-06".parse().unwrap(), &terms).is_empty());
        assert_eq!(store.generate_invoices("2025-05".parse().unwrap(), &terms).len(), 1);
    }

    #[test]
    fn test_payment_must_match_amount() {
        let store = seeded();
        active_lease(&store, 1, "2024-01-01");

        let err = store.record_payment(1, 1, "card").unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));

        let (invoice, payment) = store.record_payment(1, 100_000, "card").unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(invoice.paid_at.is_some());
        assert_eq!(payment.invoice_id, 1);
        assert_eq!(store.payments_for(1).len(), 1);

        let err = store.record_payment(1, 100_000, "card").unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_payment_for_unknown_invoice() {
        let err = seeded().record_payment(7, 100, "cash").unwrap_err();
        assert_eq!(err, StoreError::NotFound { kind: "invoice", id: 7 });
    }
}
