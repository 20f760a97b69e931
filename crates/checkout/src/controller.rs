//! Submission controller: the checkout's single writer.

use std::sync::Arc;
use std::time::Instant;

use domain::{
    Catalog, FieldErrors, FormField, OrderDraft, OrderForm, OrderTotals, QuantityMap,
    QuantityStore, validate,
};
use tokio::sync::Mutex;

use crate::error::{CheckoutError, ExchangeError, Result};
use crate::receipt::Receipt;
use crate::services::exchange::SubmissionExchange;
use crate::state::{FailureReason, SubmissionState};

/// Everything the buyer sees, read under one lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSnapshot {
    pub state: SubmissionState,
    pub quantities: QuantityMap,
    pub totals: OrderTotals,
    pub can_submit: bool,
    pub field_errors: Option<FieldErrors>,
    /// Receipt of the accepted order, while the state is `Succeeded`.
    pub last_receipt: Option<Receipt>,
}

/// Live checkout state guarded by the controller.
#[derive(Debug, Default)]
struct CheckoutSession {
    /// `None` until an event has been selected.
    store: Option<QuantityStore>,
    form: OrderForm,
    state: SubmissionState,
    /// Bumped on every submission start, reset and teardown. A settlement
    /// carrying an older value is discarded.
    generation: u64,
    closed: bool,
    last_receipt: Option<Receipt>,
}

impl CheckoutSession {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(CheckoutError::Closed);
        }
        Ok(())
    }

    /// Gate for every edit of the live order.
    fn begin_edit(&mut self) -> Result<()> {
        self.ensure_open()?;
        if !self.state.can_edit() {
            return Err(CheckoutError::SubmissionInProgress);
        }
        // Editing after a completed order starts a new one.
        if self.state == SubmissionState::Succeeded {
            self.state = SubmissionState::Idle;
        }
        Ok(())
    }

    fn store_mut(&mut self) -> Result<&mut QuantityStore> {
        self.store.as_mut().ok_or(CheckoutError::NoCatalogSelected)
    }

    fn totals(&self) -> OrderTotals {
        self.store
            .as_ref()
            .map(|store| OrderTotals::compute(store.catalog(), &store.snapshot()))
            .unwrap_or_default()
    }

    fn quantities(&self) -> QuantityMap {
        self.store
            .as_ref()
            .map(QuantityStore::snapshot)
            .unwrap_or_default()
    }

    fn can_submit(&self) -> bool {
        !self.closed && self.state.can_submit() && self.totals().ticket_count > 0
    }

    fn field_errors(&self) -> Option<FieldErrors> {
        match &self.state {
            SubmissionState::Failed(FailureReason::Validation(errors)) => Some(errors.clone()),
            _ => None,
        }
    }

    fn snapshot(&self) -> CheckoutSnapshot {
        CheckoutSnapshot {
            state: self.state.clone(),
            quantities: self.quantities(),
            totals: self.totals(),
            can_submit: self.can_submit(),
            field_errors: self.field_errors(),
            last_receipt: match self.state {
                SubmissionState::Succeeded => self.last_receipt.clone(),
                _ => None,
            },
        }
    }

    fn begin_submission(
        &mut self,
        draft: Option<OrderDraft>,
    ) -> Result<(OrderDraft, OrderTotals, u64)> {
        self.ensure_open()?;
        match self.state {
            SubmissionState::Submitting => return Err(CheckoutError::SubmissionInProgress),
            SubmissionState::Succeeded => {
                return Err(CheckoutError::InvalidState {
                    state: self.state.as_str(),
                    action: "submit",
                });
            }
            SubmissionState::Idle | SubmissionState::Failed(_) => {}
        }

        let store = self.store.as_ref().ok_or(CheckoutError::NoCatalogSelected)?;
        let draft = draft.unwrap_or_else(|| OrderDraft::assemble(&self.form, store.snapshot()));

        if let Err(errors) = validate(&draft, store.catalog()).into_result() {
            tracing::info!(errors = %errors, "order failed validation");
            self.state = SubmissionState::Failed(FailureReason::Validation(errors.clone()));
            return Err(CheckoutError::Validation(errors));
        }

        let totals = OrderTotals::compute(store.catalog(), &draft.quantities);

        self.generation += 1;
        self.state = SubmissionState::Submitting;
        tracing::info!(generation = self.generation, "submission started");
        Ok((draft, totals, self.generation))
    }

    fn settle(
        &mut self,
        generation: u64,
        outcome: std::result::Result<Receipt, ExchangeError>,
    ) -> Result<Receipt> {
        if self.closed || generation != self.generation || !self.state.is_submitting() {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale submission result"
            );
            return Err(CheckoutError::Stale);
        }

        match outcome {
            Ok(receipt) => {
                if let Some(store) = self.store.as_mut() {
                    store.clear();
                }
                self.form = OrderForm::default();
                self.state = SubmissionState::Succeeded;
                self.last_receipt = Some(receipt.clone());
                tracing::info!(confirmation = %receipt.confirmation, "order submitted");
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(error = %e, "order submission failed");
                self.state = SubmissionState::Failed(FailureReason::Submission(e.to_string()));
                Err(CheckoutError::Submission(e))
            }
        }
    }
}

/// Drives a ticket order through validate → submit → settle.
///
/// Cloning yields another handle to the same checkout. The session lock is
/// held only for synchronous steps and never across the exchange call, so a
/// second `submit` during flight is observed as `Submitting` and rejected
/// rather than queued.
pub struct SubmissionController<X: SubmissionExchange> {
    exchange: Arc<X>,
    session: Arc<Mutex<CheckoutSession>>,
}

impl<X: SubmissionExchange> Clone for SubmissionController<X> {
    fn clone(&self) -> Self {
        Self {
            exchange: Arc::clone(&self.exchange),
            session: Arc::clone(&self.session),
        }
    }
}

impl<X: SubmissionExchange> SubmissionController<X> {
    /// Creates a controller with no event selected.
    pub fn new(exchange: X) -> Self {
        Self {
            exchange: Arc::new(exchange),
            session: Arc::default(),
        }
    }

    /// Creates a controller for the given catalog.
    pub fn with_catalog(exchange: X, catalog: Catalog) -> Self {
        let session = CheckoutSession {
            store: Some(QuantityStore::new(catalog)),
            ..CheckoutSession::default()
        };
        Self {
            exchange: Arc::new(exchange),
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Returns the exchange used for submissions.
    pub fn exchange(&self) -> &X {
        &self.exchange
    }

    /// Switches to another event's catalog, zeroing the selection.
    #[tracing::instrument(skip(self, catalog), fields(offerings = catalog.len()))]
    pub async fn change_catalog(&self, catalog: Catalog) -> Result<()> {
        let mut session = self.session.lock().await;
        session.begin_edit()?;

        match session.store.as_mut() {
            Some(store) => store.initialize(catalog),
            None => session.store = Some(QuantityStore::new(catalog)),
        }
        session.state = SubmissionState::Idle;
        Ok(())
    }

    /// Sets one offering's quantity and returns the recomputed totals.
    #[tracing::instrument(skip(self))]
    pub async fn set_quantity(&self, offering_type: &str, value: i64) -> Result<OrderTotals> {
        let mut session = self.session.lock().await;
        session.begin_edit()?;
        session.store_mut()?.set_quantity(offering_type, value)?;

        metrics::counter!("checkout_quantity_changes_total").increment(1);
        Ok(session.totals())
    }

    /// Replaces one form field.
    #[tracing::instrument(skip(self, value))]
    pub async fn set_field(&self, field: FormField, value: impl Into<String>) -> Result<()> {
        let mut session = self.session.lock().await;
        session.begin_edit()?;
        session.form.set(field, value);
        Ok(())
    }

    /// Replaces several form fields together; either all apply or none do.
    #[tracing::instrument(skip_all)]
    pub async fn set_fields<I, V>(&self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = (FormField, V)>,
        V: Into<String>,
    {
        let mut session = self.session.lock().await;
        session.begin_edit()?;
        for (field, value) in updates {
            session.form.set(field, value);
        }
        Ok(())
    }

    /// Submits the order assembled from the live form and quantities.
    pub async fn submit(&self) -> Result<Receipt> {
        self.run_submission(None).await
    }

    /// Submits a caller-built draft against the active catalog.
    pub async fn submit_draft(&self, draft: OrderDraft) -> Result<Receipt> {
        self.run_submission(Some(draft)).await
    }

    #[tracing::instrument(skip(self, draft))]
    async fn run_submission(&self, draft: Option<OrderDraft>) -> Result<Receipt> {
        let started = Instant::now();

        let begun = self.session.lock().await.begin_submission(draft);
        let (draft, totals, generation) = match begun {
            Ok(begun) => begun,
            Err(e) => {
                let outcome = if e.is_rejection() { "rejected" } else { "invalid" };
                metrics::counter!("checkout_submissions_total", "outcome" => outcome).increment(1);
                return Err(e);
            }
        };

        let outcome = self.exchange.submit_order(&draft, totals).await;

        let settled = self.session.lock().await.settle(generation, outcome);
        let label = match &settled {
            Ok(_) => "accepted",
            Err(CheckoutError::Stale) => "stale",
            Err(_) => "failed",
        };
        metrics::counter!("checkout_submissions_total", "outcome" => label).increment(1);
        metrics::histogram!("checkout_submission_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        settled
    }

    /// Returns to `Idle`, zeroes the selection and clears any stored error.
    ///
    /// An exchange still in flight is discarded when it settles.
    #[tracing::instrument(skip(self))]
    pub async fn reset(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        session.ensure_open()?;

        if let Some(store) = session.store.as_mut() {
            store.clear();
        }
        session.generation += 1;
        session.state = SubmissionState::Idle;
        Ok(())
    }

    /// Closes the checkout. Any later settlement or call becomes a no-op error.
    #[tracing::instrument(skip(self))]
    pub async fn teardown(&self) {
        let mut session = self.session.lock().await;
        session.closed = true;
        session.generation += 1;
    }

    /// Returns the current submission state.
    pub async fn state(&self) -> SubmissionState {
        self.session.lock().await.state.clone()
    }

    /// Returns the current ticket count and total cost.
    pub async fn totals(&self) -> OrderTotals {
        self.session.lock().await.totals()
    }

    /// Returns a copy of the current selection.
    pub async fn quantities(&self) -> QuantityMap {
        self.session.lock().await.quantities()
    }

    /// Returns state, selection, totals and errors as one consistent view.
    pub async fn snapshot(&self) -> CheckoutSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Returns the active catalog, if an event is selected.
    pub async fn catalog(&self) -> Option<Catalog> {
        self.session
            .lock()
            .await
            .store
            .as_ref()
            .map(|store| store.catalog().clone())
    }

    /// Returns a copy of the live form fields.
    pub async fn form(&self) -> OrderForm {
        self.session.lock().await.form.clone()
    }

    /// Whether the submit action should be offered to the buyer.
    ///
    /// False with no tickets selected or while a submission is in flight.
    pub async fn can_submit(&self) -> bool {
        self.session.lock().await.can_submit()
    }

    /// Returns the field errors of the last failed validation.
    pub async fn field_errors(&self) -> Option<FieldErrors> {
        self.session.lock().await.field_errors()
    }

    /// Returns the receipt of the most recent accepted order.
    pub async fn last_receipt(&self) -> Option<Receipt> {
        self.session.lock().await.last_receipt.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemorySubmissionExchange;
    use domain::{Money, Offering};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Offering::new("GA", "General Admission", "", Money::from_cents(2500)),
            Offering::new("VIP", "VIP", "", Money::from_cents(9000)),
        ])
        .unwrap()
    }

    fn controller() -> SubmissionController<InMemorySubmissionExchange> {
        SubmissionController::with_catalog(InMemorySubmissionExchange::new(), catalog())
    }

    #[tokio::test]
    async fn test_set_quantity_returns_totals() {
        let checkout = controller();
        checkout.set_quantity("GA", 2).await.unwrap();
        let totals = checkout.set_quantity("VIP", 1).await.unwrap();

        assert_eq!(totals.ticket_count, 3);
        assert_eq!(totals.total.cents(), 14000);
    }

    #[tokio::test]
    async fn test_quantity_errors_surface_as_domain_errors() {
        let checkout = controller();

        let err = checkout.set_quantity("GA", 10).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Domain(_)));

        let err = checkout.set_quantity("NOPE", 1).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Domain(_)));
        assert!(checkout.quantities().await.is_all_zero());
    }

    #[tokio::test]
    async fn test_no_catalog_selected() {
        let checkout = SubmissionController::new(InMemorySubmissionExchange::new());

        assert!(matches!(
            checkout.set_quantity("GA", 1).await,
            Err(CheckoutError::NoCatalogSelected)
        ));
        assert!(matches!(
            checkout.submit().await,
            Err(CheckoutError::NoCatalogSelected)
        ));
        assert_eq!(checkout.totals().await, OrderTotals::default());
        assert!(checkout.catalog().await.is_none());
    }

    #[tokio::test]
    async fn test_change_catalog_resets_selection_and_state() {
        let checkout = controller();
        checkout.set_quantity("VIP", 2).await.unwrap();
        let _ = checkout.submit().await;
        assert!(checkout.state().await.failure().is_some());

        let lawn = Catalog::new(vec![Offering::new("LAWN", "Lawn", "", Money::from_cents(1500))])
            .unwrap();
        checkout.change_catalog(lawn).await.unwrap();

        assert_eq!(checkout.state().await, SubmissionState::Idle);
        assert!(!checkout.quantities().await.contains("VIP"));
        assert!(checkout.set_quantity("LAWN", 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_can_submit_requires_tickets() {
        let checkout = controller();
        assert!(!checkout.can_submit().await);

        checkout.set_quantity("GA", 1).await.unwrap();
        assert!(checkout.can_submit().await);

        checkout.set_quantity("GA", 0).await.unwrap();
        assert!(!checkout.can_submit().await);
    }

    #[tokio::test]
    async fn test_failed_validation_keeps_field_errors() {
        let checkout = controller();
        checkout.set_quantity("GA", 1).await.unwrap();
        checkout.set_field(FormField::FirstName, "Ada").await.unwrap();

        let errors = match checkout.submit().await {
            Err(CheckoutError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert!(!errors.contains("firstName"));
        assert_eq!(checkout.field_errors().await, Some(errors));
        assert_eq!(checkout.exchange().order_count(), 0);
    }

    #[tokio::test]
    async fn test_set_fields_applies_every_update() {
        let checkout = controller();

        checkout
            .set_fields([
                (FormField::FirstName, "Ada"),
                (FormField::CcSecurity, "123"),
            ])
            .await
            .unwrap();

        let form = checkout.form().await;
        assert_eq!(form.first_name, "Ada");
        assert_eq!(form.cc_security, "123");
        assert!(form.last_name.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_after_success_is_consistent() {
        let checkout = controller();
        checkout
            .set_fields(FormField::ALL.map(|field| (field, "filled")))
            .await
            .unwrap();
        checkout.set_quantity("VIP", 2).await.unwrap();

        let receipt = checkout.submit().await.unwrap();
        let view = checkout.snapshot().await;

        assert_eq!(view.state, SubmissionState::Succeeded);
        assert!(view.quantities.is_all_zero());
        assert_eq!(view.totals, OrderTotals::default());
        assert!(!view.can_submit);
        assert_eq!(view.field_errors, None);
        assert_eq!(view.last_receipt, Some(receipt));
    }

    #[tokio::test]
    async fn test_snapshot_hides_receipt_once_a_new_order_starts() {
        let checkout = controller();
        checkout
            .set_fields(FormField::ALL.map(|field| (field, "filled")))
            .await
            .unwrap();
        checkout.set_quantity("GA", 1).await.unwrap();
        checkout.submit().await.unwrap();

        checkout.set_quantity("GA", 1).await.unwrap();
        let view = checkout.snapshot().await;

        assert_eq!(view.state, SubmissionState::Idle);
        assert_eq!(view.last_receipt, None);
        assert_eq!(view.totals.ticket_count, 1);
        assert!(view.can_submit);
    }

    #[tokio::test]
    async fn test_teardown_closes_checkout() {
        let checkout = controller();
        checkout.teardown().await;

        assert!(matches!(
            checkout.set_quantity("GA", 1).await,
            Err(CheckoutError::Closed)
        ));
        assert!(matches!(checkout.submit().await, Err(CheckoutError::Closed)));
        assert!(matches!(checkout.reset().await, Err(CheckoutError::Closed)));
        assert!(matches!(
            checkout.set_fields([(FormField::Address, "x")]).await,
            Err(CheckoutError::Closed)
        ));
        assert!(!checkout.can_submit().await);
    }
}
