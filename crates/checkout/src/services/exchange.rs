//! Submission exchange trait and in-memory implementation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use domain::{OrderDraft, OrderTotals};
use tokio::sync::watch;

use crate::error::ExchangeError;
use crate::receipt::Receipt;

/// The call that attempts to commit an order.
#[async_trait]
pub trait SubmissionExchange: Send + Sync {
    /// Submits a validated draft, charging the priced `totals`.
    async fn submit_order(
        &self,
        draft: &OrderDraft,
        totals: OrderTotals,
    ) -> Result<Receipt, ExchangeError>;
}

#[derive(Debug, Default)]
struct InMemoryExchangeState {
    orders: Vec<(String, OrderDraft)>,
    next_id: u32,
    fail_on_submit: bool,
}

/// In-memory submission exchange simulating a network round trip.
///
/// Submissions wait out the configured latency, then succeed unless told to
/// fail. While [`hold`](Self::hold) is in effect, submissions stay pending
/// until [`release`](Self::release).
#[derive(Debug, Clone)]
pub struct InMemorySubmissionExchange {
    state: Arc<Mutex<InMemoryExchangeState>>,
    latency: Duration,
    held: Arc<watch::Sender<bool>>,
}

impl Default for InMemorySubmissionExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySubmissionExchange {
    /// Creates an exchange that answers immediately.
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Creates an exchange that answers after `latency`.
    pub fn with_latency(latency: Duration) -> Self {
        let (held, _) = watch::channel(false);
        Self {
            state: Arc::default(),
            latency,
            held: Arc::new(held),
        }
    }

    fn state(&self) -> MutexGuard<'_, InMemoryExchangeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configures the service to decline submissions.
    pub fn set_fail_on_submit(&self, fail: bool) {
        self.state().fail_on_submit = fail;
    }

    /// Keeps subsequent submissions pending until released.
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    /// Lets pending and future submissions complete.
    pub fn release(&self) {
        self.held.send_replace(false);
    }

    /// Returns the number of accepted orders.
    pub fn order_count(&self) -> usize {
        self.state().orders.len()
    }

    /// Returns the accepted draft for a confirmation code.
    pub fn order(&self, confirmation: &str) -> Option<OrderDraft> {
        self.state()
            .orders
            .iter()
            .find(|(code, _)| code == confirmation)
            .map(|(_, draft)| draft.clone())
    }
}

#[async_trait]
impl SubmissionExchange for InMemorySubmissionExchange {
    async fn submit_order(
        &self,
        draft: &OrderDraft,
        totals: OrderTotals,
    ) -> Result<Receipt, ExchangeError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut held = self.held.subscribe();
        if held.wait_for(|held| !held).await.is_err() {
            return Err(ExchangeError::Unavailable("exchange shut down".to_string()));
        }

        let mut state = self.state();

        if state.fail_on_submit {
            return Err(ExchangeError::Declined("Payment declined".to_string()));
        }

        state.next_id += 1;
        let confirmation = format!("ORD-{:04}", state.next_id);
        state.orders.push((confirmation.clone(), draft.clone()));

        Ok(Receipt::issue(confirmation, totals))
    }
}
