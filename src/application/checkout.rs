use crate::domain::payment::{
    ActivePayment, PaymentOutcome, PaymentRecord, PaymentSession, PaymentSheetConfig, SheetError,
};
use crate::domain::ports::{
    PaymentRecordStoreBox, PaymentSheet, SharedAlertSink, SharedSessionEndpoint,
};
use crate::domain::product::Product;
use crate::error::{AppError, Result};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{error, info, warn};

pub const SETUP_FAILED_MESSAGE: &str =
    "An error has occurred while setting up your payment. Please try again later.";
pub const SUCCESS_MESSAGE: &str = "Your order is confirmed!";
pub const TIMED_OUT_MESSAGE: &str = "The payment sheet was not completed in time.";

/// How a presentation of the payment sheet ended.
enum Presented {
    Done(std::result::Result<(), SheetError>),
    TimedOut,
}

/// Drives one payment attempt at a time through the hosted payment UI.
///
/// The orchestrator owns the active-payment flag. List rows receive a
/// reference to it and read [`PaymentOrchestrator::snapshot`] to decide
/// whether they are the row currently being paid for.
pub struct PaymentOrchestrator {
    endpoint: SharedSessionEndpoint,
    sheet: Box<dyn PaymentSheet>,
    alerts: SharedAlertSink,
    payments: Option<PaymentRecordStoreBox>,
    present_timeout: Option<Duration>,
    state: Mutex<ActivePayment>,
}

/// Marks a payment as active for as long as it is alive.
struct ActiveGuard<'a> {
    state: &'a Mutex<ActivePayment>,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        state.is_active = false;
        state.product_id = None;
    }
}

fn lock(state: &Mutex<ActivePayment>) -> MutexGuard<'_, ActivePayment> {
    // The state is two plain fields, so a panic elsewhere cannot leave it torn.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PaymentOrchestrator {
    pub fn new(
        endpoint: SharedSessionEndpoint,
        sheet: Box<dyn PaymentSheet>,
        alerts: SharedAlertSink,
    ) -> Self {
        Self {
            endpoint,
            sheet,
            alerts,
            payments: None,
            present_timeout: None,
            state: Mutex::new(ActivePayment::default()),
        }
    }

    /// Writes a payment record every time a session is bootstrapped.
    pub fn with_payment_records(mut self, payments: PaymentRecordStoreBox) -> Self {
        self.payments = Some(payments);
        self
    }

    /// Bounds how long the presented sheet may wait for the user.
    pub fn with_present_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.present_timeout = timeout;
        self
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).is_active
    }

    pub fn active_product_id(&self) -> Option<String> {
        lock(&self.state).product_id.clone()
    }

    pub fn snapshot(&self) -> ActivePayment {
        lock(&self.state).clone()
    }

    /// Runs a full payment attempt for `product`.
    ///
    /// Returns `None` without touching the network or the state when another
    /// payment is already in progress.
    pub async fn pay(&self, product: &Product) -> Option<PaymentOutcome> {
        let Some(_guard) = self.try_activate(&product.id) else {
            info!(product_id = %product.id, "payment already in progress, ignoring");
            return None;
        };

        info!(product_id = %product.id, price = %product.price, "starting payment");
        let outcome = self.run(product).await;
        info!(product_id = %product.id, ?outcome, "payment finished");
        Some(outcome)
    }

    fn try_activate(&self, product_id: &str) -> Option<ActiveGuard<'_>> {
        let mut state = lock(&self.state);
        if state.is_active {
            return None;
        }
        state.is_active = true;
        state.product_id = Some(product_id.to_string());
        Some(ActiveGuard { state: &self.state })
    }

    async fn run(&self, product: &Product) -> PaymentOutcome {
        let session = match self.fetch_session(product).await {
            Ok(session) => session,
            Err(e) => return self.setup_failed(e),
        };

        self.record_payment(product).await;

        if let Err(e) = self.init_sheet(session).await {
            return self.setup_failed(e);
        }

        let presented = self.present_sheet().await;
        self.report(presented)
    }

    async fn fetch_session(&self, product: &Product) -> Result<PaymentSession> {
        self.endpoint.payment_session(product.price, &product.id).await
    }

    async fn record_payment(&self, product: &Product) {
        let Some(payments) = &self.payments else {
            return;
        };
        let record = PaymentRecord {
            name: product.name.clone(),
            price: product.price,
        };
        match payments.add_payment(record).await {
            Ok(id) => info!(payment_id = %id, "recorded payment"),
            Err(e) => warn!(error = %e, "failed to record payment"),
        }
    }

    async fn init_sheet(&self, session: PaymentSession) -> Result<()> {
        self.sheet
            .init(PaymentSheetConfig::from(session))
            .await
            .map_err(|e| AppError::SessionInit(e.to_string()))
    }

    async fn present_sheet(&self) -> Presented {
        match self.present_timeout {
            None => Presented::Done(self.sheet.present().await),
            Some(limit) => match tokio::time::timeout(limit, self.sheet.present()).await {
                Ok(result) => Presented::Done(result),
                Err(_) => Presented::TimedOut,
            },
        }
    }

    fn report(&self, presented: Presented) -> PaymentOutcome {
        match presented {
            Presented::Done(Ok(())) => {
                self.alerts.alert("Success", SUCCESS_MESSAGE);
                PaymentOutcome::Success
            }
            Presented::Done(Err(e)) => {
                error!(code = %e.code, message = %e.message, "payment sheet reported an error");
                self.alerts
                    .alert(&format!("Error code: {}", e.code), &e.message);
                if e.is_canceled() {
                    PaymentOutcome::Cancelled
                } else {
                    PaymentOutcome::Failed(e.to_string())
                }
            }
            Presented::TimedOut => {
                error!("payment sheet timed out");
                self.alerts.alert("Error", TIMED_OUT_MESSAGE);
                PaymentOutcome::Failed("timed out".to_string())
            }
        }
    }

    fn setup_failed(&self, e: AppError) -> PaymentOutcome {
        error!(error = %e, "payment setup failed");
        self.alerts.alert("Error", SETUP_FAILED_MESSAGE);
        PaymentOutcome::Failed(e.to_string())
    }
}
