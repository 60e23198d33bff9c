//! Terminal stand-ins for the hosted payment UI, the customer sheet and
//! alert dialogs, so every flow can be driven from the CLI.

use crate::domain::payment::{CustomerCredentials, PaymentSheetConfig, SheetError};
use crate::domain::ports::{AlertSink, CustomerSheet, PaymentSheet};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::info;

/// Prints alerts as a title line followed by the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAlerts;

impl AlertSink for ConsoleAlerts {
    fn alert(&self, title: &str, message: &str) {
        info!(%title, %message, "alert");
        println!("[{}] {}", title, message);
    }
}

async fn read_answer<R>(input: &tokio::sync::Mutex<R>) -> Option<String>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut line = String::new();
    let mut input = input.lock().await;
    match input.read_line(&mut line).await {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_lowercase()),
    }
}

/// Asks for confirmation on the terminal instead of collecting card details.
pub struct ConsolePaymentSheet<R = BufReader<Stdin>> {
    input: tokio::sync::Mutex<R>,
    config: Mutex<Option<PaymentSheetConfig>>,
}

impl ConsolePaymentSheet {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> ConsolePaymentSheet<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self {
            input: tokio::sync::Mutex::new(input),
            config: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<R> PaymentSheet for ConsolePaymentSheet<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn init(&self, config: PaymentSheetConfig) -> Result<(), SheetError> {
        if config.payment_intent_client_secret.is_empty() {
            return Err(SheetError::new("Failed", "Missing payment intent client secret"));
        }
        let mut slot = self
            .config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(config);
        Ok(())
    }

    async fn present(&self) -> Result<(), SheetError> {
        // A sheet is good for one presentation.
        let config = self
            .config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .ok_or_else(|| SheetError::new("Failed", "The payment sheet has not been initialized"))?;

        println!(
            "{} is requesting a payment (customer {}).",
            config.merchant_display_name, config.customer_id
        );
        println!("Confirm payment? [y/N]");

        match read_answer(&self.input).await.as_deref() {
            Some("y") | Some("yes") => Ok(()),
            _ => Err(SheetError::canceled()),
        }
    }
}

/// Shows the customer the sheet would be bound to and waits for Enter.
pub struct ConsoleCustomerSheet<R = BufReader<Stdin>> {
    input: tokio::sync::Mutex<R>,
}

impl ConsoleCustomerSheet {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> ConsoleCustomerSheet<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self {
            input: tokio::sync::Mutex::new(input),
        }
    }
}

#[async_trait]
impl<R> CustomerSheet for ConsoleCustomerSheet<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn present(&self, credentials: &CustomerCredentials) -> Result<(), SheetError> {
        println!("Managing payment methods for customer {}.", credentials.customer_id);
        println!("Press Enter to close.");
        read_answer(&self.input).await;
        Ok(())
    }
}
