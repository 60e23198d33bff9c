use crate::domain::payment::CustomerCredentials;
use crate::domain::ports::{CustomerSheet, SharedAlertSink, SharedSessionEndpoint};
use crate::error::Result;
use std::sync::Mutex;
use tracing::{error, info, warn};

pub const LOAD_FAILED_MESSAGE: &str =
    "Your payment information could not be loaded. Please try again later.";

/// Component state behind the "Edit Payment Info" header action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    /// Last credentials fetched; kept after the sheet closes.
    pub credentials: Option<CustomerCredentials>,
    pub visible: bool,
}

/// Opens the hosted "manage payment methods" sheet for the current customer.
pub struct PaymentMethodEditor {
    endpoint: SharedSessionEndpoint,
    sheet: Box<dyn CustomerSheet>,
    alerts: SharedAlertSink,
    state: Mutex<EditorState>,
}

impl PaymentMethodEditor {
    pub fn new(
        endpoint: SharedSessionEndpoint,
        sheet: Box<dyn CustomerSheet>,
        alerts: SharedAlertSink,
    ) -> Self {
        Self {
            endpoint,
            sheet,
            alerts,
            state: Mutex::new(EditorState::default()),
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut EditorState)) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state);
    }

    /// Fetches fresh credentials and shows the sheet until the user closes it.
    ///
    /// A fetch failure is alerted and leaves the previous state untouched.
    pub async fn open_editor(&self) -> Result<()> {
        let credentials = match self.endpoint.customer_credentials().await {
            Ok(credentials) => credentials,
            Err(e) => {
                error!(error = %e, "failed to load customer credentials");
                self.alerts.alert("Error", LOAD_FAILED_MESSAGE);
                return Err(e);
            }
        };
        info!(customer_id = %credentials.customer_id, "opening payment method editor");

        self.update(|state| {
            state.credentials = Some(credentials.clone());
            state.visible = true;
        });

        if let Err(e) = self.sheet.present(&credentials).await {
            warn!(code = %e.code, message = %e.message, "customer sheet closed with an error");
        }

        self.close();
        Ok(())
    }

    /// Hides the sheet. Credentials are left in place.
    pub fn close(&self) {
        self.update(|state| state.visible = false);
    }
}
