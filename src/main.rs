use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use sheetpay::application::catalog::CatalogLoader;
use sheetpay::application::checkout::PaymentOrchestrator;
use sheetpay::application::editor::PaymentMethodEditor;
use sheetpay::application::product_form::{Glyph, ProductForm, SubmissionOutcome};
use sheetpay::config::Config;
use sheetpay::domain::payment::PaymentOutcome;
use sheetpay::domain::ports::{PaymentRecordStoreBox, SharedProductStore};
use sheetpay::error::AppError;
use sheetpay::infrastructure::console::{
    ConsoleAlerts, ConsoleCustomerSheet, ConsolePaymentSheet,
};
use sheetpay::infrastructure::firestore::FirestoreStore;
use sheetpay::infrastructure::functions::HttpSessionEndpoint;
use sheetpay::infrastructure::in_memory::{InMemoryPaymentRecordStore, InMemoryProductStore};
use sheetpay::interfaces::csv::product_writer::ProductWriter;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the payment functions (overrides SHEETPAY_FUNCTIONS_URL)
    #[arg(long, global = true)]
    functions_url: Option<String>,

    /// Keep products and payments in memory instead of the document store.
    /// The store lives for one command, so `pay` rejects it.
    #[arg(long, global = true)]
    in_memory: bool,

    /// Give up on the payment sheet after this many seconds
    #[arg(long, global = true)]
    payment_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the catalog as CSV
    Products,
    /// Add a product to the catalog
    Add {
        #[arg(long, default_value = "")]
        name: String,
        /// Price in major units, e.g. 12.50
        #[arg(long, default_value = "")]
        price: String,
    },
    /// Pay for a product through the payment sheet
    Pay { product_id: String },
    /// Manage the customer's saved payment methods
    EditPayment,
}

struct Stores {
    products: SharedProductStore,
    payments: PaymentRecordStoreBox,
}

fn open_stores(config: &Config, in_memory: bool) -> Result<Stores> {
    if in_memory {
        return Ok(Stores {
            products: Arc::new(InMemoryProductStore::new()),
            payments: Box::new(InMemoryPaymentRecordStore::new()),
        });
    }

    let project_id = config.require_project_id().into_diagnostic()?;
    let store = FirestoreStore::new(
        config.firestore_url.clone(),
        project_id,
        config.api_key.clone(),
    );
    Ok(Stores {
        products: Arc::new(store.clone()),
        payments: Box::new(store),
    })
}

fn session_endpoint(config: &Config) -> Result<Arc<HttpSessionEndpoint>> {
    let url = config.require_functions_url().into_diagnostic()?;
    Ok(Arc::new(HttpSessionEndpoint::new(url, config.currency.clone())))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "sheetpay=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if cli.functions_url.is_some() {
        config.functions_url = cli.functions_url;
    }
    if let Some(secs) = cli.payment_timeout_secs {
        config.payment_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    match cli.command {
        Command::Products => {
            let stores = open_stores(&config, cli.in_memory)?;
            let products = CatalogLoader::new(stores.products)
                .list_products()
                .await
                .into_diagnostic()?;

            let stdout = io::stdout();
            let mut writer = ProductWriter::new(stdout.lock());
            writer.write_products(&products).into_diagnostic()?;
        }
        Command::Add { name, price } => {
            let stores = open_stores(&config, cli.in_memory)?;
            let form = ProductForm::new(stores.products);

            match form.submit(&name, &price).await {
                Err(errors) => {
                    for (field, message) in &errors.fields {
                        eprintln!("{}: {}", field, message);
                    }
                    return Err(AppError::Validation(errors)).into_diagnostic();
                }
                Ok(outcome) => {
                    let glyph = match outcome.glyph() {
                        Glyph::Checkmark => "✔",
                        Glyph::Alert => "⚠",
                    };
                    match outcome {
                        SubmissionOutcome::Created(id) => println!("{} {}", glyph, id),
                        SubmissionOutcome::Failed(reason) => {
                            eprintln!("{} {}", glyph, reason);
                            return Err(miette!("product was not created"));
                        }
                    }
                }
            }
        }
        Command::Pay { product_id } => {
            if cli.in_memory {
                // Each process starts with an empty in-memory catalog.
                return Err(miette!("pay needs the document store; --in-memory is not supported"));
            }
            let endpoint = session_endpoint(&config)?;
            let stores = open_stores(&config, cli.in_memory)?;

            let products = CatalogLoader::new(stores.products)
                .list_products()
                .await
                .into_diagnostic()?;
            let product = products
                .into_iter()
                .find(|p| p.id == product_id)
                .ok_or_else(|| miette!("product {} not found", product_id))?;

            let mut orchestrator = PaymentOrchestrator::new(
                endpoint,
                Box::new(ConsolePaymentSheet::stdin()),
                Arc::new(ConsoleAlerts),
            )
            .with_present_timeout(config.payment_timeout);
            if config.record_payments {
                orchestrator = orchestrator.with_payment_records(stores.payments);
            }

            match orchestrator.pay(&product).await {
                Some(PaymentOutcome::Failed(reason)) => {
                    return Err(miette!("payment failed: {}", reason));
                }
                Some(outcome) => println!("{:?}", outcome),
                None => return Err(miette!("a payment is already in progress")),
            }
        }
        Command::EditPayment => {
            let endpoint = session_endpoint(&config)?;
            let editor = PaymentMethodEditor::new(
                endpoint,
                Box::new(ConsoleCustomerSheet::stdin()),
                Arc::new(ConsoleAlerts),
            );
            editor.open_editor().await.into_diagnostic()?;
        }
    }

    Ok(())
}
