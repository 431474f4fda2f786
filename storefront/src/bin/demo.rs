//! Command-line walkthrough of the storefront.
//!
//! Browses the catalog, opens an event, buys tickets and signs in, printing
//! each step. Delays come from the environment (`PURCHASE_DELAY_MS`,
//! `AUTH_DELAY_MS`), so `PURCHASE_DELAY_MS=0 AUTH_DELAY_MS=0` runs instantly.

use eventticket_core::environment::SystemClock;
use eventticket_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use storefront::account::AccountField;
use storefront::checkout::CheckoutField;
use storefront::{
    AccountAction, AccountEnvironment, AccountReducer, AccountState, BrowseAction,
    BrowseEnvironment, BrowseReducer, CheckoutAction, CheckoutEnvironment, CheckoutReducer,
    CheckoutState, EventDetail, PriceRange, SortBy, StorefrontConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = StorefrontConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},storefront=debug", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = Arc::new(config.load_catalog()?);
    let stats = catalog.stats();
    tracing::info!(
        events = stats.total_events,
        categories = stats.categories,
        "Catalog ready"
    );

    println!("=== EventTicket ===\n");
    println!("Featured:");
    for event in catalog.featured() {
        println!("  {} - {} ({})", event.title, event.price, event.venue);
    }

    // Browse
    let browse_env = BrowseEnvironment::new(Arc::clone(&catalog))
        .with_default_price_range(config.default_price_range());
    let browse = Store::new(browse_env.initial_state(), BrowseReducer::new(), browse_env);

    browse
        .send(BrowseAction::PriceRangeChanged(PriceRange::dollars(0, 100)))
        .await?;
    browse.send(BrowseAction::SortChanged(SortBy::PriceLow)).await?;

    let results = browse.state(|s| s.results.clone()).await;
    println!("\nUnder $100, cheapest first:");
    for id in &results {
        if let Some(event) = catalog.get(id.as_str()) {
            println!("  [{}] {} - {}", event.id, event.title, event.price);
        }
    }

    browse.send(BrowseAction::NavbarSearch("tech".into())).await?;
    let found = browse.state(|s| s.results.len()).await;
    println!("\nSearch \"tech\": {found} result(s)");

    // Detail
    let Some(first) = results.first() else {
        println!("\nNothing to buy.");
        return Ok(());
    };
    let mut detail = EventDetail::load(&catalog, first.as_str(), config.max_tickets_per_order)?;
    detail.select_quantity(2);
    println!(
        "\n{}\n  {} at {}\n  {} ticket(s): {}",
        detail.event().title,
        detail.formatted_date(),
        detail.formatted_time(),
        detail.quantity(),
        detail.total()
    );

    // Checkout
    let checkout_env =
        CheckoutEnvironment::from_config(Arc::clone(&catalog), Arc::new(SystemClock), &config);
    let checkout = Store::new(CheckoutState::default(), CheckoutReducer::new(), checkout_env);

    checkout.send(detail.book()?).await?;
    for (field, value) in [
        (CheckoutField::FirstName, "Ada"),
        (CheckoutField::LastName, "Lovelace"),
        (CheckoutField::Email, "ada@example.com"),
        (CheckoutField::CardNumber, "4242 4242 4242 4242"),
        (CheckoutField::ExpiryDate, "12/30"),
        (CheckoutField::Cvv, "123"),
    ] {
        checkout
            .send(CheckoutAction::FieldChanged {
                field,
                value: value.to_string(),
            })
            .await?;
    }

    if let Some(summary) = checkout.state(|s| s.summary).await {
        println!(
            "\nSubtotal {}  Service fee {}  Total {}",
            summary.subtotal, summary.service_fee, summary.total
        );
    }

    println!("Processing payment...");
    checkout
        .send_and_wait_for(
            CheckoutAction::Submit,
            |action| matches!(action, CheckoutAction::PurchaseCompleted { .. }),
            config.purchase_delay + Duration::from_secs(5),
        )
        .await?;

    if let Some(receipt) = checkout.state(|s| s.receipt().cloned()).await {
        println!(
            "Booked {} ticket(s) for {} - confirmation {}",
            receipt.ticket_count, receipt.event_title, receipt.confirmation
        );
    }

    // Account
    let account = Store::new(
        AccountState::default(),
        AccountReducer::new(),
        AccountEnvironment::from_config(&config),
    );
    for (field, value) in [
        (AccountField::Email, "ada@example.com"),
        (AccountField::Password, "correct horse"),
    ] {
        account
            .send(AccountAction::FieldChanged {
                field,
                value: value.to_string(),
            })
            .await?;
    }

    println!("\nSigning in...");
    account
        .send_and_wait_for(
            AccountAction::Submit,
            |action| matches!(action, AccountAction::Authenticated { .. }),
            config.auth_delay + Duration::from_secs(5),
        )
        .await?;
    if account.state(AccountState::is_signed_in).await {
        println!("Signed in as ada@example.com");
    }

    browse.shutdown(Duration::from_secs(1)).await?;
    checkout.shutdown(Duration::from_secs(1)).await?;
    account.shutdown(Duration::from_secs(1)).await?;

    Ok(())
}
