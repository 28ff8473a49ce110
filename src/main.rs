use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_tracking::{
    CustomerNotifier, Dish, KitchenDisplay, Metrics, OrderRecord, OrderTracker, Settlement,
    Subscriber, TrackerConfig, WaiterNotifier,
};

fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=order_tracking=trace cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_tracking=debug")),
        )
        .init();

    tracing::info!("🍝 Starting restaurant order tracking demo");

    // === 1. Configuration and shared collaborators ===
    let config = TrackerConfig::from_env_path("ORDER_TRACKING_CONFIG")?;
    let metrics = Arc::new(Metrics::new()?);

    let kitchen = Arc::new(KitchenDisplay::new());
    let waiter = Arc::new(WaiterNotifier::new("Marco"));
    let customer: Arc<dyn Subscriber> = Arc::new(CustomerNotifier::new(
        "Alice",
        "555-867-5309",
        config.notifications.clone(),
    ));

    // === 2. Happy path: place, cook, serve, pay ===
    let dinner = OrderRecord::new(
        Dish::new("Spaghetti")
            .with_sauce("Carbonara")
            .with_cooking_time(12)
            .with_modifier("Extra Parmesan"),
    );
    let mut tracker =
        OrderTracker::new(dinner, config.tracking.clone()).with_metrics(metrics.clone());
    tracker.attach(kitchen.clone());
    tracker.attach(waiter.clone());
    tracker.attach(customer.clone());
    tracing::info!(subscribers = ?tracker.subscribers().identities(), "Subscribers attached");

    tracker.announce();
    tracker.place_order()?;
    tracker.prepare_order()?;
    tracker.complete_preparation()?;
    tracker.serve_order()?;

    let paid = std::env::var("ORDER_TRACKING_PAYMENT_OK")
        .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(true);

    match tracker.settle_payment(paid)? {
        Settlement::Completed(_) => tracing::info!("✅ Payment accepted"),
        Settlement::Declined => tracing::warn!("❌ Payment declined, order stays served"),
    }

    if let Err(e) = tracker.cancel_order() {
        tracing::info!(error = %e, "Cancellation refused as expected");
    }

    println!("{}\n", tracker.status_summary());

    // === 3. Second order, cancelled while cooking ===
    let lunch = OrderRecord::new(Dish::new("Penne").with_sauce("Arrabbiata"));
    let mut second =
        OrderTracker::new(lunch, config.tracking.clone()).with_metrics(metrics.clone());
    second.attach(kitchen.clone());
    second.attach(waiter.clone());

    second.place_order()?;
    tracing::info!(active_orders = kitchen.active_orders(), "Kitchen queue");
    second.cancel_order()?;

    println!("{}\n", second.status_summary());

    tracing::info!(
        waiter_notifications = waiter.notification_count(),
        kitchen_tickets = kitchen.tickets().len(),
        "🎉 Demo complete!"
    );

    println!("{}", metrics.render()?);

    Ok(())
}
