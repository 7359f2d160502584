//! VelvetRope — pricing, discount, and loyalty engine for a venue
//! booking/ordering demo.
//!
//! Demo driver that wires the subsystems together and walks one guest
//! through a booking, an in-venue order, and the loyalty ledger.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use velvet_catalog::CatalogStore;
use velvet_core::config::AppConfig;
use velvet_core::event_bus::capture_sink;
use velvet_core::types::{BookingType, ContactInfo, OrderType};
use velvet_loyalty::LoyaltyLedger;
use velvet_session::{BookingSession, OrderSession};

#[derive(Parser, Debug)]
#[command(name = "velvetrope")]
#[command(about = "Pricing, discount, and loyalty engine for a venue booking demo")]
#[command(version)]
struct Cli {
    /// Guest the session ledger belongs to
    #[arg(long, env = "VELVETROPE__USER_ID", default_value = "demo-guest")]
    user_id: String,

    /// Booking type for the demo reservation (snake_case)
    #[arg(long, env = "VELVETROPE__BOOKING_TYPE", default_value = "vip_couch")]
    booking_type: String,

    /// Guest count for the demo reservation
    #[arg(long, env = "VELVETROPE__GUESTS", default_value_t = 2)]
    guests: u32,

    /// Coupon code to apply to the booking
    #[arg(long, env = "VELVETROPE__COUPON")]
    coupon: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "velvetrope=info,velvet_pricing=info,velvet_loyalty=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("VelvetRope starting up");

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    let booking_type: BookingType = cli.booking_type.parse()?;

    info!(
        venue = %config.venue_name,
        booking_type = %booking_type,
        guests = cli.guests,
        "Configuration loaded"
    );

    let catalog = Arc::new(CatalogStore::with_fixtures());
    let sink = capture_sink();
    let mut ledger = LoyaltyLedger::new(&cli.user_id, &config.loyalty, sink.clone());

    // ── booking flow ──

    let mut booking = BookingSession::new(Arc::clone(&catalog), &config.session, sink.clone());
    booking.set_booking_type(booking_type);
    booking.set_guest_count(cli.guests)?;
    booking.set_contact(ContactInfo {
        name: "Demo Guest".into(),
        phone: "+1-555-0100".into(),
        email: None,
    });

    // Pick the most popular add-on and experience offered for this type.
    if let Some(add_on) = catalog.add_ons_for(booking_type).first() {
        booking.add_add_on(&add_on.id)?;
        info!(add_on = %add_on.name, price = %add_on.price, "Add-on selected");
    }
    if let Some(experience) = catalog.experiences_for(booking_type).first() {
        booking.add_experience(&experience.id)?;
        info!(experience = %experience.name, price = %experience.price, "Experience selected");
    }

    if let Some(code) = &cli.coupon {
        match booking.apply_coupon(code) {
            Ok(applied) => info!(code = %applied.code, discount = %applied.discount, "Coupon accepted"),
            Err(reason) => warn!(code = %code, %reason, "Coupon rejected"),
        }
    }

    let breakdown = booking.breakdown();
    println!("booking breakdown:\n{}", serde_json::to_string_pretty(&breakdown)?);

    let record = booking.transaction_record(&config.venue_id, &config.venue_name);
    let outcome = ledger.record_transaction(&record)?;
    booking.reset();
    println!("booking points:\n{}", serde_json::to_string_pretty(&outcome)?);

    // ── order flow ──

    let mut order = OrderSession::new(
        OrderType::BarTab,
        Arc::clone(&catalog),
        &config.session,
        sink.clone(),
    );
    order.add_item("item-espresso-martini", 2)?;
    order.add_extra("item-espresso-martini", "extra-premium-mixer")?;
    order.add_item("item-truffle-fries", 1)?;
    if let Err(reason) = order.apply_coupon("HAPPYHOUR15") {
        warn!(%reason, "Order coupon rejected");
    }

    let breakdown = order.breakdown();
    println!("order breakdown:\n{}", serde_json::to_string_pretty(&breakdown)?);

    let record = order.transaction_record(&config.venue_id, &config.venue_name);
    let outcome = ledger.record_transaction(&record)?;
    order.reset();
    println!("order points:\n{}", serde_json::to_string_pretty(&outcome)?);

    // ── loyalty summary ──

    info!(
        points = ledger.current_points(),
        lifetime = ledger.lifetime_points(),
        tier = %ledger.tier(),
        progress = ledger.progress_to_next_tier(),
        "Ledger after the night"
    );

    // Redeem the best reward the balance covers, if any.
    let affordable = ledger
        .available_rewards()
        .into_iter()
        .filter(|r| r.point_cost <= ledger.current_points())
        .max_by_key(|r| r.point_cost);
    if let Some(reward) = affordable {
        let redeemed = ledger.redeem_reward(&reward.id)?;
        info!(
            reward = %redeemed.title,
            code = redeemed.redemption_code.as_deref().unwrap_or("-"),
            balance = ledger.current_points(),
            "Reward redeemed"
        );
    } else {
        info!(
            points = ledger.current_points(),
            "No reward affordable yet"
        );
    }

    println!(
        "achievements unlocked: {}",
        ledger
            .achievements()
            .iter()
            .filter(|a| a.achieved)
            .map(|a| a.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("events emitted this session: {}", sink.count());

    Ok(())
}
