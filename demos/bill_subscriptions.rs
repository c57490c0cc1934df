//! Bill one fixed-recurring subscription and print its lifecycle.
//!
//! Usage:
//!   EIGHTPAY_PRIVATE_KEY=0x... cargo run --example bill_subscriptions -- demos/eightpay.toml <plan-id> <subscription-id>

use std::path::PathBuf;

use eightpay::config::load_config;
use eightpay::observability::init_logging;
use eightpay::{EightPay, LifecycleEvent, SubmissionOptions};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| "eightpay.toml".to_string()));
    let plan_id = args.next().ok_or("missing plan id")?;
    let subscription_id = args.next().ok_or("missing subscription id")?;
    let private_key = std::env::var("EIGHTPAY_PRIVATE_KEY")?;

    let config = load_config(&config_path)?;
    init_logging(&config.observability);

    let client = EightPay::connect(&config).await?;
    let sender = client.accounts().from_private_key(&private_key)?;
    println!("Billing from {}", sender.address());

    let tx = client
        .fixed_recurring
        .bill(plan_id.as_str(), json!([subscription_id]))?;

    let gas = tx
        .estimate_gas(SubmissionOptions::from_private_key(private_key.as_str()))
        .await?;
    println!("Estimated gas: {}", gas);

    let (mut events, outcome) = tx
        .send(Some(SubmissionOptions::from_private_key(private_key)))?
        .split();

    let printer = tokio::spawn(async move {
        while let Some(event) = events.next_event().await {
            match event {
                LifecycleEvent::TransactionHash(hash) => println!("transactionHash: {}", hash),
                LifecycleEvent::Receipt(receipt) => {
                    println!("receipt: block {:?}", receipt.block_number)
                }
                LifecycleEvent::Confirmation { confirmations, .. } => {
                    println!("confirmation: {}", confirmations)
                }
                LifecycleEvent::Error(e) => eprintln!("error: {}", e),
                other => println!("{}", other.kind()),
            }
        }
    });

    let receipt = outcome.await?;
    println!("Billed in {}", receipt.transaction_hash);

    printer.await?;
    Ok(())
}
