//! Basic ledger usage example
//!
//! Run with `RUST_LOG=debug` to see the ledger's tracing output.

use ed25519_dalek::{Signer, SigningKey};
use points_ledger::utils::MemoryStorage;
use points_ledger::{AuthorizationMode, Ledger, LedgerConfig, LedgerError, RequestContext};
use tracing_subscriber::EnvFilter;

/// Sign `payload || binding` the way a caller of the ledger does
fn sign(key: &SigningKey, payload: &str, binding: &str) -> RequestContext {
    let mut message = payload.as_bytes().to_vec();
    message.extend_from_slice(binding.as_bytes());
    RequestContext::new(
        key.sign(&message).to_bytes().to_vec(),
        payload.as_bytes().to_vec(),
        binding.as_bytes().to_vec(),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Points Ledger - Basic Example\n");

    // 1. Deploy a ledger that only accepts administrator-signed mutations
    let admin = SigningKey::from_bytes(&[1u8; 32]);
    let config = LedgerConfig::default().with_authorization(AuthorizationMode::Signature);
    let ledger = Ledger::from_config(MemoryStorage::new(), &config);

    ledger
        .bootstrap(Some(admin.verifying_key().as_bytes().as_slice()))
        .await?;
    println!(
        "  Genesis account '{}' holds {}",
        ledger.genesis_account(),
        ledger.get_balance(ledger.genesis_account()).await?
    );

    // 2. Register accounts
    for id in ["alice", "bob"] {
        let request = sign(&admin, &format!("assign {id}"), "session-1");
        ledger.assign(&request, id).await?;
        println!("  Assigned account '{id}'");
    }

    // 3. Move points around
    let request = sign(&admin, "transfer admin alice 500", "session-1");
    ledger.transfer(&request, "admin", "alice", "500").await?;
    let request = sign(&admin, "transfer alice bob 200", "session-1");
    ledger.transfer(&request, "alice", "bob", "200").await?;

    // 4. A transfer signed by someone else is refused
    let stranger = SigningKey::from_bytes(&[2u8; 32]);
    let request = sign(&stranger, "transfer bob admin 200", "session-2");
    match ledger.transfer(&request, "bob", "admin", "200").await {
        Err(LedgerError::AuthorizationFailed(reason)) => println!("  Refused: {reason}"),
        other => println!("  Unexpected result: {other:?}"),
    }

    // 5. Balances
    println!("\nBalances:");
    for id in ["admin", "alice", "bob"] {
        let balance = ledger.query("getBalance", &[id.to_string()]).await?;
        println!("  {id:<6} {}", String::from_utf8_lossy(&balance));
    }

    Ok(())
}
