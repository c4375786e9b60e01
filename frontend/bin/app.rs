//! Interactive app for the Storage contract.
//!
//! Detects the wallet, shows the contract's network data once, then drives
//! the two transaction forms from stdin commands. Without a wallet the app
//! only shows the fallback notice.

use std::path::Path;

use alloy_primitives::{utils::parse_ether, U256};
use frontend::{
    contracts,
    network::NetworkView,
    provider::EthWallet,
    tx_form::TransactionForm,
};
use helpers::artifacts::REGISTRY_PATH;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const CONTRACT_ADDRESS: &str = "859Ac8969AdEa0C41393b3eAB299C5b32a0EA391";

fn print_network(view: &NetworkView) {
    println!("Connected to chain ID: {}", view.data.chain_id);
    println!("Value stored on smart contract: {}", view.data.stored_value);
    println!("Smart contract balance: {}", view.data.balance);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let registry = contracts::load_registry(Path::new(REGISTRY_PATH))?;
    let address =
        std::env::var("CONTRACT_ADDRESS").unwrap_or_else(|_| CONTRACT_ADDRESS.to_string());
    let contract = contracts::select_contract(&registry, &address)?;

    let Some(wallet) = EthWallet::detect()? else {
        println!("Wallet not configured. Chain interaction is disabled.");
        return Ok(());
    };

    println!("Success! Wallet detected.");
    let mut view = NetworkView::load(&wallet, &contract).await?;
    print_network(&view);

    let mut form = TransactionForm::new();
    println!("Commands: store <number> | add <number> <eth> | refresh | quit");

    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["store", number] => {
                let Ok(number) = number.parse::<U256>() else {
                    println!("Invalid number");
                    continue;
                };
                form.set_number(number);
                form.set_money(U256::ZERO);
                let status = form.submit(&wallet, &contract).await;
                println!("Store [{}]", status.symbol());
            }
            ["add", number, eth] => {
                let Ok(number) = number.parse::<U256>() else {
                    println!("Invalid number");
                    continue;
                };
                // parse_ether can't chew stuff like "1."
                let Ok(money) = parse_ether(eth) else {
                    continue;
                };
                form.set_number(number);
                form.set_money(money);
                let status = form.submit(&wallet, &contract).await;
                println!("Add money [{}]", status.symbol());
            }
            ["refresh"] => {
                view.refresh(&wallet).await?;
                print_network(&view);
            }
            ["quit"] | ["exit"] => break,
            [] => continue,
            _ => println!("Commands: store <number> | add <number> <eth> | refresh | quit"),
        }
    }

    Ok(())
}
