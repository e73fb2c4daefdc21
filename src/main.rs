use std::str::FromStr;
use std::sync::Arc;

use tracing::info;
use tracing::level_filters::LevelFilter;

use vault_wallet::models::{Address, VaultCatalog, NATIVE_TOKEN_ADDRESS};
use vault_wallet::providers::StaticBalanceSource;
use vault_wallet::handlers::ConsoleLoadingIndicator;
use vault_wallet::utils::helper::format_address;
use vault_wallet::WalletContext;

/// Demo vault catalog: two vaults with their underlying tokens and prices.
const DEMO_CATALOG: &str = r#"{
    "vaults": {
        "0x5f18c75abdae578b483e5f43f12a39cf75b973a9": {
            "address": "0x5f18c75abdae578b483e5f43f12a39cf75b973a9",
            "token": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            "name": "USDC Vault"
        },
        "0xda816459f1ab5631232fe5e97a05bbbb94970c95": {
            "address": "0xda816459f1ab5631232fe5e97a05bbbb94970c95",
            "token": "0x6b175474e89094c44da98b954eedeac495271d0f",
            "name": "DAI Vault"
        }
    },
    "is_loading": false,
    "prices": {
        "0x5f18c75abdae578b483e5f43f12a39cf75b973a9": 1.08,
        "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48": 1.0,
        "0xda816459f1ab5631232fe5e97a05bbbb94970c95": 1.04,
        "0x6b175474e89094c44da98b954eedeac495271d0f": 1.0,
        "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee": 1800.0
    }
}"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_max_level(LevelFilter::DEBUG)
        .with_file(true)
        .with_line_number(true)
        .init();

    dotenvy::dotenv().ok();

    tokio::runtime::Runtime::new()?.block_on(async {
        let chain_id = std::env::var("CHAIN_ID")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1u64);

        let account_str = std::env::var("WALLET_ADDRESS")
            .unwrap_or_else(|_| "0x7a1057e6e9093da9c1d4c1d049609b6889fc4c67".to_string());
        let account = Address::from_str(&account_str)?;

        info!("Initializing vault wallet...");
        info!("Chain ID: {}", chain_id);
        info!("Wallet Address: {}", account_str);

        let catalog: VaultCatalog = serde_json::from_str(DEMO_CATALOG)?;

        // Fixture balances for the demo source.
        let source = Arc::new(StaticBalanceSource::new());
        for vault in catalog.vaults.values() {
            source.set_balance(chain_id, account, vault.address, 250_000_000, 6);
            source.set_balance(chain_id, account, vault.token, 100_000_000, 6);
        }
        source.set_balance(chain_id, account, NATIVE_TOKEN_ADDRESS, 1_500_000_000_000_000_000, 18);

        let context = Arc::new(WalletContext::new(
            chain_id,
            source.clone(),
            Arc::new(ConsoleLoadingIndicator::new()),
        ));

        // Log every published view change, the way a UI would re-render.
        let mut views = context.subscribe();
        tokio::spawn(async move {
            while views.changed().await.is_ok() {
                let view = views.borrow_and_update().clone();
                info!(
                    "view v{}: {} tokens, in vaults: ${:.2}, loading: {}",
                    view.version,
                    view.balances.len(),
                    view.cumulated_value_in_vaults,
                    view.is_loading
                );
            }
        });

        context.update_catalog(catalog.clone()).await;
        let balances = context.set_account(Some(account)).await;

        info!("{}", "=".repeat(80));
        info!("WALLET SNAPSHOT");
        info!("{}", "-".repeat(80));

        let mut balance_vec: Vec<_> = balances.iter().collect();
        balance_vec.sort_by(|a, b| {
            b.1.normalized_value
                .partial_cmp(&a.1.normalized_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for (i, (token, balance)) in balance_vec.into_iter().enumerate() {
            let name = catalog
                .vault(token)
                .and_then(|v| v.name.as_deref())
                .unwrap_or(if token.is_native() { "Native asset" } else { "Token" });
            info!("{}. {} ({})", i + 1, format_address(token), name);
            info!("   Balance: {:.8}", balance.normalized);
            info!("   Price: ${:.4}", catalog.price(token));
            info!("   Value: ${:.4}", balance.normalized_value);
        }

        let view = context.view();
        info!("{}", "-".repeat(80));
        info!("➤ Value deposited in vaults: ${:.2}", view.cumulated_value_in_vaults);
        info!("{}", "=".repeat(80));

        // Partial refresh, like a "Max balance" action on one vault.
        if let Some(vault) = catalog.vaults.values().next() {
            source.set_balance(chain_id, account, vault.token, 175_000_000, 6);
            info!("Refreshing {} after Max action...", format_address(&vault.token));
            context.refresh(Some(&[vault.token])).await;
        }

        // Chain switch: the old chain's snapshot stays scoped to it.
        info!("Switching to chain 10...");
        context.set_chain(10).await;
        info!(
            "Chain 10 snapshot has {} tokens (chain {} data left behind)",
            context.view().balances.len(),
            chain_id
        );

        info!("Done.");
        Ok(())
    })
}
