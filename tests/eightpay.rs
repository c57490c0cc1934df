//! Entry point wiring: registry lookups, accounts and units through
//! `EightPay`, and construction from a configuration file.

use alloy::primitives::{address, Address};
use serde_json::json;

use eightpay::config::parse_config;
use eightpay::{
    ContractName, DeploymentRegistry, EightPay, Error, Network, SubmissionOptions, Token, Units,
};

mod common;

use common::{
    registry, MockLedger, FIXED_ADDRESS, ON_DEMAND_ADDRESS, PLAN_ID, PRIVATE_ADDRESS, PRIVATE_KEY,
    SUBSCRIPTION_ID, VARIABLE_ADDRESS,
};

const MNEMONIC: &str = "gesture rather obey video awake genuine patient base soon parrot upset lounge";
const USDT: Address = address!("55d398326f99059fF775485246999027B3197955");

fn client() -> EightPay<MockLedger> {
    EightPay::new(
        MockLedger::new(),
        Network::Private,
        &registry(),
        Units::new(Network::Private, Vec::<Token>::new()),
    )
    .unwrap()
}

#[test]
fn test_namespaces_bound_to_registry() {
    let client = client();
    assert_eq!(client.network(), Network::Private);
    assert_eq!(client.fixed_recurring.address(), FIXED_ADDRESS);
    assert_eq!(client.variable_recurring.address(), VARIABLE_ADDRESS);
    assert_eq!(client.on_demand.address(), ON_DEMAND_ADDRESS);
}

#[test]
fn test_missing_deployment_fails_construction() {
    let partial = DeploymentRegistry::new()
        .with_deployment(
            Network::Private,
            ContractName::FixedRecurringSubscriptionsManagement,
            FIXED_ADDRESS,
        )
        .with_deployment(
            Network::Private,
            ContractName::OnDemandSubscriptionsManagement,
            ON_DEMAND_ADDRESS,
        );

    let err = EightPay::new(
        MockLedger::new(),
        Network::Private,
        &partial,
        Units::new(Network::Private, Vec::<Token>::new()),
    )
    .unwrap_err();

    assert_eq!(
        err,
        Error::ContractNotDeployed {
            contract: "VariableRecurringSubscriptionsManagement".into(),
            network: "private".into(),
        }
    );
}

#[test]
fn test_accounts() {
    let client = client();

    let account = client.accounts().from_private_key(PRIVATE_KEY).unwrap();
    assert_eq!(account.address(), PRIVATE_ADDRESS);

    let account = client.accounts().from_mnemonic_default(MNEMONIC).unwrap();
    assert_eq!(account.address(), PRIVATE_ADDRESS);
    assert_eq!(account.private_key(), PRIVATE_KEY);
}

#[test]
fn test_units() {
    let client = client();
    let units = client.units();

    assert_eq!(units.parse_amount("1", "BNB").unwrap(), "1000000000000000000");
    assert_eq!(units.format_amount("1000000000000000000", "BNB").unwrap(), "1");
    assert_eq!(units.format_amount("1234500000000000000", "BNB").unwrap(), "1.2345");
}

#[tokio::test]
async fn test_bill_with_local_key_through_entry_point() {
    let ledger = MockLedger::new();
    let client = EightPay::new(
        ledger.clone(),
        Network::Private,
        &registry(),
        Units::new(Network::Private, Vec::<Token>::new()),
    )
    .unwrap();

    let amount = client.units().parse_amount("2.5", "BNB").unwrap();
    let tx = client
        .variable_recurring
        .bill(PLAN_ID, json!([SUBSCRIPTION_ID]), json!([amount]))
        .unwrap();

    let receipt = tx
        .send(Some(SubmissionOptions::from_private_key(PRIVATE_KEY)))
        .unwrap()
        .await
        .unwrap();

    assert!(receipt.signed);
    assert_eq!(receipt.from, Some(PRIVATE_ADDRESS));
    assert_eq!(ledger.submitted()[0].request.to, Some(VARIABLE_ADDRESS.into()));
}

#[test]
fn test_client_from_config() {
    let config = parse_config(&format!(
        r#"
        network = "bsc"

        [deployments.bsc]
        FixedRecurringSubscriptionsManagement = "{}"
        VariableRecurringSubscriptionsManagement = "{}"
        OnDemandSubscriptionsManagement = "{}"

        [[tokens]]
        network = "bsc"
        symbol = "USDT"
        decimals = 18
        address = "{}"
        "#,
        FIXED_ADDRESS, VARIABLE_ADDRESS, ON_DEMAND_ADDRESS, USDT
    ))
    .unwrap();

    let registry = DeploymentRegistry::from_config(&config.deployments);
    let units = Units::from_config(config.network, &config.tokens);
    let client = EightPay::new(MockLedger::new(), config.network, &registry, units).unwrap();

    assert_eq!(client.network(), Network::Bsc);
    assert_eq!(client.on_demand.address(), ON_DEMAND_ADDRESS);
    assert_eq!(client.units().parse_amount("3", "usdt").unwrap(), "3000000000000000000");
    assert_eq!(
        client.units().token(&USDT.to_string()).unwrap().symbol,
        "USDT"
    );
}
