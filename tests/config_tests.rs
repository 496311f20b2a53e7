mod common;

use std::sync::Arc;

use common::{expense, temp_base_dir};
use shared_expenses::{
    config::{Config, ConfigManager},
    core::{ExpenseLedger, NotificationLog},
    domain::Payer,
    storage::StoreBackend,
    LedgerError,
};

#[test]
fn saved_config_round_trips_through_disk() {
    let base = temp_base_dir();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    let config = Config {
        locale: "en-GB".into(),
        currency_symbol: "£".into(),
        categories: vec!["Housing".into(), "Pets".into()],
        seed_demo_data: false,
        ..Config::default()
    };
    manager.save(&config).unwrap();

    let reloaded = ConfigManager::with_base_dir(base).unwrap().load().unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn configured_categories_and_symbol_drive_the_ledger() {
    let base = temp_base_dir();
    let config = Config {
        currency_symbol: "€".into(),
        categories: vec!["Pets".into()],
        seed_demo_data: false,
        ..Config::default()
    };
    let log = NotificationLog::shared();
    let mut ledger = ExpenseLedger::open(&config, &base, Arc::clone(&log)).unwrap();
    assert_eq!(ledger.backend(), StoreBackend::Json);

    let rejected = ledger.add(expense("Rent", "Housing", 10.0, Payer::Samarth));
    assert!(matches!(rejected, Err(LedgerError::Validation(_))));

    ledger
        .add(expense("Vet", "Pets", 80.0, Payer::Prachi))
        .unwrap();
    assert_eq!(log.list()[0].message, "New expense \"Vet\" (€80.00) added");
}
