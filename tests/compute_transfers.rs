//! End to end: JSON transactions through matching and consolidation

use lotmatch::{
    compute_transfers, group_by_product, read_transactions_json, GroupingKey, TransferError,
    TransferOptions, TransferType, Warning,
};
use rust_decimal_macros::dec;

const PORTFOLIO: &str = r#"{
    "transactions": [
        {"id": "1", "date": "2020-01-10 09:30:00", "product": "ACME", "isin": "US0000000001",
         "quantity": 100, "value": "1000", "fee": "10", "total": "1010"},
        {"id": "2", "date": "2020-02-03 11:00:00", "product": "BETA", "quantity": -50,
         "value": "2500", "fee": "5", "total": "2495"},
        {"id": "3", "date": "2020-06-01 10:00:00", "product": "ACME", "quantity": -60,
         "value": "720", "fee": "6", "total": "714"},
        {"id": "4", "date": "2020-06-01 16:00:00", "product": "ACME", "quantity": -40,
         "value": "500", "fee": "4", "total": "496"},
        {"id": "5", "date": "2020-07-15", "product": "BETA", "quantity": 30,
         "value": "1350", "fee": "3", "total": "1353"},
        {"id": "6", "date": "2020-09-01", "product": "ACME", "quantity": 10,
         "value": "130", "fee": "1", "total": "131"}
    ]
}"#;

fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

#[test]
fn portfolio_transfers() {
    init_logger();
    let transactions = read_transactions_json(PORTFOLIO.as_bytes()).unwrap();
    let by_product = group_by_product(transactions);

    let report = compute_transfers(&by_product, TransferOptions::default()).unwrap();

    let acme = &report.products["ACME"];
    assert_eq!(acme.len(), 1);
    assert_eq!(acme[0].transfer_type, TransferType::Long);
    assert_eq!(acme[0].units, 100);
    assert_eq!(acme[0].acquisition_value, dec!(1000));
    assert_eq!(acme[0].disposal_value, dec!(1220));
    assert_eq!(acme[0].fees, dec!(20));

    let beta = &report.products["BETA"];
    assert_eq!(beta.len(), 1);
    assert_eq!(beta[0].transfer_type, TransferType::Short);
    assert_eq!(beta[0].units, 30);
    assert_eq!(beta[0].acquisition_value, dec!(1500));
    assert_eq!(beta[0].disposal_value, dec!(1350));
    assert_eq!(beta[0].gain(), dec!(150));

    assert_eq!(report.transfer_count(), 2);
    assert_eq!(report.net_gain(), dec!(370));

    assert_eq!(
        report.warnings,
        vec![
            Warning::UnmatchedResidual {
                product: "ACME".to_string(),
                transaction_id: "6".to_string(),
                quantity: 10,
            },
            Warning::UnmatchedResidual {
                product: "BETA".to_string(),
                transaction_id: "2".to_string(),
                quantity: -20,
            },
        ]
    );
}

#[test]
fn units_conserved_with_either_grouping() {
    init_logger();
    let transactions = read_transactions_json(PORTFOLIO.as_bytes()).unwrap();
    let by_product = group_by_product(transactions);

    for grouping in [GroupingKey::AcquisitionDate, GroupingKey::DatePair] {
        let unsimplified = compute_transfers(
            &by_product,
            TransferOptions {
                grouping,
                simplify: false,
            },
        )
        .unwrap();
        let simplified = compute_transfers(
            &by_product,
            TransferOptions {
                grouping,
                simplify: true,
            },
        )
        .unwrap();

        let before: u64 = unsimplified.transfers().map(|t| t.units).sum();
        let after: u64 = simplified.transfers().map(|t| t.units).sum();
        assert_eq!(before, 130);
        assert_eq!(before, after);
        assert_eq!(unsimplified.total_fees(), simplified.total_fees());
    }
}

#[test]
fn zero_quantity_halts_product() {
    init_logger();
    let mut transactions = read_transactions_json(PORTFOLIO.as_bytes()).unwrap();
    transactions[4].quantity = 0;
    let by_product = group_by_product(transactions);

    let err = compute_transfers(&by_product, TransferOptions::default()).unwrap_err();
    assert_eq!(
        err,
        TransferError::InvalidQuantity { id: "5".to_string() }.for_product("BETA")
    );
}
