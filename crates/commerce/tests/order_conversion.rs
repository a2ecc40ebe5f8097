//! End-to-end order conversion properties.

use catalog::{ProductRecord, StockLedger};
use commerce::{Address, CartStore, CheckoutService, OrderStore, PaymentMethod};
use common::{Money, ProductId, UserId};

fn address() -> Address {
    Address {
        line1: "7 Hill Road".to_string(),
        line2: None,
        city: "Bengaluru".to_string(),
        postal_code: "560001".to_string(),
    }
}

async fn engine(stock: u32) -> (CheckoutService, CartStore, StockLedger, OrderStore) {
    let ledger = StockLedger::new();
    ledger
        .insert(ProductRecord::new(
            "SKU-BED-03",
            "Orthopedic Bed",
            Money::from_rupees(2000),
            stock,
        ))
        .await;
    let carts = CartStore::new(ledger.clone());
    let orders = OrderStore::new();
    let checkout = CheckoutService::new(carts.clone(), ledger.clone(), orders.clone());
    (checkout, carts, ledger, orders)
}

#[tokio::test]
async fn n_racing_checkouts_never_oversell() {
    let (checkout, carts, ledger, _) = engine(2).await;

    let users: Vec<UserId> = (0..4).map(|_| UserId::new()).collect();
    for user in &users {
        carts
            .add_item(*user, ProductId::new("SKU-BED-03"), 1)
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for user in &users {
        let checkout = checkout.clone();
        let user = *user;
        handles.push(tokio::spawn(async move {
            checkout
                .place_order(user, address(), address(), PaymentMethod::Card)
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 2, "exactly as many orders as units in stock");
    assert_eq!(
        ledger.available(&ProductId::new("SKU-BED-03")).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn racing_conversions_of_one_cart_charge_it_once() {
    let (checkout, carts, ledger, orders) = engine(10).await;
    let user = UserId::new();
    carts
        .add_item(user, ProductId::new("SKU-BED-03"), 2)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let checkout = checkout.clone();
        handles.push(tokio::spawn(async move {
            checkout
                .place_order(user, address(), address(), PaymentMethod::Card)
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1, "one cart, one order, no matter how many racers");
    assert_eq!(orders.for_user(user).await.len(), 1);
    assert_eq!(
        ledger.available(&ProductId::new("SKU-BED-03")).await.unwrap(),
        8
    );
}

#[tokio::test]
async fn winning_checkout_is_fully_applied_and_losing_one_is_not() {
    let (checkout, carts, ledger, orders) = engine(1).await;
    let winner = UserId::new();
    let loser = UserId::new();
    for user in [winner, loser] {
        carts
            .add_item(user, ProductId::new("SKU-BED-03"), 1)
            .await
            .unwrap();
    }

    let first = checkout
        .place_order(winner, address(), address(), PaymentMethod::Upi)
        .await;
    let second = checkout
        .place_order(loser, address(), address(), PaymentMethod::Upi)
        .await;
    assert!(first.is_ok());
    assert!(second.is_err());

    // Winner: order stored, cart cleared, stock gone.
    assert_eq!(orders.for_user(winner).await.len(), 1);
    assert!(carts.get_cart(winner).await.is_empty());
    assert_eq!(
        ledger.available(&ProductId::new("SKU-BED-03")).await.unwrap(),
        0
    );

    // Loser: no order, cart intact.
    assert!(orders.for_user(loser).await.is_empty());
    assert_eq!(carts.get_cart(loser).await.total_items, 1);
}
