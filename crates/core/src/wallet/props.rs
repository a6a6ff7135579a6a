//! Property-based tests for wallet operations.

use domus_shared::types::UserId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::Wallet;

/// Non-negative amounts from 0.00 to 1,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn wallet() -> impl Strategy<Value = Wallet> {
    (amount(), any::<bool>())
        .prop_map(|(balance, locked)| Wallet::from_parts(UserId::new(1), balance, locked))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Depositing a non-negative amount increases the balance by exactly that amount.
    #[test]
    fn prop_deposit_increases_balance(mut w in wallet(), a in amount()) {
        let before = w.balance();
        prop_assert!(w.deposit(a).is_ok());
        prop_assert_eq!(w.balance(), before + a);
    }

    /// Withdrawing no more than the balance succeeds and subtracts the amount.
    #[test]
    fn prop_covered_withdraw_succeeds(balance in amount(), pick in 0u32..=100) {
        let mut w = Wallet::from_parts(UserId::new(1), balance, false);
        let a = balance * Decimal::from(pick) / Decimal::from(100);
        prop_assert!(a <= balance);

        prop_assert!(w.withdraw(a));
        prop_assert_eq!(w.balance(), balance - a);
    }

    /// Withdrawing more than the balance fails without touching it.
    #[test]
    fn prop_uncovered_withdraw_fails(mut w in wallet(), extra in 1i64..100_000_000i64) {
        let before = w.balance();
        let a = before + Decimal::new(extra, 2);

        prop_assert!(!w.withdraw(a));
        prop_assert_eq!(w.balance(), before);
    }

    /// A successful withdraw never leaves a negative balance when starting non-negative.
    #[test]
    fn prop_withdraw_never_goes_negative(mut w in wallet(), a in amount()) {
        let _ = w.withdraw(a);
        prop_assert!(w.balance() >= Decimal::ZERO);
    }
}
