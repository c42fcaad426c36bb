//! Rateio - expense splitting for club expeditions
//!
//! Everything an expedition spends is shared by the people who travel. This
//! crate turns the raw records of a trip into a signed balance per
//! participant.
//!
//! # Pools
//!
//! Expenses fall into two pools:
//!
//! - **general**: split evenly among every participant
//! - **drinkers**: split evenly among participants who drink alcohol
//!
//! ```text
//! due(p) = general / participants + (p drinks ? drinkers / max(drinkers_count, 1) : 0)
//! ```
//!
//! # Contributions
//!
//! A participant pays in two ways: cash handed to the club ledger for this
//! expedition, or purchases they fronted for the group.
//!
//! ```text
//! paid(p)    = Σ ledger receipts(p) + Σ purchases bought by p
//! balance(p) = paid(p) - due(p)
//! ```
//!
//! Positive balances are credits owed back to the participant, negative ones
//! are what the participant still owes.
//!
//! # Example
//!
//! ```
//! use expedicao_rateio::{settle, Contribution, Expense, Money, Participant};
//!
//! let people = vec![
//!     Participant::new("ana", true),
//!     Participant::new("bruno", false),
//! ];
//! let expenses = vec![
//!     Expense::general(Money::from_cents(10_000)).bought_by("ana"),
//!     Expense::drinkers_only(Money::from_cents(3_000)),
//! ];
//! let paid = vec![Contribution::new("bruno", Money::from_cents(5_000))];
//!
//! let settlement = settle(&people, &expenses, &paid).unwrap();
//! assert_eq!(settlement.balances[0].balance, Money::from_cents(2_000));
//! assert_eq!(settlement.balances[1].balance, Money::ZERO);
//! ```

mod error;
mod money;
mod settle;
mod split;

pub use error::{Error, Result};
pub use money::Money;
pub use settle::{settle, Balance, BalanceStatus, Contribution, Settlement};
pub use split::{Expense, Participant, Pools, Split};
