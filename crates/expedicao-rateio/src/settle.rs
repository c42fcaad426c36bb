//! Per-participant balances.

use crate::error::{Error, Result};
use crate::money::Money;
use crate::split::{Expense, Participant, Split};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Cash a participant handed to the club for this expedition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub participant_id: String,
    pub amount: Money,
}

impl Contribution {
    pub fn new(participant_id: impl Into<String>, amount: Money) -> Self {
        Self {
            participant_id: participant_id.into(),
            amount,
        }
    }
}

/// Where a participant stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// The group owes the participant
    Credit,
    /// The participant owes the group
    Owes,
    Settled,
}

/// Settlement line for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub participant_id: String,
    pub drinks_alcohol: bool,
    pub due: Money,
    pub paid_in_ledger: Money,
    pub paid_as_buyer: Money,
    pub total_paid: Money,
    /// `total_paid - due`
    pub balance: Money,
}

impl Balance {
    pub fn status(&self) -> BalanceStatus {
        match self.balance.cents() {
            c if c > 0 => BalanceStatus::Credit,
            c if c < 0 => BalanceStatus::Owes,
            _ => BalanceStatus::Settled,
        }
    }
}

/// Result of settling an expedition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub split: Split,
    pub balances: Vec<Balance>,
}

impl Settlement {
    pub fn total_due(&self) -> Money {
        self.balances.iter().map(|b| b.due).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.balances.iter().map(|b| b.total_paid).sum()
    }

    /// Sum of what participants still owe, as a positive amount.
    pub fn outstanding(&self) -> Money {
        -self
            .balances
            .iter()
            .filter(|b| b.balance.is_negative())
            .map(|b| b.balance)
            .sum::<Money>()
    }

    pub fn balance_of(&self, participant_id: &str) -> Option<&Balance> {
        self.balances
            .iter()
            .find(|b| b.participant_id == participant_id)
    }
}

/// Settle an expedition.
///
/// Returns one balance per participant, in the order given. Contributions and
/// purchases attributed to anyone outside `participants` are ignored.
///
/// Every amount must lie within [`Money::MAX`], and the magnitudes of all
/// amounts together must fit an `i64`; otherwise [`Error::InvalidAmount`].
pub fn settle(
    participants: &[Participant],
    expenses: &[Expense],
    contributions: &[Contribution],
) -> Result<Settlement> {
    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.id.as_str()) {
            return Err(Error::DuplicateParticipant(participant.id.clone()));
        }
    }

    check_volume(expenses, contributions)?;
    let split = Split::compute(participants, expenses)?;

    let mut ledger: HashMap<&str, Money> = HashMap::new();
    for contribution in contributions {
        accumulate(
            ledger.entry(contribution.participant_id.as_str()).or_default(),
            contribution.amount,
        )?;
    }

    let mut bought: HashMap<&str, Money> = HashMap::new();
    for expense in expenses {
        if let Some(buyer) = expense.purchased_by.as_deref() {
            accumulate(bought.entry(buyer).or_default(), expense.total)?;
        }
    }

    let balances = participants
        .iter()
        .map(|participant| -> Result<Balance> {
            let due = split.due(participant);
            let paid_in_ledger = ledger
                .get(participant.id.as_str())
                .copied()
                .unwrap_or_default();
            let paid_as_buyer = bought
                .get(participant.id.as_str())
                .copied()
                .unwrap_or_default();
            let mut total_paid = paid_in_ledger;
            accumulate(&mut total_paid, paid_as_buyer)?;
            let balance = total_paid
                .checked_sub(due)
                .ok_or_else(|| Error::InvalidAmount(due.to_string()))?;

            Ok(Balance {
                participant_id: participant.id.clone(),
                drinks_alcohol: participant.drinks_alcohol,
                due,
                paid_in_ledger,
                paid_as_buyer,
                total_paid,
                balance,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Settlement { split, balances })
}

fn accumulate(total: &mut Money, amount: Money) -> Result<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| Error::InvalidAmount(amount.to_string()))?;
    Ok(())
}

/// Bounds every amount and their summed magnitudes, so the totals on
/// [`Settlement`] cannot overflow either.
fn check_volume(expenses: &[Expense], contributions: &[Contribution]) -> Result<()> {
    let amounts = expenses
        .iter()
        .map(|e| e.total)
        .chain(contributions.iter().map(|c| c.amount));

    let mut volume = Money::ZERO;
    for amount in amounts {
        accumulate(&mut volume, amount.in_range()?.abs())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn empty_expedition() {
        let settlement = settle(&[], &[Expense::general(cents(500))], &[]).unwrap();
        assert!(settlement.balances.is_empty());
        assert_eq!(settlement.split.per_person_general, Money::ZERO);
        assert_eq!(settlement.outstanding(), Money::ZERO);
    }

    #[test]
    fn duplicate_participant_rejected() {
        let people = [Participant::new("a", true), Participant::new("a", false)];
        assert_eq!(
            settle(&people, &[], &[]),
            Err(Error::DuplicateParticipant("a".into()))
        );
    }

    #[test]
    fn outsiders_are_ignored() {
        let people = [Participant::new("a", false)];
        let expenses = [Expense::general(cents(1000)).bought_by("stranger")];
        let paid = [Contribution::new("ghost", cents(700))];

        let settlement = settle(&people, &expenses, &paid).unwrap();
        let a = settlement.balance_of("a").unwrap();
        assert_eq!(a.total_paid, Money::ZERO);
        assert_eq!(a.balance, cents(-1000));
        assert_eq!(a.status(), BalanceStatus::Owes);
    }

    #[test]
    fn ledger_and_purchases_add_up() {
        let people = [Participant::new("a", true), Participant::new("b", true)];
        let expenses = [
            Expense::general(cents(2000)).bought_by("a"),
            Expense::drinkers_only(cents(1000)).bought_by("a"),
        ];
        let paid = [
            Contribution::new("b", cents(1000)),
            Contribution::new("b", cents(500)),
        ];

        let settlement = settle(&people, &expenses, &paid).unwrap();
        let a = settlement.balance_of("a").unwrap();
        let b = settlement.balance_of("b").unwrap();

        assert_eq!(a.due, cents(1500));
        assert_eq!(a.paid_as_buyer, cents(3000));
        assert_eq!(a.status(), BalanceStatus::Credit);

        assert_eq!(b.paid_in_ledger, cents(1500));
        assert_eq!(b.balance, Money::ZERO);
        assert_eq!(b.status(), BalanceStatus::Settled);

        assert_eq!(settlement.total_due(), cents(3000));
        assert_eq!(settlement.total_paid(), cents(4500));
        assert_eq!(settlement.outstanding(), Money::ZERO);
    }

    #[test]
    fn oversized_amounts_rejected() {
        let people = [Participant::new("a", true)];
        let half = cents(i64::MAX / 2 + 1);

        let expenses = [
            Expense::general(half).bought_by("a"),
            Expense::general(half).bought_by("a"),
        ];
        assert!(matches!(
            settle(&people, &expenses, &[]),
            Err(Error::InvalidAmount(_))
        ));

        let paid = [Contribution::new("a", Money::MAX), Contribution::new("a", half)];
        assert!(matches!(
            settle(&people, &[], &paid),
            Err(Error::InvalidAmount(_))
        ));

        let at_cap = [Expense::general(Money::MAX).bought_by("a")];
        let settlement = settle(&people, &at_cap, &[Contribution::new("a", Money::MAX)]).unwrap();
        assert_eq!(settlement.balances[0].balance, Money::MAX);
    }

    fn participants() -> impl Strategy<Value = Vec<Participant>> {
        prop::collection::vec(any::<bool>(), 0..12).prop_map(|flags| {
            flags
                .into_iter()
                .enumerate()
                .map(|(i, drinks)| Participant::new(format!("p{}", i), drinks))
                .collect()
        })
    }

    fn expenses() -> impl Strategy<Value = Vec<Expense>> {
        prop::collection::vec((0i64..1_000_000, any::<bool>(), prop::option::of(0usize..12)), 0..20)
            .prop_map(|raw| {
                raw.into_iter()
                    .map(|(c, drinkers_only, buyer)| Expense {
                        total: Money::from_cents(c),
                        drinkers_only,
                        purchased_by: buyer.map(|i| format!("p{}", i)),
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn balance_is_paid_minus_due(people in participants(), exps in expenses()) {
            let settlement = settle(&people, &exps, &[]).unwrap();
            prop_assert_eq!(settlement.balances.len(), people.len());
            for b in &settlement.balances {
                prop_assert_eq!(b.balance, b.total_paid - b.due);
                prop_assert_eq!(b.total_paid, b.paid_in_ledger + b.paid_as_buyer);
            }
        }

        #[test]
        fn abstainers_never_pay_for_drinks(people in participants(), exps in expenses()) {
            let settlement = settle(&people, &exps, &[]).unwrap();
            for b in settlement.balances.iter().filter(|b| !b.drinks_alcohol) {
                prop_assert_eq!(b.due, settlement.split.per_person_general);
            }
        }

        #[test]
        fn dues_cover_pools_within_rounding(people in participants(), exps in expenses()) {
            let settlement = settle(&people, &exps, &[]).unwrap();
            let split = settlement.split;
            let drinkers = people.iter().filter(|p| p.drinks_alcohol).count();
            if !people.is_empty() && drinkers > 0 {
                let diff = (settlement.total_due() - split.pools.total()).cents().abs();
                prop_assert!(diff <= people.len() as i64);
            }
        }
    }
}
