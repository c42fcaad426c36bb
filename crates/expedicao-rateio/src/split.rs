//! Pool split: general vs. drinkers-only expenses.

use crate::error::{Error, Result};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Someone travelling on the expedition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub drinks_alcohol: bool,
}

impl Participant {
    pub fn new(id: impl Into<String>, drinks_alcohol: bool) -> Self {
        Self {
            id: id.into(),
            drinks_alcohol,
        }
    }
}

/// An expense the group shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Total price of the purchase
    pub total: Money,

    /// Only participants who drink share this expense
    pub drinkers_only: bool,

    /// Participant who paid out of pocket, if any.
    /// `None` when the club cash box paid or the payer is unknown.
    pub purchased_by: Option<String>,
}

impl Expense {
    /// An expense shared by everyone.
    pub fn general(total: Money) -> Self {
        Self {
            total,
            drinkers_only: false,
            purchased_by: None,
        }
    }

    /// An expense shared by drinkers only.
    pub fn drinkers_only(total: Money) -> Self {
        Self {
            total,
            drinkers_only: true,
            purchased_by: None,
        }
    }

    /// Builder: attribute the purchase to a participant.
    pub fn bought_by(mut self, participant_id: impl Into<String>) -> Self {
        self.purchased_by = Some(participant_id.into());
        self
    }
}

/// The two expense pools of an expedition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pools {
    pub general: Money,
    pub drinkers: Money,
}

impl Pools {
    /// Sum expenses into their pools.
    ///
    /// Fails with [`Error::InvalidAmount`] when a pool, or both together,
    /// would overflow.
    pub fn from_expenses(expenses: &[Expense]) -> Result<Self> {
        let mut pools = Self::default();
        for expense in expenses {
            let pool = if expense.drinkers_only {
                &mut pools.drinkers
            } else {
                &mut pools.general
            };
            *pool = pool
                .checked_add(expense.total)
                .ok_or_else(|| Error::InvalidAmount(expense.total.to_string()))?;
        }
        if pools.general.checked_add(pools.drinkers).is_none() {
            return Err(Error::InvalidAmount(pools.drinkers.to_string()));
        }
        Ok(pools)
    }

    pub fn total(&self) -> Money {
        self.general + self.drinkers
    }
}

/// Per-head shares of each pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub pools: Pools,
    pub participant_count: usize,

    /// Number of drinkers, floored at 1 so the drinkers pool always divides.
    pub drinker_count: usize,

    pub per_person_general: Money,
    pub per_drinker: Money,
}

impl Split {
    pub fn compute(participants: &[Participant], expenses: &[Expense]) -> Result<Self> {
        let pools = Pools::from_expenses(expenses)?;
        let participant_count = participants.len();
        let drinker_count = participants
            .iter()
            .filter(|p| p.drinks_alcohol)
            .count()
            .max(1);

        Ok(Self {
            pools,
            participant_count,
            drinker_count,
            per_person_general: pools.general.split(participant_count),
            per_drinker: pools.drinkers.split(drinker_count),
        })
    }

    /// What a participant owes before contributions.
    pub fn due(&self, participant: &Participant) -> Money {
        if participant.drinks_alcohol {
            self.per_person_general + self.per_drinker
        } else {
            self.per_person_general
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn pools_separate_drinkers_only() {
        let pools = Pools::from_expenses(&[
            Expense::general(cents(1000)),
            Expense::drinkers_only(cents(400)),
            Expense::general(cents(500)),
        ])
        .unwrap();
        assert_eq!(pools.general, cents(1500));
        assert_eq!(pools.drinkers, cents(400));
        assert_eq!(pools.total(), cents(1900));
    }

    #[test]
    fn no_participants_no_share() {
        let split = Split::compute(&[], &[Expense::general(cents(1000))]).unwrap();
        assert_eq!(split.participant_count, 0);
        assert_eq!(split.per_person_general, Money::ZERO);
    }

    #[test]
    fn drinker_count_floored_at_one() {
        let people = [Participant::new("a", false), Participant::new("b", false)];
        let split = Split::compute(&people, &[Expense::drinkers_only(cents(900))]).unwrap();
        assert_eq!(split.drinker_count, 1);
        assert_eq!(split.per_drinker, cents(900));
        // nobody drinks, so nobody owes the beer
        assert!(people.iter().all(|p| split.due(p) == Money::ZERO));
    }

    #[test]
    fn drinker_due_includes_both_pools() {
        let people = [
            Participant::new("a", true),
            Participant::new("b", false),
            Participant::new("c", true),
            Participant::new("d", false),
        ];
        let split = Split::compute(
            &people,
            &[Expense::general(cents(8000)), Expense::drinkers_only(cents(3000))],
        )
        .unwrap();
        assert_eq!(split.per_person_general, cents(2000));
        assert_eq!(split.per_drinker, cents(1500));
        assert_eq!(split.due(&people[0]), cents(3500));
        assert_eq!(split.due(&people[1]), cents(2000));
    }

    #[test]
    fn overflowing_pools_rejected() {
        let half = cents(i64::MAX / 2 + 1);
        let same_pool = [Expense::general(half), Expense::general(half)];
        assert!(matches!(
            Pools::from_expenses(&same_pool),
            Err(Error::InvalidAmount(_))
        ));

        let both_pools = [Expense::general(half), Expense::drinkers_only(half)];
        assert!(Pools::from_expenses(&both_pools).is_err());
        assert!(Split::compute(&[Participant::new("a", true)], &both_pools).is_err());
    }
}
