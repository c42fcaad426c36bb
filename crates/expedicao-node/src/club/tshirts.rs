use super::Club;
use crate::error::{Error, Result};
use crate::models::{
    new_id, Expedition, NewTShirtOrder, Profile, ShirtSize, TShirtOrder, TShirtPatch,
};
use expedicao_rateio::Money;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TShirtSummary {
    pub total_pieces: u32,
    pub paid_pieces: u32,
    /// Every size is present, zero when nobody ordered it
    pub by_size: BTreeMap<ShirtSize, u32>,
    pub received: Money,
    pub pending: Money,
}

impl Club {
    pub fn add_tshirt_order(&self, expedition_id: &str, new: NewTShirtOrder) -> Result<TShirtOrder> {
        self.storage.require::<Expedition>(expedition_id)?;
        self.storage.require::<Profile>(&new.profile_id)?;
        if new.quantity == 0 {
            return Err(Error::InvalidInput("quantity must be at least 1".into()));
        }
        let order = new.into_order(new_id("tshirt"), expedition_id.to_string());
        order.total()?;
        self.storage.put(&order)?;
        Ok(order)
    }

    pub fn list_tshirt_orders(&self, expedition_id: &str) -> Result<Vec<TShirtOrder>> {
        self.storage.require::<Expedition>(expedition_id)?;
        self.storage
            .list_where(|o: &TShirtOrder| o.expedition_id == expedition_id)
    }

    pub fn update_tshirt_order(&self, id: &str, patch: TShirtPatch) -> Result<TShirtOrder> {
        let mut order: TShirtOrder = self.storage.require(id)?;
        if patch.quantity == Some(0) {
            return Err(Error::InvalidInput("quantity must be at least 1".into()));
        }
        patch.apply(&mut order);
        order.total()?;
        self.storage.put(&order)?;
        Ok(order)
    }

    pub fn delete_tshirt_order(&self, id: &str) -> Result<()> {
        self.storage.require::<TShirtOrder>(id)?;
        self.storage.delete::<TShirtOrder>(id)
    }

    pub fn tshirt_summary(&self, expedition_id: &str) -> Result<TShirtSummary> {
        let orders = self.list_tshirt_orders(expedition_id)?;

        let mut by_size: BTreeMap<ShirtSize, u32> =
            ShirtSize::ALL.iter().map(|&s| (s, 0)).collect();
        let mut summary = TShirtSummary {
            total_pieces: 0,
            paid_pieces: 0,
            by_size: BTreeMap::new(),
            received: Money::ZERO,
            pending: Money::ZERO,
        };
        for order in &orders {
            *by_size.entry(order.size).or_default() += order.quantity;
            summary.total_pieces += order.quantity;
            if order.has_paid {
                summary.paid_pieces += order.quantity;
                summary.received += order.total()?;
            } else {
                summary.pending += order.total()?;
            }
        }
        summary.by_size = by_size;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{club, member, trip};
    use super::*;

    fn order(profile: &str, size: ShirtSize, quantity: u32, paid: bool) -> NewTShirtOrder {
        NewTShirtOrder {
            profile_id: profile.into(),
            size,
            quantity,
            price: Some(Money::from_cents(5_000)),
            has_paid: paid,
        }
    }

    #[test]
    fn summary_by_size_and_payment() {
        let (_dir, club) = club();
        let ana = member(&club, "Ana", true);
        let bruno = member(&club, "Bruno", false);
        let exp = trip(&club, &[&ana, &bruno]);

        club.add_tshirt_order(&exp, order(&ana, ShirtSize::M, 2, true)).unwrap();
        let pending = club
            .add_tshirt_order(&exp, order(&bruno, ShirtSize::G3, 1, false))
            .unwrap();

        let summary = club.tshirt_summary(&exp).unwrap();
        assert_eq!(summary.total_pieces, 3);
        assert_eq!(summary.paid_pieces, 2);
        assert_eq!(summary.by_size[&ShirtSize::M], 2);
        assert_eq!(summary.by_size[&ShirtSize::G3], 1);
        assert_eq!(summary.by_size[&ShirtSize::G5], 0);
        assert_eq!(summary.by_size.len(), 9);
        assert_eq!(summary.received, Money::from_cents(10_000));
        assert_eq!(summary.pending, Money::from_cents(5_000));

        club.update_tshirt_order(
            &pending.id,
            TShirtPatch {
                has_paid: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(club.tshirt_summary(&exp).unwrap().pending, Money::ZERO);
    }

    #[test]
    fn zero_quantity_rejected() {
        let (_dir, club) = club();
        let ana = member(&club, "Ana", true);
        let exp = trip(&club, &[&ana]);
        assert!(matches!(
            club.add_tshirt_order(&exp, order(&ana, ShirtSize::P, 0, false)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn oversized_price_rejected() {
        let (_dir, club) = club();
        let ana = member(&club, "Ana", true);
        let exp = trip(&club, &[&ana]);
        let mut huge = order(&ana, ShirtSize::G, 2, false);
        huge.price = Some(Money::MAX);
        assert!(club.add_tshirt_order(&exp, huge).is_err());
        assert!(club.list_tshirt_orders(&exp).unwrap().is_empty());
    }
}
