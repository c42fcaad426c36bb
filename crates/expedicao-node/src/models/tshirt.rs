//! T-shirt orders for an expedition.

use super::Record;
use expedicao_rateio::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShirtSize {
    P,
    M,
    G,
    GG,
    G1,
    G2,
    G3,
    G4,
    G5,
}

impl ShirtSize {
    pub const ALL: [ShirtSize; 9] = [
        ShirtSize::P,
        ShirtSize::M,
        ShirtSize::G,
        ShirtSize::GG,
        ShirtSize::G1,
        ShirtSize::G2,
        ShirtSize::G3,
        ShirtSize::G4,
        ShirtSize::G5,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TShirtOrder {
    pub id: String,
    pub expedition_id: String,
    pub profile_id: String,
    pub size: ShirtSize,
    pub quantity: u32,
    /// Unit price
    pub price: Option<Money>,
    #[serde(default)]
    pub has_paid: bool,
}

impl TShirtOrder {
    pub fn total(&self) -> crate::Result<Money> {
        let price = self.price.unwrap_or_default();
        super::require_amount("price", price)?;
        Ok(price.times(f64::from(self.quantity))?)
    }
}

impl Record for TShirtOrder {
    const PREFIX: &'static str = "tshirt";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTShirtOrder {
    pub profile_id: String,
    #[serde(default = "default_size")]
    pub size: ShirtSize,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub price: Option<Money>,
    #[serde(default)]
    pub has_paid: bool,
}

fn default_size() -> ShirtSize {
    ShirtSize::M
}

fn default_quantity() -> u32 {
    1
}

impl NewTShirtOrder {
    pub fn into_order(self, id: String, expedition_id: String) -> TShirtOrder {
        TShirtOrder {
            id,
            expedition_id,
            profile_id: self.profile_id,
            size: self.size,
            quantity: self.quantity,
            price: self.price,
            has_paid: self.has_paid,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TShirtPatch {
    pub size: Option<ShirtSize>,
    pub quantity: Option<u32>,
    pub price: Option<Money>,
    pub has_paid: Option<bool>,
}

impl TShirtPatch {
    pub fn apply(self, order: &mut TShirtOrder) {
        if let Some(size) = self.size {
            order.size = size;
        }
        if let Some(quantity) = self.quantity {
            order.quantity = quantity;
        }
        if let Some(price) = self.price {
            order.price = Some(price);
        }
        if let Some(paid) = self.has_paid {
            order.has_paid = paid;
        }
    }
}
