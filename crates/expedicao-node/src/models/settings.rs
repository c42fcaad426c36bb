//! Club-wide settings.

use serde::{Deserialize, Serialize};

/// Site appearance and the category lists offered by the forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub site_logo: Option<String>,
    pub favicon: Option<String>,

    /// Categories for expedition purchases
    pub purchase_categories: Vec<String>,

    /// Categories for the cash ledger
    pub ledger_categories: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            site_logo: None,
            favicon: None,
            purchase_categories: owned(&[
                "Mercado",
                "Investimento",
                "Isca/Pesca",
                "Combustível",
                "Camping",
                "Bebida Alcoólica",
                "Outros",
            ]),
            ledger_categories: owned(&[
                "Mensalidade",
                "Cota de Expedição",
                "Camiseta",
                "Rateio",
                "Acampamento",
                "Alimentação",
                "Equipamento",
                "Combustível",
                "Taxa/Licença",
                "Outros",
            ]),
        }
    }
}

impl Settings {
    /// Storage key.
    pub const KEY: &'static str = "settings:club";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_alcohol() {
        let settings = Settings::default();
        assert!(settings
            .purchase_categories
            .iter()
            .any(|c| c == crate::models::ALCOHOL_CATEGORY));
        assert_eq!(settings.ledger_categories.len(), 10);
    }
}
