//! Ledger entry model - the club's general cash book.

use super::Record;
use chrono::NaiveDate;
use expedicao_rateio::Money;
use serde::{Deserialize, Serialize};

/// Money in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "ENTRADA")]
    Entrada,
    #[serde(rename = "SAIDA")]
    Saida,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryStatus {
    Pendente,
    Pago,
    Recebido,
    Atrasado,
    Cancelado,
}

/// Where an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySource {
    Mensalidade,
    #[serde(rename = "Conta a Receber")]
    ContaAReceber,
    #[serde(rename = "Conta a Pagar")]
    ContaAPagar,
    Avulso,
}

/// One line in the cash ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,

    pub description: String,

    pub amount: Money,

    pub category: String,

    pub date: NaiveDate,

    pub payment_date: Option<NaiveDate>,

    pub status: EntryStatus,

    /// Member the entry refers to (payer of a receipt)
    pub profile_id: Option<String>,

    /// Supplier of a payment
    pub provider: Option<String>,

    pub expedition_id: Option<String>,

    pub source: EntrySource,

    pub notes: Option<String>,

    pub attachment_url: Option<String>,

    /// Fee this receipt settles
    pub monthly_fee_id: Option<String>,

    /// Expedition purchase this payment covers
    pub purchase_id: Option<String>,
}

impl LedgerEntry {
    /// Money that actually came in.
    pub fn is_receipt(&self) -> bool {
        self.kind == EntryKind::Entrada && self.status == EntryStatus::Recebido
    }

    /// Money that actually went out.
    pub fn is_payment(&self) -> bool {
        self.kind == EntryKind::Saida && self.status == EntryStatus::Pago
    }

    /// A receipt from `profile_id` toward `expedition_id`.
    pub fn is_contribution(&self, expedition_id: &str, profile_id: &str) -> bool {
        self.is_receipt()
            && self.expedition_id.as_deref() == Some(expedition_id)
            && self.profile_id.as_deref() == Some(profile_id)
    }

    /// Settle the entry: receipts become `Recebido`, payments `Pago`.
    pub fn mark_done(&mut self, today: NaiveDate) {
        self.status = match self.kind {
            EntryKind::Entrada => EntryStatus::Recebido,
            EntryKind::Saida => EntryStatus::Pago,
        };
        self.payment_date = Some(today);
    }
}

impl Record for LedgerEntry {
    const PREFIX: &'static str = "ledger";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields for a new ledger entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLedgerEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub status: EntryStatus,
    pub profile_id: Option<String>,
    pub provider: Option<String>,
    pub expedition_id: Option<String>,
    #[serde(default = "default_source")]
    pub source: EntrySource,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
}

fn default_source() -> EntrySource {
    EntrySource::Avulso
}

impl NewLedgerEntry {
    pub fn into_entry(self, id: String) -> LedgerEntry {
        LedgerEntry {
            id,
            kind: self.kind,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date,
            payment_date: self.payment_date,
            status: self.status,
            profile_id: non_empty(self.profile_id),
            provider: non_empty(self.provider),
            expedition_id: non_empty(self.expedition_id),
            source: self.source,
            notes: self.notes,
            attachment_url: self.attachment_url,
            monthly_fee_id: None,
            purchase_id: None,
        }
    }
}

/// Partial ledger entry update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerPatch {
    #[serde(rename = "type")]
    pub kind: Option<EntryKind>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub status: Option<EntryStatus>,
    pub profile_id: Option<String>,
    pub provider: Option<String>,
    pub expedition_id: Option<String>,
    pub source: Option<EntrySource>,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
}

impl LedgerPatch {
    pub fn apply(self, entry: &mut LedgerEntry) {
        if let Some(kind) = self.kind {
            entry.kind = kind;
        }
        if let Some(description) = self.description {
            entry.description = description;
        }
        if let Some(amount) = self.amount {
            entry.amount = amount;
        }
        if let Some(category) = self.category {
            entry.category = category;
        }
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(date) = self.payment_date {
            entry.payment_date = Some(date);
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
        // empty strings clear the link
        if let Some(profile_id) = self.profile_id {
            entry.profile_id = non_empty(Some(profile_id));
        }
        if let Some(provider) = self.provider {
            entry.provider = non_empty(Some(provider));
        }
        if let Some(expedition_id) = self.expedition_id {
            entry.expedition_id = non_empty(Some(expedition_id));
        }
        if let Some(source) = self.source {
            entry.source = source;
        }
        if let Some(notes) = self.notes {
            entry.notes = Some(notes);
        }
        if let Some(url) = self.attachment_url {
            entry.attachment_url = Some(url);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
