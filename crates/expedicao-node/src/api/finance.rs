//! Money: expedition purchases and settlement, monthly fees, the cash ledger.

use super::{AppState, Caller};
use crate::club::{CashSummary, FeeSummary};
use crate::error::{Error, Result};
use crate::models::{
    EntryKind, FeePatch, LedgerEntry, LedgerPatch, MonthlyFee, NewLedgerEntry, NewPurchase,
    PaymentMethod, Purchase, PurchasePatch,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, NaiveDate};
use expedicao_rateio::{Money, Settlement};
use serde::{Deserialize, Serialize};

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// --- Purchases ---

pub async fn list_purchases(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<Purchase>>> {
    let state = state.read().await;
    Ok(Json(state.club.list_purchases(&id)?))
}

pub async fn add_purchase(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(new): Json<NewPurchase>,
) -> Result<(StatusCode, Json<Purchase>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let purchase = state.club.add_purchase(&id, new)?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Purchase>> {
    let state = state.read().await;
    Ok(Json(state.club.get_purchase(&id)?))
}

pub async fn update_purchase(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(patch): Json<PurchasePatch>,
) -> Result<Json<Purchase>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.update_purchase(&id, patch)?))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_purchase(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn settlement(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Settlement>> {
    let state = state.read().await;
    Ok(Json(state.club.settlement(&id)?))
}

// --- Monthly fees ---

#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateFees {
    pub year: i32,
    pub amount: Money,
    /// Whole year when absent
    pub months: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize)]
pub struct PayFee {
    /// Defaults to the fee amount
    pub amount: Option<Money>,
    /// Defaults to today
    pub payment_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub deleted: usize,
}

pub async fn list_fees(
    State(state): State<AppState>,
    _caller: Caller,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<MonthlyFee>>> {
    let state = state.read().await;
    Ok(Json(state.club.list_fees(query.year)?))
}

pub async fn generate_fees(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<GenerateFees>,
) -> Result<(StatusCode, Json<Vec<MonthlyFee>>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let created = state.club.generate_fees(req.year, req.amount, req.months)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn clear_fees(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<YearQuery>,
) -> Result<Json<Cleared>> {
    caller.require_editor()?;
    let year = query
        .year
        .ok_or_else(|| Error::InvalidInput("year is required".into()))?;
    let state = state.write().await;
    let deleted = state.club.clear_fees_for_year(year)?;
    Ok(Json(Cleared { deleted }))
}

pub async fn fee_summary(
    State(state): State<AppState>,
    _caller: Caller,
    Query(query): Query<YearQuery>,
) -> Result<Json<FeeSummary>> {
    let today = today();
    let year = query.year.unwrap_or(today.year());
    let state = state.read().await;
    Ok(Json(state.club.fee_summary(year, today)?))
}

pub async fn get_fee(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<MonthlyFee>> {
    let state = state.read().await;
    Ok(Json(state.club.get_fee(&id)?))
}

pub async fn update_fee(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(patch): Json<FeePatch>,
) -> Result<Json<MonthlyFee>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.update_fee(&id, patch)?))
}

pub async fn delete_fee(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_fee(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pay_fee(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(req): Json<PayFee>,
) -> Result<Json<MonthlyFee>> {
    caller.require_editor()?;
    let state = state.write().await;
    let amount = match req.amount {
        Some(amount) => amount,
        None => state.club.get_fee(&id)?.amount,
    };
    let date = req.payment_date.unwrap_or_else(today);
    let fee = state
        .club
        .pay_fee(&id, amount, date, req.payment_method, req.notes)?;
    Ok(Json(fee))
}

pub async fn undo_fee(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<MonthlyFee>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.undo_fee_payment(&id)?))
}

// --- Cash ledger ---

#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    pub kind: Option<EntryKind>,
}

pub async fn list_ledger(
    State(state): State<AppState>,
    _caller: Caller,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<Vec<LedgerEntry>>> {
    let state = state.read().await;
    Ok(Json(state.club.list_ledger(query.kind)?))
}

pub async fn add_ledger_entry(
    State(state): State<AppState>,
    caller: Caller,
    Json(new): Json<NewLedgerEntry>,
) -> Result<(StatusCode, Json<LedgerEntry>)> {
    caller.require_editor()?;
    let state = state.write().await;
    let entry = state.club.add_ledger_entry(new)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_ledger_entry(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<LedgerEntry>> {
    let state = state.read().await;
    Ok(Json(state.club.get_ledger_entry(&id)?))
}

pub async fn update_ledger_entry(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(patch): Json<LedgerPatch>,
) -> Result<Json<LedgerEntry>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.update_ledger_entry(&id, patch)?))
}

pub async fn delete_ledger_entry(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    caller.require_editor()?;
    let state = state.write().await;
    state.club.delete_ledger_entry(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_entry_done(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<LedgerEntry>> {
    caller.require_editor()?;
    let state = state.write().await;
    Ok(Json(state.club.mark_entry_done(&id, today())?))
}

pub async fn cash_summary(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<CashSummary>> {
    let state = state.read().await;
    Ok(Json(state.club.cash_summary()?))
}

#[cfg(test)]
mod tests {
    use super::super::testing::fixture;
    use super::*;
    use crate::models::{NewProfile, ProfileKind};

    #[tokio::test]
    async fn paying_a_fee_defaults_to_its_amount() {
        let fx = fixture();
        {
            let state = fx.state.read().await;
            state
                .club
                .create_profile(NewProfile {
                    name: "Bruno".into(),
                    kind: ProfileKind::Socio,
                    phone: String::new(),
                    email: None,
                    drinks_alcohol: false,
                    is_active: true,
                })
                .unwrap();
        }

        let (_, Json(fees)) = generate_fees(
            State(fx.state.clone()),
            fx.editor.clone(),
            Json(GenerateFees {
                year: 2025,
                amount: Money::from_cents(5_000),
                months: Some(vec![1, 2]),
            }),
        )
        .await
        .unwrap();
        assert_eq!(fees.len(), 2);

        let Json(paid) = pay_fee(
            State(fx.state.clone()),
            fx.editor.clone(),
            Path(fees[0].id.clone()),
            Json(PayFee {
                amount: None,
                payment_date: NaiveDate::from_ymd_opt(2025, 1, 10),
                payment_method: PaymentMethod::Pix,
                notes: None,
            }),
        )
        .await
        .unwrap();
        assert!(paid.is_paid());

        let Json(cash) = cash_summary(State(fx.state.clone()), fx.user.clone())
            .await
            .unwrap();
        assert_eq!(cash.received, Money::from_cents(5_000));

        let Json(cleared) = clear_fees(
            State(fx.state.clone()),
            fx.editor.clone(),
            Query(YearQuery { year: Some(2025) }),
        )
        .await
        .unwrap();
        assert_eq!(cleared.deleted, 2);
    }

    #[tokio::test]
    async fn clearing_fees_needs_a_year() {
        let fx = fixture();
        let missing = clear_fees(
            State(fx.state.clone()),
            fx.editor.clone(),
            Query(YearQuery::default()),
        )
        .await;
        assert!(matches!(missing, Err(Error::InvalidInput(_))));
    }
}
