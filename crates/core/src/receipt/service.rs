//! Receipt service.
//!
//! Validation and lifecycle for receipts, plus the conversions between
//! decimal amounts and the integer minor units they are stored as.

use chrono::Utc;
use milebook_shared::types::{ReceiptId, UserId};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::types::{Receipt, ReceiptFields};
use crate::ledger::{LedgerError, RecordState, VehicleInfo};

/// Maximum decimal places of a receipt amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Maximum decimal places of a fuel volume.
pub const VOLUME_SCALE: u32 = 3;

/// Stateless receipt service.
pub struct ReceiptService;

impl ReceiptService {
    /// Validates receipt fields.
    ///
    /// # Errors
    ///
    /// Returns the first violated amount or volume rule.
    pub fn validate(fields: &ReceiptFields) -> Result<(), LedgerError> {
        if fields.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
        if fields.amount.normalize().scale() > AMOUNT_SCALE {
            return Err(LedgerError::AmountPrecision);
        }
        Self::amount_to_cents(fields.amount)?;

        if let Some(litres) = fields.litres {
            if litres <= Decimal::ZERO {
                return Err(LedgerError::NonPositiveVolume);
            }
            if litres.normalize().scale() > VOLUME_SCALE {
                return Err(LedgerError::VolumePrecision);
            }
            Self::litres_to_millilitres(litres)?;
        }
        Ok(())
    }

    /// Validates a new receipt and builds the record to persist.
    ///
    /// # Errors
    ///
    /// Returns the first violated receipt rule.
    pub fn create_receipt(
        user_id: UserId,
        vehicle: &VehicleInfo,
        fields: ReceiptFields,
    ) -> Result<Receipt, LedgerError> {
        Self::validate(&fields)?;

        let now = Utc::now();
        Ok(Receipt {
            id: ReceiptId::new(),
            user_id,
            vehicle_id: vehicle.id,
            date: fields.date,
            amount: fields.amount,
            litres: fields.litres,
            vendor: normalize_text(fields.vendor),
            note: normalize_text(fields.note),
            state: RecordState::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validates a full-field update and applies it to `receipt`.
    ///
    /// `receipt` is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ReceiptNotFound` for a deleted receipt,
    /// otherwise the first violated receipt rule.
    pub fn update_receipt(receipt: &mut Receipt, fields: ReceiptFields) -> Result<(), LedgerError> {
        if !receipt.is_active() {
            return Err(LedgerError::ReceiptNotFound(receipt.id));
        }
        Self::validate(&fields)?;

        receipt.date = fields.date;
        receipt.amount = fields.amount;
        receipt.litres = fields.litres;
        receipt.vendor = normalize_text(fields.vendor);
        receipt.note = normalize_text(fields.note);
        receipt.updated_at = Utc::now();
        Ok(())
    }

    /// Soft-deletes a receipt. Returns false if it was already deleted.
    pub fn delete_receipt(receipt: &mut Receipt) -> bool {
        if !receipt.is_active() {
            return false;
        }
        receipt.state = RecordState::Deleted;
        receipt.updated_at = Utc::now();
        true
    }

    /// Orders receipts newest date first, ties broken by newest creation first.
    pub fn sort_newest_first(receipts: &mut [Receipt]) {
        receipts.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
    }

    /// Converts an amount to integer cents.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AmountPrecision` for sub-cent amounts and
    /// `LedgerError::AmountOutOfRange` if the result does not fit an `i64`.
    pub fn amount_to_cents(amount: Decimal) -> Result<i64, LedgerError> {
        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(LedgerError::AmountOutOfRange)?;
        if !cents.fract().is_zero() {
            return Err(LedgerError::AmountPrecision);
        }
        cents.to_i64().ok_or(LedgerError::AmountOutOfRange)
    }

    /// Converts stored cents back to an amount.
    #[must_use]
    pub fn cents_to_amount(cents: i64) -> Decimal {
        Decimal::new(cents, AMOUNT_SCALE)
    }

    /// Converts a volume in litres to integer millilitres.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::VolumePrecision` for sub-millilitre volumes and
    /// `LedgerError::AmountOutOfRange` if the result does not fit an `i64`.
    pub fn litres_to_millilitres(litres: Decimal) -> Result<i64, LedgerError> {
        let millilitres = litres
            .checked_mul(Decimal::ONE_THOUSAND)
            .ok_or(LedgerError::AmountOutOfRange)?;
        if !millilitres.fract().is_zero() {
            return Err(LedgerError::VolumePrecision);
        }
        millilitres.to_i64().ok_or(LedgerError::AmountOutOfRange)
    }

    /// Converts stored millilitres back to litres.
    #[must_use]
    pub fn millilitres_to_litres(millilitres: i64) -> Decimal {
        Decimal::new(millilitres, VOLUME_SCALE)
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
