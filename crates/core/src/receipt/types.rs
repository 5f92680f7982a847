//! Receipt domain types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use milebook_shared::types::{ReceiptId, UserId, VehicleId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::RecordState;

/// User-editable receipt fields, used for both creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptFields {
    /// Date printed on the receipt.
    pub date: NaiveDate,
    /// Amount paid.
    pub amount: Decimal,
    /// Fuel volume in litres, for fuel receipts.
    pub litres: Option<Decimal>,
    /// Where the receipt was issued.
    pub vendor: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
}

/// A receipt as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier.
    pub id: ReceiptId,
    /// Owning user.
    pub user_id: UserId,
    /// Vehicle the expense belongs to.
    pub vehicle_id: VehicleId,
    /// Date printed on the receipt.
    pub date: NaiveDate,
    /// Amount paid.
    pub amount: Decimal,
    /// Fuel volume in litres.
    pub litres: Option<Decimal>,
    /// Where the receipt was issued.
    pub vendor: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
    /// Active or soft-deleted.
    pub state: RecordState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Receipt {
    /// Calendar year the receipt is filed under.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Returns true if the receipt has not been soft-deleted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }
}
