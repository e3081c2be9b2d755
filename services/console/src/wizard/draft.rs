//! Order draft and the values the wizard hands back

use api::error::ApiError;
use api::models::{Client, CreateOrderDetailRequest, CreateOrderRequest, Part, ServiceType, Vehicle};
use auth::models::User;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use super::WizardError;

/// One part attached to the order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartLine {
    pub part_id: i64,
    pub part_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl PartLine {
    pub(crate) fn new(part: &Part, quantity: u32) -> Self {
        Self {
            part_id: part.id,
            part_name: part.name.clone(),
            quantity,
            unit_price: part.unit_price,
            line_total: part.unit_price * Decimal::from(quantity),
        }
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.line_total = self.unit_price * Decimal::from(quantity);
    }

    pub(crate) fn detail_request(&self, order_id: i64) -> CreateOrderDetailRequest {
        CreateOrderDetailRequest {
            order_id,
            part_id: self.part_id,
            quantity: self.quantity,
            total_price: self.line_total,
        }
    }
}

/// Selections made so far; discarded on submit or when the wizard is dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    pub client_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub service_type_id: Option<i64>,
    pub mechanic_id: Option<i64>,
    pub estimated_date: Option<NaiveDate>,
    pub part_lines: Vec<PartLine>,
}

impl OrderDraft {
    /// Sum of every line total
    pub fn subtotal(&self) -> Decimal {
        self.part_lines.iter().map(|l| l.line_total).sum()
    }

    /// Check the service fields and that the estimated date is after `today`
    pub(crate) fn validate_service(&self, today: NaiveDate) -> Result<NaiveDate, WizardError> {
        self.service_type_id
            .ok_or(WizardError::MissingField("service type"))?;
        self.mechanic_id.ok_or(WizardError::MissingField("mechanic"))?;
        let date = self
            .estimated_date
            .ok_or(WizardError::MissingField("estimated date"))?;

        if date <= today {
            return Err(WizardError::DateNotInFuture { date, today });
        }
        Ok(date)
    }

    /// Header request for an order received at `now`
    pub(crate) fn order_request(
        &self,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<CreateOrderRequest, WizardError> {
        let estimated = self.validate_service(today)?;
        Ok(CreateOrderRequest {
            vehicle_id: self.vehicle_id.ok_or(WizardError::MissingField("vehicle"))?,
            service_type_id: self
                .service_type_id
                .ok_or(WizardError::MissingField("service type"))?,
            mechanic_id: self.mechanic_id.ok_or(WizardError::MissingField("mechanic"))?,
            received_at: now,
            estimated_at: estimated.and_time(NaiveTime::MIN).and_utc(),
        })
    }
}

/// Read-only view of a draft ready to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub client: Client,
    pub vehicle: Vehicle,
    pub service_type: ServiceType,
    pub mechanic: User,
    pub estimated_date: NaiveDate,
    pub part_lines: Vec<PartLine>,
    pub subtotal: Decimal,
}

/// A part line the backend refused after the header was created
#[derive(Debug)]
pub struct FailedLine {
    pub line: PartLine,
    pub error: ApiError,
}

/// Result of a submitted order
#[derive(Debug)]
pub struct SubmitOutcome {
    /// Id the backend assigned to the order header
    pub order_id: i64,
    pub created_lines: Vec<PartLine>,
    pub failed_lines: Vec<FailedLine>,
}

impl SubmitOutcome {
    /// Whether every part line was stored
    pub fn is_complete(&self) -> bool {
        self.failed_lines.is_empty()
    }
}
