use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use courtyard_core::{
    MemberId, NewPayment, Payment, PaymentChanges, PaymentId, PaymentStatus, PaymentsSummary,
};

use crate::backend::{BackendClient, BackendError, Order, TableQuery};

const TABLE: &str = "payments";

/// Payments made by members.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// A member's payments, newest first.
    async fn list_payments(&self, member: MemberId) -> Result<Vec<Payment>, BackendError>;

    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, BackendError>;

    async fn update_payment(
        &self,
        id: PaymentId,
        changes: &PaymentChanges,
    ) -> Result<Payment, BackendError>;

    async fn delete_payment(&self, id: PaymentId) -> Result<(), BackendError>;

    /// Revenue and count over every completed payment.
    async fn payments_summary(&self) -> Result<PaymentsSummary, BackendError>;
}

#[derive(Deserialize)]
struct AmountRow {
    amount: Decimal,
}

#[async_trait]
impl PaymentGateway for BackendClient {
    #[instrument(skip(self), fields(member_id = %member))]
    async fn list_payments(&self, member: MemberId) -> Result<Vec<Payment>, BackendError> {
        let query = TableQuery::from(TABLE)
            .eq("member_id", member)
            .order("created_at", Order::Desc);
        self.select(&query).await
    }

    #[instrument(skip_all, fields(member_id = %payment.member_id))]
    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, BackendError> {
        self.insert(TABLE, payment).await
    }

    #[instrument(skip(self, changes), fields(payment_id = %id))]
    async fn update_payment(
        &self,
        id: PaymentId,
        changes: &PaymentChanges,
    ) -> Result<Payment, BackendError> {
        self.update(&TableQuery::from(TABLE).eq("id", id), changes)
            .await
    }

    #[instrument(skip(self), fields(payment_id = %id))]
    async fn delete_payment(&self, id: PaymentId) -> Result<(), BackendError> {
        self.delete(&TableQuery::from(TABLE).eq("id", id)).await
    }

    #[instrument(skip(self))]
    async fn payments_summary(&self) -> Result<PaymentsSummary, BackendError> {
        let query = TableQuery::from(TABLE)
            .select("amount")
            .eq("status", PaymentStatus::Completed);
        let rows: Vec<AmountRow> = self.select(&query).await?;
        Ok(PaymentsSummary::from_completed(
            rows.into_iter().map(|row| row.amount),
        ))
    }
}
