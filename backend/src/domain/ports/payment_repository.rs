//! Port abstraction for payment persistence adapters.

use async_trait::async_trait;

use crate::domain::{NewPayment, Payment, PaymentPatch};

use super::StoreError;

/// Typed create/read/update access to payment records.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Create a payment, assigning the next id.
    async fn create(&self, payment: NewPayment) -> Result<Payment, StoreError>;

    /// Fetch a payment by id.
    async fn find(&self, id: i32) -> Result<Option<Payment>, StoreError>;

    /// All payments.
    async fn list(&self) -> Result<Vec<Payment>, StoreError>;

    /// Payments owed by one user.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Payment>, StoreError>;

    /// Payments attached to one plot.
    async fn list_for_plot(&self, plot_id: i32) -> Result<Vec<Payment>, StoreError>;

    /// Shallow-merge the patch into an existing payment.
    async fn update(&self, id: i32, patch: PaymentPatch) -> Result<Option<Payment>, StoreError>;
}
