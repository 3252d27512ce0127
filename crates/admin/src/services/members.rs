//! Member directory reads and mutations.
//!
//! Every successful mutation invalidates the cache keys its result could
//! change; a failed mutation invalidates nothing.

use std::sync::Arc;

use tracing::{info, instrument};

use courtyard_core::{
    AccessLog, AccessLogId, Document, DocumentId, Member, MemberId, NewAccessLog, NewDocument,
    NewPayment, NewVehicle, Payment, PaymentChanges, PaymentId, Vehicle, VehicleChanges,
    VehicleId,
};

use crate::cache::{Collection, KeyPrefix, QueryKey};
use crate::components::list_engine::{self, ListPage, MEMBERS_TABLE, ViewParams};
use crate::error::AppError;
use crate::gateway::Gateway;
use crate::models::member_form::{MemberFlags, MemberForm, MemberUpdate};

use super::queries::Queries;

/// Member directory operations.
pub struct MemberService<G> {
    queries: Queries<G>,
}

impl<G: Gateway> MemberService<G> {
    #[must_use]
    pub const fn new(queries: Queries<G>) -> Self {
        Self { queries }
    }

    /// The members table page for `params`.
    ///
    /// The full list is fetched once and cached; search, filters, sort and
    /// pagination all run locally.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the list cannot be loaded.
    pub async fn list(&self, params: &ViewParams) -> Result<ListPage, AppError> {
        let members = self.queries.members(None).await?;
        Ok(list_engine::run(&MEMBERS_TABLE, &members, params))
    }

    /// The full members list as cached.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the list cannot be loaded.
    pub async fn all(&self) -> Result<Arc<Vec<Member>>, AppError> {
        Ok(self.queries.members(None).await?)
    }

    /// One member, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the member cannot be loaded.
    pub async fn get(&self, id: MemberId) -> Result<Option<Arc<Member>>, AppError> {
        Ok(self.queries.member(id).await?)
    }

    /// Validate and create a member.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without contacting the backend when the
    /// form is invalid, or `AppError::Backend` if the insert fails.
    #[instrument(skip_all)]
    pub async fn create(&self, form: &MemberForm) -> Result<Member, AppError> {
        let new_member = form.validate_create()?;
        let member = self.queries.gateway().create_member(&new_member).await?;

        self.queries.invalidate_member_lists().await;
        info!(member_id = %member.id, member_number = %member.member_id, "Member created");
        Ok(member)
    }

    /// Validate and apply an edit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without contacting the backend when the
    /// form is invalid, or `AppError::Backend` if the update fails.
    #[instrument(skip(self, form), fields(member_id = %id))]
    pub async fn update(&self, id: MemberId, form: &MemberForm) -> Result<Member, AppError> {
        let edit = form.validate_edit()?;
        self.apply(id, &MemberUpdate::Edit(edit)).await
    }

    /// Mark the member's ID card as issued.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the update fails.
    #[instrument(skip(self), fields(member_id = %id))]
    pub async fn issue_id_card(&self, id: MemberId) -> Result<Member, AppError> {
        let flags = MemberFlags {
            id_card_created: Some(true),
        };
        self.apply(id, &flags.into()).await
    }

    /// Send a partial update and invalidate what it affects.
    async fn apply(
        &self,
        id: MemberId,
        update: &MemberUpdate,
    ) -> Result<Member, AppError> {
        let member = self.queries.gateway().update_member(id, update).await?;

        self.queries.cache().invalidate(&QueryKey::Member(id)).await;
        self.queries.invalidate_member_lists().await;
        info!(member_id = %id, "Member updated");
        Ok(member)
    }

    /// Delete a member and, through the backend's cascade, its dependents.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the delete fails.
    #[instrument(skip(self), fields(member_id = %id))]
    pub async fn delete(&self, id: MemberId) -> Result<(), AppError> {
        self.queries.gateway().delete_member(id).await?;

        self.queries
            .cache()
            .invalidate_prefix(&KeyPrefix::member(id))
            .await;
        self.queries.invalidate_member_lists().await;
        info!(member_id = %id, "Member deleted");
        Ok(())
    }

    async fn invalidate_collection(&self, id: MemberId, collection: Collection) {
        self.queries
            .cache()
            .invalidate_prefix(&KeyPrefix::collection(id, collection))
            .await;
    }

    // =========================================================================
    // Vehicles
    // =========================================================================

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the insert fails.
    pub async fn add_vehicle(&self, vehicle: &NewVehicle) -> Result<Vehicle, AppError> {
        let created = self.queries.gateway().create_vehicle(vehicle).await?;
        self.invalidate_collection(created.member_id, Collection::Vehicles)
            .await;
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the update fails.
    pub async fn update_vehicle(
        &self,
        id: VehicleId,
        changes: &VehicleChanges,
    ) -> Result<Vehicle, AppError> {
        let updated = self.queries.gateway().update_vehicle(id, changes).await?;
        self.invalidate_collection(updated.member_id, Collection::Vehicles)
            .await;
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the delete fails.
    pub async fn remove_vehicle(&self, member: MemberId, id: VehicleId) -> Result<(), AppError> {
        self.queries.gateway().delete_vehicle(id).await?;
        self.invalidate_collection(member, Collection::Vehicles).await;
        Ok(())
    }

    // =========================================================================
    // Payments (also feed dashboard revenue)
    // =========================================================================

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the insert fails.
    pub async fn add_payment(&self, payment: &NewPayment) -> Result<Payment, AppError> {
        let created = self.queries.gateway().create_payment(payment).await?;
        self.invalidate_payments(created.member_id).await;
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the update fails.
    pub async fn update_payment(
        &self,
        id: PaymentId,
        changes: &PaymentChanges,
    ) -> Result<Payment, AppError> {
        let updated = self.queries.gateway().update_payment(id, changes).await?;
        self.invalidate_payments(updated.member_id).await;
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the delete fails.
    pub async fn remove_payment(&self, member: MemberId, id: PaymentId) -> Result<(), AppError> {
        self.queries.gateway().delete_payment(id).await?;
        self.invalidate_payments(member).await;
        Ok(())
    }

    async fn invalidate_payments(&self, member: MemberId) {
        self.invalidate_collection(member, Collection::Payments).await;
        self.queries
            .cache()
            .invalidate_prefix(&KeyPrefix::dashboard())
            .await;
    }

    // =========================================================================
    // Access logs
    // =========================================================================

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the insert fails.
    pub async fn record_access(&self, entry: &NewAccessLog) -> Result<AccessLog, AppError> {
        let created = self.queries.gateway().create_access_log(entry).await?;
        self.invalidate_collection(created.member_id, Collection::AccessLogs)
            .await;
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the delete fails.
    pub async fn remove_access_log(
        &self,
        member: MemberId,
        id: AccessLogId,
    ) -> Result<(), AppError> {
        self.queries.gateway().delete_access_log(id).await?;
        self.invalidate_collection(member, Collection::AccessLogs)
            .await;
        Ok(())
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the insert fails.
    pub async fn add_document(&self, document: &NewDocument) -> Result<Document, AppError> {
        let created = self.queries.gateway().create_document(document).await?;
        self.invalidate_collection(created.member_id, Collection::Documents)
            .await;
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `AppError::Backend` if the delete fails.
    pub async fn remove_document(&self, member: MemberId, id: DocumentId) -> Result<(), AppError> {
        self.queries.gateway().delete_document(id).await?;
        self.invalidate_collection(member, Collection::Documents)
            .await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::config::CacheConfig;
    use crate::models::member_form::FormField;
    use crate::testing::{InMemoryGateway, fixtures};

    fn service(gateway: &Arc<InMemoryGateway>) -> MemberService<InMemoryGateway> {
        MemberService::new(Queries::new(
            Arc::clone(gateway),
            QueryCache::new(&CacheConfig::default()),
        ))
    }

    fn form(name: &str) -> MemberForm {
        MemberForm {
            name: name.to_string(),
            email: "asha@example.com".to_string(),
            unit: "4B".to_string(),
            building: "Tower A".to_string(),
            ..MemberForm::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_gateway() {
        let gateway = Arc::new(InMemoryGateway::default());
        let err = service(&gateway).create(&form("  ")).await.unwrap_err();

        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains(FormField::Name));
        assert_eq!(gateway.calls().create_member, 0);
    }

    #[tokio::test]
    async fn test_create_invalidates_list() {
        let gateway = Arc::new(InMemoryGateway::default());
        gateway.seed_member(fixtures::member("Existing"));
        let service = service(&gateway);
        let params = ViewParams::new(&MEMBERS_TABLE);

        assert_eq!(service.list(&params).await.unwrap().total_count, 1);
        assert_eq!(service.list(&params).await.unwrap().total_count, 1);
        assert_eq!(gateway.calls().list_members, 1);

        let created = service.create(&form("Asha Rao")).await.unwrap();
        assert_eq!(created.name, "Asha Rao");

        assert_eq!(service.list(&params).await.unwrap().total_count, 2);
        assert_eq!(gateway.calls().list_members, 2);
    }

    #[tokio::test]
    async fn test_failed_mutation_invalidates_nothing() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Existing"));
        let service = service(&gateway);
        let params = ViewParams::new(&MEMBERS_TABLE);
        service.list(&params).await.unwrap();

        gateway.fail_on("update_member");
        let err = service.update(member.id, &form("Renamed")).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));

        service.list(&params).await.unwrap();
        assert_eq!(gateway.calls().list_members, 1);
    }

    #[tokio::test]
    async fn test_update_refreshes_member() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Existing"));
        let service = service(&gateway);

        assert_eq!(service.get(member.id).await.unwrap().unwrap().name, "Existing");
        service.update(member.id, &form("Renamed")).await.unwrap();
        assert_eq!(service.get(member.id).await.unwrap().unwrap().name, "Renamed");
        assert_eq!(gateway.calls().get_member, 2);
    }

    #[tokio::test]
    async fn test_issue_id_card_refreshes_member_and_dashboard() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Asha Rao"));
        let service = service(&gateway);

        assert_eq!(service.queries.dashboard_stats().await.unwrap().id_created_count, 0);
        assert!(!service.get(member.id).await.unwrap().unwrap().id_card_created);

        let issued = service.issue_id_card(member.id).await.unwrap();
        assert!(issued.id_card_created);

        assert!(service.get(member.id).await.unwrap().unwrap().id_card_created);
        let stats = service.queries.dashboard_stats().await.unwrap();
        assert_eq!(stats.id_created_count, 1);
        assert_eq!(stats.id_pending_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_drops_member_and_collections() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Leaving"));
        let service = service(&gateway);

        service.get(member.id).await.unwrap();
        service.delete(member.id).await.unwrap();

        assert!(service.get(member.id).await.unwrap().is_none());
        assert!(service.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vehicle_mutation_only_refreshes_vehicles() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Driver"));
        let service = service(&gateway);
        let queries = &service.queries;

        queries.vehicles(member.id).await.unwrap();
        queries.payments(member.id).await.unwrap();

        let vehicle = fixtures::vehicle(member.id);
        service
            .add_vehicle(&NewVehicle {
                member_id: member.id,
                vehicle_name: vehicle.vehicle_name,
                vehicle_type: vehicle.vehicle_type,
                make: vehicle.make,
                model: vehicle.model,
                year: vehicle.year,
                color: vehicle.color,
                license_plate: vehicle.license_plate,
                icon: vehicle.icon,
            })
            .await
            .unwrap();

        assert_eq!(queries.vehicles(member.id).await.unwrap().len(), 1);
        queries.payments(member.id).await.unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.list_vehicles, 2);
        assert_eq!(calls.list_payments, 1);
    }

    #[tokio::test]
    async fn test_payment_mutation_refreshes_dashboard() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Payer"));
        let service = service(&gateway);

        let before = service.queries.dashboard_stats().await.unwrap();
        assert_eq!(before.completed_payments_count, 0);

        let payment = fixtures::payment(member.id, 2500);
        service
            .add_payment(&NewPayment {
                member_id: member.id,
                amount: payment.amount,
                payment_type: payment.payment_type,
                payment_method: payment.payment_method,
                status: payment.status,
                due_date: None,
                paid_date: None,
                description: None,
                notes: None,
            })
            .await
            .unwrap();

        let after = service.queries.dashboard_stats().await.unwrap();
        assert_eq!(after.completed_payments_count, 1);
        assert_eq!(after.total_revenue, payment.amount);
    }
}
