use async_trait::async_trait;
use tracing::instrument;

use courtyard_core::{MemberId, NewVehicle, Vehicle, VehicleChanges, VehicleId};

use crate::backend::{BackendClient, BackendError, Order, TableQuery};

const TABLE: &str = "vehicles";

/// Vehicles registered to a member.
#[async_trait]
pub trait VehicleGateway: Send + Sync {
    /// A member's vehicles, newest first.
    async fn list_vehicles(&self, member: MemberId) -> Result<Vec<Vehicle>, BackendError>;

    async fn create_vehicle(&self, vehicle: &NewVehicle) -> Result<Vehicle, BackendError>;

    async fn update_vehicle(
        &self,
        id: VehicleId,
        changes: &VehicleChanges,
    ) -> Result<Vehicle, BackendError>;

    async fn delete_vehicle(&self, id: VehicleId) -> Result<(), BackendError>;
}

#[async_trait]
impl VehicleGateway for BackendClient {
    #[instrument(skip(self), fields(member_id = %member))]
    async fn list_vehicles(&self, member: MemberId) -> Result<Vec<Vehicle>, BackendError> {
        let query = TableQuery::from(TABLE)
            .eq("member_id", member)
            .order("created_at", Order::Desc);
        self.select(&query).await
    }

    #[instrument(skip_all, fields(member_id = %vehicle.member_id))]
    async fn create_vehicle(&self, vehicle: &NewVehicle) -> Result<Vehicle, BackendError> {
        self.insert(TABLE, vehicle).await
    }

    #[instrument(skip(self, changes), fields(vehicle_id = %id))]
    async fn update_vehicle(
        &self,
        id: VehicleId,
        changes: &VehicleChanges,
    ) -> Result<Vehicle, BackendError> {
        self.update(&TableQuery::from(TABLE).eq("id", id), changes)
            .await
    }

    #[instrument(skip(self), fields(vehicle_id = %id))]
    async fn delete_vehicle(&self, id: VehicleId) -> Result<(), BackendError> {
        self.delete(&TableQuery::from(TABLE).eq("id", id)).await
    }
}
