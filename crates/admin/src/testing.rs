//! In-memory gateway for tests.
//!
//! Behaves like the hosted backend for the operations the console uses:
//! ordering, search, cascade on member delete and the dashboard aggregates.
//! Every call is counted and any operation can be made to fail.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use courtyard_core::{
    AccessLog, AccessLogId, DashboardStats, Document, DocumentId, Member, MemberId, NewAccessLog,
    NewDocument, NewPayment, NewVehicle, Payment, PaymentChanges, PaymentId, PaymentsSummary,
    Vehicle, VehicleChanges, VehicleId,
};

use crate::backend::{BackendError, NO_ROWS_CODE};
use crate::gateway::{
    AccessLogGateway, DashboardGateway, DocumentGateway, MemberGateway, PaymentGateway,
    VehicleGateway,
};
use crate::models::member_form::{MemberUpdate, NewMember};

/// Number of calls per gateway operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayCalls {
    pub list_members: usize,
    pub get_member: usize,
    pub create_member: usize,
    pub update_member: usize,
    pub delete_member: usize,
    pub list_vehicles: usize,
    pub create_vehicle: usize,
    pub update_vehicle: usize,
    pub delete_vehicle: usize,
    pub list_payments: usize,
    pub create_payment: usize,
    pub update_payment: usize,
    pub delete_payment: usize,
    pub payments_summary: usize,
    pub list_access_logs: usize,
    pub create_access_log: usize,
    pub delete_access_log: usize,
    pub list_documents: usize,
    pub create_document: usize,
    pub delete_document: usize,
    pub dashboard_stats: usize,
    pub recent_members: usize,
}

impl GatewayCalls {
    /// Reads of the four per-member collections.
    #[must_use]
    pub const fn collection_reads(&self) -> usize {
        self.list_vehicles + self.list_payments + self.list_access_logs + self.list_documents
    }

    /// Every write of any kind.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.create_member
            + self.update_member
            + self.delete_member
            + self.create_vehicle
            + self.update_vehicle
            + self.delete_vehicle
            + self.create_payment
            + self.update_payment
            + self.delete_payment
            + self.create_access_log
            + self.delete_access_log
            + self.create_document
            + self.delete_document
    }
}

#[derive(Debug, Default)]
struct Tables {
    members: Vec<Member>,
    vehicles: Vec<Vehicle>,
    payments: Vec<Payment>,
    access_logs: Vec<AccessLog>,
    documents: Vec<Document>,
    next_number: u32,
}

impl Tables {
    fn next_member_number(&mut self) -> String {
        self.next_number += 1;
        format!("M-{:04}", self.next_number)
    }
}

/// Backend stand-in holding rows in memory.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    tables: Mutex<Tables>,
    calls: Mutex<GatewayCalls>,
    failing: Mutex<HashSet<&'static str>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn no_rows(table: &str) -> BackendError {
    BackendError::Api {
        status: 406,
        code: Some(NO_ROWS_CODE.to_string()),
        message: format!("no {table} row matched"),
    }
}

impl InMemoryGateway {
    /// Snapshot of the call counters.
    #[must_use]
    pub fn calls(&self) -> GatewayCalls {
        *lock(&self.calls)
    }

    /// Make every later call of `operation` fail with a 503.
    pub fn fail_on(&self, operation: &'static str) {
        lock(&self.failing).insert(operation);
    }

    /// Let `operation` succeed again.
    pub fn recover(&self, operation: &'static str) {
        lock(&self.failing).remove(operation);
    }

    /// Insert a member row as is, assigning a member number when blank.
    pub fn seed_member(&self, mut member: Member) -> Member {
        let mut tables = lock(&self.tables);
        if member.member_id.is_empty() {
            member.member_id = tables.next_member_number();
        }
        tables.members.push(member.clone());
        member
    }

    pub fn seed_vehicle(&self, vehicle: Vehicle) -> Vehicle {
        lock(&self.tables).vehicles.push(vehicle.clone());
        vehicle
    }

    pub fn seed_payment(&self, payment: Payment) -> Payment {
        lock(&self.tables).payments.push(payment.clone());
        payment
    }

    pub fn seed_access_log(&self, entry: AccessLog) -> AccessLog {
        lock(&self.tables).access_logs.push(entry.clone());
        entry
    }

    pub fn seed_document(&self, document: Document) -> Document {
        lock(&self.tables).documents.push(document.clone());
        document
    }

    /// Current member rows.
    #[must_use]
    pub fn members(&self) -> Vec<Member> {
        lock(&self.tables).members.clone()
    }

    fn begin(
        &self,
        operation: &'static str,
        counter: fn(&mut GatewayCalls) -> &mut usize,
    ) -> Result<(), BackendError> {
        *counter(&mut lock(&self.calls)) += 1;
        if lock(&self.failing).contains(operation) {
            return Err(BackendError::Api {
                status: 503,
                code: None,
                message: format!("{operation} unavailable"),
            });
        }
        Ok(())
    }

    fn summary(tables: &Tables) -> PaymentsSummary {
        PaymentsSummary::from_completed(
            tables
                .payments
                .iter()
                .filter(|p| p.is_completed())
                .map(|p| p.amount),
        )
    }
}

fn matches_search(member: &Member, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty()
        || [&member.name, &member.email, &member.member_id]
            .iter()
            .any(|value| value.to_lowercase().contains(&term))
}

#[async_trait]
impl MemberGateway for InMemoryGateway {
    async fn list_members(&self, search: Option<&str>) -> Result<Vec<Member>, BackendError> {
        self.begin("list_members", |c| &mut c.list_members)?;
        let mut members: Vec<Member> = lock(&self.tables)
            .members
            .iter()
            .filter(|m| search.is_none_or(|term| matches_search(m, term)))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        Ok(members)
    }

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>, BackendError> {
        self.begin("get_member", |c| &mut c.get_member)?;
        Ok(lock(&self.tables)
            .members
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn create_member(&self, member: &NewMember) -> Result<Member, BackendError> {
        self.begin("create_member", |c| &mut c.create_member)?;
        let now = Utc::now();
        let payload = &member.payload;
        let profile = &member.profile;

        let mut tables = lock(&self.tables);
        let created = Member {
            id: MemberId::random(),
            member_id: tables.next_member_number(),
            name: payload.name.clone(),
            email: payload.email.clone(),
            phone: payload.phone.clone(),
            phone_country_code: payload.phone_country_code.clone(),
            date_of_birth: profile.date_of_birth,
            occupation: profile.occupation.clone(),
            unit: payload.unit.clone(),
            building: payload.building.clone(),
            residential_address: profile.residential_address.clone(),
            mailing_address: profile.mailing_address.clone(),
            member_type: payload.member_type,
            status: payload.status,
            id_card_created: false,
            move_in_date: profile.move_in_date,
            move_out_date: profile.move_out_date,
            emergency_contact_name: profile.emergency_contact_name.clone(),
            emergency_contact_relationship: profile.emergency_contact_relationship.clone(),
            emergency_contact_phone: profile.emergency_contact_phone.clone(),
            emergency_contact_email: profile.emergency_contact_email.clone(),
            last_access: profile.last_access,
            last_access_location: profile.last_access_location.clone(),
            avatar_url: profile.avatar_url.clone(),
            notes: profile.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.members.push(created.clone());
        Ok(created)
    }

    async fn update_member(
        &self,
        id: MemberId,
        changes: &MemberUpdate,
    ) -> Result<Member, BackendError> {
        self.begin("update_member", |c| &mut c.update_member)?;
        let mut tables = lock(&self.tables);
        let member = tables
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| no_rows("members"))?;
        changes.apply_to(member);
        member.updated_at = Utc::now();
        Ok(member.clone())
    }

    async fn delete_member(&self, id: MemberId) -> Result<(), BackendError> {
        self.begin("delete_member", |c| &mut c.delete_member)?;
        let mut tables = lock(&self.tables);
        tables.members.retain(|m| m.id != id);
        tables.vehicles.retain(|v| v.member_id != id);
        tables.payments.retain(|p| p.member_id != id);
        tables.access_logs.retain(|a| a.member_id != id);
        tables.documents.retain(|d| d.member_id != id);
        Ok(())
    }
}

#[async_trait]
impl VehicleGateway for InMemoryGateway {
    async fn list_vehicles(&self, member: MemberId) -> Result<Vec<Vehicle>, BackendError> {
        self.begin("list_vehicles", |c| &mut c.list_vehicles)?;
        let mut vehicles: Vec<Vehicle> = lock(&self.tables)
            .vehicles
            .iter()
            .filter(|v| v.member_id == member)
            .cloned()
            .collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    async fn create_vehicle(&self, vehicle: &NewVehicle) -> Result<Vehicle, BackendError> {
        self.begin("create_vehicle", |c| &mut c.create_vehicle)?;
        let now = Utc::now();
        let created = Vehicle {
            id: VehicleId::random(),
            member_id: vehicle.member_id,
            vehicle_name: vehicle.vehicle_name.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            color: vehicle.color.clone(),
            license_plate: vehicle.license_plate.clone(),
            icon: vehicle.icon.clone(),
            created_at: now,
            updated_at: now,
        };
        lock(&self.tables).vehicles.push(created.clone());
        Ok(created)
    }

    async fn update_vehicle(
        &self,
        id: VehicleId,
        changes: &VehicleChanges,
    ) -> Result<Vehicle, BackendError> {
        self.begin("update_vehicle", |c| &mut c.update_vehicle)?;
        let mut tables = lock(&self.tables);
        let vehicle = tables
            .vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| no_rows("vehicles"))?;

        let changes = changes.clone();
        if let Some(name) = changes.vehicle_name {
            vehicle.vehicle_name = name;
        }
        if let Some(kind) = changes.vehicle_type {
            vehicle.vehicle_type = kind;
        }
        if let Some(plate) = changes.license_plate {
            vehicle.license_plate = plate;
        }
        if let Some(icon) = changes.icon {
            vehicle.icon = icon;
        }
        vehicle.make = changes.make.or(vehicle.make.take());
        vehicle.model = changes.model.or(vehicle.model.take());
        vehicle.year = changes.year.or(vehicle.year);
        vehicle.color = changes.color.or(vehicle.color.take());
        vehicle.updated_at = Utc::now();
        Ok(vehicle.clone())
    }

    async fn delete_vehicle(&self, id: VehicleId) -> Result<(), BackendError> {
        self.begin("delete_vehicle", |c| &mut c.delete_vehicle)?;
        lock(&self.tables).vehicles.retain(|v| v.id != id);
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for InMemoryGateway {
    async fn list_payments(&self, member: MemberId) -> Result<Vec<Payment>, BackendError> {
        self.begin("list_payments", |c| &mut c.list_payments)?;
        let mut payments: Vec<Payment> = lock(&self.tables)
            .payments
            .iter()
            .filter(|p| p.member_id == member)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, BackendError> {
        self.begin("create_payment", |c| &mut c.create_payment)?;
        let now = Utc::now();
        let created = Payment {
            id: PaymentId::random(),
            member_id: payment.member_id,
            amount: payment.amount,
            payment_type: payment.payment_type.clone(),
            payment_method: payment.payment_method.clone(),
            status: payment.status,
            due_date: payment.due_date,
            paid_date: payment.paid_date,
            description: payment.description.clone(),
            notes: payment.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        lock(&self.tables).payments.push(created.clone());
        Ok(created)
    }

    async fn update_payment(
        &self,
        id: PaymentId,
        changes: &PaymentChanges,
    ) -> Result<Payment, BackendError> {
        self.begin("update_payment", |c| &mut c.update_payment)?;
        let mut tables = lock(&self.tables);
        let payment = tables
            .payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| no_rows("payments"))?;

        let changes = changes.clone();
        if let Some(amount) = changes.amount {
            payment.amount = amount;
        }
        if let Some(kind) = changes.payment_type {
            payment.payment_type = kind;
        }
        if let Some(status) = changes.status {
            payment.status = status;
        }
        payment.payment_method = changes.payment_method.or(payment.payment_method.take());
        payment.due_date = changes.due_date.or(payment.due_date);
        payment.paid_date = changes.paid_date.or(payment.paid_date);
        payment.description = changes.description.or(payment.description.take());
        payment.notes = changes.notes.or(payment.notes.take());
        payment.updated_at = Utc::now();
        Ok(payment.clone())
    }

    async fn delete_payment(&self, id: PaymentId) -> Result<(), BackendError> {
        self.begin("delete_payment", |c| &mut c.delete_payment)?;
        lock(&self.tables).payments.retain(|p| p.id != id);
        Ok(())
    }

    async fn payments_summary(&self) -> Result<PaymentsSummary, BackendError> {
        self.begin("payments_summary", |c| &mut c.payments_summary)?;
        Ok(Self::summary(&lock(&self.tables)))
    }
}

#[async_trait]
impl AccessLogGateway for InMemoryGateway {
    async fn list_access_logs(&self, member: MemberId) -> Result<Vec<AccessLog>, BackendError> {
        self.begin("list_access_logs", |c| &mut c.list_access_logs)?;
        let mut entries: Vec<AccessLog> = lock(&self.tables)
            .access_logs
            .iter()
            .filter(|a| a.member_id == member)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.accessed_at.cmp(&a.accessed_at));
        Ok(entries)
    }

    async fn create_access_log(&self, entry: &NewAccessLog) -> Result<AccessLog, BackendError> {
        self.begin("create_access_log", |c| &mut c.create_access_log)?;
        let created = AccessLog {
            id: AccessLogId::random(),
            member_id: entry.member_id,
            location: entry.location.clone(),
            access_method: entry.access_method.clone(),
            status: entry.status,
            accessed_at: entry.accessed_at,
            created_at: Utc::now(),
        };
        lock(&self.tables).access_logs.push(created.clone());
        Ok(created)
    }

    async fn delete_access_log(&self, id: AccessLogId) -> Result<(), BackendError> {
        self.begin("delete_access_log", |c| &mut c.delete_access_log)?;
        lock(&self.tables).access_logs.retain(|a| a.id != id);
        Ok(())
    }
}

#[async_trait]
impl DocumentGateway for InMemoryGateway {
    async fn list_documents(&self, member: MemberId) -> Result<Vec<Document>, BackendError> {
        self.begin("list_documents", |c| &mut c.list_documents)?;
        let mut documents: Vec<Document> = lock(&self.tables)
            .documents
            .iter()
            .filter(|d| d.member_id == member)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(documents)
    }

    async fn create_document(&self, document: &NewDocument) -> Result<Document, BackendError> {
        self.begin("create_document", |c| &mut c.create_document)?;
        let created = Document {
            id: DocumentId::random(),
            member_id: document.member_id,
            document_name: document.document_name.clone(),
            document_type: document.document_type.clone(),
            file_url: document.file_url.clone(),
            file_size: document.file_size,
            mime_type: document.mime_type.clone(),
            uploaded_at: document.uploaded_at,
            expires_at: document.expires_at,
            created_at: Utc::now(),
        };
        lock(&self.tables).documents.push(created.clone());
        Ok(created)
    }

    async fn delete_document(&self, id: DocumentId) -> Result<(), BackendError> {
        self.begin("delete_document", |c| &mut c.delete_document)?;
        lock(&self.tables).documents.retain(|d| d.id != id);
        Ok(())
    }
}

#[async_trait]
impl DashboardGateway for InMemoryGateway {
    async fn dashboard_stats(&self) -> Result<DashboardStats, BackendError> {
        self.begin("dashboard_stats", |c| &mut c.dashboard_stats)?;
        let tables = lock(&self.tables);
        Ok(DashboardStats::from_rows(
            tables.members.iter().map(|m| (m.status, m.id_card_created)),
            Self::summary(&tables),
        ))
    }

    async fn recent_members(&self, limit: usize) -> Result<Vec<Member>, BackendError> {
        self.begin("recent_members", |c| &mut c.recent_members)?;
        let mut members = lock(&self.tables).members.clone();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        members.truncate(limit);
        Ok(members)
    }
}

/// Ready-made rows.
pub mod fixtures {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    use courtyard_core::{
        AccessLog, AccessLogId, AccessStatus, Document, DocumentId, Member, MemberId,
        MemberStatus, MemberType, Payment, PaymentId, PaymentStatus, Vehicle, VehicleId,
    };

    /// An active owner in unit 4B with no member number yet.
    #[must_use]
    pub fn member(name: &str) -> Member {
        member_created_at(name, Utc::now())
    }

    /// Like [`member`], with a fixed creation time.
    #[must_use]
    pub fn member_created_at(name: &str, created_at: DateTime<Utc>) -> Member {
        let slug = name.to_lowercase().replace(' ', ".");
        Member {
            id: MemberId::random(),
            member_id: String::new(),
            name: name.to_string(),
            email: format!("{slug}@example.com"),
            phone: None,
            phone_country_code: Some("+91".to_string()),
            date_of_birth: None,
            occupation: None,
            unit: "4B".to_string(),
            building: "Tower A".to_string(),
            residential_address: None,
            mailing_address: None,
            member_type: MemberType::Owner,
            status: MemberStatus::Active,
            id_card_created: false,
            move_in_date: None,
            move_out_date: None,
            emergency_contact_name: None,
            emergency_contact_relationship: None,
            emergency_contact_phone: None,
            emergency_contact_email: None,
            last_access: None,
            last_access_location: None,
            avatar_url: None,
            notes: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[must_use]
    pub fn vehicle(member_id: MemberId) -> Vehicle {
        let now = Utc::now();
        Vehicle {
            id: VehicleId::random(),
            member_id,
            vehicle_name: "Family car".to_string(),
            vehicle_type: "Car".to_string(),
            make: Some("Honda".to_string()),
            model: Some("City".to_string()),
            year: Some(2021),
            color: Some("Silver".to_string()),
            license_plate: "KA01AB1234".to_string(),
            icon: "directions_car".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A completed maintenance payment of `amount` whole units.
    #[must_use]
    pub fn payment(member_id: MemberId, amount: i64) -> Payment {
        let now = Utc::now();
        Payment {
            id: PaymentId::random(),
            member_id,
            amount: Decimal::new(amount, 0),
            payment_type: "Maintenance".to_string(),
            payment_method: Some("UPI".to_string()),
            status: PaymentStatus::Completed,
            due_date: None,
            paid_date: Some(now.date_naive()),
            description: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn access_log(member_id: MemberId, accessed_at: DateTime<Utc>) -> AccessLog {
        AccessLog {
            id: AccessLogId::random(),
            member_id,
            location: "Main Gate".to_string(),
            access_method: "ID Card".to_string(),
            status: AccessStatus::Granted,
            accessed_at,
            created_at: accessed_at,
        }
    }

    #[must_use]
    pub fn document(member_id: MemberId, name: &str) -> Document {
        let now = Utc::now();
        Document {
            id: DocumentId::random(),
            member_id,
            document_name: name.to_string(),
            document_type: "Agreement".to_string(),
            file_url: format!("documents/{member_id}/{name}.pdf"),
            file_size: Some(2048),
            mime_type: Some("application/pdf".to_string()),
            uploaded_at: now,
            expires_at: None,
            created_at: now,
        }
    }
}
