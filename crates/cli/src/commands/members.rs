//! Member directory commands.
//!
//! # Usage
//!
//! ```bash
//! cy-cli members list --search asha --status Active --id-card not_created
//! cy-cli members show 4f1c3a9e-8a2b-4c1d-9e0f-1234567890ab --tab payments
//! cy-cli members create -n "Asha Rao" -e asha@example.com -u 4B -b "Tower A"
//! cy-cli members delete 4f1c3a9e-8a2b-4c1d-9e0f-1234567890ab
//! ```

use chrono::Local;
use courtyard_admin::{AppError, Console};
use courtyard_admin::components::data_table::{DataTableConfig, members_table_config};
use courtyard_admin::components::list_engine::{
    IdCardFilter, ListPage, PAGE_SIZE_OPTIONS, SortKey, SortOrder, ViewParams,
};
use courtyard_admin::filters::{PLACEHOLDER, format_amount, format_date};
use courtyard_admin::gateway::Gateway;
use courtyard_admin::models::MemberForm;
use courtyard_admin::services::{MemberProfile, ProfileOutcome, ProfileTab};
use courtyard_core::{MemberId, MemberStatus, MemberType};
use tracing::{info, warn};

use super::CliError;

/// Search, filters, sort and page for the members table.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub status: Option<MemberStatus>,
    pub id_card: IdCardFilter,
    pub sort: Option<SortKey>,
    pub order: Option<SortOrder>,
    pub page: usize,
    pub page_size: Option<usize>,
}

impl ListOptions {
    /// Apply the options on top of `params`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` for a page size outside the
    /// offered options.
    pub fn apply(&self, params: &mut ViewParams) -> Result<(), CliError> {
        if let Some(size) = self.page_size {
            if !PAGE_SIZE_OPTIONS.contains(&size) {
                return Err(CliError::InvalidArgument(
                    "page size",
                    format!("{size} (choose one of {PAGE_SIZE_OPTIONS:?})"),
                ));
            }
            params.set_page_size(size, 0);
        }
        if let Some(search) = &self.search {
            params.set_search(search.as_str());
        }
        params.set_status_filter(self.status);
        params.set_id_card_filter(self.id_card);
        if let Some(key) = self.sort {
            params.set_sort(key, self.order.unwrap_or_else(|| key.default_order()));
        }
        params.set_page(self.page);
        Ok(())
    }
}

/// Fields for a new member.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub unit: String,
    pub building: String,
    pub member_type: MemberType,
    pub status: MemberStatus,
}

impl CreateOptions {
    #[must_use]
    pub fn into_form(self) -> MemberForm {
        let mut form = MemberForm {
            name: self.name,
            email: self.email,
            phone: self.phone.unwrap_or_default(),
            unit: self.unit,
            building: self.building,
            member_type: self.member_type.to_string(),
            status: self.status.to_string(),
            ..MemberForm::default()
        };
        if let Some(code) = self.country_code {
            form.phone_country_code = code;
        }
        form
    }
}

pub(crate) fn log_page(table: &DataTableConfig, page: &ListPage) {
    if page.is_empty() {
        info!("{}", table.empty_title);
        if let Some(description) = &table.empty_description {
            info!("{description}");
        }
        return;
    }

    let header: Vec<&str> = table
        .columns
        .iter()
        .filter(|c| c.default_visible)
        .map(|c| c.label.as_str())
        .collect();
    info!("{}", header.join(" | "));
    for member in &page.items {
        info!(
            "{:<8} {:<28} {:<6} {:<10} {:<8} card:{}",
            member.member_id,
            member.name,
            member.unit,
            member.building,
            member.status,
            if member.id_card_created { "yes" } else { "no" },
        );
    }
    info!("{page} (page {} of {})", page.current_page, page.total_pages);
}

/// List one page of the members table.
///
/// # Errors
///
/// Returns an error for invalid options or when the list cannot be loaded.
pub async fn list<G: Gateway>(console: &Console<G>, options: &ListOptions) -> Result<(), CliError> {
    let mut params = console.members_view_params();
    options.apply(&mut params)?;

    let page = console.members().list(&params).await?;
    if let Some(label) = params.filter_label() {
        info!("Filters: {label}");
    }
    log_page(&members_table_config(), &page);
    Ok(())
}

/// Show a member profile on the given tab.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id, or the backend failure
/// when the member cannot be loaded.
pub async fn show<G: Gateway>(
    console: &Console<G>,
    id: MemberId,
    tab: ProfileTab,
) -> Result<(), CliError> {
    match console.profiles().load(id).await {
        ProfileOutcome::NotFound => Err(AppError::NotFound(format!("Member {id}")).into()),
        ProfileOutcome::Failed(err) => Err(AppError::from(err).into()),
        ProfileOutcome::Loaded(mut profile) => {
            profile.select_tab(tab);
            log_profile(&profile);
            Ok(())
        }
    }
}

fn log_profile(profile: &MemberProfile) {
    let now = Local::now();
    let summary = profile.summary(&now);

    info!("{} ({})  [{}]", summary.name, summary.member_number, summary.initials);
    info!("  {}", summary.location);
    info!("  Phone: {}", summary.phone);
    info!("  Emergency contact: {}", summary.emergency_contact);
    info!(
        "  Last access: {}{}",
        summary.last_access,
        summary
            .last_access_location
            .as_deref()
            .map(|l| format!(" at {l}"))
            .unwrap_or_default()
    );

    info!("-- {} --", profile.tab().label());
    match profile.tab() {
        ProfileTab::Overview => {
            match profile.vehicles.ready() {
                Some(vehicles) if vehicles.is_empty() => info!("  No vehicles"),
                Some(vehicles) => {
                    for v in vehicles.iter() {
                        info!("  {} {} ({})", v.vehicle_name, v.license_plate, v.description());
                    }
                }
                None => log_unavailable("Vehicles", profile.vehicles.error()),
            }
            match profile.access_logs.ready() {
                Some(logs) => {
                    for entry in logs.iter().take(10) {
                        info!(
                            "  {} {} via {} ({})",
                            entry.accessed_at.with_timezone(&now.timezone()).format("%b %-d %H:%M"),
                            entry.location,
                            entry.access_method,
                            entry.status,
                        );
                    }
                }
                None => log_unavailable("Access logs", profile.access_logs.error()),
            }
        }
        ProfileTab::Payments => match profile.payments.ready() {
            Some(payments) if payments.is_empty() => info!("  No payments"),
            Some(payments) => {
                for p in payments.iter() {
                    info!(
                        "  {:>12} {:<12} {:<10} due {} paid {}",
                        format_amount(p.amount),
                        p.payment_type,
                        p.status,
                        p.due_date.map_or_else(|| PLACEHOLDER.to_string(), |d| d.to_string()),
                        p.paid_date.map_or_else(|| PLACEHOLDER.to_string(), |d| d.to_string()),
                    );
                }
            }
            None => log_unavailable("Payments", profile.payments.error()),
        },
        ProfileTab::Documents => match profile.documents.ready() {
            Some(documents) if documents.is_empty() => info!("  No documents"),
            Some(documents) => {
                let today = now.to_utc();
                for d in documents.iter() {
                    info!(
                        "  {} ({}) uploaded {}{}",
                        d.document_name,
                        d.document_type,
                        format_date(Some(d.uploaded_at)),
                        if d.is_expired(today) { " EXPIRED" } else { "" },
                    );
                }
            }
            None => log_unavailable("Documents", profile.documents.error()),
        },
    }
}

fn log_unavailable<E: std::fmt::Display>(what: &str, error: Option<E>) {
    match error {
        Some(err) => warn!("  {what} failed to load: {err}"),
        None => info!("  {what} loading"),
    }
}

/// Validate and create a member.
///
/// # Errors
///
/// Returns `AppError::Validation` listing each invalid field, or the
/// backend failure.
pub async fn create<G: Gateway>(
    console: &Console<G>,
    options: CreateOptions,
) -> Result<(), CliError> {
    let form = options.into_form();
    match console.members().create(&form).await {
        Ok(member) => {
            info!("Created {} ({}) with id {}", member.name, member.member_id, member.id);
            Ok(())
        }
        Err(AppError::Validation(errors)) => {
            for field in errors.fields() {
                warn!("{field}: {}", errors.get(field).unwrap_or_default());
            }
            Err(AppError::Validation(errors).into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Delete a member and its dependent records.
///
/// # Errors
///
/// Returns the backend failure.
pub async fn delete<G: Gateway>(console: &Console<G>, id: MemberId) -> Result<(), CliError> {
    console.members().delete(id).await?;
    info!("Deleted member {id}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use courtyard_admin::components::list_engine::MEMBERS_TABLE;

    #[test]
    fn test_options_apply_to_params() {
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        ListOptions {
            search: Some("asha".to_string()),
            status: Some(MemberStatus::Inactive),
            id_card: IdCardFilter::NotCreated,
            sort: Some(SortKey::Name),
            order: None,
            page: 2,
            page_size: Some(25),
        }
        .apply(&mut params)
        .unwrap();

        assert_eq!(params.search(), "asha");
        assert_eq!(params.status_filter(), Some(MemberStatus::Inactive));
        assert_eq!(params.sort_key(), SortKey::Name);
        assert_eq!(params.sort_order(), SortKey::Name.default_order());
        assert_eq!(params.page(), 2);
        assert_eq!(params.page_size(), 25);
    }

    #[test]
    fn test_rejects_unknown_page_size() {
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        let err = ListOptions {
            page: 1,
            page_size: Some(7),
            ..ListOptions::default()
        }
        .apply(&mut params)
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument("page size", _)));
    }

    #[test]
    fn test_create_options_keep_default_country_code() {
        let form = CreateOptions {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            country_code: None,
            unit: "4B".to_string(),
            building: "Tower A".to_string(),
            member_type: MemberType::Tenant,
            status: MemberStatus::Active,
        }
        .into_form();

        assert_eq!(form.phone_country_code, "+91");
        assert_eq!(form.member_type, "Tenant");
        assert!(form.validate_create().is_ok());
    }
}
