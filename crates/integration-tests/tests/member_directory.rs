//! Members table, form validation and mutations through the console.

use courtyard_admin::AppError;
use courtyard_admin::components::list_engine::{IdCardFilter, SortKey, SortOrder};
use courtyard_admin::models::{FormField, MemberForm};
use courtyard_core::MemberStatus;
use courtyard_integration_tests::{console, seed_residents};

fn names(page: &courtyard_admin::components::ListPage) -> Vec<&str> {
    page.items.iter().map(|m| m.name.as_str()).collect()
}

fn form(name: &str, email: &str) -> MemberForm {
    MemberForm {
        name: name.to_string(),
        email: email.to_string(),
        unit: "12C".to_string(),
        building: "Tower B".to_string(),
        ..MemberForm::default()
    }
}

// ============================================================================
// List engine
// ============================================================================

#[tokio::test]
async fn test_default_view_is_newest_first() {
    let (console, gateway) = console();
    seed_residents(&gateway, 25);

    let params = console.members_view_params();
    let page = console.members().list(&params).await.unwrap();

    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.first().unwrap().name, "Resident 25");
    assert_eq!(page.items.last().unwrap().name, "Resident 16");
    assert_eq!(page.to_string(), "Showing 1–10 of 25");
    assert!(page.has_next());
    assert!(!page.has_previous());
}

#[tokio::test]
async fn test_filters_combine_and_reset_page() {
    let (console, gateway) = console();
    seed_residents(&gateway, 25);

    let mut params = console.members_view_params();
    params.set_page(3);
    params.set_status_filter(Some(MemberStatus::Inactive));
    assert_eq!(params.page(), 1);
    params.set_id_card_filter(IdCardFilter::NotCreated);

    let page = console.members().list(&params).await.unwrap();
    assert_eq!(names(&page), ["Resident 21", "Resident 15", "Resident 9", "Resident 3"]);
    assert_eq!(
        params.filter_label().as_deref(),
        Some("Status: Inactive, ID Card: Not created")
    );

    params.clear_filters();
    assert!(!params.has_active_filters());
    assert_eq!(console.members().list(&params).await.unwrap().total_count, 25);
}

#[tokio::test]
async fn test_search_matches_name_email_and_member_number() {
    let (console, gateway) = console();
    seed_residents(&gateway, 25);
    let mut params = console.members_view_params();

    params.set_search("  RESIDENT 2 ");
    let page = console.members().list(&params).await.unwrap();
    assert_eq!(page.total_count, 7);

    params.set_search("m-0007");
    let page = console.members().list(&params).await.unwrap();
    assert_eq!(names(&page), ["Resident 7"]);

    params.set_search("resident.13@");
    let page = console.members().list(&params).await.unwrap();
    assert_eq!(names(&page), ["Resident 13"]);

    params.set_search("nobody");
    let page = console.members().list(&params).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.to_string(), "Showing 0–0 of 0");
}

#[tokio::test]
async fn test_sort_toggle_and_page_clamp() {
    let (console, gateway) = console();
    seed_residents(&gateway, 25);
    let mut params = console.members_view_params();

    params.toggle_sort(SortKey::Name);
    assert_eq!(params.sort_order(), SortOrder::Asc);
    let page = console.members().list(&params).await.unwrap();
    assert_eq!(page.items.first().unwrap().name, "Resident 1");

    params.toggle_sort(SortKey::Name);
    assert_eq!(params.sort_order(), SortOrder::Desc);

    params.set_page(99);
    let page = console.members().list(&params).await.unwrap();
    assert_eq!(page.current_page, 3);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.to_string(), "Showing 21–25 of 25");

    params.set_page_size(25, page.total_count);
    assert_eq!(params.page(), 1);
}

#[tokio::test]
async fn test_view_changes_never_refetch() {
    let (console, gateway) = console();
    seed_residents(&gateway, 12);
    let mut params = console.members_view_params();

    console.members().list(&params).await.unwrap();
    params.set_search("resident 1");
    console.members().list(&params).await.unwrap();
    params.toggle_sort(SortKey::Status);
    params.set_page(2);
    console.members().list(&params).await.unwrap();

    assert_eq!(gateway.calls().list_members, 1);
}

// ============================================================================
// Validation and mutations
// ============================================================================

#[tokio::test]
async fn test_invalid_form_reports_every_field() {
    let (console, gateway) = console();

    let invalid = MemberForm {
        name: "   ".to_string(),
        email: "not-an-email".to_string(),
        unit: "4B".to_string(),
        building: String::new(),
        ..MemberForm::default()
    };
    let Err(AppError::Validation(errors)) = console.members().create(&invalid).await else {
        panic!("expected validation failure");
    };

    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        [FormField::Name, FormField::Email, FormField::Building]
    );
    assert_eq!(errors.get(FormField::Email), Some("Enter a valid email"));
    assert_eq!(gateway.calls().writes(), 0);
}

#[tokio::test]
async fn test_created_member_appears_in_table() {
    let (console, gateway) = console();
    seed_residents(&gateway, 3);
    let params = console.members_view_params();
    assert_eq!(console.members().list(&params).await.unwrap().total_count, 3);

    let created = console
        .members()
        .create(&form(" Meera Iyer ", "meera@example.com"))
        .await
        .unwrap();
    assert_eq!(created.name, "Meera Iyer");
    assert_eq!(created.phone_country_code.as_deref(), Some("+91"));
    assert!(!created.id_card_created);

    let page = console.members().list(&params).await.unwrap();
    assert_eq!(page.total_count, 4);
    assert_eq!(page.items.first().unwrap().id, created.id);
}

#[tokio::test]
async fn test_edit_then_delete() {
    let (console, gateway) = console();
    let residents = seed_residents(&gateway, 3);
    let target = &residents[1];

    let mut edit = MemberForm::from_member(target);
    edit.status = "Inactive".to_string();
    let updated = console.members().update(target.id, &edit).await.unwrap();
    assert_eq!(updated.status, MemberStatus::Inactive);

    let mut params = console.members_view_params();
    params.set_status_filter(Some(MemberStatus::Inactive));
    let page = console.members().list(&params).await.unwrap();
    assert!(page.items.iter().any(|m| m.id == target.id));

    console.members().delete(target.id).await.unwrap();
    assert!(console.members().get(target.id).await.unwrap().is_none());
    assert_eq!(console.members().all().await.unwrap().len(), 2);
}
