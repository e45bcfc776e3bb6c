use super::*;
use crate::{
    error::ValidationError,
    test_support::{sample_product, Call, FakeCatalogApi, TOKEN},
};
use shared::protocol::ProductPayload;

fn signed_in() -> Session {
    Session::authenticated(TOKEN)
}

fn fill_valid(draft: &mut ProductDraft) {
    draft.image_url = "https://img/main.png".into();
    draft.title = "Oolong".into();
    draft.category = "tea".into();
    draft.unit = "box".into();
    draft.origin_price = "300".into();
    draft.price = "250".into();
}

async fn loaded(api: &Arc<FakeCatalogApi>) -> CatalogController {
    let mut catalog = CatalogController::new(api.clone());
    catalog.fetch_page(&signed_in(), 1).await.expect("first page");
    api.clear_calls().await;
    catalog
}

#[tokio::test]
async fn fetch_is_skipped_without_authenticated_session() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = CatalogController::new(api.clone());

    let outcome = catalog
        .fetch_page(&Session::anonymous(), 1)
        .await
        .expect("no-op");

    assert_eq!(outcome, FetchOutcome::Skipped);
    assert!(catalog.products().is_empty());
    assert_eq!(catalog.pagination(), &PaginationDescriptor::default());
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn fetch_replaces_products_and_descriptor_together() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = CatalogController::new(api.clone());

    let outcome = catalog.fetch_page(&signed_in(), 3).await.expect("fetch");

    assert_eq!(outcome, FetchOutcome::Loaded { products: 2 });
    assert_eq!(catalog.products()[0].id, ProductId::new("p3-a"));
    assert_eq!(catalog.pagination().total_pages, 12);
    assert!(catalog.pagination().has_pre);
    assert!(!catalog.is_loading());
    assert_eq!(
        api.calls().await,
        vec![Call::ListProducts {
            token: TOKEN.into(),
            page: 3
        }]
    );
}

#[tokio::test]
async fn failed_fetch_keeps_previous_state() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    let before_products = catalog.products().to_vec();
    let before_pagination = catalog.pagination().clone();

    api.set_listing_fails(true);
    let err = catalog.fetch_page(&signed_in(), 2).await.expect_err("fails");

    assert!(matches!(err, FetchError::Remote(_)));
    assert_eq!(catalog.products(), before_products.as_slice());
    assert_eq!(catalog.pagination(), &before_pagination);
    assert!(!catalog.is_loading());
}

#[tokio::test]
async fn next_and_previous_move_window_then_fetch() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;

    catalog.next_page(&signed_in()).await.expect("next");
    assert_eq!(catalog.window().current_page(), 2);
    assert_eq!(catalog.window().current_group(), 1);

    catalog.previous_page(&signed_in()).await.expect("previous");
    assert_eq!(catalog.window().current_page(), 1);
    assert_eq!(catalog.window().current_group(), 0);

    let pages: Vec<u32> = api
        .calls()
        .await
        .into_iter()
        .filter_map(|call| match call {
            Call::ListProducts { page, .. } => Some(page),
            _ => None,
        })
        .collect();
    assert_eq!(pages, vec![2, 1]);
}

#[tokio::test]
async fn previous_on_first_page_makes_no_request() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;

    let outcome = catalog.previous_page(&signed_in()).await.expect("previous");

    assert_eq!(outcome, FetchOutcome::Skipped);
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn go_to_page_fetches_selected_page() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;

    catalog.go_to_page(&signed_in(), 4).await.expect("page 4");
    assert_eq!(catalog.window().current_page(), 4);
    assert_eq!(catalog.products()[0].id, ProductId::new("p4-a"));

    api.clear_calls().await;
    let outcome = catalog.go_to_page(&signed_in(), 4).await.expect("same page");
    assert_eq!(outcome, FetchOutcome::Skipped);
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn next_is_disabled_when_store_reports_no_next_page() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    catalog.pagination = PaginationDescriptor {
        total_pages: 12,
        has_pre: false,
        has_next: false,
        category: String::new(),
    };
    assert!(!catalog.pager().next_enabled);

    let outcome = catalog.next_page(&signed_in()).await.expect("next");

    assert_eq!(outcome, FetchOutcome::Skipped);
    assert_eq!(catalog.window(), PageWindow::at(1, 0));
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn previous_is_disabled_when_store_reports_no_previous_page() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    catalog.go_to_page(&signed_in(), 3).await.expect("page 3");
    api.clear_calls().await;
    catalog.pagination.has_pre = false;

    let outcome = catalog.previous_page(&signed_in()).await.expect("previous");

    assert_eq!(outcome, FetchOutcome::Skipped);
    assert_eq!(catalog.window().current_page(), 3);
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn go_to_page_ignores_pages_not_shown_in_pager() {
    let api = Arc::new(FakeCatalogApi::new().with_total_pages(3));
    let mut catalog = loaded(&api).await;

    let beyond_total = catalog.go_to_page(&signed_in(), 99).await.expect("ignored");
    let zero = catalog.go_to_page(&signed_in(), 0).await.expect("ignored");

    assert_eq!(beyond_total, FetchOutcome::Skipped);
    assert_eq!(zero, FetchOutcome::Skipped);
    assert_eq!(catalog.window().current_page(), 1);
    assert!(catalog.pager().pages[0].active);
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn go_to_page_ignores_pages_of_other_groups() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;

    let outcome = catalog.go_to_page(&signed_in(), 7).await.expect("ignored");

    assert_eq!(outcome, FetchOutcome::Skipped);
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn failed_navigation_keeps_pager_on_displayed_page() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    api.set_listing_fails(true);

    catalog.next_page(&signed_in()).await.expect_err("listing down");
    catalog.go_to_page(&signed_in(), 4).await.expect_err("listing down");

    assert_eq!(catalog.window(), PageWindow::at(1, 0));
    let active: Vec<u32> = catalog
        .pager()
        .pages
        .iter()
        .filter(|link| link.active)
        .map(|link| link.number)
        .collect();
    assert_eq!(active, vec![1]);
    assert_eq!(catalog.products()[0].id, ProductId::new("p1-a"));
}

#[tokio::test]
async fn pager_reflects_store_flags() {
    let api = Arc::new(FakeCatalogApi::new().with_total_pages(3));
    let catalog = loaded(&api).await;

    let pager = catalog.pager();
    assert!(pager.visible);
    assert!(!pager.prev_enabled);
    assert!(pager.next_enabled);
    assert_eq!(pager.pages.len(), 3);
    assert!(pager.pages[0].active);
}

#[tokio::test]
async fn create_submits_payload_then_reloads_current_page() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;

    let form = catalog.open_create();
    assert_eq!(form.mode(), &FormMode::Creating);
    fill_valid(&mut form.draft);
    form.draft.images_url = vec!["a".into(), "".into(), " ".into(), "b".into()];

    let receipt = catalog.submit(&signed_in()).await.expect("create");

    assert_eq!(receipt.action, ProductAction::Create);
    assert_eq!(receipt.message, "created");
    assert!(catalog.form().is_none());

    let calls = api.calls().await;
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        Call::CreateProduct { token, payload } => {
            assert_eq!(token, TOKEN);
            assert_eq!(payload.images_url, vec!["a".to_string(), "b".to_string()]);
            assert_eq!(payload.origin_price, 300.0);
        }
        other => panic!("unexpected call: {other:?}"),
    }
    assert_eq!(
        calls[1],
        Call::ListProducts {
            token: TOKEN.into(),
            page: 1
        }
    );
}

#[tokio::test]
async fn edit_dispatches_update_for_original_id() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    let id = ProductId::new("p1-b");

    let form = catalog.open_edit(&id).expect("listed product");
    assert_eq!(form.mode(), &FormMode::Editing(id.clone()));
    form.draft.title = "Renamed".into();

    let receipt = catalog.submit(&signed_in()).await.expect("update");

    assert_eq!(receipt.action, ProductAction::Update);
    match &api.calls().await[0] {
        Call::UpdateProduct { id: sent, payload, .. } => {
            assert_eq!(sent, &id);
            assert_eq!(payload.title, "Renamed");
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn open_edit_for_unknown_product_returns_none() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    assert!(catalog.open_edit(&ProductId::new("missing")).is_none());
    assert!(catalog.form().is_none());
}

#[tokio::test]
async fn invalid_draft_never_reaches_network() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;

    let form = catalog.open_create();
    fill_valid(&mut form.draft);
    form.draft.category.clear();
    form.draft.price = "-3".into();

    let err = catalog.submit(&signed_in()).await.expect_err("invalid");

    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::MissingCategory)
    ));
    assert!(api.calls().await.is_empty());
    let form = catalog.form().expect("form kept");
    assert!(form.is_open());
    assert_eq!(form.draft.price, "-3");
}

#[tokio::test]
async fn non_positive_price_is_rejected_before_dispatch() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;

    let form = catalog.open_create();
    fill_valid(&mut form.draft);
    form.draft.price = "0".into();

    let err = catalog.submit(&signed_in()).await.expect_err("invalid");
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::InvalidPrice)
    ));
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn rejected_mutation_reopens_form_with_draft_intact() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    api.set_mutation_error(Some("title already used")).await;

    let form = catalog.open_create();
    fill_valid(&mut form.draft);
    form.draft.images_url = vec!["a".into(), " ".into()];
    let draft_before = form.draft.clone();

    let err = catalog.submit(&signed_in()).await.expect_err("rejected");

    match err {
        SubmitError::Api(ApiError::Rejected { action, source }) => {
            assert_eq!(action, ProductAction::Create);
            assert!(source.to_string().contains("title already used"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let form = catalog.form().expect("form reopened");
    assert!(form.is_open());
    assert_eq!(form.draft, draft_before);
    assert!(!catalog.is_loading());
    // No reload after a failed mutation.
    assert_eq!(api.calls().await.len(), 1);
}

#[tokio::test]
async fn submit_without_session_is_rejected_locally() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = CatalogController::new(api.clone());
    fill_valid(&mut catalog.open_create().draft);

    let err = catalog
        .submit(&Session::anonymous())
        .await
        .expect_err("no session");

    assert!(matches!(err, SubmitError::Api(ApiError::NotAuthenticated)));
    assert!(api.calls().await.is_empty());
    assert!(catalog.form().expect("kept").is_open());
}

#[tokio::test]
async fn submit_without_form_reports_closed() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = CatalogController::new(api);
    assert!(matches!(
        catalog.submit(&signed_in()).await,
        Err(SubmitError::FormClosed)
    ));
}

#[tokio::test]
async fn closing_form_discards_draft() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = CatalogController::new(api);
    catalog.open_create().draft.title = "scratch".into();
    catalog.close_form();
    assert!(catalog.form().is_none());
    assert!(catalog.draft_mut().is_none());
}

#[tokio::test]
async fn remove_without_confirmation_does_nothing() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    let before = catalog.products().to_vec();
    let mut asked = Vec::new();
    let mut decline = |prompt: &str| {
        asked.push(prompt.to_string());
        false
    };

    let outcome = catalog
        .remove(&signed_in(), &ProductId::new("p1-a"), &mut decline)
        .await
        .expect("cancelled");

    assert_eq!(outcome, RemoveOutcome::Cancelled);
    assert!(api.calls().await.is_empty());
    assert_eq!(catalog.products(), before.as_slice());
    assert_eq!(asked, vec!["Delete product 'Product p1-a'?".to_string()]);
}

#[tokio::test]
async fn confirmed_remove_deletes_then_reloads() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    catalog.go_to_page(&signed_in(), 2).await.expect("page 2");
    api.clear_calls().await;

    let outcome = catalog
        .remove(&signed_in(), &ProductId::new("p2-a"), &mut |_: &str| true)
        .await
        .expect("removed");

    assert_eq!(
        outcome,
        RemoveOutcome::Removed(MutationReceipt {
            action: ProductAction::Delete,
            message: "deleted".into(),
        })
    );
    assert_eq!(
        api.calls().await,
        vec![
            Call::DeleteProduct {
                token: TOKEN.into(),
                id: ProductId::new("p2-a"),
            },
            Call::ListProducts {
                token: TOKEN.into(),
                page: 2,
            },
        ]
    );
}

#[tokio::test]
async fn failed_remove_surfaces_api_error() {
    let api = Arc::new(FakeCatalogApi::new());
    let mut catalog = loaded(&api).await;
    api.set_mutation_error(Some("not found")).await;

    let err = catalog
        .remove(&signed_in(), &ProductId::new("gone"), &mut |_: &str| true)
        .await
        .expect_err("rejected");

    assert!(matches!(
        err,
        ApiError::Rejected {
            action: ProductAction::Delete,
            ..
        }
    ));
    assert_eq!(api.calls().await.len(), 1);
}

#[test]
fn sample_payload_matches_fixture_shape() {
    let product = sample_product("x");
    let payload: ProductPayload = ProductDraft::from_product(&product)
        .validate()
        .expect("fixture is valid");
    assert_eq!(payload.title, product.title);
}
