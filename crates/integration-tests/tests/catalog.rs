//! Catalog flows: listing, cache-backed cart adds, creation, deletion with
//! confirmation, and image upload.

use shopdeck_console::notify::NoticeKind;
use shopdeck_core::ProductId;
use shopdeck_integration_tests::TestContext;

#[tokio::test]
async fn test_refresh_fills_the_cache_and_the_cart_reads_from_it() {
    let ctx = TestContext::start().await;
    ctx.products.seed("Laptop", 999.99, 10);
    ctx.products.seed("Mouse", 25.5, 50);

    let mut app = ctx.app();
    app.handle_line("products").await;
    assert_eq!(app.catalog_view().snapshot().map(<[_]>::len), Some(2));

    app.handle_line("add 1").await;
    let line = app.cart().lines().first().expect("one cart line").clone();
    assert_eq!(line.product_id, ProductId::new(1));
    assert_eq!(line.name, "Laptop");
    assert_eq!(line.quantity, 1);

    let notice = app.take_notice().expect("confirmation notice");
    assert_eq!(notice.kind, NoticeKind::Success);
    assert!(notice.text.contains("Laptop"));
}

#[tokio::test]
async fn test_adding_an_unfetched_product_is_a_local_error() {
    let ctx = TestContext::start().await;
    let mut app = ctx.app();

    app.handle_line("add 42").await;

    assert!(app.cart().is_empty());
    let notice = app.take_notice().expect("error notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.text.contains("products"));
}

#[tokio::test]
async fn test_search_is_applied_server_side() {
    let ctx = TestContext::start().await;
    ctx.products.seed("Laptop", 999.99, 10);
    ctx.products.seed("Mouse", 25.5, 50);

    let mut app = ctx.app();
    app.handle_line("products laptop").await;

    let snapshot = app.catalog_view().snapshot().expect("catalog fetched");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(
        snapshot.first().map(|p| p.name.as_str()),
        Some("Laptop")
    );
}

#[tokio::test]
async fn test_create_product_refetches_the_catalog() {
    let ctx = TestContext::start().await;
    let mut app = ctx.app();

    app.handle_line("product add Keyboard 45.25 5 Mechanical keys").await;

    let stored = ctx.products.products();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.first().map(|p| p["name"].clone()), Some("Keyboard".into()));

    let snapshot = app.catalog_view().snapshot().expect("catalog refetched");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.first().map(|p| p.stock_quantity), Some(5));
}

#[tokio::test]
async fn test_delete_waits_for_confirmation_then_accepts_204() {
    let ctx = TestContext::start().await;
    ctx.products.seed("Laptop", 999.99, 10);

    let mut app = ctx.app();
    app.handle_line("products").await;
    app.handle_line("product rm 1").await;

    // Nothing is sent until the deletion is confirmed.
    assert_eq!(ctx.products.products().len(), 1);

    app.handle_line("y").await;
    assert!(ctx.products.products().is_empty());

    let notice = app.take_notice().expect("deletion notice");
    assert_eq!(notice.kind, NoticeKind::Success);

    // The refetched catalog reflects the deletion.
    assert_eq!(app.catalog_view().snapshot().map(<[_]>::len), Some(0));
}

#[tokio::test]
async fn test_delete_can_be_cancelled() {
    let ctx = TestContext::start().await;
    ctx.products.seed("Laptop", 999.99, 10);

    let mut app = ctx.app();
    app.handle_line("products").await;
    app.handle_line("product rm 1").await;
    app.handle_line("n").await;

    assert_eq!(ctx.products.products().len(), 1);

    // A later `y` has nothing left to confirm.
    app.handle_line("y").await;
    assert_eq!(ctx.products.products().len(), 1);
}

#[tokio::test]
async fn test_image_upload_sends_multipart_and_refetches() {
    let ctx = TestContext::start().await;
    ctx.products.seed("Laptop", 999.99, 10);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("photo.png");
    std::fs::write(&path, b"\x89PNG fake image bytes").expect("write image");

    let mut app = ctx.app();
    app.handle_line("products").await;
    app.handle_line(&format!("product image 1 {}", path.display()))
        .await;

    let uploads = ctx.products.uploads();
    assert_eq!(uploads.len(), 1);
    let upload = uploads.first().expect("one upload");
    assert_eq!(upload.product_id, 1);
    assert_eq!(upload.file_name, "photo.png");
    assert_eq!(upload.content_type.as_deref(), Some("image/png"));
    assert_eq!(upload.size, b"\x89PNG fake image bytes".len());

    // The refetched catalog carries the new image URL.
    let snapshot = app.catalog_view().snapshot().expect("catalog refetched");
    let image_url = snapshot
        .first()
        .and_then(|p| p.image_url.as_deref())
        .expect("image url set");
    assert!(image_url.contains("photo.png"));
}

#[tokio::test]
async fn test_image_upload_requires_a_readable_file() {
    let ctx = TestContext::start().await;
    ctx.products.seed("Laptop", 999.99, 10);

    let mut app = ctx.app();
    app.handle_line("products").await;
    app.handle_line("product image 1 /definitely/not/here.png")
        .await;

    // Local precondition failure: no request left the process.
    assert!(ctx.products.uploads().is_empty());
    let notice = app.take_notice().expect("error notice");
    assert_eq!(notice.kind, NoticeKind::Error);
}

#[tokio::test]
async fn test_stock_update_round_trips() {
    let ctx = TestContext::start().await;
    ctx.products.seed("Laptop", 999.99, 10);

    let mut app = ctx.app();
    app.handle_line("product stock 1 3").await;

    let snapshot = app.catalog_view().snapshot().expect("catalog refetched");
    assert_eq!(snapshot.first().map(|p| p.stock_quantity), Some(3));
}
