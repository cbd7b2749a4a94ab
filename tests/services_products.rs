use pushkind_storefront::domain::product::NewProduct;
use pushkind_storefront::forms::products::ProductFields;
use pushkind_storefront::repository::{DieselRepository, ProductReader, ProductWriter};
use pushkind_storefront::services::ServiceError;
use pushkind_storefront::services::products::{self, CatalogParams};

mod common;

use common::{ObservedStorage, TestDb, png};

fn fields(name: &str, price: &str) -> ProductFields {
    ProductFields {
        name: Some(name.to_string()),
        price: Some(price.to_string()),
        ..ProductFields::default()
    }
}

fn keep(urls: &[String]) -> ProductFields {
    ProductFields {
        existing_images: Some(serde_json::to_string(urls).expect("json")),
        ..ProductFields::default()
    }
}

fn params(pairs: &[(&str, &str)]) -> CatalogParams {
    let mut params = CatalogParams::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "page" => params.page = value,
            "limit" => params.limit = value,
            "category" => params.category = value,
            "search" => params.search = value,
            "active" => params.active = value,
            other => panic!("unknown param {other}"),
        }
    }
    params
}

#[test]
fn create_product_uploads_images_in_order() {
    let test_db = TestDb::new("service_create_product_uploads_images.db");
    let repo = DieselRepository::new(test_db.pool());
    let storage = ObservedStorage::new(test_db.storage());

    let product = products::create_product(
        &repo,
        &storage,
        fields("Bolso", "120000"),
        vec![png("front"), png("back")],
    )
    .expect("create product");

    assert!(product.active);
    assert!(!product.featured);
    assert_eq!(product.images.len(), 2);
    assert!(
        product.images[0]
            .starts_with("http://localhost:8080/storage/v1/object/public/product-images/")
    );
    assert_eq!(storage.stored_objects().len(), 2);

    let stored = repo.get_product_by_id(product.id).unwrap().expect("product");
    assert_eq!(stored.images, product.images);
}

#[test]
fn update_with_unchanged_images_is_idempotent() {
    let test_db = TestDb::new("service_update_idempotent.db");
    let repo = DieselRepository::new(test_db.pool());
    let storage = ObservedStorage::new(test_db.storage());

    let product = products::create_product(
        &repo,
        &storage,
        fields("Bolso", "10"),
        vec![png("a"), png("b")],
    )
    .expect("create product");
    let objects_before = storage.stored_objects();
    let uploads_before = storage.upload_count();

    let updated = products::update_product(
        &repo,
        &storage,
        product.id,
        keep(&product.images),
        Vec::new(),
    )
    .expect("update product");

    assert_eq!(updated.images, product.images);
    assert_eq!(storage.upload_count(), uploads_before);
    assert!(storage.removed().is_empty());
    assert_eq!(storage.stored_objects(), objects_before);
}

#[test]
fn update_deletes_dropped_images_and_appends_new_ones() {
    let test_db = TestDb::new("service_update_deletion_set.db");
    let repo = DieselRepository::new(test_db.pool());
    let storage = ObservedStorage::new(test_db.storage());

    let product = products::create_product(
        &repo,
        &storage,
        fields("Bolso", "10"),
        vec![png("a"), png("b"), png("c")],
    )
    .expect("create product");
    let [a, b, c] = [&product.images[0], &product.images[1], &product.images[2]];

    let updated = products::update_product(
        &repo,
        &storage,
        product.id,
        keep(&[a.clone(), c.clone()]),
        vec![png("d")],
    )
    .expect("update product");

    assert_eq!(updated.images.len(), 3);
    assert_eq!(&updated.images[0], a);
    assert_eq!(&updated.images[1], c);
    assert!(!product.images.contains(&updated.images[2]));

    let removed = storage.removed();
    assert_eq!(removed.len(), 1);
    assert!(b.ends_with(&removed[0]));
    assert_eq!(storage.stored_objects().len(), 3);
}

#[test]
fn update_keeps_retained_urls_that_were_never_stored() {
    let test_db = TestDb::new("service_update_keeps_foreign_urls.db");
    let repo = DieselRepository::new(test_db.pool());
    let storage = ObservedStorage::new(test_db.storage());

    let product = products::create_product(
        &repo,
        &storage,
        fields("Bolso", "10"),
        vec![png("a"), png("b")],
    )
    .expect("create product");
    let legacy = "https://legacy.example.com/x.png".to_string();

    let updated = products::update_product(
        &repo,
        &storage,
        product.id,
        keep(&[product.images[0].clone(), legacy.clone()]),
        Vec::new(),
    )
    .expect("update product");

    assert_eq!(updated.images, vec![product.images[0].clone(), legacy]);
    assert_eq!(storage.removed().len(), 1);
    assert!(product.images[1].ends_with(&storage.removed()[0]));
}

#[test]
fn failed_upload_leaves_record_unchanged() {
    let test_db = TestDb::new("service_update_atomicity.db");
    let repo = DieselRepository::new(test_db.pool());
    let storage = ObservedStorage::new(test_db.storage());

    let product = products::create_product(
        &repo,
        &storage,
        fields("Bolso", "10"),
        vec![png("a")],
    )
    .expect("create product");
    let objects_before = storage.stored_objects();

    let storage = storage.failing_upload_at(2);
    let mut edit = keep(&[]);
    edit.name = Some("Renamed".to_string());

    let result = products::update_product(
        &repo,
        &storage,
        product.id,
        edit,
        vec![png("b"), png("c")],
    );

    assert!(matches!(result, Err(ServiceError::UploadFailed(_))));
    let stored = repo.get_product_by_id(product.id).unwrap().expect("product");
    assert_eq!(stored, product);
    assert_eq!(storage.stored_objects(), objects_before);
}

#[test]
fn failed_create_upload_writes_nothing() {
    let test_db = TestDb::new("service_create_atomicity.db");
    let repo = DieselRepository::new(test_db.pool());
    let storage = ObservedStorage::new(test_db.storage()).failing_upload_at(2);

    let result = products::create_product(
        &repo,
        &storage,
        fields("Bolso", "10"),
        vec![png("a"), png("b")],
    );

    assert!(matches!(result, Err(ServiceError::UploadFailed(_))));
    let page = products::list_products(&repo, CatalogParams::default()).unwrap();
    assert_eq!(page.total_products, 0);
    assert!(storage.stored_objects().is_empty());
}

#[test]
fn delete_product_removes_every_image() {
    let test_db = TestDb::new("service_delete_cascade.db");
    let repo = DieselRepository::new(test_db.pool());
    let storage = ObservedStorage::new(test_db.storage());

    let product = products::create_product(
        &repo,
        &storage,
        fields("Bolso", "10"),
        vec![png("a"), png("b"), png("c")],
    )
    .expect("create product");

    products::delete_product(&repo, &storage, product.id).expect("delete product");

    assert_eq!(storage.removed().len(), 3);
    assert!(storage.stored_objects().is_empty());
    assert!(matches!(
        products::get_product(&repo, product.id),
        Err(ServiceError::NotFound)
    ));
    assert!(matches!(
        products::delete_product(&repo, &storage, product.id),
        Err(ServiceError::NotFound)
    ));
}

#[test]
fn catalog_treats_sentinel_categories_as_unfiltered() {
    let test_db = TestDb::new("service_catalog_sentinels.db");
    let repo = DieselRepository::new(test_db.pool());

    for (name, category) in [("Red Bag", "bags"), ("Hat", "hats")] {
        repo.create_product(&NewProduct::new(name, 1.0).with_category(category))
            .unwrap();
    }

    let unfiltered = products::list_products(&repo, CatalogParams::default()).unwrap();
    for sentinel in ["all", "todos"] {
        let page = products::list_products(&repo, params(&[("category", sentinel)])).unwrap();
        assert_eq!(page.total_products, unfiltered.total_products);
        assert_eq!(page.products, unfiltered.products);
    }

    let bags = products::list_products(&repo, params(&[("category", "bags")])).unwrap();
    assert_eq!(bags.total_products, 1);

    let padded = products::list_products(&repo, params(&[("category", " bags")])).unwrap();
    assert_eq!(padded.total_products, 0);
}

#[test]
fn catalog_page_counts() {
    let test_db = TestDb::new("service_catalog_page_counts.db");
    let repo = DieselRepository::new(test_db.pool());

    for n in 0..3 {
        repo.create_product(&NewProduct::new(format!("P{n}"), 1.0))
            .unwrap();
    }

    let page = products::list_products(&repo, params(&[("page", "999"), ("limit", "8")])).unwrap();
    assert!(page.products.is_empty());
    assert_eq!(page.current_page, 999);
    assert_eq!(page.total_products, 3);
    assert_eq!(page.total_pages, 1);

    let page = products::list_products(&repo, params(&[("limit", "2")])).unwrap();
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.products.len(), 2);

    let page = products::list_products(&repo, params(&[("search", "nothing-here")])).unwrap();
    assert_eq!(page.total_products, 0);
    assert_eq!(page.total_pages, 0);

    let page = products::list_products(&repo, params(&[("page", "abc"), ("limit", "0")])).unwrap();
    assert_eq!(page.current_page, products::DEFAULT_PAGE);
    assert_eq!(page.products.len(), 3);
}
