//! Product form controller.
//!
//! Owns the state of the create/edit product form and coordinates category
//! loading, image upload, image reordering, and saving. Handlers rebuild the
//! controller from the submitted fields on every request, drive one
//! operation, and render whatever state it leaves behind.
//!
//! Saving returns a [`SaveOutcome`]; a successful save carries a one-shot
//! [`Navigation`] command that the caller consumes by redirecting.

use backoffice_core::{CategoryId, IdError, ImageList, ProductId, ReorderError};
use tracing::{error, info, instrument, warn};

use super::listing::degrade;
use crate::models::Notice;
use crate::store::{ApiError, Category, Product, ProductPayload, StoreApi, UploadFile};

/// Label of the "no category" option.
pub const NO_CATEGORY_LABEL: &str = "Sin categoria";

/// Raw field values as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    /// Hidden `_id` field; empty for new products.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Selected category id; empty means none.
    pub category: String,
    pub price: String,
    /// Hidden `images` fields in display order.
    pub images: Vec<String>,
}

impl ProductInput {
    /// Collect fields from url-encoded or multipart pairs.
    ///
    /// `images` may repeat and keeps submission order; unknown keys are
    /// ignored and for single-valued fields the last value wins.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut input = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "_id" => input.id = value,
                "title" => input.title = value,
                "description" => input.description = value,
                "category" => input.category = value,
                "price" => input.price = value,
                "images" if !value.is_empty() => input.images.push(value),
                _ => {}
            }
        }
        input
    }
}

/// Where to go after a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Navigation {
    /// The product listing.
    ToProducts,
}

impl Navigation {
    /// Path of the navigation target.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::ToProducts => "/products",
        }
    }
}

/// Result of [`ProductForm::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SaveOutcome {
    /// Saved; perform the navigation exactly once.
    Saved(Navigation),
    /// Not saved; the form still holds every typed value.
    Failed,
}

/// Result of an image upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No files were selected; nothing was sent.
    Skipped,
    /// This many links were appended.
    Uploaded(usize),
    /// The upload failed; images are unchanged.
    Failed,
}

/// An `<option>` of the category selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// State of the product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    id: Option<ProductId>,
    title: String,
    description: String,
    category: String,
    price: String,
    images: ImageList,
    uploading: bool,
    notice: Option<Notice>,
    error: Option<String>,
}

impl ProductForm {
    /// An empty form for a new product.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form seeded from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            title: product.title.clone(),
            description: product.description.clone(),
            category: product
                .category
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            price: product.price.clone(),
            images: ImageList::from(product.images.clone()),
            ..Self::default()
        }
    }

    /// A form holding only `images`, used to validate a reorder.
    #[must_use]
    pub fn with_images(images: Vec<String>) -> Self {
        Self {
            images: ImageList::from(images),
            ..Self::default()
        }
    }

    /// Rebuild the form from submitted fields.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if a non-empty `_id` is not a valid product id,
    /// so a tampered id can never turn an update into a create.
    pub fn from_input(input: ProductInput) -> Result<Self, IdError> {
        let id = if input.id.trim().is_empty() {
            None
        } else {
            Some(ProductId::parse(&input.id)?)
        };

        Ok(Self {
            id,
            title: input.title,
            description: input.description,
            category: input.category,
            price: input.price,
            images: ImageList::from(input.images),
            ..Self::default()
        })
    }

    #[must_use]
    pub const fn id(&self) -> Option<&ProductId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn price(&self) -> &str {
        &self.price
    }

    #[must_use]
    pub const fn images(&self) -> &ImageList {
        &self.images
    }

    /// Whether an upload is in flight.
    #[must_use]
    pub const fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// The modal to show, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The last error message, cleared by a successful save.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the notice (e.g. with a flash carried over a redirect).
    pub fn set_notice(&mut self, notice: Option<Notice>) {
        self.notice = notice;
    }

    /// Selector options: "Sin categoria" first, then every category, with
    /// the current selection marked.
    #[must_use]
    pub fn category_options(&self, categories: &[Category]) -> Vec<CategoryOption> {
        let mut options = Vec::with_capacity(categories.len() + 1);
        options.push(CategoryOption {
            value: String::new(),
            label: NO_CATEGORY_LABEL.to_string(),
            selected: self.category.is_empty(),
        });
        options.extend(categories.iter().map(|c| CategoryOption {
            value: c.id.to_string(),
            label: c.name.clone(),
            selected: c.id.as_str() == self.category,
        }));
        options
    }

    /// Payload for the create/update request.
    #[must_use]
    pub fn payload(&self) -> ProductPayload {
        let category = if self.category.trim().is_empty() {
            None
        } else {
            CategoryId::parse(&self.category)
                .inspect_err(|e| warn!(category = %self.category, error = %e, "Ignoring invalid category"))
                .ok()
        };

        ProductPayload {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            images: self.images.as_slice().to_vec(),
            category,
        }
    }

    /// Save the product: update when the form has an id, create otherwise.
    ///
    /// On success the title, description, and price are cleared and the
    /// caller receives [`Navigation::ToProducts`]. On failure every field is
    /// left as typed.
    #[instrument(skip(self, api), fields(product_id = ?self.id))]
    pub async fn save<A: StoreApi>(&mut self, api: &A) -> SaveOutcome {
        let payload = self.payload();
        let result = if payload.id.is_some() {
            api.update_product(&payload).await
        } else {
            api.create_product(&payload).await
        };

        match result {
            Ok(()) => {
                info!(title = %payload.title, "Product saved");
                self.notice = Some(Notice::product_saved());
                self.title.clear();
                self.description.clear();
                self.price.clear();
                self.error = None;
                SaveOutcome::Saved(Navigation::ToProducts)
            }
            Err(e) => {
                error!(error = %e, "Failed to save product");
                self.notice = Some(Notice::product_save_failed());
                self.error = Some(e.to_string());
                SaveOutcome::Failed
            }
        }
    }

    /// Mark an upload as started. Returns `false` (and changes nothing) when
    /// no files were selected.
    pub fn begin_upload(&mut self, files: &[UploadFile]) -> bool {
        if files.is_empty() {
            return false;
        }
        self.uploading = true;
        true
    }

    /// Apply the result of an upload started with [`Self::begin_upload`].
    pub fn finish_upload(&mut self, result: Result<Vec<String>, ApiError>) -> UploadOutcome {
        self.uploading = false;
        match result {
            Ok(links) => {
                let count = links.len();
                self.images.append(links);
                UploadOutcome::Uploaded(count)
            }
            Err(e) => {
                error!(error = %e, "Failed to upload images");
                self.notice = Some(Notice::upload_failed());
                UploadOutcome::Failed
            }
        }
    }

    /// Upload the selected files in one request and append the returned
    /// links after the current images.
    #[instrument(skip(self, api, files), fields(files = files.len()))]
    pub async fn upload_images<A: StoreApi>(
        &mut self,
        api: &A,
        files: Vec<UploadFile>,
    ) -> UploadOutcome {
        if !self.begin_upload(&files) {
            return UploadOutcome::Skipped;
        }
        let result = api.upload_images(files).await;
        self.finish_upload(result)
    }

    /// Fail an upload whose files never arrived intact (the request body was
    /// cut off or exceeded the size limit). Images and fields are untouched.
    pub fn reject_upload(&mut self, reason: &str) -> UploadOutcome {
        warn!(reason, "Upload request could not be read");
        self.uploading = false;
        self.notice = Some(Notice::upload_failed());
        UploadOutcome::Failed
    }

    /// Accept a new image order from the sortable control.
    ///
    /// # Errors
    ///
    /// Returns [`ReorderError`] (and leaves the order unchanged) if `order`
    /// is not a permutation of the current images.
    pub fn reorder_images(&mut self, order: Vec<String>) -> Result<(), ReorderError> {
        self.images.replace_with(order).inspect_err(|e| {
            warn!(error = %e, "Rejected image reorder");
        })
    }
}

/// Fetch the category collection for the selector.
///
/// A failure is logged and yields no categories, which leaves only the
/// "Sin categoria" option.
pub async fn load_categories<A: StoreApi>(api: &A) -> Vec<Category> {
    degrade(api.list_categories().await, "categories")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::store::fake::{Call, FakeStore};

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: CategoryId::parse(id).unwrap(),
            name: name.to_string(),
        }
    }

    fn file(name: &str) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![0xFF, 0xD8],
        }
    }

    fn new_input() -> ProductInput {
        ProductInput {
            title: "Botas vaqueras".to_string(),
            description: "Piel genuina".to_string(),
            price: "1299".to_string(),
            ..ProductInput::default()
        }
    }

    #[test]
    fn test_from_pairs_keeps_image_order() {
        let input = ProductInput::from_pairs(vec![
            ("title".to_string(), "Botas".to_string()),
            ("images".to_string(), "b.jpg".to_string()),
            ("images".to_string(), String::new()),
            ("images".to_string(), "a.jpg".to_string()),
            ("unknown".to_string(), "x".to_string()),
        ]);
        assert_eq!(input.title, "Botas");
        assert_eq!(input.images, vec!["b.jpg", "a.jpg"]);
    }

    #[test]
    fn test_from_input_rejects_bad_id() {
        let input = ProductInput {
            id: "p1/../x".to_string(),
            ..new_input()
        };
        assert!(ProductForm::from_input(input).is_err());
    }

    #[test]
    fn test_from_product_seeds_every_field() {
        let product = Product {
            id: ProductId::parse("p1").unwrap(),
            title: "Botas".to_string(),
            description: "Piel".to_string(),
            price: "99.5".to_string(),
            images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            category: Some(CategoryId::parse("c1").unwrap()),
        };
        let form = ProductForm::from_product(&product);
        assert_eq!(form.id().unwrap().as_str(), "p1");
        assert_eq!(form.title(), "Botas");
        assert_eq!(form.description(), "Piel");
        assert_eq!(form.price(), "99.5");
        assert_eq!(form.category(), "c1");
        assert_eq!(form.images().as_slice(), ["a.jpg", "b.jpg"]);
        assert!(form.notice().is_none());
    }

    #[test]
    fn test_category_options_example() {
        let categories = vec![category("c1", "Shoes")];
        let mut form = ProductForm::new();

        let options = form.category_options(&categories);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, NO_CATEGORY_LABEL);
        assert_eq!(options[0].value, "");
        assert!(options[0].selected);
        assert_eq!(options[1].label, "Shoes");
        assert_eq!(options[1].value, "c1");
        assert!(!options[1].selected);

        form.category = "c1".to_string();
        let options = form.category_options(&categories);
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }

    #[tokio::test]
    async fn test_load_categories_failure_leaves_only_no_category() {
        let store = FakeStore::failing();
        let categories = load_categories(&store).await;
        assert!(categories.is_empty());

        let options = ProductForm::new().category_options(&categories);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, NO_CATEGORY_LABEL);
    }

    #[tokio::test]
    async fn test_save_new_product_creates_once_with_null_category() {
        let store = FakeStore::default();
        let mut form = ProductForm::from_input(new_input()).unwrap();

        let outcome = form.save(&store).await;

        assert_eq!(outcome, SaveOutcome::Saved(Navigation::ToProducts));
        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        let Call::CreateProduct(payload) = &calls[0] else {
            panic!("expected a create request, got {calls:?}");
        };
        assert_eq!(payload.id, None);
        assert_eq!(payload.category, None);
        assert_eq!(payload.title, "Botas vaqueras");
    }

    #[tokio::test]
    async fn test_save_with_selected_category_sends_its_id() {
        let store = FakeStore::default();
        let mut form = ProductForm::from_input(ProductInput {
            category: "c1".to_string(),
            ..new_input()
        })
        .unwrap();

        let _ = form.save(&store).await;

        let Call::CreateProduct(payload) = &store.calls()[0] else {
            panic!("expected a create request");
        };
        assert_eq!(payload.category, Some(CategoryId::parse("c1").unwrap()));
    }

    #[tokio::test]
    async fn test_save_existing_product_updates_with_id() {
        let store = FakeStore::default();
        let mut form = ProductForm::from_input(ProductInput {
            id: "665f1c".to_string(),
            ..new_input()
        })
        .unwrap();

        let outcome = form.save(&store).await;

        assert!(matches!(outcome, SaveOutcome::Saved(_)));
        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        let Call::UpdateProduct(payload) = &calls[0] else {
            panic!("expected an update request, got {calls:?}");
        };
        assert_eq!(payload.id.as_ref().unwrap().as_str(), "665f1c");
    }

    #[tokio::test]
    async fn test_successful_save_clears_text_fields_and_keeps_images() {
        let store = FakeStore::default();
        let mut form = ProductForm::from_input(ProductInput {
            images: vec!["a.jpg".to_string()],
            category: "c1".to_string(),
            ..new_input()
        })
        .unwrap();

        let _ = form.save(&store).await;

        assert_eq!(form.title(), "");
        assert_eq!(form.description(), "");
        assert_eq!(form.price(), "");
        assert_eq!(form.category(), "c1");
        assert_eq!(form.images().as_slice(), ["a.jpg"]);
        assert_eq!(form.notice(), Some(&Notice::product_saved()));
        assert_eq!(form.error(), None);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_every_typed_value() {
        let store = FakeStore::failing();
        let input = ProductInput {
            id: "p7".to_string(),
            category: "c1".to_string(),
            images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            ..new_input()
        };
        let mut form = ProductForm::from_input(input.clone()).unwrap();
        let before = form.payload();

        let outcome = form.save(&store).await;

        assert_eq!(outcome, SaveOutcome::Failed);
        assert_eq!(form.payload(), before);
        assert_eq!(form.title(), input.title);
        assert_eq!(form.notice(), Some(&Notice::product_save_failed()));
        assert!(form.error().is_some());
    }

    #[tokio::test]
    async fn test_sequential_uploads_append_in_upload_order() {
        let store = FakeStore::default();
        let mut form = ProductForm::from_input(ProductInput {
            images: vec!["https://cdn.test/old.jpg".to_string()],
            ..new_input()
        })
        .unwrap();

        for name in ["1.jpg", "2.jpg", "3.jpg"] {
            let outcome = form.upload_images(&store, vec![file(name)]).await;
            assert_eq!(outcome, UploadOutcome::Uploaded(1));
        }

        assert_eq!(
            form.images().as_slice(),
            [
                "https://cdn.test/old.jpg",
                "https://cdn.test/1.jpg",
                "https://cdn.test/2.jpg",
                "https://cdn.test/3.jpg",
            ]
        );
        assert!(!form.is_uploading());
    }

    #[tokio::test]
    async fn test_multi_file_upload_is_one_request() {
        let store = FakeStore::default();
        let mut form = ProductForm::new();

        let outcome = form
            .upload_images(&store, vec![file("a.jpg"), file("b.jpg")])
            .await;

        assert_eq!(outcome, UploadOutcome::Uploaded(2));
        assert_eq!(
            store.calls(),
            vec![Call::Upload(vec!["a.jpg".to_string(), "b.jpg".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_empty_selection_sends_nothing() {
        let store = FakeStore::default();
        let mut form = ProductForm::new();

        assert_eq!(
            form.upload_images(&store, vec![]).await,
            UploadOutcome::Skipped
        );
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_leaves_images_and_fields() {
        let store = FakeStore::failing();
        let mut form = ProductForm::from_input(ProductInput {
            images: vec!["a.jpg".to_string()],
            ..new_input()
        })
        .unwrap();

        let outcome = form.upload_images(&store, vec![file("b.jpg")]).await;

        assert_eq!(outcome, UploadOutcome::Failed);
        assert_eq!(form.images().as_slice(), ["a.jpg"]);
        assert_eq!(form.title(), "Botas vaqueras");
        assert_eq!(form.notice(), Some(&Notice::upload_failed()));
        assert!(!form.is_uploading());
    }

    #[test]
    fn test_rejected_upload_shows_modal_and_keeps_form() {
        let mut form = ProductForm::from_input(ProductInput {
            images: vec!["a.jpg".to_string()],
            ..new_input()
        })
        .unwrap();

        let outcome = form.reject_upload("length limit exceeded");

        assert_eq!(outcome, UploadOutcome::Failed);
        assert_eq!(form.images().as_slice(), ["a.jpg"]);
        assert_eq!(form.title(), "Botas vaqueras");
        assert_eq!(form.notice(), Some(&Notice::upload_failed()));
        assert!(!form.is_uploading());
    }

    #[test]
    fn test_upload_flag_spans_the_request() {
        let mut form = ProductForm::new();
        assert!(form.begin_upload(&[file("a.jpg")]));
        assert!(form.is_uploading());

        let _ = form.finish_upload(Ok(vec!["https://cdn.test/a.jpg".to_string()]));
        assert!(!form.is_uploading());
    }

    #[test]
    fn test_reorder_sets_exact_sequence() {
        let mut form = ProductForm::from_input(ProductInput {
            images: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            ..ProductInput::default()
        })
        .unwrap();

        form.reorder_images(vec!["b".to_string(), "c".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(form.images().as_slice(), ["b", "c", "a"]);

        assert!(
            form.reorder_images(vec!["b".to_string(), "c".to_string()])
                .is_err()
        );
        assert_eq!(form.images().as_slice(), ["b", "c", "a"]);
    }
}
