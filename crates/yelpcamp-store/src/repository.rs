//! # Repository
//!
//! The resource store handed to the web layer at startup. It owns the two
//! in-memory collections and, when configured, the PostgreSQL pool.
//!
//! ## Write ordering
//!
//! Every mutation is written to the database first (when one is
//! configured) and applied to the in-memory collections only after the
//! write succeeded, so a failed write leaves both sides unchanged.
//!
//! ## Two-entity writes
//!
//! Adding or deleting a review touches both the `reviews` collection and
//! the owning campground's reference list:
//!
//! - With a database, both statements run in one transaction.
//! - In memory, the review is inserted first and the reference appended
//!   under the campground's write lock. If the campground disappeared in
//!   between, the review is removed again and `CampgroundNotFound` is
//!   returned.

use sqlx::PgPool;
use yelpcamp_core::{
    Campground, CampgroundFields, CampgroundId, CampgroundPatch, Review, ReviewFields, ReviewId,
};

use crate::db;
use crate::error::StoreError;
use crate::memory::Store;

/// Behavior switches for the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Delete a campground's reviews together with the campground. When
    /// off, the reviews stay in the store unreferenced.
    pub cascade_review_delete: bool,
}

/// A campground with its review references resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CampgroundDetail {
    pub campground: Campground,
    /// Resolved reviews, in reference order. Dangling references are skipped.
    pub reviews: Vec<Review>,
}

/// Campground and review persistence.
///
/// Cloning is cheap; clones share the same collections and pool.
#[derive(Debug, Clone)]
pub struct Repository {
    campgrounds: Store<CampgroundId, Campground>,
    reviews: Store<ReviewId, Review>,
    pool: Option<PgPool>,
    options: RepositoryOptions,
}

impl Repository {
    /// Create an empty repository without a database.
    pub fn in_memory(options: RepositoryOptions) -> Self {
        Self {
            campgrounds: Store::new(),
            reviews: Store::new(),
            pool: None,
            options,
        }
    }

    /// Connect the repository.
    ///
    /// Without a URL the repository runs in-memory only. With one, the pool
    /// is opened, migrations are applied and the in-memory collections are
    /// hydrated from the database. Connection and migration failures are
    /// returned to the caller.
    pub async fn connect(
        database_url: Option<&str>,
        options: RepositoryOptions,
    ) -> Result<Self, StoreError> {
        let Some(url) = database_url else {
            tracing::warn!(
                "DATABASE_URL not set; running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(Self::in_memory(options));
        };

        let pool = db::init_pool(url).await?;
        let repo = Self {
            pool: Some(pool),
            ..Self::in_memory(options)
        };
        repo.hydrate().await?;
        Ok(repo)
    }

    /// Load every persisted campground and review into memory.
    async fn hydrate(&self) -> Result<(), StoreError> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };

        let campgrounds = db::campgrounds::load_all(pool).await?;
        let campground_count = campgrounds.len();
        for record in campgrounds {
            self.campgrounds.insert(record.id, record);
        }

        let reviews = db::reviews::load_all(pool).await?;
        let review_count = reviews.len();
        for record in reviews {
            self.reviews.insert(record.id, record);
        }

        tracing::info!(
            campgrounds = campground_count,
            reviews = review_count,
            "Hydrated in-memory stores from database"
        );
        Ok(())
    }

    /// Close the database pool, if any. Further writes will fail.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            tracing::info!("Database pool closed");
        }
    }

    /// Whether writes go to a database.
    pub fn is_persistent(&self) -> bool {
        self.pool.is_some()
    }

    /// Check that the database answers. Always succeeds in memory mode.
    pub async fn ping(&self) -> Result<(), StoreError> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }

    /// The active options.
    pub fn options(&self) -> RepositoryOptions {
        self.options
    }

    // -- Campgrounds --------------------------------------------------------

    /// All campgrounds, newest first.
    pub fn list_campgrounds(&self) -> Vec<Campground> {
        let mut all = self.campgrounds.list();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Number of stored campgrounds.
    pub fn campground_count(&self) -> usize {
        self.campgrounds.len()
    }

    /// Create and persist a campground.
    pub async fn create_campground(&self, fields: CampgroundFields) -> Result<Campground, StoreError> {
        let record = Campground::new(fields);

        if let Some(pool) = &self.pool {
            db::campgrounds::insert(pool, &record).await?;
        }
        self.campgrounds.insert(record.id, record.clone());

        tracing::info!(campground_id = %record.id, title = %record.title, "campground created");
        Ok(record)
    }

    /// Fetch a campground by id.
    pub fn campground(&self, id: CampgroundId) -> Result<Campground, StoreError> {
        self.campgrounds
            .get(&id)
            .ok_or(StoreError::CampgroundNotFound(id))
    }

    /// Fetch a campground and resolve its review references.
    pub fn campground_with_reviews(&self, id: CampgroundId) -> Result<CampgroundDetail, StoreError> {
        let campground = self.campground(id)?;
        let mut reviews = Vec::with_capacity(campground.reviews.len());
        for review_id in &campground.reviews {
            match self.reviews.get(review_id) {
                Some(review) => reviews.push(review),
                None => tracing::warn!(
                    campground_id = %id,
                    review_id = %review_id,
                    "campground references a review that does not exist; skipping"
                ),
            }
        }
        Ok(CampgroundDetail { campground, reviews })
    }

    /// Replace the fields listed in `patch`.
    pub async fn update_campground(
        &self,
        id: CampgroundId,
        patch: &CampgroundPatch,
    ) -> Result<Campground, StoreError> {
        let mut preview = self.campground(id)?;
        preview.apply(patch);

        if let Some(pool) = &self.pool {
            if !db::campgrounds::update_fields(pool, &preview).await? {
                return Err(StoreError::CampgroundNotFound(id));
            }
        }

        // Apply to the live record so a concurrently attached review survives.
        let updated = self
            .campgrounds
            .update(&id, |c| {
                c.apply(patch);
                c.updated_at = preview.updated_at;
            })
            .ok_or(StoreError::CampgroundNotFound(id))?;

        tracing::info!(campground_id = %id, "campground updated");
        Ok(updated)
    }

    /// Delete a campground, returning the removed record.
    ///
    /// Its reviews are deleted too when `cascade_review_delete` is set.
    pub async fn delete_campground(&self, id: CampgroundId) -> Result<Campground, StoreError> {
        let existing = self.campground(id)?;
        let cascade = self.options.cascade_review_delete;

        if let Some(pool) = &self.pool {
            let mut tx = pool.begin().await?;
            if cascade && !existing.reviews.is_empty() {
                db::reviews::delete_many(&mut *tx, &existing.reviews).await?;
            }
            if !db::campgrounds::delete(&mut *tx, id).await? {
                return Err(StoreError::CampgroundNotFound(id));
            }
            tx.commit().await?;
        }

        let removed = self
            .campgrounds
            .remove(&id)
            .ok_or(StoreError::CampgroundNotFound(id))?;

        if cascade {
            for review_id in &removed.reviews {
                self.reviews.remove(review_id);
            }
        } else if !removed.reviews.is_empty() {
            tracing::debug!(
                campground_id = %id,
                orphaned = removed.reviews.len(),
                "campground deleted; its reviews are left unreferenced"
            );
        }

        tracing::info!(campground_id = %id, "campground deleted");
        Ok(removed)
    }

    // -- Reviews ------------------------------------------------------------

    /// Fetch a review by id.
    pub fn review(&self, id: ReviewId) -> Option<Review> {
        self.reviews.get(&id)
    }

    /// Number of stored reviews, referenced or not.
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// Create a review and attach it to a campground.
    pub async fn add_review(
        &self,
        campground_id: CampgroundId,
        fields: ReviewFields,
    ) -> Result<Review, StoreError> {
        // Fail before writing anything when the campground is already gone.
        if !self.campgrounds.contains(&campground_id) {
            return Err(StoreError::CampgroundNotFound(campground_id));
        }
        let review = Review::new(fields);

        if let Some(pool) = &self.pool {
            let mut tx = pool.begin().await?;
            db::reviews::insert(&mut *tx, &review).await?;
            if !db::campgrounds::append_review(&mut *tx, campground_id, review.id).await? {
                return Err(StoreError::CampgroundNotFound(campground_id));
            }
            tx.commit().await?;
        }

        self.reviews.insert(review.id, review.clone());
        let attached = self
            .campgrounds
            .update(&campground_id, |c| c.attach_review(review.id));

        if attached.is_none() {
            // The campground was deleted concurrently: undo the review insert.
            self.reviews.remove(&review.id);
            if let Some(pool) = &self.pool {
                if let Err(e) = db::reviews::delete(pool, review.id).await {
                    tracing::error!(
                        review_id = %review.id,
                        error = %e,
                        "failed to remove review written for a deleted campground"
                    );
                }
            }
            tracing::warn!(
                campground_id = %campground_id,
                review_id = %review.id,
                "campground vanished while attaching review; review discarded"
            );
            return Err(StoreError::CampgroundNotFound(campground_id));
        }

        tracing::info!(campground_id = %campground_id, review_id = %review.id, "review added");
        Ok(review)
    }

    /// Detach a review from its campground and delete it.
    pub async fn delete_review(
        &self,
        campground_id: CampgroundId,
        review_id: ReviewId,
    ) -> Result<(), StoreError> {
        let campground = self.campground(campground_id)?;
        if !campground.references(&review_id) {
            return Err(StoreError::ReviewNotFound {
                campground: campground_id,
                review: review_id,
            });
        }

        if let Some(pool) = &self.pool {
            let mut tx = pool.begin().await?;
            if !db::campgrounds::pull_review(&mut *tx, campground_id, review_id).await? {
                return Err(StoreError::CampgroundNotFound(campground_id));
            }
            db::reviews::delete(&mut *tx, review_id).await?;
            tx.commit().await?;
        }

        self.campgrounds.update(&campground_id, |c| {
            c.detach_review(&review_id);
        });
        if self.reviews.remove(&review_id).is_none() {
            tracing::warn!(
                campground_id = %campground_id,
                review_id = %review_id,
                "detached a reference to a review that no longer existed"
            );
        }

        tracing::info!(campground_id = %campground_id, review_id = %review_id, "review deleted");
        Ok(())
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::in_memory(RepositoryOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn camp_fields(title: &str, price: f64) -> CampgroundFields {
        CampgroundFields::from_payload(&json!({
            "campground": {"title": title, "description": "Nice view", "price": price}
        }))
        .unwrap()
    }

    fn review_fields(rating: u8, body: &str) -> ReviewFields {
        ReviewFields::from_payload(&json!({"review": {"rating": rating, "body": body}})).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let repo = Repository::default();
        let created = repo.create_campground(camp_fields("Hilltop", 20.0)).await.unwrap();

        let fetched = repo.campground(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Hilltop");
        assert_eq!(fetched.price, 20.0);
        assert_eq!(fetched.description.as_deref(), Some("Nice view"));
        assert!(fetched.reviews.is_empty());
    }

    #[tokio::test]
    async fn connect_without_url_is_in_memory() {
        let repo = Repository::connect(None, RepositoryOptions::default()).await.unwrap();
        assert!(!repo.is_persistent());
        assert!(repo.ping().await.is_ok());
        repo.close().await;
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = Repository::default();
        let first = repo.create_campground(camp_fields("First", 1.0)).await.unwrap();
        let second = repo.create_campground(camp_fields("Second", 2.0)).await.unwrap();

        let listed = repo.list_campgrounds();
        assert_eq!(listed.len(), 2);
        if first.created_at != second.created_at {
            assert_eq!(listed[0].id, second.id);
        }
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let repo = Repository::default();
        let err = repo.campground(CampgroundId::new()).unwrap_err();
        assert!(matches!(err, StoreError::CampgroundNotFound(_)));
    }

    #[tokio::test]
    async fn update_replaces_listed_fields_only() {
        let repo = Repository::default();
        let camp = repo.create_campground(camp_fields("Hilltop", 20.0)).await.unwrap();
        let patch = CampgroundPatch::from_payload(&json!({"campground": {"price": 25}})).unwrap();

        let updated = repo.update_campground(camp.id, &patch).await.unwrap();
        assert_eq!(updated.price, 25.0);
        assert_eq!(updated.title, "Hilltop");
        assert_eq!(repo.campground(camp.id).unwrap().price, 25.0);
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let repo = Repository::default();
        let patch = CampgroundPatch::from_payload(&json!({"campground": {"title": "X"}})).unwrap();
        let err = repo.update_campground(CampgroundId::new(), &patch).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.campground_count(), 0);
    }

    #[tokio::test]
    async fn delete_unknown_leaves_store_unchanged() {
        let repo = Repository::default();
        let camp = repo.create_campground(camp_fields("Keep", 5.0)).await.unwrap();

        let err = repo.delete_campground(CampgroundId::new()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.campground_count(), 1);
        assert_eq!(repo.campground(camp.id).unwrap(), camp);
    }

    #[tokio::test]
    async fn delete_removes_campground() {
        let repo = Repository::default();
        let camp = repo.create_campground(camp_fields("Gone", 5.0)).await.unwrap();
        let removed = repo.delete_campground(camp.id).await.unwrap();
        assert_eq!(removed.id, camp.id);
        assert!(repo.campground(camp.id).is_err());
        assert!(repo.delete_campground(camp.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn add_review_attaches_and_resolves() {
        let repo = Repository::default();
        let camp = repo.create_campground(camp_fields("Hilltop", 20.0)).await.unwrap();
        let review = repo.add_review(camp.id, review_fields(5, "Loved it")).await.unwrap();

        let detail = repo.campground_with_reviews(camp.id).unwrap();
        assert_eq!(detail.campground.reviews, vec![review.id]);
        assert_eq!(detail.reviews, vec![review.clone()]);
        assert_eq!(detail.reviews[0].body, "Loved it");
        assert_eq!(detail.reviews[0].rating, 5);
    }

    #[tokio::test]
    async fn add_review_to_unknown_campground_writes_nothing() {
        let repo = Repository::default();
        let err = repo
            .add_review(CampgroundId::new(), review_fields(3, "Where?"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.review_count(), 0);
    }

    #[tokio::test]
    async fn delete_review_detaches_and_removes() {
        let repo = Repository::default();
        let camp = repo.create_campground(camp_fields("Hilltop", 20.0)).await.unwrap();
        let keep = repo.add_review(camp.id, review_fields(4, "Keep")).await.unwrap();
        let drop = repo.add_review(camp.id, review_fields(1, "Drop")).await.unwrap();

        repo.delete_review(camp.id, drop.id).await.unwrap();

        let detail = repo.campground_with_reviews(camp.id).unwrap();
        assert_eq!(detail.campground.reviews, vec![keep.id]);
        assert!(repo.review(drop.id).is_none());
        assert!(repo.review(keep.id).is_some());
    }

    #[tokio::test]
    async fn delete_review_not_referenced_is_not_found() {
        let repo = Repository::default();
        let a = repo.create_campground(camp_fields("A", 1.0)).await.unwrap();
        let b = repo.create_campground(camp_fields("B", 1.0)).await.unwrap();
        let on_b = repo.add_review(b.id, review_fields(2, "On B")).await.unwrap();

        let err = repo.delete_review(a.id, on_b.id).await.unwrap_err();
        assert!(matches!(err, StoreError::ReviewNotFound { .. }));
        assert!(repo.review(on_b.id).is_some());
        assert_eq!(repo.campground(b.id).unwrap().reviews, vec![on_b.id]);
    }

    #[tokio::test]
    async fn dangling_reference_is_skipped_on_display() {
        let repo = Repository::default();
        let camp = repo.create_campground(camp_fields("A", 1.0)).await.unwrap();
        let review = repo.add_review(camp.id, review_fields(2, "x")).await.unwrap();
        repo.reviews.remove(&review.id);

        let detail = repo.campground_with_reviews(camp.id).unwrap();
        assert_eq!(detail.campground.reviews.len(), 1);
        assert!(detail.reviews.is_empty());
    }

    #[tokio::test]
    async fn delete_campground_orphans_reviews_by_default() {
        let repo = Repository::default();
        let camp = repo.create_campground(camp_fields("A", 1.0)).await.unwrap();
        let review = repo.add_review(camp.id, review_fields(2, "x")).await.unwrap();

        repo.delete_campground(camp.id).await.unwrap();
        assert!(repo.review(review.id).is_some());
    }

    #[tokio::test]
    async fn delete_campground_cascades_when_enabled() {
        let repo = Repository::in_memory(RepositoryOptions {
            cascade_review_delete: true,
        });
        let camp = repo.create_campground(camp_fields("A", 1.0)).await.unwrap();
        let review = repo.add_review(camp.id, review_fields(2, "x")).await.unwrap();

        repo.delete_campground(camp.id).await.unwrap();
        assert!(repo.review(review.id).is_none());
        assert_eq!(repo.review_count(), 0);
    }
}
