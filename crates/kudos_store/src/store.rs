//! The rating store orchestrator: compiles criteria, talks to the index
//! partition, decodes results and keeps the average aggregate and event
//! sink in lock-step with every rating lifecycle transition.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use kudos_core::{
    AverageRating, AverageRatingCoordinator, EntityReference, IndexClient, IndexProvider,
    IndexQuery, NotificationSink, Rating, RatingCriterion, RatingEvent, RatingQuery,
    RatingQueryField, RatingsApi, RatingsError, RatingsResult, SortClause, SortOrder, Timestamp,
    UserReference,
};

use crate::codec::RatingDocumentCodec;
use crate::config::RatingsConfig;
use crate::filter::compile_filter;

/// Partition shared by every manager without a dedicated one; those
/// managers get an implicit managerId filter clause on every query.
pub const SHARED_RATINGS_PARTITION: &str = "ratings";

pub struct RatingsStore {
    manager_id: String,
    config: RatingsConfig,
    index: Arc<dyn IndexProvider>,
    averages: Arc<dyn AverageRatingCoordinator>,
    notifier: Arc<dyn NotificationSink>,
    codec: RatingDocumentCodec,
}

impl RatingsStore {
    /// Store with the passthrough reference resolvers. The coordinator and
    /// sink are injected once here; the store never looks them up again.
    pub fn new(
        manager_id: impl Into<String>,
        config: RatingsConfig,
        index: Arc<dyn IndexProvider>,
        averages: Arc<dyn AverageRatingCoordinator>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self::with_codec(
            manager_id,
            config,
            index,
            averages,
            notifier,
            RatingDocumentCodec::with_defaults(),
        )
    }

    pub fn with_codec(
        manager_id: impl Into<String>,
        config: RatingsConfig,
        index: Arc<dyn IndexProvider>,
        averages: Arc<dyn AverageRatingCoordinator>,
        notifier: Arc<dyn NotificationSink>,
        codec: RatingDocumentCodec,
    ) -> Self {
        Self {
            manager_id: manager_id.into(),
            config,
            index,
            averages,
            notifier,
            codec,
        }
    }

    pub fn manager_id(&self) -> &str {
        &self.manager_id
    }

    pub fn config(&self) -> &RatingsConfig {
        &self.config
    }

    fn partition(&self) -> &str {
        if self.config.dedicated_partition {
            &self.manager_id
        } else {
            SHARED_RATINGS_PARTITION
        }
    }

    fn compile(&self, query: &RatingQuery) -> String {
        let mut criteria = query.criteria().to_vec();
        if !self.config.dedicated_partition {
            criteria.push(RatingCriterion::ManagerId(self.manager_id.clone()));
        }
        compile_filter(&criteria, self.codec.entities(), self.codec.users())
    }

    async fn client(&self) -> RatingsResult<Arc<dyn IndexClient>> {
        self.index.client(self.partition()).await
    }

    /// Deterministic single-row lookup: created-date ascending, first hit.
    async fn find_single(&self, query: &RatingQuery) -> RatingsResult<Option<Rating>> {
        let request = IndexQuery {
            filter: self.compile(query),
            offset: 0,
            rows: 1,
            sort: Some(SortClause {
                field: RatingQueryField::CreatedDate,
                order: SortOrder::Ascending,
            }),
        };
        let hits = self.client().await?.query(&request).await?;
        hits.documents
            .first()
            .map(|document| self.codec.decode_rating(document))
            .transpose()
    }

    async fn persist(&self, rating: &Rating) -> RatingsResult<()> {
        let client = self.client().await?;
        client.add(self.codec.encode_rating(rating)).await?;
        client.commit().await
    }

    /// Delete, commit, notify, then update the aggregate. Callers only
    /// reach this with a rating that was just decoded from the store.
    async fn delete_rating(&self, rating: &Rating) -> RatingsResult<()> {
        let client = self.client().await?;
        client.delete_by_id(rating.id()).await?;
        client.commit().await?;
        self.notifier
            .notify(&self.manager_id, RatingEvent::Deleted(rating.clone()))
            .await;
        if self.config.store_average {
            self.averages
                .remove_vote(rating.entity(), rating.vote())
                .await
                .map_err(|err| self.stale_average(rating.entity(), err))?;
        }
        Ok(())
    }

    /// The delete or commit already took effect, so the aggregate no longer
    /// matches the stored ratings. There is no two-phase commit across the
    /// two stores; surface the divergence loudly before propagating.
    fn stale_average(&self, entity: &EntityReference, err: RatingsError) -> RatingsError {
        log::error!(
            "average rating for [{}] in manager [{}] is stale: the rating change committed \
             but the aggregate update failed: {err}",
            entity.reference,
            self.manager_id,
        );
        err
    }
}

#[async_trait]
impl RatingsApi for RatingsStore {
    async fn count_ratings(&self, query: &RatingQuery) -> RatingsResult<u64> {
        let request = IndexQuery {
            filter: self.compile(query),
            offset: 0,
            rows: 0,
            sort: None,
        };
        let hits = self.client().await?.query(&request).await?;
        Ok(hits.total)
    }

    async fn get_ratings(
        &self,
        query: &RatingQuery,
        offset: u64,
        limit: i64,
        sort_field: RatingQueryField,
        order: SortOrder,
    ) -> RatingsResult<Vec<Rating>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        let request = IndexQuery {
            filter: self.compile(query),
            offset,
            rows: limit as u64,
            sort: Some(SortClause {
                field: sort_field,
                order,
            }),
        };
        let hits = self.client().await?.query(&request).await?;
        hits.documents
            .iter()
            .map(|document| self.codec.decode_rating(document))
            .collect()
    }

    async fn get_rating(&self, id: &str) -> RatingsResult<Option<Rating>> {
        self.find_single(&RatingQuery::new().rating_id(id)).await
    }

    async fn get_average_rating(
        &self,
        entity: &EntityReference,
    ) -> RatingsResult<AverageRating> {
        self.averages.get_average_rating(entity).await
    }

    async fn save_rating(
        &self,
        entity: &EntityReference,
        author: &UserReference,
        vote: i64,
    ) -> RatingsResult<Option<Rating>> {
        if vote < 0 || vote > self.config.scale {
            return Err(RatingsError::out_of_scale(
                vote,
                self.config.scale,
                &self.manager_id,
            ));
        }

        let lookup = RatingQuery::new()
            .entity(entity.clone())
            .entity_type(entity.entity_type)
            .author(author.clone());
        match self.find_single(&lookup).await? {
            None => {
                if vote == 0 && !self.config.store_zero {
                    return Ok(None);
                }
                let now = Timestamp::now();
                let rating = Rating::builder()
                    .id(Uuid::new_v4().to_string())
                    .manager_id(self.manager_id.clone())
                    .entity(entity.clone())
                    .author(author.clone())
                    .vote(vote)
                    .scale(self.config.scale)
                    .created_at(now)
                    .updated_at(now)
                    .build()?;
                self.persist(&rating).await?;
                self.notifier
                    .notify(&self.manager_id, RatingEvent::Created(rating.clone()))
                    .await;
                if self.config.store_average {
                    self.averages
                        .add_vote(entity, vote)
                        .await
                        .map_err(|err| self.stale_average(entity, err))?;
                }
                Ok(Some(rating))
            }
            Some(previous) if vote == 0 && !self.config.store_zero => {
                // The save turns into a deletion. Re-confirm the document
                // through its own identifier before deleting, in case it
                // was mutated since the lookup.
                if let Some(confirmed) = self
                    .find_single(&RatingQuery::new().rating_id(previous.id()))
                    .await?
                {
                    self.delete_rating(&confirmed).await?;
                }
                Ok(None)
            }
            Some(previous) => {
                let previous_vote = previous.vote();
                let updated = previous.with_vote(vote).with_updated_at(Timestamp::now());
                self.persist(&updated).await?;
                self.notifier
                    .notify(
                        &self.manager_id,
                        RatingEvent::Updated {
                            rating: updated.clone(),
                            previous_vote,
                        },
                    )
                    .await;
                if self.config.store_average {
                    self.averages
                        .update_vote(entity, previous_vote, vote)
                        .await
                        .map_err(|err| self.stale_average(entity, err))?;
                }
                Ok(Some(updated))
            }
        }
    }

    async fn remove_rating(&self, id: &str) -> RatingsResult<bool> {
        match self.find_single(&RatingQuery::new().rating_id(id)).await? {
            None => Ok(false),
            Some(existing) => {
                self.delete_rating(&existing).await?;
                Ok(true)
            }
        }
    }
}
