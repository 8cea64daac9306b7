#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use kudos_store::api::AverageRatingCoordinator;
use kudos_store::events::{NotificationSink, RatingEvent};
use kudos_store::{
    AverageRating, EntityReference, EntityType, MemoryIndex, RatingsConfig, RatingsError,
    RatingsResult, RatingsStore, UserReference,
};

#[derive(Clone, Debug, PartialEq)]
pub enum AverageCall {
    Add {
        reference: String,
        vote: i64,
    },
    Remove {
        reference: String,
        vote: i64,
    },
    Update {
        reference: String,
        old_vote: i64,
        new_vote: i64,
    },
}

/// Average-rating coordinator double: records every call, optionally
/// failing them all to exercise the divergence path.
#[derive(Default)]
pub struct RecordingCoordinator {
    calls: Mutex<Vec<AverageCall>>,
    average: Mutex<Option<AverageRating>>,
    failing: Mutex<bool>,
}

impl RecordingCoordinator {
    pub fn calls(&self) -> Vec<AverageCall> {
        self.calls.lock().expect("calls mutex").clone()
    }

    pub fn set_average(&self, average: AverageRating) {
        *self.average.lock().expect("average mutex") = Some(average);
    }

    pub fn set_failing(&self) {
        *self.failing.lock().expect("failing mutex") = true;
    }

    fn record(&self, call: AverageCall) -> RatingsResult<()> {
        if *self.failing.lock().expect("failing mutex") {
            return Err(RatingsError::storage("aggregate store unavailable"));
        }
        self.calls.lock().expect("calls mutex").push(call);
        Ok(())
    }
}

#[async_trait]
impl AverageRatingCoordinator for RecordingCoordinator {
    async fn add_vote(&self, entity: &EntityReference, vote: i64) -> RatingsResult<()> {
        self.record(AverageCall::Add {
            reference: entity.reference.clone(),
            vote,
        })
    }

    async fn remove_vote(&self, entity: &EntityReference, vote: i64) -> RatingsResult<()> {
        self.record(AverageCall::Remove {
            reference: entity.reference.clone(),
            vote,
        })
    }

    async fn update_vote(
        &self,
        entity: &EntityReference,
        old_vote: i64,
        new_vote: i64,
    ) -> RatingsResult<()> {
        self.record(AverageCall::Update {
            reference: entity.reference.clone(),
            old_vote,
            new_vote,
        })
    }

    async fn get_average_rating(
        &self,
        entity: &EntityReference,
    ) -> RatingsResult<AverageRating> {
        self.average
            .lock()
            .expect("average mutex")
            .clone()
            .ok_or_else(|| {
                RatingsError::storage(format!("no average seeded for [{}]", entity.reference))
            })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, RatingEvent)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(String, RatingEvent)> {
        self.events.lock().expect("events mutex").clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, manager_id: &str, event: RatingEvent) {
        self.events
            .lock()
            .expect("events mutex")
            .push((manager_id.to_string(), event));
    }
}

pub struct Fixture {
    pub index: MemoryIndex,
    pub averages: Arc<RecordingCoordinator>,
    pub sink: Arc<RecordingSink>,
    pub store: RatingsStore,
}

pub fn fixture(manager_id: &str, config: RatingsConfig) -> Fixture {
    let index = MemoryIndex::new();
    let averages = Arc::new(RecordingCoordinator::default());
    let sink = Arc::new(RecordingSink::default());
    let store = RatingsStore::new(
        manager_id,
        config,
        Arc::new(index.clone()),
        averages.clone(),
        sink.clone(),
    );
    Fixture {
        index,
        averages,
        sink,
        store,
    }
}

pub fn page(reference: &str) -> EntityReference {
    EntityReference::new(EntityType::Page, reference)
}

pub fn user(reference: &str) -> UserReference {
    UserReference::new(reference)
}
