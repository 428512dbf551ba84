//! In-memory implementation of every driven port.
//!
//! Mirrors the PostgreSQL adapters' observable behaviour: friendships are
//! directed rows, events list newest first, reactions are unique per
//! `(event, user)` and take a fresh identifier on every replacement, and
//! deleting an event cascades to its reactions.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::ports::{
    EventRepository, EventRepositoryError, FriendshipRepository, FriendshipRepositoryError,
    HealthMetricRepository, HealthMetricRepositoryError, ReactionRepository,
    ReactionRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Event, EventId, EventMetadata, EventType, EventWithOwner, Handle, HealthMetric, MetricSample,
    MetricType, NewEvent, NewHealthMetric, Reaction, ReactionId, ReactionLabel, TimeWindow,
    UserId, UserProfile,
};

#[derive(Debug, Clone)]
struct StoredReaction {
    id: ReactionId,
    event_id: EventId,
    user_id: UserId,
    content: ReactionLabel,
}

#[derive(Default)]
struct State {
    next_id: i64,
    users: BTreeMap<UserId, UserProfile>,
    friendships: Vec<(UserId, UserId)>,
    events: BTreeMap<EventId, Event>,
    reactions: Vec<StoredReaction>,
    metrics: Vec<HealthMetric>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn profile(&self, id: UserId) -> Option<UserProfile> {
        self.users.get(&id).cloned()
    }
}

/// Shared store backing all five repositories.
///
/// Identifiers for users, events, reactions and metrics come from one
/// sequence, so they never collide across tables.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register a user and return their profile.
    ///
    /// # Panics
    /// Panics when `name` or `handle` fail validation.
    pub fn add_user(&self, name: &str, handle: &str) -> UserProfile {
        let mut state = self.lock();
        let id = state.next_id();
        let profile = match UserProfile::try_from_parts(id, name, handle) {
            Ok(profile) => profile,
            Err(err) => panic!("invalid test user {handle}: {err}"),
        };
        state.users.insert(profile.id(), profile.clone());
        profile
    }

    /// Insert one directed friendship row.
    pub fn add_friendship(&self, user: UserId, friend: UserId) {
        let mut state = self.lock();
        if !state.friendships.contains(&(user, friend)) {
            state.friendships.push((user, friend));
        }
    }

    /// Insert friendship rows in both directions.
    pub fn befriend(&self, a: UserId, b: UserId) {
        self.add_friendship(a, b);
        self.add_friendship(b, a);
    }

    /// Store an event directly, bypassing the service layer.
    ///
    /// # Panics
    /// Panics when `event_type` is not a valid tag.
    pub fn seed_event(
        &self,
        owner: UserId,
        event_type: &str,
        occurred_at: DateTime<Utc>,
        metadata: &Value,
    ) -> Event {
        let event_type = match EventType::new(event_type) {
            Ok(event_type) => event_type,
            Err(err) => panic!("invalid test event type: {err}"),
        };
        let mut state = self.lock();
        store_event(
            &mut state,
            &NewEvent {
                owner_id: owner,
                event_type,
                occurred_at,
                metadata: EventMetadata::from_value(metadata),
            },
        )
    }

    /// Store an event whose metadata is not valid JSON.
    pub fn seed_corrupt_event(&self, owner: UserId, occurred_at: DateTime<Utc>) -> Event {
        let mut state = self.lock();
        store_event(
            &mut state,
            &NewEvent {
                owner_id: owner,
                event_type: EventType::workout(),
                occurred_at,
                metadata: EventMetadata::from_stored("{not json"),
            },
        )
    }

    /// Store a metric directly.
    ///
    /// # Panics
    /// Panics when `value` is negative or not finite.
    pub fn seed_metric(
        &self,
        user: UserId,
        metric_type: MetricType,
        value: f64,
        recorded_at: DateTime<Utc>,
    ) -> HealthMetric {
        let metric = match NewHealthMetric::new(user, metric_type, value, recorded_at) {
            Ok(metric) => metric,
            Err(err) => panic!("invalid test metric: {err}"),
        };
        store_metric(&mut self.lock(), &metric)
    }

    /// Reaction rows currently stored for `event`, as `(id, user, label)`.
    pub fn reactions_for(&self, event: EventId) -> Vec<(ReactionId, UserId, String)> {
        self.lock()
            .reactions
            .iter()
            .filter(|reaction| reaction.event_id == event)
            .map(|reaction| {
                (
                    reaction.id,
                    reaction.user_id,
                    reaction.content.as_ref().to_owned(),
                )
            })
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.lock().events.len()
    }
}

fn store_event(state: &mut State, event: &NewEvent) -> Event {
    let raw_id = state.next_id();
    let id = match EventId::new(raw_id) {
        Ok(id) => id,
        Err(err) => panic!("sequence produced invalid event id: {err}"),
    };
    let stored = Event {
        id,
        owner_id: event.owner_id,
        event_type: event.event_type.clone(),
        occurred_at: event.occurred_at,
        metadata: event.metadata.clone(),
    };
    state.events.insert(id, stored.clone());
    stored
}

fn store_metric(state: &mut State, metric: &NewHealthMetric) -> HealthMetric {
    let stored = HealthMetric {
        id: state.next_id(),
        user_id: metric.user_id(),
        metric_type: metric.metric_type(),
        value: metric.value(),
        recorded_at: metric.recorded_at(),
    };
    state.metrics.push(stored.clone());
    stored
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_handle(&self, handle: &Handle) -> Result<Option<UserProfile>, UserRepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|profile| profile.handle() == handle)
            .cloned())
    }
}

#[async_trait]
impl FriendshipRepository for InMemoryStore {
    async fn friend_ids(&self, owner: UserId) -> Result<Vec<UserId>, FriendshipRepositoryError> {
        Ok(self
            .lock()
            .friendships
            .iter()
            .filter(|(user, _)| *user == owner)
            .map(|(_, friend)| *friend)
            .collect())
    }

    async fn exists_between(&self, a: UserId, b: UserId) -> Result<bool, FriendshipRepositoryError> {
        Ok(self
            .lock()
            .friendships
            .iter()
            .any(|pair| *pair == (a, b) || *pair == (b, a)))
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        Ok(self.lock().events.get(&id).cloned())
    }

    async fn list_for_owners(
        &self,
        owners: &[UserId],
        window: TimeWindow,
    ) -> Result<Vec<EventWithOwner>, EventRepositoryError> {
        let state = self.lock();
        let mut rows = state
            .events
            .values()
            .filter(|event| owners.contains(&event.owner_id) && window.contains(event.occurred_at))
            .map(|event| {
                let owner = state
                    .profile(event.owner_id)
                    .ok_or_else(|| EventRepositoryError::query("event owner is missing"))?;
                Ok(EventWithOwner {
                    event: event.clone(),
                    owner,
                })
            })
            .collect::<Result<Vec<_>, EventRepositoryError>>()?;
        rows.sort_by(|a, b| {
            b.event
                .occurred_at
                .cmp(&a.event.occurred_at)
                .then(b.event.id.cmp(&a.event.id))
        });
        Ok(rows)
    }

    async fn count_by_owner(
        &self,
        owners: &[UserId],
        event_type: &EventType,
        window: TimeWindow,
    ) -> Result<Vec<(UserId, u64)>, EventRepositoryError> {
        let state = self.lock();
        let mut counts: BTreeMap<UserId, u64> = BTreeMap::new();
        for event in state.events.values().filter(|event| {
            owners.contains(&event.owner_id)
                && event.event_type == *event_type
                && window.contains(event.occurred_at)
        }) {
            *counts.entry(event.owner_id).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError> {
        let mut state = self.lock();
        if !state.users.contains_key(&event.owner_id) {
            return Err(EventRepositoryError::query("referenced row does not exist"));
        }
        Ok(store_event(&mut state, event))
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError> {
        let mut state = self.lock();
        let removed = state.events.remove(&id).is_some();
        if removed {
            state.reactions.retain(|reaction| reaction.event_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ReactionRepository for InMemoryStore {
    async fn list_with_reactors(&self) -> Result<Vec<Reaction>, ReactionRepositoryError> {
        let state = self.lock();
        let mut rows = state
            .reactions
            .iter()
            .map(|stored| {
                let reactor = state
                    .profile(stored.user_id)
                    .ok_or_else(|| ReactionRepositoryError::query("reactor is missing"))?;
                Ok(Reaction {
                    id: stored.id,
                    event_id: stored.event_id,
                    content: stored.content.clone(),
                    reactor,
                })
            })
            .collect::<Result<Vec<_>, ReactionRepositoryError>>()?;
        rows.sort_by_key(|reaction| reaction.id);
        Ok(rows)
    }

    async fn replace_for_user(
        &self,
        event_id: EventId,
        user_id: UserId,
        content: &ReactionLabel,
    ) -> Result<Reaction, ReactionRepositoryError> {
        let mut state = self.lock();
        if !state.events.contains_key(&event_id) {
            return Err(ReactionRepositoryError::query("referenced row does not exist"));
        }
        let reactor = state
            .profile(user_id)
            .ok_or_else(|| ReactionRepositoryError::query("referenced row does not exist"))?;
        let id = ReactionId::new(state.next_id());
        state
            .reactions
            .retain(|reaction| !(reaction.event_id == event_id && reaction.user_id == user_id));
        state.reactions.push(StoredReaction {
            id,
            event_id,
            user_id,
            content: content.clone(),
        });
        Ok(Reaction {
            id,
            event_id,
            content: content.clone(),
            reactor,
        })
    }
}

#[async_trait]
impl HealthMetricRepository for InMemoryStore {
    async fn max_value_by_user(
        &self,
        users: &[UserId],
        metric_type: MetricType,
        window: TimeWindow,
    ) -> Result<Vec<(UserId, f64)>, HealthMetricRepositoryError> {
        let state = self.lock();
        let mut maxima: HashMap<UserId, f64> = HashMap::new();
        for metric in state.metrics.iter().filter(|metric| {
            users.contains(&metric.user_id)
                && metric.metric_type == metric_type
                && window.contains(metric.recorded_at)
        }) {
            maxima
                .entry(metric.user_id)
                .and_modify(|max| *max = max.max(metric.value))
                .or_insert(metric.value);
        }
        Ok(maxima.into_iter().collect())
    }

    async fn samples_for_user(
        &self,
        user: UserId,
        metric_type: MetricType,
        window: TimeWindow,
    ) -> Result<Vec<MetricSample>, HealthMetricRepositoryError> {
        let state = self.lock();
        let mut samples: Vec<MetricSample> = state
            .metrics
            .iter()
            .filter(|metric| {
                metric.user_id == user
                    && metric.metric_type == metric_type
                    && window.contains(metric.recorded_at)
            })
            .map(|metric| MetricSample {
                recorded_at: metric.recorded_at,
                value: metric.value,
            })
            .collect();
        samples.sort_by_key(|sample| sample.recorded_at);
        Ok(samples)
    }

    async fn insert(&self, metric: &NewHealthMetric) -> Result<HealthMetric, HealthMetricRepositoryError> {
        let mut state = self.lock();
        if !state.users.contains_key(&metric.user_id()) {
            return Err(HealthMetricRepositoryError::query("referenced row does not exist"));
        }
        Ok(store_metric(&mut state, metric))
    }
}
