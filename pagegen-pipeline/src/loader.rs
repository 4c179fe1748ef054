//! Phase 1: load one entity's attributes into the [`AttributeStore`].

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use pagegen_core::{AttributeMap, AttributeName, ContentSource, EntityId};

use crate::error::TaskError;
use crate::store::AttributeStore;

/// An attribute that could not be loaded and was left out of its map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAttribute {
    pub entity: EntityId,
    pub attribute: AttributeName,
    pub reason: String,
}

/// What one loader task put into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub entity: EntityId,
    pub loaded: usize,
    pub skipped: Vec<SkippedAttribute>,
}

/// Query `source` for every name in order and collect a private map.
///
/// Lookups that fail are recorded and skipped. No store is touched here.
pub fn collect_attributes(
    source: &dyn ContentSource,
    entity: &EntityId,
    names: &[AttributeName],
) -> (AttributeMap, Vec<SkippedAttribute>) {
    let mut attributes = AttributeMap::with_capacity(names.len());
    let mut skipped = Vec::new();
    for name in names {
        match source.lookup(entity, name) {
            Ok(text) => {
                attributes.insert(name.clone(), text);
            }
            Err(err) => {
                tracing::warn!(entity = %entity, attribute = %name, error = %err, "attribute unavailable");
                skipped.push(SkippedAttribute {
                    entity: entity.clone(),
                    attribute: name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    (attributes, skipped)
}

/// Loader task: run the lookups on the blocking pool, then publish the
/// finished map with a single insert.
///
/// A task cancelled or timed out while its lookups are running never
/// reaches the insert.
pub async fn load_entity(
    source: Arc<dyn ContentSource>,
    names: Arc<[AttributeName]>,
    store: AttributeStore,
    cancel: CancellationToken,
    entity: EntityId,
) -> Result<LoadOutcome, TaskError> {
    let (entity, attributes, skipped) = tokio::task::spawn_blocking(move || {
        let (attributes, skipped) = collect_attributes(source.as_ref(), &entity, &names);
        (entity, attributes, skipped)
    })
    .await
    .map_err(|e| TaskError::Panicked(e.to_string()))?;

    if cancel.is_cancelled() {
        return Err(TaskError::Cancelled);
    }

    let loaded = attributes.len();
    if store.insert(entity.clone(), attributes) {
        tracing::debug!(entity = %entity, "duplicate entity id; replaced earlier map");
    }
    tracing::debug!(entity = %entity, loaded, skipped = skipped.len(), "entity loaded");

    Ok(LoadOutcome {
        entity,
        loaded,
        skipped,
    })
}
