//! Phase 2: render one entity into the [`BuildStore`].

use pagegen_core::EntityId;
use pagegen_renderer::TemplateEngine;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::store::{AttributeStore, BuildStore};

/// Result of rendering one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A document was stored under `filename`.
    Rendered { filename: String },
    /// The entity has no attribute map; nothing was stored.
    NotLoaded { entity: EntityId },
}

/// Snapshot `entity`'s map, substitute it outside any lock, store the result.
///
/// An entity absent from `attributes` is a no-op, not an error.
pub fn render_entity(
    engine: &TemplateEngine,
    attributes: &AttributeStore,
    builds: &BuildStore,
    entity: &EntityId,
    extension: &str,
    cancel: &CancellationToken,
) -> Result<RenderOutcome, TaskError> {
    let Some(snapshot) = attributes.snapshot(entity) else {
        tracing::debug!(entity = %entity, "entity not loaded; nothing to render");
        return Ok(RenderOutcome::NotLoaded {
            entity: entity.clone(),
        });
    };

    let document = engine.render(&snapshot);

    if cancel.is_cancelled() {
        return Err(TaskError::Cancelled);
    }
    let filename = entity.output_filename(extension);
    builds.insert(filename.clone(), document);
    tracing::debug!(entity = %entity, filename = %filename, "entity rendered");
    Ok(RenderOutcome::Rendered { filename })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagegen_core::{AttributeMap, AttributeName, Template};

    fn setup() -> (TemplateEngine, AttributeStore, BuildStore) {
        (
            TemplateEngine::new(Template::from("<h1>{title}</h1>")),
            AttributeStore::new(),
            BuildStore::new(),
        )
    }

    #[test]
    fn renders_into_build_store_under_html_name() {
        let (engine, attributes, builds) = setup();
        let mut map = AttributeMap::new();
        map.insert(AttributeName::from("title"), "Hello".into());
        attributes.insert(EntityId::from("page1"), map);

        let outcome = render_entity(
            &engine,
            &attributes,
            &builds,
            &EntityId::from("page1"),
            "html",
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(
            outcome,
            RenderOutcome::Rendered {
                filename: "page1.html".into()
            }
        );
        assert_eq!(builds.snapshot("page1.html").as_deref(), Some("<h1>Hello</h1>"));
    }

    #[test]
    fn absent_entity_is_noop() {
        let (engine, attributes, builds) = setup();
        let outcome = render_entity(
            &engine,
            &attributes,
            &builds,
            &EntityId::from("ghost"),
            "html",
            &CancellationToken::new(),
        )
        .unwrap();
        assert!(matches!(outcome, RenderOutcome::NotLoaded { .. }));
        assert!(builds.is_empty());
    }

    #[test]
    fn empty_map_renders_unmodified_template() {
        let (engine, attributes, builds) = setup();
        attributes.insert(EntityId::from("bare"), AttributeMap::new());
        render_entity(
            &engine,
            &attributes,
            &builds,
            &EntityId::from("bare"),
            "html",
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(builds.snapshot("bare.html").as_deref(), Some("<h1>{title}</h1>"));
    }

    #[test]
    fn cancelled_render_does_not_insert() {
        let (engine, attributes, builds) = setup();
        attributes.insert(EntityId::from("p"), AttributeMap::new());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = render_entity(&engine, &attributes, &builds, &EntityId::from("p"), "html", &cancel)
            .unwrap_err();
        assert!(matches!(err, TaskError::Cancelled));
        assert!(builds.is_empty());
    }
}
