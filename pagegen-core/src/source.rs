//! Content sources: the collaborator that supplies a build's raw inputs.
//!
//! A [`ContentSource`] hands the pipeline four things: the ordered entity
//! IDs, the ordered attribute names, the template, and a per-(entity,
//! attribute) text lookup. [`DirectorySource`] reads the on-disk layout;
//! [`MemorySource`] holds everything in memory.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::error::{InputError, LookupError};
use crate::inputs::{read_list_at, read_template_at};
use crate::types::{AttributeName, EntityId, Template};

/// Supplies entity IDs, attribute names, the template and attribute content.
///
/// `lookup` is called concurrently from many workers and may block on I/O.
pub trait ContentSource: Send + Sync {
    fn entity_ids(&self) -> Result<Vec<EntityId>, InputError>;

    fn attribute_names(&self) -> Result<Vec<AttributeName>, InputError>;

    fn template(&self) -> Result<Template, InputError>;

    fn lookup(&self, entity: &EntityId, attribute: &AttributeName) -> Result<String, LookupError>;
}

// ---------------------------------------------------------------------------
// DirectorySource
// ---------------------------------------------------------------------------

/// Reads inputs from plain files.
///
/// Attribute content for `(entity, attribute)` lives at
/// `<content_dir>/<entity>-<attribute>.<extension>` and is returned verbatim.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    ids_file: PathBuf,
    props_file: PathBuf,
    template_file: PathBuf,
    content_dir: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn from_config(config: &BuildConfig) -> Self {
        DirectorySource {
            ids_file: config.ids_file.clone(),
            props_file: config.props_file.clone(),
            template_file: config.template_file.clone(),
            content_dir: config.content_dir.clone(),
            extension: config.content_extension.clone(),
        }
    }

    /// Source with the default file names, all rooted at `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let defaults = BuildConfig::default();
        DirectorySource {
            ids_file: dir.join(defaults.ids_file),
            props_file: dir.join(defaults.props_file),
            template_file: dir.join(defaults.template_file),
            content_dir: dir.to_path_buf(),
            extension: defaults.content_extension,
        }
    }

    /// `<content_dir>/<entity>-<attribute>.<extension>` (no extension when
    /// the configured one is empty).
    pub fn content_path(&self, entity: &EntityId, attribute: &AttributeName) -> PathBuf {
        let stem = format!("{entity}-{attribute}");
        let file = if self.extension.is_empty() {
            stem
        } else {
            format!("{stem}.{}", self.extension)
        };
        self.content_dir.join(file)
    }
}

impl ContentSource for DirectorySource {
    fn entity_ids(&self) -> Result<Vec<EntityId>, InputError> {
        read_list_at(&self.ids_file)
    }

    fn attribute_names(&self) -> Result<Vec<AttributeName>, InputError> {
        read_list_at(&self.props_file)
    }

    fn template(&self) -> Result<Template, InputError> {
        read_template_at(&self.template_file)
    }

    fn lookup(&self, entity: &EntityId, attribute: &AttributeName) -> Result<String, LookupError> {
        let path = self.content_path(entity, attribute);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(LookupError::NotFound {
                entity: entity.clone(),
                attribute: attribute.clone(),
            }),
            Err(source) => Err(LookupError::Unreadable { path, source }),
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

/// In-memory source, built up with the `with_*` methods.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    ids: Vec<EntityId>,
    props: Vec<AttributeName>,
    template: Option<Template>,
    content: HashMap<(EntityId, AttributeName), String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AttributeName>,
    {
        self.props = props.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_template(mut self, template: impl Into<Template>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_content(
        mut self,
        entity: impl Into<EntityId>,
        attribute: impl Into<AttributeName>,
        text: impl Into<String>,
    ) -> Self {
        self.content
            .insert((entity.into(), attribute.into()), text.into());
        self
    }
}

impl ContentSource for MemorySource {
    fn entity_ids(&self) -> Result<Vec<EntityId>, InputError> {
        Ok(self.ids.clone())
    }

    fn attribute_names(&self) -> Result<Vec<AttributeName>, InputError> {
        Ok(self.props.clone())
    }

    fn template(&self) -> Result<Template, InputError> {
        self.template.clone().ok_or(InputError::Missing("template"))
    }

    fn lookup(&self, entity: &EntityId, attribute: &AttributeName) -> Result<String, LookupError> {
        self.content
            .get(&(entity.clone(), attribute.clone()))
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                entity: entity.clone(),
                attribute: attribute.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn content_path_joins_entity_and_attribute() {
        let source = DirectorySource::in_dir(Path::new("/data"));
        let path = source.content_path(&EntityId::from("page1"), &AttributeName::from("title"));
        assert_eq!(path, PathBuf::from("/data/page1-title.txt"));
    }

    #[test]
    fn content_path_without_extension() {
        let config = BuildConfig {
            content_dir: PathBuf::from("/data"),
            content_extension: String::new(),
            ..BuildConfig::default()
        };
        let source = DirectorySource::from_config(&config);
        let path = source.content_path(&EntityId::from("page1"), &AttributeName::from("title"));
        assert_eq!(path, PathBuf::from("/data/page1-title"));
    }

    #[test]
    fn directory_lookup_reads_verbatim_and_reports_missing() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("page1-title.txt"), "Hello\n<b>&</b>").unwrap();
        let source = DirectorySource::in_dir(tmp.path());

        let text = source
            .lookup(&EntityId::from("page1"), &AttributeName::from("title"))
            .expect("present");
        assert_eq!(text, "Hello\n<b>&</b>");

        let err = source
            .lookup(&EntityId::from("page1"), &AttributeName::from("body"))
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound { .. }));
    }

    #[test]
    fn directory_lookup_on_directory_is_unreadable() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("page1-title.txt")).unwrap();
        let source = DirectorySource::in_dir(tmp.path());
        let err = source
            .lookup(&EntityId::from("page1"), &AttributeName::from("title"))
            .unwrap_err();
        assert!(matches!(err, LookupError::Unreadable { .. }));
    }

    #[test]
    fn directory_lists_and_template() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("ids.txt"), "page1\npage2\n").unwrap();
        std::fs::write(tmp.path().join("props.txt"), "title\n").unwrap();
        std::fs::write(tmp.path().join("template.txt"), "<h1>{title}</h1>").unwrap();
        let source = DirectorySource::in_dir(tmp.path());

        assert_eq!(source.entity_ids().unwrap().len(), 2);
        assert_eq!(source.attribute_names().unwrap(), vec![AttributeName::from("title")]);
        assert_eq!(source.template().unwrap().as_str(), "<h1>{title}</h1>");
    }

    #[test]
    fn memory_source_without_template_is_missing() {
        let source = MemorySource::new().with_ids(["a"]);
        assert!(matches!(source.template(), Err(InputError::Missing("template"))));
    }

    #[test]
    fn memory_source_lookup() {
        let source = MemorySource::new()
            .with_ids(["page1"])
            .with_props(["title"])
            .with_content("page1", "title", "Hello");
        let id = EntityId::from("page1");
        assert_eq!(source.lookup(&id, &AttributeName::from("title")).unwrap(), "Hello");
        assert!(source.lookup(&id, &AttributeName::from("body")).is_err());
    }
}
