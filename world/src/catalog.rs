use std::{collections::HashMap, sync::Arc};

use cucumber_world_core::{TileDefinition, TileTag};
use serde::Deserialize;

use crate::DocumentError;

/// Where the definitions of a catalog came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatalogOrigin {
    /// Definitions were read from a tile catalog document.
    Document,
    /// Definitions are the built-in minimal set.
    Fallback,
}

/// Flattened lookup table from tile tags to their shared definitions.
#[derive(Clone, Debug)]
pub struct TileCatalog {
    definitions: HashMap<TileTag, Arc<TileDefinition>>,
    origin: CatalogOrigin,
}

impl TileCatalog {
    /// Builds a catalog from explicit definitions.
    ///
    /// When a tag repeats, the first definition is kept.
    #[must_use]
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (TileTag, TileDefinition)>,
    {
        let mut table = HashMap::new();
        for (tag, definition) in definitions {
            let _ = table.entry(tag).or_insert_with(|| Arc::new(definition));
        }
        Self {
            definitions: table,
            origin: CatalogOrigin::Document,
        }
    }

    /// Parses a tile catalog document.
    ///
    /// The document nests definitions under `tile_types`, grouped by
    /// category. Categories are flattened in document order, so a tag that
    /// appears in two categories resolves to its first occurrence.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let document: CatalogDocument =
            serde_json::from_str(text).map_err(DocumentError::Catalog)?;
        let definitions = document
            .into_categories()?
            .into_iter()
            .flat_map(|(_, tiles)| tiles)
            .map(|(tag, definition)| (TileTag::new(tag), definition));
        Ok(Self::from_definitions(definitions))
    }

    /// Parses a tile catalog document, degrading to [`TileCatalog::fallback`]
    /// when the document is malformed.
    #[must_use]
    pub fn from_json_or_fallback(text: &str) -> Self {
        match Self::from_json(text) {
            Ok(catalog) => {
                tracing::info!(tiles = catalog.len(), "tile catalog loaded");
                catalog
            }
            Err(error) => {
                tracing::warn!(%error, "tile catalog unusable, using fallback definitions");
                Self::fallback()
            }
        }
    }

    /// Minimal built-in catalog that keeps every level playable.
    #[must_use]
    pub fn fallback() -> Self {
        let definitions = [
            (
                "grass",
                TileDefinition {
                    emoji: Some("🌱".to_owned()),
                    encounter_rate: Some(0.1),
                    ..TileDefinition::default()
                },
            ),
            (
                "path",
                TileDefinition {
                    emoji: Some("⬜".to_owned()),
                    encounter_rate: Some(0.02),
                    ..TileDefinition::default()
                },
            ),
            (
                "tree",
                TileDefinition {
                    emoji: Some("🌳".to_owned()),
                    walkable: false,
                    blocks_movement: true,
                    ..TileDefinition::default()
                },
            ),
            (
                "bush",
                TileDefinition {
                    emoji: Some("🫐".to_owned()),
                    walkable: false,
                    interactive: true,
                    ..TileDefinition::default()
                },
            ),
        ];

        let mut catalog = Self::from_definitions(
            definitions
                .into_iter()
                .map(|(tag, definition)| (TileTag::new(tag), definition)),
        );
        catalog.origin = CatalogOrigin::Fallback;
        catalog
    }

    /// Resolves the definition registered for the provided tag.
    #[must_use]
    pub fn lookup(&self, tag: &TileTag) -> Option<&Arc<TileDefinition>> {
        self.definitions.get(tag)
    }

    /// Where the definitions came from.
    #[must_use]
    pub const fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    /// Reports whether the built-in fallback definitions are active.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.origin == CatalogOrigin::Fallback
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Reports whether the catalog holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}

type CategoryDefinitions = (String, Vec<(String, TileDefinition)>);

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    tile_types: serde_json::Map<String, serde_json::Value>,
}

impl CatalogDocument {
    fn into_categories(self) -> Result<Vec<CategoryDefinitions>, DocumentError> {
        self.tile_types
            .into_iter()
            .map(|(category, tiles)| {
                let tiles: serde_json::Map<String, serde_json::Value> =
                    serde_json::from_value(tiles).map_err(DocumentError::Catalog)?;
                let definitions = tiles
                    .into_iter()
                    .map(|(tag, value)| {
                        serde_json::from_value(value)
                            .map(|definition| (tag, definition))
                            .map_err(DocumentError::Catalog)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((category, definitions))
            })
            .collect()
    }
}
