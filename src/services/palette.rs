//! Colour tokens for calendar entities.
//!
//! Configured colours always win. Entities without one get a fallback from a
//! fixed rotation keyed by their position in the merged source list, so the
//! same configuration always produces the same colours.

use std::collections::BTreeMap;

const FALLBACK_COLORS: &[&str] = &[
    "#4285f4", "#db4437", "#f4b400", "#0f9d58", "#ab47bc", "#00acc1", "#ff7043", "#9e9d24",
];

#[derive(Debug, Clone, Default)]
pub struct EntityPalette {
    colors: BTreeMap<String, String>,
}

impl EntityPalette {
    /// Build the palette for `entities`, listed in merge order.
    pub fn new<'a>(
        entities: impl IntoIterator<Item = &'a str>,
        configured: &BTreeMap<String, String>,
    ) -> Self {
        let mut colors = BTreeMap::new();
        let mut fallback_index = 0;
        for entity_id in entities {
            if colors.contains_key(entity_id) {
                continue;
            }
            let color = match configured.get(entity_id) {
                Some(color) => color.clone(),
                None => {
                    let color = FALLBACK_COLORS[fallback_index % FALLBACK_COLORS.len()];
                    fallback_index += 1;
                    color.to_string()
                }
            };
            colors.insert(entity_id.to_string(), color);
        }
        Self { colors }
    }

    pub fn color_for(&self, entity_id: &str) -> Option<&str> {
        self.colors.get(entity_id).map(String::as_str)
    }
}
