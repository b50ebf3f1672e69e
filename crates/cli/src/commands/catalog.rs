use std::collections::BTreeMap;
use std::path::PathBuf;

use designbot_core::catalog::{
    Catalog, CatalogTag, Color, DimensionEntry, DimensionTier, FurnitureEntry, FurnitureType,
    Material, SurchargeEntry,
};
use serde::Serialize;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Serialize)]
struct CatalogView<'a> {
    furniture: BTreeMap<&'static str, &'a FurnitureEntry>,
    materials: BTreeMap<&'static str, &'a SurchargeEntry>,
    colors: BTreeMap<&'static str, &'a SurchargeEntry>,
    dimensions: BTreeMap<&'static str, &'a DimensionEntry>,
}

impl<'a> CatalogView<'a> {
    fn new(catalog: &'a Catalog) -> Self {
        Self {
            furniture: FurnitureType::ALL
                .iter()
                .map(|kind| (kind.tag(), catalog.furniture(*kind)))
                .collect(),
            materials: Material::ALL
                .iter()
                .map(|material| (material.tag(), catalog.material(*material)))
                .collect(),
            colors: Color::ALL.iter().map(|color| (color.tag(), catalog.color(*color))).collect(),
            dimensions: DimensionTier::ALL
                .iter()
                .map(|tier| (tier.tag(), catalog.dimension(*tier)))
                .collect(),
        }
    }
}

pub fn run(config_path: Option<PathBuf>) -> CommandResult {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure("catalog", &error),
    };

    let catalog = match config.load_catalog() {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("catalog", "catalog", error.to_string(), 3)
        }
    };

    let source = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    CommandResult::success_with_data(
        "catalog",
        format!("catalog loaded from {source}"),
        Some(CatalogView::new(&catalog)),
    )
}
