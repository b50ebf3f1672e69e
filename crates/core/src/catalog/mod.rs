//! Read-only furniture catalog.
//!
//! Four lookup tables keyed by the closed tag enums in [`tags`]. A catalog is
//! only ever built complete (every tag of every category has an entry), so
//! lookups by tag are infallible for the lifetime of the process.

pub mod pricing;
pub mod tags;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use tags::{CatalogTag, Color, DimensionTier, FurnitureType, Material};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureEntry {
    pub base_price: Decimal,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeEntry {
    pub extra_price: Decimal,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionEntry {
    pub factor: Decimal,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown {category} tag `{tag}`")]
    UnknownTag { category: &'static str, tag: String },
    #[error("catalog has no {category} entry for `{tag}`")]
    MissingEntry { category: &'static str, tag: &'static str },
    #[error("invalid {category} entry `{tag}`: {reason}")]
    InvalidValue { category: &'static str, tag: &'static str, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    furniture: Vec<FurnitureEntry>,
    materials: Vec<SurchargeEntry>,
    colors: Vec<SurchargeEntry>,
    dimensions: Vec<DimensionEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The built-in price table.
    pub fn standard() -> Self {
        let furniture = FurnitureType::ALL
            .iter()
            .map(|kind| {
                let (cents, description) = match kind {
                    FurnitureType::Silla => (15_000, "Silla ergonómica personalizada"),
                    FurnitureType::Mesa => (30_000, "Mesa de centro o comedor"),
                    FurnitureType::Sofa => (80_000, "Sofá de 3 plazas personalizado"),
                    FurnitureType::Estanteria => (25_000, "Estantería modular"),
                    FurnitureType::Escritorio => (40_000, "Escritorio de trabajo"),
                };
                FurnitureEntry {
                    base_price: Decimal::new(cents, 2),
                    description: description.to_string(),
                }
            })
            .collect();

        let materials = Material::ALL
            .iter()
            .map(|material| {
                let (cents, description) = match material {
                    Material::MaderaNoble => (20_000, "Roble o nogal macizo"),
                    Material::MaderaMdf => (5_000, "MDF lacado"),
                    Material::Metal => (10_000, "Acero inoxidable"),
                    Material::Vidrio => (12_000, "Vidrio templado"),
                    Material::Bambu => (8_000, "Bambú sostenible"),
                    Material::MaderaReciclada => (9_000, "Madera reciclada tratada"),
                };
                SurchargeEntry {
                    extra_price: Decimal::new(cents, 2),
                    description: description.to_string(),
                }
            })
            .collect();

        let colors = Color::ALL
            .iter()
            .map(|color| {
                let (cents, description) = match color {
                    Color::Natural => (0, "Acabado natural"),
                    Color::Blanco => (3_000, "Acabado blanco mate"),
                    Color::Negro => (4_000, "Acabado negro brillante"),
                    Color::MaderaOscura => (6_000, "Tono caoba o wengué"),
                    Color::Gris => (3_500, "Gris moderno"),
                };
                SurchargeEntry {
                    extra_price: Decimal::new(cents, 2),
                    description: description.to_string(),
                }
            })
            .collect();

        let dimensions = DimensionTier::ALL
            .iter()
            .map(|tier| {
                let (tenths, description) = match tier {
                    DimensionTier::Pequeno => (8, "Dimensiones reducidas"),
                    DimensionTier::Estandar => (10, "Dimensiones estándar"),
                    DimensionTier::Grande => (13, "Dimensiones ampliadas"),
                };
                DimensionEntry {
                    factor: Decimal::new(tenths, 1),
                    description: description.to_string(),
                }
            })
            .collect();

        Self { furniture, materials, colors, dimensions }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file = toml::from_str::<CatalogFile>(raw)?;

        let furniture = complete_table::<FurnitureType, _>(file.furniture)?;
        let materials = complete_table::<Material, _>(file.materials)?;
        let colors = complete_table::<Color, _>(file.colors)?;
        let dimensions = complete_table::<DimensionTier, _>(file.dimensions)?;

        for (kind, entry) in FurnitureType::ALL.iter().zip(&furniture) {
            ensure_non_negative(*kind, entry.base_price)?;
        }
        for (material, entry) in Material::ALL.iter().zip(&materials) {
            ensure_non_negative(*material, entry.extra_price)?;
        }
        for (color, entry) in Color::ALL.iter().zip(&colors) {
            ensure_non_negative(*color, entry.extra_price)?;
        }
        for (tier, entry) in DimensionTier::ALL.iter().zip(&dimensions) {
            if entry.factor <= Decimal::ZERO {
                return Err(CatalogError::InvalidValue {
                    category: DimensionTier::CATEGORY,
                    tag: tier.tag(),
                    reason: "factor must be greater than zero".to_string(),
                });
            }
        }

        Ok(Self { furniture, materials, colors, dimensions })
    }

    pub fn furniture(&self, kind: FurnitureType) -> &FurnitureEntry {
        &self.furniture[kind.index()]
    }

    pub fn material(&self, material: Material) -> &SurchargeEntry {
        &self.materials[material.index()]
    }

    pub fn color(&self, color: Color) -> &SurchargeEntry {
        &self.colors[color.index()]
    }

    pub fn dimension(&self, tier: DimensionTier) -> &DimensionEntry {
        &self.dimensions[tier.index()]
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    furniture: BTreeMap<String, FurnitureEntry>,
    #[serde(default)]
    materials: BTreeMap<String, SurchargeEntry>,
    #[serde(default)]
    colors: BTreeMap<String, SurchargeEntry>,
    #[serde(default)]
    dimensions: BTreeMap<String, DimensionEntry>,
}

fn complete_table<K, V>(raw: BTreeMap<String, V>) -> Result<Vec<V>, CatalogError>
where
    K: CatalogTag + FromStr<Err = CatalogError>,
{
    let mut keyed = BTreeMap::new();
    for (key, value) in raw {
        keyed.insert(key.parse::<K>()?, value);
    }

    K::ALL
        .iter()
        .map(|tag| {
            keyed
                .remove(tag)
                .ok_or(CatalogError::MissingEntry { category: K::CATEGORY, tag: tag.tag() })
        })
        .collect()
}

fn ensure_non_negative<K: CatalogTag>(tag: K, amount: Decimal) -> Result<(), CatalogError> {
    if amount.is_sign_negative() {
        return Err(CatalogError::InvalidValue {
            category: K::CATEGORY,
            tag: tag.tag(),
            reason: "price must not be negative".to_string(),
        });
    }
    Ok(())
}
