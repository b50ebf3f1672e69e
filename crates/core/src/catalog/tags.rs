use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FurnitureType {
    #[serde(rename = "SILLA")]
    Silla,
    #[serde(rename = "MESA")]
    Mesa,
    #[serde(rename = "SOFÁ", alias = "SOFA")]
    Sofa,
    #[serde(rename = "ESTANTERÍA", alias = "ESTANTERIA")]
    Estanteria,
    #[serde(rename = "ESCRITORIO")]
    Escritorio,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Material {
    #[serde(rename = "MADERA_NOBLE")]
    MaderaNoble,
    #[serde(rename = "MADERA_MDF")]
    MaderaMdf,
    #[serde(rename = "METAL")]
    Metal,
    #[serde(rename = "VIDRIO")]
    Vidrio,
    #[serde(rename = "BAMBÚ", alias = "BAMBU")]
    Bambu,
    #[serde(rename = "MADERA_RECICLADA")]
    MaderaReciclada,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "NATURAL")]
    Natural,
    #[serde(rename = "BLANCO")]
    Blanco,
    #[serde(rename = "NEGRO")]
    Negro,
    #[serde(rename = "MADERA_OSCURA")]
    MaderaOscura,
    #[serde(rename = "GRIS")]
    Gris,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DimensionTier {
    #[serde(rename = "PEQUEÑO", alias = "PEQUENO")]
    Pequeno,
    #[serde(rename = "ESTÁNDAR", alias = "ESTANDAR")]
    Estandar,
    #[serde(rename = "GRANDE")]
    Grande,
}

/// Shared surface of the four closed tag categories.
///
/// `ALL` is the catalog order; `index` is the position of a variant in `ALL`
/// and doubles as the slot of its entry in the catalog tables.
pub trait CatalogTag: Copy + Eq + Ord + fmt::Debug + 'static {
    const ALL: &'static [Self];
    const CATEGORY: &'static str;

    fn index(self) -> usize;
    /// Canonical uppercase tag, e.g. `MADERA_NOBLE`.
    fn tag(self) -> &'static str;
    /// Human label used in summaries, e.g. `Madera Noble`.
    fn label(self) -> &'static str;

    fn from_tag(value: &str) -> Option<Self> {
        let wanted = fold_tag(value);
        Self::ALL.iter().copied().find(|candidate| fold_tag(candidate.tag()) == wanted)
    }
}

impl CatalogTag for FurnitureType {
    const ALL: &'static [Self] =
        &[Self::Silla, Self::Mesa, Self::Sofa, Self::Estanteria, Self::Escritorio];
    const CATEGORY: &'static str = "furniture";

    fn index(self) -> usize {
        self as usize
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Silla => "SILLA",
            Self::Mesa => "MESA",
            Self::Sofa => "SOFÁ",
            Self::Estanteria => "ESTANTERÍA",
            Self::Escritorio => "ESCRITORIO",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Silla => "Silla",
            Self::Mesa => "Mesa",
            Self::Sofa => "Sofá",
            Self::Estanteria => "Estantería",
            Self::Escritorio => "Escritorio",
        }
    }
}

impl CatalogTag for Material {
    const ALL: &'static [Self] = &[
        Self::MaderaNoble,
        Self::MaderaMdf,
        Self::Metal,
        Self::Vidrio,
        Self::Bambu,
        Self::MaderaReciclada,
    ];
    const CATEGORY: &'static str = "materials";

    fn index(self) -> usize {
        self as usize
    }

    fn tag(self) -> &'static str {
        match self {
            Self::MaderaNoble => "MADERA_NOBLE",
            Self::MaderaMdf => "MADERA_MDF",
            Self::Metal => "METAL",
            Self::Vidrio => "VIDRIO",
            Self::Bambu => "BAMBÚ",
            Self::MaderaReciclada => "MADERA_RECICLADA",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::MaderaNoble => "Madera Noble",
            Self::MaderaMdf => "Madera Mdf",
            Self::Metal => "Metal",
            Self::Vidrio => "Vidrio",
            Self::Bambu => "Bambú",
            Self::MaderaReciclada => "Madera Reciclada",
        }
    }
}

impl CatalogTag for Color {
    const ALL: &'static [Self] =
        &[Self::Natural, Self::Blanco, Self::Negro, Self::MaderaOscura, Self::Gris];
    const CATEGORY: &'static str = "colors";

    fn index(self) -> usize {
        self as usize
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Natural => "NATURAL",
            Self::Blanco => "BLANCO",
            Self::Negro => "NEGRO",
            Self::MaderaOscura => "MADERA_OSCURA",
            Self::Gris => "GRIS",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Natural => "Natural",
            Self::Blanco => "Blanco",
            Self::Negro => "Negro",
            Self::MaderaOscura => "Madera Oscura",
            Self::Gris => "Gris",
        }
    }
}

impl CatalogTag for DimensionTier {
    const ALL: &'static [Self] = &[Self::Pequeno, Self::Estandar, Self::Grande];
    const CATEGORY: &'static str = "dimensions";

    fn index(self) -> usize {
        self as usize
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Pequeno => "PEQUEÑO",
            Self::Estandar => "ESTÁNDAR",
            Self::Grande => "GRANDE",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pequeno => "Pequeño",
            Self::Estandar => "Estándar",
            Self::Grande => "Grande",
        }
    }
}

macro_rules! tag_traits {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.tag())
                }
            }

            impl FromStr for $ty {
                type Err = CatalogError;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    <$ty as CatalogTag>::from_tag(value).ok_or_else(|| CatalogError::UnknownTag {
                        category: <$ty as CatalogTag>::CATEGORY,
                        tag: value.trim().to_string(),
                    })
                }
            }
        )+
    };
}

tag_traits!(FurnitureType, Material, Color, DimensionTier);

/// Uppercases and strips Spanish accents so `bambu`, `BAMBÚ` and `Bambú` compare equal.
fn fold_tag(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|character| match character {
            'á' | 'Á' => 'A',
            'é' | 'É' => 'E',
            'í' | 'Í' => 'I',
            'ó' | 'Ó' => 'O',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'U',
            'ñ' | 'Ñ' => 'N',
            ' ' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}
