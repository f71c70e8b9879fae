use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::ranges::PLATFORM_SHARE_RANGES;
use crate::error::{SynthError, SynthResult};

/// Region id that stands for "every region" and never carries stats.
pub const ALL_REGIONS_ID: &str = "all";

const BUILTIN_CATALOG_YAML: &str = include_str!("../catalog/default.yaml");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub strategy: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub label: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Region {
    pub fn is_concrete(&self) -> bool {
        self.id != ALL_REGIONS_ID
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: String,
    pub label: String,
    /// Whether selecting this platform's tab boosts its share.
    #[serde(default = "default_boostable")]
    pub boostable: bool,
}

const fn default_boostable() -> bool {
    true
}

fn default_product_id() -> String {
    "cocacola".to_string()
}

/// On-disk shape of a reference catalog. Turned into a [`ReferenceCatalog`]
/// only after validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default = "default_product_id")]
    pub default_product: String,
    pub products: Vec<Product>,
    pub regions: Vec<Region>,
    pub platforms: Vec<Platform>,
}

/// Validated, immutable lookup tables consulted by the generator.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceCatalog {
    default_index: usize,
    products: Vec<Product>,
    regions: Vec<Region>,
    platforms: Vec<Platform>,
}

impl ReferenceCatalog {
    pub fn builtin() -> SynthResult<Self> {
        Self::from_yaml_str(BUILTIN_CATALOG_YAML)
    }

    pub fn from_yaml_str(yaml: &str) -> SynthResult<Self> {
        let document = serde_yaml::from_str::<CatalogDocument>(yaml)?;
        Self::try_from(document)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn default_product(&self) -> &Product {
        &self.products[self.default_index]
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    pub fn concrete_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|region| region.is_concrete())
    }

    pub fn platform_index(&self, id: &str) -> Option<usize> {
        self.platforms.iter().position(|platform| platform.id == id)
    }

    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            default_product: self.default_product().id.clone(),
            products: self.products.clone(),
            regions: self.regions.clone(),
            platforms: self.platforms.clone(),
        }
    }
}

impl TryFrom<CatalogDocument> for ReferenceCatalog {
    type Error = SynthError;

    fn try_from(document: CatalogDocument) -> SynthResult<Self> {
        validate_document(&document)?;
        let default_index = document
            .products
            .iter()
            .position(|product| product.id == document.default_product)
            .ok_or_else(|| {
                SynthError::InvalidCatalog(format!(
                    "default product '{}' is not listed in products",
                    document.default_product
                ))
            })?;
        debug!(
            products = document.products.len(),
            regions = document.regions.len(),
            platforms = document.platforms.len(),
            "validated reference catalog"
        );
        Ok(Self {
            default_index,
            products: document.products,
            regions: document.regions,
            platforms: document.platforms,
        })
    }
}

fn validate_document(document: &CatalogDocument) -> SynthResult<()> {
    if document.products.is_empty() {
        return Err(SynthError::InvalidCatalog(
            "catalog must list at least one product".to_string(),
        ));
    }
    reject_duplicate_ids("product", document.products.iter().map(|p| p.id.as_str()))?;
    reject_duplicate_ids("region", document.regions.iter().map(|r| r.id.as_str()))?;
    reject_duplicate_ids("platform", document.platforms.iter().map(|p| p.id.as_str()))?;

    for product in &document.products {
        if product.categories.is_empty() {
            return Err(SynthError::InvalidCatalog(format!(
                "product '{}' has no categories",
                product.id
            )));
        }
    }

    let mut concrete = 0usize;
    for region in document.regions.iter().filter(|region| region.is_concrete()) {
        if region.coordinates().is_none() {
            return Err(SynthError::InvalidCatalog(format!(
                "region '{}' is missing lat/lng",
                region.id
            )));
        }
        concrete += 1;
    }
    if concrete == 0 {
        return Err(SynthError::InvalidCatalog(
            "catalog must list at least one concrete region".to_string(),
        ));
    }

    let expected_platforms = PLATFORM_SHARE_RANGES.len() + 1;
    if document.platforms.len() != expected_platforms {
        return Err(SynthError::InvalidCatalog(format!(
            "catalog must list exactly {expected_platforms} platforms, found {}",
            document.platforms.len()
        )));
    }
    Ok(())
}

fn reject_duplicate_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> SynthResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(SynthError::InvalidCatalog(format!("{kind} id must not be empty")));
        }
        if !seen.insert(id) {
            return Err(SynthError::InvalidCatalog(format!("duplicate {kind} id '{id}'")));
        }
    }
    Ok(())
}

pub fn load_catalog(path: impl AsRef<Path>) -> SynthResult<ReferenceCatalog> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let catalog = ReferenceCatalog::from_yaml_str(&text).map_err(|error| match error {
        SynthError::Yaml(inner) => SynthError::InvalidCatalog(format!(
            "could not parse '{}': {inner}",
            path.display()
        )),
        other => other,
    })?;
    info!(path = %path.display(), products = catalog.products().len(), "loaded reference catalog");
    Ok(catalog)
}

/// Loads `path` when given, otherwise the catalog compiled into the crate.
pub fn resolve_catalog(path: Option<&Path>) -> SynthResult<ReferenceCatalog> {
    match path {
        Some(path) => load_catalog(path),
        None => ReferenceCatalog::builtin(),
    }
}
