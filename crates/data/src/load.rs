use anyhow::{bail, Context};
use crickpacks_core::{PackCatalog, PackDef, Tier};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const PACKS_FILE: &str = "packs.json";

// Fractional weights (4.5, 0.5) make an exact-sum check too strict.
const ODDS_SUM_EPSILON: f64 = 1e-6;

pub fn load_pack_catalog(dir: &Path) -> anyhow::Result<PackCatalog> {
    let path = dir.join(PACKS_FILE);
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let packs: Vec<PackDef> =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    let catalog = PackCatalog { packs };
    validate_catalog(&catalog).with_context(|| format!("validate {}", path.display()))?;
    Ok(catalog)
}

/// Falls back to the built-in catalog when no packs file is present.
pub fn load_pack_catalog_or_builtin(dir: &Path) -> anyhow::Result<PackCatalog> {
    if !dir.join(PACKS_FILE).exists() {
        return Ok(PackCatalog::builtin());
    }
    load_pack_catalog(dir)
}

pub fn validate_catalog(catalog: &PackCatalog) -> anyhow::Result<()> {
    if catalog.packs.is_empty() {
        bail!("pack catalog is empty");
    }
    let mut seen = HashSet::new();
    for pack in &catalog.packs {
        if !seen.insert(pack.kind) {
            bail!("duplicate pack {:?}", pack.kind);
        }
        if pack.price <= 0 {
            bail!("pack {:?} has non-positive price {}", pack.kind, pack.price);
        }
        if pack.draws == 0 {
            bail!("pack {:?} draws no cards", pack.kind);
        }
        if pack.odds.len() != Tier::ALL.len() {
            bail!("pack {:?} must list odds for every tier", pack.kind);
        }
        for (entry, expected) in pack.odds.iter().zip(Tier::ALL) {
            if entry.tier != expected {
                bail!(
                    "pack {:?} odds out of tier order at {:?}",
                    pack.kind,
                    entry.tier
                );
            }
            if entry.weight < 0.0 {
                bail!(
                    "pack {:?} has a negative weight for {:?}",
                    pack.kind,
                    entry.tier
                );
            }
        }
        let total: f64 = pack.odds.iter().map(|entry| entry.weight).sum();
        if (total - 100.0).abs() > ODDS_SUM_EPSILON {
            bail!("pack {:?} odds sum to {}, expected 100", pack.kind, total);
        }
    }
    Ok(())
}
