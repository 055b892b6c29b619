// Normalisering av genprofil-payload fra leverandøren.
//
// Tre former forekommer for gen->genotype per kategori:
//   { "ACTN3": "RR", ... }
//   [ { "gene": "ACTN3", "genotype": "RR" }, ... ]
//   [ { "key": "ACTN3", "value": "RR" }, ... ]
// Alt samles til én sekvens GeneObservation før scoring.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_path_to_error as spte;

use crate::error::{MetricsError, MetricsResult};
use crate::genetics::catalog::{normalize_category, normalize_gene, normalize_genotype};
use crate::telemetry;
use crate::types::GeneObservation;

#[derive(Debug, Clone, Deserialize)]
struct GenePair {
    #[serde(alias = "Gene", alias = "symbol", alias = "gene_symbol")]
    gene: String,
    #[serde(alias = "Genotype", alias = "call", alias = "result")]
    genotype: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct KeyValue {
    #[serde(alias = "Key", alias = "name")]
    key: String,
    #[serde(alias = "Value")]
    value: Value,
}

// Prøv par først, så key/value, så objekt
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum GenotypePayload {
    Pairs(Vec<GenePair>),
    KeyValues(Vec<KeyValue>),
    Map(BTreeMap<String, Value>),
}

impl GenotypePayload {
    fn into_entries(self) -> Vec<(String, Value)> {
        match self {
            GenotypePayload::Pairs(v) => v.into_iter().map(|p| (p.gene, p.genotype)).collect(),
            GenotypePayload::KeyValues(v) => v.into_iter().map(|kv| (kv.key, kv.value)).collect(),
            GenotypePayload::Map(m) => m.into_iter().collect(),
        }
    }
}

/// Én kategorioppsummering slik leverandøren sender den.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(alias = "name", alias = "category_name")]
    pub category: String,
    /// Rå gen->genotype i én av de tre formene; tolkes av `normalize_profile`
    #[serde(default, alias = "genotypes", alias = "results")]
    pub genes: Value,
}

/// Genotype kan komme som streng eller som objekt med `genotype`/`value`.
fn genotype_str(v: &Value) -> Option<&str> {
    match v {
        Value::String(s) => Some(s.as_str()),
        Value::Object(m) => m
            .get("genotype")
            .or_else(|| m.get("value"))
            .and_then(Value::as_str),
        _ => None,
    }
}

/// Tolker én kategoris payload til (gen, genotype)-par, rå stavemåte.
pub fn parse_category_genes(genes: &Value) -> MetricsResult<Vec<(String, String)>> {
    if genes.is_null() {
        return Ok(Vec::new());
    }
    let payload: GenotypePayload = serde_json::from_value(genes.clone())
        .map_err(|e| MetricsError::Parse(format!("unrecognised genotype payload shape: {e}")))?;

    let mut out = Vec::new();
    for (gene, raw) in payload.into_entries() {
        match genotype_str(&raw) {
            Some(gt) => out.push((gene, gt.to_string())),
            None => {
                log::debug!("dropping {gene}: genotype is not a string ({raw})");
                telemetry::record_payload_parse_error();
            }
        }
    }
    Ok(out)
}

/// Samler alle kategorier til kanoniske observasjoner.
///
/// Én observasjon per (kategori, normalisert gen); første forekomst vinner.
/// Kategorier med ugyldig payload hoppes over (logges), resten beholdes.
pub fn normalize_profile(summaries: &[CategorySummary]) -> Vec<GeneObservation> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut out = Vec::new();

    for summary in summaries {
        let category = normalize_category(&summary.category);
        let pairs = match parse_category_genes(&summary.genes) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("skipping category {category:?}: {e}");
                telemetry::record_payload_parse_error();
                continue;
            }
        };
        for (raw_gene, raw_gt) in pairs {
            let gene = normalize_gene(&raw_gene);
            let genotype = normalize_genotype(&raw_gt);
            if gene.is_empty() || genotype.is_empty() {
                continue;
            }
            if seen.insert((category.clone(), gene.clone())) {
                out.push(GeneObservation { gene, genotype, category: category.clone() });
            }
        }
    }
    out
}

/// Tolker hele profil-JSON (liste av kategorioppsummeringer).
pub fn parse_profile_json(json_in: &str) -> MetricsResult<Vec<CategorySummary>> {
    let de = &mut serde_json::Deserializer::from_str(json_in);
    spte::deserialize(de).map_err(|e| MetricsError::InvalidPayload {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_genotype_object_is_accepted() {
        let pairs = parse_category_genes(&json!({"ACTN3": {"genotype": "RR"}})).unwrap();
        assert_eq!(pairs, vec![("ACTN3".to_string(), "RR".to_string())]);
    }

    #[test]
    fn numeric_genotype_is_dropped() {
        let pairs = parse_category_genes(&json!([{"gene": "ACE", "genotype": 3}])).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn scalar_payload_is_parse_error() {
        assert!(matches!(parse_category_genes(&json!(42)), Err(MetricsError::Parse(_))));
    }
}
