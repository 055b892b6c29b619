use std::collections::HashSet;

use crate::genetics::catalog::{normalize_category, normalize_gene, normalize_genotype, GeneCatalog};
use crate::telemetry;
use crate::types::{CategoryScore, GeneObservation, Impact, ImpactResolution, TraitDefinition, TraitScore};

/// Nøytral prior når ingen relevante gener finnes.
pub const NEUTRAL_SCORE: u8 = 50;

const NOT_AVAILABLE: &str = "Analysis not available";

/// Løser påvirkning for ett (gen, genotype)-par mot en katalog.
pub struct GeneticTraitScorer<'a> {
    catalog: &'a GeneCatalog,
}

impl Default for GeneticTraitScorer<'static> {
    fn default() -> Self {
        Self::new(GeneCatalog::builtin())
    }
}

impl<'a> GeneticTraitScorer<'a> {
    pub fn new(catalog: &'a GeneCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &GeneCatalog {
        self.catalog
    }

    /// Hjemkategorien først, deretter alle kategorier, ellers `Unknown`.
    pub fn resolve_impact(&self, category: &str, gene: &str, genotype: &str) -> ImpactResolution {
        let gene = normalize_gene(gene);
        let genotype = normalize_genotype(genotype);

        let home = self.catalog.category(category);
        let hit = home
            .and_then(|c| c.lookup(&gene, &genotype).map(|e| (c, e)))
            .or_else(|| {
                self.catalog
                    .categories()
                    .iter()
                    .find_map(|c| c.lookup(&gene, &genotype).map(|e| (c, e)))
            });

        match hit {
            Some((cat, entry)) => ImpactResolution {
                impact: entry.impact,
                description: entry.description.clone(),
                matched_category: Some(cat.name.clone()),
            },
            None => {
                log::debug!("no impact entry for {gene} {genotype} (home {category:?})");
                telemetry::record_unknown_impact();
                ImpactResolution {
                    impact: Impact::Unknown,
                    description: NOT_AVAILABLE.to_string(),
                    matched_category: None,
                }
            }
        }
    }

    fn impact_of(&self, obs: &GeneObservation) -> Impact {
        self.resolve_impact(&obs.category, &obs.gene, &obs.genotype).impact
    }

    /// Score 0–100 over en trekk-definisjons genliste.
    ///
    /// Samme gen teller én gang selv om det finnes i flere kategorier eller
    /// under flere stavemåter.
    pub fn compute_trait_score(&self, observations: &[GeneObservation], definition: &TraitDefinition) -> TraitScore {
        let wanted: HashSet<String> = definition.gene_list.iter().map(|g| normalize_gene(g)).collect();

        let mut seen: HashSet<String> = HashSet::new();
        let impacts: Vec<Impact> = observations
            .iter()
            .filter(|o| {
                let g = normalize_gene(&o.gene);
                wanted.contains(&g) && seen.insert(g)
            })
            .map(|o| self.impact_of(o))
            .collect();

        let mut out = score_impacts(&impacts);
        out.trait_name = definition.name.clone();
        out
    }

    pub fn score_traits(&self, observations: &[GeneObservation], traits: &[TraitDefinition]) -> Vec<TraitScore> {
        traits
            .iter()
            .map(|t| self.compute_trait_score(observations, t))
            .collect()
    }

    /// Dekning og score per katalogkategori.
    ///
    /// Telleren klemmes til antall definerte gener: leverandøren kan sende
    /// samme fysiske gen under flere rå navn.
    pub fn category_coverage(&self, observations: &[GeneObservation]) -> Vec<CategoryScore> {
        self.catalog
            .categories()
            .iter()
            .map(|table| {
                let mut seen: HashSet<String> = HashSet::new();
                let impacts: Vec<Impact> = observations
                    .iter()
                    .filter(|o| normalize_category(&o.category) == table.name)
                    // Bare gener tabellen kjenner teller som "til stede"
                    .filter(|o| {
                        let gene = normalize_gene(&o.gene);
                        table.genes.contains_key(&gene) && seen.insert(gene)
                    })
                    .map(|o| self.impact_of(o))
                    .collect();

                let scored = score_impacts(&impacts);
                let defined = table.genes_defined();
                CategoryScore {
                    category: table.name.clone(),
                    genes_present: seen.len().min(defined),
                    genes_defined: defined,
                    score: scored.score,
                    beneficial_count: scored.beneficial_count,
                    challenging_count: scored.challenging_count,
                }
            })
            .collect()
    }
}

/// Snitt av -1/0/+1 skalert lineært til 0–100; tom liste gir 50.
pub fn score_impacts(impacts: &[Impact]) -> TraitScore {
    let beneficial_count = impacts.iter().filter(|i| **i == Impact::Beneficial).count();
    let challenging_count = impacts.iter().filter(|i| **i == Impact::Challenging).count();

    let score = if impacts.is_empty() {
        NEUTRAL_SCORE
    } else {
        let avg = impacts.iter().map(|i| i.weight()).sum::<f64>() / impacts.len() as f64;
        ((avg + 1.0) * 50.0).round().clamp(0.0, 100.0) as u8
    };

    TraitScore {
        trait_name: String::new(),
        score,
        beneficial_count,
        challenging_count,
        genes_present: impacts.len(),
    }
}
