use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::types::{Impact, TraitDefinition};

/// Kanonisk gennøkkel: store bokstaver, uten mellomrom.
pub fn normalize_gene(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Kanonisk genotype: store bokstaver, kun alfanumerisk, og to-allel-kall
/// sortert slik at "GA" == "AG" og "XR" == "RX".
pub fn normalize_genotype(call: &str) -> String {
    let mut chars: Vec<char> = call
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect();
    if chars.len() == 2 {
        chars.sort_unstable();
    }
    chars.into_iter().collect()
}

pub fn normalize_category(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeEntry {
    pub impact: Impact,
    pub description: String,
}

/// Én kategori: gen -> genotypetabell. En tom tabell betyr at genet hører
/// til kategorien, men at den autoritative tabellen ligger i en annen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub name: String,
    pub genes: BTreeMap<String, BTreeMap<String, GenotypeEntry>>,
}

impl CategoryTable {
    pub fn genes_defined(&self) -> usize {
        self.genes.len()
    }

    pub fn lookup(&self, gene: &str, genotype: &str) -> Option<&GenotypeEntry> {
        self.genes.get(gene)?.get(genotype)
    }

    fn normalized(self) -> Self {
        let genes = self
            .genes
            .into_iter()
            .map(|(gene, calls)| {
                let calls = calls
                    .into_iter()
                    .map(|(gt, entry)| (normalize_genotype(&gt), entry))
                    .collect();
                (normalize_gene(&gene), calls)
            })
            .collect();
        Self { name: normalize_category(&self.name), genes }
    }
}

/// Serialisert form; nøklene normaliseres ved innlesing.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogRepr {
    categories: Vec<CategoryTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "CatalogRepr", into = "CatalogRepr")]
pub struct GeneCatalog {
    categories: Vec<CategoryTable>,
}

impl From<CatalogRepr> for GeneCatalog {
    fn from(r: CatalogRepr) -> Self {
        GeneCatalog::new(r.categories)
    }
}

impl From<GeneCatalog> for CatalogRepr {
    fn from(c: GeneCatalog) -> Self {
        CatalogRepr { categories: c.categories }
    }
}

impl GeneCatalog {
    pub fn new(categories: Vec<CategoryTable>) -> Self {
        Self {
            categories: categories.into_iter().map(CategoryTable::normalized).collect(),
        }
    }

    pub fn categories(&self) -> &[CategoryTable] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryTable> {
        let key = normalize_category(name);
        self.categories.iter().find(|c| c.name == key)
    }

    /// Innebygd standardkatalog.
    pub fn builtin() -> &'static GeneCatalog {
        &BUILTIN_CATALOG
    }
}

// (kategori, gen, genotype, påvirkning, beskrivelse). Gen uten genotype =
// kun medlemskap; tabellen slås opp i hjemkategorien til genet.
type Row = (&'static str, &'static str, &'static str, Impact, &'static str);

const BUILTIN_ROWS: &[Row] = &[
    // power
    ("power", "ACTN3", "RR", Impact::Beneficial, "Full alpha-actinin-3 expression in fast-twitch fibres"),
    ("power", "ACTN3", "RX", Impact::Neutral, "Mixed fast-twitch fibre profile"),
    ("power", "ACTN3", "XX", Impact::Challenging, "No alpha-actinin-3; lower sprint/power predisposition"),
    ("power", "ACE", "DD", Impact::Beneficial, "Higher ACE activity, favours strength and power"),
    ("power", "ACE", "ID", Impact::Neutral, "Intermediate ACE activity"),
    ("power", "ACE", "II", Impact::Challenging, "Lower ACE activity, less power-oriented"),
    ("power", "AGT", "TT", Impact::Beneficial, "Angiotensinogen variant linked to power performance"),
    ("power", "AGT", "CT", Impact::Neutral, "Intermediate angiotensinogen profile"),
    ("power", "AGT", "CC", Impact::Challenging, "Less power-oriented angiotensinogen profile"),
    // endurance
    ("endurance", "PPARGC1A", "GG", Impact::Beneficial, "Efficient mitochondrial biogenesis"),
    ("endurance", "PPARGC1A", "GA", Impact::Neutral, "Typical mitochondrial response"),
    ("endurance", "PPARGC1A", "AA", Impact::Challenging, "Reduced aerobic training response"),
    ("endurance", "VEGFA", "CC", Impact::Beneficial, "Favourable capillary growth response"),
    ("endurance", "VEGFA", "CG", Impact::Neutral, "Typical angiogenic response"),
    ("endurance", "VEGFA", "GG", Impact::Challenging, "Lower angiogenic response to training"),
    ("endurance", "ADRB2", "GG", Impact::Beneficial, "Efficient fat mobilisation during exercise"),
    ("endurance", "ADRB2", "AG", Impact::Neutral, "Typical beta-2 adrenergic response"),
    ("endurance", "ADRB2", "AA", Impact::Challenging, "Reduced beta-2 adrenergic response"),
    ("endurance", "ACE", "", Impact::Unknown, ""),
    // injury
    ("injury", "COL1A1", "GG", Impact::Beneficial, "Typical type I collagen strength"),
    ("injury", "COL1A1", "GT", Impact::Neutral, "Slightly altered type I collagen ratio"),
    ("injury", "COL1A1", "TT", Impact::Challenging, "Higher soft-tissue injury susceptibility"),
    ("injury", "COL5A1", "CC", Impact::Beneficial, "Lower tendon stiffness, lower tendinopathy risk"),
    ("injury", "COL5A1", "CT", Impact::Neutral, "Intermediate tendon properties"),
    ("injury", "COL5A1", "TT", Impact::Challenging, "Stiffer tendons, higher tendinopathy risk"),
    ("injury", "GDF5", "TT", Impact::Beneficial, "Normal joint cartilage development"),
    ("injury", "GDF5", "CT", Impact::Neutral, "Intermediate cartilage profile"),
    ("injury", "GDF5", "CC", Impact::Challenging, "Higher osteoarthritis and tendon risk"),
    ("injury", "MMP3", "AA", Impact::Beneficial, "Typical tissue remodelling"),
    ("injury", "MMP3", "AG", Impact::Neutral, "Intermediate remodelling activity"),
    ("injury", "MMP3", "GG", Impact::Challenging, "Altered remodelling, higher tendon risk"),
    ("injury", "ACTN3", "", Impact::Unknown, ""),
    // recovery
    ("recovery", "IL6", "CC", Impact::Beneficial, "Lower inflammatory response after load"),
    ("recovery", "IL6", "CG", Impact::Neutral, "Typical inflammatory response"),
    ("recovery", "IL6", "GG", Impact::Challenging, "Higher post-exercise inflammation"),
    ("recovery", "TNF", "GG", Impact::Beneficial, "Typical TNF-alpha production"),
    ("recovery", "TNF", "AG", Impact::Neutral, "Moderately raised TNF-alpha production"),
    ("recovery", "TNF", "AA", Impact::Challenging, "High TNF-alpha, slower recovery"),
    ("recovery", "SOD2", "CC", Impact::Beneficial, "Efficient antioxidant defence"),
    ("recovery", "SOD2", "CT", Impact::Neutral, "Typical antioxidant defence"),
    ("recovery", "SOD2", "TT", Impact::Challenging, "Reduced mitochondrial antioxidant capacity"),
    ("recovery", "BDNF", "GG", Impact::Beneficial, "Typical BDNF secretion"),
    ("recovery", "BDNF", "AG", Impact::Neutral, "Slightly reduced BDNF secretion"),
    ("recovery", "BDNF", "AA", Impact::Challenging, "Reduced activity-dependent BDNF secretion"),
    // metabolism
    ("metabolism", "CYP1A2", "AA", Impact::Beneficial, "Fast caffeine metaboliser"),
    ("metabolism", "CYP1A2", "AC", Impact::Neutral, "Intermediate caffeine metabolism"),
    ("metabolism", "CYP1A2", "CC", Impact::Challenging, "Slow caffeine metaboliser"),
    ("metabolism", "MTHFR", "CC", Impact::Beneficial, "Typical folate metabolism"),
    ("metabolism", "MTHFR", "CT", Impact::Neutral, "Mildly reduced MTHFR activity"),
    ("metabolism", "MTHFR", "TT", Impact::Challenging, "Reduced MTHFR activity"),
    ("metabolism", "FTO", "TT", Impact::Beneficial, "Typical energy balance regulation"),
    ("metabolism", "FTO", "AT", Impact::Neutral, "Intermediate weight-gain tendency"),
    ("metabolism", "FTO", "AA", Impact::Challenging, "Higher weight-gain tendency"),
];

fn build_catalog(rows: &[Row]) -> GeneCatalog {
    let mut categories: Vec<CategoryTable> = Vec::new();
    for &(cat, gene, gt, impact, desc) in rows {
        let idx = match categories.iter().position(|c| c.name == cat) {
            Some(i) => i,
            None => {
                categories.push(CategoryTable { name: cat.to_string(), genes: BTreeMap::new() });
                categories.len() - 1
            }
        };
        let calls = categories[idx].genes.entry(gene.to_string()).or_default();
        if !gt.is_empty() {
            calls.insert(
                gt.to_string(),
                GenotypeEntry { impact, description: desc.to_string() },
            );
        }
    }
    GeneCatalog::new(categories)
}

static BUILTIN_CATALOG: Lazy<GeneCatalog> = Lazy::new(|| build_catalog(BUILTIN_ROWS));

static DEFAULT_TRAITS: Lazy<Vec<TraitDefinition>> = Lazy::new(|| {
    vec![
        TraitDefinition::new("Power & sprint", &["ACTN3", "ACE", "AGT"]),
        TraitDefinition::new("Endurance capacity", &["PPARGC1A", "VEGFA", "ADRB2", "ACE"]),
        TraitDefinition::new("Injury resilience", &["COL1A1", "COL5A1", "GDF5", "MMP3"]),
        TraitDefinition::new("Recovery", &["IL6", "TNF", "SOD2", "BDNF"]),
        TraitDefinition::new("Caffeine metabolism", &["CYP1A2"]),
    ]
});

pub fn default_traits() -> &'static [TraitDefinition] {
    &DEFAULT_TRAITS
}
