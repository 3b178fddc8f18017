use crate::engine::{self, LoadMetrics, QueryMetrics, SectionMask};
use crate::{Error, MatchResult, Result, RuleSet, Selection, SymptomCatalog, SymptomToken};
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use std::fmt;
use std::io::Read;
use std::path::Path;

static EMPTY_RULES: Lazy<RuleSet> = Lazy::new(RuleSet::empty);
static EMPTY_CATALOG: Lazy<SymptomCatalog> = Lazy::new(SymptomCatalog::default);

/// Options that affect how a diagnosis is reported.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Keep only the first `limit` ranked results. `None` keeps everything.
    pub limit: Option<usize>,
}

/// One loaded rule-export document. Immutable once built.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    source_name: String,
    rules: RuleSet,
    catalog: SymptomCatalog,
    sections: SectionMask,
    metrics: LoadMetrics,
    loaded_at: DateTime<Local>,
}

impl KnowledgeBase {
    /// Build from document text already in memory. Never fails.
    pub fn from_text(source_name: impl Into<String>, text: &str) -> Self {
        let parsed = engine::parse_document(text);
        KnowledgeBase {
            source_name: source_name.into(),
            rules: parsed.rules,
            catalog: parsed.catalog,
            sections: parsed.sections,
            metrics: parsed.metrics,
            loaded_at: Local::now(),
        }
    }

    /// Read a UTF-8 document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|err| Error::document_read(source_name.clone(), err))?;
        Ok(Self::from_text(source_name, &text))
    }

    /// Read a UTF-8 document from any reader (stdin, a socket, an archive entry).
    pub fn from_reader(source_name: impl Into<String>, mut reader: impl Read) -> Result<Self> {
        let source_name = source_name.into();
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(|err| Error::document_read(source_name.clone(), err))?;
        Ok(Self::from_text(source_name, &text))
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    pub fn sections(&self) -> SectionMask {
        self.sections
    }

    pub fn metrics(&self) -> &LoadMetrics {
        &self.metrics
    }

    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }

    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            source_name: self.source_name.clone(),
            rules: self.rules.len(),
            symptoms: self.catalog.len(),
            sections: self.sections,
            metrics: self.metrics.clone(),
            loaded_at: self.loaded_at,
        }
    }

    pub fn diagnose(&self, selection: &Selection, options: &Options) -> Result<Diagnosis> {
        run_diagnosis(&self.rules, selection, options)
    }
}

/// What a load produced, for reporting.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub source_name: String,
    pub rules: usize,
    pub symptoms: usize,
    pub sections: SectionMask,
    pub metrics: LoadMetrics,
    pub loaded_at: DateTime<Local>,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loaded {} rules and {} symptoms.", self.rules, self.symptoms)
    }
}

/// Result of one query.
#[derive(Debug, Clone)]
pub struct Diagnosis {
    /// The selection the query ran with, in token order.
    pub selected: Vec<SymptomToken>,
    /// Matches ranked by confidence, highest first.
    pub results: Vec<MatchResult>,
    pub metrics: QueryMetrics,
}

impl Diagnosis {
    /// True when no rule matched ("no matching diagnosis").
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn best(&self) -> Option<&MatchResult> {
        self.results.first()
    }
}

fn run_diagnosis(rules: &RuleSet, selection: &Selection, options: &Options) -> Result<Diagnosis> {
    let (mut results, metrics) = engine::diagnose_with_metrics(rules, selection)?;
    if let Some(limit) = options.limit {
        results.truncate(limit);
    }
    Ok(Diagnosis { selected: selection.iter().cloned().collect(), results, metrics })
}

/// Owns the currently loaded knowledge base and answers queries against it.
///
/// Each successful load replaces the previous knowledge base wholesale; a
/// failed load leaves it in place. Before any load the session behaves like
/// an empty rule set.
///
/// # Example
/// ```
/// use dxrules::{Selection, Session};
///
/// let mut session = Session::new();
/// let summary = session.load_str("inline", "Attributes:\nFever=t\n===\n1. [Fever=t] ==> [Disease=Flu=t] <conf:(0.8)>\n");
/// assert_eq!(summary.to_string(), "Loaded 1 rules and 1 symptoms.");
///
/// let diagnosis = session.diagnose(&Selection::new(["Fever=t"])).unwrap();
/// assert_eq!(diagnosis.best().map(|r| r.diagnosis.as_str()), Some("Flu"));
/// ```
#[derive(Debug, Default)]
pub struct Session {
    current: Option<KnowledgeBase>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary> {
        let kb = KnowledgeBase::from_path(path)?;
        Ok(self.replace(kb))
    }

    pub fn load_str(&mut self, source_name: impl Into<String>, text: &str) -> LoadSummary {
        self.replace(KnowledgeBase::from_text(source_name, text))
    }

    pub fn load_reader(&mut self, source_name: impl Into<String>, reader: impl Read) -> Result<LoadSummary> {
        let kb = KnowledgeBase::from_reader(source_name, reader)?;
        Ok(self.replace(kb))
    }

    fn replace(&mut self, kb: KnowledgeBase) -> LoadSummary {
        let summary = kb.summary();
        tracing::debug!(
            source = %summary.source_name,
            rules = summary.rules,
            symptoms = summary.symptoms,
            "knowledge base loaded"
        );
        self.current = Some(kb);
        summary
    }

    pub fn knowledge_base(&self) -> Option<&KnowledgeBase> {
        self.current.as_ref()
    }

    pub fn rules(&self) -> &RuleSet {
        self.current.as_ref().map_or(&*EMPTY_RULES, KnowledgeBase::rules)
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        self.current.as_ref().map_or(&*EMPTY_CATALOG, KnowledgeBase::catalog)
    }

    pub fn diagnose(&self, selection: &Selection) -> Result<Diagnosis> {
        self.diagnose_with(selection, &Options::default())
    }

    pub fn diagnose_with(&self, selection: &Selection, options: &Options) -> Result<Diagnosis> {
        run_diagnosis(self.rules(), selection, options)
    }
}
