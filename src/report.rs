use dxrules::{Diagnosis, LoadSummary, SectionMask, SymptomCatalog};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_load(summary: &LoadSummary, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("{}", palette.bold(palette.paint(summary.to_string(), ansi::CYAN)));
    println!(
        "{}",
        palette.dim(format!(
            "  source: {}  │  loaded: {}  │  parse: {:?}",
            summary.source_name,
            summary.loaded_at.format("%Y-%m-%d %H:%M:%S"),
            summary.metrics.elapsed
        ))
    );

    if summary.metrics.rejected() > 0 {
        println!(
            "  {}",
            palette.paint(
                format!(
                    "skipped {} candidate rules ({} empty antecedent, {} missing consequent, {} bad confidence)",
                    summary.metrics.rejected(),
                    summary.metrics.empty_antecedent,
                    summary.metrics.missing_consequent,
                    summary.metrics.bad_confidence
                ),
                ansi::YELLOW
            )
        );
    }

    if summary.rules == 0 {
        println!("\n{}", palette.paint("No rules were loaded. Possible reasons:", ansi::YELLOW));
        if !summary.sections.contains(SectionMask::HAS_SEPARATOR) {
            println!("  • The document has no === separator before its rule block");
        }
        if !summary.sections.contains(SectionMask::HAS_RULE_ARROW) {
            println!("  • The text after the last === contains no ==> rule lines");
        }
        println!("  • Rule lines did not match `N. [..] ==> [Disease=X=t] <conf:(c)>`");
    }
}

pub fn print_catalog(catalog: &SymptomCatalog, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.paint("━━━ Symptoms ━━━", ansi::GRAY));
    if catalog.is_empty() {
        println!("{}", palette.dim("  No Attributes: block found"));
        return;
    }
    for (category, values) in catalog.grouped() {
        println!("  {}", palette.bold(category));
        for value in values {
            println!("    {}", palette.paint(format!("{category}={value}"), ansi::CYAN));
        }
    }
}

pub fn print_diagnosis(diagnosis: &Diagnosis, color: bool) {
    let palette = ansi::Palette::new(color);

    println!("\n{}", palette.paint("━━━ SELECTED SYMPTOMS ━━━", ansi::GRAY));
    for symptom in &diagnosis.selected {
        println!("- {}", symptom);
    }

    println!("\n{}", palette.paint("━━━ DIAGNOSIS RESULTS ━━━", ansi::GRAY));
    if diagnosis.is_empty() {
        println!("{}", palette.dim("No matching diseases found for the selected symptoms."));
    } else {
        for result in &diagnosis.results {
            println!("{}", palette.paint(result.to_string(), ansi::GREEN));
        }
    }

    println!(
        "\n{}",
        palette.dim(format!(
            "  rules evaluated: {}  │  matched: {}  │  elapsed: {:?}",
            diagnosis.metrics.rules_evaluated, diagnosis.metrics.matched, diagnosis.metrics.elapsed
        ))
    );
}
