//! Plain-text views of plans and divergence reports for logs and snapshots.
//!
//! ```text
//! flags: open_flame, welding
//! EPI
//!   Q001 Cinto de Segurança: Não
//!   ...
//! APN-1 Sim: Q010
//! ```

use std::fmt::{self, Write};

use crate::base_table::EPI_RADIO_BASE;
use crate::divergence::{DivergenceReport, Severity};
use crate::plan::Plan;

/// Sections of a [`PlanDisplay`], in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlanSection {
    Flags,
    EpiRadio,
    EpiItems,
    Questionnaire,
    Apn1,
}

pub struct PlanDisplay<'a> {
    plan: &'a Plan,
    sections: Vec<PlanSection>,
}

impl<'a> PlanDisplay<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        PlanDisplay {
            plan,
            sections: Vec::new(),
        }
    }

    /// Every section.
    pub fn full(plan: &'a Plan) -> Self {
        let mut display = Self::new(plan);
        for section in [
            PlanSection::Flags,
            PlanSection::EpiRadio,
            PlanSection::EpiItems,
            PlanSection::Questionnaire,
            PlanSection::Apn1,
        ] {
            display.include(section);
        }
        display
    }

    pub fn include(&mut self, section: PlanSection) -> &mut Self {
        if !self.sections.contains(&section) {
            self.sections.push(section);
            self.sections.sort();
        }
        self
    }

    fn write_section(&self, f: &mut fmt::Formatter<'_>, section: PlanSection) -> fmt::Result {
        match section {
            PlanSection::Flags => {
                let flags: Vec<&str> = self
                    .plan
                    .context()
                    .active_flags()
                    .map(|flag| flag.name())
                    .collect();
                if flags.is_empty() {
                    f.write_str("flags: -")
                } else {
                    write!(f, "flags: {}", flags.join(", "))
                }
            }
            PlanSection::EpiRadio => {
                f.write_str("EPI")?;
                for (code, answer) in self.plan.epi_radio() {
                    let prompt = EPI_RADIO_BASE
                        .iter()
                        .find(|q| q.code == *code)
                        .map_or("?", |q| q.prompt);
                    write!(f, "\n  {} {}: {}", code, prompt, answer)?;
                }
                Ok(())
            }
            PlanSection::EpiItems => {
                let mut first = true;
                for (category, items) in self.plan.epi_items().iter() {
                    if !first {
                        f.write_char('\n')?;
                    }
                    first = false;
                    write!(f, "EPI/{}", category)?;
                    for item in items {
                        write!(f, "\n  {}", item)?;
                    }
                }
                Ok(())
            }
            PlanSection::Questionnaire => {
                f.write_str("Questionário PT")?;
                for entry in self.plan.questionnaire() {
                    write!(f, "\n  {}: {}", entry.code, entry.answer)?;
                }
                Ok(())
            }
            PlanSection::Apn1 => {
                let yes: Vec<String> = self
                    .plan
                    .apn1()
                    .iter()
                    .filter(|(_, answer)| answer.is_yes())
                    .map(|(code, _)| code.to_string())
                    .collect();
                if yes.is_empty() {
                    f.write_str("APN-1 Sim: -")
                } else {
                    write!(f, "APN-1 Sim: {}", yes.join(", "))
                }
            }
        }
    }
}

impl<'a> fmt::Display for PlanDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                f.write_char('\n')?;
            }
            self.write_section(f, *section)?;
        }
        Ok(())
    }
}

/// One line per item; primary items are marked `✗`, secondary `~`.
///
/// ```text
/// ✗ APN-1 Q007 missing_yes: expected `Sim`, found `Não`
/// ~ EPI/Proteção Respiratória NÃO APLICÁVEL extra: found `NÃO APLICÁVEL`
/// ```
pub struct ReportDisplay<'a> {
    report: &'a DivergenceReport,
}

impl<'a> ReportDisplay<'a> {
    pub fn new(report: &'a DivergenceReport) -> Self {
        ReportDisplay { report }
    }
}

impl<'a> fmt::Display for ReportDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.report.is_empty() {
            return f.write_str("no divergence");
        }
        for (idx, item) in self.report.iter().enumerate() {
            if idx > 0 {
                f.write_char('\n')?;
            }
            let marker = match item.severity() {
                Severity::Primary => '\u{2717}',
                Severity::Secondary => '~',
            };
            write!(f, "{} {} {} {}", marker, item.category, item.key, item.kind)?;
            match (&item.expected, &item.actual) {
                (Some(expected), Some(actual)) => {
                    write!(f, ": expected `{}`, found `{}`", expected, actual)?
                }
                (Some(expected), None) => write!(f, ": expected `{}`", expected)?,
                (None, Some(actual)) => write!(f, ": found `{}`", actual)?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}
