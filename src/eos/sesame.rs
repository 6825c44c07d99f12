//! Reader for the Sesame-style EOS text tables.
//!
//! Lines starting with `#` are either section labels or metadata records.
//! A label names the section whose numbers follow it; metadata is skipped.
//! Numbers are whitespace-delimited and may use Fortran `D` exponents.
//! Fixed-width fields that run together because a negative value filled its
//! leading blank are split at the sign.

use crate::error::{DepositionError, DepositionResult};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    ColdCurve,
    Eos,
    ChargeState,
    Melt,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::ColdCurve,
        SectionKind::Eos,
        SectionKind::ChargeState,
        SectionKind::Melt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::ColdCurve => "cold curve",
            SectionKind::Eos => "eos",
            SectionKind::ChargeState => "charge state",
            SectionKind::Melt => "melt curve",
        }
    }

    /// Classify a comment line. `None` means a metadata record.
    fn from_label(label: &str) -> Option<Self> {
        let label = label.to_ascii_lowercase();
        if label.contains("cold") {
            Some(SectionKind::ColdCurve)
        } else if label.contains("charge") {
            Some(SectionKind::ChargeState)
        } else if label.contains("melt") {
            Some(SectionKind::Melt)
        } else if label.contains("eos") || label.contains("equation of state") {
            Some(SectionKind::Eos)
        } else {
            None
        }
    }
}

/// Raw numeric payload of every section of one table file.
#[derive(Clone, Debug, Default)]
pub struct SesameSections {
    sections: HashMap<SectionKind, Vec<f64>>,
}

impl SesameSections {
    pub fn parse(text: &str) -> DepositionResult<Self> {
        let mut sections: HashMap<SectionKind, Vec<f64>> = HashMap::new();
        let mut current: Option<SectionKind> = None;

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(label) = trimmed.strip_prefix('#') {
                if let Some(kind) = SectionKind::from_label(label) {
                    if sections.contains_key(&kind) {
                        return Err(DepositionError::lookup(format!(
                            "line {}: duplicate {} section",
                            line_no,
                            kind.name()
                        )));
                    }
                    sections.insert(kind, Vec::new());
                    current = Some(kind);
                }
                continue;
            }

            let kind = current.ok_or_else(|| {
                DepositionError::lookup(format!(
                    "line {}: numeric record before any section label",
                    line_no
                ))
            })?;
            let values = sections.entry(kind).or_default();
            for token in trimmed.split_whitespace() {
                parse_token(token, line_no, values)?;
            }
        }

        for kind in SectionKind::ALL {
            if !sections.contains_key(&kind) {
                return Err(DepositionError::lookup(format!("missing {} section", kind.name())));
            }
        }

        Ok(Self { sections })
    }

    /// A reader over one section's numbers
    pub fn reader(&self, kind: SectionKind) -> SectionReader<'_> {
        let values = self.sections.get(&kind).map(|v| v.as_slice()).unwrap_or(&[]);
        SectionReader { kind, values, pos: 0 }
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token
        .replace(['D', 'd'], "E")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Split a token at every sign that does not belong to an exponent.
fn split_run_together(token: &str) -> Vec<&str> {
    let bytes = token.as_bytes();
    let mut fields = Vec::new();
    let mut start = 0;
    for i in 1..bytes.len() {
        let is_sign = bytes[i] == b'-' || bytes[i] == b'+';
        let after_exponent = matches!(bytes[i - 1], b'E' | b'e' | b'D' | b'd');
        if is_sign && !after_exponent {
            fields.push(&token[start..i]);
            start = i;
        }
    }
    fields.push(&token[start..]);
    fields
}

fn parse_token(token: &str, line_no: usize, out: &mut Vec<f64>) -> DepositionResult<()> {
    if let Some(value) = parse_number(token) {
        out.push(value);
        return Ok(());
    }

    // run-together fixed-width fields
    let fields = split_run_together(token);
    if fields.len() > 1 {
        let parsed: Option<Vec<f64>> = fields.iter().map(|field| parse_number(field)).collect();
        if let Some(values) = parsed {
            out.extend(values);
            return Ok(());
        }
    }

    Err(DepositionError::lookup(format!(
        "line {}: malformed numeric field '{}'",
        line_no, token
    )))
}

/// Sequential reader over a section's numbers.
pub struct SectionReader<'a> {
    kind: SectionKind,
    values: &'a [f64],
    pos: usize,
}

impl<'a> SectionReader<'a> {
    /// Read a record count, which must be a whole number of at least `min`.
    pub fn count(&mut self, min: usize) -> DepositionResult<usize> {
        let value = self.next_value()?;
        if value.fract() != 0.0 || value < min as f64 {
            return Err(DepositionError::lookup(format!(
                "{} section: invalid count {} (need a whole number >= {})",
                self.kind.name(),
                value,
                min
            )));
        }
        Ok(value as usize)
    }

    pub fn take(&mut self, n: usize) -> DepositionResult<Vec<f64>> {
        let end = match self.pos.checked_add(n) {
            Some(end) if end <= self.values.len() => end,
            _ => {
                return Err(DepositionError::lookup(format!(
                    "{} section: expected {} more values, found {}",
                    self.kind.name(),
                    n,
                    self.values.len() - self.pos
                )));
            }
        };
        let out = self.values[self.pos..end].to_vec();
        self.pos = end;
        Ok(out)
    }

    /// Fail if any numbers are left unread.
    pub fn finish(self) -> DepositionResult<()> {
        if self.pos != self.values.len() {
            return Err(DepositionError::lookup(format!(
                "{} section: {} trailing values",
                self.kind.name(),
                self.values.len() - self.pos
            )));
        }
        Ok(())
    }

    fn next_value(&mut self) -> DepositionResult<f64> {
        let value = self.values.get(self.pos).copied().ok_or_else(|| {
            DepositionError::lookup(format!("{} section is truncated", self.kind.name()))
        })?;
        self.pos += 1;
        Ok(value)
    }
}
