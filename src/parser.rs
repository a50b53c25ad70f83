use std::collections::HashMap;

use crate::schema::Schema;

/// Label → text mapping produced by [`parse`].
///
/// Every schema label is a key (empty string when the input never filled it)
/// and nothing else is. Built only by [`parse`] or [`Record::empty`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    values: HashMap<String, String>,
}

impl Record {
    /// A record with every schema label set to the empty string.
    pub fn empty(schema: &Schema) -> Self {
        Self {
            values: schema
                .labels()
                .iter()
                .map(|l| (l.clone(), String::new()))
                .collect(),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.values.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when every value is empty. Still a valid parse result.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `(label, value)` pairs in the schema's declared order.
    pub fn iter_in<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = (&'a str, &'a str)> {
        schema
            .labels()
            .iter()
            .map(move |l| (l.as_str(), self.get(l).unwrap_or("")))
    }

    /// "Label: value" lines in declared order, empty values omitted.
    pub fn to_canonical(&self, schema: &Schema) -> String {
        let mut out = String::new();
        for (label, value) in self.iter_in(schema) {
            if value.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(label);
            out.push_str(": ");
            out.push_str(value);
        }
        out
    }

    fn set(&mut self, label: &str, value: &str) {
        if let Some(slot) = self.values.get_mut(label) {
            slot.clear();
            slot.push_str(value);
        }
    }

    fn append_line(&mut self, label: &str, line: &str) {
        if let Some(slot) = self.values.get_mut(label) {
            if !slot.is_empty() {
                slot.push('\n');
            }
            slot.push_str(line);
        }
    }
}

/// If `line` opens a section (`Label:` or `Label :`), return the label.
fn match_label<'s>(line: &str, schema: &'s Schema) -> Option<&'s str> {
    schema.labels().iter().map(String::as_str).find(|label| {
        line.strip_prefix(label)
            .is_some_and(|rest| rest.starts_with(':') || rest.starts_with(" :"))
    })
}

/// Split generated text into schema sections.
///
/// A trimmed line that starts with a schema label followed by a colon makes
/// that label current; any text after the first colon replaces its value.
/// Colon-free lines are appended to the current label. Lines with a colon that
/// open no known section are dropped, and blank lines are ignored. Never
/// fails: unstructured input yields a record of empty values.
pub fn parse(raw: &str, schema: &Schema) -> Record {
    let (record, _) = raw.lines().map(str::trim).filter(|l| !l.is_empty()).fold(
        (Record::empty(schema), None::<&str>),
        |(mut record, current), line| {
            if let Some(label) = match_label(line, schema) {
                // the colon is guaranteed by match_label
                let value = line.split_once(':').map_or("", |(_, v)| v.trim());
                if !value.is_empty() {
                    record.set(label, value);
                }
                log::trace!("section {label:?} opened");
                return (record, Some(label));
            }
            match current {
                Some(label) if !line.contains(':') => record.append_line(label, line),
                _ if line.contains(':') => log::debug!("dropping unlabeled colon line {line:?}"),
                _ => log::trace!("dropping line before first section: {line:?}"),
            }
            (record, current)
        },
    );
    log::debug!(
        "parsed {} of {} sections",
        record.values.values().filter(|v| !v.is_empty()).count(),
        record.len(),
    );
    record
}

/// Strip markdown emphasis and heading markers the generator tends to add.
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|&c| c != '*' && c != '#')
        .collect::<String>()
        .trim()
        .to_string()
}
