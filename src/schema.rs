use crate::error::Error;

/// Placeholder some generators emit for a section they had nothing to say about.
pub const NOT_PROVIDED: &str = "Not provided";

const PITCH_LABELS: [&str; 9] = [
    "Startup Name",
    "Tagline",
    "Elevator Pitch",
    "Problem",
    "Solution",
    "Target Audience",
    "Market Size",
    "Revenue Model",
    "Landing Page Content",
];

const MARKET_ROW: [&str; 3] = ["Target Audience", "Market Size", "Revenue Model"];

/// The ordered set of section labels shared by the parser and the renderer.
///
/// Declared order drives both label matching (first match wins) and render
/// order. `rows` names groups of labels that are laid out side by side; a row
/// is placed where its first member appears in declared order.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    labels: Vec<String>,
    rows: Vec<Vec<String>>,
    not_provided: String,
}

impl Schema {
    /// Schema with the given labels, no side-by-side rows and the default
    /// "Not provided" sentinel. Duplicate labels are collapsed to their first
    /// occurrence.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !out.contains(&label) {
                out.push(label);
            }
        }
        Self {
            labels: out,
            rows: Vec::new(),
            not_provided: NOT_PROVIDED.to_string(),
        }
    }

    /// The startup-pitch schema, with the three market fields sharing one row.
    pub fn pitch() -> Self {
        let mut schema = Self::new(PITCH_LABELS);
        schema.rows.push(MARKET_ROW.iter().map(|l| l.to_string()).collect());
        schema
    }

    /// Declare a group of labels that render side by side.
    ///
    /// Members are reordered to declared order. Every member must be a schema
    /// label and may belong to at most one row.
    pub fn with_row<I, S>(mut self, members: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = Vec::new();
        for member in members {
            let member = member.into();
            if !self.contains(&member) {
                return Err(Error::Schema(format!("row member {member:?} is not a schema label")));
            }
            if self.row_of(&member).is_some() || row.contains(&member) {
                return Err(Error::Schema(format!("label {member:?} is already in a row")));
            }
            row.push(member);
        }
        if row.len() < 2 {
            return Err(Error::Schema("a row needs at least two labels".into()));
        }
        row.sort_by_key(|m| self.position(m));
        self.rows.push(row);
        Ok(self)
    }

    pub fn with_not_provided(mut self, sentinel: impl Into<String>) -> Self {
        self.not_provided = sentinel.into();
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn not_provided(&self) -> &str {
        &self.not_provided
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub(crate) fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// The row a label belongs to, if any.
    pub fn row_of(&self, label: &str) -> Option<&[String]> {
        self.rows
            .iter()
            .find(|row| row.iter().any(|m| m == label))
            .map(Vec::as_slice)
    }

    /// Render units in declared order: single labels, or whole rows at the
    /// position of their first member.
    pub(crate) fn units(&self) -> Vec<Vec<&str>> {
        let mut units: Vec<Vec<&str>> = Vec::new();
        for label in &self.labels {
            match self.row_of(label) {
                Some(row) if row[0] == *label => {
                    units.push(row.iter().map(String::as_str).collect());
                }
                Some(_) => {}
                None => units.push(vec![label.as_str()]),
            }
        }
        units
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::pitch()
    }
}
