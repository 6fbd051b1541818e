use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Stat – one numeric column of the table
// ---------------------------------------------------------------------------

/// Number of numeric attributes carried by every [`Record`].
pub const STAT_COUNT: usize = 7;

/// The numeric attributes of a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Stat {
    #[serde(rename = "HP", alias = "Hp")]
    Hp,
    Attack,
    Defense,
    #[serde(rename = "Sp. Atk", alias = "Sp_Atk", alias = "SpAtk")]
    SpAtk,
    #[serde(rename = "Sp. Def", alias = "Sp_Def", alias = "SpDef")]
    SpDef,
    Speed,
    Total,
}

impl Stat {
    pub const ALL: [Stat; STAT_COUNT] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpAtk,
        Stat::SpDef,
        Stat::Speed,
        Stat::Total,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column header as it appears in the source table.
    pub fn label(self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::SpAtk => "Sp. Atk",
            Stat::SpDef => "Sp. Def",
            Stat::Speed => "Speed",
            Stat::Total => "Total",
        }
    }

    /// Match a column header, accepting `Sp_Atk`-style spellings.
    pub fn from_header(header: &str) -> Option<Stat> {
        let normalized: String = header
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "hp" => Some(Stat::Hp),
            "attack" => Some(Stat::Attack),
            "defense" => Some(Stat::Defense),
            "spatk" => Some(Stat::SpAtk),
            "spdef" => Some(Stat::SpDef),
            "speed" => Some(Stat::Speed),
            "total" => Some(Stat::Total),
            _ => None,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("dataset contains no records")]
    Empty,
    #[error("no record has a numeric Total")]
    NoFiniteTotals,
    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumn { column: String, data_type: String },
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// Stable identity of a record: its display name plus the number of earlier
/// records sharing that name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub name: String,
    pub occurrence: u32,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.occurrence == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} #{}", self.name, self.occurrence + 1)
        }
    }
}

/// A single creature. Malformed numeric cells are stored as NaN.
#[derive(Debug, Clone)]
pub struct Record {
    key: RecordKey,
    stats: [f64; STAT_COUNT],
}

impl Record {
    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn get(&self, stat: Stat) -> f64 {
        self.stats[stat.index()]
    }
}

/// A parsed row before identity keys are assigned.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub name: String,
    pub stats: [f64; STAT_COUNT],
}

impl RawRecord {
    pub fn malformed_fields(&self) -> usize {
        self.stats.iter().filter(|v| !v.is_finite()).count()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Ordered, immutable collection of records with cached per-stat extents.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    extents: [Option<(f64, f64)>; STAT_COUNT],
}

impl Dataset {
    /// Assign identity keys and compute extents. Fails on an empty table or
    /// when no Total value is finite, since the threshold range would be
    /// undefined.
    pub fn from_records(raw: Vec<RawRecord>) -> Result<Self, LoadError> {
        if raw.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut seen: HashMap<String, u32> = HashMap::new();
        let records: Vec<Record> = raw
            .into_iter()
            .map(|r| {
                let count = seen.entry(r.name.clone()).or_insert(0);
                let occurrence = *count;
                *count += 1;
                if occurrence > 0 {
                    log::warn!("Duplicate name '{}' (occurrence {})", r.name, occurrence + 1);
                }
                Record {
                    key: RecordKey {
                        name: r.name,
                        occurrence,
                    },
                    stats: r.stats,
                }
            })
            .collect();

        let mut extents = [None; STAT_COUNT];
        for stat in Stat::ALL {
            extents[stat.index()] = finite_extent(records.iter().map(|r| r.get(stat)));
        }
        if extents[Stat::Total.index()].is_none() {
            return Err(LoadError::NoFiniteTotals);
        }

        Ok(Dataset { records, extents })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `[min, max]` over the finite values of `stat`.
    pub fn extent(&self, stat: Stat) -> Option<(f64, f64)> {
        self.extents[stat.index()]
    }

    /// Largest finite value of `stat`, or 0 when there is none.
    pub fn max(&self, stat: Stat) -> f64 {
        self.extent(stat).map_or(0.0, |(_, hi)| hi)
    }

    /// Integer slider bounds for the Total threshold.
    pub fn total_range(&self) -> (i64, i64) {
        // from_records guarantees a finite Total extent
        let (lo, hi) = self.extent(Stat::Total).unwrap_or((0.0, 0.0));
        (lo.floor() as i64, hi.ceil() as i64)
    }
}

fn finite_extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
pub(crate) fn raw(name: &str, stats: [f64; STAT_COUNT]) -> RawRecord {
    RawRecord {
        name: name.to_string(),
        stats,
    }
}

/// Build a dataset where only Total varies; handy for filter tests.
#[cfg(test)]
pub(crate) fn dataset_with_totals(rows: &[(&str, f64)]) -> Dataset {
    let raw_rows = rows
        .iter()
        .map(|&(name, total)| raw(name, [50.0, 60.0, 70.0, 80.0, 90.0, 100.0, total]))
        .collect();
    Dataset::from_records(raw_rows).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_aliases_resolve() {
        assert_eq!(Stat::from_header("Sp. Atk"), Some(Stat::SpAtk));
        assert_eq!(Stat::from_header("Sp_Def"), Some(Stat::SpDef));
        assert_eq!(Stat::from_header(" hp "), Some(Stat::Hp));
        assert_eq!(Stat::from_header("Type_1"), None);
    }

    #[test]
    fn extents_skip_nan() {
        let ds = Dataset::from_records(vec![
            raw("A", [1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0, 300.0]),
            raw("B", [2.0, 10.0, 1.0, 4.0, 5.0, 6.0, 500.5]),
        ])
        .unwrap();
        assert_eq!(ds.extent(Stat::Attack), Some((10.0, 10.0)));
        assert_eq!(ds.extent(Stat::Defense), Some((1.0, 3.0)));
        assert_eq!(ds.total_range(), (300, 501));
    }

    #[test]
    fn duplicate_names_get_distinct_keys() {
        let ds = dataset_with_totals(&[("A", 1.0), ("A", 2.0), ("B", 3.0)]);
        let keys: Vec<String> = ds.records().iter().map(|r| r.key().to_string()).collect();
        assert_eq!(keys, vec!["A", "A #2", "B"]);
        assert_ne!(ds.records()[0].key(), ds.records()[1].key());
    }

    #[test]
    fn empty_or_totalless_tables_are_rejected() {
        assert!(matches!(Dataset::from_records(vec![]), Err(LoadError::Empty)));
        let err = Dataset::from_records(vec![raw("A", [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, f64::NAN])]);
        assert!(matches!(err, Err(LoadError::NoFiniteTotals)));
    }

    #[test]
    fn stat_deserializes_from_column_names() {
        let stats: Vec<Stat> = serde_json::from_str(r#"["HP", "Sp. Atk", "Sp_Def", "Total"]"#).unwrap();
        assert_eq!(stats, vec![Stat::Hp, Stat::SpAtk, Stat::SpDef, Stat::Total]);
    }
}
