//! Tabular attribute encoding.

use gin_core::{Attribute, TabularValue, TimeBasedValue, Versioned};

use crate::clock::Clock;
use crate::source::Table;

/// Encode `rows` as a tabular attribute named `key`.
///
/// Returns `None` for an empty row set so no empty-table attribute is ever
/// emitted. Otherwise the rows are projected onto `columns`, and the table
/// becomes the single, open-ended entry of a time-versioned envelope effective
/// at the clock's current time.
pub fn encode_attribute(
    key: &str,
    rows: &Table,
    columns: &[String],
    clock: &dyn Clock,
) -> Option<Attribute> {
    if rows.is_empty() {
        return None;
    }

    let table = TabularValue {
        columns: columns.to_vec(),
        rows: rows.project(columns),
    };

    Some(Attribute {
        key: key.to_string(),
        value: Versioned::single(TimeBasedValue::open(clock.timestamp(), table)),
    })
}
