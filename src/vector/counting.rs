//! Distinct values and their counts.

use std::collections::HashMap;

use arrow::datatypes::DataType;

use crate::error::Result;
use crate::types::{array_from_values, Value, ValueKey};
use crate::vector::Vector;

/// Distinct values in order of first occurrence.
struct Occurrences {
    first: Vec<u32>,
    counts: Vec<usize>,
}

impl Vector {
    fn occurrences(&self) -> Result<Occurrences> {
        let mut slots: HashMap<ValueKey, usize> = HashMap::new();
        let mut first = Vec::new();
        let mut counts = Vec::new();
        for (row, value) in self.to_values()?.iter().enumerate() {
            let slot = *slots.entry(value.to_key()).or_insert_with(|| {
                first.push(row as u32);
                counts.push(0);
                counts.len() - 1
            });
            counts[slot] += 1;
        }
        Ok(Occurrences { first, counts })
    }

    /// Each distinct value with its number of occurrences, in order of first
    /// occurrence. NaN values are counted together; nulls count as one value.
    ///
    /// # Errors
    ///
    /// Returns an error if the element type has no scalar representation.
    pub fn tally(&self) -> Result<Vec<(Value, usize)>> {
        let occurrences = self.occurrences()?;
        occurrences
            .first
            .iter()
            .zip(occurrences.counts)
            .map(|(&row, count)| Ok((self.get(row as usize)?, count)))
            .collect()
    }

    /// Distinct values and their counts as two vectors: `values` keeps this
    /// vector's type, `counts` is `Int64`.
    ///
    /// # Errors
    ///
    /// Returns an error if the element type has no scalar representation.
    pub fn value_counts(&self) -> Result<(Vector, Vector)> {
        let occurrences = self.occurrences()?;
        let values = self.take(&occurrences.first)?;
        let counts: Vec<Value> = occurrences
            .counts
            .into_iter()
            .map(|c| Value::Int64(c as i64))
            .collect();
        let counts = Vector::new(array_from_values(&counts, Some(&DataType::Int64))?);
        Ok((values, counts))
    }

    /// Distinct values in order of first occurrence.
    ///
    /// # Errors
    ///
    /// Returns an error if the element type has no scalar representation.
    pub fn unique(&self) -> Result<Vector> {
        let occurrences = self.occurrences()?;
        self.take(&occurrences.first)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_tally_coalesces_nan() {
        let v = Vector::from(vec![f64::NAN, f64::NAN, 1.0]);
        let tally = v.tally().unwrap();
        assert_eq!(tally.len(), 2);
        assert!(tally[0].0.is_nan());
        assert_eq!(tally[0].1, 2);
        assert_eq!(tally[1], (Value::Float64(1.0), 1));
    }

    #[test]
    fn test_tally_counts_nulls() {
        let v = Vector::from(vec![Some("a"), None, Some("a"), None]);
        assert_eq!(
            v.tally().unwrap(),
            vec![(Value::String("a".into()), 2), (Value::Null, 2)]
        );
    }

    #[test]
    fn test_unique_and_value_counts() {
        let v = Vector::from(vec![3u8, 1, 3, 2, 1]).with_key("k");
        let unique = v.unique().unwrap();
        assert_eq!(unique.data_type(), &DataType::UInt8);
        assert_eq!(
            unique.to_values().unwrap(),
            vec![Value::UInt64(3), Value::UInt64(1), Value::UInt64(2)]
        );
        let (values, counts) = v.value_counts().unwrap();
        assert_eq!(values, unique);
        assert_eq!(
            counts.to_values().unwrap(),
            vec![Value::Int64(2), Value::Int64(2), Value::Int64(1)]
        );
    }
}
