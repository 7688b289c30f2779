//! Quality-flag filtering and completeness checks.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use super::record::{Flag, MasterRecord, Measured, SubsetRecord, Variable, GOOD_FLAG};

/// Measurements paired with the flag that vouches for them.
pub const FLAGGED: [(Variable, Flag); 6] = [
    (Variable::PhInSitu, Flag::PhInSitu),
    (Variable::Dic, Flag::Dic),
    (Variable::Alkalinity, Flag::Alkalinity),
    (Variable::Salinity, Flag::Salinity),
    (Variable::Phosphate, Flag::Phosphate),
    (Variable::Silicate, Flag::Silicate),
];

/// Variables every row must carry to be used for pCO2.
pub const REQUIRED: [Variable; 8] = [
    Variable::PhInSitu,
    Variable::Dic,
    Variable::Alkalinity,
    Variable::Temperature,
    Variable::Salinity,
    Variable::Pressure,
    Variable::Silicate,
    Variable::Phosphate,
];

/// Clears every value whose paired flag is not [`GOOD_FLAG`]. Returns the
/// number of values cleared.
pub fn apply_quality_flags(records: &mut [MasterRecord], pairs: &[(Variable, Flag)]) -> usize {
    let mut cleared = 0;

    for record in records.iter_mut() {
        for &(variable, flag) in pairs {
            if record.flag(flag) != Some(GOOD_FLAG) {
                let value = record.value_mut(variable);
                if value.take().is_some() {
                    cleared += 1;
                }
            }
        }
    }

    cleared
}

/// Drops records missing any of `required`.
pub fn drop_incomplete<R: Measured>(records: Vec<R>, required: &[Variable]) -> Vec<R> {
    let columns: Vec<_> = required.iter().map(|v| v.column()).collect();
    debug!(?columns, "Checking required variables");

    let before = records.len();
    let kept: Vec<R> = records
        .into_iter()
        .filter(|r| required.iter().all(|&v| r.value(v).is_some()))
        .collect();

    info!(kept = kept.len(), dropped = before - kept.len(), "Dropped incomplete rows");

    kept
}

/// Pairs every record with its timestamp, dropping those whose date is not
/// a real calendar date.
pub fn drop_invalid_dates(records: Vec<SubsetRecord>) -> Vec<(NaiveDateTime, SubsetRecord)> {
    let before = records.len();
    let dated: Vec<_> = records
        .into_iter()
        .filter_map(|r| r.timestamp().map(|t| (t, r)))
        .collect();

    let dropped = before - dated.len();
    if dropped > 0 {
        warn!(dropped, "Dropped rows with an invalid date");
    }

    dated
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn dic_row(value: f64, flag: Option<f64>) -> MasterRecord {
        MasterRecord {
            tco2: Some(value),
            tco2f: flag,
            ..Default::default()
        }
    }

    fn complete() -> SubsetRecord {
        SubsetRecord {
            phtsinsitutp: Some(8.05),
            tco2: Some(2010.0),
            talk: Some(2300.0),
            temperature: Some(18.2),
            salinity: Some(35.0),
            pressure: Some(5.0),
            silicate: Some(2.1),
            phosphate: Some(0.4),
            ..Default::default()
        }
    }

    #[test]
    fn should_clear_values_with_bad_flags() {
        let mut rows = vec![
            dic_row(10.0, Some(2.0)),
            dic_row(20.0, Some(2.0)),
            dic_row(30.0, Some(4.0)),
        ];

        let cleared = apply_quality_flags(&mut rows, &FLAGGED);

        let values: Vec<_> = rows.iter().map(|r| r.tco2).collect();
        assert_eq!(values, vec![Some(10.0), Some(20.0), None]);
        assert_eq!(cleared, 1);
    }

    #[test]
    fn should_clear_values_with_missing_flag() {
        let mut rows = vec![dic_row(2000.0, None)];

        apply_quality_flags(&mut rows, &[(Variable::Dic, Flag::Dic)]);

        assert_eq!(rows[0].tco2, None);
    }

    #[test]
    fn should_only_touch_listed_pairs() {
        let mut rows = vec![MasterRecord {
            talk: Some(2300.0),
            talkf: Some(9.0),
            temperature: Some(12.0),
            ..Default::default()
        }];

        apply_quality_flags(&mut rows, &[(Variable::Dic, Flag::Dic)]);

        assert_eq!(rows[0].talk, Some(2300.0));
        assert_eq!(rows[0].temperature, Some(12.0));
    }

    #[test]
    fn should_drop_rows_missing_required_variables() {
        let no_silicate = SubsetRecord {
            silicate: None,
            ..complete()
        };

        let kept = drop_incomplete(vec![complete(), no_silicate, complete()], &REQUIRED);

        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn should_drop_april_31() {
        let valid = SubsetRecord {
            year: Some(1993.0),
            month: Some(5.0),
            day: Some(1.0),
            hour: Some(6.0),
            ..Default::default()
        };
        let invalid = SubsetRecord {
            month: Some(4.0),
            day: Some(31.0),
            ..valid.clone()
        };

        let dated = drop_invalid_dates(vec![invalid, valid.clone()]);

        assert_eq!(dated.len(), 1);
        assert_eq!(dated[0].1, valid);
    }

    #[test]
    fn should_drop_rows_without_hour() {
        let valid = SubsetRecord {
            year: Some(1993.0),
            month: Some(5.0),
            day: Some(1.0),
            hour: Some(6.0),
            ..Default::default()
        };
        let no_hour = SubsetRecord {
            hour: None,
            ..valid.clone()
        };

        let dated = drop_invalid_dates(vec![no_hour, valid.clone()]);

        assert_eq!(dated.len(), 1);
        assert_eq!(dated[0].1, valid);
    }
}
