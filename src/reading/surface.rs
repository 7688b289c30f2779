//! Surface product: the shallowest good sample of every profile.

use chrono::NaiveDateTime;

use super::record::{ProfileKey, SubsetRecord};
use crate::{
    chemistry::{CarbonateInput, CarbonateSolver},
    grid::LonConvention,
    group::group_reduce,
};

/// Depth in metres above which a sample counts as surface water.
pub const DEFAULT_SURFACE_DEPTH: f64 = 20.0;

/// GLODAP pressures are in dbar, the solver takes bar.
const DBAR_PER_BAR: f64 = 10.0;

/// A dated sample with its derived pCO2.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub time: NaiveDateTime,
    pub profile: Option<ProfileKey>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub depth: Option<f64>,
    pub pco2: f64,
}

/// One row of the surface product.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRecord {
    pub time: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
    pub depth: f64,
    pub spco2: f64,
}

/// Solver input for a record, or `None` if a required value is missing.
pub fn carbonate_input(record: &SubsetRecord, total_boron: f64) -> Option<CarbonateInput> {
    Some(CarbonateInput {
        ph: record.phtsinsitutp?,
        dic: record.tco2?,
        temperature: record.temperature?,
        salinity: record.salinity?,
        pressure: record.pressure? / DBAR_PER_BAR,
        phosphate: record.phosphate?,
        silicate: record.silicate?,
        total_boron,
    })
}

/// Derives pCO2 for every dated record and normalizes its longitude.
/// Records missing a solver input are skipped.
pub fn derive_observations<S: CarbonateSolver>(
    dated: Vec<(NaiveDateTime, SubsetRecord)>,
    solver: &S,
    convention: LonConvention,
    total_boron: f64,
) -> Vec<Observation> {
    dated
        .into_iter()
        .filter_map(|(time, record)| {
            let input = carbonate_input(&record, total_boron)?;
            let system = solver.solve(&input);

            Some(Observation {
                time,
                profile: record.profile(),
                lat: record.latitude,
                lon: record.longitude.map(|lon| convention.normalize(lon)),
                depth: record.depth,
                pco2: system.pco2,
            })
        })
        .collect()
}

/// Keeps the minimum-depth observation of each profile, the first on ties.
///
/// Observations without a full profile key or without a depth are ignored.
/// The result is ordered by profile.
pub fn shallowest_per_profile(observations: Vec<Observation>) -> Vec<Observation> {
    group_reduce(
        observations.into_iter().filter(|o| o.depth.is_some()),
        |o| o.profile,
        |group| {
            group
                .into_iter()
                .min_by(|a, b| a.depth.unwrap_or(f64::INFINITY).total_cmp(&b.depth.unwrap_or(f64::INFINITY)))
        },
    )
    .into_values()
    .collect()
}

/// Keeps complete observations no deeper than `threshold`.
pub fn within_surface_layer(observations: Vec<Observation>, threshold: f64) -> Vec<SurfaceRecord> {
    observations
        .into_iter()
        .filter_map(|o| {
            let record = SurfaceRecord {
                time: o.time,
                lat: o.lat?,
                lon: o.lon?,
                depth: o.depth?,
                spco2: o.pco2,
            };
            let finite = [record.lat, record.lon, record.depth, record.spco2]
                .iter()
                .all(|v| v.is_finite());

            (finite && record.depth <= threshold).then_some(record)
        })
        .collect()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::chemistry::{CarbonateSystem, DEFAULT_TOTAL_BORON};

    /// Reports the input pressure as pCO2.
    struct EchoPressure;

    impl CarbonateSolver for EchoPressure {
        fn solve(&self, input: &CarbonateInput) -> CarbonateSystem {
            CarbonateSystem {
                pco2: input.pressure,
                fco2: 0.0,
                co2: 0.0,
                hco3: 0.0,
                co3: 0.0,
            }
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2004, 8, 9).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn obs(cast: f64, depth: f64, pco2: f64) -> Observation {
        Observation {
            time: noon(),
            profile: Some(ProfileKey {
                cruise: 270.0,
                station: 4.0,
                cast,
            }),
            lat: Some(-42.0),
            lon: Some(150.0),
            depth: Some(depth),
            pco2,
        }
    }

    fn full_record() -> SubsetRecord {
        SubsetRecord {
            phtsinsitutp: Some(8.05),
            tco2: Some(2010.0),
            talk: Some(2300.0),
            temperature: Some(18.2),
            salinity: Some(35.0),
            pressure: Some(55.0),
            silicate: Some(2.1),
            phosphate: Some(0.4),
            latitude: Some(10.0),
            longitude: Some(-30.0),
            depth: Some(5.0),
            cruise: Some(1.0),
            station: Some(1.0),
            cast: Some(1.0),
            ..Default::default()
        }
    }

    #[test]
    fn should_keep_shallowest_within_threshold() {
        let profile = vec![obs(1.0, 15.0, 2.0), obs(1.0, 5.0, 1.0), obs(1.0, 40.0, 3.0)];

        let surface = within_surface_layer(shallowest_per_profile(profile), 20.0);

        assert_eq!(surface.len(), 1);
        assert_eq!(surface[0].depth, 5.0);
        assert_eq!(surface[0].spco2, 1.0);
    }

    #[test]
    fn should_drop_deep_profile() {
        let profile = vec![obs(2.0, 35.0, 1.0), obs(2.0, 60.0, 2.0)];

        let surface = within_surface_layer(shallowest_per_profile(profile), DEFAULT_SURFACE_DEPTH);

        assert!(surface.is_empty());
    }

    #[test]
    fn should_select_per_profile() {
        let rows = vec![obs(2.0, 8.0, 20.0), obs(1.0, 3.0, 10.0), obs(2.0, 4.0, 21.0), obs(1.0, 9.0, 11.0)];

        let shallowest = shallowest_per_profile(rows);

        let picked: Vec<_> = shallowest.iter().map(|o| o.pco2).collect();
        assert_eq!(picked, vec![10.0, 21.0]);
    }

    #[test]
    fn should_take_first_on_depth_tie() {
        let shallowest = shallowest_per_profile(vec![obs(1.0, 5.0, 1.0), obs(1.0, 5.0, 2.0)]);

        assert_eq!(shallowest[0].pco2, 1.0);
    }

    #[test]
    fn should_ignore_unkeyed_and_undepthed() {
        let mut unkeyed = obs(1.0, 1.0, 99.0);
        unkeyed.profile = None;
        let mut undepthed = obs(1.0, 0.0, 98.0);
        undepthed.depth = None;

        let shallowest = shallowest_per_profile(vec![unkeyed, undepthed, obs(1.0, 10.0, 5.0)]);

        assert_eq!(shallowest.len(), 1);
        assert_eq!(shallowest[0].pco2, 5.0);
    }

    #[test]
    fn should_convert_pressure_and_normalize_longitude() {
        let observations = derive_observations(
            vec![(noon(), full_record())],
            &EchoPressure,
            LonConvention::ZeroTo360,
            DEFAULT_TOTAL_BORON,
        );

        assert_eq!(observations.len(), 1);
        assert_relative_eq!(observations[0].pco2, 5.5);
        assert_eq!(observations[0].lon, Some(330.0));
    }

    #[test]
    fn should_skip_records_without_solver_inputs() {
        let record = SubsetRecord {
            tco2: None,
            ..full_record()
        };

        assert!(carbonate_input(&record, DEFAULT_TOTAL_BORON).is_none());
    }

    #[test]
    fn should_drop_observations_without_position() {
        let mut o = obs(1.0, 2.0, 1.0);
        o.lat = None;

        assert!(within_surface_layer(vec![o], 20.0).is_empty());
    }
}
