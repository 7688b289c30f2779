//! GLODAPv2 rows as typed records.
//!
//! Every numeric cell is optional: `-9999`, `NaN` and empty cells all read as
//! `None`. See the GLODAPv2 product documentation (Olsen et al., 2016) for the
//! column definitions.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Missing-value sentinel used throughout the merged master file.
pub const MISSING_SENTINEL: f64 = -9999.0;

/// Flag value marking a measurement as good.
pub const GOOD_FLAG: f64 = 2.0;

/// Columns of the derived subset file, in file order.
pub const SUBSET_COLUMNS: [&str; 23] = [
    "phts25p0",
    "phtsinsitutp",
    "tco2",
    "talk",
    "temperature",
    "salinity",
    "cruise",
    "station",
    "cast",
    "year",
    "month",
    "day",
    "hour",
    "latitude",
    "longitude",
    "bottomdepth",
    "maxsampdepth",
    "bottle",
    "pressure",
    "depth",
    "theta",
    "silicate",
    "phosphate",
];

/// A measured quantity that downstream stages require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    PhInSitu,
    Dic,
    Alkalinity,
    Temperature,
    Salinity,
    Pressure,
    Phosphate,
    Silicate,
}

impl Variable {
    pub fn column(self) -> &'static str {
        match self {
            Variable::PhInSitu => "phtsinsitutp",
            Variable::Dic => "tco2",
            Variable::Alkalinity => "talk",
            Variable::Temperature => "temperature",
            Variable::Salinity => "salinity",
            Variable::Pressure => "pressure",
            Variable::Phosphate => "phosphate",
            Variable::Silicate => "silicate",
        }
    }
}

/// A quality-flag column of the master file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    PhInSitu,
    Dic,
    Alkalinity,
    Salinity,
    Phosphate,
    Silicate,
}

/// Access to the required variables of a record.
pub trait Measured {
    fn value(&self, variable: Variable) -> Option<f64>;
}

/// One row of `GLODAPv2 Merged Master File.csv`, restricted to the columns we use.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MasterRecord {
    #[serde(deserialize_with = "missing_as_none")]
    pub cruise: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub station: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub cast: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub year: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub month: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub day: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub hour: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub bottomdepth: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub maxsampdepth: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub bottle: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub pressure: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub depth: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub theta: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub salinity: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub salinityf: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub phosphate: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub phosphatef: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub silicate: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub silicatef: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub tco2: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub tco2f: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub talk: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub talkf: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub phts25p0: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub phtsinsitutp: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub phtsinsitutpf: Option<f64>,
}

impl MasterRecord {
    pub fn flag(&self, flag: Flag) -> Option<f64> {
        match flag {
            Flag::PhInSitu => self.phtsinsitutpf,
            Flag::Dic => self.tco2f,
            Flag::Alkalinity => self.talkf,
            Flag::Salinity => self.salinityf,
            Flag::Phosphate => self.phosphatef,
            Flag::Silicate => self.silicatef,
        }
    }

    pub fn value_mut(&mut self, variable: Variable) -> &mut Option<f64> {
        match variable {
            Variable::PhInSitu => &mut self.phtsinsitutp,
            Variable::Dic => &mut self.tco2,
            Variable::Alkalinity => &mut self.talk,
            Variable::Temperature => &mut self.temperature,
            Variable::Salinity => &mut self.salinity,
            Variable::Pressure => &mut self.pressure,
            Variable::Phosphate => &mut self.phosphate,
            Variable::Silicate => &mut self.silicate,
        }
    }
}

impl Measured for MasterRecord {
    fn value(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::PhInSitu => self.phtsinsitutp,
            Variable::Dic => self.tco2,
            Variable::Alkalinity => self.talk,
            Variable::Temperature => self.temperature,
            Variable::Salinity => self.salinity,
            Variable::Pressure => self.pressure,
            Variable::Phosphate => self.phosphate,
            Variable::Silicate => self.silicate,
        }
    }
}

/// One row of the derived subset file. Field order is [`SUBSET_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsetRecord {
    #[serde(deserialize_with = "missing_as_none")]
    pub phts25p0: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub phtsinsitutp: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub tco2: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub talk: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub salinity: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub cruise: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub station: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub cast: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub year: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub month: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub day: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub hour: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub bottomdepth: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub maxsampdepth: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub bottle: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub pressure: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub depth: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub theta: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub silicate: Option<f64>,
    #[serde(deserialize_with = "missing_as_none")]
    pub phosphate: Option<f64>,
}

impl SubsetRecord {
    pub fn profile(&self) -> Option<ProfileKey> {
        Some(ProfileKey {
            cruise: self.cruise?,
            station: self.station?,
            cast: self.cast?,
        })
    }

    /// Sampling time, or `None` if the date components do not form a real
    /// calendar date and hour. A missing hour leaves the record undated.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let year = whole(self.year?)?;
        let month = whole(self.month?)?;
        let day = whole(self.day?)?;
        let hour = whole(self.hour?)?;

        let date = NaiveDate::from_ymd_opt(
            i32::try_from(year).ok()?,
            u32::try_from(month).ok()?,
            u32::try_from(day).ok()?,
        )?;
        date.and_hms_opt(u32::try_from(hour).ok()?, 0, 0)
    }
}

impl Measured for SubsetRecord {
    fn value(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::PhInSitu => self.phtsinsitutp,
            Variable::Dic => self.tco2,
            Variable::Alkalinity => self.talk,
            Variable::Temperature => self.temperature,
            Variable::Salinity => self.salinity,
            Variable::Pressure => self.pressure,
            Variable::Phosphate => self.phosphate,
            Variable::Silicate => self.silicate,
        }
    }
}

impl From<MasterRecord> for SubsetRecord {
    fn from(r: MasterRecord) -> Self {
        SubsetRecord {
            phts25p0: r.phts25p0,
            phtsinsitutp: r.phtsinsitutp,
            tco2: r.tco2,
            talk: r.talk,
            temperature: r.temperature,
            salinity: r.salinity,
            cruise: r.cruise,
            station: r.station,
            cast: r.cast,
            year: r.year,
            month: r.month,
            day: r.day,
            hour: r.hour,
            latitude: r.latitude,
            longitude: r.longitude,
            bottomdepth: r.bottomdepth,
            maxsampdepth: r.maxsampdepth,
            bottle: r.bottle,
            pressure: r.pressure,
            depth: r.depth,
            theta: r.theta,
            silicate: r.silicate,
            phosphate: r.phosphate,
        }
    }
}

/// Identifies a profile: one cast at one station of one cruise.
#[derive(Debug, Clone, Copy)]
pub struct ProfileKey {
    pub cruise: f64,
    pub station: f64,
    pub cast: f64,
}

impl Ord for ProfileKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cruise
            .total_cmp(&other.cruise)
            .then(self.station.total_cmp(&other.station))
            .then(self.cast.total_cmp(&other.cast))
    }
}

impl PartialOrd for ProfileKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ProfileKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ProfileKey {}

fn whole(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0).then_some(v as i64)
}

fn missing_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(field) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let field = field.trim();
    if field.is_empty() {
        return Ok(None);
    }

    let value: f64 = field
        .parse()
        .map_err(|_| de::Error::custom(format!("`{field}` is not a number")))?;

    Ok(Some(value).filter(|v| !v.is_nan() && *v != MISSING_SENTINEL))
}

// -- Tests -------------------------------------------------------------------
