//! Carbonate-system solver used to derive pCO2 from pH and DIC.
//!
//! The pipeline only depends on [`CarbonateSolver`]. [`PhDicSolver`] is the
//! built-in implementation, solving the system from in-situ pH and DIC.
//!
//! # References
//!
//! - Weiss (1974): CO2 solubility and fugacity coefficient.
//! - Lueker, Dickson & Keeling (2000): K1 and K2 on the total pH scale.
//! - Millero (1995): pressure dependence of K1 and K2.
//!
//! # Units
//!
//! - Temperature: °C
//! - Pressure: bar (gauge, 0 at the surface)
//! - Concentrations: µmol/kg
//! - pCO2 and fCO2: µatm

/// Total boron passed to the solver, in µmol/kg.
pub const DEFAULT_TOTAL_BORON: f64 = 415.7;

/// Gas constant in cm³ bar / (mol K).
const R_BAR: f64 = 83.14472;
/// Gas constant in cm³ atm / (mol K).
const R_ATM: f64 = 82.05736;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonateInput {
    /// In-situ pH on the total scale.
    pub ph: f64,
    pub dic: f64,
    pub temperature: f64,
    pub salinity: f64,
    pub pressure: f64,
    pub phosphate: f64,
    pub silicate: f64,
    pub total_boron: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonateSystem {
    pub pco2: f64,
    pub fco2: f64,
    /// Dissolved CO2 (CO2*), µmol/kg.
    pub co2: f64,
    pub hco3: f64,
    pub co3: f64,
}

/// A pure function from measured carbonate parameters to the full system.
pub trait CarbonateSolver {
    fn solve(&self, input: &CarbonateInput) -> CarbonateSystem;
}

/// Solves from pH and DIC.
///
/// With pH and DIC fixed the speciation does not depend on phosphate,
/// silicate or boron; they are accepted so the solver can be swapped for one
/// that also returns alkalinity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhDicSolver;

impl CarbonateSolver for PhDicSolver {
    fn solve(&self, input: &CarbonateInput) -> CarbonateSystem {
        let tk = input.temperature + 273.15;
        let (k1, k2) = dissociation_constants(input.temperature, input.salinity, input.pressure);
        let k0 = solubility(tk, input.salinity);

        let h = 10f64.powf(-input.ph);
        let dic = input.dic * 1e-6;
        let denominator = h * h + k1 * h + k1 * k2;

        let co2 = dic * h * h / denominator;
        let hco3 = dic * k1 * h / denominator;
        let co3 = dic * k1 * k2 / denominator;

        let fco2 = co2 / k0 * 1e6;
        let pco2 = fco2 / fugacity_coefficient(tk);

        CarbonateSystem {
            pco2,
            fco2,
            co2: co2 * 1e6,
            hco3: hco3 * 1e6,
            co3: co3 * 1e6,
        }
    }
}

/// K0 in mol/(kg atm).
fn solubility(tk: f64, salinity: f64) -> f64 {
    let t100 = tk / 100.0;
    let ln_k0 = -60.2409 + 93.4517 / t100 + 23.3585 * t100.ln()
        + salinity * (0.023517 - 0.023656 * t100 + 0.0047036 * t100 * t100);

    ln_k0.exp()
}

/// K1 and K2 at in-situ pressure.
fn dissociation_constants(temperature: f64, salinity: f64, pressure: f64) -> (f64, f64) {
    let tk = temperature + 273.15;
    let s = salinity;

    let pk1 = 3633.86 / tk - 61.2172 + 9.6777 * tk.ln() - 0.011555 * s + 0.0001152 * s * s;
    let pk2 = 471.78 / tk + 25.9290 - 3.16967 * tk.ln() - 0.01781 * s + 0.0001122 * s * s;

    let k1 = 10f64.powf(-pk1) * pressure_factor(temperature, pressure, (-25.50, 0.1271), (-3.08, 0.0877));
    let k2 = 10f64.powf(-pk2) * pressure_factor(temperature, pressure, (-15.82, -0.0219), (1.13, -0.1475));

    (k1, k2)
}

/// Ratio K(P)/K(0) from the partial molal volume and compressibility changes.
fn pressure_factor(temperature: f64, pressure: f64, volume: (f64, f64), compressibility: (f64, f64)) -> f64 {
    let rt = R_BAR * (temperature + 273.15);
    let dv = volume.0 + volume.1 * temperature;
    let dk = (compressibility.0 + compressibility.1 * temperature) * 1e-3;

    (-(dv / rt) * pressure + 0.5 * (dk / rt) * pressure * pressure).exp()
}

/// fCO2 / pCO2 at one atmosphere.
fn fugacity_coefficient(tk: f64) -> f64 {
    let b = -1636.75 + 12.0408 * tk - 0.0327957 * tk.powi(2) + 3.16528e-5 * tk.powi(3);
    let delta = 57.7 - 0.118 * tk;

    ((b + 2.0 * delta) / (R_ATM * tk)).exp()
}
