//! Daily cycle observations.
//!
//! A [`CycleEntry`] is one subject-date record as captured by the journaling
//! layer. Only `date` and `is_period` drive segmentation; the remaining fields
//! are carried for display, symptom tallies and export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Plausible basal body temperature range in °C.
pub const BASAL_TEMPERATURE_RANGE: (f64, f64) = (34.0, 43.0);

/// Flow intensity on a period day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowIntensity {
    Spotting,
    Light,
    Medium,
    Heavy,
}

/// Self-reported period pain severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainLevel {
    None,
    Mild,
    Moderate,
    Severe,
}

/// Cervical mucus observation. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CervicalMucus {
    Dry,
    Sticky,
    Creamy,
    Watery,
    EggWhite,
}

/// Who or what recorded an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    #[default]
    SelfReported,
    Practitioner,
    Imported,
}

macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().replace('-', "_").as_str() {
                    $($text => Ok($ty::$variant),)+
                    _ => Err(format!("Unknown {}: {}", stringify!($ty), s)),
                }
            }
        }
    };
}

string_enum!(FlowIntensity {
    Spotting => "spotting",
    Light => "light",
    Medium => "medium",
    Heavy => "heavy",
});

string_enum!(PainLevel {
    None => "none",
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

string_enum!(CervicalMucus {
    Dry => "dry",
    Sticky => "sticky",
    Creamy => "creamy",
    Watery => "watery",
    EggWhite => "egg_white",
});

string_enum!(EntrySource {
    SelfReported => "self_reported",
    Practitioner => "practitioner",
    Imported => "imported",
});

/// The closed set of trackable symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    Cramps,
    Bloating,
    Headache,
    BreastTenderness,
    MoodSwings,
    Fatigue,
    Acne,
    Cravings,
    Insomnia,
    WaterRetention,
    BackPain,
    Nausea,
    HighLibido,
}

impl Symptom {
    pub const ALL: [Symptom; 13] = [
        Symptom::Cramps,
        Symptom::Bloating,
        Symptom::Headache,
        Symptom::BreastTenderness,
        Symptom::MoodSwings,
        Symptom::Fatigue,
        Symptom::Acne,
        Symptom::Cravings,
        Symptom::Insomnia,
        Symptom::WaterRetention,
        Symptom::BackPain,
        Symptom::Nausea,
        Symptom::HighLibido,
    ];
}

string_enum!(Symptom {
    Cramps => "cramps",
    Bloating => "bloating",
    Headache => "headache",
    BreastTenderness => "breast_tenderness",
    MoodSwings => "mood_swings",
    Fatigue => "fatigue",
    Acne => "acne",
    Cravings => "cravings",
    Insomnia => "insomnia",
    WaterRetention => "water_retention",
    BackPain => "back_pain",
    Nausea => "nausea",
    HighLibido => "high_libido",
});

/// Symptom flags for one day. Absent fields deserialize as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Symptoms {
    pub cramps: bool,
    pub bloating: bool,
    pub headache: bool,
    pub breast_tenderness: bool,
    pub mood_swings: bool,
    pub fatigue: bool,
    pub acne: bool,
    pub cravings: bool,
    pub insomnia: bool,
    pub water_retention: bool,
    pub back_pain: bool,
    pub nausea: bool,
    pub high_libido: bool,
}

impl Symptoms {
    pub fn has(&self, symptom: Symptom) -> bool {
        match symptom {
            Symptom::Cramps => self.cramps,
            Symptom::Bloating => self.bloating,
            Symptom::Headache => self.headache,
            Symptom::BreastTenderness => self.breast_tenderness,
            Symptom::MoodSwings => self.mood_swings,
            Symptom::Fatigue => self.fatigue,
            Symptom::Acne => self.acne,
            Symptom::Cravings => self.cravings,
            Symptom::Insomnia => self.insomnia,
            Symptom::WaterRetention => self.water_retention,
            Symptom::BackPain => self.back_pain,
            Symptom::Nausea => self.nausea,
            Symptom::HighLibido => self.high_libido,
        }
    }

    pub fn set(&mut self, symptom: Symptom, present: bool) {
        let flag = match symptom {
            Symptom::Cramps => &mut self.cramps,
            Symptom::Bloating => &mut self.bloating,
            Symptom::Headache => &mut self.headache,
            Symptom::BreastTenderness => &mut self.breast_tenderness,
            Symptom::MoodSwings => &mut self.mood_swings,
            Symptom::Fatigue => &mut self.fatigue,
            Symptom::Acne => &mut self.acne,
            Symptom::Cravings => &mut self.cravings,
            Symptom::Insomnia => &mut self.insomnia,
            Symptom::WaterRetention => &mut self.water_retention,
            Symptom::BackPain => &mut self.back_pain,
            Symptom::Nausea => &mut self.nausea,
            Symptom::HighLibido => &mut self.high_libido,
        };
        *flag = present;
    }

    /// Symptoms flagged present, in [`Symptom::ALL`] order.
    pub fn present(&self) -> Vec<Symptom> {
        Symptom::ALL.into_iter().filter(|s| self.has(*s)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present().is_empty()
    }
}

impl FromIterator<Symptom> for Symptoms {
    fn from_iter<I: IntoIterator<Item = Symptom>>(iter: I) -> Self {
        let mut symptoms = Symptoms::default();
        for s in iter {
            symptoms.set(s, true);
        }
        symptoms
    }
}

/// One subject-date observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_period: bool,
    #[serde(default)]
    pub flow_intensity: Option<FlowIntensity>,
    #[serde(default)]
    pub period_pain: Option<PainLevel>,
    #[serde(default)]
    pub symptoms: Symptoms,
    #[serde(default)]
    pub cervical_mucus: Option<CervicalMucus>,
    /// Basal body temperature in °C
    #[serde(default)]
    pub basal_temperature: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source: EntrySource,
}

impl CycleEntry {
    /// A bare entry for `date` with nothing flagged.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            is_period: false,
            flow_intensity: None,
            period_pain: None,
            symptoms: Symptoms::default(),
            cervical_mucus: None,
            basal_temperature: None,
            notes: None,
            source: EntrySource::default(),
        }
    }

    /// A period-day entry for `date`.
    pub fn period(date: NaiveDate) -> Self {
        Self {
            is_period: true,
            ..Self::new(date)
        }
    }

    pub fn with_flow(mut self, flow: FlowIntensity) -> Self {
        self.flow_intensity = Some(flow);
        self
    }

    pub fn with_symptom(mut self, symptom: Symptom) -> Self {
        self.symptoms.set(symptom, true);
        self
    }

    /// Reject entries that cannot describe a real day.
    ///
    /// # Errors
    /// Returns an error if a flow intensity is set on a non-period day, or if
    /// `basal_temperature` is not finite or lies outside
    /// [`BASAL_TEMPERATURE_RANGE`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.flow_intensity.is_some() && !self.is_period {
            return Err(ValidationError::InvalidValue {
                field: "flow_intensity".to_string(),
                message: "flow is only recorded on period days".to_string(),
            });
        }
        if let Some(temp) = self.basal_temperature {
            let (min, max) = BASAL_TEMPERATURE_RANGE;
            if !temp.is_finite() || temp < min || temp > max {
                return Err(ValidationError::InvalidValue {
                    field: "basal_temperature".to_string(),
                    message: format!("{temp} is outside {min}-{max} °C"),
                });
            }
        }
        Ok(())
    }
}
