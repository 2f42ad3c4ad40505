//! Symptom catalog and per-session selections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

macro_rules! symptom_catalog {
    ($($variant:ident => $id:literal),+ $(,)?) => {
        /// A symptom from the fixed catalog
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Symptom {
            $($variant),+
        }

        impl Symptom {
            /// Every symptom, in display order
            pub const ALL: &'static [Symptom] = &[$(Symptom::$variant),+];

            /// Catalog identifier as shown to the user
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Symptom::$variant => $id),+
                }
            }
        }
    };
}

symptom_catalog! {
    Fever => "fever",
    Cough => "cough",
    Headache => "headache",
    Fatigue => "fatigue",
    SoreThroat => "sore_throat",
    Nausea => "nausea",
    Vomiting => "vomiting",
    Diarrhea => "diarrhea",
    Chills => "chills",
    MusclePain => "muscle_pain",
    JointPain => "joint_pain",
    ShortnessBreath => "shortness_breath",
    ChestPain => "chest_pain",
    Dizziness => "dizziness",
    Rash => "rash",
    Sweating => "sweating",
    LossAppetite => "loss_appetite",
    WeightLoss => "weight_loss",
    AbdominalPain => "abdominal_pain",
    BackPain => "back_pain",
    RunnyNose => "runny_nose",
    Sneezing => "sneezing",
    Congestion => "congestion",
    ItchyEyes => "itchy_eyes",
    EarPain => "ear_pain",
    HearingLoss => "hearing_loss",
    VisionBlur => "vision_blur",
    DryMouth => "dry_mouth",
    Thirst => "thirst",
    FrequentUrination => "frequent_urination",
    Swelling => "swelling",
    Bruising => "bruising",
    Bleeding => "bleeding",
    Palpitations => "palpitations",
    Anxiety => "anxiety",
    Depression => "depression",
    Insomnia => "insomnia",
    Confusion => "confusion",
    MemoryLoss => "memory_loss",
    Tremors => "tremors",
    Numbness => "numbness",
    Tingling => "tingling",
    Weakness => "weakness",
    Seizures => "seizures",
    DifficultySwallowing => "difficulty_swallowing",
    Hoarseness => "hoarseness",
    HairLoss => "hair_loss",
    SkinDryness => "skin_dryness",
    Fainting => "fainting",
    NightSweats => "night_sweats",
    SwollenLymphNodes => "swollen_lymph_nodes",
    Jaundice => "jaundice",
    BloodyStool => "bloody_stool",
    Wheezing => "wheezing",
    LossOfSmell => "loss_of_smell",
    JointStiffness => "joint_stiffness",
    ChestTightness => "chest_tightness",
    SensitivityToLight => "sensitivity_to_light",
    UnexplainedFever => "unexplained_fever",
    PersistentCough => "persistent_cough",
}

/// Text that names no catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown symptom: {0}")]
pub struct UnknownSymptom(pub String);

impl FromStr for Symptom {
    type Err = UnknownSymptom;

    /// Only the exact catalog id matches, as sent by the keyboard buttons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symptom::ALL
            .iter()
            .copied()
            .find(|symptom| symptom.as_str() == s)
            .ok_or_else(|| UnknownSymptom(s.to_string()))
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symptoms picked during one session.
///
/// Behaves as a set for matching but remembers the order the user picked
/// them in, which is the order they are read back for confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    symptoms: Vec<Symptom>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symptom. Returns false if it was already selected.
    pub fn insert(&mut self, symptom: Symptom) -> bool {
        if self.contains(symptom) {
            return false;
        }
        self.symptoms.push(symptom);
        true
    }

    pub fn contains(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(&symptom)
    }

    /// True if every symptom in `required` has been selected
    pub fn contains_all(&self, required: &[Symptom]) -> bool {
        required.iter().all(|s| self.contains(*s))
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Symptom> {
        self.symptoms.clone()
    }
}

impl FromIterator<Symptom> for Selection {
    fn from_iter<I: IntoIterator<Item = Symptom>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for symptom in iter {
            selection.insert(symptom);
        }
        selection
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symptom) in self.symptoms.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(symptom.as_str())?;
        }
        Ok(())
    }
}
