//! Rule-based condition matching
//!
//! An ordered table of (required symptoms, diagnosis) records scanned
//! first-match-wins. Several rules overlap, so the table order is part of
//! the behavior.

mod catalog;

#[cfg(test)]
mod proptests;

pub use catalog::{Selection, Symptom};

use serde::Serialize;

/// A condition label with the advice shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    pub label: &'static str,
    pub advisory: &'static str,
}

impl Diagnosis {
    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN.label
    }
}

/// A single matching rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub requires: &'static [Symptom],
    pub diagnosis: Diagnosis,
}

impl Rule {
    const fn new(requires: &'static [Symptom], label: &'static str, advisory: &'static str) -> Self {
        Self {
            requires,
            diagnosis: Diagnosis { label, advisory },
        }
    }

    pub fn matches(&self, selection: &Selection) -> bool {
        selection.contains_all(self.requires)
    }
}

/// Returned when no rule matches
pub const UNKNOWN: Diagnosis = Diagnosis {
    label: "unknown",
    advisory: "This might be a rare disease. Please contact a doctor.",
};

use catalog::Symptom::{
    AbdominalPain, Anxiety, ChestPain, ChestTightness, Cough, Diarrhea, Fatigue, Fever,
    FrequentUrination, Headache, Insomnia, ItchyEyes, Jaundice, JointPain, JointStiffness,
    LossOfSmell, MusclePain, Nausea, NightSweats, Palpitations, PersistentCough, Rash, RunnyNose,
    SensitivityToLight, ShortnessBreath, Sneezing, SoreThroat, Swelling, SwollenLymphNodes,
    Thirst, UnexplainedFever, VisionBlur, Vomiting, WeightLoss, Wheezing,
};

/// Rule table in priority order. Do not reorder.
pub static RULES: &[Rule] = &[
    Rule::new(
        &[Fever, Cough, Fatigue, MusclePain],
        "flu",
        "You might have the flu. Rest, stay hydrated, and see a doctor if symptoms worsen.",
    ),
    Rule::new(
        &[RunnyNose, Sneezing, SoreThroat],
        "cold",
        "It could be a cold. Gargle salt water and get plenty of rest.",
    ),
    Rule::new(
        &[Headache, VisionBlur, SensitivityToLight],
        "migraine",
        "You may have a migraine. Avoid bright lights and rest in a quiet place.",
    ),
    Rule::new(
        &[Cough, ShortnessBreath, ChestPain, Fever],
        "pneumonia",
        "Possible pneumonia. Seek medical attention immediately.",
    ),
    Rule::new(
        &[Nausea, Vomiting, Diarrhea, AbdominalPain],
        "gastroenteritis",
        "Likely gastroenteritis. Stay hydrated and avoid solid food for now.",
    ),
    Rule::new(
        &[Anxiety, Palpitations, Insomnia],
        "anxiety_disorder",
        "You might be experiencing anxiety. Try deep breathing or consult a specialist.",
    ),
    Rule::new(
        &[Thirst, FrequentUrination, Fatigue],
        "diabetes",
        "Possible diabetes symptoms. Monitor your blood sugar and see a doctor.",
    ),
    Rule::new(
        &[ChestPain, Palpitations, Headache],
        "hypertension",
        "Could be hypertension. Check your blood pressure and consult a professional.",
    ),
    Rule::new(
        &[ItchyEyes, Sneezing, Rash],
        "allergy",
        "It might be an allergy. Avoid triggers and consider an antihistamine.",
    ),
    Rule::new(
        &[PersistentCough, NightSweats, WeightLoss, Fever],
        "tuberculosis",
        "Possible tuberculosis. Seek medical attention urgently.",
    ),
    Rule::new(
        &[Jaundice, Nausea, Fatigue, AbdominalPain],
        "hepatitis",
        "You might have hepatitis. Consult a doctor for liver function tests.",
    ),
    Rule::new(
        &[Wheezing, ShortnessBreath, ChestTightness],
        "asthma",
        "Could be asthma. Use an inhaler if available and see a doctor.",
    ),
    Rule::new(
        &[SwollenLymphNodes, NightSweats, UnexplainedFever, WeightLoss],
        "lymphoma",
        "Possible lymphoma. Seek medical evaluation immediately.",
    ),
    Rule::new(
        &[Fever, Cough, LossOfSmell, Fatigue],
        "COVID-19",
        "You might have COVID-19. Isolate and get tested as soon as possible.",
    ),
    Rule::new(
        &[JointPain, JointStiffness, Swelling],
        "arthritis",
        "Could be arthritis. Rest the joint and consult a doctor.",
    ),
];

/// First rule in `rules` satisfied by `selection`
pub fn first_match<'a>(rules: &'a [Rule], selection: &Selection) -> Option<&'a Rule> {
    rules.iter().find(|rule| rule.matches(selection))
}

/// Classify a selection against the built-in rule table.
///
/// Falls back to [`UNKNOWN`] when nothing matches, including for an empty
/// selection.
pub fn classify(selection: &Selection) -> Diagnosis {
    first_match(RULES, selection).map_or(UNKNOWN, |rule| rule.diagnosis)
}
