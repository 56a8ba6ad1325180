//! Clinical feature vectors for the three classifiers.
//!
//! Field order in each `to_vec()` is the training order of the corresponding
//! model. Reordering fields produces a wrong-but-plausible prediction, so the
//! order is pinned by tests.

use serde::{Deserialize, Serialize};

use super::prediction::DiseaseModel;

/// RPDE value substituted when the input is left blank.
///
/// Earlier releases of the form never collected RPDE and always sent this
/// constant.
pub const LEGACY_RPDE_PLACEHOLDER: f64 = 1.15;

/// DFA value substituted when the input is left blank (see `LEGACY_RPDE_PLACEHOLDER`).
pub const LEGACY_DFA_PLACEHOLDER: f64 = 0.4;

/// Input bounds and labels for a single form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub hint: &'static str,
    pub min: f64,
    pub max: f64,
    /// Whole numbers only (counts, codes and flags)
    pub integer: bool,
    /// May be left blank
    pub optional: bool,
}

impl FieldSpec {
    const fn bounded(label: &'static str, hint: &'static str, min: f64, max: f64) -> Self {
        Self {
            label,
            hint,
            min,
            max,
            integer: false,
            optional: false,
        }
    }

    const fn whole(label: &'static str, hint: &'static str, min: f64, max: f64) -> Self {
        Self {
            label,
            hint,
            min,
            max,
            integer: true,
            optional: false,
        }
    }

    const fn free(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            integer: false,
            optional: false,
        }
    }

    const fn optional(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            integer: false,
            optional: true,
        }
    }

    /// Check a single value against this field's bounds.
    ///
    /// # Errors
    /// Returns a message naming the field and the violated bound.
    pub fn check(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("{}: Invalid number", self.label));
        }
        if value < self.min || value > self.max {
            return Err(format!(
                "{}: Value must be between {} and {}",
                self.label, self.min, self.max
            ));
        }
        if self.integer && value.fract() != 0.0 {
            return Err(format!("{}: Must be a whole number", self.label));
        }
        Ok(())
    }
}

/// Diabetes form fields, in model order.
pub const DIABETES_FIELDS: [FieldSpec; 8] = [
    FieldSpec::whole("Pregnancies", "count (0-20)", 0.0, 20.0),
    FieldSpec::whole("Glucose", "mg/dL (0-300)", 0.0, 300.0),
    FieldSpec::whole("Blood Pressure", "mm Hg (0-200)", 0.0, 200.0),
    FieldSpec::whole("Skin Thickness", "mm (0-100)", 0.0, 100.0),
    FieldSpec::whole("Insulin", "mu U/ml (0-1000)", 0.0, 1000.0),
    FieldSpec::bounded("BMI", "kg/m2 (0-70)", 0.0, 70.0),
    FieldSpec::bounded("Pedigree Function", "family history (0-2.5)", 0.0, 2.5),
    FieldSpec::whole("Age", "years (0-120)", 0.0, 120.0),
];

/// Heart disease form fields, in model order.
pub const HEART_FIELDS: [FieldSpec; 13] = [
    FieldSpec::whole("Age", "years (1-120)", 1.0, 120.0),
    FieldSpec::whole("Sex", "1=male, 0=female", 0.0, 1.0),
    FieldSpec::whole("Chest Pain", "type (0-3)", 0.0, 3.0),
    FieldSpec::whole("Resting BP", "mm Hg (80-200)", 80.0, 200.0),
    FieldSpec::whole("Cholesterol", "mg/dL (100-600)", 100.0, 600.0),
    FieldSpec::whole("Fasting BS > 120", "1=true, 0=false", 0.0, 1.0),
    FieldSpec::whole("Resting ECG", "(0-2)", 0.0, 2.0),
    FieldSpec::whole("Max Heart Rate", "bpm (60-220)", 60.0, 220.0),
    FieldSpec::whole("Exercise Angina", "1=yes, 0=no", 0.0, 1.0),
    FieldSpec::bounded("ST Depression", "oldpeak (0-7)", 0.0, 7.0),
    FieldSpec::whole("Slope", "(0-2)", 0.0, 2.0),
    FieldSpec::whole("Major Vessels", "(0-3)", 0.0, 3.0),
    FieldSpec::whole("Thal", "(1-3)", 1.0, 3.0),
];

/// Parkinson's form fields, in model order.
pub const PARKINSONS_FIELDS: [FieldSpec; 22] = [
    FieldSpec::free("MDVP:Fo(Hz)", "average vocal frequency"),
    FieldSpec::free("MDVP:Fhi(Hz)", "maximum vocal frequency"),
    FieldSpec::free("MDVP:Flo(Hz)", "minimum vocal frequency"),
    FieldSpec::free("MDVP:Jitter(%)", "pitch variation"),
    FieldSpec::free("MDVP:Jitter(Abs)", "absolute jitter"),
    FieldSpec::free("MDVP:RAP", "relative amplitude perturbation"),
    FieldSpec::free("MDVP:PPQ", "period perturbation quotient"),
    FieldSpec::free("Jitter:DDP", "difference of differences"),
    FieldSpec::free("MDVP:Shimmer", "amplitude variation"),
    FieldSpec::free("MDVP:Shimmer(dB)", "shimmer in dB"),
    FieldSpec::free("Shimmer:APQ3", "3-point amplitude quotient"),
    FieldSpec::free("Shimmer:APQ5", "5-point amplitude quotient"),
    FieldSpec::free("MDVP:APQ", "11-point amplitude quotient"),
    FieldSpec::free("Shimmer:DDA", "difference of differences"),
    FieldSpec::free("NHR", "noise-to-harmonics ratio"),
    FieldSpec::free("HNR", "harmonics-to-noise ratio"),
    FieldSpec::optional("RPDE", "blank = legacy 1.15"),
    FieldSpec::optional("DFA", "blank = legacy 0.4"),
    FieldSpec::free("spread1", "nonlinear F0 spread"),
    FieldSpec::free("spread2", "nonlinear F0 spread"),
    FieldSpec::free("D2", "correlation dimension"),
    FieldSpec::free("PPE", "pitch period entropy"),
];

/// Field table for a model.
#[must_use]
pub fn field_specs(model: DiseaseModel) -> &'static [FieldSpec] {
    match model {
        DiseaseModel::Diabetes => &DIABETES_FIELDS,
        DiseaseModel::HeartDisease => &HEART_FIELDS,
        DiseaseModel::Parkinsons => &PARKINSONS_FIELDS,
    }
}

fn check_all(specs: &[FieldSpec], values: &[f64]) -> Result<(), Vec<String>> {
    let errors: Vec<String> = specs
        .iter()
        .zip(values)
        .filter_map(|(spec, v)| spec.check(*v).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn expect_len(model: DiseaseModel, v: &[f64]) -> Result<(), String> {
    let expected = model.feature_count();
    if v.len() != expected {
        return Err(format!("Expected {expected} features, got {}", v.len()));
    }
    Ok(())
}

/// Pima diabetes features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DiabetesFeatures {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree: f64,
    pub age: f64,
}

impl DiabetesFeatures {
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree,
            self.age,
        ]
    }

    /// # Errors
    /// Returns error if vector length is not 8.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        expect_len(DiseaseModel::Diabetes, v)?;
        Ok(Self {
            pregnancies: v[0],
            glucose: v[1],
            blood_pressure: v[2],
            skin_thickness: v[3],
            insulin: v[4],
            bmi: v[5],
            diabetes_pedigree: v[6],
            age: v[7],
        })
    }

    /// # Errors
    /// Returns every violated bound.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        check_all(&DIABETES_FIELDS, &self.to_vec())
    }
}

/// Cleveland heart disease features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HeartFeatures {
    pub age: f64,
    /// 1 = male, 0 = female
    pub sex: f64,
    /// Chest pain type (0-3)
    pub cp: f64,
    /// Resting blood pressure in mm Hg
    pub trestbps: f64,
    /// Serum cholesterol in mg/dL
    pub chol: f64,
    /// Fasting blood sugar > 120 mg/dL
    pub fbs: f64,
    pub restecg: f64,
    /// Maximum heart rate achieved
    pub thalach: f64,
    /// Exercise-induced angina
    pub exang: f64,
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
}

impl HeartFeatures {
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }

    /// # Errors
    /// Returns error if vector length is not 13.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        expect_len(DiseaseModel::HeartDisease, v)?;
        Ok(Self {
            age: v[0],
            sex: v[1],
            cp: v[2],
            trestbps: v[3],
            chol: v[4],
            fbs: v[5],
            restecg: v[6],
            thalach: v[7],
            exang: v[8],
            oldpeak: v[9],
            slope: v[10],
            ca: v[11],
            thal: v[12],
        })
    }

    /// # Errors
    /// Returns every violated bound.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        check_all(&HEART_FIELDS, &self.to_vec())
    }
}

/// Oxford Parkinson's voice measurements.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ParkinsonsFeatures {
    pub fo: f64,
    pub fhi: f64,
    pub flo: f64,
    pub jitter_percent: f64,
    pub jitter_abs: f64,
    pub rap: f64,
    pub ppq: f64,
    pub ddp: f64,
    pub shimmer: f64,
    pub shimmer_db: f64,
    pub apq3: f64,
    pub apq5: f64,
    pub apq: f64,
    pub dda: f64,
    pub nhr: f64,
    pub hnr: f64,
    /// Recurrence period density entropy; `None` falls back to the legacy constant
    pub rpde: Option<f64>,
    /// Detrended fluctuation analysis; `None` falls back to the legacy constant
    pub dfa: Option<f64>,
    pub spread1: f64,
    pub spread2: f64,
    pub d2: f64,
    pub ppe: f64,
}

impl ParkinsonsFeatures {
    /// Whether the vector will carry the legacy RPDE/DFA constants.
    #[must_use]
    pub fn uses_placeholders(&self) -> bool {
        self.rpde.is_none() || self.dfa.is_none()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.fo,
            self.fhi,
            self.flo,
            self.jitter_percent,
            self.jitter_abs,
            self.rap,
            self.ppq,
            self.ddp,
            self.shimmer,
            self.shimmer_db,
            self.apq3,
            self.apq5,
            self.apq,
            self.dda,
            self.nhr,
            self.hnr,
            self.rpde.unwrap_or(LEGACY_RPDE_PLACEHOLDER),
            self.dfa.unwrap_or(LEGACY_DFA_PLACEHOLDER),
            self.spread1,
            self.spread2,
            self.d2,
            self.ppe,
        ]
    }

    /// # Errors
    /// Returns error if vector length is not 22.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        expect_len(DiseaseModel::Parkinsons, v)?;
        Ok(Self {
            fo: v[0],
            fhi: v[1],
            flo: v[2],
            jitter_percent: v[3],
            jitter_abs: v[4],
            rap: v[5],
            ppq: v[6],
            ddp: v[7],
            shimmer: v[8],
            shimmer_db: v[9],
            apq3: v[10],
            apq5: v[11],
            apq: v[12],
            dda: v[13],
            nhr: v[14],
            hnr: v[15],
            rpde: Some(v[16]),
            dfa: Some(v[17]),
            spread1: v[18],
            spread2: v[19],
            d2: v[20],
            ppe: v[21],
        })
    }

    /// # Errors
    /// Returns every violated bound.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        check_all(&PARKINSONS_FIELDS, &self.to_vec())
    }
}

/// A complete, typed input for one of the classifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ClinicalInput {
    Diabetes(DiabetesFeatures),
    Heart(HeartFeatures),
    Parkinsons(ParkinsonsFeatures),
}

impl ClinicalInput {
    /// Build from form values in model order. `None` marks a blank field.
    ///
    /// # Errors
    /// Returns a message if the count is wrong or a required field is blank.
    pub fn from_values(model: DiseaseModel, values: &[Option<f64>]) -> Result<Self, String> {
        let specs = field_specs(model);
        if values.len() != specs.len() {
            return Err(format!(
                "Expected {} features, got {}",
                specs.len(),
                values.len()
            ));
        }

        if let Some(spec) = specs
            .iter()
            .zip(values)
            .find(|(spec, v)| v.is_none() && !spec.optional)
            .map(|(spec, _)| spec)
        {
            return Err(format!("{}: Required", spec.label));
        }

        let filled: Vec<f64> = values.iter().map(|v| v.unwrap_or_default()).collect();
        match model {
            DiseaseModel::Diabetes => DiabetesFeatures::from_vec(&filled).map(Self::Diabetes),
            DiseaseModel::HeartDisease => HeartFeatures::from_vec(&filled).map(Self::Heart),
            DiseaseModel::Parkinsons => {
                let mut features = ParkinsonsFeatures::from_vec(&filled)?;
                features.rpde = values[16];
                features.dfa = values[17];
                Ok(Self::Parkinsons(features))
            }
        }
    }

    #[must_use]
    pub fn model(&self) -> DiseaseModel {
        match self {
            Self::Diabetes(_) => DiseaseModel::Diabetes,
            Self::Heart(_) => DiseaseModel::HeartDisease,
            Self::Parkinsons(_) => DiseaseModel::Parkinsons,
        }
    }

    /// Ordered feature vector for the model.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Self::Diabetes(f) => f.to_vec(),
            Self::Heart(f) => f.to_vec(),
            Self::Parkinsons(f) => f.to_vec(),
        }
    }

    /// # Errors
    /// Returns every violated bound.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        match self {
            Self::Diabetes(f) => f.validate(),
            Self::Heart(f) => f.validate(),
            Self::Parkinsons(f) => f.validate(),
        }
    }

    /// Whether legacy constants stand in for unmeasured values.
    #[must_use]
    pub fn uses_placeholders(&self) -> bool {
        matches!(self, Self::Parkinsons(f) if f.uses_placeholders())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_heart() -> HeartFeatures {
        HeartFeatures {
            age: 63.0,
            sex: 1.0,
            cp: 3.0,
            trestbps: 145.0,
            chol: 233.0,
            fbs: 1.0,
            restecg: 0.0,
            thalach: 150.0,
            exang: 0.0,
            oldpeak: 2.3,
            slope: 0.0,
            ca: 0.0,
            thal: 1.0,
        }
    }

    #[test]
    fn test_diabetes_order() {
        let features = DiabetesFeatures {
            pregnancies: 6.0,
            glucose: 148.0,
            blood_pressure: 72.0,
            skin_thickness: 35.0,
            insulin: 0.0,
            bmi: 33.6,
            diabetes_pedigree: 0.627,
            age: 50.0,
        };
        let v = features.to_vec();
        assert_eq!(v, vec![6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]);
        assert_eq!(DiabetesFeatures::from_vec(&v).expect("Should parse"), features);
        assert!(features.validate().is_ok());
    }

    #[test]
    fn test_heart_order_and_validation() {
        let features = sample_heart();
        let v = features.to_vec();
        assert_eq!(v.len(), 13);
        assert!((v[3] - 145.0).abs() < f64::EPSILON);
        assert!((v[9] - 2.3).abs() < f64::EPSILON);
        assert!(features.validate().is_ok());

        let invalid = HeartFeatures {
            trestbps: 40.0, // below 80
            thal: 0.0,      // below 1
            ..sample_heart()
        };
        let errors = invalid.validate().expect_err("Should reject");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Resting BP"));
    }

    #[test]
    fn test_integer_fields() {
        let fractional = HeartFeatures {
            cp: 1.5,
            ..sample_heart()
        };
        let errors = fractional.validate().expect_err("Should reject");
        assert!(errors[0].contains("whole number"));
    }

    #[test]
    fn test_parkinsons_placeholders() {
        let features = ParkinsonsFeatures {
            fo: 119.992,
            hnr: 21.033,
            ..Default::default()
        };
        assert!(features.uses_placeholders());

        let v = features.to_vec();
        assert_eq!(v.len(), 22);
        assert!((v[16] - LEGACY_RPDE_PLACEHOLDER).abs() < f64::EPSILON);
        assert!((v[17] - LEGACY_DFA_PLACEHOLDER).abs() < f64::EPSILON);

        let measured = ParkinsonsFeatures {
            rpde: Some(0.414783),
            dfa: Some(0.815285),
            ..features
        };
        assert!(!measured.uses_placeholders());
        assert!((measured.to_vec()[16] - 0.414783).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_values_blank_required() {
        let mut values = vec![Some(1.0); 8];
        values[1] = None;
        let err = ClinicalInput::from_values(DiseaseModel::Diabetes, &values)
            .expect_err("Should reject blank glucose");
        assert_eq!(err, "Glucose: Required");
    }

    #[test]
    fn test_from_values_optional_parkinsons() {
        let mut values = vec![Some(0.5); 22];
        values[16] = None;
        values[17] = None;
        let input = ClinicalInput::from_values(DiseaseModel::Parkinsons, &values)
            .expect("Blank RPDE/DFA is allowed");
        assert_eq!(input.model(), DiseaseModel::Parkinsons);
        assert!(input.uses_placeholders());
        assert!((input.to_vec()[17] - LEGACY_DFA_PLACEHOLDER).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_values_wrong_count() {
        let err = ClinicalInput::from_values(DiseaseModel::HeartDisease, &[Some(1.0); 9])
            .expect_err("Should reject");
        assert!(err.contains("Expected 13"));
    }

    #[test]
    fn test_field_tables_match_models() {
        for model in DiseaseModel::ALL {
            assert_eq!(field_specs(model).len(), model.feature_count());
        }
    }
}
