use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::{
    CharacterCandidate, CharacterValidator, ClassifierError, VoicePredictor,
};
use crate::domain::{
    Character, ScriptAnalysis, VoiceAssignment, VoiceAssignments, VoiceCategory, character_key,
};

/// The fixed voice sets, one per predicted category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    male: Vec<String>,
    female: Vec<String>,
}

impl VoiceCatalog {
    pub fn new(male: Vec<String>, female: Vec<String>) -> Result<Self, CastingError> {
        if male.is_empty() {
            return Err(CastingError::EmptyVoicePool(VoiceCategory::Male));
        }
        if female.is_empty() {
            return Err(CastingError::EmptyVoicePool(VoiceCategory::Female));
        }
        Ok(Self { male, female })
    }

    pub fn pool(&self, category: VoiceCategory) -> &[String] {
        match category {
            VoiceCategory::Male => &self.male,
            VoiceCategory::Female => &self.female,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CastingError {
    #[error("character validation: {0}")]
    Validation(ClassifierError),
    #[error("voice prediction: {0}")]
    Prediction(ClassifierError),
    #[error("malformed collaborator response: {0}")]
    MalformedResponse(String),
    #[error("no voices configured for the {0} pool")]
    EmptyVoicePool(VoiceCategory),
}

/// Result of the validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub removed: Vec<String>,
    pub removed_lines: usize,
}

/// Document-level validation of detected characters and voice assignment.
pub struct CharacterCasting {
    validator: Arc<dyn CharacterValidator>,
    predictor: Arc<dyn VoicePredictor>,
    catalog: VoiceCatalog,
}

impl CharacterCasting {
    pub fn new(
        validator: Arc<dyn CharacterValidator>,
        predictor: Arc<dyn VoicePredictor>,
        catalog: VoiceCatalog,
    ) -> Self {
        Self {
            validator,
            predictor,
            catalog,
        }
    }

    /// Removes characters the validator does not confirm as speaking parts and
    /// subtracts their lines from `metadata.total_lines`.
    #[tracing::instrument(skip(self, document), fields(detected = document.characters.len()))]
    pub async fn validate(
        &self,
        document: &mut ScriptAnalysis,
    ) -> Result<ValidationOutcome, CastingError> {
        if document.characters.is_empty() {
            return Ok(ValidationOutcome {
                removed: Vec::new(),
                removed_lines: 0,
            });
        }

        let candidates = candidates(&document.characters);
        let verdicts = self
            .validator
            .validate(&candidates)
            .await
            .map_err(CastingError::Validation)?;
        if verdicts.is_empty() {
            return Err(CastingError::Validation(ClassifierError::EmptyResponse));
        }
        let verdicts = by_key(verdicts);

        let mut removed = Vec::new();
        let mut removed_lines = 0;
        document.characters.retain(|character| {
            let keep = verdicts.get(&character.key()).copied().unwrap_or(false);
            if !keep {
                removed.push(character.name.clone());
                removed_lines += character.lines;
            }
            keep
        });
        document.metadata.total_lines = document.metadata.total_lines.saturating_sub(removed_lines);

        tracing::info!(
            kept = document.characters.len(),
            removed = removed.len(),
            "Character validation complete"
        );
        Ok(ValidationOutcome {
            removed,
            removed_lines,
        })
    }

    /// Predicts a category per character and assigns voices round-robin within
    /// each category's pool, busiest speakers first.
    #[tracing::instrument(skip(self, characters), fields(characters = characters.len()))]
    pub async fn assign_voices(
        &self,
        characters: &[Character],
    ) -> Result<VoiceAssignments, CastingError> {
        if characters.is_empty() {
            return Ok(VoiceAssignments::new());
        }

        let predictions = self
            .predictor
            .predict(&candidates(characters))
            .await
            .map_err(CastingError::Prediction)?;
        if predictions.is_empty() {
            return Err(CastingError::Prediction(ClassifierError::EmptyResponse));
        }

        assign_from_predictions(characters, &by_key(predictions), &self.catalog)
    }
}

/// Deterministic assignment given predictions keyed by lowercased name.
pub fn assign_from_predictions(
    characters: &[Character],
    predictions: &HashMap<String, VoiceCategory>,
    catalog: &VoiceCatalog,
) -> Result<VoiceAssignments, CastingError> {
    let mut pools: HashMap<VoiceCategory, Vec<&Character>> = HashMap::new();
    for character in characters {
        let category = predictions.get(&character.key()).copied().ok_or_else(|| {
            CastingError::MalformedResponse(format!("no category predicted for {}", character.name))
        })?;
        pools.entry(category).or_default().push(character);
    }

    let mut assignments = VoiceAssignments::new();
    for (category, mut members) in pools {
        members.sort_by(|a, b| {
            b.lines
                .cmp(&a.lines)
                .then(a.first_appearance.cmp(&b.first_appearance))
                .then_with(|| a.key().cmp(&b.key()))
        });
        let voices = catalog.pool(category);
        for (index, character) in members.into_iter().enumerate() {
            assignments.insert(
                character.name.clone(),
                VoiceAssignment {
                    voice_id: voices[index % voices.len()].clone(),
                    category,
                    test_text: test_text(character),
                },
            );
        }
    }

    Ok(assignments)
}

fn test_text(character: &Character) -> String {
    character
        .first_line_text()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Hello, my name is {}.", character.name))
}

fn candidates(characters: &[Character]) -> Vec<CharacterCandidate> {
    characters
        .iter()
        .map(|c| CharacterCandidate {
            name: c.name.clone(),
            first_line: c.first_line_text().unwrap_or_default().to_string(),
        })
        .collect()
}

fn by_key<V>(map: HashMap<String, V>) -> HashMap<String, V> {
    map.into_iter()
        .map(|(name, value)| (character_key(&name), value))
        .collect()
}
