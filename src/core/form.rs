use crate::domain::model::{FormField, PlayerForm, StoryRequest};
use crate::utils::error::{Result, StoryError};

impl PlayerForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Motto => &self.motto,
            FormField::YearsPlayed => &self.years_played,
            FormField::Reason => &self.reason,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Motto => &mut self.motto,
            FormField::YearsPlayed => &mut self.years_played,
            FormField::Reason => &mut self.reason,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn clear(&mut self, field: FormField) {
        self.slot_mut(field).clear();
    }

    /// 年資必須是非負整數，其他輸入視同未填
    pub fn years_played(&self) -> Option<u32> {
        self.years_played.trim().parse::<u32>().ok()
    }

    fn is_filled(&self, field: FormField) -> bool {
        match field {
            FormField::YearsPlayed => self.years_played().is_some(),
            other => !self.get(other).trim().is_empty(),
        }
    }

    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| field.is_required() && !self.is_filled(*field))
            .collect()
    }

    pub fn can_submit(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL
            .into_iter()
            .all(|field| self.get(field).is_empty())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_request(&self) -> Result<StoryRequest> {
        let missing = self.missing_fields();
        let years_played = match (missing.is_empty(), self.years_played()) {
            (true, Some(years)) => years,
            _ => {
                return Err(StoryError::IncompleteForm {
                    missing: missing.iter().map(|f| f.label().to_string()).collect(),
                })
            }
        };

        let motto = self.motto.trim();
        Ok(StoryRequest {
            name: self.name.trim().to_string(),
            motto: (!motto.is_empty()).then(|| motto.to_string()),
            years_played,
            reason: self.reason.trim().to_string(),
        })
    }
}
