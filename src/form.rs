//! Local answer state for the guardian questionnaire.
//!
//! Each rating matrix has its own named field, so answering a question never
//! goes through a section-number lookup. Validation mirrors what the
//! respondent sees before the form is sent: every question of every matrix
//! must be answered, which is stricter than what the server enforces.

use thiserror::Error;

use crate::models::GuardianSubmission;
use crate::questionnaire::{is_known_grade, FrequencyRating, FrequencyRatings, GuardianSection};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Por favor, ingrese el nombre de la Institución Educativa.")]
    MissingSchoolName,

    #[error("Por favor, seleccione al menos un grado en el que se encuentra cursando el o los estudiantes que usted representa.")]
    MissingGrades,

    #[error("Por favor, responda todas las preguntas de frecuencia antes de enviar el formulario.")]
    IncompleteRatings {
        section: GuardianSection,
        unanswered: usize,
    },

    #[error("unknown grade option: {0}")]
    UnknownGrade(String),

    #[error("question does not belong to {section:?}: {question}")]
    UnknownQuestion {
        section: GuardianSection,
        question: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuardianForm {
    pub school_name: String,
    pub student_grades: Vec<String>,
    pub communication: FrequencyRatings,
    pub pedagogical_practices: FrequencyRatings,
    pub coexistence: FrequencyRatings,
}

impl GuardianForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_school_name(&mut self, value: impl Into<String>) {
        self.school_name = value.into();
    }

    /// Checks or unchecks a grade box. Checked grades keep the order in
    /// which they were selected.
    pub fn set_grade(&mut self, grade: &str, checked: bool) -> Result<(), FormError> {
        if !is_known_grade(grade) {
            return Err(FormError::UnknownGrade(grade.to_string()));
        }

        let present = self.student_grades.iter().any(|g| g == grade);
        if checked && !present {
            self.student_grades.push(grade.to_string());
        } else if !checked {
            self.student_grades.retain(|g| g != grade);
        }
        Ok(())
    }

    pub fn rate(
        &mut self,
        section: GuardianSection,
        question: &str,
        rating: FrequencyRating,
    ) -> Result<(), FormError> {
        if !section.contains(question) {
            return Err(FormError::UnknownQuestion {
                section,
                question: question.to_string(),
            });
        }

        self.ratings_mut(section).insert(question.to_string(), rating);
        Ok(())
    }

    pub fn ratings(&self, section: GuardianSection) -> &FrequencyRatings {
        match section {
            GuardianSection::Communication => &self.communication,
            GuardianSection::PedagogicalPractices => &self.pedagogical_practices,
            GuardianSection::Coexistence => &self.coexistence,
        }
    }

    fn ratings_mut(&mut self, section: GuardianSection) -> &mut FrequencyRatings {
        match section {
            GuardianSection::Communication => &mut self.communication,
            GuardianSection::PedagogicalPractices => &mut self.pedagogical_practices,
            GuardianSection::Coexistence => &mut self.coexistence,
        }
    }

    pub fn answer(&self, section: GuardianSection, question: &str) -> Option<FrequencyRating> {
        self.ratings(section).get(question).copied()
    }

    /// Questions still unanswered in `section`, in display order. Used to
    /// flag rows once a submit has been attempted.
    pub fn unanswered(&self, section: GuardianSection) -> Vec<&'static str> {
        let ratings = self.ratings(section);
        section
            .questions()
            .iter()
            .copied()
            .filter(|q| !ratings.contains_key(*q))
            .collect()
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.school_name.trim().is_empty() {
            return Err(FormError::MissingSchoolName);
        }

        if self.student_grades.is_empty() {
            return Err(FormError::MissingGrades);
        }

        for section in GuardianSection::ALL {
            let unanswered = self.unanswered(section).len();
            if unanswered > 0 {
                return Err(FormError::IncompleteRatings {
                    section,
                    unanswered,
                });
            }
        }

        Ok(())
    }

    pub fn to_submission(&self) -> GuardianSubmission {
        GuardianSubmission {
            school_name: self.school_name.clone(),
            student_grades: self.student_grades.clone(),
            frequency_ratings5: self.communication.clone(),
            frequency_ratings6: self.pedagogical_practices.clone(),
            frequency_ratings7: self.coexistence.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
