use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::error::AppError;
use crate::questionnaire::{FrequencyRatings, TeacherSection};

// Request bodies default every field so a missing field and an empty one are
// rejected by the same presence check with the same message.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardianSubmission {
    pub school_name: String,
    pub student_grades: Vec<String>,
    pub frequency_ratings5: FrequencyRatings,
    pub frequency_ratings6: FrequencyRatings,
    pub frequency_ratings7: FrequencyRatings,
}

impl GuardianSubmission {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.school_name, "schoolName")?;
        if self.student_grades.is_empty() {
            return Err(AppError::Validation(
                "Student grades must be a non-empty array".to_string(),
            ));
        }
        require_ratings([
            &self.frequency_ratings5,
            &self.frequency_ratings6,
            &self.frequency_ratings7,
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherSubmission {
    pub school_name: String,
    pub years_teaching: String,
    pub assigned_grades: Vec<String>,
    pub shift: String,
    pub feedback_from: Vec<String>,
    pub frequency_ratings6: FrequencyRatings,
    pub frequency_ratings7: FrequencyRatings,
    pub frequency_ratings8: FrequencyRatings,
}

impl TeacherSubmission {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.school_name, "schoolName")?;
        require_text(&self.years_teaching, "yearsTeaching")?;
        require_list(&self.assigned_grades, "assignedGrades")?;
        require_text(&self.shift, "shift")?;
        require_list(&self.feedback_from, "feedbackFrom")?;
        require_ratings([
            &self.frequency_ratings6,
            &self.frequency_ratings7,
            &self.frequency_ratings8,
        ])
    }

    /// Answers given to one of the teacher matrices with a fixed question list.
    pub fn ratings(&self, section: TeacherSection) -> &FrequencyRatings {
        match section {
            TeacherSection::PedagogicalPractices => &self.frequency_ratings7,
            TeacherSection::Coexistence => &self.frequency_ratings8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentSubmission {
    pub school_name: String,
    pub years_studying: String,
    pub current_grade: String,
    pub shift: String,
    pub frequency_ratings5: FrequencyRatings,
    pub frequency_ratings6: FrequencyRatings,
    pub frequency_ratings7: FrequencyRatings,
}

impl StudentSubmission {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.school_name, "schoolName")?;
        require_text(&self.years_studying, "yearsStudying")?;
        require_text(&self.current_grade, "currentGrade")?;
        require_text(&self.shift, "shift")?;
        require_ratings([
            &self.frequency_ratings5,
            &self.frequency_ratings6,
            &self.frequency_ratings7,
        ])
    }
}

fn require_text(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required field: {field}"
        )));
    }
    Ok(())
}

fn require_list(values: &[String], field: &str) -> Result<(), AppError> {
    if values.is_empty() {
        return Err(AppError::Validation(format!(
            "{field} must be a non-empty array"
        )));
    }
    Ok(())
}

fn require_ratings(maps: [&FrequencyRatings; 3]) -> Result<(), AppError> {
    if maps.iter().any(|ratings| ratings.is_empty()) {
        return Err(AppError::Validation("Missing frequency ratings".to_string()));
    }
    Ok(())
}

/// Stored guardian row, as returned by `INSERT ... RETURNING *`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GuardianRecord {
    pub id: i32,
    pub created_at: Option<NaiveDateTime>,
    #[sqlx(rename = "institucion_educativa")]
    pub school_name: String,
    #[sqlx(rename = "grados_estudiantes")]
    pub student_grades: Vec<String>,
    #[sqlx(rename = "comunicacion")]
    pub frequency_ratings5: Json<FrequencyRatings>,
    #[sqlx(rename = "practicas_pedagogicas")]
    pub frequency_ratings6: Json<FrequencyRatings>,
    #[sqlx(rename = "convivencia")]
    pub frequency_ratings7: Json<FrequencyRatings>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRecord {
    pub id: i32,
    pub created_at: Option<NaiveDateTime>,
    #[sqlx(rename = "institucion_educativa")]
    pub school_name: String,
    #[sqlx(rename = "anos_como_docente")]
    pub years_teaching: String,
    #[sqlx(rename = "grados_asignados")]
    pub assigned_grades: Vec<String>,
    #[sqlx(rename = "jornada")]
    pub shift: String,
    #[sqlx(rename = "retroalimentacion_de")]
    pub feedback_from: Vec<String>,
    pub frequency_ratings6: Json<FrequencyRatings>,
    pub frequency_ratings7: Json<FrequencyRatings>,
    pub frequency_ratings8: Json<FrequencyRatings>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: i32,
    pub created_at: Option<NaiveDateTime>,
    #[sqlx(rename = "institucion_educativa")]
    pub school_name: String,
    #[sqlx(rename = "anos_estudiando")]
    pub years_studying: String,
    #[sqlx(rename = "grado_actual")]
    pub current_grade: String,
    #[sqlx(rename = "jornada")]
    pub shift: String,
    pub frequency_ratings5: Json<FrequencyRatings>,
    pub frequency_ratings6: Json<FrequencyRatings>,
    pub frequency_ratings7: Json<FrequencyRatings>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::FrequencyRating;

    fn ratings() -> FrequencyRatings {
        let mut map = FrequencyRatings::new();
        map.insert("pregunta".to_string(), FrequencyRating::Sometimes);
        map
    }

    fn guardian() -> GuardianSubmission {
        GuardianSubmission {
            school_name: "Colegio San José".to_string(),
            student_grades: vec!["3°".to_string()],
            frequency_ratings5: ratings(),
            frequency_ratings6: ratings(),
            frequency_ratings7: ratings(),
        }
    }

    fn message(err: AppError) -> String {
        err.to_string()
    }

    #[test]
    fn complete_guardian_passes() {
        assert!(guardian().validate().is_ok());
    }

    #[test]
    fn blank_school_name_is_rejected() {
        let mut submission = guardian();
        submission.school_name = "   ".to_string();
        let err = submission.validate().unwrap_err();
        assert_eq!(message(err), "Missing required field: schoolName");
    }

    #[test]
    fn empty_grades_are_rejected() {
        let mut submission = guardian();
        submission.student_grades.clear();
        let err = submission.validate().unwrap_err();
        assert_eq!(message(err), "Student grades must be a non-empty array");
    }

    #[test]
    fn empty_rating_map_is_rejected() {
        let mut submission = guardian();
        submission.frequency_ratings6.clear();
        let err = submission.validate().unwrap_err();
        assert_eq!(message(err), "Missing frequency ratings");
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let parsed: GuardianSubmission =
            serde_json::from_str(r#"{"schoolName": "Colegio"}"#).unwrap();
        assert!(parsed.student_grades.is_empty());
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn guardian_payload_uses_camel_case_keys() {
        let body = r#"{
            "schoolName": "Colegio",
            "studentGrades": ["1°", "2°"],
            "frequencyRatings5": {"a": "Siempre"},
            "frequencyRatings6": {"b": "Nunca"},
            "frequencyRatings7": {"c": "A veces"}
        }"#;
        let parsed: GuardianSubmission = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.student_grades, vec!["1°", "2°"]);
        assert_eq!(
            parsed.frequency_ratings6.get("b"),
            Some(&FrequencyRating::Never)
        );
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn teacher_requires_feedback_sources() {
        let submission = TeacherSubmission {
            school_name: "Colegio".to_string(),
            years_teaching: "5-10".to_string(),
            assigned_grades: vec!["6°".to_string()],
            shift: "Mañana".to_string(),
            feedback_from: Vec::new(),
            frequency_ratings6: ratings(),
            frequency_ratings7: ratings(),
            frequency_ratings8: ratings(),
        };
        let err = submission.validate().unwrap_err();
        assert_eq!(message(err), "feedbackFrom must be a non-empty array");
    }

    #[test]
    fn teacher_matrices_read_from_their_payload_keys() {
        let section = TeacherSection::Coexistence;
        let key = section.payload_key();
        let question = section.questions()[0];
        let body = serde_json::json!({ key: { question: "Casi nunca" } });
        let parsed: TeacherSubmission = serde_json::from_value(body).unwrap();

        assert!(parsed.ratings(TeacherSection::PedagogicalPractices).is_empty());
        assert_eq!(
            parsed.ratings(section).get(question),
            Some(&FrequencyRating::AlmostNever)
        );
        assert_eq!(
            section.unanswered(parsed.ratings(section)).len(),
            section.questions().len() - 1
        );
    }

    #[test]
    fn student_requires_current_grade() {
        let submission = StudentSubmission {
            school_name: "Colegio".to_string(),
            years_studying: "3".to_string(),
            current_grade: String::new(),
            shift: "Tarde".to_string(),
            frequency_ratings5: ratings(),
            frequency_ratings6: ratings(),
            frequency_ratings7: ratings(),
        };
        let err = submission.validate().unwrap_err();
        assert_eq!(message(err), "Missing required field: currentGrade");
    }
}
