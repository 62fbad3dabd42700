use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Five-point ordinal scale used by every rating matrix, most frequent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FrequencyRating {
    #[serde(rename = "Siempre")]
    Always,
    #[serde(rename = "Casi siempre")]
    AlmostAlways,
    #[serde(rename = "A veces")]
    Sometimes,
    #[serde(rename = "Casi nunca")]
    AlmostNever,
    #[serde(rename = "Nunca")]
    Never,
}

impl FrequencyRating {
    pub const ALL: [FrequencyRating; 5] = [
        FrequencyRating::Always,
        FrequencyRating::AlmostAlways,
        FrequencyRating::Sometimes,
        FrequencyRating::AlmostNever,
        FrequencyRating::Never,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FrequencyRating::Always => "Siempre",
            FrequencyRating::AlmostAlways => "Casi siempre",
            FrequencyRating::Sometimes => "A veces",
            FrequencyRating::AlmostNever => "Casi nunca",
            FrequencyRating::Never => "Nunca",
        }
    }
}

impl fmt::Display for FrequencyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Question text mapped to the answer chosen for it.
pub type FrequencyRatings = BTreeMap<String, FrequencyRating>;

pub const GRADE_OPTIONS: [&str; 14] = [
    "Primera infancia",
    "Preescolar",
    "1°",
    "2°",
    "3°",
    "4°",
    "5°",
    "6°",
    "7°",
    "8°",
    "9°",
    "10°",
    "11°",
    "12°",
];

pub fn is_known_grade(label: &str) -> bool {
    GRADE_OPTIONS.contains(&label)
}

pub const COMMUNICATION_QUESTIONS: [&str; 6] = [
    "Los profesores tienen la disposición para hablar conmigo sobre los aprendizajes de los estudiantes en momentos adicionales a la entrega de notas.",
    "Los profesores promueven actividades para que apoye en su proceso de aprendizaje a los estudiantes que tengo a cargo.",
    "En el colegio se promueve mi participación en la toma de decisiones sobre las metas institucionales.",
    "En el colegio se hace reconocimiento público de las prácticas pedagógicas exitosas e innovadoras de los profesores.",
    "La comunicación que tengo con los directivos docentes del colegio es respetuosa y clara.",
    "En el colegio me siento escuchado/a y comprendida/o por los profesores, los directivos, los estudiantes y otros acudientes.",
];

pub const PEDAGOGICAL_PRACTICE_QUESTIONS: [&str; 6] = [
    "A los estudiantes los llevan a lugares diferentes al salón para hacer sus clases (por ejemplo, la biblioteca, el laboratorio, el parque, el museo, el río, etc.).",
    "Los profesores demuestran que confían en los estudiantes y que creen en sus capacidades y habilidades.",
    "Los profesores tienen en cuenta los intereses y necesidades de los estudiantes para escoger los temas que se van a tratar en clase.",
    "Los profesores del colegio hacen las clases garantizando el derecho a la educación de los estudiantes que viven condiciones o situaciones especiales (por ejemplo, alguna discapacidad, que sean desplazados o que entraron tarde al curso).",
    "Cuando los profesores evalúan a los estudiantes tienen en cuenta su dimensión afectiva y emocional, además de la cognitiva y la comportamental.",
    "El colegio organiza o participa en actividades como torneos, campeonatos, olimpiadas o ferias con otros colegios o instituciones.",
];

pub const COEXISTENCE_QUESTIONS: [&str; 6] = [
    "Los estudiantes tratan con respeto a los profesores, directivos y administrativos del colegio.",
    "En el colegio recibo apoyo para resolver los conflictos que se dan y generar aprendizajes a partir de estos.",
    "En el colegio los estudiantes son respetuosos y solidarios entre ellos, comprendiendo y aceptando las creencias religiosas, el género, la orientación sexual, el grupo étnico y las capacidades o talentos de los demás.",
    "Los profesores establecen acuerdos de convivencia con los estudiantes al comenzar el año escolar.",
    "Mis opiniones, propuestas y sugerencias se tienen en cuenta cuando se construyen acuerdos de convivencia en el colegio.",
    "En el colegio los estudiantes son tratados con respeto sin importar sus creencias religiosas, género, orientación sexual, grupo étnico y capacidades o talentos.",
];

/// The three rating matrices of the guardian questionnaire, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardianSection {
    Communication,
    PedagogicalPractices,
    Coexistence,
}

impl GuardianSection {
    pub const ALL: [GuardianSection; 3] = [
        GuardianSection::Communication,
        GuardianSection::PedagogicalPractices,
        GuardianSection::Coexistence,
    ];

    /// Question number as printed on the form. Items 1 and 2 are the school
    /// name and the grade checklist.
    pub fn number(self) -> u8 {
        match self {
            GuardianSection::Communication => 3,
            GuardianSection::PedagogicalPractices => 4,
            GuardianSection::Coexistence => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GuardianSection::Communication => "COMUNICACIÓN",
            GuardianSection::PedagogicalPractices => "PRÁCTICAS PEDAGÓGICAS",
            GuardianSection::Coexistence => "CONVIVENCIA",
        }
    }

    pub fn questions(self) -> &'static [&'static str] {
        match self {
            GuardianSection::Communication => &COMMUNICATION_QUESTIONS,
            GuardianSection::PedagogicalPractices => &PEDAGOGICAL_PRACTICE_QUESTIONS,
            GuardianSection::Coexistence => &COEXISTENCE_QUESTIONS,
        }
    }

    pub fn contains(self, question: &str) -> bool {
        self.questions().contains(&question)
    }
}

pub const TEACHER_PRACTICE_QUESTIONS: [&str; 8] = [
    "Utilizo diferentes espacios dentro y fuera del colegio como la biblioteca, el laboratorio o el parque para el desarrollo de mis clases.",
    "Cuando preparo mis clases tengo en cuenta los intereses y necesidades de los estudiantes.",
    "Me articulo con profesores de otras áreas y niveles para llevar a cabo proyectos pedagógicos que mejoren los aprendizajes de los estudiantes.",
    "Logro cumplir los objetivos y el desarrollo que planeo para mis clases.",
    "Desarrollo mis clases con enfoque diferencial para garantizar el derecho a la educación de todas y todos mis estudiantes, independiente de su entorno social, afectivo y sus capacidades físicas y cognitivas.",
    "Cuando evalúo a mis estudiantes tengo en cuenta su dimensión afectiva y emocional, además de la cognitivas y comportamental.",
    "Los profesores organizamos con otros colegios o instituciones actividades deportivas, académicas y culturales.",
    "Demuestro a mis estudiantes que confío en ellos y que creo en sus capacidades y habilidades.",
];

pub const TEACHER_COEXISTENCE_QUESTIONS: [&str; 7] = [
    "Los estudiantes me tratan con respeto a mí y a mis otros compañeros docentes, directivos y administrativos.",
    "Mis estudiantes son respetuosos y solidarios entre ellos, comprendiendo y aceptando las creencias religiosas, el género, la orientación sexual, el grupo étnico y las capacidades o talentos de los demás.",
    "Establezco con mis estudiantes acuerdos de convivencia al comenzar el año escolar.",
    "Mis opiniones, propuestas y sugerencias se tienen en cuenta cuando se construyen acuerdos de convivencia en el colegio.",
    "En el colegio mis estudiantes son tratados con respeto, independiente de sus creencias religiosas, género, orientación sexual, grupo étnico y capacidades o talentos de los demás.",
    "En el colegio recibo apoyo para resolver los conflictos que surgen y generar aprendizajes a partir de estos.",
    "En el colegio me siento escuchado/a y comprendido/a por otros docentes, los directivos, los estudiantes y los acudientes.",
];

/// Rating matrices of the teacher questionnaire that have a fixed question
/// list.
///
/// The teacher payload carries three matrices, `frequencyRatings6` to
/// `frequencyRatings8`, in display order. The last two are the practice
/// matrix (item 8) and the coexistence matrix (item 9). The first one has no
/// fixed list and is stored as answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeacherSection {
    PedagogicalPractices,
    Coexistence,
}

impl TeacherSection {
    pub const ALL: [TeacherSection; 2] =
        [TeacherSection::PedagogicalPractices, TeacherSection::Coexistence];

    pub fn number(self) -> u8 {
        match self {
            TeacherSection::PedagogicalPractices => 8,
            TeacherSection::Coexistence => 9,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TeacherSection::PedagogicalPractices => "PRÁCTICAS PEDAGÓGICAS",
            TeacherSection::Coexistence => "CONVIVENCIA",
        }
    }

    /// Key of the matrix in the teacher submission body.
    pub fn payload_key(self) -> &'static str {
        match self {
            TeacherSection::PedagogicalPractices => "frequencyRatings7",
            TeacherSection::Coexistence => "frequencyRatings8",
        }
    }

    pub fn questions(self) -> &'static [&'static str] {
        match self {
            TeacherSection::PedagogicalPractices => &TEACHER_PRACTICE_QUESTIONS,
            TeacherSection::Coexistence => &TEACHER_COEXISTENCE_QUESTIONS,
        }
    }

    pub fn contains(self, question: &str) -> bool {
        self.questions().contains(&question)
    }

    /// Questions of this matrix with no answer in `ratings`, in display order.
    pub fn unanswered(self, ratings: &FrequencyRatings) -> Vec<&'static str> {
        self.questions()
            .iter()
            .copied()
            .filter(|q| !ratings.contains_key(*q))
            .collect()
    }
}
