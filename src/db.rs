use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::models::{
    GuardianRecord, GuardianSubmission, StudentRecord, StudentSubmission, TeacherRecord,
    TeacherSubmission,
};

/// Production connections require TLS but skip certificate verification,
/// which is what managed Postgres hosts with self-signed chains expect.
/// Elsewhere the `sslmode` in `DATABASE_URL` applies unchanged.
pub fn connect_options(config: &Config) -> anyhow::Result<PgConnectOptions> {
    let options = PgConnectOptions::from_str(&config.database_url)
        .context("DATABASE_URL is not a valid Postgres connection string")?;

    if config.production {
        return Ok(options.ssl_mode(PgSslMode::Require));
    }

    Ok(options)
}

pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    info!(
        production = config.production,
        max_connections = config.max_connections,
        "Connecting to Postgres"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options(config)?)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to create survey tables")?;
    Ok(())
}

pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn insert_guardian(
    pool: &PgPool,
    submission: &GuardianSubmission,
) -> Result<GuardianRecord, sqlx::Error> {
    sqlx::query_as::<_, GuardianRecord>(
        r#"
        INSERT INTO acudientes_form_submissions
        (institucion_educativa, grados_estudiantes, comunicacion, practicas_pedagogicas, convivencia)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&submission.school_name)
    .bind(&submission.student_grades)
    .bind(Json(&submission.frequency_ratings5))
    .bind(Json(&submission.frequency_ratings6))
    .bind(Json(&submission.frequency_ratings7))
    .fetch_one(pool)
    .await
}

pub async fn insert_teacher(
    pool: &PgPool,
    submission: &TeacherSubmission,
) -> Result<TeacherRecord, sqlx::Error> {
    sqlx::query_as::<_, TeacherRecord>(
        r#"
        INSERT INTO docentes_form_submissions
        (institucion_educativa, anos_como_docente, grados_asignados, jornada,
         retroalimentacion_de, frequency_ratings6, frequency_ratings7, frequency_ratings8)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&submission.school_name)
    .bind(&submission.years_teaching)
    .bind(&submission.assigned_grades)
    .bind(&submission.shift)
    .bind(&submission.feedback_from)
    .bind(Json(&submission.frequency_ratings6))
    .bind(Json(&submission.frequency_ratings7))
    .bind(Json(&submission.frequency_ratings8))
    .fetch_one(pool)
    .await
}

pub async fn insert_student(
    pool: &PgPool,
    submission: &StudentSubmission,
) -> Result<StudentRecord, sqlx::Error> {
    sqlx::query_as::<_, StudentRecord>(
        r#"
        INSERT INTO estudiantes_form_submissions
        (institucion_educativa, anos_estudiando, grado_actual, jornada,
         frequency_ratings5, frequency_ratings6, frequency_ratings7)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&submission.school_name)
    .bind(&submission.years_studying)
    .bind(&submission.current_grade)
    .bind(&submission.shift)
    .bind(Json(&submission.frequency_ratings5))
    .bind(Json(&submission.frequency_ratings6))
    .bind(Json(&submission.frequency_ratings7))
    .fetch_one(pool)
    .await
}

/// Distinct, trimmed school names containing `term`, ignoring case, sorted
/// ascending. The result is not capped.
pub async fn search_schools(pool: &PgPool, term: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT TRIM(nombre_de_la_institucion_educativa_en_la_actualmente_desempena_) AS school_name
        FROM rectores
        WHERE LOWER(TRIM(nombre_de_la_institucion_educativa_en_la_actualmente_desempena_)) LIKE LOWER($1)
        ORDER BY school_name
        "#,
    )
    .bind(like_pattern(term))
    .fetch_all(pool)
    .await
}

/// Wraps `term` for a LIKE "contains" match, escaping the wildcard characters
/// so user text matches literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub async fn ensure_school_directory(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rectores (
            id SERIAL PRIMARY KEY,
            nombre_de_la_institucion_educativa_en_la_actualmente_desempena_ TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create school directory table")?;
    Ok(())
}

/// Inserts `name` unless a row with the same trimmed name exists. Returns
/// whether a row was written.
async fn insert_school(pool: &PgPool, name: &str) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO rectores (nombre_de_la_institucion_educativa_en_la_actualmente_desempena_)
        SELECT $1
        WHERE NOT EXISTS (
            SELECT 1 FROM rectores
            WHERE TRIM(nombre_de_la_institucion_educativa_en_la_actualmente_desempena_) = $1
        )
        "#,
    )
    .bind(name)
    .execute(pool)
    .await
    .with_context(|| format!("failed to insert school {name:?}"))?;

    Ok(result.rows_affected() > 0)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<usize> {
    let schools = [
        "Institución Educativa San José",
        "Institución Educativa La Esperanza",
        "Colegio Distrital Simón Bolívar",
        "Institución Educativa Técnica Agropecuaria El Carmen",
        "Colegio Nuestra Señora del Rosario",
        "Institución Educativa Francisco José de Caldas",
    ];

    ensure_school_directory(pool).await?;

    let mut inserted = 0usize;
    for name in schools {
        if insert_school(pool, name).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let names = read_school_names(csv_path)?;

    ensure_school_directory(pool).await?;

    let mut inserted = 0usize;
    for name in names {
        if insert_school(pool, &name).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}

/// Reads the `school_name` column, trimming values and skipping blanks.
pub fn read_school_names(csv_path: &std::path::Path) -> anyhow::Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        school_name: String,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut names = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let name = row.school_name.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }

    Ok(names)
}
