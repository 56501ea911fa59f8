//! SQL implementation of the reservation repository

use crate::error::DbError;
use crate::repositories::reservation::{NewReservation, Reservation, ReservationRepository};
use crate::DbClient;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL implementation of the reservation repository
#[derive(Debug, Clone)]
pub struct SqlReservationRepository {
    /// The database client
    db_client: DbClient,
}

impl SqlReservationRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    pub fn db_client(&self) -> &DbClient {
        &self.db_client
    }
}

fn decode<'r, T>(row: &'r AnyRow, column: &str) -> Result<T, DbError>
where
    T: sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
{
    row.try_get(column).map_err(|e| {
        error!("Failed to decode column {}: {}", column, e);
        DbError::DecodeError(format!("{}: {}", column, e))
    })
}

fn reservation_from_row(row: &AnyRow) -> Result<Reservation, DbError> {
    Ok(Reservation {
        id: decode(row, "id")?,
        nom: decode(row, "nom")?,
        prenom: decode(row, "prenom")?,
        email: decode(row, "email")?,
        telephone: decode(row, "telephone")?,
        type_session: decode(row, "type_session")?,
        date_session: decode(row, "date_session")?,
        heure_session: decode(row, "heure_session")?,
        nb_personnes: decode(row, "nb_personnes")?,
        message: decode(row, "message")?,
        google_event_id: decode(row, "google_event_id")?,
    })
}

impl ReservationRepository for SqlReservationRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing reservation schema");

        let reservations = r#"
            CREATE TABLE IF NOT EXISTS reservations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nom TEXT NOT NULL,
                prenom TEXT NOT NULL,
                email TEXT NOT NULL,
                telephone TEXT NOT NULL,
                type_session TEXT NOT NULL,
                date_session TEXT NOT NULL,
                heure_session TEXT NOT NULL,
                nb_personnes INTEGER,
                message TEXT NOT NULL DEFAULT '',
                google_event_id TEXT
            )
        "#;
        self.db_client.execute(reservations).await?;

        // Per-date slot overrides; created for operator tooling, not read here.
        let available_slots = r#"
            CREATE TABLE IF NOT EXISTS available_slots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date_session TEXT NOT NULL,
                heure_session TEXT NOT NULL,
                is_available BOOLEAN DEFAULT 1
            )
        "#;
        self.db_client.execute(available_slots).await?;

        info!("Reservation schema initialized successfully");
        Ok(())
    }

    async fn insert_reservation(&self, reservation: NewReservation) -> Result<i64, DbError> {
        debug!(
            "Inserting reservation for {} on {} at {}",
            reservation.email, reservation.date_session, reservation.heure_session
        );

        let query = r#"
            INSERT INTO reservations (
                nom, prenom, email, telephone, type_session,
                date_session, heure_session, nb_personnes, message, google_event_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(&reservation.nom)
            .bind(&reservation.prenom)
            .bind(&reservation.email)
            .bind(&reservation.telephone)
            .bind(&reservation.type_session)
            .bind(&reservation.date_session)
            .bind(&reservation.heure_session)
            .bind(reservation.nb_personnes)
            .bind(&reservation.message)
            .bind(reservation.google_event_id.as_deref())
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert reservation: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        let id: i64 = decode(&row, "id")?;
        info!("Reservation {} stored", id);
        Ok(id)
    }

    async fn booked_slots(&self, date: &str) -> Result<Vec<String>, DbError> {
        debug!("Loading booked slots for {}", date);

        let query = r#"
            SELECT heure_session
            FROM reservations
            WHERE date_session = $1
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .bind(date)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to query booked slots: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter()
            .map(|row| decode::<String>(row, "heure_session"))
            .collect()
    }

    async fn find_by_date(&self, date: &str) -> Result<Vec<Reservation>, DbError> {
        debug!("Loading reservations for {}", date);

        let query = r#"
            SELECT id, nom, prenom, email, telephone, type_session,
                   date_session, heure_session, nb_personnes, message, google_event_id
            FROM reservations
            WHERE date_session = $1
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .bind(date)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to query reservations: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(reservation_from_row).collect()
    }
}
