//! PostgreSQL stores built on sqlx.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use super::traits::{
    BaseFavoriteStore, BasePointStore, PointChange, PointMutation, PointMutator, PointQuery,
};
use crate::common::{ActorId, DomainError, DomainResult, FavoriteId, PointId};
use crate::domains::favorites::models::Favorite;
use crate::domains::points::models::{DonationPoint, PointRecord};

const FOREIGN_KEY_VIOLATION: &str = "23503";

fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}

// =============================================================================
// Points
// =============================================================================

pub struct PostgresPointStore {
    pool: PgPool,
}

impl PostgresPointStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BasePointStore for PostgresPointStore {
    async fn insert(&self, point: &DonationPoint) -> DomainResult<()> {
        let record = PointRecord::from_point(point);
        sqlx::query(
            r#"
            INSERT INTO puntos_donacion (
                id, nombre, direccion, latitud, longitud, tipo_donacion,
                horario_apertura, horario_cierre, telefono, email, activo,
                estado, motivo_rechazo, reenviado, usuario_creador_id, tipo_creador,
                fecha_creacion, fecha_actualizacion
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(record.id)
        .bind(&record.nombre)
        .bind(&record.direccion)
        .bind(record.latitud)
        .bind(record.longitud)
        .bind(&record.tipo_donacion)
        .bind(record.horario_apertura)
        .bind(record.horario_cierre)
        .bind(&record.telefono)
        .bind(&record.email)
        .bind(&record.activo)
        .bind(&record.estado)
        .bind(&record.motivo_rechazo)
        .bind(record.reenviado)
        .bind(record.usuario_creador_id)
        .bind(&record.tipo_creador)
        .bind(record.fecha_creacion)
        .bind(record.fecha_actualizacion)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, id: PointId) -> DomainResult<Option<DonationPoint>> {
        let record =
            sqlx::query_as::<_, PointRecord>("SELECT * FROM puntos_donacion WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record.map(PointRecord::into_point).transpose()?)
    }

    async fn list(&self, query: &PointQuery) -> DomainResult<Vec<DonationPoint>> {
        let records = sqlx::query_as::<_, PointRecord>(
            r#"
            SELECT * FROM puntos_donacion
            WHERE ($1::text IS NULL OR estado = $1)
              AND ($2::uuid IS NULL OR usuario_creador_id = $2)
              AND ($3::text IS NULL OR tipo_creador = $3)
            ORDER BY fecha_creacion DESC, id DESC
            "#,
        )
        .bind(query.status.map(|s| s.to_string()))
        .bind(query.creator_id.map(|id| id.into_uuid()))
        .bind(query.creator_type.map(|t| t.to_string()))
        .fetch_all(&self.pool)
        .await?;

        records
            .into_iter()
            .map(|record| record.into_point().map_err(DomainError::from))
            .collect()
    }

    async fn modify(&self, id: PointId, mutator: PointMutator) -> DomainResult<PointMutation> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, PointRecord>(
            "SELECT * FROM puntos_donacion WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Point {} not found", id)))?;

        // Any early return drops the transaction, which rolls it back
        let mut point = record.into_point()?;
        let change = mutator(&mut point)?;

        match change {
            PointChange::Saved => {
                point.updated_at = Utc::now();
                let record = PointRecord::from_point(&point);
                sqlx::query(
                    r#"
                    UPDATE puntos_donacion SET
                        nombre = $2,
                        direccion = $3,
                        latitud = $4,
                        longitud = $5,
                        tipo_donacion = $6,
                        horario_apertura = $7,
                        horario_cierre = $8,
                        telefono = $9,
                        email = $10,
                        activo = $11,
                        estado = $12,
                        motivo_rechazo = $13,
                        reenviado = $14,
                        fecha_actualizacion = $15
                    WHERE id = $1
                    "#,
                )
                .bind(record.id)
                .bind(&record.nombre)
                .bind(&record.direccion)
                .bind(record.latitud)
                .bind(record.longitud)
                .bind(&record.tipo_donacion)
                .bind(record.horario_apertura)
                .bind(record.horario_cierre)
                .bind(&record.telefono)
                .bind(&record.email)
                .bind(&record.activo)
                .bind(&record.estado)
                .bind(&record.motivo_rechazo)
                .bind(record.reenviado)
                .bind(record.fecha_actualizacion)
                .execute(&mut *tx)
                .await?;
            }
            PointChange::Removed => {
                sqlx::query("DELETE FROM puntos_donacion WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(PointMutation { point, change })
    }

    async fn ping(&self) -> DomainResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// Favorites
// =============================================================================

pub struct PostgresFavoriteStore {
    pool: PgPool,
}

impl PostgresFavoriteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseFavoriteStore for PostgresFavoriteStore {
    async fn insert_or_get(&self, favorite: Favorite) -> DomainResult<(Favorite, bool)> {
        let inserted = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favoritos (id, usuario_id, punto_donacion_id, etiqueta, fecha_agendada, fecha_agregado)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (usuario_id, punto_donacion_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(favorite.id)
        .bind(favorite.donor_id)
        .bind(favorite.point_id)
        .bind(&favorite.tag)
        .bind(favorite.scheduled_date)
        .bind(favorite.created_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::conflict(format!(
                    "Point {} is not available for favorites",
                    favorite.point_id
                ))
            } else {
                DomainError::from(e)
            }
        })?;

        if let Some(inserted) = inserted {
            return Ok((inserted, true));
        }

        let existing = sqlx::query_as::<_, Favorite>(
            "SELECT * FROM favoritos WHERE usuario_id = $1 AND punto_donacion_id = $2",
        )
        .bind(favorite.donor_id)
        .bind(favorite.point_id)
        .fetch_one(&self.pool)
        .await?;
        Ok((existing, false))
    }

    async fn find(&self, id: FavoriteId) -> DomainResult<Option<Favorite>> {
        let favorite = sqlx::query_as::<_, Favorite>("SELECT * FROM favoritos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(favorite)
    }

    async fn list_by_donor(&self, donor_id: ActorId) -> DomainResult<Vec<Favorite>> {
        let favorites = sqlx::query_as::<_, Favorite>(
            "SELECT * FROM favoritos WHERE usuario_id = $1 ORDER BY fecha_agregado, id",
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(favorites)
    }

    async fn set_tag(&self, id: FavoriteId, tag: Option<String>) -> DomainResult<Option<Favorite>> {
        let favorite = sqlx::query_as::<_, Favorite>(
            "UPDATE favoritos SET etiqueta = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(tag)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favorite)
    }

    async fn set_scheduled_date(
        &self,
        id: FavoriteId,
        date: Option<NaiveDate>,
    ) -> DomainResult<Option<Favorite>> {
        let favorite = sqlx::query_as::<_, Favorite>(
            "UPDATE favoritos SET fecha_agendada = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favorite)
    }

    async fn delete(&self, id: FavoriteId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM favoritos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_point(&self, point_id: PointId) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM favoritos WHERE punto_donacion_id = $1")
            .bind(point_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> DomainResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
