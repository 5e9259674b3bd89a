use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use volant_core::repository::CompanionStore;
use volant_core::StoreResult;
use volant_domain::{CompanionLink, NewCompanionLink};

pub struct PgCompanionStore {
    pool: PgPool,
}

impl PgCompanionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    learner_id: Uuid,
    companion_id: Uuid,
    relation: String,
    created_at: chrono::DateTime<Utc>,
}

impl From<LinkRow> for CompanionLink {
    fn from(row: LinkRow) -> Self {
        CompanionLink {
            id: row.id,
            learner_id: row.learner_id,
            companion_id: row.companion_id,
            relation: row.relation,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CompanionStore for PgCompanionStore {
    async fn insert(&self, link: NewCompanionLink) -> StoreResult<CompanionLink> {
        let row = sqlx::query_as::<_, LinkRow>(
            "INSERT INTO companion_links (id, learner_id, companion_id, relation, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, learner_id, companion_id, relation, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(link.learner_id)
        .bind(link.companion_id)
        .bind(&link.relation)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        Ok(row.into())
    }

    async fn list_for_learner(&self, learner_id: Uuid) -> StoreResult<Vec<CompanionLink>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            "SELECT id, learner_id, companion_id, relation, created_at \
             FROM companion_links WHERE learner_id = $1 ORDER BY created_at ASC",
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(crate::database::map_sqlx_err)?;

        Ok(rows.into_iter().map(CompanionLink::from).collect())
    }
}
