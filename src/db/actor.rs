use crate::db::schema::SQLITE_INIT;
use crate::error::RepliesError;
use crate::store::PluginStore;
use async_trait::async_trait;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

const JSON_TYPE_NAME: &str = "JSON";

#[derive(Debug)]
pub enum DbActorMessage {
    /// Read the value stored under (plugin_name, key).
    Get(
        String,
        String,
        RpcReplyPort<Result<Option<Value>, RepliesError>>,
    ),

    /// Upsert the value stored under (plugin_name, key).
    Set(String, String, Value, RpcReplyPort<Result<(), RepliesError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

#[async_trait]
impl PluginStore for DbActorHandle {
    async fn get(&self, plugin_name: &str, key: &str) -> Result<Option<Value>, RepliesError> {
        ractor::call!(
            self.actor,
            DbActorMessage::Get,
            plugin_name.to_string(),
            key.to_string()
        )
        .map_err(|e| RepliesError::RactorError(format!("DbActor Get RPC failed: {e}")))?
    }

    async fn set(&self, plugin_name: &str, key: &str, value: Value) -> Result<(), RepliesError> {
        ractor::call!(
            self.actor,
            DbActorMessage::Set,
            plugin_name.to_string(),
            key.to_string(),
            value
        )
        .map_err(|e| RepliesError::RactorError(format!("DbActor Set RPC failed: {e}")))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::Get(plugin_name, key, reply) => {
                let res = self.get_row(&state.pool, &plugin_name, &key).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Set(plugin_name, key, value, reply) => {
                let res = self.set_row(&state.pool, &plugin_name, &key, &value).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn get_row(
        &self,
        pool: &SqlitePool,
        plugin_name: &str,
        key: &str,
    ) -> Result<Option<Value>, RepliesError> {
        let raw: Option<Option<String>> = sqlx::query_scalar(
            r#"
        SELECT value
        FROM plugin_store_rows
        WHERE plugin_name = ? AND key = ?
        "#,
        )
        .bind(plugin_name)
        .bind(key)
        .fetch_optional(pool)
        .await?;

        match raw.flatten() {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set_row(
        &self,
        pool: &SqlitePool,
        plugin_name: &str,
        key: &str,
        value: &Value,
    ) -> Result<(), RepliesError> {
        let now = Utc::now();
        let text = serde_json::to_string(value)?;

        sqlx::query(
            r#"
        INSERT INTO plugin_store_rows (
            plugin_name, key, type_name, value, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(plugin_name, key) DO UPDATE SET
            type_name = excluded.type_name,
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
        )
        .bind(plugin_name)
        .bind(key)
        .bind(JSON_TYPE_NAME)
        .bind(text)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, RepliesError> {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| RepliesError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), RepliesError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
