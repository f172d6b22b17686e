use super::model::{Reply, ReplyMap, new_reply_id};
use super::{PLUGIN_NAME, STORE_NAME};
use crate::error::RepliesError;
use crate::store::PluginStore;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Text of the reply created when the collection is first read empty.
#[derive(Debug, Clone)]
pub struct SeedReply {
    pub title: String,
    pub content: String,
}

/// Messages handled by the reply repository actor.
///
/// The actor drains its mailbox one message at a time, so each load-mutate-store cycle (and the
/// seed check-then-act) runs without interleaving with any other repository call.
#[derive(Debug)]
pub enum ReplyActorMessage {
    /// Create a reply with a fresh id.
    Add(String, String, RpcReplyPort<Result<Reply, RepliesError>>),

    /// Replace the reply at `id` (inserting it if absent). Usage count is not carried over.
    Edit(
        String,
        String,
        String,
        RpcReplyPort<Result<Reply, RepliesError>>,
    ),

    /// Delete the reply at `id`; returns the removed record, if any.
    Remove(String, RpcReplyPort<Result<Option<Reply>, RepliesError>>),

    /// Increment the usage counter of the reply at `id`.
    RecordUse(String, RpcReplyPort<Result<Reply, RepliesError>>),

    /// All replies ordered by title; seeds the store when empty.
    All(RpcReplyPort<Result<Vec<Reply>, RepliesError>>),

    /// One reply by id; seeds the store when empty.
    Get(String, RpcReplyPort<Result<Option<Reply>, RepliesError>>),
}

/// Handle for interacting with the reply repository actor.
#[derive(Clone)]
pub struct ReplyRepositoryHandle {
    actor: ActorRef<ReplyActorMessage>,
}

impl ReplyRepositoryHandle {
    pub async fn add(&self, title: String, content: String) -> Result<Reply, RepliesError> {
        ractor::call!(self.actor, ReplyActorMessage::Add, title, content)
            .map_err(|e| RepliesError::RactorError(format!("Add RPC failed: {e}")))?
    }

    pub async fn edit(
        &self,
        id: String,
        title: String,
        content: String,
    ) -> Result<Reply, RepliesError> {
        ractor::call!(self.actor, ReplyActorMessage::Edit, id, title, content)
            .map_err(|e| RepliesError::RactorError(format!("Edit RPC failed: {e}")))?
    }

    pub async fn remove(&self, id: String) -> Result<Option<Reply>, RepliesError> {
        ractor::call!(self.actor, ReplyActorMessage::Remove, id)
            .map_err(|e| RepliesError::RactorError(format!("Remove RPC failed: {e}")))?
    }

    /// Returns the updated reply, or `ReplyNotFound` without writing anything.
    pub async fn record_use(&self, id: String) -> Result<Reply, RepliesError> {
        ractor::call!(self.actor, ReplyActorMessage::RecordUse, id)
            .map_err(|e| RepliesError::RactorError(format!("RecordUse RPC failed: {e}")))?
    }

    pub async fn all(&self) -> Result<Vec<Reply>, RepliesError> {
        ractor::call!(self.actor, ReplyActorMessage::All)
            .map_err(|e| RepliesError::RactorError(format!("All RPC failed: {e}")))?
    }

    pub async fn get(&self, id: String) -> Result<Option<Reply>, RepliesError> {
        ractor::call!(self.actor, ReplyActorMessage::Get, id)
            .map_err(|e| RepliesError::RactorError(format!("Get RPC failed: {e}")))?
    }
}

struct ReplyActorState {
    store: Arc<dyn PluginStore>,
    seed: SeedReply,
}

impl ReplyActorState {
    async fn load(&self) -> Result<ReplyMap, RepliesError> {
        match self.store.get(PLUGIN_NAME, STORE_NAME).await? {
            None | Some(Value::Null) => Ok(ReplyMap::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    async fn save(&self, replies: &ReplyMap) -> Result<(), RepliesError> {
        let value = serde_json::to_value(replies)?;
        self.store.set(PLUGIN_NAME, STORE_NAME, value).await
    }

    async fn add(&self, title: String, content: String) -> Result<Reply, RepliesError> {
        let mut replies = self.load().await?;
        let mut id = new_reply_id();
        while replies.contains_key(&id) {
            id = new_reply_id();
        }
        let record = Reply::new(id, title, content);
        replies.insert(record.id.clone(), record.clone());
        self.save(&replies).await?;

        info!(id = %record.id, title = %record.title, "Canned reply added");
        Ok(record)
    }

    async fn edit(&self, id: String, title: String, content: String) -> Result<Reply, RepliesError> {
        let mut replies = self.load().await?;
        let previous = replies.remove(&id);
        let record = Reply::new(id, title, content);
        replies.insert(record.id.clone(), record.clone());
        self.save(&replies).await?;

        info!(
            id = %record.id,
            title = %record.title,
            existed = previous.is_some(),
            "Canned reply edited"
        );
        Ok(record)
    }

    async fn remove(&self, id: &str) -> Result<Option<Reply>, RepliesError> {
        let mut replies = self.load().await?;
        let removed = replies.remove(id);
        self.save(&replies).await?;

        info!(id = %id, existed = removed.is_some(), "Canned reply removed");
        Ok(removed)
    }

    async fn record_use(&self, id: String) -> Result<Reply, RepliesError> {
        let mut replies = self.load().await?;
        let Some(record) = replies.get_mut(&id) else {
            return Err(RepliesError::ReplyNotFound(id));
        };
        record.record_use();
        let record = record.clone();
        self.save(&replies).await?;

        debug!(id = %record.id, usages = ?record.usages, "Canned reply used");
        Ok(record)
    }

    /// Loads the collection, inserting the seed reply first if it is empty.
    async fn ensure_seeded(&self) -> Result<ReplyMap, RepliesError> {
        let replies = self.load().await?;
        if !replies.is_empty() {
            return Ok(replies);
        }

        self.add(self.seed.title.clone(), self.seed.content.clone())
            .await?;
        self.load().await
    }

    async fn all(&self) -> Result<Vec<Reply>, RepliesError> {
        let mut replies: Vec<Reply> = self.ensure_seeded().await?.into_values().collect();
        replies.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(replies)
    }

    async fn get(&self, id: &str) -> Result<Option<Reply>, RepliesError> {
        Ok(self.all().await?.into_iter().find(|reply| reply.id == id))
    }
}

struct ReplyActor;

#[ractor::async_trait]
impl Actor for ReplyActor {
    type Msg = ReplyActorMessage;
    type State = ReplyActorState;
    type Arguments = (Arc<dyn PluginStore>, SeedReply);

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        (store, seed): Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(seed_title = %seed.title, "ReplyActor initialized");
        Ok(ReplyActorState { store, seed })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            ReplyActorMessage::Add(title, content, reply) => {
                let _ = reply.send(state.add(title, content).await);
            }
            ReplyActorMessage::Edit(id, title, content, reply) => {
                let _ = reply.send(state.edit(id, title, content).await);
            }
            ReplyActorMessage::Remove(id, reply) => {
                let _ = reply.send(state.remove(&id).await);
            }
            ReplyActorMessage::RecordUse(id, reply) => {
                let _ = reply.send(state.record_use(id).await);
            }
            ReplyActorMessage::All(reply) => {
                let _ = reply.send(state.all().await);
            }
            ReplyActorMessage::Get(id, reply) => {
                let _ = reply.send(state.get(&id).await);
            }
        }
        Ok(())
    }
}

/// Spawn the reply repository actor over `store` and return a cloneable handle.
pub async fn spawn(
    store: Arc<dyn PluginStore>,
    seed: SeedReply,
) -> Result<ReplyRepositoryHandle, RepliesError> {
    let (actor, _jh) = ractor::Actor::spawn(None, ReplyActor, (store, seed))
        .await
        .map_err(|e| RepliesError::RactorError(format!("failed to spawn ReplyActor: {e}")))?;

    Ok(ReplyRepositoryHandle { actor })
}
