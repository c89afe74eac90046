//! Cookie-keyed session storage.
//!
//! # Design
//! Every client gets a random session id in the `todos.sid` cookie. The
//! store keeps each session as its serialized JSON, so a request always
//! loads the whole `Session` (re-validating it), works on its own copy and
//! saves the whole thing back. The store's lock guards only the map.
//!
//! A session is only stored once a request changes it; until then the
//! client gets no cookie. Stored sessions expire after `idle_ttl` without a
//! request, and storing a new one first drops expired entries and then the
//! least recently seen ones beyond `max_sessions`.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use todo_core::{Session, TodoError};
use tokio::{sync::RwLock, time::Instant};
use uuid::Uuid;

use crate::{error::AppError, AppState};

pub const SESSION_COOKIE: &str = "todos.sid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn cookie(&self) -> String {
        format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.0)
    }
}

/// Bounds on what the store keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_sessions: usize,
    pub idle_ttl: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            idle_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

struct Entry {
    json: String,
    last_seen: Instant,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    seed: bool,
    limits: SessionLimits,
}

impl SessionStore {
    /// With `seed` set, new sessions start with the demo lists.
    pub fn new(seed: bool, limits: SessionLimits) -> Self {
        Self {
            sessions: Arc::default(),
            seed,
            limits,
        }
    }

    fn fresh(&self) -> Session {
        if self.seed {
            Session::seeded()
        } else {
            Session::new()
        }
    }

    fn is_live(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) < self.limits.idle_ttl
    }

    /// True when `id` names a stored, unexpired session.
    pub async fn contains(&self, id: SessionId) -> bool {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .get(&id.0)
            .is_some_and(|entry| self.is_live(entry, now))
    }

    /// The stored session for `id`, or a fresh one when there is none.
    pub async fn load(&self, id: SessionId) -> Result<Session, TodoError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id.0) {
            Some(entry) if self.is_live(entry, now) => {
                entry.last_seen = now;
                Session::from_json(&entry.json)
            }
            _ => Ok(self.fresh()),
        }
    }

    pub async fn save(&self, id: SessionId, session: &Session) -> Result<(), TodoError> {
        let json = session.to_json()?;
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&id.0) {
            self.make_room(&mut sessions, now);
        }
        sessions.insert(id.0, Entry { json, last_seen: now });
        Ok(())
    }

    fn make_room(&self, sessions: &mut HashMap<Uuid, Entry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| self.is_live(entry, now));
        while !sessions.is_empty() && sessions.len() >= self.limits.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
            }
        }
        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!(dropped, "sessions expired or evicted");
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn insert_raw(&self, id: SessionId, json: &str) {
        let entry = Entry {
            json: json.to_string(),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id.0, entry);
    }

    #[cfg(test)]
    pub(crate) async fn raw(&self, id: SessionId) -> Option<String> {
        self.sessions
            .read()
            .await
            .get(&id.0)
            .map(|entry| entry.json.clone())
    }
}

/// Value of cookie `name` in the request's `Cookie` headers, if any.
pub fn cookie_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

/// Middleware attaching a `SessionId` to every routed request. Clients
/// without a live session get a new id, and the cookie for it once a
/// handler has stored something under it.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let mut known = cookie_value(req.headers(), SESSION_COOKIE)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .map(SessionId);
    if let Some(id) = known {
        if !state.sessions.contains(id).await {
            tracing::debug!(session = %id.0, "unknown or expired session cookie");
            known = None;
        }
    }

    let id = known.unwrap_or_else(|| SessionId(Uuid::new_v4()));
    req.extensions_mut().insert(id);
    let mut response = next.run(req).await;
    if known.is_none() && state.sessions.contains(id).await {
        tracing::info!(session = %id.0, "session created");
        if let Ok(cookie) = HeaderValue::from_str(&id.cookie()) {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }
    response
}

/// The caller's session, loaded for the duration of one request.
pub struct CurrentSession {
    id: SessionId,
    pub data: Session,
    loaded: Session,
}

impl CurrentSession {
    /// Store the session if the request changed it.
    pub async fn save(self, store: &SessionStore) -> Result<(), AppError> {
        if self.data != self.loaded {
            store.save(self.id, &self.data).await?;
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<SessionId>()
            .copied()
            .ok_or(AppError::MissingSession)?;
        let data = state.sessions.load(id).await?;
        Ok(Self {
            id,
            loaded: data.clone(),
            data,
        })
    }
}
