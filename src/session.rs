//! Session state and the access gate.
//!
//! A [`Session`] holds everything that changes while one person talks to
//! Gideon: access state, transcript, greeting flag and the cached lock flag.
//! The [`Gate`] owns the secrets and the lock store and is the only thing that
//! moves a session between states.

use serde::{Deserialize, Serialize};

use crate::conversation::Transcript;
use crate::error::SessionError;
use crate::lock::{LockState, LockStore};

/// Someone allowed to use the assistant, and the keyword that identifies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub keyword: String,
    /// When false the keyword is compared case-insensitively.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

fn default_case_sensitive() -> bool {
    true
}

impl Identity {
    fn accepts(&self, keyword: &str) -> bool {
        if self.case_sensitive {
            self.keyword == keyword
        } else {
            self.keyword.to_lowercase() == keyword.to_lowercase()
        }
    }
}

/// Where a session stands with respect to the keyword gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessState {
    Unauthenticated,
    Authenticated { identity: String },
}

/// Per-session state, passed explicitly to the gate and the assistant.
#[derive(Debug, Clone)]
pub struct Session {
    access: AccessState,
    transcript: Transcript,
    greeted: bool,
    locked: bool,
}

impl Session {
    /// A fresh, unauthenticated session seeded with the persisted lock flag.
    pub fn new(lock: LockState) -> Self {
        Self {
            access: AccessState::Unauthenticated,
            transcript: Transcript::new(),
            greeted: false,
            locked: lock.locked,
        }
    }

    pub fn access(&self) -> &AccessState {
        &self.access
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.access, AccessState::Authenticated { .. })
    }

    /// Name of the authenticated identity.
    pub fn identity(&self) -> Option<&str> {
        match &self.access {
            AccessState::Authenticated { identity } => Some(identity.as_str()),
            AccessState::Unauthenticated => None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub(crate) fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// The greeting for the authenticated user, returned only once per session.
    pub fn take_greeting(&mut self) -> Option<String> {
        if self.greeted {
            return None;
        }
        let name = self.identity()?.to_string();
        self.greeted = true;
        Some(format!("Hello {name}!"))
    }

    /// Fail unless the session may exchange messages.
    pub fn ensure_active(&self) -> Result<(), SessionError> {
        if self.locked {
            return Err(SessionError::Locked);
        }
        if !self.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        Ok(())
    }
}

/// Result of presenting a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Access granted to the named identity.
    Granted { identity: String },
    /// Wrong keyword: the system is now locked.
    Locked,
    /// Blank input; nothing happened.
    Ignored,
}

/// Result of presenting an unlock code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked,
    WrongCode,
    NotLocked,
}

/// Keyword gate and panic lock.
pub struct Gate {
    identities: Vec<Identity>,
    sos_code: String,
    store: Box<dyn LockStore>,
}

impl Gate {
    pub fn new(identities: Vec<Identity>, sos_code: impl Into<String>, store: Box<dyn LockStore>) -> Self {
        Self {
            identities,
            sos_code: sos_code.into(),
            store,
        }
    }

    /// Persisted lock state (fail-open).
    pub fn lock_state(&self) -> LockState {
        self.store.load()
    }

    /// Start a session, picking up any persisted lock.
    pub fn open_session(&self) -> Session {
        Session::new(self.store.load())
    }

    /// Re-read the persisted lock into the session, e.g. after another process
    /// triggered SOS.
    pub fn refresh(&self, session: &mut Session) {
        session.locked = self.store.load().locked;
    }

    /// Present a keyword. A wrong keyword locks the system.
    pub fn present_keyword(
        &self,
        session: &mut Session,
        keyword: &str,
    ) -> Result<GateOutcome, SessionError> {
        if session.locked {
            return Err(SessionError::Locked);
        }
        if let AccessState::Authenticated { identity } = &session.access {
            return Ok(GateOutcome::Granted {
                identity: identity.clone(),
            });
        }
        if keyword.trim().is_empty() {
            return Ok(GateOutcome::Ignored);
        }

        match self.identities.iter().find(|id| id.accepts(keyword)) {
            Some(id) => {
                tracing::info!(identity = %id.name, "access granted");
                session.access = AccessState::Authenticated {
                    identity: id.name.clone(),
                };
                Ok(GateOutcome::Granted {
                    identity: id.name.clone(),
                })
            }
            None => {
                tracing::warn!("wrong keyword, locking system");
                self.lock(session);
                Ok(GateOutcome::Locked)
            }
        }
    }

    /// Present the unlock code.
    pub fn unlock(&self, session: &mut Session, code: &str) -> UnlockOutcome {
        self.refresh(session);
        if !session.locked {
            return UnlockOutcome::NotLocked;
        }
        if code != self.sos_code {
            tracing::warn!("wrong unlock code");
            return UnlockOutcome::WrongCode;
        }
        self.store.save(LockState::UNLOCKED);
        session.locked = false;
        tracing::info!("system unlocked");
        UnlockOutcome::Unlocked
    }

    /// Lock the system and the session.
    pub fn lock(&self, session: &mut Session) {
        self.store.save(LockState::LOCKED);
        session.locked = true;
    }
}
