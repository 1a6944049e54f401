//! Host-side service: owns every tournament, persists after each mutation and notifies.
//!
//! Each tournament sits behind its own lock, so mutations of one tournament are
//! serialized while different tournaments proceed independently.

use crate::models::{Tournament, TournamentError, TournamentId};
use crate::notify::Notifier;
use crate::store::{StoreError, TournamentStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Errors from service operations.
#[derive(Debug)]
pub enum ServiceError {
    Tournament(TournamentError),
    /// The mutation was applied in memory but could not be stored.
    Store(StoreError),
    UnknownTournament(TournamentId),
    DuplicateTournament(TournamentId),
    LockPoisoned,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Tournament(e) => write!(f, "{}", e),
            ServiceError::Store(e) => write!(f, "{}", e),
            ServiceError::UnknownTournament(id) => write!(f, "No tournament {}", id),
            ServiceError::DuplicateTournament(id) => write!(f, "Tournament {} already exists", id),
            ServiceError::LockPoisoned => write!(f, "lock error"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<TournamentError> for ServiceError {
    fn from(e: TournamentError) -> Self {
        ServiceError::Tournament(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

type Entry = Arc<Mutex<Tournament>>;

pub struct TournamentService {
    tournaments: RwLock<HashMap<TournamentId, Entry>>,
    store: Box<dyn TournamentStore>,
    notifier: Notifier,
    rng: Mutex<StdRng>,
}

impl TournamentService {
    /// `seed` fixes the random source for seeding and colour resolution.
    pub fn new(store: Box<dyn TournamentStore>, notifier: Notifier, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            tournaments: RwLock::new(HashMap::new()),
            store,
            notifier,
            rng: Mutex::new(rng),
        }
    }

    /// Load every stored snapshot. Returns how many tournaments were loaded.
    pub fn load(&self) -> Result<usize, ServiceError> {
        let snapshots = self.store.load_all()?;
        let mut g = self.tournaments.write().map_err(|_| ServiceError::LockPoisoned)?;
        for bytes in snapshots {
            let t = Tournament::from_snapshot(&bytes).map_err(StoreError::from)?;
            log::info!("Loaded tournament {} ({})", t.id, t.name);
            g.insert(t.id.clone(), Arc::new(Mutex::new(t)));
        }
        Ok(g.len())
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Create, persist and announce a new tournament.
    pub fn create(&self, id: TournamentId, name: String) -> Result<Tournament, ServiceError> {
        let t = Tournament::new(id.clone(), name);
        {
            let mut g = self.tournaments.write().map_err(|_| ServiceError::LockPoisoned)?;
            if g.contains_key(&id) {
                return Err(ServiceError::DuplicateTournament(id));
            }
            g.insert(id.clone(), Arc::new(Mutex::new(t.clone())));
        }
        self.persist(&t)?;
        Ok(t)
    }

    pub fn ids(&self) -> Result<Vec<TournamentId>, ServiceError> {
        let g = self.tournaments.read().map_err(|_| ServiceError::LockPoisoned)?;
        let mut ids: Vec<_> = g.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn entry(&self, id: &str) -> Result<Entry, ServiceError> {
        let g = self.tournaments.read().map_err(|_| ServiceError::LockPoisoned)?;
        g.get(id)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownTournament(id.to_string()))
    }

    /// Copy of the current state.
    pub fn snapshot(&self, id: &str) -> Result<Tournament, ServiceError> {
        let entry = self.entry(id)?;
        let t = entry.lock().map_err(|_| ServiceError::LockPoisoned)?;
        Ok(t.clone())
    }

    /// Run a mutation with exclusive access, then persist and notify.
    ///
    /// A failed persist is reported but the in-memory change stays; the next successful
    /// persist brings the store back in line.
    pub fn update<T, F>(&self, id: &str, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Tournament, &mut StdRng) -> Result<T, TournamentError>,
    {
        let entry = self.entry(id)?;
        let mut t = entry.lock().map_err(|_| ServiceError::LockPoisoned)?;
        let out = {
            // Shared by every tournament; a panic in one mutation leaves it usable.
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut *t, &mut *rng)?
        };
        self.persist(&t)?;
        Ok(out)
    }

    fn persist(&self, t: &Tournament) -> Result<(), ServiceError> {
        let bytes = t.to_snapshot().map_err(StoreError::from)?;
        if let Err(e) = self.store.save(&t.id, &bytes) {
            log::error!("{}: persist failed: {}", t.id, e);
            return Err(e.into());
        }
        self.notifier.notify(&t.id);
        Ok(())
    }
}
