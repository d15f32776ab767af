use core::time::Duration;
use rand::prelude::*;

use crate::*;

/// Owns the session being played and replaces it on every level load.
///
/// Each successful load bumps the generation. The previous session is dropped
/// together with its scheduler, so no deferred work of an old level can reach
/// the new one. Events stamped with an older generation are ignored.
#[derive(Debug)]
pub struct SessionHost<S> {
    source: S,
    timings: Timings,
    rng: SmallRng,
    generation: u64,
    session: Option<Session>,
}

impl<S: LevelSource> SessionHost<S> {
    pub fn new(source: S, timings: Timings, seed: u64) -> Self {
        Self {
            source,
            timings,
            rng: SmallRng::seed_from_u64(seed),
            generation: 0,
            session: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn view(&self) -> Option<SessionView> {
        self.session.as_ref().map(SessionView::from_session)
    }

    /// Starts `level` from scratch.
    ///
    /// On failure nothing changes: the current session, if any, keeps running.
    pub fn load_level(&mut self, level: LevelNumber) -> Result<&Session> {
        let config = self.source.load(level).inspect_err(|err| {
            log::error!("Level {} could not be loaded: {}", level, err);
        })?;

        let deck_seed = self.rng.random();
        let hint_seed = self.rng.random();
        let generation = self.generation + 1;
        let session = Session::new(
            &config,
            RandomDeckGenerator::new(deck_seed),
            self.timings.clone(),
            hint_seed,
        )?
        .with_generation(generation);

        if let Some(previous) = &self.session {
            log::debug!(
                "Discarding level {} (generation {}) with {} pending tasks",
                previous.level(),
                previous.generation(),
                previous.pending_tasks()
            );
        }
        self.generation = generation;
        Ok(self.session.insert(session))
    }

    /// Reloads the current level with a new arrangement.
    pub fn restart(&mut self) -> Result<&Session> {
        let level = self.session.as_ref().map_or(1, Session::level);
        self.load_level(level)
    }

    pub fn select_tile(&mut self, id: TileId) -> SelectOutcome {
        self.session
            .as_mut()
            .map_or(SelectOutcome::NoChange, |session| session.select_tile(id))
    }

    pub fn request_hint(&mut self) -> HintOutcome {
        self.session
            .as_mut()
            .map_or(HintOutcome::NoChange, Session::request_hint)
    }

    pub fn advance(&mut self, elapsed: Duration) -> AdvanceOutcome {
        self.session
            .as_mut()
            .map_or(AdvanceOutcome::NoChange, |session| session.advance(elapsed))
    }

    /// Like [`Self::advance`], for time measured while `generation` was current.
    pub fn advance_stamped(&mut self, generation: u64, elapsed: Duration) -> AdvanceOutcome {
        if generation != self.generation {
            log::warn!(
                "Ignoring time from generation {}, current is {}",
                generation,
                self.generation
            );
            return AdvanceOutcome::NoChange;
        }
        self.advance(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    const SECOND: Duration = Duration::from_secs(1);

    struct TwoLevels;

    impl LevelSource for TwoLevels {
        fn load(&self, level: LevelNumber) -> Result<LevelConfig> {
            match level {
                1 => LevelConfig::new(1, (2, 2), ["a", "a", "b", "b"]),
                2 => LevelConfig::new(2, (1, 2), ["c", "c"]),
                3 => LevelConfig::new(3, (1, 2), ["c", "d"]),
                _ => Err(GameError::LevelLoad {
                    level,
                    reason: String::from("missing"),
                }),
            }
        }

        fn level_count(&self) -> LevelNumber {
            3
        }
    }

    fn mismatch(session: &Session) -> (TileId, TileId) {
        let a = session.board()[(0, 0)].id();
        let b = session
            .board()
            .iter()
            .find(|tile| tile.value() != session.tile(a).unwrap().value())
            .unwrap()
            .id();
        (a, b)
    }

    #[test]
    fn no_session_until_a_level_loads() {
        let mut host = SessionHost::new(TwoLevels, Timings::default(), 1);

        assert!(host.session().is_none());
        assert_eq!(host.select_tile(0), SelectOutcome::NoChange);
        assert_eq!(host.request_hint(), HintOutcome::NoChange);
        assert_eq!(host.advance(SECOND), AdvanceOutcome::NoChange);
        assert_eq!(host.view(), None);
    }

    #[test]
    fn switching_levels_discards_pending_work() {
        let mut host = SessionHost::new(TwoLevels, Timings::default(), 1);
        host.load_level(1).unwrap();
        let (a, b) = mismatch(host.session().unwrap());
        host.select_tile(a);
        host.select_tile(b);
        host.request_hint();
        assert_eq!(host.generation(), 1);

        let session = host.load_level(2).unwrap();
        assert_eq!(session.generation(), 2);
        assert_eq!(session.pending_tasks(), 0);
        assert_eq!(session.hint_budget(), 2);

        host.select_tile(0);
        host.advance(SECOND * 3);
        let session = host.session().unwrap();
        assert_eq!(session.level(), 2);
        assert_eq!(session.selection(), &[0]);
        assert!(session.tile(0).unwrap().is_flipped());
    }

    #[test]
    fn failed_load_keeps_current_session() {
        let mut host = SessionHost::new(TwoLevels, Timings::default(), 1);
        host.load_level(1).unwrap();

        assert!(matches!(
            host.load_level(7),
            Err(GameError::LevelLoad { level: 7, .. })
        ));
        assert!(matches!(
            host.load_level(3),
            Err(GameError::InvalidLevel(LevelDefect::UnpairedValue { .. }))
        ));

        assert_eq!(host.generation(), 1);
        assert_eq!(host.session().unwrap().level(), 1);
    }

    #[test]
    fn stale_time_is_ignored() {
        let mut host = SessionHost::new(TwoLevels, Timings::default(), 1);
        host.load_level(1).unwrap();
        host.load_level(1).unwrap();

        assert_eq!(host.advance_stamped(1, SECOND * 2), AdvanceOutcome::NoChange);
        assert_eq!(host.session().unwrap().countdown(), 9);

        assert_eq!(host.advance_stamped(2, SECOND * 2), AdvanceOutcome::Changed);
        assert_eq!(host.session().unwrap().countdown(), 7);
    }

    #[test]
    fn restart_resets_session_state() {
        let mut host = SessionHost::new(TwoLevels, Timings::default(), 1);
        host.load_level(1).unwrap();
        host.request_hint();
        host.advance(SECOND * 4);

        let session = host.restart().unwrap();

        assert_eq!(session.level(), 1);
        assert_eq!(session.hint_budget(), 1);
        assert_eq!(session.countdown(), 9);
        assert!(session.board().iter().all(|tile| !tile.is_flipped()));
    }

    #[test]
    fn view_tracks_current_generation() {
        let mut host = SessionHost::new(TwoLevels, Timings::default(), 1);
        host.load_level(2).unwrap();

        let view = host.view().unwrap();

        assert_eq!(view.generation, 1);
        assert_eq!(view.level, 2);
        assert_eq!(view.tiles.len(), 2);
    }
}
