use core::time::Duration;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - Playing -> Failed
/// - Playing -> Succeeded
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Playing,
    Failed,
    Succeeded,
}

impl SessionStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Failed | Self::Succeeded)
    }
}

/// Where the selection state machine currently is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SelectionPhase {
    Idle,
    OneSelected(TileId),
    Resolving([TileId; 2]),
}

/// One level being played, from the first shuffle to its outcome.
///
/// All mutation goes through `&mut self`, so every multi-tile update is
/// complete before anyone can look at the session again. Deferred work lives
/// in the session's own scheduler and runs when [`Session::advance`] moves
/// the virtual clock past its due time.
#[derive(Clone, Debug)]
pub struct Session {
    level: LevelNumber,
    board: Board,
    selection: SmallVec<[TileId; 2]>,
    processing: bool,
    hint_budget: u32,
    hint_cursor: usize,
    countdown: Seconds,
    status: SessionStatus,
    timings: Timings,
    clock: Duration,
    next_tick: Duration,
    scheduler: Scheduler,
    rng: SmallRng,
}

impl Session {
    /// Builds a fresh session, `seed` drives hint selection.
    pub fn new<G: DeckGenerator>(
        config: &LevelConfig,
        generator: G,
        timings: Timings,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let board = generator.generate(config)?;
        if board.size() != config.size() {
            return Err(LevelDefect::SizeMismatch {
                rows: config.rows,
                cols: config.cols,
                expected: usize::from(config.total_tiles()),
                actual: usize::from(board.total_tiles()),
            }
            .into());
        }

        log::debug!(
            "Level {} started: {} pairs, {} hints, {}s",
            config.level,
            config.total_pairs(),
            config.hint_budget(),
            config.countdown()
        );

        Ok(Self {
            level: config.level,
            board,
            selection: SmallVec::new(),
            processing: false,
            hint_budget: config.hint_budget(),
            hint_cursor: 0,
            countdown: config.countdown(),
            status: SessionStatus::Playing,
            next_tick: timings.tick_interval(),
            timings,
            clock: Duration::ZERO,
            scheduler: Scheduler::new(0),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Stamps a fresh session with the host's generation.
    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.scheduler.restamp(generation);
        self
    }

    pub fn generation(&self) -> u64 {
        self.scheduler.generation()
    }

    pub fn level(&self) -> LevelNumber {
        self.level
    }

    pub fn size(&self) -> Dim2 {
        self.board.size()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.board.tile(id)
    }

    pub fn selection(&self) -> &[TileId] {
        &self.selection
    }

    pub fn phase(&self) -> SelectionPhase {
        match *self.selection.as_slice() {
            [first] => SelectionPhase::OneSelected(first),
            [first, second] => SelectionPhase::Resolving([first, second]),
            _ => SelectionPhase::Idle,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn hint_budget(&self) -> u32 {
        self.hint_budget
    }

    pub fn hint_cursor(&self) -> usize {
        self.hint_cursor
    }

    pub fn countdown(&self) -> Seconds {
        self.countdown
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn total_pairs(&self) -> TileCount {
        self.board.total_pairs()
    }

    pub fn remaining_pairs(&self) -> TileCount {
        self.board.remaining_pairs()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Time until the next deferred task or countdown tick, if any is due.
    pub fn next_event_in(&self) -> Option<Duration> {
        let tick = (!self.is_finished()).then_some(self.next_tick);
        let next = match (self.scheduler.next_due(), tick) {
            (Some(task), Some(tick)) => task.min(tick),
            (task, tick) => task.or(tick)?,
        };
        Some(next.saturating_sub(self.clock))
    }

    /// Whether the player can currently pick `id`.
    ///
    /// Face-up tiles outside the selection are either matched or still shown
    /// by a hint, only the latter can be picked.
    pub fn can_select(&self, id: TileId) -> bool {
        if !self.accepts_input() || self.selection.contains(&id) {
            return false;
        }
        match self.board.tile(id) {
            Some(tile) => !tile.is_matched() && (!tile.is_flipped() || tile.is_hint_used()),
            None => false,
        }
    }

    pub fn can_hint(&self) -> bool {
        self.hint_budget > 0 && self.accepts_input()
    }

    pub fn select_tile(&mut self, id: TileId) -> SelectOutcome {
        if self.board.tile(id).is_none() {
            log::warn!("Ignoring selection of unknown tile {}", id);
            return SelectOutcome::NoChange;
        }
        if !self.can_select(id) {
            return SelectOutcome::NoChange;
        }

        if let Some(tile) = self.board.tile_mut(id) {
            tile.flip_up();
        }
        self.selection.push(id);

        match self.phase() {
            SelectionPhase::OneSelected(_) => {
                log::debug!("Selected tile {}", id);
                SelectOutcome::Flipped
            }
            SelectionPhase::Resolving(pair) => {
                self.processing = true;
                self.resolve(pair)
            }
            SelectionPhase::Idle => SelectOutcome::NoChange,
        }
    }

    pub fn request_hint(&mut self) -> HintOutcome {
        if !self.can_hint() {
            return HintOutcome::NoChange;
        }

        let Some(pair) = crate::hint::pick_pair(&self.board, &mut self.rng) else {
            log::debug!("No pair left to hint");
            return HintOutcome::NoChange;
        };

        let color = self.timings.hint_color(self.hint_cursor);
        for id in pair {
            if let Some(tile) = self.board.tile_mut(id) {
                tile.reveal_hint(color.clone());
            }
        }
        self.hint_budget -= 1;
        self.hint_cursor += 1;
        self.schedule(self.timings.hint_exposure(), Deferred::ExpireHint(pair));

        log::debug!(
            "Hinted tiles {:?} with {:?}, {} hints left",
            pair,
            color,
            self.hint_budget
        );
        HintOutcome::Revealed(pair)
    }

    /// Moves the virtual clock forward, running due tasks and ticks in order.
    ///
    /// Tasks due at the same instant as a tick run first.
    pub fn advance(&mut self, elapsed: Duration) -> AdvanceOutcome {
        let target = self.clock.saturating_add(elapsed);
        let mut outcome = AdvanceOutcome::NoChange;

        loop {
            let task = self.scheduler.next_due().filter(|&due| due <= target);
            let tick = (!self.is_finished() && self.next_tick <= target).then_some(self.next_tick);

            match (task, tick) {
                (Some(due), Some(tick)) if due <= tick => outcome = outcome | self.run_due(due),
                (_, Some(tick)) => {
                    self.clock = tick;
                    self.next_tick = tick.saturating_add(self.timings.tick_interval());
                    outcome = outcome | self.tick();
                }
                (Some(due), None) => outcome = outcome | self.run_due(due),
                (None, None) => break,
            }
        }

        self.clock = target;
        outcome
    }

    fn accepts_input(&self) -> bool {
        self.status.is_playing() && !self.processing
    }

    fn schedule(&mut self, delay: Duration, task: Deferred) {
        let due = self.clock.saturating_add(delay);
        self.scheduler.schedule(due, task);
    }

    fn resolve(&mut self, [first, second]: [TileId; 2]) -> SelectOutcome {
        let is_match = match (self.board.tile(first), self.board.tile(second)) {
            (Some(a), Some(b)) => a.pairs_with(b),
            _ => false,
        };

        if is_match {
            for id in [first, second] {
                if let Some(tile) = self.board.tile_mut(id) {
                    tile.mark_matched();
                }
            }
            self.schedule(
                self.timings.settle_delay(),
                Deferred::SettleMatch([first, second]),
            );
            log::debug!(
                "Matched tiles {} and {}, {} pairs left",
                first,
                second,
                self.remaining_pairs()
            );

            match self.evaluate_outcome() {
                Some(SessionStatus::Succeeded) => SelectOutcome::Won,
                _ => SelectOutcome::Matched,
            }
        } else {
            self.schedule(
                self.timings.reveal_delay(),
                Deferred::RevertMismatch([first, second]),
            );
            log::debug!("Tiles {} and {} do not match", first, second);
            SelectOutcome::Mismatched
        }
    }

    fn run_due(&mut self, due: Duration) -> AdvanceOutcome {
        self.clock = due;
        let mut changed = false;
        while let Some(task) = self.scheduler.pop_due(due) {
            changed |= self.run_deferred(task);
        }
        if changed {
            AdvanceOutcome::Changed
        } else {
            AdvanceOutcome::NoChange
        }
    }

    /// Applies a deferred task against the current state of its pinned tiles.
    fn run_deferred(&mut self, task: Deferred) -> bool {
        log::trace!("Running {:?} at {:?}", task, self.clock);

        match task {
            Deferred::SettleMatch(pair) => self.release_selection(pair),
            Deferred::RevertMismatch(pair) => {
                for id in pair {
                    if let Some(tile) = self.board.tile_mut(id) {
                        tile.flip_down();
                    }
                }
                self.release_selection(pair);
                true
            }
            Deferred::ExpireHint(pair) => {
                let mut changed = false;
                for id in pair {
                    // a hinted tile the player picked belongs to the selection now
                    if self.selection.contains(&id) {
                        continue;
                    }
                    if let Some(tile) = self.board.tile_mut(id) {
                        changed |= tile.flip_down();
                    }
                }
                changed
            }
        }
    }

    fn release_selection(&mut self, pair: [TileId; 2]) -> bool {
        if self.selection.as_slice() != pair {
            log::warn!(
                "Stale release of {:?}, current selection is {:?}",
                pair,
                self.selection
            );
            return false;
        }
        self.selection.clear();
        self.processing = false;
        true
    }

    fn tick(&mut self) -> AdvanceOutcome {
        if self.is_finished() {
            return AdvanceOutcome::NoChange;
        }

        self.countdown = self.countdown.saturating_sub(1);
        log::trace!("Countdown at {}s", self.countdown);

        match self.evaluate_outcome() {
            Some(SessionStatus::Succeeded) => AdvanceOutcome::Succeeded,
            Some(SessionStatus::Failed) => AdvanceOutcome::Failed,
            _ => AdvanceOutcome::Changed,
        }
    }

    /// Decides the outcome once, success taking priority over the countdown.
    fn evaluate_outcome(&mut self) -> Option<SessionStatus> {
        if !self.status.is_playing() {
            return None;
        }

        self.status = if self.remaining_pairs() == 0 {
            SessionStatus::Succeeded
        } else if self.countdown == 0 {
            SessionStatus::Failed
        } else {
            return None;
        };

        log::info!(
            "Level {} {:?} with {}s left",
            self.level,
            self.status,
            self.countdown
        );
        Some(self.status)
    }
}
