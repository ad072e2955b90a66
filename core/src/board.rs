use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BoardPhase {
    #[default]
    Live,
    /// Cards are flipping to blank before a new grid replaces them.
    Resetting,
}

/// How the cards currently on the board came to be.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BoardOrigin {
    /// Drawn from the dispenser, the shell plays the reveal flip.
    #[default]
    Built,
    /// Read back from the store, shown as saved.
    Restored,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Rebuild {
    config: BoardConfig,
    seed: u64,
}

/// Grid of cards backed by a phrase dispenser and a state store.
///
/// Cards are laid out column by column, which is both the build order and the
/// order of the saved fields.
#[derive(Clone, Debug)]
pub struct Board<S> {
    config: BoardConfig,
    cells: Array2<Card>,
    dispenser: PhraseDispenser,
    store: S,
    phase: BoardPhase,
    origin: BoardOrigin,
    rebuild: Option<Rebuild>,
}

impl<S: StateStore> Board<S> {
    /// Builds a fresh board from the dispenser's current position and saves it.
    pub fn build(config: BoardConfig, mut dispenser: PhraseDispenser, store: S) -> Result<Self> {
        check_capacity(&config, dispenser.remaining())?;
        let cells = populate(&config, &mut dispenser)?;
        let mut board = Self {
            config,
            cells,
            dispenser,
            store,
            phase: BoardPhase::Live,
            origin: BoardOrigin::Built,
            rebuild: None,
        };
        board.after_populate();
        Ok(board)
    }

    /// Rebuilds the board saved in `state`, adopting its dimensions.
    ///
    /// The dispenser is taken as given and knows nothing about the restored
    /// phrases, so a reroll may draw one that is already on the board.
    pub fn restore(state: &BoardState, dispenser: PhraseDispenser, store: S) -> Result<Self> {
        state.validate()?;
        let cards = state.fields.iter().map(Card::from_state).collect();
        let cells = grid(state.size(), cards)?;
        let free_space = cells.iter().any(Card::is_free);
        let mut board = Self {
            config: BoardConfig::new_unchecked(state.size(), free_space),
            cells,
            dispenser,
            store,
            phase: BoardPhase::Live,
            origin: BoardOrigin::Restored,
            rebuild: None,
        };
        if board.dispenser.is_exhausted() {
            board.disable_rerolls();
        }
        log::debug!("board restored, {}x{}", state.cols, state.rows);
        Ok(board)
    }

    /// Restores the saved board if there is a usable one, otherwise builds and saves a fresh one.
    pub fn load(config: BoardConfig, dispenser: PhraseDispenser, mut store: S) -> Result<Self> {
        match store.load().map(|json| BoardState::from_json(&json)) {
            Some(Ok(state)) => return Self::restore(&state, dispenser, store),
            Some(Err(err)) => {
                log::warn!("discarding saved board: {}", err);
                store.clear();
            }
            None => log::debug!("no saved board"),
        }
        Self::build(config, dispenser, store)
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn origin(&self) -> BoardOrigin {
        self.origin
    }

    pub fn dispenser(&self) -> &PhraseDispenser {
        &self.dispenser
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rerolls_available(&self) -> bool {
        !self.dispenser.is_exhausted()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (cols, rows) = self.size();
        if coords.0 < cols && coords.1 < rows {
            Ok(coords)
        } else {
            Err(BingoError::InvalidCoords)
        }
    }

    pub fn card_at(&self, coords: Coord2) -> Result<&Card> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    /// All cards with their position, in build order.
    pub fn cards(&self) -> impl Iterator<Item = (Coord2, &Card)> {
        self.cells
            .indexed_iter()
            .map(|((x, y), card)| ((x as Coord, y as Coord), card))
    }

    /// Non-free cards in the order they flip to show their phrase after a build.
    pub fn reveal_order(&self) -> Vec<Coord2> {
        self.cards()
            .filter(|(_, card)| !card.is_free())
            .map(|(coords, _)| coords)
            .collect()
    }

    pub fn check(&mut self, coords: Coord2) -> Result<ActionOutcome> {
        let coords = self.validate_coords(coords)?;
        let outcome = self.cells[coords.to_nd_index()].check();
        if outcome.has_update() {
            self.notify(CardEvent::Checked(coords));
        }
        Ok(outcome)
    }

    /// Starts swapping the card to the next phrase, a no-op once the pool ran dry.
    pub fn reroll(&mut self, coords: Coord2) -> Result<ActionOutcome> {
        let coords = self.validate_coords(coords)?;
        if self.phase != BoardPhase::Live
            || self.dispenser.is_exhausted()
            || !self.cells[coords.to_nd_index()].can_reroll()
        {
            return Ok(ActionOutcome::NoChange);
        }
        let phrase = self.dispenser.next()?;
        log::trace!("{:?} reroll, {} phrases left", coords, self.dispenser.remaining());
        Ok(self.cells[coords.to_nd_index()].begin_reroll(phrase))
    }

    /// Completes the card's pending flip, see [`Card::settle`].
    pub fn settle(&mut self, coords: Coord2) -> Result<SettleOutcome> {
        let coords = self.validate_coords(coords)?;
        let outcome = self.cells[coords.to_nd_index()].settle();
        match outcome {
            SettleOutcome::NoChange => {}
            SettleOutcome::Swapped => {
                self.notify(CardEvent::Swapped(coords));
                if self.phase == BoardPhase::Resetting {
                    self.cells[coords.to_nd_index()].begin_reset();
                }
            }
            SettleOutcome::Reset => {
                self.finish_rebuild()?;
            }
        }
        Ok(outcome)
    }

    /// Replaces the board with a freshly shuffled one.
    ///
    /// Every live card first flips to blank, the new grid only appears once all
    /// of them settled. Requests arriving while that happens replace the queued
    /// one instead of starting over.
    pub fn new_board(&mut self, config: BoardConfig, seed: u64) -> Result<ActionOutcome> {
        check_capacity(&config, self.dispenser.total())?;
        self.rebuild = Some(Rebuild { config, seed });
        if self.phase == BoardPhase::Resetting {
            log::debug!("rebuild already running, queued {:?}", config.size);
            return Ok(ActionOutcome::Pending);
        }

        self.phase = BoardPhase::Resetting;
        for card in self.cells.iter_mut() {
            card.begin_reset();
        }
        if self.finish_rebuild()? {
            Ok(ActionOutcome::Changed)
        } else {
            Ok(ActionOutcome::Pending)
        }
    }

    pub fn serialize(&self) -> BoardState {
        BoardState {
            version: STATE_VERSION,
            rows: self.config.rows(),
            cols: self.config.cols(),
            fields: self.cells.iter().map(Card::to_state).collect(),
        }
    }

    pub fn clear_persisted_state(&mut self) {
        log::debug!("clearing saved board");
        self.store.clear();
    }

    fn is_settled_for_rebuild(&self) -> bool {
        self.cells.iter().all(|card| match card.phase() {
            CardPhase::Blank => true,
            CardPhase::Idle => card.is_free(),
            CardPhase::Swapping | CardPhase::Resetting => false,
        })
    }

    fn finish_rebuild(&mut self) -> Result<bool> {
        if self.phase != BoardPhase::Resetting || !self.is_settled_for_rebuild() {
            return Ok(false);
        }
        let Some(Rebuild { config, seed }) = self.rebuild.take() else {
            self.phase = BoardPhase::Live;
            return Ok(false);
        };

        self.dispenser.reset(seed);
        self.cells = populate(&config, &mut self.dispenser)?;
        self.config = config;
        self.phase = BoardPhase::Live;
        self.origin = BoardOrigin::Built;
        self.after_populate();
        Ok(true)
    }

    fn after_populate(&mut self) {
        log::debug!(
            "board built, {}x{}, {} phrases left",
            self.config.cols(),
            self.config.rows(),
            self.dispenser.remaining()
        );
        if self.dispenser.is_exhausted() {
            self.disable_rerolls();
        }
        self.persist();
    }

    fn notify(&mut self, event: CardEvent) {
        log::trace!("{:?}", event);
        if let CardEvent::Swapped(_) = event {
            if self.dispenser.is_exhausted() {
                self.disable_rerolls();
            }
        }
        self.persist();
    }

    fn disable_rerolls(&mut self) {
        let disabled = self
            .cells
            .iter_mut()
            .map(Card::disable_reroll)
            .filter(|&was_enabled| was_enabled)
            .count();
        if disabled > 0 {
            log::debug!("phrase pool exhausted, rerolls disabled on {} cards", disabled);
        }
    }

    fn persist(&mut self) {
        let json = self.serialize().to_json();
        self.store.save(&json);
    }
}

fn check_capacity(config: &BoardConfig, available: usize) -> Result<()> {
    let requested = config.phrases_needed();
    if requested > available {
        Err(BingoError::InsufficientData {
            requested,
            available,
        })
    } else {
        Ok(())
    }
}

fn populate(config: &BoardConfig, dispenser: &mut PhraseDispenser) -> Result<Array2<Card>> {
    let free_cell = config.free_cell();
    let mut cards = Vec::with_capacity(config.total_cells().into());
    for x in 0..config.cols() {
        for y in 0..config.rows() {
            let card = if free_cell == Some((x, y)) {
                Card::free()
            } else {
                Card::new(dispenser.next()?)
            };
            cards.push(card);
        }
    }
    grid(config.size, cards)
}

fn grid(size: Coord2, cards: Vec<Card>) -> Result<Array2<Card>> {
    let found = cards.len();
    Array2::from_shape_vec(size.to_nd_index(), cards).map_err(|_| BingoError::CorruptState {
        expected: mult(size.0, size.1).into(),
        found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    fn phrases(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("phrase {i}")).collect()
    }

    fn board(config: BoardConfig, n: usize) -> Board<MemoryStore> {
        Board::build(config, PhraseDispenser::new(phrases(n), 9), MemoryStore::new()).unwrap()
    }

    fn settle_all(board: &mut Board<MemoryStore>) {
        let coords: Vec<_> = board.cards().map(|(coords, _)| coords).collect();
        for coords in coords {
            // the grid may already have been replaced by the last reset
            board.settle(coords).ok();
        }
    }

    #[test]
    fn build_places_free_space_in_center() {
        let board = board(BoardConfig::default(), 30);

        let free = board.card_at((2, 2)).unwrap();
        assert_eq!(free.visible_text(), FREE_SPACE_TEXT);
        assert!(free.is_checked());
        assert!(!free.is_toggleable());
        assert!(!free.reroll_enabled());
        assert_eq!(board.dispenser().remaining(), 6);
        assert_eq!(board.reveal_order().len(), 24);
        assert!(!board.reveal_order().contains(&(2, 2)));
    }

    #[test]
    fn build_fails_without_enough_phrases() {
        let result = Board::build(
            BoardConfig::new((5, 5), false),
            PhraseDispenser::new(phrases(20), 0),
            MemoryStore::new(),
        );

        assert_eq!(
            result.err(),
            Some(BingoError::InsufficientData {
                requested: 25,
                available: 20
            })
        );
    }

    #[test]
    fn free_space_board_fits_one_phrase_less() {
        let board = board(BoardConfig::new((5, 5), true), 24);

        assert_eq!(board.dispenser().remaining(), 0);
    }

    #[test]
    fn check_persists_immediately() {
        let mut board = board(BoardConfig::default(), 30);
        let writes = board.store().writes();

        assert_eq!(board.check((0, 0)).unwrap(), ActionOutcome::Changed);

        assert_eq!(board.store().writes(), writes + 1);
        let saved = BoardState::from_json(board.store().value().unwrap()).unwrap();
        assert!(saved.fields[0].attributes.checked);
    }

    #[test]
    fn checking_free_space_changes_nothing() {
        let mut board = board(BoardConfig::default(), 30);
        let writes = board.store().writes();

        assert_eq!(board.check((2, 2)).unwrap(), ActionOutcome::NoChange);
        assert!(board.card_at((2, 2)).unwrap().is_checked());
        assert_eq!(board.store().writes(), writes);
    }

    #[test]
    fn reroll_saves_only_after_settle() {
        let mut board = board(BoardConfig::default(), 30);
        board.check((1, 0)).unwrap();
        let before = String::from(board.card_at((1, 0)).unwrap().visible_text());
        let writes = board.store().writes();

        assert_eq!(board.reroll((1, 0)).unwrap(), ActionOutcome::Pending);
        assert_eq!(board.store().writes(), writes);
        assert_eq!(board.check((1, 0)).unwrap(), ActionOutcome::NoChange);

        assert_eq!(board.settle((1, 0)).unwrap(), SettleOutcome::Swapped);
        let card = board.card_at((1, 0)).unwrap();
        assert!(!card.is_checked());
        assert_ne!(card.visible_text(), before);
        assert_eq!(board.store().writes(), writes + 1);
    }

    #[test]
    fn exhausted_pool_refuses_rerolls() {
        let mut board = board(BoardConfig::new((3, 3), false), 9);

        assert_eq!(board.dispenser().remaining(), 0);
        assert!(!board.rerolls_available());
        assert!(board.cards().all(|(_, card)| !card.reroll_enabled()));
        assert_eq!(board.reroll((0, 0)).unwrap(), ActionOutcome::NoChange);
    }

    #[test]
    fn last_swap_disables_rerolls_board_wide() {
        let mut board = board(BoardConfig::new((2, 2), false), 5);

        board.reroll((0, 0)).unwrap();
        assert!(board.card_at((1, 1)).unwrap().reroll_enabled());
        board.settle((0, 0)).unwrap();

        assert!(board.cards().all(|(_, card)| !card.reroll_enabled()));
        let saved = BoardState::from_json(board.store().value().unwrap()).unwrap();
        assert!(saved.fields.iter().all(|field| !field.attributes.reroll));
    }

    #[test]
    fn new_board_waits_for_every_reset() {
        let mut board = board(BoardConfig::default(), 30);

        assert_eq!(
            board.new_board(BoardConfig::default(), 1).unwrap(),
            ActionOutcome::Pending
        );
        assert_eq!(board.phase(), BoardPhase::Resetting);

        board.settle((0, 0)).unwrap();
        assert_eq!(board.card_at((0, 0)).unwrap().phase(), CardPhase::Blank);
        assert_eq!(board.phase(), BoardPhase::Resetting);

        settle_all(&mut board);

        assert_eq!(board.phase(), BoardPhase::Live);
        assert!(board.cards().all(|(_, card)| card.phase() == CardPhase::Idle));
        assert_eq!(board.dispenser().remaining(), 6);
    }

    #[test]
    fn new_board_waits_for_in_flight_swap() {
        let mut board = board(BoardConfig::new((2, 1), false), 10);
        board.reroll((0, 0)).unwrap();

        board.new_board(BoardConfig::new((2, 1), false), 3).unwrap();
        board.settle((1, 0)).unwrap();
        assert_eq!(board.phase(), BoardPhase::Resetting);

        assert_eq!(board.settle((0, 0)).unwrap(), SettleOutcome::Swapped);
        assert_eq!(board.card_at((0, 0)).unwrap().phase(), CardPhase::Resetting);
        assert_eq!(board.phase(), BoardPhase::Resetting);

        assert_eq!(board.settle((0, 0)).unwrap(), SettleOutcome::Reset);
        assert_eq!(board.phase(), BoardPhase::Live);
    }

    #[test]
    fn new_board_too_large_keeps_current_board() {
        let mut board = board(BoardConfig::default(), 30);
        let before = board.serialize();

        let result = board.new_board(BoardConfig::new((6, 6), false), 1);

        assert!(matches!(result, Err(BingoError::InsufficientData { .. })));
        assert_eq!(board.phase(), BoardPhase::Live);
        assert_eq!(board.serialize(), before);
    }

    #[test]
    fn queued_rebuild_uses_latest_request() {
        let mut board = board(BoardConfig::default(), 30);

        board.new_board(BoardConfig::default(), 1).unwrap();
        assert_eq!(
            board.new_board(BoardConfig::new((3, 2), false), 2).unwrap(),
            ActionOutcome::Pending
        );
        settle_all(&mut board);

        assert_eq!(board.size(), (3, 2));
        assert_eq!(board.serialize().fields.len(), 6);
    }

    #[test]
    fn single_free_cell_board_rebuilds_at_once() {
        let mut board = board(BoardConfig::new((1, 1), true), 0);

        assert_eq!(
            board.new_board(BoardConfig::new((1, 1), true), 5).unwrap(),
            ActionOutcome::Changed
        );
        assert_eq!(board.phase(), BoardPhase::Live);
    }

    #[test]
    fn out_of_bounds_coords_are_rejected() {
        let mut board = board(BoardConfig::default(), 30);

        assert_eq!(board.check((5, 0)), Err(BingoError::InvalidCoords));
        assert_eq!(board.reroll((0, 5)), Err(BingoError::InvalidCoords));
    }
}
