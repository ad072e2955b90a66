use crate::storage::LocalStore;
use crate::utils::*;
use bingo_core as bingo;
use bingo::{
    ActionOutcome, Board, BoardConfig, BoardOrigin, BoardPhase, Card, CardPhase, Coord2,
    Orientation, PhraseDispenser, SettleOutcome, StateStore,
};
use core::time::Duration;
use gloo::timers::callback::{Interval, Timeout};
use yew::prelude::*;

fn millis(duration: Duration) -> u32 {
    duration.as_millis().try_into().unwrap_or(u32::MAX)
}

/// Requests a new board and returns the cards whose reset this request started.
///
/// A request queued behind a running rebuild starts nothing, the cards already
/// have their settle timers.
fn request_new_board<S: StateStore>(
    board: &mut Board<S>,
    config: BoardConfig,
    seed: u64,
) -> bingo::Result<(ActionOutcome, Vec<Coord2>)> {
    let already_resetting = board.phase() == BoardPhase::Resetting;
    let outcome = board.new_board(config, seed)?;
    let started = if already_resetting || outcome != ActionOutcome::Pending {
        Vec::new()
    } else {
        board
            .cards()
            .filter(|(_, card)| card.phase() == CardPhase::Resetting)
            .map(|(coords, _)| coords)
            .collect()
    };
    Ok((outcome, started))
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct BoardProps {
    pub config: BoardConfig,
    pub phrases_url: AttrValue,
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    PhrasesLoaded(Result<String, String>),
    Check(Coord2),
    Reroll(Coord2),
    Settle(Coord2),
    RevealNext,
    NewBoard,
    ClearState,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    coords: Coord2,
    front: AttrValue,
    back: AttrValue,
    flipped: bool,
    checked: bool,
    free: bool,
    #[prop_or_default]
    reroll: bool,
    #[prop_or_default]
    locked: bool,
    #[prop_or_default]
    concealed: bool,
    on_check: Callback<Coord2>,
    on_reroll: Callback<Coord2>,
}

impl CardProps {
    fn class(&self) -> Classes {
        let mut class = classes!("flip-card");
        if self.flipped {
            class.push("flip");
        }
        if self.checked {
            class.push("checked");
        }
        if self.free {
            class.push("flip-card--free");
        }
        if self.locked {
            class.push("locked");
        }
        if self.concealed {
            class.push("concealed");
        }
        class
    }
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let class = props.class();
    let CardProps {
        coords,
        front,
        back,
        reroll,
        on_check,
        on_reroll,
        ..
    } = props.clone();

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("{:?} click", coords);
        on_check.emit(coords);
    });

    let refresh_button = |face: &AttrValue| {
        let on_reroll = on_reroll.clone();
        (reroll && !face.is_empty()).then(|| {
            html! {
                <button
                    class="refresh-button"
                    onclick={Callback::from(move |e: MouseEvent| {
                        e.stop_propagation();
                        on_reroll.emit(coords);
                    })}
                >
                    <i class="fas fa-redo"/>
                </button>
            }
        })
    };

    html! {
        <div {class} {onclick}>
            <div class="flip-card-inner">
                <div class="flip-card__content flip-card__content--front">
                    {refresh_button(&front)}
                    <span class="text">{front.clone()}</span>
                </div>
                <div class="flip-card__content flip-card__content--back">
                    {refresh_button(&back)}
                    <span class="text">{back.clone()}</span>
                </div>
            </div>
        </div>
    }
}

pub(crate) struct BoardView {
    board: Option<Board<LocalStore>>,
    error: Option<String>,
    reveal: Vec<Coord2>,
    revealed: usize,
    reveal_timer: Option<Interval>,
}

impl BoardView {
    fn seed(ctx: &Context<Self>) -> u64 {
        ctx.props().seed.unwrap_or_else(js_random_seed)
    }

    fn load_phrases(ctx: &Context<Self>) {
        let url = ctx.props().phrases_url.clone();
        ctx.link().send_future(async move {
            Msg::PhrasesLoaded(fetch_phrases(&url).await.map_err(|err| format!("{err:#}")))
        });
    }

    fn schedule_settle(ctx: &Context<Self>, coords: Coord2, delay: Duration) {
        let link = ctx.link().clone();
        Timeout::new(millis(delay), move || link.send_message(Msg::Settle(coords))).forget();
    }

    fn start_reveal(&mut self, ctx: &Context<Self>) {
        self.reveal = self
            .board
            .as_ref()
            .map(|board| board.reveal_order())
            .unwrap_or_default();
        self.revealed = 0;
        let link = ctx.link().clone();
        self.reveal_timer = Some(Interval::new(millis(bingo::REVEAL_STAGGER), move || {
            link.send_message(Msg::RevealNext)
        }));
    }

    fn is_concealed(&self, coords: Coord2) -> bool {
        self.reveal
            .get(self.revealed..)
            .is_some_and(|pending| pending.contains(&coords))
    }

    fn on_phrases(&mut self, ctx: &Context<Self>, source: Result<String, String>) -> bool {
        let source = match source {
            Ok(source) => source,
            Err(err) => {
                log::error!("could not load phrases: {}", err);
                self.error = Some(err);
                return true;
            }
        };

        let dispenser = PhraseDispenser::from_source(&source, Self::seed(ctx));
        match Board::load(ctx.props().config, dispenser, LocalStore::default()) {
            Ok(board) => {
                let origin = board.origin();
                self.board = Some(board);
                self.error = None;
                if origin == BoardOrigin::Built {
                    self.start_reveal(ctx);
                }
            }
            Err(err) => {
                log::error!("could not create board: {}", err);
                self.error = Some(err.to_string());
            }
        }
        true
    }

    fn on_settle(&mut self, ctx: &Context<Self>, coords: Coord2) -> bool {
        let Some(board) = self.board.as_mut() else {
            return false;
        };

        match board.settle(coords) {
            Ok(SettleOutcome::NoChange) => false,
            Ok(SettleOutcome::Swapped) => {
                // a rebuild may have been requested while the card was swapping
                if matches!(board.card_at(coords).map(Card::phase), Ok(CardPhase::Resetting)) {
                    Self::schedule_settle(ctx, coords, bingo::RESET_SETTLE);
                }
                true
            }
            Ok(SettleOutcome::Reset) => {
                if board.phase() == BoardPhase::Live {
                    self.start_reveal(ctx);
                }
                true
            }
            Err(err) => {
                log::warn!("settle {:?}: {}", coords, err);
                false
            }
        }
    }

    fn on_new_board(&mut self, ctx: &Context<Self>) -> bool {
        let Some(board) = self.board.as_mut() else {
            return false;
        };

        match request_new_board(board, ctx.props().config, js_random_seed()) {
            Ok((ActionOutcome::Pending, started)) => {
                for coords in started {
                    Self::schedule_settle(ctx, coords, bingo::RESET_SETTLE);
                }
                self.error = None;
                true
            }
            Ok((ActionOutcome::Changed, _)) => {
                self.error = None;
                self.start_reveal(ctx);
                true
            }
            Ok((ActionOutcome::NoChange, _)) => false,
            Err(err) => {
                log::error!("could not create board: {}", err);
                self.error = Some(err.to_string());
                true
            }
        }
    }

    fn card_props(&self, ctx: &Context<Self>, board: &Board<LocalStore>, coords: Coord2, card: &Card) -> CardProps {
        let (front, back) = card.faces();
        CardProps {
            coords,
            front: AttrValue::from(front.to_string()),
            back: AttrValue::from(back.to_string()),
            flipped: card.orientation() == Orientation::BackUp,
            checked: card.is_checked(),
            free: card.is_free(),
            reroll: card.reroll_enabled() && board.rerolls_available(),
            locked: card.phase().is_locked(),
            concealed: self.is_concealed(coords),
            on_check: ctx.link().callback(Msg::Check),
            on_reroll: ctx.link().callback(Msg::Reroll),
        }
    }
}

impl Component for BoardView {
    type Message = Msg;
    type Properties = BoardProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self::load_phrases(ctx);
        Self {
            board: None,
            error: None,
            reveal: Vec::new(),
            revealed: 0,
            reveal_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            PhrasesLoaded(source) => self.on_phrases(ctx, source),
            Check(coords) => {
                log::debug!("check card: {:?}", coords);
                self.board
                    .as_mut()
                    .and_then(|board| board.check(coords).ok())
                    .is_some_and(ActionOutcome::has_update)
            }
            Reroll(coords) => {
                log::debug!("reroll card: {:?}", coords);
                let outcome = self.board.as_mut().and_then(|board| board.reroll(coords).ok());
                if outcome == Some(ActionOutcome::Pending) {
                    Self::schedule_settle(ctx, coords, bingo::SWAP_SETTLE);
                }
                outcome.is_some_and(ActionOutcome::has_update)
            }
            Settle(coords) => self.on_settle(ctx, coords),
            RevealNext => {
                self.revealed += 1;
                if self.revealed >= self.reveal.len() {
                    self.reveal_timer = None;
                }
                true
            }
            NewBoard => self.on_new_board(ctx),
            ClearState => {
                if let Some(board) = self.board.as_mut() {
                    board.clear_persisted_state();
                }
                if let Err(err) = gloo::utils::window().location().reload() {
                    log::error!("failed to reload: {:?}", err);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let cb_new_board = ctx.link().callback(|_: MouseEvent| NewBoard);
        let cb_clear_state = ctx.link().callback(|_: MouseEvent| ClearState);
        let cb_print = Callback::from(|_: MouseEvent| {
            if let Err(err) = gloo::utils::window().print() {
                log::error!("failed to print: {:?}", err);
            }
        });

        let field = self.board.as_ref().map(|board| {
            let (cols, rows) = board.size();
            html! {
                <div class="field-container">
                    {
                        for (0..cols).map(|x| html! {
                            <div class="col">
                                {
                                    for (0..rows).filter_map(|y| {
                                        let coords = (x, y);
                                        let card = board.card_at(coords).ok()?;
                                        let props = self.card_props(ctx, board, coords, card);
                                        Some(html! { <CardView ..props/> })
                                    })
                                }
                            </div>
                        })
                    }
                </div>
            }
        });

        html! {
            <div class="bingo">
                <div class="actions">
                    <button class="button blue button-new-card" onclick={cb_new_board}>
                        <i class="fas fa-th"/>{" New Bingo"}
                    </button>
                    <button class="button button-print" onclick={cb_print}>
                        <i class="fas fa-print"/>{" Print Bingo"}
                    </button>
                    <button class="button button-reset-state" onclick={cb_clear_state}>
                        {"Reset saved board"}
                    </button>
                </div>
                {for self.error.as_ref().map(|err| html! { <p class="error">{err}</p> })}
                {for field}
            </div>
        }
    }
}
