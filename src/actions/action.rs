//! The action data model.
//!
//! Every game mechanic is an [`Action`]: an operation from the closed
//! [`Op`] catalog plus positional arguments. Actions are plain data -
//! card scripts build them, the resolver in this module's siblings
//! executes them, and the same value doubles as an *event pattern* when
//! wrapped in a listener.
//!
//! ## Arguments and values
//!
//! [`Arg`] is what scripts write: entities, selectors, lazy numbers,
//! card pools, or references into the current event record. [`Value`]
//! is what arguments resolve to at execution time. [`EventArgs`] is the
//! immutable record of resolved values a broadcast carries; responses
//! reach into it with `Arg::Event(i)`.
//!
//! ## Composition
//!
//! - `.then(action)` queues a follow-up per resolved target, with the
//!   event record seeded as `[target, ...target args]`
//! - `.times(n)` repeats the whole targeted loop
//! - `.from_source(selector)` redirects who the action resolves as
//! - `.on(...)` / `.after(...)` turn the action into an event pattern
//!   with responses

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EntityId, GameResult, GameTag};
use crate::dsl::{LazyNum, RandomCardPicker, Selector};
use crate::game::Game;
use crate::triggers::{EventListener, Phase};

/// The closed catalog of operations.
///
/// Game ops drive the session itself (turns, combat, plays, choices)
/// and resolve once. Targeted ops resolve per target and make up card
/// text. `resolve` in the sibling modules matches exhaustively on this
/// enum; adding a variant is a compile error until every site decides
/// what to do with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    // === Game ops ===
    /// Proposed attack: `[attacker, defender]`.
    Attack,
    /// Start of a player's turn: `[player]`.
    BeginTurn,
    /// Player gives up: `[player]`.
    Concede,
    /// One entity dying: `[entity]`.
    Death,
    /// Sweep the board for dead entities: no args.
    Deaths,
    /// End of a player's turn: `[player]`.
    EndTurn,
    /// Offer a pick among option entities: `[player, options]`.
    GenericChoice,
    /// Reveal top decks, compare costs: `[challenger sel, defender sel]`.
    Joust,
    /// Offer the opening hand swap: `[player]`.
    MulliganChoice,
    /// Hero power activation: `[player, power, target]`.
    Activate,
    /// Lock mana next turn: `[player, amount]`.
    Overload,
    /// Play a card from hand: `[player, card, target, index, choose]`.
    Play,

    // === Targeted ops ===
    /// Run a card's battlecry or combo script: `[card, target]`.
    Battlecry,
    /// Return a minion to its owner's hand: `[minion]`.
    Bounce,
    /// Attach an enchantment: `[character, buff id]`.
    Buff,
    /// Append another card's deathrattles: `[card, from]`.
    CopyDeathrattles,
    /// Mark a pending play so its scripts are skipped: `[card]`.
    Counter,
    /// Apply staged damage: `[character, staged amount]`.
    Damage,
    /// Fire a card's deathrattle scripts: `[card]`.
    Deathrattle,
    /// Kill outright: `[entity]`.
    Destroy,
    /// Drop from hand to graveyard: `[card]`.
    Discard,
    /// Offer three picks from a pool: `[player, picker]`.
    Discover,
    /// Draw the top card: `[player]`.
    Draw,
    /// Draw up to a hand size: `[player, amount]`.
    DrawUntil,
    /// Take an empty-deck draw penalty: `[player]`.
    Fatigue,
    /// Refill spent mana: `[player, amount]`.
    FillMana,
    /// Draw specific cards out of the deck: `[cards]`.
    ForceDraw,
    /// Heal to full: `[character]`.
    FullHeal,
    /// Add armor: `[hero or player, amount]`.
    GainArmor,
    /// Add full mana crystals: `[player, amount]`.
    GainMana,
    /// Add spent mana crystals: `[player, amount]`.
    GainEmptyMana,
    /// Put new cards in hand: `[player, cards]`.
    Give,
    /// Restore health: `[character, amount]`.
    Heal,
    /// Deal damage from the source: `[character, amount]`.
    Hit,
    /// Temporary mana this turn only: `[player, amount]`.
    ManaThisTurn,
    /// Discard off the top of the deck: `[player, amount]`.
    Mill,
    /// Replace a card with a different one: `[card, into]`.
    Morph,
    /// Stage damage for doubling and reactions: `[character, amount]`.
    Predamage,
    /// Change an attack's defender or a card's target: `[card, new]`.
    Retarget,
    /// Show a hidden card, then bin it: `[card]`.
    Reveal,
    /// Set health by adjusting damage: `[character, amount]`.
    SetCurrentHealth,
    /// Set tag values: `[entity, tags]`.
    SetTag,
    /// Shuffle cards into a deck: `[player, cards]`.
    Shuffle,
    /// Wipe tags, buffs, and listeners: `[character]`.
    Silence,
    /// Take control of a card: `[card]` or `[card, controller sel]`.
    Steal,
    /// Put minions in play from nowhere: `[player, cards]`.
    Summon,
    /// Exchange the zones of two cards: `[card, other]`.
    Swap,
    /// Exchange current health of two characters: `[character, other]`.
    SwapHealth,
    /// Clear overload debt: `[player]`.
    UnlockOverload,
    /// Remove tags: `[entity, tags]`.
    UnsetTag,
}

impl Op {
    /// Game ops resolve once against the session; targeted ops resolve
    /// per target.
    #[must_use]
    pub fn is_game_op(self) -> bool {
        matches!(
            self,
            Op::Attack
                | Op::BeginTurn
                | Op::Concede
                | Op::Death
                | Op::Deaths
                | Op::EndTurn
                | Op::GenericChoice
                | Op::Joust
                | Op::MulliganChoice
                | Op::Activate
                | Op::Overload
                | Op::Play
        )
    }
}

/// How a card pool argument names its cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardSpec {
    /// An already-live entity.
    Entity(EntityId),
    /// Materialize one new card by id.
    Id(String),
    /// Materialize one new card per id.
    Ids(Vec<String>),
    /// Materialize random picks.
    Pick(RandomCardPicker),
}

/// A positional action argument as written in a script.
///
/// In an executable position each variant resolves to a [`Value`]. In a
/// pattern position (a listener), `None` is a wildcard, entities match
/// by identity, selectors act as predicates over the *listener owner*,
/// and fixed amounts match by value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arg {
    /// Missing value; matches anything as a pattern.
    None,
    Entity(EntityId),
    /// Several concrete entities.
    Entities(Vec<EntityId>),
    Select(Selector),
    Amount(LazyNum),
    /// Cards to materialize when the action resolves.
    Cards(CardSpec),
    /// Tag/value pairs for tag ops.
    Tags(Vec<(GameTag, i32)>),
    /// Index into the current event record.
    Event(usize),
}

impl Arg {
    /// Reference position `index` of the current event record.
    #[must_use]
    pub fn event(index: usize) -> Self {
        Arg::Event(index)
    }

    /// Resolve to a concrete value.
    ///
    /// Panics if an `Event` argument is used with no event record in
    /// scope, or if the index is out of range - both are script bugs,
    /// not game situations.
    pub fn resolve(
        &self,
        game: &mut Game,
        source: EntityId,
        event: Option<&EventArgs>,
    ) -> Value {
        match self {
            Arg::None => Value::None,
            Arg::Entity(id) => Value::Entity(*id),
            Arg::Entities(ids) => Value::Entities(ids.clone()),
            Arg::Select(selector) => Value::Entities(selector.eval(game, source)),
            Arg::Amount(lazy) => Value::Int(lazy.evaluate(game, source)),
            Arg::Cards(spec) => Value::Entities(materialize(game, spec, source)),
            Arg::Tags(tags) => Value::Tags(tags.clone()),
            Arg::Event(index) => {
                let record = event
                    .unwrap_or_else(|| panic!("event argument {index} used outside a trigger"));
                record
                    .get(*index)
                    .unwrap_or_else(|| panic!("event argument {index} out of range"))
                    .clone()
            }
        }
    }

    /// Pattern match against one resolved broadcast value.
    ///
    /// Selector arguments are evaluated relative to `owner`, the entity
    /// whose listener is asking.
    pub fn matches(&self, game: &Game, owner: EntityId, value: &Value) -> bool {
        if let Arg::None = self {
            return true;
        }
        match (self, value) {
            (_, Value::None) => false,
            (Arg::Entity(id), Value::Entity(v)) => id == v,
            (Arg::Entities(ids), Value::Entity(v)) => ids.contains(v),
            (Arg::Entities(ids), Value::Entities(vs)) => ids == vs,
            (Arg::Select(selector), Value::Entity(v)) => selector.test(game, owner, *v),
            (Arg::Amount(LazyNum::Fixed(n)), Value::Int(m)) => n == m,
            _ => false,
        }
    }
}

/// Create the entities a [`CardSpec`] names, set aside under the
/// source's controller.
fn materialize(game: &mut Game, spec: &CardSpec, source: EntityId) -> Vec<EntityId> {
    let controller = game.controller_of(source);
    match spec {
        CardSpec::Entity(id) => vec![*id],
        CardSpec::Id(id) => vec![game.create_card(id, controller)],
        CardSpec::Ids(ids) => ids
            .iter()
            .map(|id| game.create_card(id, controller))
            .collect(),
        CardSpec::Pick(picker) => {
            let ids = picker.evaluate(game, source);
            ids.iter()
                .map(|id| game.create_card(id, controller))
                .collect()
        }
    }
}

impl From<EntityId> for Arg {
    fn from(id: EntityId) -> Self {
        Arg::Entity(id)
    }
}

impl From<Option<EntityId>> for Arg {
    fn from(id: Option<EntityId>) -> Self {
        match id {
            Some(id) => Arg::Entity(id),
            None => Arg::None,
        }
    }
}

impl From<Selector> for Arg {
    fn from(selector: Selector) -> Self {
        Arg::Select(selector)
    }
}

impl From<LazyNum> for Arg {
    fn from(lazy: LazyNum) -> Self {
        Arg::Amount(lazy)
    }
}

impl From<i32> for Arg {
    fn from(n: i32) -> Self {
        Arg::Amount(LazyNum::Fixed(n))
    }
}

impl From<GameTag> for Arg {
    fn from(tag: GameTag) -> Self {
        Arg::Tags(vec![(tag, 1)])
    }
}

impl From<Vec<(GameTag, i32)>> for Arg {
    fn from(tags: Vec<(GameTag, i32)>) -> Self {
        Arg::Tags(tags)
    }
}

impl From<&str> for Arg {
    fn from(id: &str) -> Self {
        Arg::Cards(CardSpec::Id(id.to_string()))
    }
}

impl From<String> for Arg {
    fn from(id: String) -> Self {
        Arg::Cards(CardSpec::Id(id))
    }
}

impl From<RandomCardPicker> for Arg {
    fn from(picker: RandomCardPicker) -> Self {
        Arg::Cards(CardSpec::Pick(picker))
    }
}

impl From<CardSpec> for Arg {
    fn from(spec: CardSpec) -> Self {
        Arg::Cards(spec)
    }
}

/// A resolved argument value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    None,
    Int(i32),
    Entity(EntityId),
    Entities(Vec<EntityId>),
    Tags(Vec<(GameTag, i32)>),
}

impl Value {
    /// The integer inside, or a panic: callers only unwrap positions
    /// the catalog guarantees are numeric.
    #[must_use]
    pub fn as_int(&self) -> i32 {
        match self {
            Value::Int(n) => *n,
            other => panic!("expected an integer value, got {other:?}"),
        }
    }

    /// The single entity inside (panics otherwise).
    #[must_use]
    pub fn as_entity(&self) -> EntityId {
        match self {
            Value::Entity(id) => *id,
            other => panic!("expected an entity value, got {other:?}"),
        }
    }

    /// The single entity inside, if any.
    #[must_use]
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Value::Entity(id) => Some(*id),
            Value::None => None,
            Value::Entities(ids) => ids.first().copied(),
            other => panic!("expected an entity value, got {other:?}"),
        }
    }

    /// All entities inside. `None` is the empty set.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        match self {
            Value::None => Vec::new(),
            Value::Entity(id) => vec![*id],
            Value::Entities(ids) => ids.clone(),
            other => panic!("expected entities, got {other:?}"),
        }
    }
}

/// The immutable record of values a broadcast carries.
///
/// Built once per broadcast from already-resolved values and passed
/// down the call chain read-only; responses address into it via
/// `Arg::Event(i)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventArgs {
    values: SmallVec<[Value; 4]>,
}

impl EventArgs {
    /// Build a record from resolved values.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Value at a position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the record in position order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }
}

/// How many times a targeted action repeats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repeat {
    Fixed(u32),
    /// Evaluated once, just before the first repetition.
    Eval(LazyNum),
    /// Resolve an action; its first integer result is the count.
    FromAction(Box<Action>),
}

impl Repeat {
    /// Resolve to a concrete repetition count (never negative).
    pub fn resolve(
        &self,
        game: &mut Game,
        source: EntityId,
        event: Option<&EventArgs>,
    ) -> GameResult<u32> {
        match self {
            Repeat::Fixed(n) => Ok(*n),
            Repeat::Eval(lazy) => Ok(lazy.evaluate(game, source).max(0) as u32),
            Repeat::FromAction(action) => {
                let results = action.trigger(game, source, event)?;
                let count = results.first().map_or(0, Value::as_int);
                Ok(count.max(0) as u32)
            }
        }
    }
}

impl From<u32> for Repeat {
    fn from(n: u32) -> Self {
        Repeat::Fixed(n)
    }
}

impl From<LazyNum> for Repeat {
    fn from(lazy: LazyNum) -> Self {
        Repeat::Eval(lazy)
    }
}

impl From<Action> for Repeat {
    fn from(action: Action) -> Self {
        Repeat::FromAction(Box::new(action))
    }
}

/// Which buff property an override replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffProp {
    Atk,
    MaxHealth,
}

/// One operation with its arguments, follow-ups, and modifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub op: Op,
    pub args: SmallVec<[Arg; 3]>,
    /// Queued per resolved target with event record `[target, ...]`.
    pub callback: Vec<Action>,
    /// Repetitions of the whole targeted loop.
    pub times: Repeat,
    /// Resolve as whoever this selects instead of the queueing source.
    /// Must select exactly one entity.
    pub source_override: Option<Selector>,
    /// Buff op only: lazily computed property replacements.
    pub overrides: Vec<(BuffProp, LazyNum)>,
}

impl Action {
    /// Build a raw action. Prefer the per-op constructors.
    #[must_use]
    pub fn new(op: Op, args: impl IntoIterator<Item = Arg>) -> Self {
        Self {
            op,
            args: args.into_iter().collect(),
            callback: Vec::new(),
            times: Repeat::Fixed(1),
            source_override: None,
            overrides: Vec::new(),
        }
    }

    // === Builders ===

    /// Add a follow-up queued per resolved target.
    #[must_use]
    pub fn then(mut self, action: Action) -> Self {
        self.callback.push(action);
        self
    }

    /// Repeat the targeted loop.
    #[must_use]
    pub fn times(mut self, times: impl Into<Repeat>) -> Self {
        self.times = times.into();
        self
    }

    /// Resolve as the entity this selector finds (exactly one).
    #[must_use]
    pub fn from_source(mut self, selector: Selector) -> Self {
        self.source_override = Some(selector);
        self
    }

    /// Buff op only: replace a buff property with a lazy value,
    /// evaluated when the buff is applied.
    #[must_use]
    pub fn with_override(mut self, prop: BuffProp, value: impl Into<LazyNum>) -> Self {
        self.overrides.push((prop, value.into()));
        self
    }

    /// Use this action as an ON pattern with the given responses.
    #[must_use]
    pub fn on(self, responses: impl IntoIterator<Item = Action>) -> EventListener {
        EventListener::new(self, Phase::On, responses)
    }

    /// Use this action as an AFTER pattern with the given responses.
    #[must_use]
    pub fn after(self, responses: impl IntoIterator<Item = Action>) -> EventListener {
        EventListener::new(self, Phase::After, responses)
    }

    // === Pattern matching ===

    /// Whether a broadcast record matches this action as a pattern.
    ///
    /// Positions beyond either side's length are unchecked.
    pub fn matches_args(&self, game: &Game, owner: EntityId, args: &EventArgs) -> bool {
        self.args
            .iter()
            .zip(args.iter())
            .all(|(pattern, value)| pattern.matches(game, owner, value))
    }

    // === Game op constructors ===

    /// Propose an attack between two characters.
    pub fn attack(attacker: EntityId, defender: EntityId) -> Self {
        Self::new(Op::Attack, [Arg::Entity(attacker), Arg::Entity(defender)])
    }

    /// Start a player's turn.
    pub fn begin_turn(player: impl Into<Arg>) -> Self {
        Self::new(Op::BeginTurn, [player.into()])
    }

    /// A player gives up the game.
    pub fn concede(player: impl Into<Arg>) -> Self {
        Self::new(Op::Concede, [player.into()])
    }

    /// Process one entity's death. Queued by the death sweep.
    pub fn death(target: impl Into<Arg>) -> Self {
        Self::new(Op::Death, [target.into()])
    }

    /// Sweep the game for dead entities.
    pub fn deaths() -> Self {
        Self::new(Op::Deaths, [])
    }

    /// End a player's turn.
    pub fn end_turn(player: impl Into<Arg>) -> Self {
        Self::new(Op::EndTurn, [player.into()])
    }

    /// Offer a player a pick among option entities.
    pub fn generic_choice(player: impl Into<Arg>, options: impl Into<Arg>) -> Self {
        Self::new(Op::GenericChoice, [player.into(), options.into()])
    }

    /// Reveal a random minion from each side's deck and compare costs.
    /// Callbacks see `[challenger card, defender card]`.
    pub fn joust(challenger: Selector, defender: Selector) -> Self {
        Self::new(Op::Joust, [Arg::Select(challenger), Arg::Select(defender)])
    }

    /// Offer a player their opening hand swap.
    pub fn mulligan_choice(player: impl Into<Arg>) -> Self {
        Self::new(Op::MulliganChoice, [player.into()])
    }

    /// Activate a hero power, optionally at a target.
    pub fn activate(player: EntityId, power: EntityId, target: Option<EntityId>) -> Self {
        Self::new(
            Op::Activate,
            [Arg::Entity(player), Arg::Entity(power), target.into()],
        )
    }

    /// Lock mana crystals for the player's next turn.
    pub fn overload(player: impl Into<Arg>, amount: i32) -> Self {
        Self::new(Op::Overload, [player.into(), amount.into()])
    }

    /// Play a card from hand.
    pub fn play(
        player: EntityId,
        card: EntityId,
        target: Option<EntityId>,
        index: Option<usize>,
        choose: Option<EntityId>,
    ) -> Self {
        let index = match index {
            Some(i) => Arg::from(i as i32),
            None => Arg::None,
        };
        Self::new(
            Op::Play,
            [
                Arg::Entity(player),
                Arg::Entity(card),
                target.into(),
                index,
                choose.into(),
            ],
        )
    }

    // === Targeted op constructors ===

    /// Run a card's battlecry (or combo) script at a target.
    pub fn battlecry(card: impl Into<Arg>, target: impl Into<Arg>) -> Self {
        Self::new(Op::Battlecry, [card.into(), target.into()])
    }

    /// Return minions to their owners' hands.
    pub fn bounce(target: impl Into<Arg>) -> Self {
        Self::new(Op::Bounce, [target.into()])
    }

    /// Attach an enchantment to each target. Combine with
    /// [`Action::with_override`] for computed stats.
    pub fn buff(target: impl Into<Arg>, buff_id: impl Into<String>) -> Self {
        Self::new(
            Op::Buff,
            [target.into(), Arg::Cards(CardSpec::Id(buff_id.into()))],
        )
    }

    /// Append the deathrattles of `from` onto each target.
    pub fn copy_deathrattles(target: impl Into<Arg>, from: impl Into<Arg>) -> Self {
        Self::new(Op::CopyDeathrattles, [target.into(), from.into()])
    }

    /// Mark pending plays as countered.
    pub fn counter(target: impl Into<Arg>) -> Self {
        Self::new(Op::Counter, [target.into()])
    }

    /// Apply the damage staged on each target. Scripts deal damage
    /// with [`Action::hit`]; this is the second half of its pipeline.
    pub fn damage(target: impl Into<Arg>) -> Self {
        Self::new(Op::Damage, [target.into()])
    }

    /// Fire each target's deathrattle scripts.
    pub fn deathrattle(target: impl Into<Arg>) -> Self {
        Self::new(Op::Deathrattle, [target.into()])
    }

    /// Kill targets outright, without dealing damage.
    pub fn destroy(target: impl Into<Arg>) -> Self {
        Self::new(Op::Destroy, [target.into()])
    }

    /// Drop cards from hand to the graveyard.
    pub fn discard(target: impl Into<Arg>) -> Self {
        Self::new(Op::Discard, [target.into()])
    }

    /// Offer three picks from a card pool.
    pub fn discover(player: impl Into<Arg>, picker: RandomCardPicker) -> Self {
        Self::new(
            Op::Discover,
            [player.into(), Arg::Cards(CardSpec::Pick(picker))],
        )
    }

    /// Draw the top card of the deck.
    pub fn draw(target: impl Into<Arg>) -> Self {
        Self::new(Op::Draw, [target.into()])
    }

    /// Draw until the player holds `amount` cards.
    pub fn draw_until(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::DrawUntil, [target.into(), amount.into()])
    }

    /// Take one fatigue hit for drawing from an empty deck.
    pub fn fatigue(target: impl Into<Arg>) -> Self {
        Self::new(Op::Fatigue, [target.into()])
    }

    /// Refill spent mana crystals this turn.
    pub fn fill_mana(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::FillMana, [target.into(), amount.into()])
    }

    /// Draw specific cards out of the deck.
    pub fn force_draw(cards: impl Into<Arg>) -> Self {
        Self::new(Op::ForceDraw, [cards.into()])
    }

    /// Heal each target to full health.
    pub fn full_heal(target: impl Into<Arg>) -> Self {
        Self::new(Op::FullHeal, [target.into()])
    }

    /// Add armor to heroes.
    pub fn gain_armor(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::GainArmor, [target.into(), amount.into()])
    }

    /// Add full mana crystals.
    pub fn gain_mana(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::GainMana, [target.into(), amount.into()])
    }

    /// Add spent mana crystals.
    pub fn gain_empty_mana(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::GainEmptyMana, [target.into(), amount.into()])
    }

    /// Put new cards in hand.
    pub fn give(target: impl Into<Arg>, cards: impl Into<Arg>) -> Self {
        Self::new(Op::Give, [target.into(), cards.into()])
    }

    /// Restore health, respecting healing modifiers.
    pub fn heal(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::Heal, [target.into(), amount.into()])
    }

    /// Deal damage from the resolving source. Spell sources add their
    /// controller's spell damage.
    pub fn hit(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::Hit, [target.into(), amount.into()])
    }

    /// Gain temporary mana for this turn only.
    pub fn mana_this_turn(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::ManaThisTurn, [target.into(), amount.into()])
    }

    /// Discard cards off the top of the deck.
    pub fn mill(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::Mill, [target.into(), amount.into()])
    }

    /// Replace each target with a different card.
    pub fn morph(target: impl Into<Arg>, into: impl Into<Arg>) -> Self {
        Self::new(Op::Morph, [target.into(), into.into()])
    }

    /// Stage damage so reactions can modify it before it lands.
    pub fn predamage(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::Predamage, [target.into(), amount.into()])
    }

    /// Redirect an in-flight attack or a card's target.
    pub fn retarget(target: impl Into<Arg>, new_target: impl Into<Arg>) -> Self {
        Self::new(Op::Retarget, [target.into(), new_target.into()])
    }

    /// Show a hidden card, then send it to the graveyard.
    pub fn reveal(target: impl Into<Arg>) -> Self {
        Self::new(Op::Reveal, [target.into()])
    }

    /// Set current health by adjusting damage.
    pub fn set_current_health(target: impl Into<Arg>, amount: impl Into<Arg>) -> Self {
        Self::new(Op::SetCurrentHealth, [target.into(), amount.into()])
    }

    /// Set tag values on each target.
    pub fn set_tag(target: impl Into<Arg>, tags: impl Into<Arg>) -> Self {
        Self::new(Op::SetTag, [target.into(), tags.into()])
    }

    /// Shuffle cards into the target player's deck.
    pub fn shuffle_into_deck(target: impl Into<Arg>, cards: impl Into<Arg>) -> Self {
        Self::new(Op::Shuffle, [target.into(), cards.into()])
    }

    /// Wipe buffs, granted tags, and listeners from each target.
    pub fn silence(target: impl Into<Arg>) -> Self {
        Self::new(Op::Silence, [target.into()])
    }

    /// Take control of each target card.
    pub fn steal(target: impl Into<Arg>) -> Self {
        Self::new(Op::Steal, [target.into()])
    }

    /// Take control of each target card for a specific player.
    pub fn steal_for(target: impl Into<Arg>, controller: Selector) -> Self {
        Self::new(Op::Steal, [target.into(), Arg::Select(controller)])
    }

    /// Put minions into play for the target player.
    pub fn summon(target: impl Into<Arg>, cards: impl Into<Arg>) -> Self {
        Self::new(Op::Summon, [target.into(), cards.into()])
    }

    /// Exchange the zones of each target with another card.
    pub fn swap(target: impl Into<Arg>, other: impl Into<Arg>) -> Self {
        Self::new(Op::Swap, [target.into(), other.into()])
    }

    /// Exchange current health with another character.
    pub fn swap_health(target: impl Into<Arg>, other: impl Into<Arg>) -> Self {
        Self::new(Op::SwapHealth, [target.into(), other.into()])
    }

    /// Clear the target player's overload debt.
    pub fn unlock_overload(target: impl Into<Arg>) -> Self {
        Self::new(Op::UnlockOverload, [target.into()])
    }

    /// Remove tags from each target.
    pub fn unset_tag(target: impl Into<Arg>, tags: impl Into<Arg>) -> Self {
        Self::new(Op::UnsetTag, [target.into(), tags.into()])
    }

    // === Resolution ===

    /// Resolve this action as `source`.
    ///
    /// `event` is the event record when the action runs as a trigger
    /// response or callback. Returns per-target results for targeted
    /// ops; game ops return no values.
    pub fn trigger(
        &self,
        game: &mut Game,
        source: EntityId,
        event: Option<&EventArgs>,
    ) -> GameResult<Vec<Value>> {
        if self.op.is_game_op() {
            super::game_ops::resolve(game, self, source, event)
        } else {
            super::targeted::resolve(game, self, source, event)
        }
    }
}
