//! Error types for rule violations.
//!
//! Errors here are the *recoverable* kind: a player (or driver code)
//! asked for something the rules forbid, and the game state is left
//! untouched. Engine invariant breaches are not errors; they are bugs
//! and are enforced with `assert!` at the violation site.

use thiserror::Error;

use super::entity::EntityId;
use super::player::PlayerId;

/// A rules violation reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A choice must be answered before any other action resolves.
    #[error("{0} has an open choice that must be answered first")]
    ChoiceOpen(PlayerId),

    /// Tried to answer a choice that does not exist.
    #[error("{0} has no open choice")]
    NoOpenChoice(PlayerId),

    /// Acting out of turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    /// The game has already finished.
    #[error("the game is over")]
    GameOver,

    #[error("{player} needs {needed} mana but has {available}")]
    NotEnoughMana {
        player: PlayerId,
        needed: i32,
        available: i32,
    },

    /// The attacker is exhausted, frozen, or has no attack value.
    #[error("{0} cannot attack right now")]
    CannotAttack(EntityId),

    /// Target is protected (taunt elsewhere, stealth) or not attackable.
    #[error("{0} is not a legal target")]
    IllegalTarget(EntityId),

    /// The card demands a target and none was given.
    #[error("{0} requires a target")]
    TargetRequired(EntityId),

    /// Card not in hand, not controlled, or no room to play it.
    #[error("{0} cannot be played")]
    NotPlayable(EntityId),

    /// The hero power was already used this turn.
    #[error("{0} has already used their hero power this turn")]
    HeroPowerExhausted(PlayerId),

    /// Card id not present in the registry.
    #[error("unknown card id {0:?}")]
    UnknownCard(String),
}

/// Shorthand result for fallible game operations.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::NotEnoughMana {
            player: PlayerId::new(0),
            needed: 5,
            available: 2,
        };
        assert_eq!(err.to_string(), "Player 0 needs 5 mana but has 2");

        let err = GameError::ChoiceOpen(PlayerId::new(1));
        assert_eq!(
            err.to_string(),
            "Player 1 has an open choice that must be answered first"
        );

        let err = GameError::UnknownCard("wisp".to_string());
        assert_eq!(err.to_string(), "unknown card id \"wisp\"");
    }
}
