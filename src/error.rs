use thiserror::Error;

/// Domain errors surfaced by the game core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("unknown difficulty tier `{0}` (expected easy, normal or hard)")]
    InvalidDifficulty(String),
}
