/// Answer cards each player holds between submissions.
pub const HAND_SIZE: usize = 8;
/// Players required before the first round can start.
pub const MIN_PLAYERS: usize = 3;

/// Whether a session with `player_count` players may start a round.
pub fn can_start(player_count: usize) -> bool {
    player_count >= MIN_PLAYERS
}
