/// Which side of the game the human chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChoice {
    /// Human knows the word and gives hints; the robot guesses.
    Director,
    /// Human guesses what the robot describes.
    Matcher,
}

/// Outcome of the replay prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayChoice {
    Role(RoleChoice),
    Stop,
}
