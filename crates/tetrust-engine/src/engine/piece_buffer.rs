use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::PieceKind;

use super::config::Randomizer;

/// Upcoming-piece queue and hold slot.
///
/// # Randomizers
///
/// - [`Randomizer::SevenBag`]: all 7 kinds are shuffled into a bag and drawn
///   in order; a new shuffled bag is appended whenever 7 or fewer remain.
/// - [`Randomizer::Uniform`]: each kind is drawn independently.
///
/// Either way the queue always holds more than 7 kinds, so at least 7 can be
/// previewed. All randomness comes from a PCG generator seeded with a
/// [`PieceSeed`], so the same seed yields the same sequence.
///
/// # Hold
///
/// - The first hold stores the current kind and draws the next one from the queue
/// - Later holds swap the current kind with the held one
///
/// # Example
///
/// ```
/// use tetrust_engine::{PieceBuffer, Randomizer};
///
/// let mut buffer = PieceBuffer::new(Randomizer::SevenBag);
///
/// let first = buffer.pop_next();
/// let upcoming: Vec<_> = buffer.next_pieces().take(5).collect();
/// assert_eq!(upcoming.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    randomizer: Randomizer,
    bag: VecDeque<PieceKind>,
    held: Option<PieceKind>,
}

impl PieceBuffer {
    /// Creates a new piece buffer with a random seed.
    #[must_use]
    pub fn new(randomizer: Randomizer) -> Self {
        Self::with_seed(randomizer, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(randomizer: Randomizer, seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            randomizer,
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
            held: None,
        };
        this.fill_bag();
        this
    }

    fn fill_bag(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            match self.randomizer {
                Randomizer::SevenBag => {
                    let mut new_bag = PieceKind::ALL;
                    new_bag.shuffle(&mut self.rng);
                    self.bag.extend(new_bag);
                }
                Randomizer::Uniform => {
                    let kind = self.rng.random();
                    self.bag.push_back(kind);
                }
            }
        }
    }

    /// Draws the next piece kind, refilling the queue as needed.
    pub fn pop_next(&mut self) -> PieceKind {
        self.fill_bag();
        let kind = self
            .bag
            .pop_front()
            .expect("fill_bag leaves more than 7 pieces queued");
        self.fill_bag();
        kind
    }

    /// Returns an iterator over the upcoming pieces, next first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }

    /// Returns what piece would be received if hold is used now.
    ///
    /// - If a piece is held: returns the held piece
    /// - If no piece is held: returns the next piece from the queue
    #[must_use]
    pub fn peek_hold_result(&self) -> PieceKind {
        self.held.unwrap_or_else(|| self.bag[0])
    }

    /// Stores `current` in the hold slot and returns the piece to play instead.
    pub fn hold(&mut self, current: PieceKind) -> PieceKind {
        self.held
            .replace(current)
            .unwrap_or_else(|| self.pop_next())
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    /// Draws a fresh seed from this buffer's generator.
    ///
    /// Used to start the next game deterministically from the current one.
    pub fn derive_seed(&mut self) -> PieceSeed {
        self.rng.random()
    }
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit seed for the PCG generator behind [`PieceBuffer`]. It is
/// written as 32 hex digits, both by [`fmt::Display`]/[`FromStr`] and by serde.
///
/// # Example
///
/// ```
/// use tetrust_engine::{GameSession, PieceSeed, SessionConfig};
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let a = GameSession::with_seed(SessionConfig::default(), seed);
/// let b = GameSession::with_seed(SessionConfig::default(), seed);
/// assert!(a.next_pieces().eq(b.next_pieces()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl From<[u8; 16]> for PieceSeed {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<u128> for PieceSeed {
    fn from(num: u128) -> Self {
        Self(num.to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex: expected 32 hex digits, got '{input}'")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        u128::from_str_radix(s, 16)
            .map(Self::from)
            .map_err(|_| err())
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_seven_bag_contains_each_kind_once_per_batch() {
        let mut buffer = PieceBuffer::with_seed(Randomizer::SevenBag, SEED);
        for _ in 0..5 {
            let mut batch: Vec<_> = (0..PieceKind::LEN).map(|_| buffer.pop_next()).collect();
            batch.sort_by_key(|kind| *kind as u8);
            assert_eq!(batch, PieceKind::ALL);
        }
    }

    #[test]
    fn test_queue_always_previews_seven() {
        for randomizer in [Randomizer::SevenBag, Randomizer::Uniform] {
            let mut buffer = PieceBuffer::with_seed(randomizer, SEED);
            for _ in 0..30 {
                assert!(buffer.next_pieces().count() > PieceKind::LEN);
                let expected = buffer.next_pieces().next();
                assert_eq!(Some(buffer.pop_next()), expected);
            }
        }
    }

    #[test]
    fn test_deterministic_piece_generation() {
        for randomizer in [Randomizer::SevenBag, Randomizer::Uniform] {
            let mut buffer1 = PieceBuffer::with_seed(randomizer, SEED);
            let mut buffer2 = PieceBuffer::with_seed(randomizer, SEED);
            for _ in 0..20 {
                assert_eq!(buffer1.pop_next(), buffer2.pop_next());
            }
            assert_eq!(buffer1.derive_seed(), buffer2.derive_seed());
        }
    }

    #[test]
    fn test_hold_stores_then_swaps() {
        let mut buffer = PieceBuffer::with_seed(Randomizer::SevenBag, SEED);
        let current = buffer.pop_next();
        let upcoming = buffer.next_pieces().next().unwrap();

        assert_eq!(buffer.held_piece(), None);
        assert_eq!(buffer.peek_hold_result(), upcoming);
        assert_eq!(buffer.hold(current), upcoming);
        assert_eq!(buffer.held_piece(), Some(current));

        assert_eq!(buffer.peek_hold_result(), current);
        assert_eq!(buffer.hold(upcoming), current);
        assert_eq!(buffer.held_piece(), Some(upcoming));
    }

    mod piece_seed_format {
        use super::*;

        #[test]
        fn test_known_values() {
            assert_eq!(
                PieceSeed([0; 16]).to_string(),
                "00000000000000000000000000000000"
            );
            assert_eq!(
                PieceSeed([0xFF; 16]).to_string(),
                "ffffffffffffffffffffffffffffffff"
            );
            assert_eq!(SEED.to_string(), "123456789abcdef01122334455667788");
        }

        #[test]
        fn test_parse_accepts_either_case() {
            assert_eq!("123456789ABCDEF01122334455667788".parse::<PieceSeed>(), Ok(SEED));

            let seed = PieceSeed::from(0x1234_u128);
            assert_eq!(seed.to_string(), "00000000000000000000000000001234");
            assert_eq!(seed.to_string().parse::<PieceSeed>(), Ok(seed));
        }

        #[test]
        fn test_parse_errors() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
                "+123456789abcdef0123456789abcdef",
            ] {
                let err = input.parse::<PieceSeed>().unwrap_err();
                assert!(err.to_string().contains("invalid hex"));
            }
        }

        #[test]
        fn test_serde_uses_hex_string() {
            let serialized = serde_json::to_string(&SEED).unwrap();
            assert_eq!(serialized, "\"123456789abcdef01122334455667788\"");
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, SEED);
            assert!(serde_json::from_str::<PieceSeed>("\"xyz\"").is_err());
        }
    }
}
