//! Shot segmentation for free-form shot list text.
//!
//! Model output rarely follows a strict format, so shots are recovered with
//! three strategies tried in order. The first one that yields at least two
//! usable blocks wins:
//!
//! 1. [`Tier::Paragraphs`]: blank-line separated paragraphs.
//! 2. [`Tier::ShotHeaders`]: lines starting with `SHOT 3`, `3.` or `3:`.
//! 3. [`Tier::FixedWidth`]: 400-character chunks of the raw text.
//!
//! A block is usable when its trimmed length exceeds 30 characters.

use once_cell::sync::Lazy;
use regex::Regex;

/// Blocks at or below this many characters (after trimming) are dropped.
pub const MIN_BLOCK_CHARS: usize = 30;

/// Width of the last-resort chunks, in characters.
pub const CHUNK_CHARS: usize = 400;

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("blank line pattern is valid"));

static SHOT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:shot[ \t]+\d+|\d+[.:])").expect("shot header pattern is valid")
});

/// One segmentation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Paragraphs,
    ShotHeaders,
    FixedWidth,
}

impl Tier {
    /// Strategies in the order they are tried.
    pub const ORDER: [Tier; 3] = [Tier::Paragraphs, Tier::ShotHeaders, Tier::FixedWidth];

    /// Run this strategy alone.
    pub fn apply(&self, text: &str) -> Vec<String> {
        match self {
            Tier::Paragraphs => paragraph_blocks(text),
            Tier::ShotHeaders => shot_header_blocks(text),
            Tier::FixedWidth => fixed_width_chunks(text),
        }
    }
}

/// Shots plus the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// `None` when no strategy found a single usable block.
    pub tier: Option<Tier>,
    pub shots: Vec<String>,
}

/// Split shot list text into ordered shot descriptions.
///
/// Returns an empty list when nothing usable was found; callers then show the
/// text as one undivided block.
pub fn segment(text: &str) -> Vec<String> {
    segment_with_tier(text).shots
}

/// Like [`segment`], also reporting which strategy was used.
pub fn segment_with_tier(text: &str) -> Segmentation {
    for tier in Tier::ORDER {
        let shots = tier.apply(text);
        let last = tier == Tier::FixedWidth;
        if shots.len() >= 2 || (last && !shots.is_empty()) {
            return Segmentation {
                tier: Some(tier),
                shots,
            };
        }
    }
    Segmentation {
        tier: None,
        shots: Vec::new(),
    }
}

fn usable(block: &str) -> Option<String> {
    let trimmed = block.trim();
    (trimmed.chars().count() > MIN_BLOCK_CHARS).then(|| trimmed.to_string())
}

fn paragraph_blocks(text: &str) -> Vec<String> {
    BLANK_LINES.split(text).filter_map(usable).collect()
}

/// Split before every header line; the header stays with the block it opens.
fn shot_header_blocks(text: &str) -> Vec<String> {
    let mut bounds: Vec<usize> = SHOT_HEADER.find_iter(text).map(|m| m.start()).collect();
    if bounds.first() != Some(&0) {
        bounds.insert(0, 0);
    }
    bounds.push(text.len());

    bounds
        .windows(2)
        .filter_map(|w| usable(&text[w[0]..w[1]]))
        .collect()
}

fn fixed_width_chunks(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(CHUNK_CHARS)
        .map(|chunk| chunk.iter().collect::<String>())
        .filter_map(|chunk| usable(&chunk))
        .collect()
}
