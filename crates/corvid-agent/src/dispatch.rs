// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publish dispatch: minimum inter-post spacing and platform-sized
//! segmentation of long replies.

use std::time::Duration;

use corvid_config::Persona;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum interval between publishes.
///
/// Callers `acquire()` before each publish and `mark_published()`
/// after each attempt, success or failure. Because the owning agent
/// processes one query at a time, publishes happen in submission
/// order spaced at least `min_interval` apart.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_publish: Option<Instant>,
}

impl RateLimiter {
    /// A limiter allowing `rate_per_minute` publishes per minute.
    /// Zero or negative means unlimited.
    pub fn from_rate_per_minute(rate_per_minute: f64) -> Self {
        let min_interval = if rate_per_minute > 0.0 {
            Duration::from_secs_f64(60.0 / rate_per_minute)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last_publish: None,
        }
    }

    /// Waits until the minimum interval since the last publish has
    /// elapsed. Returns immediately when unlimited or on first use.
    pub async fn acquire(&mut self) {
        if self.min_interval.is_zero() {
            return;
        }
        if let Some(last) = self.last_publish {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "throttled before publish");
                tokio::time::sleep(wait).await;
            }
        }
    }

    /// Stamps the publish time. Called after every attempt.
    pub fn mark_published(&mut self) {
        self.last_publish = Some(Instant::now());
    }
}

/// Reply decoration inputs for segmentation.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    pub use_emoji: bool,
    pub include_hashtags: bool,
    pub include_mentions: bool,
    /// Topics rendered as hashtags, spaces removed.
    pub preferred_topics: Vec<String>,
}

impl FormatOptions {
    pub fn from_persona(persona: &Persona) -> Self {
        Self {
            use_emoji: persona.response_format.use_emojis,
            include_hashtags: persona.response_format.include_hashtags,
            include_mentions: persona.response_format.include_mentions,
            preferred_topics: persona.preferred_topics.clone(),
        }
    }
}

/// Emoji prepended to each segment when `use_emoji` is set.
const EMOJI_PREFIX: &str = "\u{2728} ";

/// Splits `text` into platform-sized segments by greedy word packing.
///
/// Words are never split across segments and no segment exceeds
/// `limit` characters, with one documented exception: a single word
/// longer than `limit` appears whole in its own segment rather than
/// being truncated. Hashtag and mention decorations are appended to a
/// closing segment only when they still fit within `limit`. Empty
/// input yields no segments.
pub fn split_for_platform(text: &str, limit: usize, options: &FormatOptions) -> Vec<String> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };

    let prefix = if options.use_emoji { EMOJI_PREFIX } else { "" };
    let hashtags = if options.include_hashtags {
        options
            .preferred_topics
            .iter()
            .map(|topic| format!("#{}", topic.replace(' ', "")))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        String::new()
    };
    let mentions = if options.include_mentions { "@" } else { "" };
    // Space-separated decoration suffix, as reserved during packing.
    let suffix_len: usize = [hashtags.as_str(), mentions]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| 1 + part.chars().count())
        .sum();

    let close = |segment: &mut String| {
        for part in [hashtags.as_str(), mentions] {
            if part.is_empty() {
                continue;
            }
            if segment.chars().count() + 1 + part.chars().count() <= limit {
                segment.push(' ');
                segment.push_str(part);
            }
        }
    };

    let mut segments = Vec::new();
    let mut current = format!("{prefix}{first}");
    for word in words {
        let projected = current.chars().count() + 1 + word.chars().count() + suffix_len;
        if projected > limit {
            close(&mut current);
            segments.push(current);
            current = format!("{prefix}{word}");
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    close(&mut current);
    segments.push(current);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_segments() {
        let segments = split_for_platform("", 280, &FormatOptions::default());
        assert!(segments.is_empty());
        let segments = split_for_platform("   ", 280, &FormatOptions::default());
        assert!(segments.is_empty());
    }

    #[test]
    fn short_text_is_one_segment() {
        let segments = split_for_platform("hello there", 280, &FormatOptions::default());
        assert_eq!(segments, vec!["hello there"]);
    }

    #[test]
    fn segments_never_exceed_limit() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa".repeat(4);
        let segments = split_for_platform(&text, 40, &FormatOptions::default());
        assert!(segments.len() > 1);
        for segment in &segments {
            assert!(segment.chars().count() <= 40, "too long: {segment:?}");
        }
    }

    #[test]
    fn word_sequence_is_preserved_across_segments() {
        let text = "one two three four five six seven eight nine ten";
        let segments = split_for_platform(text, 20, &FormatOptions::default());
        let rejoined = segments.join(" ");
        let words: Vec<&str> = rejoined.split_whitespace().collect();
        assert_eq!(
            words,
            vec!["one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten"]
        );
    }

    #[test]
    fn oversized_word_appears_whole() {
        let long_word = "a".repeat(50);
        let text = format!("short {long_word} tail");
        let segments = split_for_platform(&text, 20, &FormatOptions::default());
        assert!(segments.contains(&long_word));
    }

    #[test]
    fn emoji_prefix_seeds_every_segment() {
        let options = FormatOptions {
            use_emoji: true,
            ..FormatOptions::default()
        };
        let text = "one two three four five six seven eight nine ten";
        let segments = split_for_platform(text, 20, &options);
        assert!(segments.len() > 1);
        for segment in &segments {
            assert!(segment.starts_with(EMOJI_PREFIX));
        }
    }

    #[test]
    fn hashtags_are_despaced_and_appended_when_they_fit() {
        let options = FormatOptions {
            include_hashtags: true,
            preferred_topics: vec!["Deep Space".to_string(), "tea".to_string()],
            ..FormatOptions::default()
        };
        let segments = split_for_platform("clear skies tonight", 280, &options);
        assert_eq!(segments, vec!["clear skies tonight #DeepSpace #tea"]);
    }

    #[test]
    fn decorations_are_dropped_when_they_do_not_fit() {
        let options = FormatOptions {
            include_hashtags: true,
            preferred_topics: vec!["astronomy".to_string()],
            ..FormatOptions::default()
        };
        let word = "x".repeat(19);
        let segments = split_for_platform(&word, 20, &options);
        // "#astronomy" cannot fit after a 19-char word within 20.
        assert_eq!(segments, vec![word]);
    }

    #[test]
    fn mention_placeholder_is_appended() {
        let options = FormatOptions {
            include_mentions: true,
            ..FormatOptions::default()
        };
        let segments = split_for_platform("hello", 280, &options);
        assert_eq!(segments, vec!["hello @"]);
    }

    #[tokio::test(start_paused = true)]
    async fn limiter_spaces_publishes_by_min_interval() {
        let mut limiter = RateLimiter::from_rate_per_minute(60.0);
        let start = Instant::now();

        limiter.acquire().await;
        limiter.mark_published();
        limiter.acquire().await;
        limiter.mark_published();

        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_rate_never_waits() {
        let mut limiter = RateLimiter::from_rate_per_minute(0.0);
        let start = Instant::now();

        limiter.acquire().await;
        limiter.mark_published();
        limiter.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_time_counts_against_the_interval() {
        let mut limiter = RateLimiter::from_rate_per_minute(60.0);
        limiter.acquire().await;
        limiter.mark_published();

        tokio::time::sleep(Duration::from_millis(600)).await;
        let before = Instant::now();
        limiter.acquire().await;
        // Only the remaining 400ms of the 1s interval is waited.
        assert_eq!(before.elapsed(), Duration::from_millis(400));
    }
}
