//! Canned content used when live collection is unavailable.
//!
//! Everything here is illustrative. Results built from it always carry an
//! `error` explaining why live data was not used.

use std::sync::{Mutex, PoisonError};

use chrono::{NaiveDate, TimeDelta};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::types::{Category, Review, SampleTimeline, VideoInfo};

const POSITIVE_POSTS: [&str; 8] = [
    "Just watched {movie} and absolutely loved it! The cinematography was breathtaking. Definitely a 10/10 for me! #MustWatch",
    "Can't stop thinking about {movie}! The performances were outstanding and the story kept me engaged throughout. #MovieNight",
    "{movie} might be my favorite film this year. Amazing direction and a beautiful score. Everyone should see this! #FilmTwitter",
    "Highly recommend {movie} to everyone! The plot twists were unexpected and the acting was superb. #MovieRecommendation",
    "Finally saw {movie} last night and it exceeded all my expectations. What a fantastic movie experience! #Cinema",
    "The visuals in {movie} are absolutely stunning. A masterpiece of modern cinema! #FilmPhotography",
    "I've seen {movie} three times already and it gets better with each viewing. The details you notice! #FavoriteMovie",
    "The soundtrack in {movie} perfectly complements every scene. Already added it to my playlist! #MovieSoundtrack",
];

// Only the first four are used, keeping the sample mix skewed positive.
const NEGATIVE_POSTS: [&str; 8] = [
    "{movie} was disappointing. Had high expectations but the plot was confusing and the pacing was off. #MovieFail",
    "Save your money and skip {movie}. The characters were underdeveloped and the ending made no sense. #NotWorthIt",
    "I wanted to like {movie} but it was just too predictable. Nothing we haven't seen before. #Meh",
    "Just sat through {movie} and those were two hours of my life I'll never get back. So boring! #Disappointed",
    "The acting in {movie} was surprisingly bad, especially considering the talent involved. What a letdown. #OverratedMovie",
    "Walked out of {movie} halfway through. Convoluted storyline and terrible dialogue. #WasteOfMoney",
    "Don't believe the hype about {movie}. It's all style and no substance. #Overrated",
    "The CGI in {movie} looked so fake it took me right out of the story. #BadEffects",
];
const NEGATIVE_POSTS_USED: usize = 4;

const NEUTRAL_POSTS: [&str; 8] = [
    "{movie} had some great moments but overall felt uneven. Strong start, weak finish. #MixedFeelings",
    "Not sure how I feel about {movie}. Great performances but the story lost me in the middle. #OnTheFence",
    "{movie} has its flaws but is still worth watching for the cinematography alone. #BeautifulFilm",
    "The lead actor was amazing in {movie} but everything else was just okay. #GreatPerformance",
    "Parts of {movie} were brilliant, other parts dragged on forever. A mixed bag overall. #SomeGoodSomeBad",
    "{movie} tried to do too much and ended up accomplishing too little. Still, some scenes were memorable. #Ambitious",
    "Interesting concept in {movie} but the execution was average. Worth watching once I guess. #JustOkay",
    "I neither loved nor hated {movie}. It was a perfectly acceptable way to spend 2 hours. #Mediocre",
];

/// Number of posts returned by [`SampleContentGenerator::sample_posts`].
pub const SAMPLE_POST_COUNT: usize =
    POSITIVE_POSTS.len() + NEGATIVE_POSTS_USED + NEUTRAL_POSTS.len();

const TIMELINE_DAYS: i64 = 7;

/// Produces sample posts, canned reviews and illustrative timelines.
///
/// Randomness comes from an owned RNG so tests and the CLI's `--seed` flag can
/// make output reproducible.
pub struct SampleContentGenerator {
    rng: Mutex<StdRng>,
}

impl Default for SampleContentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleContentGenerator {
    /// Generator seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Twenty short posts about `subject` in random order: eight positive,
    /// four negative and eight neutral.
    #[must_use]
    pub fn sample_posts(&self, subject: &str) -> Vec<String> {
        let mut posts: Vec<String> = POSITIVE_POSTS
            .iter()
            .chain(NEGATIVE_POSTS.iter().take(NEGATIVE_POSTS_USED))
            .chain(NEUTRAL_POSTS.iter())
            .map(|template| template.replace("{movie}", subject))
            .collect();
        self.with_rng(|rng| posts.shuffle(rng));
        posts
    }

    /// Three fixed reviews of `title`: one positive, one neutral, one negative.
    #[must_use]
    pub fn sample_reviews(&self, title: &str) -> Vec<Review> {
        let review = |id: &str,
                      video_title: String,
                      channel: &str,
                      summary: String,
                      sentiment: Category,
                      score: f64| Review {
            video: VideoInfo {
                video_id: id.to_string(),
                title: video_title,
                channel: channel.to_string(),
                url: "#".to_string(),
            },
            summary,
            sentiment,
            score,
        };

        vec![
            review(
                "sample1",
                format!("{title} - A Cinematic Masterpiece"),
                "MovieCritic Pro",
                format!(
                    "{title} delivers stunning visuals, compelling performances, and a \
                     thought-provoking storyline that stays with you long after the credits roll."
                ),
                Category::Positive,
                0.8,
            ),
            review(
                "sample2",
                format!("Why {title} Is Just Average - Full Review"),
                "Honest Film Reviews",
                format!(
                    "While {title} has some interesting moments and decent acting, the plot is \
                     predictable and the pacing issues make it difficult to fully engage with the story."
                ),
                Category::Neutral,
                0.1,
            ),
            review(
                "sample3",
                format!("{title} - The Most Disappointing Film of the Year"),
                "CinemaUnfiltered",
                format!(
                    "{title} fails to deliver on its promising premise with poor character \
                     development, inconsistent pacing, and an ending that makes little sense given the setup."
                ),
                Category::Negative,
                -0.7,
            ),
        ]
    }

    /// Seven daily splits ending at `today`, oldest first.
    ///
    /// Positive is drawn from 40..=70, neutral from 10..=30, and negative takes
    /// the remainder so each day sums to 100.
    #[must_use]
    pub fn timeline(&self, today: NaiveDate) -> SampleTimeline {
        let dates = (0..TIMELINE_DAYS)
            .rev()
            .map(|offset| (today - TimeDelta::days(offset)).format("%b %d").to_string())
            .collect();

        let (positive, neutral): (Vec<u32>, Vec<u32>) = self.with_rng(|rng| {
            let positive: Vec<u32> =
                (0..TIMELINE_DAYS).map(|_| rng.random_range(40..=70)).collect();
            let neutral: Vec<u32> = (0..TIMELINE_DAYS).map(|_| rng.random_range(10..=30)).collect();
            (positive, neutral)
        });

        let negative = positive
            .iter()
            .zip(&neutral)
            .map(|(p, n)| 100u32.saturating_sub(p + n))
            .collect();

        SampleTimeline {
            dates,
            positive,
            neutral,
            negative,
        }
    }
}
