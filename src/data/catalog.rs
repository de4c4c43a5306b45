use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Video, VideoId};

const SAMPLE_BASE: &str = "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample";

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| Arc::new(Catalog::builtin_dataset()));

/// Read-only, load-time-fixed video catalog partitioned into named categories
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<String>,
    videos: Vec<Video>,
    by_id: HashMap<VideoId, usize>,
}

impl Catalog {
    pub fn new(categories: Vec<String>, videos: Vec<Video>) -> Self {
        let by_id = videos
            .iter()
            .enumerate()
            .map(|(index, video)| (video.id.clone(), index))
            .collect();
        Self {
            categories,
            videos,
            by_id,
        }
    }

    /// The compiled-in sample dataset shared by the whole application
    pub fn builtin() -> Arc<Catalog> {
        BUILTIN.clone()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn get(&self, id: &str) -> Option<&Video> {
        self.by_id
            .get(&VideoId::from(id))
            .and_then(|index| self.videos.get(*index))
    }

    pub fn videos_for_category(&self, category: &str) -> Vec<Video> {
        self.videos
            .iter()
            .filter(|video| video.category == category)
            .cloned()
            .collect()
    }

    /// Resolve ids in the given order, silently dropping unknown ones
    pub fn resolve_ids<I, S>(&self, ids: I) -> Vec<Video>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.get(id.as_ref()).cloned())
            .collect()
    }

    /// Sequence consulted by autoplay once a row runs out: the first category's videos
    pub fn global_fallback(&self) -> Vec<Video> {
        self.categories
            .first()
            .map(|category| self.videos_for_category(category))
            .unwrap_or_default()
    }

    fn builtin_dataset() -> Self {
        let entries: [(&str, &str, &str, &str, &str, &str); 16] = [
            // Trending
            (
                "v1",
                "Big Buck Bunny (Trailer)",
                "Trending",
                "bunny1",
                "A friendly introduction to the classic open movie. Great for testing playback.",
                "BigBuckBunny.mp4",
            ),
            (
                "v2",
                "Elephant Dream",
                "Trending",
                "elephant",
                "The first open movie by the Blender Foundation.",
                "ElephantsDream.mp4",
            ),
            (
                "v3",
                "For Bigger Blazes",
                "Trending",
                "blazes",
                "Sample video for streaming UI and fast seeking.",
                "ForBiggerBlazes.mp4",
            ),
            (
                "v4",
                "For Bigger Escape",
                "Trending",
                "escape",
                "Sample MP4 with good motion for playback testing.",
                "ForBiggerEscapes.mp4",
            ),
            // Sports
            (
                "v5",
                "For Bigger Fun",
                "Sports",
                "fun",
                "A short sample suitable for Sports category browsing.",
                "ForBiggerFun.mp4",
            ),
            (
                "v6",
                "For Bigger Joyrides",
                "Sports",
                "joyrides",
                "High-energy clip for remote-control seeking tests.",
                "ForBiggerJoyrides.mp4",
            ),
            (
                "v7",
                "Sintel",
                "Sports",
                "sintel",
                "A longer-form open movie for sustained playback tests.",
                "Sintel.mp4",
            ),
            (
                "v8",
                "Tears of Steel",
                "Sports",
                "steel",
                "Cinematic sample for stress-testing decode and UI overlays.",
                "TearsOfSteel.mp4",
            ),
            // Music
            (
                "v9",
                "For Bigger Meltdowns",
                "Music",
                "meltdowns",
                "Good for testing quick pause/play and UI responsiveness.",
                "ForBiggerMeltdowns.mp4",
            ),
            (
                "v10",
                "Subaru Outback On Street And Dirt",
                "Music",
                "subaru",
                "A sample with varied scenes to test scrubbing and time display.",
                "SubaruOutbackOnStreetAndDirt.mp4",
            ),
            (
                "v11",
                "We Are Going On Bullrun",
                "Music",
                "bullrun",
                "A longer sample video, useful for progress bar and seeking.",
                "WeAreGoingOnBullrun.mp4",
            ),
            (
                "v12",
                "Volkswagen GTI Review",
                "Music",
                "vw",
                "Sample content to verify category row browsing and details display.",
                "VolkswagenGTIReview.mp4",
            ),
            // News
            (
                "v13",
                "For Bigger Subtitles",
                "News",
                "subtitles",
                "Useful for verifying overlay readability on light-themed UI.",
                "ForBiggerSubtitles.mp4",
            ),
            (
                "v14",
                "For Bigger Subtitles (Blender)",
                "News",
                "subtitles2",
                "Another sample to test switching between items quickly.",
                "ForBiggerSubtitlesBlender.mp4",
            ),
            (
                "v15",
                "For Bigger Subtitles (Sintel)",
                "News",
                "subtitles3",
                "Good for validating playback controls and time text contrast.",
                "ForBiggerSubtitlesSintel.mp4",
            ),
            (
                "v16",
                "For Bigger Escape (again)",
                "News",
                "escape2",
                "A final sample for a fuller browsing grid and wrap-around focus tests.",
                "ForBiggerEscapes.mp4",
            ),
        ];

        let videos = entries
            .iter()
            .map(|(id, title, category, thumb_seed, description, file)| {
                Video::new(*id, *title, *category)
                    .with_thumbnail(format!("https://picsum.photos/seed/{thumb_seed}/640/360"))
                    .with_description(*description)
                    .with_video_url(format!("{SAMPLE_BASE}/{file}"))
            })
            .collect();

        let categories = ["Trending", "Sports", "Music", "News"]
            .iter()
            .map(|c| c.to_string())
            .collect();

        Self::new(categories, videos)
    }
}
