use crate::data::Catalog;
use crate::models::Video;

pub const DEFAULT_SEARCH_LIMIT: usize = 200;

const TITLE_PREFIX_SCORE: u32 = 100;
const TITLE_CONTAINS_SCORE: u32 = 70;
const CATEGORY_PREFIX_SCORE: u32 = 35;
const CATEGORY_CONTAINS_SCORE: u32 = 20;
const DESCRIPTION_CONTAINS_SCORE: u32 = 10;

/// In-memory search over the catalog.
///
/// Relevance favours prefix over substring matches and title over category over
/// description. Results are ordered by score, then title, so they stay stable for
/// equal scores.
pub struct VideoSearchIndex<'a> {
    catalog: &'a Catalog,
}

impl<'a> VideoSearchIndex<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<Video> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        let mut scored: Vec<(&Video, u32)> = self
            .catalog
            .videos()
            .iter()
            .filter_map(|video| {
                let score = score_video(video, &needle);
                (score > 0).then_some((video, score))
            })
            .collect();

        scored.sort_by(|(a, a_score), (b, b_score)| {
            b_score.cmp(a_score).then_with(|| a.title.cmp(&b.title))
        });

        scored
            .into_iter()
            .take(limit)
            .map(|(video, _)| video.clone())
            .collect()
    }
}

fn score_video(video: &Video, needle: &str) -> u32 {
    let title = video.title.to_lowercase();
    let category = video.category.to_lowercase();
    let description = video.description.to_lowercase();

    let mut score = 0;
    if title.starts_with(needle) {
        score += TITLE_PREFIX_SCORE;
    } else if title.contains(needle) {
        score += TITLE_CONTAINS_SCORE;
    }

    if category.starts_with(needle) {
        score += CATEGORY_PREFIX_SCORE;
    } else if category.contains(needle) {
        score += CATEGORY_CONTAINS_SCORE;
    }

    if description.contains(needle) {
        score += DESCRIPTION_CONTAINS_SCORE;
    }
    score
}
