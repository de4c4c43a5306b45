#![cfg(test)]

use tokio::sync::mpsc;

use crate::models::Video;

/// Video with a placeholder title, enough for row and candidate tests
pub fn video(id: &str) -> Video {
    Video::new(id, id.to_uppercase(), "Row")
}

pub fn videos(ids: &[&str]) -> Vec<Video> {
    ids.iter().map(|id| video(id)).collect()
}

/// Everything currently queued on `rx`, without waiting
pub fn drain_events<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}
