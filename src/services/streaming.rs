use std::path::PathBuf;

use crate::{
    error::{AppError, AppResult},
    models::StreamingTitle,
};

/// Number of titles returned by `StreamingCatalog::top_rated`
pub const TOP_STREAMING_COUNT: usize = 5;

/// Currently-streaming titles, read from a JSON list on disk
#[derive(Debug, Clone)]
pub struct StreamingCatalog {
    path: PathBuf,
}

impl StreamingCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads every title in the list
    pub async fn load(&self) -> AppResult<Vec<StreamingTitle>> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to read streaming list {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&json)
            .map_err(|e| AppError::Internal(format!("Invalid streaming list: {}", e)))
    }

    /// Highest tomato scores first, at most `TOP_STREAMING_COUNT` titles
    pub async fn top_rated(&self) -> AppResult<Vec<StreamingTitle>> {
        let titles = self.load().await?;
        tracing::debug!(total = titles.len(), "Streaming list loaded");
        Ok(top_by_score(titles, TOP_STREAMING_COUNT))
    }
}

/// Sorts by descending tomato score and keeps the first `count`
///
/// The sort is stable, so titles with equal scores keep their list order.
pub fn top_by_score(mut titles: Vec<StreamingTitle>, count: usize) -> Vec<StreamingTitle> {
    titles.sort_by(|a, b| b.tomato_score.cmp(&a.tomato_score));
    titles.truncate(count);
    titles
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn title(name: &str, score: i32) -> StreamingTitle {
        StreamingTitle {
            id: 0,
            title: name.to_string(),
            url: String::new(),
            tomato_score: score,
        }
    }

    #[test]
    fn test_top_by_score_orders_and_truncates() {
        let titles = vec![
            title("A", 70),
            title("B", 95),
            title("C", 80),
            title("D", 95),
        ];

        let top = top_by_score(titles, 3);
        let names: Vec<_> = top.iter().map(|t| t.title.as_str()).collect();

        assert_eq!(names, vec!["B", "D", "C"]);
    }

    #[test]
    fn test_top_by_score_with_short_list() {
        let top = top_by_score(vec![title("A", 10)], TOP_STREAMING_COUNT);
        assert_eq!(top.len(), 1);
    }

    #[tokio::test]
    async fn test_top_rated_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"Id": 1, "Title": "Roma", "Url": "/m/roma", "TomatoScore": 96}},
                {{"Id": 2, "Title": "Okja", "Url": "/m/okja", "TomatoScore": 86}},
                {{"Id": 3, "Title": "Mank", "Url": "/m/mank", "TomatoScore": 88}}
            ]"#
        )
        .unwrap();

        let catalog = StreamingCatalog::new(file.path());
        let top = catalog.top_rated().await.unwrap();

        let names: Vec<_> = top.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(names, vec!["Roma", "Mank", "Okja"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let catalog = StreamingCatalog::new("/nonexistent/movie_stream_list.json");
        assert!(matches!(catalog.load().await, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let catalog = StreamingCatalog::new(file.path());
        assert!(catalog.load().await.is_err());
    }
}
