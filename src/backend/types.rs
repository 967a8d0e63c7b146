use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// A record returned by `GET /photos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Photo {
    pub urls: PhotoUrls,
    pub description: Option<String>,
    pub alt_description: Option<String>,
    pub user: Option<PhotoUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoUrls {
    pub regular: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoUser {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoItem {
    /// 1-based position in the feed, unique for the session.
    pub id: u64,
    pub image_url: String,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl PhotoItem {
    fn new(id: u64, photo: Photo) -> Self {
        Self {
            id,
            image_url: photo.urls.regular,
            title: photo
                .description
                .filter(|s| !s.is_empty())
                .or(photo.alt_description.filter(|s| !s.is_empty())),
            author: photo.user.map(|user| user.name).filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct FeedState {
    pub items: Vec<PhotoItem>,
    /// Next page to request.
    pub page: u32,
    pub busy: bool,
}

impl FeedState {
    /// Appends one fetched page and advances the cursor.
    pub(crate) fn append(&mut self, photos: Vec<Photo>) {
        let offset = self.items.len() as u64;
        self.items.extend(
            photos
                .into_iter()
                .enumerate()
                .map(|(i, photo)| PhotoItem::new(offset + i as u64 + 1, photo)),
        );
        self.page += 1;
        self.busy = false;
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            busy: false,
        }
    }
}

impl Debug for FeedState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedState")
            .field("items", &self.items.len())
            .field("page", &self.page)
            .field("busy", &self.busy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::photos;

    #[test]
    fn deserialize_photos() {
        let input = r#"[
            {
                "id": "abc",
                "urls": {"raw": "https://images.test/raw", "regular": "https://images.test/regular"},
                "description": null,
                "alt_description": "a red bicycle",
                "user": {"name": "Jane Doe", "username": "jane"}
            },
            {"urls": {"regular": "https://images.test/2"}}
        ]"#;
        let photos = serde_json::from_str::<Vec<Photo>>(input).expect("failed to deserialize");
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].urls.regular, "https://images.test/regular");
        assert_eq!(photos[0].alt_description.as_deref(), Some("a red bicycle"));
        assert_eq!(photos[1].user, None);
    }

    #[test]
    fn deserialize_missing_url() {
        assert!(serde_json::from_str::<Vec<Photo>>(r#"[{"urls": {}}]"#).is_err());
        assert!(serde_json::from_str::<Vec<Photo>>(r#"{"errors": ["OAuth error"]}"#).is_err());
    }

    #[test]
    fn append_pages() {
        let mut state = FeedState::default();
        state.busy = true;
        // First page
        state.append(photos(10, "p1"));
        assert_eq!(state.items.len(), 10);
        assert_eq!(state.page, 2);
        assert!(!state.busy);
        // Second page continues the ids and keeps order
        state.append(photos(3, "p2"));
        assert_eq!(state.items.len(), 13);
        assert_eq!(state.page, 3);
        assert_eq!(
            state.items.iter().map(|item| item.id).collect::<Vec<_>>(),
            (1..=13).collect::<Vec<_>>()
        );
        assert_eq!(state.items[9].image_url, "https://images.test/p1-9");
        assert_eq!(state.items[10].image_url, "https://images.test/p2-0");
        // Empty page still advances the cursor
        state.append(Vec::new());
        assert_eq!(state.items.len(), 13);
        assert_eq!(state.page, 4);
    }

    #[test]
    fn append_keeps_duplicates() {
        let mut state = FeedState::default();
        state.append(photos(2, "same"));
        state.append(photos(2, "same"));
        assert_eq!(state.items.len(), 4);
        assert_eq!(state.items[0].image_url, state.items[2].image_url);
        assert_ne!(state.items[0].id, state.items[2].id);
    }

    #[test]
    fn item_title_fallback() {
        let mut photo = photos(1, "t").remove(0);
        photo.description = Some(String::new());
        photo.alt_description = Some("alt".to_string());
        let item = PhotoItem::new(1, photo);
        assert_eq!(item.title.as_deref(), Some("alt"));
        assert_eq!(item.author.as_deref(), Some("Photographer t"));
    }
}
