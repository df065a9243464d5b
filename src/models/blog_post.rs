use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "blog_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlogStatus {
    Draft,
    Published,
    Archived,
}

impl BlogStatus {
    pub const ALL: [BlogStatus; 3] = [BlogStatus::Draft, BlogStatus::Published, BlogStatus::Archived];

    /// Any enum value is a legal direct transition target.
    pub fn permits_transition_to(&self, _target: BlogStatus) -> bool {
        true
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "DRAFT",
            BlogStatus::Published => "PUBLISHED",
            BlogStatus::Archived => "ARCHIVED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub status: BlogStatus,
    pub author: Option<String>,
    pub read_time: Option<i32>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// `published_at` is pinned on the first transition into PUBLISHED and
    /// never moves afterwards, whatever the post transitions through.
    pub fn publication_timestamp(
        current: Option<DateTime<Utc>>,
        target: BlogStatus,
    ) -> Option<DateTime<Utc>> {
        match (current, target) {
            (Some(existing), _) => Some(existing),
            (None, BlogStatus::Published) => Some(Utc::now()),
            (None, _) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn every_status_pair_is_a_permitted_transition() {
        for from in BlogStatus::ALL {
            for to in BlogStatus::ALL {
                assert!(from.permits_transition_to(to), "{:?} -> {:?}", from, to);
            }
        }
    }

    #[test]
    fn first_publish_sets_the_timestamp() {
        let pinned = BlogPost::publication_timestamp(None, BlogStatus::Published);
        assert!(pinned.is_some());
    }

    #[test]
    fn publishing_again_keeps_the_original_timestamp() {
        let original = Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap();
        let pinned = BlogPost::publication_timestamp(Some(original), BlogStatus::Published);
        assert_eq!(pinned, Some(original));
    }

    #[test]
    fn leaving_published_does_not_clear_the_timestamp() {
        let original = Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap();
        for target in [BlogStatus::Draft, BlogStatus::Archived] {
            assert_eq!(
                BlogPost::publication_timestamp(Some(original), target),
                Some(original)
            );
        }
    }

    #[test]
    fn unpublished_posts_stay_without_timestamp() {
        assert_eq!(BlogPost::publication_timestamp(None, BlogStatus::Draft), None);
        assert_eq!(
            BlogPost::publication_timestamp(None, BlogStatus::Archived),
            None
        );
    }
}
