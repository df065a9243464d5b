use crate::dto::blog_dto::{BlogListQuery, CreateBlogPostPayload, UpdateBlogPostPayload};
use crate::error::{Error, Result};
use crate::models::blog_post::{BlogPost, BlogStatus};
use sqlx::PgPool;
use uuid::Uuid;

const BLOG_COLUMNS: &str = "id, title, content, excerpt, cover_image, tags, category, status, \
    author, read_time, published_at, created_at, updated_at";

#[derive(Clone)]
pub struct BlogService {
    pool: PgPool,
}

impl BlogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateBlogPostPayload) -> Result<BlogPost> {
        let status = payload.status.unwrap_or(BlogStatus::Draft);
        let published_at = BlogPost::publication_timestamp(None, status);

        let sql = format!(
            "INSERT INTO blog_posts \
                (title, content, excerpt, cover_image, tags, category, status, author, read_time, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {BLOG_COLUMNS}"
        );
        let post = sqlx::query_as::<_, BlogPost>(&sql)
            .bind(payload.title)
            .bind(payload.content)
            .bind(payload.excerpt)
            .bind(payload.cover_image)
            .bind(payload.tags)
            .bind(payload.category)
            .bind(status)
            .bind(payload.author)
            .bind(payload.read_time)
            .bind(published_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(post)
    }

    pub async fn list(&self, query: BlogListQuery) -> Result<Vec<BlogPost>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(status) = query.status {
            filters.push(format!("status::text = ${}", args.len() + 1));
            args.push(status.as_str().to_string());
        }
        if let Some(category) = query.category {
            filters.push(format!("category = ${}", args.len() + 1));
            args.push(category);
        }
        if let Some(search) = query.search {
            let first = args.len() + 1;
            let second = first + 1;
            filters.push(format!(
                "(title ILIKE ${} OR content ILIKE ${})",
                first, second
            ));
            args.push(format!("%{}%", search.clone()));
            args.push(format!("%{}%", search));
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql = format!(
            "SELECT {BLOG_COLUMNS} FROM blog_posts {where_clause} ORDER BY created_at DESC"
        );

        let mut statement = sqlx::query_as::<_, BlogPost>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        let items = statement.fetch_all(&self.pool).await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<BlogPost> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blog_posts WHERE id = $1");
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Artigo não encontrado".to_string()))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateBlogPostPayload) -> Result<BlogPost> {
        let current = self.get_by_id(id).await?;

        let status = payload.status.unwrap_or(current.status);
        if !current.status.permits_transition_to(status) {
            return Err(Error::Conflict(
                "Transição de estado não permitida".to_string(),
            ));
        }
        // published_at is pinned on the first transition into PUBLISHED and
        // never moves afterwards.
        let published_at = BlogPost::publication_timestamp(current.published_at, status);

        let sql = format!(
            "UPDATE blog_posts SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                excerpt = COALESCE($4, excerpt), \
                cover_image = COALESCE($5, cover_image), \
                tags = COALESCE($6, tags), \
                category = COALESCE($7, category), \
                status = $8, \
                author = COALESCE($9, author), \
                read_time = COALESCE($10, read_time), \
                published_at = $11, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {BLOG_COLUMNS}"
        );
        let post = sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .bind(payload.title)
            .bind(payload.content)
            .bind(payload.excerpt)
            .bind(payload.cover_image)
            .bind(payload.tags)
            .bind(payload.category)
            .bind(status)
            .bind(payload.author)
            .bind(payload.read_time)
            .bind(published_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(post)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Artigo não encontrado".to_string()));
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blog_posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_published(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM blog_posts WHERE status = 'PUBLISHED'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
