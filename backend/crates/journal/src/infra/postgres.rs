//! PostgreSQL journal store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, EntryId, TagId, UserId};
use kernel::pagination::PageRequest;
use sqlx::{PgConnection, PgPool};

use crate::domain::entities::{
    Category, CategoryCount, CategoryDraft, Entry, EntryDraft, EntryFilter, EntryStats,
    MoodCount, Preferences, PreferencesRecord, Tag, UNCATEGORIZED,
};
use crate::domain::repository::JournalRepository;
use crate::error::JournalResult;

const ENTRY_COLUMNS: &str =
    "id, user_id, category_id, title, content, mood, word_count, created_at, updated_at";

#[derive(Clone)]
pub struct PgJournalRepository {
    pool: PgPool,
}

impl PgJournalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach tags to already-loaded entry rows, preserving row order.
    async fn with_tags(&self, rows: Vec<EntryRow>) -> JournalResult<Vec<Entry>> {
        let mut conn = self.pool.acquire().await?;
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut tags = tags_for_entries(&mut *conn, &ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let entry_tags = tags.remove(&row.id).unwrap_or_default();
                row.into_entry(entry_tags)
            })
            .collect())
    }
}

impl JournalRepository for PgJournalRepository {
    async fn create_entry(&self, user_id: UserId, draft: &EntryDraft) -> JournalResult<Entry> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            INSERT INTO journal_entries (user_id, category_id, title, content, mood, word_count)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(user_id.get())
        .bind(draft.category_id.map(CategoryId::get))
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&draft.mood)
        .bind(draft.word_count)
        .fetch_one(&mut *tx)
        .await?;

        let tags = match &draft.tags {
            Some(names) => replace_tags(&mut *tx, user_id, row.id, names).await?,
            None => Vec::new(),
        };

        tx.commit().await?;
        Ok(row.into_entry(tags))
    }

    async fn list_entries(
        &self,
        user_id: UserId,
        filter: EntryFilter,
        page: PageRequest,
    ) -> JournalResult<(Vec<Entry>, i64)> {
        const FILTER: &str = r#"
            user_id = $1
            AND ($2::BIGINT IS NULL OR category_id = $2)
            AND ($3::BIGINT IS NULL OR EXISTS (
                SELECT 1 FROM journal_entry_tags jet
                WHERE jet.entry_id = journal_entries.id AND jet.tag_id = $3
            ))
        "#;

        let category_id = filter.category_id.map(CategoryId::get);
        let tag_id = filter.tag_id.map(TagId::get);

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM journal_entries WHERE {FILTER}"))
                .bind(user_id.get())
                .bind(category_id)
                .bind(tag_id)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM journal_entries
            WHERE {FILTER}
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(user_id.get())
        .bind(category_id)
        .bind(tag_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((self.with_tags(rows).await?, total))
    }

    async fn find_entry(&self, user_id: UserId, id: EntryId) -> JournalResult<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.get())
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.with_tags(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn update_entry(
        &self,
        user_id: UserId,
        id: EntryId,
        draft: &EntryDraft,
    ) -> JournalResult<Option<Entry>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            UPDATE journal_entries
            SET category_id = $3, title = $4, content = $5, mood = $6, word_count = $7,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(id.get())
        .bind(user_id.get())
        .bind(draft.category_id.map(CategoryId::get))
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(&draft.mood)
        .bind(draft.word_count)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tags = match &draft.tags {
            Some(names) => replace_tags(&mut *tx, user_id, row.id, names).await?,
            None => tags_for_entries(&mut *tx, &[row.id])
                .await?
                .remove(&row.id)
                .unwrap_or_default(),
        };

        tx.commit().await?;
        Ok(Some(row.into_entry(tags)))
    }

    async fn delete_entry(&self, user_id: UserId, id: EntryId) -> JournalResult<bool> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
            .bind(id.get())
            .bind(user_id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn entry_stats(&self, user_id: UserId) -> JournalResult<EntryStats> {
        let (total_entries, total_words): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(word_count), 0)::BIGINT
            FROM journal_entries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.get())
        .fetch_one(&self.pool)
        .await?;

        let category_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE user_id = $1")
                .bind(user_id.get())
                .fetch_one(&self.pool)
                .await?;

        let tag_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE user_id = $1")
            .bind(user_id.get())
            .fetch_one(&self.pool)
            .await?;

        let moods: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT mood, COUNT(*)
            FROM journal_entries
            WHERE user_id = $1
            GROUP BY mood
            ORDER BY COUNT(*) DESC, mood
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        let categories: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT COALESCE(c.name, $2), COUNT(*)
            FROM journal_entries e
            LEFT JOIN categories c ON c.id = e.category_id
            WHERE e.user_id = $1
            GROUP BY 1
            ORDER BY 2 DESC, 1
            "#,
        )
        .bind(user_id.get())
        .bind(UNCATEGORIZED)
        .fetch_all(&self.pool)
        .await?;

        Ok(EntryStats {
            total_entries,
            total_words,
            avg_words_per_entry: 0.0,
            category_count,
            tag_count,
            mood_distribution: moods
                .into_iter()
                .map(|(mood, count)| MoodCount { mood, count })
                .collect(),
            category_distribution: categories
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
        })
    }

    async fn list_categories(&self, user_id: UserId) -> JournalResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, user_id, name, color FROM categories WHERE user_id = $1 ORDER BY name, id",
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    async fn find_category(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> JournalResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, user_id, name, color FROM categories WHERE id = $1 AND user_id = $2",
        )
        .bind(id.get())
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(CategoryRow::into_category))
    }

    async fn create_category(
        &self,
        user_id: UserId,
        draft: &CategoryDraft,
    ) -> JournalResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (user_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, color
            "#,
        )
        .bind(user_id.get())
        .bind(&draft.name)
        .bind(&draft.color)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into_category())
    }

    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> JournalResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET name = $3, color = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, color
            "#,
        )
        .bind(id.get())
        .bind(user_id.get())
        .bind(&draft.name)
        .bind(&draft.color)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(CategoryRow::into_category))
    }

    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> JournalResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE journal_entries
            SET category_id = NULL, updated_at = NOW()
            WHERE category_id = $1 AND user_id = $2
            "#,
        )
        .bind(id.get())
        .bind(user_id.get())
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id.get())
            .bind(user_id.get())
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        tx.commit().await?;
        Ok(deleted)
    }

    async fn list_tags(&self, user_id: UserId) -> JournalResult<Vec<Tag>> {
        let rows = sqlx::query_as::<_, TagRow>(
            "SELECT id, name FROM tags WHERE user_id = $1 ORDER BY name",
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TagRow::into_tag).collect())
    }

    async fn find_preferences(&self, user_id: UserId) -> JournalResult<Option<Preferences>> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r#"
            SELECT id, user_id, theme, default_view, date_format, email_notifications,
                   created_at, updated_at
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|row| row.into_record().preferences))
    }

    async fn save_preferences(
        &self,
        user_id: UserId,
        preferences: &Preferences,
    ) -> JournalResult<Preferences> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r#"
            INSERT INTO user_preferences
                (user_id, theme, default_view, date_format, email_notifications)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET theme = EXCLUDED.theme,
                default_view = EXCLUDED.default_view,
                date_format = EXCLUDED.date_format,
                email_notifications = EXCLUDED.email_notifications,
                updated_at = NOW()
            RETURNING id, user_id, theme, default_view, date_format, email_notifications,
                      created_at, updated_at
            "#,
        )
        .bind(user_id.get())
        .bind(&preferences.theme)
        .bind(&preferences.default_view)
        .bind(&preferences.date_format)
        .bind(preferences.email_notifications)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into_record().preferences)
    }

    async fn preferences_record(
        &self,
        user_id: UserId,
    ) -> JournalResult<Option<PreferencesRecord>> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r#"
            SELECT id, user_id, theme, default_view, date_format, email_notifications,
                   created_at, updated_at
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PreferencesRow::into_record))
    }
}

/// Make `names` the entry's exact tag set, creating missing tags.
async fn replace_tags(
    conn: &mut PgConnection,
    user_id: UserId,
    entry_id: i64,
    names: &[String],
) -> JournalResult<Vec<Tag>> {
    sqlx::query("DELETE FROM journal_entry_tags WHERE entry_id = $1")
        .bind(entry_id)
        .execute(&mut *conn)
        .await?;

    let mut tags = Vec::with_capacity(names.len());
    for name in names {
        // The no-op update makes RETURNING yield the existing row too.
        let tag = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO tags (user_id, name)
            VALUES ($1, $2)
            ON CONFLICT (user_id, name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(user_id.get())
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO journal_entry_tags (entry_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(entry_id)
        .bind(tag.id)
        .execute(&mut *conn)
        .await?;

        tags.push(tag.into_tag());
    }
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(tags)
}

async fn tags_for_entries(
    conn: &mut PgConnection,
    entry_ids: &[i64],
) -> JournalResult<HashMap<i64, Vec<Tag>>> {
    if entry_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, i64, String)> = sqlx::query_as(
        r#"
        SELECT jet.entry_id, t.id, t.name
        FROM journal_entry_tags jet
        JOIN tags t ON t.id = jet.tag_id
        WHERE jet.entry_id = ANY($1)
        ORDER BY t.name
        "#,
    )
    .bind(entry_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_entry: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (entry_id, id, name) in rows {
        by_entry.entry(entry_id).or_default().push(Tag {
            id: TagId::new(id),
            name,
        });
    }
    Ok(by_entry)
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    user_id: i64,
    category_id: Option<i64>,
    title: String,
    content: String,
    mood: String,
    word_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntryRow {
    fn into_entry(self, tags: Vec<Tag>) -> Entry {
        Entry {
            id: EntryId::new(self.id),
            user_id: UserId::new(self.user_id),
            category_id: self.category_id.map(CategoryId::new),
            title: self.title,
            content: self.content,
            mood: self.mood,
            word_count: self.word_count,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    user_id: i64,
    name: String,
    color: String,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            id: CategoryId::new(self.id),
            user_id: UserId::new(self.user_id),
            name: self.name,
            color: self.color,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id: i64,
    name: String,
}

impl TagRow {
    fn into_tag(self) -> Tag {
        Tag {
            id: TagId::new(self.id),
            name: self.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PreferencesRow {
    id: i64,
    user_id: i64,
    theme: String,
    default_view: String,
    date_format: String,
    email_notifications: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PreferencesRow {
    fn into_record(self) -> PreferencesRecord {
        PreferencesRecord {
            id: self.id,
            user_id: UserId::new(self.user_id),
            preferences: Preferences {
                theme: self.theme,
                default_view: self.default_view,
                date_format: self.date_format,
                email_notifications: self.email_notifications,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
