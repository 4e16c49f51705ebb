//! Crate-level tests: services against an in-memory store and the HTTP
//! surface through `tower::ServiceExt`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use kernel::id::{CategoryId, EntryId, TagId, UserId};
use kernel::pagination::PageRequest;

use crate::domain::entities::{
    Category, CategoryCount, CategoryDraft, Entry, EntryDraft, EntryFilter, EntryStats,
    MoodCount, Preferences, PreferencesRecord, Tag, UNCATEGORIZED,
};
use crate::domain::repository::JournalRepository;
use crate::error::JournalResult;

#[derive(Default)]
struct Tables {
    next_id: i64,
    entries: Vec<Entry>,
    categories: Vec<Category>,
    tags: Vec<(UserId, Tag)>,
    preferences: HashMap<UserId, PreferencesRecord>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn upsert_tags(&mut self, user_id: UserId, names: &[String]) -> Vec<Tag> {
        let mut out = Vec::new();
        for name in names {
            let existing = self
                .tags
                .iter()
                .find(|(owner, tag)| *owner == user_id && &tag.name == name)
                .map(|(_, tag)| tag.clone());
            let tag = match existing {
                Some(tag) => tag,
                None => {
                    let tag = Tag {
                        id: TagId::new(self.next_id()),
                        name: name.clone(),
                    };
                    self.tags.push((user_id, tag.clone()));
                    tag
                }
            };
            out.push(tag);
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }
}

#[derive(Clone, Default)]
struct InMemoryJournal {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryJournal {
    fn seed_preferences(&self, user_id: UserId) {
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        let now = Utc::now();
        t.preferences.insert(
            user_id,
            PreferencesRecord {
                id,
                user_id,
                preferences: Preferences::default(),
                created_at: now,
                updated_at: now,
            },
        );
    }
}

impl JournalRepository for InMemoryJournal {
    async fn create_entry(&self, user_id: UserId, draft: &EntryDraft) -> JournalResult<Entry> {
        let mut t = self.tables.lock().unwrap();
        let tags = match &draft.tags {
            Some(names) => t.upsert_tags(user_id, names),
            None => Vec::new(),
        };
        let now = Utc::now();
        let entry = Entry {
            id: EntryId::new(t.next_id()),
            user_id,
            category_id: draft.category_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            mood: draft.mood.clone(),
            word_count: draft.word_count,
            tags,
            created_at: now,
            updated_at: now,
        };
        t.entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_entries(
        &self,
        user_id: UserId,
        filter: EntryFilter,
        page: PageRequest,
    ) -> JournalResult<(Vec<Entry>, i64)> {
        let t = self.tables.lock().unwrap();
        let mut matching: Vec<Entry> = t
            .entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| filter.category_id.is_none_or(|c| e.category_id == Some(c)))
            .filter(|e| filter.tag_id.is_none_or(|id| e.tags.iter().any(|tag| tag.id == id)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = matching.len() as i64;
        let entries = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((entries, total))
    }

    async fn find_entry(&self, user_id: UserId, id: EntryId) -> JournalResult<Option<Entry>> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .entries
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    async fn update_entry(
        &self,
        user_id: UserId,
        id: EntryId,
        draft: &EntryDraft,
    ) -> JournalResult<Option<Entry>> {
        let mut t = self.tables.lock().unwrap();
        if !t.entries.iter().any(|e| e.id == id && e.user_id == user_id) {
            return Ok(None);
        }
        let new_tags = draft.tags.as_ref().map(|names| t.upsert_tags(user_id, names));
        let Some(entry) = t.entries.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        entry.title = draft.title.clone();
        entry.content = draft.content.clone();
        entry.category_id = draft.category_id;
        entry.mood = draft.mood.clone();
        entry.word_count = draft.word_count;
        if let Some(tags) = new_tags {
            entry.tags = tags;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete_entry(&self, user_id: UserId, id: EntryId) -> JournalResult<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.entries.len();
        t.entries.retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(t.entries.len() < before)
    }

    async fn entry_stats(&self, user_id: UserId) -> JournalResult<EntryStats> {
        let t = self.tables.lock().unwrap();
        let entries: Vec<&Entry> = t.entries.iter().filter(|e| e.user_id == user_id).collect();

        let mut moods: HashMap<String, i64> = HashMap::new();
        let mut categories: HashMap<String, i64> = HashMap::new();
        for entry in &entries {
            *moods.entry(entry.mood.clone()).or_default() += 1;
            let name = entry
                .category_id
                .and_then(|id| t.categories.iter().find(|c| c.id == id))
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            *categories.entry(name).or_default() += 1;
        }

        let mut mood_distribution: Vec<MoodCount> = moods
            .into_iter()
            .map(|(mood, count)| MoodCount { mood, count })
            .collect();
        mood_distribution.sort_by(|a, b| b.count.cmp(&a.count).then(a.mood.cmp(&b.mood)));
        let mut category_distribution: Vec<CategoryCount> = categories
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        category_distribution
            .sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));

        Ok(EntryStats {
            total_entries: entries.len() as i64,
            total_words: entries.iter().map(|e| i64::from(e.word_count)).sum(),
            avg_words_per_entry: 0.0,
            category_count: t.categories.iter().filter(|c| c.user_id == user_id).count() as i64,
            tag_count: t.tags.iter().filter(|(owner, _)| *owner == user_id).count() as i64,
            mood_distribution,
            category_distribution,
        })
    }

    async fn list_categories(&self, user_id: UserId) -> JournalResult<Vec<Category>> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_category(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> JournalResult<Option<Category>> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .categories
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn create_category(
        &self,
        user_id: UserId,
        draft: &CategoryDraft,
    ) -> JournalResult<Category> {
        let mut t = self.tables.lock().unwrap();
        let category = Category {
            id: CategoryId::new(t.next_id()),
            user_id,
            name: draft.name.clone(),
            color: draft.color.clone(),
        };
        t.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> JournalResult<Option<Category>> {
        let mut t = self.tables.lock().unwrap();
        let Some(category) = t
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
        else {
            return Ok(None);
        };
        category.name = draft.name.clone();
        category.color = draft.color.clone();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> JournalResult<bool> {
        let mut t = self.tables.lock().unwrap();
        for entry in t.entries.iter_mut() {
            if entry.user_id == user_id && entry.category_id == Some(id) {
                entry.category_id = None;
            }
        }
        let before = t.categories.len();
        t.categories.retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(t.categories.len() < before)
    }

    async fn list_tags(&self, user_id: UserId) -> JournalResult<Vec<Tag>> {
        let t = self.tables.lock().unwrap();
        let mut tags: Vec<Tag> = t
            .tags
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, tag)| tag.clone())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn find_preferences(&self, user_id: UserId) -> JournalResult<Option<Preferences>> {
        let t = self.tables.lock().unwrap();
        Ok(t.preferences.get(&user_id).map(|r| r.preferences.clone()))
    }

    async fn save_preferences(
        &self,
        user_id: UserId,
        preferences: &Preferences,
    ) -> JournalResult<Preferences> {
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        let now = Utc::now();
        let record = t
            .preferences
            .entry(user_id)
            .or_insert_with(|| PreferencesRecord {
                id,
                user_id,
                preferences: Preferences::default(),
                created_at: now,
                updated_at: now,
            });
        record.preferences = preferences.clone();
        record.updated_at = now;
        Ok(record.preferences.clone())
    }

    async fn preferences_record(
        &self,
        user_id: UserId,
    ) -> JournalResult<Option<PreferencesRecord>> {
        let t = self.tables.lock().unwrap();
        Ok(t.preferences.get(&user_id).cloned())
    }
}

const ALICE: UserId = UserId::new(1);
const BOB: UserId = UserId::new(2);

mod service_tests {
    use super::*;
    use crate::application::{
        CategoryInput, CategoryService, EntryInput, EntryService, PreferencesService,
    };
    use crate::domain::entities::PreferencesPatch;
    use crate::error::JournalError;

    fn services() -> (
        EntryService<InMemoryJournal>,
        CategoryService<InMemoryJournal>,
        PreferencesService<InMemoryJournal>,
    ) {
        let repo = Arc::new(InMemoryJournal::default());
        (
            EntryService::new(repo.clone()),
            CategoryService::new(repo.clone()),
            PreferencesService::new(repo),
        )
    }

    fn input(title: &str, content: &str) -> EntryInput {
        EntryInput {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_counts_words_and_normalises_tags() {
        let (entries, categories, _) = services();
        let entry = entries
            .create(
                ALICE,
                EntryInput {
                    mood: Some(" happy ".to_string()),
                    tags: Some(vec![
                        "work".to_string(),
                        " home".to_string(),
                        "work ".to_string(),
                        "".to_string(),
                    ]),
                    ..input("  Monday ", "woke up\n\nwent   to work")
                },
            )
            .await
            .unwrap();

        assert_eq!(entry.title, "Monday");
        assert_eq!(entry.word_count, 5);
        assert_eq!(entry.mood, "happy");
        let names: Vec<&str> = entry.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["home", "work"]);

        // Reusing a tag name links the existing tag.
        let second = entries
            .create(
                ALICE,
                EntryInput {
                    tags: Some(vec!["work".to_string()]),
                    ..input("Tuesday", "again")
                },
            )
            .await
            .unwrap();
        let work = entry.tags.iter().find(|t| t.name == "work").unwrap();
        assert_eq!(second.tags[0].id, work.id);
        assert_eq!(categories.tags(ALICE).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_and_foreign_categories() {
        let (entries, categories, _) = services();

        let err = entries.create(ALICE, input(" ", "body")).await.unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
        let err = entries.create(ALICE, input("title", "")).await.unwrap_err();
        assert_eq!(err.to_string(), "Content is required");

        let bobs = categories
            .create(
                BOB,
                CategoryInput {
                    name: "Private".to_string(),
                    color: None,
                },
            )
            .await
            .unwrap();
        let err = entries
            .create(
                ALICE,
                EntryInput {
                    category_id: Some(bobs.id),
                    ..input("t", "c")
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Validation(ref m) if m == "Category not found"));
    }

    #[tokio::test]
    async fn other_users_entries_are_not_found() {
        let (entries, _, _) = services();
        let entry = entries.create(ALICE, input("mine", "secret")).await.unwrap();

        assert!(matches!(
            entries.get(BOB, entry.id).await,
            Err(JournalError::NotFound("Entry"))
        ));
        assert!(matches!(
            entries.update(BOB, entry.id, input("x", "y")).await,
            Err(JournalError::NotFound(_))
        ));
        assert!(matches!(
            entries.delete(BOB, entry.id).await,
            Err(JournalError::NotFound(_))
        ));

        assert_eq!(entries.get(ALICE, entry.id).await.unwrap().content, "secret");
    }

    #[tokio::test]
    async fn update_keeps_or_replaces_tags() {
        let (entries, _, _) = services();
        let entry = entries
            .create(
                ALICE,
                EntryInput {
                    tags: Some(vec!["a".to_string(), "b".to_string()]),
                    ..input("t", "one two")
                },
            )
            .await
            .unwrap();

        let kept = entries
            .update(ALICE, entry.id, input("t", "one two three"))
            .await
            .unwrap();
        assert_eq!(kept.tags.len(), 2);
        assert_eq!(kept.word_count, 3);

        let cleared = entries
            .update(
                ALICE,
                entry.id,
                EntryInput {
                    tags: Some(vec![]),
                    ..input("t", "one")
                },
            )
            .await
            .unwrap();
        assert!(cleared.tags.is_empty());
    }

    #[tokio::test]
    async fn list_is_filtered_and_paged() {
        let (entries, categories, _) = services();
        let travel = categories
            .create(
                ALICE,
                CategoryInput {
                    name: "Travel".to_string(),
                    color: None,
                },
            )
            .await
            .unwrap();
        for i in 0..12 {
            entries
                .create(
                    ALICE,
                    EntryInput {
                        category_id: (i % 3 == 0).then_some(travel.id),
                        ..input(&format!("day {i}"), "text")
                    },
                )
                .await
                .unwrap();
        }
        entries.create(BOB, input("bob", "text")).await.unwrap();

        let first = entries
            .list(ALICE, EntryFilter::default(), PageRequest::from_query(None, None))
            .await
            .unwrap();
        assert_eq!(first.total, 12);
        assert_eq!(first.entries.len(), 10);
        assert_eq!(first.entries[0].title, "day 11");

        let second = entries
            .list(
                ALICE,
                EntryFilter::default(),
                PageRequest::from_query(Some("2"), None),
            )
            .await
            .unwrap();
        assert_eq!(second.entries.len(), 2);

        let filtered = entries
            .list(
                ALICE,
                EntryFilter {
                    category_id: Some(travel.id),
                    tag_id: None,
                },
                PageRequest::from_query(None, None),
            )
            .await
            .unwrap();
        assert_eq!(filtered.total, 4);
    }

    #[tokio::test]
    async fn deleting_a_category_keeps_its_entries() {
        let (entries, categories, _) = services();
        let work = categories
            .create(
                ALICE,
                CategoryInput {
                    name: "Work".to_string(),
                    color: Some("".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(work.color, "#0693E3");

        let entry = entries
            .create(
                ALICE,
                EntryInput {
                    category_id: Some(work.id),
                    ..input("standup", "notes")
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            categories.delete(BOB, work.id).await,
            Err(JournalError::NotFound("Category"))
        ));
        categories.delete(ALICE, work.id).await.unwrap();

        let entry = entries.get(ALICE, entry.id).await.unwrap();
        assert_eq!(entry.category_id, None);
        assert!(categories.list(ALICE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stats_group_moods_and_uncategorized() {
        let (entries, categories, _) = services();

        let empty = entries.stats(ALICE).await.unwrap();
        assert_eq!(empty.total_entries, 0);
        assert_eq!(empty.avg_words_per_entry, 0.0);

        let home = categories
            .create(
                ALICE,
                CategoryInput {
                    name: "Home".to_string(),
                    color: None,
                },
            )
            .await
            .unwrap();
        entries
            .create(
                ALICE,
                EntryInput {
                    mood: Some("calm".to_string()),
                    category_id: Some(home.id),
                    ..input("a", "one two three")
                },
            )
            .await
            .unwrap();
        entries
            .create(
                ALICE,
                EntryInput {
                    mood: Some("calm".to_string()),
                    ..input("b", "one")
                },
            )
            .await
            .unwrap();

        let stats = entries.stats(ALICE).await.unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_words, 4);
        assert_eq!(stats.avg_words_per_entry, 2.0);
        assert_eq!(stats.category_count, 1);
        assert_eq!(
            stats.mood_distribution,
            vec![MoodCount {
                mood: "calm".to_string(),
                count: 2
            }]
        );
        assert!(stats.category_distribution.contains(&CategoryCount {
            category: "Uncategorized".to_string(),
            count: 1
        }));
    }

    #[tokio::test]
    async fn preferences_default_then_merge() {
        let (_, _, prefs) = services();

        assert_eq!(prefs.get(ALICE).await.unwrap(), Preferences::default());
        assert!(matches!(
            prefs.record(ALICE).await,
            Err(JournalError::Internal(_))
        ));

        let updated = prefs
            .update(
                ALICE,
                PreferencesPatch {
                    theme: Some("dark".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.theme, "dark");

        let updated = prefs
            .update(
                ALICE,
                PreferencesPatch {
                    date_format: Some("YYYY-MM-DD".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.theme, "dark");
        assert_eq!(updated.date_format, "YYYY-MM-DD");
        assert_eq!(prefs.record(ALICE).await.unwrap().preferences, updated);
    }
}

mod http_tests {
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use kernel::context::{Identity, RequestContext};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::presentation::journal_router_generic;

    fn app_as(repo: &InMemoryJournal, user_id: UserId) -> Router {
        let context = RequestContext::authenticated(Identity {
            user_id,
            email: format!("user{user_id}@example.com"),
        });
        Router::new().nest(
            "/api",
            journal_router_generic(repo.clone()).layer(Extension(context)),
        )
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn entry_lifecycle() {
        let repo = InMemoryJournal::default();
        let app = app_as(&repo, ALICE);

        let res = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/entries",
                Some(json!({
                    "title": "First",
                    "content": "hello there world",
                    "mood": "curious",
                    "tags": ["rust"]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let created = json_body(res).await;
        assert_eq!(created["wordCount"], 3);
        assert_eq!(created["categoryId"], Value::Null);
        assert_eq!(created["tags"][0]["name"], "rust");
        let id = created["id"].as_i64().unwrap();

        let res = app
            .clone()
            .oneshot(request(
                "GET",
                "/api/entries?page=abc&pageSize=0&categoryId=x",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let list = json_body(res).await;
        assert_eq!(list["total"], 1);
        assert_eq!(list["entries"][0]["id"], id);

        let res = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/entries/{id}"),
                Some(json!({"title": "First", "content": "edited"})),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let updated = json_body(res).await;
        assert_eq!(updated["wordCount"], 1);
        assert_eq!(updated["tags"][0]["name"], "rust");

        let res = app
            .clone()
            .oneshot(request("DELETE", &format!("/api/entries/{id}"), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = app
            .oneshot(request("GET", &format!("/api/entries/{id}"), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_ids_and_bodies_are_bad_requests() {
        let repo = InMemoryJournal::default();
        let app = app_as(&repo, ALICE);

        let res = app
            .clone()
            .oneshot(request("GET", "/api/entries/abc", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["detail"], "Invalid entry ID");

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/categories")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app
            .oneshot(request("POST", "/api/categories", Some(json!({"color": "#000"}))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["detail"], "Name is required");
    }

    #[tokio::test]
    async fn entries_are_scoped_to_their_owner() {
        let repo = InMemoryJournal::default();
        let alice = app_as(&repo, ALICE);
        let bob = app_as(&repo, BOB);

        let res = alice
            .oneshot(request(
                "POST",
                "/api/entries",
                Some(json!({"title": "diary", "content": "private"})),
            ))
            .await
            .unwrap();
        let id = json_body(res).await["id"].as_i64().unwrap();

        let res = bob
            .clone()
            .oneshot(request("GET", &format!("/api/entries/{id}"), None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = bob
            .oneshot(request("GET", "/api/entries", None))
            .await
            .unwrap();
        assert_eq!(json_body(res).await["total"], 0);
    }

    #[tokio::test]
    async fn categories_and_stats() {
        let repo = InMemoryJournal::default();
        let app = app_as(&repo, ALICE);

        let res = app
            .clone()
            .oneshot(request("POST", "/api/categories", Some(json!({"name": "Ideas"}))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let category = json_body(res).await;
        assert_eq!(category["color"], "#0693E3");

        app.clone()
            .oneshot(request(
                "POST",
                "/api/entries",
                Some(json!({
                    "title": "t",
                    "content": "a b",
                    "categoryId": category["id"]
                })),
            ))
            .await
            .unwrap();

        let res = app
            .clone()
            .oneshot(request("GET", "/api/entries/stats", None))
            .await
            .unwrap();
        let stats = json_body(res).await;
        assert_eq!(stats["totalEntries"], 1);
        assert_eq!(stats["avgWordsPerEntry"], 2.0);
        assert_eq!(stats["categoryDistribution"][0]["category"], "Ideas");

        let res = app
            .oneshot(request("GET", "/api/tags", None))
            .await
            .unwrap();
        assert_eq!(json_body(res).await, json!([]));
    }

    #[tokio::test]
    async fn preferences_and_debug_view() {
        let repo = InMemoryJournal::default();
        let app = app_as(&repo, ALICE);

        let res = app
            .clone()
            .oneshot(request("GET", "/api/user/preferences/debug", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(res).await;
        assert_eq!(body["error"], "Error retrieving preferences");
        assert_eq!(body["userId"], 1);
        assert!(body["errorDetail"].as_str().unwrap().contains("no preferences row"));

        repo.seed_preferences(ALICE);

        let res = app
            .clone()
            .oneshot(request(
                "PUT",
                "/api/user/preferences",
                Some(json!({"defaultView": "grid", "emailNotifications": true})),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            json_body(res).await,
            json!({
                "theme": "light",
                "defaultView": "grid",
                "dateFormat": "MM/DD/YYYY",
                "emailNotifications": true
            })
        );

        let res = app
            .oneshot(request("GET", "/api/user/preferences/debug", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["userId"], 1);
        assert_eq!(body["defaultView"], "grid");
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let app = Router::new().nest(
            "/api",
            journal_router_generic(InMemoryJournal::default()),
        );
        let res = app
            .oneshot(request("GET", "/api/entries", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
