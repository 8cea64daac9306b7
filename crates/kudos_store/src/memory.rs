//! In-memory index backend. Interprets compiled filter expressions with
//! exact-match semantics on the encoded field representation, and keeps a
//! journal of every operation so tests can assert side-effect sequences.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use kudos_core::{
    FieldValue, IndexClient, IndexDocument, IndexHits, IndexProvider, IndexQuery, RatingsResult,
    SortOrder,
};

use crate::filter::parse_filter;

#[derive(Clone, Debug, PartialEq)]
pub enum IndexOp {
    Query { partition: String, filter: String },
    Add { partition: String, id: String },
    DeleteById { partition: String, id: String },
    Commit { partition: String },
}

#[derive(Default)]
struct MemoryIndexInner {
    partitions: HashMap<String, Vec<IndexDocument>>,
    journal: Vec<IndexOp>,
}

#[derive(Clone, Default)]
pub struct MemoryIndex {
    inner: Arc<Mutex<MemoryIndexInner>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal(&self) -> Vec<IndexOp> {
        self.lock().journal.clone()
    }

    pub fn documents(&self, partition: &str) -> Vec<IndexDocument> {
        self.lock()
            .partitions
            .get(partition)
            .cloned()
            .unwrap_or_default()
    }

    /// Seeds a document directly, without journaling.
    pub fn insert(&self, partition: &str, document: IndexDocument) {
        self.lock()
            .partitions
            .entry(partition.to_string())
            .or_default()
            .push(document);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryIndexInner> {
        self.inner.lock().expect("memory index mutex poisoned")
    }
}

#[async_trait]
impl IndexProvider for MemoryIndex {
    async fn client(&self, partition: &str) -> RatingsResult<Arc<dyn IndexClient>> {
        Ok(Arc::new(MemoryPartition {
            index: self.clone(),
            partition: partition.to_string(),
        }))
    }
}

struct MemoryPartition {
    index: MemoryIndex,
    partition: String,
}

#[async_trait]
impl IndexClient for MemoryPartition {
    async fn query(&self, request: &IndexQuery) -> RatingsResult<IndexHits> {
        let clauses = parse_filter(&request.filter)?;
        let mut inner = self.index.lock();
        inner.journal.push(IndexOp::Query {
            partition: self.partition.clone(),
            filter: request.filter.clone(),
        });
        let mut matched: Vec<IndexDocument> = inner
            .partitions
            .get(&self.partition)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| {
                        clauses.iter().all(|(field, value)| {
                            document
                                .get(field)
                                .map(|stored| stored.query_repr() == *value)
                                .unwrap_or(false)
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(sort) = request.sort {
            let field = sort.field.field_name();
            matched.sort_by(|a, b| {
                let ordering = compare_values(a.get(field), b.get(field));
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }
        let total = matched.len() as u64;
        let documents = matched
            .into_iter()
            .skip(request.offset as usize)
            .take(request.rows as usize)
            .collect();
        Ok(IndexHits { total, documents })
    }

    async fn add(&self, document: IndexDocument) -> RatingsResult<()> {
        let id = document.str_value("id").unwrap_or_default().to_string();
        let mut inner = self.index.lock();
        inner.journal.push(IndexOp::Add {
            partition: self.partition.clone(),
            id: id.clone(),
        });
        let documents = inner
            .partitions
            .entry(self.partition.clone())
            .or_default();
        // Same-id adds overwrite the whole document, like an index upsert.
        if let Some(existing) = documents
            .iter_mut()
            .find(|stored| stored.str_value("id") == Some(id.as_str()))
        {
            *existing = document;
        } else {
            documents.push(document);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> RatingsResult<()> {
        let mut inner = self.index.lock();
        inner.journal.push(IndexOp::DeleteById {
            partition: self.partition.clone(),
            id: id.to_string(),
        });
        if let Some(documents) = inner.partitions.get_mut(&self.partition) {
            documents.retain(|stored| stored.str_value("id") != Some(id));
        }
        Ok(())
    }

    async fn commit(&self) -> RatingsResult<()> {
        self.index.lock().journal.push(IndexOp::Commit {
            partition: self.partition.clone(),
        });
        Ok(())
    }
}

fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => compare_fields(left, right),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn compare_fields(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Int(left), FieldValue::Int(right)) => left.cmp(right),
        (FieldValue::Float(left), FieldValue::Float(right)) => {
            left.partial_cmp(right).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Time(left), FieldValue::Time(right)) => left.cmp(right),
        (FieldValue::Str(left), FieldValue::Str(right)) => left.cmp(right),
        _ => a.query_repr().cmp(&b.query_repr()),
    }
}

#[cfg(test)]
mod tests {
    use super::{IndexOp, MemoryIndex};
    use kudos_core::{
        FieldValue, IndexClient, IndexDocument, IndexProvider, IndexQuery, RatingQueryField,
        SortClause, SortOrder,
    };

    fn doc(id: &str, vote: i64, created: i64) -> IndexDocument {
        IndexDocument::new()
            .with("id", FieldValue::Str(id.to_string()))
            .with("vote", FieldValue::Int(vote))
            .with("createdDate", FieldValue::Time(kudos_core::Timestamp::from_millis(created)))
            .with("managerId", FieldValue::Str("m1".to_string()))
    }

    #[tokio::test]
    async fn filters_sorts_and_paginates() {
        let index = MemoryIndex::new();
        index.insert("ratings", doc("a", 3, 30));
        index.insert("ratings", doc("b", 1, 10));
        index.insert("ratings", doc("c", 2, 20));
        index.insert("ratings", doc("d", 2, 5));
        let client = index.client("ratings").await.unwrap();

        let hits = client
            .query(&IndexQuery {
                filter: "filter(managerId:m1)".to_string(),
                offset: 1,
                rows: 2,
                sort: Some(SortClause {
                    field: RatingQueryField::CreatedDate,
                    order: SortOrder::Ascending,
                }),
            })
            .await
            .unwrap();
        assert_eq!(hits.total, 4);
        let ids: Vec<_> = hits
            .documents
            .iter()
            .map(|d| d.str_value("id").unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn zero_rows_still_reports_the_total() {
        let index = MemoryIndex::new();
        index.insert("ratings", doc("a", 3, 30));
        index.insert("ratings", doc("b", 1, 10));
        let client = index.client("ratings").await.unwrap();
        let hits = client
            .query(&IndexQuery {
                filter: String::new(),
                offset: 0,
                rows: 0,
                sort: None,
            })
            .await
            .unwrap();
        assert_eq!(hits.total, 2);
        assert!(hits.documents.is_empty());
    }

    #[tokio::test]
    async fn add_with_same_id_overwrites() {
        let index = MemoryIndex::new();
        let client = index.client("ratings").await.unwrap();
        client.add(doc("a", 3, 30)).await.unwrap();
        client.add(doc("a", 5, 30)).await.unwrap();
        let documents = index.documents("ratings");
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].int_value("vote"), Some(5));
    }

    #[tokio::test]
    async fn delete_and_journal() {
        let index = MemoryIndex::new();
        let client = index.client("ratings").await.unwrap();
        client.add(doc("a", 3, 30)).await.unwrap();
        client.delete_by_id("a").await.unwrap();
        client.commit().await.unwrap();
        assert!(index.documents("ratings").is_empty());
        assert_eq!(
            index.journal(),
            vec![
                IndexOp::Add {
                    partition: "ratings".to_string(),
                    id: "a".to_string()
                },
                IndexOp::DeleteById {
                    partition: "ratings".to_string(),
                    id: "a".to_string()
                },
                IndexOp::Commit {
                    partition: "ratings".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn partitions_are_isolated() {
        let index = MemoryIndex::new();
        index.insert("ratings", doc("a", 3, 30));
        index.insert("films", doc("b", 1, 10));
        let client = index.client("films").await.unwrap();
        let hits = client
            .query(&IndexQuery {
                filter: String::new(),
                offset: 0,
                rows: 10,
                sort: None,
            })
            .await
            .unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.documents[0].str_value("id"), Some("b"));
    }
}
